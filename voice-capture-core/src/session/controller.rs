use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, error, warn};
use parking_lot::{Condvar, Mutex};

use crate::models::artifact::EncodedArtifact;
use crate::models::audio::AudioLevels;
use crate::models::config::RecorderConfig;
use crate::models::error::CaptureError;
use crate::models::state::RecorderStatus;
use crate::processing::{levels, wav_encoder};
use crate::session::events::{EventReceiver, EventSender, SessionEvent};
use crate::traits::decoder::ChunkDecoder;
use crate::traits::device::{DeviceProvider, DeviceStream, StreamConstraints};
use crate::traits::recorder::{RecorderActivity, RecorderResource};

/// Snapshot read by callers and written by the session pump.
struct SharedState {
    status: RecorderStatus,
    artifact: Option<EncodedArtifact>,
    levels: AudioLevels,
}

/// Shared snapshot plus a condvar so the upload collaborator can block on
/// status and artifact changes.
struct Shared {
    state: Mutex<SharedState>,
    changed: Condvar,
}

impl Shared {
    fn new(status: RecorderStatus) -> Self {
        Self {
            state: Mutex::new(SharedState {
                status,
                artifact: None,
                levels: AudioLevels::default(),
            }),
            changed: Condvar::new(),
        }
    }

    fn status(&self) -> RecorderStatus {
        self.state.lock().status
    }

    fn set_status(&self, status: RecorderStatus) {
        {
            let mut state = self.state.lock();
            if state.status != status {
                debug!("Recorder status: {:?} -> {:?}", state.status, status);
                state.status = status;
            }
        }
        self.changed.notify_all();
    }

    fn replace_artifact(&self, artifact: EncodedArtifact, levels: AudioLevels) {
        {
            let mut state = self.state.lock();
            state.artifact = Some(artifact);
            state.levels = levels;
        }
        self.changed.notify_all();
    }

    fn clear_output(&self) {
        {
            let mut state = self.state.lock();
            state.artifact = None;
            state.levels = AudioLevels::default();
        }
        self.changed.notify_all();
    }
}

/// Live handles of one capture session.
struct ActiveSession<R> {
    resource: R,
    pump_running: Arc<AtomicBool>,
    pump: Option<thread::JoinHandle<()>>,
}

/// Capture session controller.
///
/// Owns the device stream, the recorder resource and the decode context,
/// and drives the status state machine:
///
/// ```text
/// idle → recording ↔ paused
///            ↓         ↓
///         stopped / canceled
/// ```
///
/// Public operations are expected from a single control thread. All
/// asynchronous collaborator signals arrive as [`SessionEvent`]s on a
/// per-session queue consumed by one pump thread, which is the only
/// writer of status, artifact and levels while a session runs. Failures
/// surface through [`RecorderStatus`], never as returned errors; the
/// permission-denied and recorder-error states are terminal, and a new
/// controller must be constructed to retry.
pub struct RecorderController<P: DeviceProvider, D: ChunkDecoder> {
    config: RecorderConfig,
    provider: P,
    decoder: Option<Arc<D>>,
    stream: Option<P::Stream>,
    session: Option<ActiveSession<P::Recorder>>,
    shared: Arc<Shared>,
}

impl<P: DeviceProvider, D: ChunkDecoder> std::fmt::Debug for RecorderController<P, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecorderController")
            .field("config", &self.config)
            .field("status", &self.shared.status())
            .finish_non_exhaustive()
    }
}

impl<P, D> RecorderController<P, D>
where
    P: DeviceProvider,
    D: ChunkDecoder + 'static,
{
    /// Build a controller for `config`.
    ///
    /// Platform capture capability is checked here, once: without it the
    /// controller starts in `RecorderError` and every operation is
    /// ignored.
    pub fn new(config: RecorderConfig, provider: P) -> Result<Self, CaptureError> {
        config.validate().map_err(CaptureError::ConfigurationFailed)?;

        let initial = if provider.supports_recording() {
            RecorderStatus::Idle
        } else {
            warn!("Platform lacks capture-recording capability");
            RecorderStatus::RecorderError
        };

        Ok(Self {
            config,
            provider,
            decoder: None,
            stream: None,
            session: None,
            shared: Arc::new(Shared::new(initial)),
        })
    }

    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }

    pub fn status(&self) -> RecorderStatus {
        self.shared.status()
    }

    /// Levels of the most recently decoded chunk, for live preview.
    pub fn levels(&self) -> AudioLevels {
        self.shared.state.lock().levels
    }

    /// The finished artifact. `Some` only once the session has stopped;
    /// in every other status the artifact is absent or stale and is not
    /// surfaced.
    pub fn artifact(&self) -> Option<EncodedArtifact> {
        let state = self.shared.state.lock();
        if state.status == RecorderStatus::Stopped {
            state.artifact.clone()
        } else {
            None
        }
    }

    /// Open a new capture session.
    ///
    /// Valid from `Idle`, `Stopped` and `Canceled`; ignored elsewhere.
    /// Clears any previous artifact, lazily opens the decode context,
    /// acquires the device stream (reacquiring it when a track has
    /// ended), opens and starts a recorder resource, and transitions to
    /// `Recording`. Denied or missing devices park the controller in
    /// `PermissionDenied`; resource failures in `RecorderError`.
    pub fn start(&mut self) {
        let status = self.shared.status();
        if !status.can_start() {
            debug!("start() ignored while {:?}", status);
            return;
        }

        self.shutdown_session();
        self.shared.clear_output();

        if self.decoder.is_none() {
            match D::open(&self.config) {
                Ok(decoder) => self.decoder = Some(Arc::new(decoder)),
                Err(e) => {
                    error!("Failed to open decode context: {}", e);
                    self.shared.set_status(RecorderStatus::RecorderError);
                    return;
                }
            }
        }

        let needs_stream = match &self.stream {
            None => true,
            Some(stream) => stream.has_ended_track(),
        };
        if needs_stream {
            let constraints = StreamConstraints::from(&self.config);
            match self.provider.acquire(&constraints) {
                Ok(stream) => self.stream = Some(stream),
                Err(e) => {
                    warn!("Device stream unavailable: {}", e);
                    self.stream = None;
                    self.shared.set_status(RecorderStatus::PermissionDenied);
                    return;
                }
            }
        }
        let Some(stream) = self.stream.as_ref() else {
            self.shared.set_status(RecorderStatus::PermissionDenied);
            return;
        };

        let (events, queue) = mpsc::channel();
        let mut resource = match self.provider.open_recorder(stream, events.clone()) {
            Ok(resource) => resource,
            Err(e) => {
                error!("Failed to open recorder resource: {}", e);
                self.shared.set_status(RecorderStatus::RecorderError);
                return;
            }
        };

        let pump_running = Arc::new(AtomicBool::new(true));
        let pump = self.spawn_pump(queue, events, Arc::clone(&pump_running));

        if let Err(e) = resource.start() {
            error!("Failed to start recorder resource: {}", e);
            pump_running.store(false, Ordering::SeqCst);
            self.shared.set_status(RecorderStatus::RecorderError);
            return;
        }

        self.session = Some(ActiveSession {
            resource,
            pump_running,
            pump: Some(pump),
        });
        self.shared.set_status(RecorderStatus::Recording);
    }

    /// Pause capture. A no-op unless the resource reports active capture.
    pub fn pause(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.resource.activity() != RecorderActivity::Recording {
            return;
        }
        session.resource.pause();
        self.shared.set_status(RecorderStatus::Paused);
    }

    /// Resume capture. A no-op unless the resource reports paused capture.
    pub fn resume(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.resource.activity() != RecorderActivity::Paused {
            return;
        }
        session.resource.resume();
        self.shared.set_status(RecorderStatus::Recording);
    }

    /// Stop the session: stops every device track, then the resource
    /// unless already inactive. The transition to `Stopped` happens when
    /// the resource's stop acknowledgment is processed, not when this
    /// returns; the artifact may finish encoding after that.
    pub fn stop(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        if let Some(stream) = self.stream.as_mut() {
            stream.stop_tracks();
        }
        if session.resource.activity() != RecorderActivity::Inactive {
            session.resource.stop();
        }
    }

    /// Cancel the session, discarding the take.
    ///
    /// `Canceled` is set *before* the resource stops, so chunks delivered
    /// during the stop sequence — and decodes completing after it — are
    /// discarded rather than encoded.
    pub fn cancel(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        if let Some(stream) = self.stream.as_mut() {
            stream.stop_tracks();
        }
        self.shared.clear_output();
        self.shared.set_status(RecorderStatus::Canceled);
        if session.resource.activity() != RecorderActivity::Inactive {
            session.resource.stop();
        }
    }

    /// Block until the controller reaches `status`, or `timeout` expires.
    pub fn wait_for_status(&self, status: RecorderStatus, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut state = self.shared.state.lock();
        while state.status != status {
            if self.shared.changed.wait_until(&mut state, deadline).timed_out() {
                return false;
            }
        }
        true
    }

    /// Block until the session has stopped and its artifact is ready.
    ///
    /// Returns `None` on timeout or when the session ends without a
    /// usable artifact (canceled, permission denied, recorder error).
    pub fn wait_for_artifact(&self, timeout: Duration) -> Option<EncodedArtifact> {
        let deadline = Instant::now() + timeout;
        let mut state = self.shared.state.lock();
        loop {
            match state.status {
                RecorderStatus::Stopped => {
                    if let Some(artifact) = state.artifact.clone() {
                        return Some(artifact);
                    }
                }
                RecorderStatus::Canceled => return None,
                status if status.is_failure() => return None,
                _ => {}
            }
            if self.shared.changed.wait_until(&mut state, deadline).timed_out() {
                return None;
            }
        }
    }

    /// Spawn the per-session event pump: the single consumer of the
    /// session queue and the single writer of status/artifact/levels
    /// while the session runs.
    fn spawn_pump(
        &self,
        queue: EventReceiver,
        reply: EventSender,
        running: Arc<AtomicBool>,
    ) -> thread::JoinHandle<()> {
        let decoder = Arc::clone(self.decoder.as_ref().expect("decode context opened before pump"));
        let shared = Arc::clone(&self.shared);
        let sample_bits = self.config.sample_bits;

        thread::Builder::new()
            .name("capture-events".into())
            .spawn(move || {
                Self::run_pump(queue, reply, running, decoder, shared, sample_bits);
            })
            .expect("failed to spawn capture-events thread")
    }

    fn run_pump(
        queue: EventReceiver,
        reply: EventSender,
        running: Arc<AtomicBool>,
        decoder: Arc<D>,
        shared: Arc<Shared>,
        sample_bits: u16,
    ) {
        let mut pending_decodes = 0usize;
        let mut stop_acked = false;

        while running.load(Ordering::SeqCst) {
            let event = match queue.recv_timeout(Duration::from_millis(100)) {
                Ok(event) => event,
                Err(mpsc::RecvTimeoutError::Timeout) => continue,
                Err(mpsc::RecvTimeoutError::Disconnected) => break,
            };

            match event {
                SessionEvent::ChunkDelivered(chunk) => {
                    if shared.status() == RecorderStatus::Canceled {
                        debug!("Discarding {}-byte chunk delivered after cancel", chunk.len());
                    } else {
                        pending_decodes += 1;
                        decoder.decode(chunk, reply.clone());
                    }
                }
                SessionEvent::DecodeFinished(result) => {
                    pending_decodes = pending_decodes.saturating_sub(1);
                    match result {
                        // A decode finishing after cancel must not resurrect the take.
                        Ok(_) if shared.status() == RecorderStatus::Canceled => {
                            debug!("Discarding decode completed after cancel");
                        }
                        Ok(buffer) => {
                            let bytes = wav_encoder::encode_wav(&buffer, sample_bits);
                            let levels = levels::measure(&buffer);
                            shared.replace_artifact(
                                EncodedArtifact::new(bytes, &buffer, sample_bits),
                                levels,
                            );
                        }
                        Err(e) => {
                            error!("Chunk decode failed: {}", e);
                            shared.set_status(RecorderStatus::RecorderError);
                        }
                    }
                }
                SessionEvent::StopAcknowledged => {
                    stop_acked = true;
                    // Canceled and failed sessions keep their terminal status.
                    if shared.status().is_active() {
                        shared.set_status(RecorderStatus::Stopped);
                    }
                }
            }

            if stop_acked && pending_decodes == 0 {
                break;
            }
        }
    }
}

impl<P: DeviceProvider, D: ChunkDecoder> RecorderController<P, D> {
    /// Tear down the current session's handles, if any.
    fn shutdown_session(&mut self) {
        let Some(mut session) = self.session.take() else {
            return;
        };
        if session.resource.activity() != RecorderActivity::Inactive {
            session.resource.stop();
        }
        session.pump_running.store(false, Ordering::SeqCst);
        if let Some(pump) = session.pump.take() {
            let _ = pump.join();
        }
    }
}

impl<P: DeviceProvider, D: ChunkDecoder> Drop for RecorderController<P, D> {
    fn drop(&mut self) {
        if let Some(stream) = self.stream.as_mut() {
            stream.stop_tracks();
        }
        self.shutdown_session();
    }
}
