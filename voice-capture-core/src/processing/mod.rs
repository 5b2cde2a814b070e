pub mod levels;
pub mod pcm_decoder;
pub mod wav_encoder;
