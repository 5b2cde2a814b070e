pub mod decoder;
pub mod device;
pub mod recorder;
