//! Audio I/O modules
//!
//! Audio decoding (Symphonia) and the immutable mono buffer the pipeline consumes.

pub mod audio_buffer;
pub mod decoder;

pub use audio_buffer::AudioBuffer;
