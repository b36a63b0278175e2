//! Groove measurements on grid-aligned onsets
//!
//! - Swing percentage from off-beat eighth positions
//! - Microtiming (push/pull, deviation, consistency)
//! - Ghost-note fraction from the onset strength distribution

pub mod ghost_notes;
pub mod microtiming;
pub mod swing;

pub use ghost_notes::ghost_note_fraction;
pub use microtiming::{profile_microtiming, MicrotimingProfile};
pub use swing::{analyze_swing, SwingEstimate};
