//! Feature extraction modules
//!
//! Turns decoded audio into rhythmic features:
//! - Onset detection
//! - Tempo (period) estimation
//! - Metrical grid alignment
//! - Groove measurements (swing, microtiming, ghost notes)

pub mod grid;
pub mod groove;
pub mod onset;
pub mod period;
