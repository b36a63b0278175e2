//! Audio preprocessing modules
//!
//! Utilities for preparing a decoded buffer for onset detection:
//! - Channel mixing (multi-channel to mono)
//! - Peak normalization (amplitude invariance of the detectors)
//! - Silence floor detection

pub mod channel_mixer;
pub mod normalization;
pub mod silence;
