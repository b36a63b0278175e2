//! Error types for the groove analysis engine

use serde::{Deserialize, Serialize};
use std::fmt;

/// Errors that can occur during groove analysis
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Invalid input parameters
    InvalidInput(String),

    /// Unsupported or corrupt audio input
    DecodingError(String),

    /// Silence, too-short input or no detectable onsets
    ///
    /// Raised by the onset stage. The top-level analysis converts it into a
    /// flagged result with neutral metrics instead of failing the call.
    InsufficientSignal(String),

    /// Processing error during analysis
    ProcessingError(String),
}

/// Coarse error classification, stable across releases and serialisable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// See [`AnalysisError::InvalidInput`]
    InvalidInput,
    /// See [`AnalysisError::DecodingError`]
    DecodeError,
    /// See [`AnalysisError::InsufficientSignal`]
    InsufficientSignal,
    /// See [`AnalysisError::ProcessingError`]
    ProcessingError,
}

impl AnalysisError {
    /// Classification of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalysisError::InvalidInput(_) => ErrorKind::InvalidInput,
            AnalysisError::DecodingError(_) => ErrorKind::DecodeError,
            AnalysisError::InsufficientSignal(_) => ErrorKind::InsufficientSignal,
            AnalysisError::ProcessingError(_) => ErrorKind::ProcessingError,
        }
    }
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AnalysisError::DecodingError(msg) => write!(f, "Decoding error: {}", msg),
            AnalysisError::InsufficientSignal(msg) => write!(f, "Insufficient signal: {}", msg),
            AnalysisError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
        }
    }
}

impl std::error::Error for AnalysisError {}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::DecodeError => "decode_error",
            ErrorKind::InsufficientSignal => "insufficient_signal",
            ErrorKind::ProcessingError => "processing_error",
        };
        f.write_str(name)
    }
}
