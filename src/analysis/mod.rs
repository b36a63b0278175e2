//! Analysis and result aggregation modules
//!
//! Turns groove features into the final analysis:
//! - Result types and metadata
//! - Confidence scoring
//! - Pocket, humanization, era and reference classification
//! - Summary text
//! - Pairwise compatibility and batch analysis

pub mod batch;
pub mod compatibility;
pub mod confidence;
pub mod era;
pub mod humanization;
pub mod metadata;
pub mod pocket;
pub mod reference;
pub mod result;
pub mod summary;
