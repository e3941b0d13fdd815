//! Domain types for plant disease prediction.
//!
//! This module defines the closed label set, the static remediation table,
//! the probability vector and result types, and the persisted record.

pub mod labels;
pub mod prediction;
pub mod record;
pub mod remediation;

pub use labels::{DiseaseClass, UnknownLabel};
pub use prediction::{
    LabelConfidence, PredictionResult, ProbabilityVector, Provenance, RankedPrediction,
};
pub use record::{PredictionRecord, PredictionResponse};
pub use remediation::RemediationTable;
