//! Classifier outputs and the result handed back to callers.

use crate::domain::labels::DiseaseClass;
use serde::{Deserialize, Serialize};

/// Per-class scores produced by one forward pass.
///
/// Aligned by position with [`DiseaseClass::ALL`]. Values are expected in
/// `[0, 1]` but are not required to sum to one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProbabilityVector(Vec<f32>);

impl ProbabilityVector {
    /// Wraps raw model scores.
    pub fn new(scores: Vec<f32>) -> Self {
        Self(scores)
    }

    /// The scores in class order.
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Number of scores.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the vector holds no scores.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<f32>> for ProbabilityVector {
    fn from(scores: Vec<f32>) -> Self {
        Self(scores)
    }
}

/// A class paired with its rounded confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelConfidence {
    #[serde(rename = "disease")]
    pub label: DiseaseClass,
    #[serde(rename = "confidence")]
    pub confidence_percent: u8,
}

/// Where a prediction came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// A real forward pass of the loaded model.
    Model,
    /// A canned placeholder picked because no model is available.
    Mock,
}

/// Output of the ranker: the top class and the per-class breakdown,
/// still without advisory text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedPrediction {
    pub top_label: DiseaseClass,
    pub confidence_percent: u8,
    /// Every class with its percentage, in class order (not sorted).
    pub ranked: Vec<LabelConfidence>,
}

impl RankedPrediction {
    /// Attaches the advisory and provenance to produce the final result.
    pub fn with_advisory(
        self,
        advisory: impl Into<String>,
        provenance: Provenance,
    ) -> PredictionResult {
        PredictionResult {
            top_label: self.top_label,
            confidence_percent: self.confidence_percent,
            advisory: advisory.into(),
            ranked: self.ranked,
            provenance,
        }
    }
}

/// Final outcome of one pipeline invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionResult {
    #[serde(rename = "disease")]
    pub top_label: DiseaseClass,
    #[serde(rename = "confidence")]
    pub confidence_percent: u8,
    #[serde(rename = "suggestion")]
    pub advisory: String,
    #[serde(rename = "allPredictions")]
    pub ranked: Vec<LabelConfidence>,
    pub provenance: Provenance,
}

impl PredictionResult {
    /// Whether the result came from the placeholder path rather than a model.
    pub fn is_mocked(&self) -> bool {
        self.provenance == Provenance::Mock
    }
}
