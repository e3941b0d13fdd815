//! Arg-max selection and percentage rounding over class scores.

use crate::core::errors::{DiagnosisError, DiagnosisResult};
use crate::domain::labels::DiseaseClass;
use crate::domain::prediction::{LabelConfidence, ProbabilityVector, RankedPrediction};

/// Converts a score in `[0, 1]` into a whole percentage.
///
/// The product is taken in `f64`, so `0.285f32` (stored as `0.28499999...`)
/// becomes `28`. Halves round away from zero, so `0.625` becomes `63`.
/// Values outside the unit range are clamped and NaN maps to `0`.
pub fn to_percent(score: f32) -> u8 {
    if score.is_nan() {
        return 0;
    }
    (f64::from(score) * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Index of the largest score; the first occurrence wins on ties.
///
/// Returns `None` for an empty slice. A NaN score only wins when every
/// score is NaN.
pub fn argmax(scores: &[f32]) -> Option<usize> {
    let (first, rest) = scores.split_first()?;
    let mut best = (0, *first);
    for (offset, &score) in rest.iter().enumerate() {
        if score > best.1 || (best.1.is_nan() && !score.is_nan()) {
            best = (offset + 1, score);
        }
    }
    Some(best.0)
}

/// Picks the top class from a probability vector and lays out every class
/// with its rounded percentage.
#[derive(Debug, Clone)]
pub struct ResultRanker {
    labels: Vec<DiseaseClass>,
}

impl ResultRanker {
    /// Creates a ranker over a custom label order.
    pub fn new(labels: Vec<DiseaseClass>) -> Self {
        Self { labels }
    }

    /// Number of scores expected per vector.
    pub fn num_classes(&self) -> usize {
        self.labels.len()
    }

    /// Ranks one vector of scores.
    ///
    /// The ranked list keeps the label order, it is not sorted by confidence.
    ///
    /// # Errors
    ///
    /// [`DiagnosisError::InvalidInput`] when the vector is empty or its
    /// length differs from the number of labels.
    pub fn rank(&self, vector: &ProbabilityVector) -> DiagnosisResult<RankedPrediction> {
        let scores = vector.as_slice();
        if scores.len() != self.labels.len() {
            return Err(DiagnosisError::invalid_input(if scores.is_empty() {
                "cannot rank an empty probability vector".to_string()
            } else {
                format!(
                    "probability vector has {} entries, expected {}",
                    scores.len(),
                    self.labels.len()
                )
            }));
        }
        let top = argmax(scores)
            .ok_or_else(|| DiagnosisError::invalid_input("cannot rank an empty probability vector"))?;

        let ranked = self
            .labels
            .iter()
            .zip(scores)
            .map(|(&label, &score)| LabelConfidence {
                label,
                confidence_percent: to_percent(score),
            })
            .collect();

        Ok(RankedPrediction {
            top_label: self.labels[top],
            confidence_percent: to_percent(scores[top]),
            ranked,
        })
    }
}

impl Default for ResultRanker {
    fn default() -> Self {
        Self::new(DiseaseClass::ALL.to_vec())
    }
}
