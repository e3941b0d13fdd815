//! Classifier adapter for the leaf disease model.
//!
//! Wraps a [`ModelHandle`] and turns a normalized tensor into either real
//! class scores or, when no model is available, one of a few canned
//! predictions picked at random.

use super::model_handle::ModelHandle;
use crate::core::errors::{DiagnosisError, DiagnosisResult};
use crate::core::tensor::Tensor4D;
use crate::domain::labels::DiseaseClass;
use crate::domain::prediction::ProbabilityVector;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex};
use tracing::{debug, error};

/// A fixed placeholder prediction served in mock mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CannedPrediction {
    pub label: DiseaseClass,
    pub confidence_percent: u8,
}

/// Placeholder predictions served when no model artifact is available.
pub const MOCK_PREDICTIONS: [CannedPrediction; 3] = [
    CannedPrediction {
        label: DiseaseClass::TomatoEarlyBlight,
        confidence_percent: 92,
    },
    CannedPrediction {
        label: DiseaseClass::TomatoBacterialSpot,
        confidence_percent: 85,
    },
    CannedPrediction {
        label: DiseaseClass::AppleHealthy,
        confidence_percent: 88,
    },
];

/// Outcome of one classification call.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// Scores from a forward pass of the loaded model.
    Real(ProbabilityVector),
    /// A canned pick made because no model is loaded.
    Mocked(CannedPrediction),
}

impl Classification {
    /// Whether this came from the mock fallback.
    pub fn is_mocked(&self) -> bool {
        matches!(self, Classification::Mocked(_))
    }
}

/// Runs the leaf disease model, or the mock fallback when it is absent.
#[derive(Debug)]
pub struct ClassifierAdapter {
    handle: Arc<ModelHandle>,
    rng: Mutex<StdRng>,
}

impl ClassifierAdapter {
    /// Creates an adapter whose mock picks are seeded from the OS.
    pub fn new(handle: Arc<ModelHandle>) -> Self {
        Self {
            handle,
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Creates an adapter with a deterministic mock sequence.
    pub fn with_seed(handle: Arc<ModelHandle>, seed: u64) -> Self {
        Self {
            handle,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// The shared model state.
    pub fn handle(&self) -> &Arc<ModelHandle> {
        &self.handle
    }

    /// Loads the model if that has not happened yet.
    pub fn ensure_loaded(&self) {
        self.handle.ensure_loaded();
    }

    /// Classifies one normalized image.
    ///
    /// The tensor is consumed and dropped before this returns. In mock mode
    /// it is ignored.
    ///
    /// # Errors
    ///
    /// [`DiagnosisError::Inference`] when the model fails during its forward pass.
    pub fn classify(&self, tensor: Tensor4D) -> DiagnosisResult<Classification> {
        let Some(model) = self.handle.ensure_loaded() else {
            drop(tensor);
            let pick = self.pick_mock()?;
            debug!(
                label = %pick.label,
                confidence = pick.confidence_percent,
                "Serving mock prediction (model not available)"
            );
            return Ok(Classification::Mocked(pick));
        };

        let scores = model.forward(&tensor);
        drop(tensor);

        match scores {
            Ok(scores) => Ok(Classification::Real(ProbabilityVector::new(scores))),
            Err(e) => {
                error!(model = model.model_name(), error = %e, "Inference failed");
                Err(match e {
                    e @ DiagnosisError::Inference { .. } => e,
                    other => DiagnosisError::inference_error(
                        model.model_name(),
                        "forward pass failed",
                        other,
                    ),
                })
            }
        }
    }

    fn pick_mock(&self) -> DiagnosisResult<CannedPrediction> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| DiagnosisError::lock_poisoned("mock rng"))?;
        Ok(MOCK_PREDICTIONS[rng.random_range(0..MOCK_PREDICTIONS.len())])
    }
}
