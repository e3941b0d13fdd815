//! ONNX Runtime inference engine with a round-robin session pool.

use crate::core::{errors::DiagnosisError, tensor::Tensor2D, tensor::Tensor4D};
use ort::{session::Session, value::ValueType};
use std::sync::Mutex;

#[path = "ort_infer_builders.rs"]
mod ort_infer_builders;
#[path = "ort_infer_execution.rs"]
mod ort_infer_execution;
#[cfg(test)]
#[path = "ort_infer_tests.rs"]
mod ort_infer_tests;

pub struct OrtInfer {
    pub(super) sessions: Vec<Mutex<Session>>,
    pub(super) next_idx: std::sync::atomic::AtomicUsize,
    pub(super) input_name: String,
    pub(super) model_path: std::path::PathBuf,
    pub(super) model_name: String,
}

impl std::fmt::Debug for OrtInfer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrtInfer")
            .field("sessions", &self.sessions.len())
            .field("input_name", &self.input_name)
            .field("model_path", &self.model_path)
            .field("model_name", &self.model_name)
            .finish()
    }
}

impl OrtInfer {
    /// Number of classes the model emits, when the output shape declares it.
    pub fn declared_num_classes(&self) -> Option<usize> {
        let session_guard = self.sessions.first()?.lock().ok()?;
        let output = session_guard.outputs.first()?;
        match &output.output_type {
            ValueType::Tensor { shape, .. } => shape
                .last()
                .copied()
                .filter(|&d| d > 0)
                .map(|d| d as usize),
            _ => None,
        }
    }
}

impl crate::core::traits::ClassificationModel for OrtInfer {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn forward(&self, input: &Tensor4D) -> Result<Vec<f32>, DiagnosisError> {
        let scores: Tensor2D = self.infer_2d(input)?;
        scores
            .outer_iter()
            .next()
            .map(|row| row.to_vec())
            .ok_or_else(|| {
                DiagnosisError::inference_error(
                    &self.model_name,
                    "model returned an empty batch",
                    crate::core::errors::SimpleError::new("no output rows"),
                )
            })
    }
}
