//! Trait definitions at the seams of the pipeline.
//!
//! The classifier adapter never talks to ONNX Runtime directly. It goes
//! through [`ClassificationModel`] for the forward pass and through
//! [`ModelLoader`] to obtain one, so tests can swap in fakes for both.

use crate::core::errors::DiagnosisResult;
use crate::core::tensor::Tensor4D;
use std::fmt::Debug;
use std::path::Path;
use std::sync::Arc;

/// A loaded image classification model.
pub trait ClassificationModel: Send + Sync + Debug {
    /// Name used in logs and error messages.
    fn model_name(&self) -> &str;

    /// Runs the forward pass on a single-item batch and returns one score per class.
    ///
    /// Any intermediate buffers must be released before this returns,
    /// whether the pass succeeds or fails.
    fn forward(&self, input: &Tensor4D) -> DiagnosisResult<Vec<f32>>;
}

/// Locates and loads a model artifact.
pub trait ModelLoader: Send + Sync + Debug {
    /// Loads the model stored at `path`.
    ///
    /// Returns `Ok(None)` when no artifact exists there. An `Err` means an
    /// artifact exists but could not be loaded.
    fn load(&self, path: &Path) -> DiagnosisResult<Option<Arc<dyn ClassificationModel>>>;
}
