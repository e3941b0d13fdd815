//! Classification model adapters.
//!
//! This module contains the leaf disease classifier, the shared model state
//! it loads lazily, and the ONNX loader used in production.

pub mod leaf_disease_adapter;
pub mod model_handle;
pub mod onnx_loader;

pub use leaf_disease_adapter::{
    CannedPrediction, Classification, ClassifierAdapter, MOCK_PREDICTIONS,
};
pub use model_handle::{ModelHandle, ModelState, NoArtifactLoader};
pub use onnx_loader::OrtModelLoader;
