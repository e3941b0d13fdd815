//! Model adapters for the prediction pipeline.
//!
//! Adapters run models directly through ONNX Runtime behind the
//! [`ClassificationModel`](crate::core::traits::ClassificationModel) seam.

pub mod classification;

pub use classification::*;
