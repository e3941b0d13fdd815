//! Structures and helpers for ONNX Runtime inference.

pub mod ort_infer;

pub use ort_infer::OrtInfer;
