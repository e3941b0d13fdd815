//! Configuration management for the prediction pipeline.
//!
//! This module provides configuration types, validation traits, and
//! environment/JSON loading for the pipeline and the service around it.

pub mod errors;
pub mod onnx;
pub mod pipeline;

pub use errors::{ConfigError, ConfigValidator};
pub use onnx::{OrtGraphOptimizationLevel, OrtSessionConfig};
pub use pipeline::PipelineConfig;
