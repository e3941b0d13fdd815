//! # Leaf Doctor
//!
//! A Rust library that classifies plant leaf photos into disease categories
//! using an ONNX model and pairs the result with a remediation tip.
//!
//! ## Features
//!
//! - Four-stage pipeline: normalize, classify, rank, resolve advice
//! - Lazy, thread-safe model loading shared across requests
//! - Explicit mock mode when no model artifact is present
//! - Upload validation, storage and per-user prediction history
//! - ONNX Runtime integration with a pooled session
//!
//! ## Components
//!
//! - **Image Normalizer**: decode, cover-crop to 224x224, scale to `[0, 1]`
//! - **Classifier Adapter**: run the model or fall back to canned results
//! - **Result Ranker**: arg-max with first-occurrence ties, whole percentages
//! - **Remediation Resolver**: static advice per disease class
//!
//! ## Modules
//!
//! * [`core`] - Configuration, errors, constants and ONNX Runtime integration
//! * [`domain`] - Disease labels, remediation table and result types
//! * [`models`] - Classifier adapter and model loading
//! * [`pipeline`] - The prediction pipeline and the service around it
//! * [`processors`] - Image normalization and score ranking
//! * [`utils`] - Image loading helpers
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use leaf_doctor::prelude::*;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PipelineConfig::from_env()?;
//! let pipeline = DiseasePipeline::from_config(&config);
//! pipeline.warm_up();
//!
//! let result = pipeline.predict(Path::new("leaf.jpg"))?;
//! println!("{} ({}%): {}", result.top_label, result.confidence_percent, result.advisory);
//! # Ok(())
//! # }
//! ```
//!
//! ### Service with history
//!
//! ```rust,no_run
//! use leaf_doctor::prelude::*;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PipelineConfig::default();
//! let pipeline = Arc::new(DiseasePipeline::from_config(&config));
//! let service = PredictionService::new(&config, pipeline, Arc::new(InMemoryPredictionStore::new()));
//!
//! let bytes = std::fs::read("leaf.png")?;
//! let response = service.submit("user-1", "leaf.png", &bytes)?;
//! println!("{}", serde_json::to_string_pretty(&response)?);
//! assert_eq!(service.history("user-1")?.len(), 1);
//! # Ok(())
//! # }
//! ```

// Core modules
pub mod core;
pub mod domain;
pub mod models;

pub mod pipeline;
pub mod processors;
pub mod utils;

/// Prelude module for convenient imports.
///
/// ```rust
/// use leaf_doctor::prelude::*;
/// ```
///
/// Included items cover the common path:
/// - Pipeline and service (`DiseasePipeline`, `PredictionService`, `InMemoryPredictionStore`)
/// - Configuration (`PipelineConfig`)
/// - Results (`PredictionResult`, `PredictionResponse`, `DiseaseClass`, `Provenance`)
/// - Essential error and result types (`DiagnosisError`, `DiagnosisResult`)
/// - Basic image loading (`load_image`)
///
/// For custom models and loaders, import from `leaf_doctor::core::traits`
/// and `leaf_doctor::models`.
pub mod prelude {
    // Pipeline (essential)
    pub use crate::pipeline::{DiseasePipeline, InMemoryPredictionStore, PredictionService};

    // Configuration
    pub use crate::core::PipelineConfig;

    // Results
    pub use crate::domain::{
        DiseaseClass, PredictionRecord, PredictionResponse, PredictionResult, Provenance,
    };

    // Error Handling (essential)
    pub use crate::core::{DiagnosisError, DiagnosisResult};

    // Image Utility (minimal)
    pub use crate::utils::{ImageSource, load_image};
}
