//! Error constructor utilities.
//!
//! Helpers that keep error construction at call sites short and uniform:
//!
//! ```rust
//! use leaf_doctor::core::errors::{DiagnosisError, SimpleError};
//!
//! let error = DiagnosisError::inference_error(
//!     "plant_disease",
//!     "forward pass",
//!     SimpleError::new("session closed"),
//! );
//! assert!(!error.is_client_error());
//!
//! let rejected = DiagnosisError::upload_rejected("Only JPEG and PNG images are allowed");
//! assert!(rejected.is_client_error());
//! ```

use super::types::{DiagnosisError, ProcessingStage};

impl DiagnosisError {
    /// Creates an inference error for the named model.
    pub fn inference_error(
        model_name: impl Into<String>,
        context: impl Into<String>,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Inference {
            model_name: model_name.into(),
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates an error for a model artifact that could not be loaded.
    pub fn model_load_error(
        path: &std::path::Path,
        context: impl Into<String>,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ModelLoad {
            path: path.to_path_buf(),
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates an error for a failed processing stage.
    pub fn processing_error(
        stage: ProcessingStage,
        context: impl Into<String>,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Processing {
            stage,
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates a normalization error.
    pub fn normalization(
        context: impl Into<String>,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::processing_error(ProcessingStage::Normalization, context, error)
    }

    /// Creates a persistence error.
    pub fn persistence(
        context: impl Into<String>,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::processing_error(ProcessingStage::Persistence, context, error)
    }

    /// Creates an error for invalid input.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a configuration error naming the offending field.
    pub fn config_error_with_context(field: &str, value: &str, reason: &str) -> Self {
        Self::Config {
            message: format!(
                "Configuration error in field '{}' with value '{}': {}",
                field, value, reason
            ),
        }
    }

    /// Creates an upload rejection.
    pub fn upload_rejected(message: impl Into<String>) -> Self {
        Self::UploadRejected {
            message: message.into(),
        }
    }

    /// Creates an error for an upload over the size limit.
    pub fn upload_too_large(limit: usize, actual: usize) -> Self {
        Self::UploadRejected {
            message: format!(
                "File too large: {} bytes exceeds the limit of {} bytes",
                actual, limit
            ),
        }
    }

    /// Creates an error for a lock that could not be acquired.
    pub fn lock_poisoned(what: &str) -> Self {
        Self::persistence(
            format!("failed to acquire {} lock", what),
            super::types::SimpleError::new("lock poisoned"),
        )
    }
}
