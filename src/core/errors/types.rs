//! Error types for the disease prediction pipeline.

use thiserror::Error;

/// Stage of the pipeline that produced a processing failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    /// Scaling pixel values into a tensor.
    Normalization,
    /// Storing uploads or prediction records.
    Persistence,
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStage::Normalization => write!(f, "normalization"),
            ProcessingStage::Persistence => write!(f, "persistence"),
        }
    }
}

/// Every failure the pipeline and the prediction service can report.
///
/// The first three variants are the pipeline's own taxonomy: a bad upload
/// ([`DiagnosisError::ImageDecode`]), a failing forward pass
/// ([`DiagnosisError::Inference`]) and a broken contract between the
/// classifier and the ranker ([`DiagnosisError::InvalidInput`]). None of them
/// is retried.
#[derive(Error, Debug)]
pub enum DiagnosisError {
    /// The input could not be read or is not a supported raster image.
    #[error("image decode failed: {0}")]
    ImageDecode(#[source] image::ImageError),

    /// The loaded model failed during its forward pass.
    #[error("inference failed in model '{model_name}': {context}")]
    Inference {
        /// Name of the model that failed.
        model_name: String,
        /// What the model was doing when it failed.
        context: String,
        /// The underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A model artifact exists but could not be turned into a session.
    #[error("failed to load model from {}: {context}", .path.display())]
    ModelLoad {
        /// Location of the artifact.
        path: std::path::PathBuf,
        /// What went wrong.
        context: String,
        /// The underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A component received input that violates its contract.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// A processing step failed for a reason other than bad input.
    #[error("{stage} failed: {context}")]
    Processing {
        /// Stage where the error occurred.
        stage: ProcessingStage,
        /// Additional context about the error.
        context: String,
        /// The underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The configuration is missing a value or holds an invalid one.
    #[error("configuration: {message}")]
    Config {
        /// A message describing the configuration error.
        message: String,
    },

    /// The upload was refused before reaching the pipeline.
    #[error("upload rejected: {message}")]
    UploadRejected {
        /// Why the upload was refused.
        message: String,
    },

    /// No prediction record exists under the given id.
    #[error("prediction not found: {id}")]
    NotFound {
        /// The id that was looked up.
        id: String,
    },

    /// The record exists but belongs to another owner.
    #[error("not authorized to view prediction {id}")]
    Forbidden {
        /// The id that was looked up.
        id: String,
    },

    /// Error from the ONNX Runtime session.
    #[error(transparent)]
    Session(#[from] ort::Error),

    /// Error from tensor reshaping.
    #[error("tensor shape error: {0}")]
    Tensor(#[from] ndarray::ShapeError),

    /// Error from JSON (de)serialization.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl DiagnosisError {
    /// Returns `true` when the failure is attributable to the caller's input.
    ///
    /// The HTTP collaborator maps these to 4xx responses and everything else
    /// to 5xx.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DiagnosisError::ImageDecode(_)
                | DiagnosisError::UploadRejected { .. }
                | DiagnosisError::NotFound { .. }
                | DiagnosisError::Forbidden { .. }
        )
    }
}

impl From<image::ImageError> for DiagnosisError {
    fn from(error: image::ImageError) -> Self {
        Self::ImageDecode(error)
    }
}

impl From<crate::core::config::ConfigError> for DiagnosisError {
    fn from(error: crate::core::config::ConfigError) -> Self {
        Self::Config {
            message: error.to_string(),
        }
    }
}

/// Plain message error used as a `source` when no richer error exists.
#[derive(Debug)]
pub struct SimpleError {
    message: String,
}

impl SimpleError {
    /// Creates a new simple error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for SimpleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for SimpleError {}
