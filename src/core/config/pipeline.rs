//! Runtime configuration for the prediction pipeline and service.

use super::errors::{ConfigError, ConfigValidator};
use super::onnx::OrtSessionConfig;
use crate::core::constants::{
    DEFAULT_HISTORY_LIMIT, DEFAULT_INPUT_SIZE, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_MODEL_PATH,
    DEFAULT_UPLOAD_DIR,
};
use crate::core::errors::DiagnosisResult;
use crate::processors::ChannelOrder;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the model artifact.
pub const ENV_MODEL_PATH: &str = "MODEL_PATH";
/// Environment variable holding the upload size limit in bytes.
pub const ENV_MAX_FILE_SIZE: &str = "MAX_FILE_SIZE";
/// Environment variable naming the upload directory.
pub const ENV_UPLOAD_DIR: &str = "UPLOAD_DIR";

/// Settings consumed by the pipeline, the upload store and the history queries.
///
/// Every field has a default, so a JSON file only needs the keys it overrides:
///
/// ```rust
/// use leaf_doctor::core::config::PipelineConfig;
///
/// let config: PipelineConfig = serde_json::from_str(r#"{ "input_size": 256 }"#).unwrap();
/// assert_eq!(config.input_size, 256);
/// assert_eq!(config.history_limit, 50);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Location of the ONNX model artifact.
    pub model_path: PathBuf,
    /// Largest accepted upload, in bytes.
    pub max_upload_bytes: usize,
    /// Directory accepted uploads are written to.
    pub upload_dir: PathBuf,
    /// Side length of the square model input.
    pub input_size: u32,
    /// Layout of the input tensor expected by the model.
    pub channel_order: ChannelOrder,
    /// Maximum number of records returned by a history query.
    pub history_limit: usize,
    /// Number of ONNX Runtime sessions shared round-robin.
    pub session_pool_size: usize,
    /// Optional ONNX Runtime tuning.
    pub ort_session: Option<OrtSessionConfig>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            input_size: DEFAULT_INPUT_SIZE,
            channel_order: ChannelOrder::HWC,
            history_limit: DEFAULT_HISTORY_LIMIT,
            session_pool_size: 1,
            ort_session: None,
        }
    }
}

impl PipelineConfig {
    /// Builds a configuration from the process environment on top of the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup on top of the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(path) = lookup(ENV_MODEL_PATH).filter(|v| !v.trim().is_empty()) {
            config.model_path = PathBuf::from(path);
        }
        if let Some(raw) = lookup(ENV_MAX_FILE_SIZE) {
            config.max_upload_bytes =
                raw.trim()
                    .parse::<usize>()
                    .map_err(|_| ConfigError::InvalidEnv {
                        var: ENV_MAX_FILE_SIZE,
                        value: raw.clone(),
                    })?;
        }
        if let Some(dir) = lookup(ENV_UPLOAD_DIR).filter(|v| !v.trim().is_empty()) {
            config.upload_dir = PathBuf::from(dir);
        }
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> DiagnosisResult<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the model path.
    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = path.into();
        self
    }

    /// Sets the upload directory.
    pub fn with_upload_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.upload_dir = dir.into();
        self
    }

    /// Sets the upload size limit.
    pub fn with_max_upload_bytes(mut self, bytes: usize) -> Self {
        self.max_upload_bytes = bytes;
        self
    }
}

impl ConfigValidator for PipelineConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.model_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingValue {
                field: "model_path",
            });
        }
        if self.upload_dir.as_os_str().is_empty() {
            return Err(ConfigError::MissingValue {
                field: "upload_dir",
            });
        }
        self.validate_image_dimensions(self.input_size, self.input_size)?;
        self.validate_positive("max_upload_bytes", self.max_upload_bytes)?;
        self.validate_positive("history_limit", self.history_limit)?;
        self.validate_positive("session_pool_size", self.session_pool_size)?;
        if let Some(ort) = &self.ort_session {
            if let Some(threads) = ort.intra_threads {
                self.validate_thread_count(threads)?;
            }
            if let Some(threads) = ort.inter_threads {
                self.validate_thread_count(threads)?;
            }
        }
        Ok(())
    }
}
