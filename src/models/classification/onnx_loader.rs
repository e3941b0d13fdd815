//! Loads classification models from ONNX artifacts on disk.

use crate::core::config::{OrtSessionConfig, PipelineConfig};
use crate::core::errors::DiagnosisResult;
use crate::core::inference::OrtInfer;
use crate::core::traits::{ClassificationModel, ModelLoader};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// [`ModelLoader`] backed by ONNX Runtime.
///
/// A path that does not point at a regular file is reported as absent
/// (`Ok(None)`), anything ONNX Runtime refuses to open is an error.
#[derive(Debug, Clone, Default)]
pub struct OrtModelLoader {
    ort_session: Option<OrtSessionConfig>,
    pool_size: usize,
}

impl OrtModelLoader {
    /// Creates a loader building `pool_size` sessions per model.
    pub fn new(ort_session: Option<OrtSessionConfig>, pool_size: usize) -> Self {
        Self {
            ort_session,
            pool_size: pool_size.max(1),
        }
    }

    /// Creates a loader with the session settings of `config`.
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.ort_session.clone(), config.session_pool_size)
    }
}

impl ModelLoader for OrtModelLoader {
    fn load(&self, path: &Path) -> DiagnosisResult<Option<Arc<dyn ClassificationModel>>> {
        if !path.is_file() {
            debug!(path = %path.display(), "No model artifact at path");
            return Ok(None);
        }
        let infer = OrtInfer::from_config(path, self.ort_session.as_ref(), self.pool_size)?;
        if let Some(classes) = infer.declared_num_classes() {
            debug!(model = infer.model_name(), classes, "Model output width");
        }
        Ok(Some(Arc::new(infer)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_path_is_absent_not_error() {
        let loader = OrtModelLoader::default();
        let loaded = loader.load(Path::new("./no/such/model.onnx")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_directory_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = OrtModelLoader::new(None, 2).load(dir.path()).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_unreadable_artifact_is_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), b"not a graph").unwrap();
        assert!(OrtModelLoader::new(None, 1).load(file.path()).is_err());
    }

    #[test]
    fn test_pool_size_floor() {
        let config = PipelineConfig {
            session_pool_size: 0,
            ..PipelineConfig::default()
        };
        assert_eq!(OrtModelLoader::from_config(&config).pool_size, 1);
    }
}
