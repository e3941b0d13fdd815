use super::*;
use crate::core::config::{OrtGraphOptimizationLevel, OrtSessionConfig};
use ort::logging::LogLevel;
use ort::session::builder::SessionBuilder;
use std::path::Path;

impl OrtInfer {
    /// Creates a new OrtInfer instance, applying the optional session configuration
    /// and building `pool_size` sessions for concurrent predictions.
    ///
    /// The input tensor name is read from the model rather than configured.
    pub fn from_config(
        model_path: impl AsRef<Path>,
        ort_config: Option<&OrtSessionConfig>,
        pool_size: usize,
    ) -> Result<Self, DiagnosisError> {
        let path = model_path.as_ref();
        let pool_size = pool_size.max(1);
        let mut sessions = Vec::with_capacity(pool_size);
        for _ in 0..pool_size {
            let builder = Session::builder()?;
            let builder = match ort_config {
                Some(cfg) => Self::apply_ort_config(builder, cfg)?,
                None => builder.with_log_level(LogLevel::Error)?,
            };
            let session = builder.commit_from_file(path).map_err(|e| {
                DiagnosisError::model_load_error(path, "failed to create ONNX session", e)
            })?;
            sessions.push(Mutex::new(session));
        }

        let input_name = sessions
            .first()
            .and_then(|s| s.lock().ok())
            .and_then(|s| s.inputs.first().map(|i| i.name.clone()))
            .ok_or_else(|| {
                DiagnosisError::model_load_error(
                    path,
                    "model declares no inputs",
                    crate::core::errors::SimpleError::new("missing input"),
                )
            })?;

        let model_name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown_model")
            .to_string();

        Ok(OrtInfer {
            sessions,
            next_idx: std::sync::atomic::AtomicUsize::new(0),
            input_name,
            model_path: path.to_path_buf(),
            model_name,
        })
    }

    fn apply_ort_config(
        mut builder: SessionBuilder,
        cfg: &OrtSessionConfig,
    ) -> Result<SessionBuilder, ort::Error> {
        builder = builder.with_log_level(LogLevel::Error)?;
        if let Some(intra) = cfg.intra_threads {
            builder = builder.with_intra_threads(intra)?;
        }
        if let Some(inter) = cfg.inter_threads {
            builder = builder.with_inter_threads(inter)?;
        }
        if let Some(par) = cfg.parallel_execution {
            builder = builder.with_parallel_execution(par)?;
        }
        if let Some(level) = cfg.optimization_level {
            use ort::session::builder::GraphOptimizationLevel as GOL;
            let mapped = match level {
                OrtGraphOptimizationLevel::DisableAll => GOL::Disable,
                OrtGraphOptimizationLevel::Level1 => GOL::Level1,
                OrtGraphOptimizationLevel::Level2 => GOL::Level2,
                OrtGraphOptimizationLevel::Level3 => GOL::Level3,
            };
            builder = builder.with_optimization_level(mapped)?;
        }
        Ok(builder)
    }
}
