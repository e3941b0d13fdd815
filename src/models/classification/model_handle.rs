//! Lazily loaded, process-wide model state.

use crate::core::traits::{ClassificationModel, ModelLoader};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Observable state of a [`ModelHandle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelState {
    /// No load has completed yet.
    Uninitialized,
    /// A model was loaded and real inference is available.
    WithModel,
    /// No usable artifact was found; classification falls back to canned results.
    WithoutModel,
}

/// Owns the one-time transition from "not loaded" to "loaded".
///
/// The handle is shared by reference between every classifier that needs
/// it. The first call to [`ModelHandle::ensure_loaded`] runs the loader;
/// concurrent callers block until that load finishes and then observe the
/// same outcome. The state never goes back to [`ModelState::Uninitialized`].
#[derive(Debug)]
pub struct ModelHandle {
    loader: Arc<dyn ModelLoader>,
    model_path: PathBuf,
    cell: OnceCell<Option<Arc<dyn ClassificationModel>>>,
}

impl ModelHandle {
    /// Creates an unloaded handle for the artifact at `model_path`.
    pub fn new(loader: Arc<dyn ModelLoader>, model_path: impl Into<PathBuf>) -> Self {
        Self {
            loader,
            model_path: model_path.into(),
            cell: OnceCell::new(),
        }
    }

    /// Creates a handle that is already loaded with `model`.
    pub fn preloaded(model: Arc<dyn ClassificationModel>) -> Self {
        let handle = Self::new(Arc::new(NoArtifactLoader), PathBuf::new());
        let _ = handle.cell.set(Some(model));
        handle
    }

    /// Creates a handle that is already in mock mode.
    pub fn without_model() -> Self {
        let handle = Self::new(Arc::new(NoArtifactLoader), PathBuf::new());
        let _ = handle.cell.set(None);
        handle
    }

    /// Location the loader is pointed at.
    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    /// Loads the model on first use and returns it, or `None` in mock mode.
    ///
    /// Never fails: a missing or unreadable artifact is logged and the handle
    /// settles in [`ModelState::WithoutModel`].
    pub fn ensure_loaded(&self) -> Option<Arc<dyn ClassificationModel>> {
        self.cell
            .get_or_init(|| {
                info!(path = %self.model_path.display(), "Loading classification model");
                match self.loader.load(&self.model_path) {
                    Ok(Some(model)) => {
                        info!(
                            model = model.model_name(),
                            "Classification model loaded"
                        );
                        Some(model)
                    }
                    Ok(None) => {
                        warn!(
                            path = %self.model_path.display(),
                            "Model artifact not found, predictions will be mocked"
                        );
                        None
                    }
                    Err(e) => {
                        warn!(
                            path = %self.model_path.display(),
                            error = %e,
                            "Model artifact could not be loaded, predictions will be mocked"
                        );
                        None
                    }
                }
            })
            .clone()
    }

    /// Current state without triggering a load.
    pub fn state(&self) -> ModelState {
        match self.cell.get() {
            None => ModelState::Uninitialized,
            Some(Some(_)) => ModelState::WithModel,
            Some(None) => ModelState::WithoutModel,
        }
    }

    /// Whether a real model is available, loading it first if needed.
    pub fn is_model_available(&self) -> bool {
        self.ensure_loaded().is_some()
    }
}

/// Loader that never finds an artifact.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoArtifactLoader;

impl ModelLoader for NoArtifactLoader {
    fn load(
        &self,
        _path: &Path,
    ) -> crate::core::errors::DiagnosisResult<Option<Arc<dyn ClassificationModel>>> {
        Ok(None)
    }
}
