//! Upload-to-record flow around the pipeline.
//!
//! The service validates and stores the upload, runs the pipeline on the
//! stored file and persists the outcome. When anything after the upload was
//! stored fails, the file is deleted before the error is returned.

use super::disease::DiseasePipeline;
use super::store::PredictionStore;
use super::upload::{UploadPolicy, UploadStore};
use crate::core::config::PipelineConfig;
use crate::core::errors::{DiagnosisError, DiagnosisResult};
use crate::domain::record::{PredictionRecord, PredictionResponse};
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

/// Entry point used by the outer request layer.
#[derive(Debug)]
pub struct PredictionService {
    pipeline: Arc<DiseasePipeline>,
    store: Arc<dyn PredictionStore>,
    policy: UploadPolicy,
    uploads: UploadStore,
    history_limit: usize,
}

impl PredictionService {
    /// Creates a service with the upload limits and directory of `config`.
    pub fn new(
        config: &PipelineConfig,
        pipeline: Arc<DiseasePipeline>,
        store: Arc<dyn PredictionStore>,
    ) -> Self {
        Self {
            pipeline,
            store,
            policy: UploadPolicy::new(config.max_upload_bytes),
            uploads: UploadStore::new(config.upload_dir.clone()),
            history_limit: config.history_limit,
        }
    }

    /// The pipeline predictions run through.
    pub fn pipeline(&self) -> &DiseasePipeline {
        &self.pipeline
    }

    /// Classifies an uploaded leaf photo for `owner_id` and stores the result.
    ///
    /// # Errors
    ///
    /// * [`DiagnosisError::UploadRejected`] before anything is written.
    /// * Any pipeline or persistence error, after the stored upload was removed.
    pub fn submit(
        &self,
        owner_id: &str,
        original_name: &str,
        bytes: &[u8],
    ) -> DiagnosisResult<PredictionResponse> {
        let format = self.policy.check(bytes)?;
        let upload = self.uploads.save(original_name, format, bytes)?;

        let outcome = self.pipeline.predict(upload.path.as_path()).and_then(|result| {
            let record = PredictionRecord::from_result(owner_id, &upload.reference, &result);
            self.store.insert(record.clone())?;
            Ok(PredictionResponse::new(record, result))
        });

        match outcome {
            Ok(response) => {
                info!(
                    owner = owner_id,
                    id = %response.record.id,
                    label = %response.record.disease_label,
                    confidence = response.record.confidence_percent,
                    "Prediction stored"
                );
                Ok(response)
            }
            Err(e) => {
                error!(owner = owner_id, error = %e, "Prediction failed");
                self.uploads.remove(&upload);
                Err(e)
            }
        }
    }

    /// The owner's records, newest first.
    pub fn history(&self, owner_id: &str) -> DiagnosisResult<Vec<PredictionRecord>> {
        self.store.list_for_owner(owner_id, self.history_limit)
    }

    /// One record, visible only to its owner.
    ///
    /// # Errors
    ///
    /// [`DiagnosisError::NotFound`] for unknown or malformed ids,
    /// [`DiagnosisError::Forbidden`] when the record belongs to someone else.
    pub fn get(&self, owner_id: &str, id: &str) -> DiagnosisResult<PredictionRecord> {
        let not_found = || DiagnosisError::NotFound { id: id.to_string() };
        let uuid = Uuid::parse_str(id).map_err(|_| not_found())?;
        let record = self.store.find(uuid)?.ok_or_else(not_found)?;
        if record.owner_id != owner_id {
            return Err(DiagnosisError::Forbidden { id: id.to_string() });
        }
        Ok(record)
    }
}
