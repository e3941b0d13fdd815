//! Persisted prediction records and the response payload built from them.

use crate::domain::labels::DiseaseClass;
use crate::domain::prediction::{LabelConfidence, PredictionResult, Provenance};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One stored prediction, keyed to its owner and the uploaded image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRecord {
    pub id: Uuid,
    #[serde(rename = "userId")]
    pub owner_id: String,
    #[serde(rename = "disease")]
    pub disease_label: DiseaseClass,
    #[serde(rename = "confidence")]
    pub confidence_percent: u8,
    #[serde(rename = "imageUrl")]
    pub image_reference: String,
    #[serde(rename = "suggestion")]
    pub advisory: String,
    pub created_at: DateTime<Utc>,
}

impl PredictionRecord {
    /// Builds a fresh record for `owner_id` from a pipeline result.
    pub fn from_result(
        owner_id: impl Into<String>,
        image_reference: impl Into<String>,
        result: &PredictionResult,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id: owner_id.into(),
            disease_label: result.top_label,
            confidence_percent: result.confidence_percent,
            image_reference: image_reference.into(),
            advisory: result.advisory.clone(),
            created_at: Utc::now(),
        }
    }
}

/// Payload returned to the HTTP layer after a successful prediction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResponse {
    #[serde(flatten)]
    pub record: PredictionRecord,
    #[serde(rename = "allPredictions")]
    pub ranked: Vec<LabelConfidence>,
    pub provenance: Provenance,
}

impl PredictionResponse {
    /// Combines a stored record with the per-class breakdown of its result.
    pub fn new(record: PredictionRecord, result: PredictionResult) -> Self {
        Self {
            record,
            ranked: result.ranked,
            provenance: result.provenance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> PredictionResult {
        PredictionResult {
            top_label: DiseaseClass::TomatoEarlyBlight,
            confidence_percent: 92,
            advisory: "Remove lower leaves. Apply fungicide. Improve air circulation.".into(),
            ranked: vec![LabelConfidence {
                label: DiseaseClass::TomatoEarlyBlight,
                confidence_percent: 92,
            }],
            provenance: Provenance::Model,
        }
    }

    #[test]
    fn test_record_copies_result_fields() {
        let result = sample_result();
        let record = PredictionRecord::from_result("user-1", "/uploads/a.png", &result);
        assert_eq!(record.owner_id, "user-1");
        assert_eq!(record.disease_label, DiseaseClass::TomatoEarlyBlight);
        assert_eq!(record.confidence_percent, 92);
        assert_eq!(record.image_reference, "/uploads/a.png");
        assert_eq!(record.advisory, result.advisory);
    }

    #[test]
    fn test_response_json_shape() {
        let result = sample_result();
        let record = PredictionRecord::from_result("user-1", "/uploads/a.png", &result);
        let response = PredictionResponse::new(record, result);
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["userId"], "user-1");
        assert_eq!(value["disease"], "Tomato___Early_blight");
        assert_eq!(value["confidence"], 92);
        assert_eq!(value["imageUrl"], "/uploads/a.png");
        assert_eq!(value["provenance"], "model");
        assert_eq!(value["allPredictions"][0]["disease"], "Tomato___Early_blight");
        assert!(value.get("createdAt").is_some());
    }
}
