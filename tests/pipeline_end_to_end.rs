//! End-to-end checks of the prediction pipeline and service.

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use leaf_doctor::core::traits::{ClassificationModel, ModelLoader};
use leaf_doctor::core::{DiagnosisResult, Tensor4D};
use leaf_doctor::models::{ClassifierAdapter, ModelHandle, ModelState};
use leaf_doctor::prelude::*;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Scores 0.92 for Tomato early blight and counts forward passes.
#[derive(Debug, Default)]
struct EarlyBlightModel {
    calls: AtomicUsize,
}

impl ClassificationModel for EarlyBlightModel {
    fn model_name(&self) -> &str {
        "early_blight_stub"
    }

    fn forward(&self, input: &Tensor4D) -> DiagnosisResult<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(input.shape(), &[1, 224, 224, 3]);
        let mut scores = vec![0.002; DiseaseClass::COUNT];
        scores[DiseaseClass::TomatoEarlyBlight.index()] = 0.92;
        Ok(scores)
    }
}

/// Hands out one shared model and counts load attempts.
#[derive(Debug)]
struct StubLoader {
    model: Arc<EarlyBlightModel>,
    attempts: AtomicUsize,
}

impl ModelLoader for StubLoader {
    fn load(&self, _path: &Path) -> DiagnosisResult<Option<Arc<dyn ClassificationModel>>> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Ok(Some(self.model.clone()))
    }
}

fn leaf_image(format: ImageFormat) -> Vec<u8> {
    let img = RgbImage::from_fn(320, 240, |x, y| {
        Rgb([60 + (x % 80) as u8, 140, 30 + (y % 100) as u8])
    });
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img).write_to(&mut buf, format).unwrap();
    buf.into_inner()
}

fn stubbed_pipeline() -> (DiseasePipeline, Arc<StubLoader>) {
    let loader = Arc::new(StubLoader {
        model: Arc::new(EarlyBlightModel::default()),
        attempts: AtomicUsize::new(0),
    });
    let handle = Arc::new(ModelHandle::new(loader.clone(), "stub.onnx"));
    let pipeline =
        DiseasePipeline::with_classifier(&PipelineConfig::default(), ClassifierAdapter::new(handle));
    (pipeline, loader)
}

#[test]
fn early_blight_leaf_yields_expected_result() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tomato_leaf.jpg");
    std::fs::write(&path, leaf_image(ImageFormat::Jpeg)).unwrap();

    let (pipeline, loader) = stubbed_pipeline();
    let result = pipeline.predict(path.as_path()).unwrap();

    assert_eq!(result.top_label.as_str(), "Tomato___Early_blight");
    assert_eq!(result.confidence_percent, 92);
    assert_eq!(
        result.advisory,
        "Remove lower leaves. Apply fungicide. Improve air circulation."
    );
    assert_eq!(result.provenance, Provenance::Model);
    assert_eq!(loader.attempts.load(Ordering::SeqCst), 1);
}

#[test]
fn non_image_file_fails_before_classification() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("leaf.png");
    std::fs::write(&path, "this is a shopping list, not a leaf").unwrap();

    let (pipeline, loader) = stubbed_pipeline();
    let err = pipeline.predict(path.as_path()).unwrap_err();

    assert!(matches!(err, DiagnosisError::ImageDecode(_)));
    assert!(err.is_client_error());
    assert_eq!(loader.model.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn repeated_warm_up_loads_once() {
    let (pipeline, loader) = stubbed_pipeline();
    for _ in 0..4 {
        assert_eq!(pipeline.warm_up(), ModelState::WithModel);
    }
    let bytes = leaf_image(ImageFormat::Png);
    pipeline.predict(bytes.as_slice()).unwrap();
    assert_eq!(loader.attempts.load(Ordering::SeqCst), 1);
}

#[test]
fn missing_model_serves_flagged_mock_results() {
    let dir = tempfile::tempdir().unwrap();
    let config = PipelineConfig::default()
        .with_model_path(dir.path().join("absent.onnx"))
        .with_upload_dir(dir.path().join("uploads"));
    let pipeline = Arc::new(DiseasePipeline::from_config(&config));
    let service = PredictionService::new(
        &config,
        pipeline.clone(),
        Arc::new(InMemoryPredictionStore::new()),
    );

    let response = service
        .submit("grower-7", "leaf.png", &leaf_image(ImageFormat::Png))
        .unwrap();
    assert_eq!(pipeline.model_state(), ModelState::WithoutModel);
    assert_eq!(response.provenance, Provenance::Mock);
    let canned = [
        "Tomato___Early_blight",
        "Tomato___Bacterial_spot",
        "Apple___healthy",
    ];
    assert!(canned.contains(&response.record.disease_label.as_str()));
}

#[test]
fn service_round_trip_serializes_response() {
    let dir = tempfile::tempdir().unwrap();
    let config = PipelineConfig::default().with_upload_dir(dir.path());
    let (pipeline, _) = stubbed_pipeline();
    let service = PredictionService::new(
        &config,
        Arc::new(pipeline),
        Arc::new(InMemoryPredictionStore::new()),
    );

    let first = service
        .submit("alice", "first.jpg", &leaf_image(ImageFormat::Jpeg))
        .unwrap();
    let second = service
        .submit("alice", "second.png", &leaf_image(ImageFormat::Png))
        .unwrap();

    let json = serde_json::to_value(&second).unwrap();
    assert_eq!(json["disease"], "Tomato___Early_blight");
    assert_eq!(json["confidence"], 92);
    assert_eq!(json["userId"], "alice");
    assert_eq!(json["provenance"], "model");
    assert!(json["imageUrl"].as_str().unwrap().starts_with("/uploads/"));
    assert_eq!(
        json["allPredictions"].as_array().unwrap().len(),
        DiseaseClass::COUNT
    );

    let history = service.history("alice").unwrap();
    assert_eq!(history.len(), 2);
    assert!(history[0].created_at >= history[1].created_at);
    assert!(history.iter().any(|r| r.id == first.record.id));
    assert!(service.history("bob").unwrap().is_empty());

    let id = first.record.id.to_string();
    assert!(matches!(
        service.get("bob", &id),
        Err(DiagnosisError::Forbidden { .. })
    ));
}

#[test]
fn failed_prediction_removes_stored_upload() {
    #[derive(Debug)]
    struct BrokenModel;

    impl ClassificationModel for BrokenModel {
        fn model_name(&self) -> &str {
            "broken"
        }

        fn forward(&self, _input: &Tensor4D) -> DiagnosisResult<Vec<f32>> {
            Err(DiagnosisError::Io(std::io::Error::other("accelerator reset")))
        }
    }

    let dir = tempfile::tempdir().unwrap();
    let config = PipelineConfig::default().with_upload_dir(dir.path());
    let handle = Arc::new(ModelHandle::preloaded(Arc::new(BrokenModel)));
    let pipeline = Arc::new(DiseasePipeline::with_classifier(
        &config,
        ClassifierAdapter::new(handle),
    ));
    let store = Arc::new(InMemoryPredictionStore::new());
    let service = PredictionService::new(&config, pipeline, store.clone());

    let err = service
        .submit("alice", "leaf.png", &leaf_image(ImageFormat::Png))
        .unwrap_err();
    assert!(matches!(err, DiagnosisError::Inference { .. }));
    assert!(!err.is_client_error());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    assert!(store.is_empty().unwrap());
}
