//! The four-stage disease prediction pipeline.
//!
//! Each call runs normalize, classify, rank and resolve strictly in
//! sequence. A failure at any stage discards the work done for that image
//! and surfaces to the caller unchanged; nothing is retried.

use crate::core::config::PipelineConfig;
use crate::core::constants::DEFAULT_PARALLEL_THRESHOLD;
use crate::core::errors::{DiagnosisError, DiagnosisResult};
use crate::domain::prediction::{LabelConfidence, PredictionResult, Provenance, RankedPrediction};
use crate::domain::remediation::RemediationTable;
use crate::models::classification::{
    Classification, ClassifierAdapter, ModelHandle, ModelState, OrtModelLoader,
};
use crate::processors::{ImageNormalizer, ResultRanker};
use crate::utils::image::ImageSource;
use rayon::prelude::*;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error};

/// Image in, advisory out.
#[derive(Debug)]
pub struct DiseasePipeline {
    normalizer: ImageNormalizer,
    classifier: ClassifierAdapter,
    ranker: ResultRanker,
    remediation: &'static RemediationTable,
    parallel_threshold: usize,
}

impl DiseasePipeline {
    /// Assembles a pipeline from its stages.
    pub fn new(
        normalizer: ImageNormalizer,
        classifier: ClassifierAdapter,
        ranker: ResultRanker,
    ) -> Self {
        Self {
            normalizer,
            classifier,
            ranker,
            remediation: RemediationTable::global(),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }

    /// Builds a pipeline that loads its ONNX model from `config.model_path`
    /// on first use.
    pub fn from_config(config: &PipelineConfig) -> Self {
        let loader = Arc::new(OrtModelLoader::from_config(config));
        let handle = Arc::new(ModelHandle::new(loader, config.model_path.clone()));
        Self::with_classifier(config, ClassifierAdapter::new(handle))
    }

    /// Builds a pipeline around an existing classifier, taking the input
    /// geometry from `config`.
    pub fn with_classifier(config: &PipelineConfig, classifier: ClassifierAdapter) -> Self {
        Self::new(
            ImageNormalizer::from_config(config),
            classifier,
            ResultRanker::default(),
        )
    }

    /// Sets the batch size from which [`DiseasePipeline::predict_batch`] goes parallel.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold.max(1);
        self
    }

    /// Loads the model now instead of on the first prediction.
    pub fn warm_up(&self) -> ModelState {
        self.classifier.ensure_loaded();
        self.classifier.handle().state()
    }

    /// Current model state without triggering a load.
    pub fn model_state(&self) -> ModelState {
        self.classifier.handle().state()
    }

    /// Runs the full pipeline on one image.
    ///
    /// # Errors
    ///
    /// * [`DiagnosisError::ImageDecode`] if the image cannot be read; the
    ///   classifier is not invoked.
    /// * [`DiagnosisError::Inference`] if the model fails.
    /// * [`DiagnosisError::InvalidInput`] if the model output cannot be ranked.
    pub fn predict<'a>(
        &self,
        source: impl Into<ImageSource<'a>>,
    ) -> DiagnosisResult<PredictionResult> {
        let tensor = self.normalizer.normalize(source.into())?;
        let classification = self.classifier.classify(tensor)?;

        let (ranked, provenance) = match classification {
            Classification::Real(vector) => {
                let ranked = self.ranker.rank(&vector).inspect_err(|e| {
                    if matches!(e, DiagnosisError::InvalidInput { .. }) {
                        error!(error = %e, "Unexpected classifier output reached the ranker");
                    }
                })?;
                (ranked, Provenance::Model)
            }
            Classification::Mocked(pick) => (
                RankedPrediction {
                    top_label: pick.label,
                    confidence_percent: pick.confidence_percent,
                    ranked: vec![LabelConfidence {
                        label: pick.label,
                        confidence_percent: pick.confidence_percent,
                    }],
                },
                Provenance::Mock,
            ),
        };

        let advisory = self.remediation.resolve_class(ranked.top_label);
        debug!(
            label = %ranked.top_label,
            confidence = ranked.confidence_percent,
            ?provenance,
            "Prediction complete"
        );
        Ok(ranked.with_advisory(advisory, provenance))
    }

    /// Runs independent predictions over several files.
    ///
    /// Results keep the input order. Batches at or above the parallel
    /// threshold are spread over the rayon pool.
    pub fn predict_batch<P>(&self, paths: &[P]) -> Vec<DiagnosisResult<PredictionResult>>
    where
        P: AsRef<Path> + Sync,
    {
        if paths.len() >= self.parallel_threshold {
            debug!("Predicting {} images in parallel", paths.len());
            paths
                .par_iter()
                .map(|path| self.predict(path.as_ref()))
                .collect()
        } else {
            debug!("Predicting {} images sequentially", paths.len());
            paths.iter().map(|path| self.predict(path.as_ref())).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tensor::Tensor4D;
    use crate::core::traits::ClassificationModel;
    use crate::domain::labels::DiseaseClass;
    use crate::models::classification::MOCK_PREDICTIONS;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    #[derive(Debug)]
    struct FixedScores(Vec<f32>);

    impl ClassificationModel for FixedScores {
        fn model_name(&self) -> &str {
            "fixed"
        }

        fn forward(&self, _input: &Tensor4D) -> DiagnosisResult<Vec<f32>> {
            Ok(self.0.clone())
        }
    }

    fn leaf_png() -> Vec<u8> {
        let img = RgbImage::from_fn(64, 48, |x, y| {
            Rgb([40, 120 + (x % 60) as u8, (y * 2) as u8])
        });
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    fn pipeline_with(model: FixedScores) -> DiseasePipeline {
        let handle = Arc::new(ModelHandle::preloaded(Arc::new(model)));
        DiseasePipeline::with_classifier(&PipelineConfig::default(), ClassifierAdapter::new(handle))
    }

    #[test]
    fn test_real_prediction_carries_advisory() {
        let mut scores = vec![0.0; DiseaseClass::COUNT];
        scores[DiseaseClass::GrapeBlackRot.index()] = 0.734;
        let bytes = leaf_png();

        let result = pipeline_with(FixedScores(scores))
            .predict(bytes.as_slice())
            .unwrap();
        assert_eq!(result.top_label, DiseaseClass::GrapeBlackRot);
        assert_eq!(result.confidence_percent, 73);
        assert_eq!(
            result.advisory,
            "Remove affected berries. Apply fungicide. Improve pruning."
        );
        assert_eq!(result.provenance, Provenance::Model);
        assert_eq!(result.ranked.len(), DiseaseClass::COUNT);
    }

    #[test]
    fn test_short_model_output_is_invalid_input() {
        let bytes = leaf_png();
        let err = pipeline_with(FixedScores(vec![0.4, 0.6]))
            .predict(bytes.as_slice())
            .unwrap_err();
        assert!(matches!(err, DiagnosisError::InvalidInput { .. }));
    }

    #[test]
    fn test_mock_prediction_is_flagged() {
        let handle = Arc::new(ModelHandle::without_model());
        let pipeline = DiseasePipeline::with_classifier(
            &PipelineConfig::default(),
            ClassifierAdapter::with_seed(handle, 3),
        );
        let bytes = leaf_png();

        let result = pipeline.predict(bytes.as_slice()).unwrap();
        assert!(result.is_mocked());
        assert!(MOCK_PREDICTIONS.iter().any(|p| p.label == result.top_label
            && p.confidence_percent == result.confidence_percent));
        assert_eq!(result.ranked.len(), 1);
        assert_eq!(
            result.advisory,
            RemediationTable::global().resolve_class(result.top_label)
        );
    }

    #[test]
    fn test_warm_up_settles_state() {
        let config = PipelineConfig::default().with_model_path("./missing/plant_disease.onnx");
        let pipeline = DiseasePipeline::from_config(&config);
        assert_eq!(pipeline.model_state(), ModelState::Uninitialized);
        assert_eq!(pipeline.warm_up(), ModelState::WithoutModel);
    }

    #[test]
    fn test_batch_keeps_order_in_both_modes() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("leaf.png");
        let bad = dir.path().join("notes.png");
        std::fs::write(&good, leaf_png()).unwrap();
        std::fs::write(&bad, b"just some text").unwrap();
        let paths = vec![good.clone(), bad.clone(), good.clone(), bad];

        let mut scores = vec![0.0; DiseaseClass::COUNT];
        scores[DiseaseClass::CornCommonRust.index()] = 0.9;

        for threshold in [1, 100] {
            let results = pipeline_with(FixedScores(scores.clone()))
                .with_parallel_threshold(threshold)
                .predict_batch(&paths);
            assert_eq!(results.len(), 4);
            assert!(results[0].is_ok());
            assert!(matches!(results[1], Err(DiagnosisError::ImageDecode(_))));
            assert!(results[2].is_ok());
            assert!(matches!(results[3], Err(DiagnosisError::ImageDecode(_))));
        }
    }
}
