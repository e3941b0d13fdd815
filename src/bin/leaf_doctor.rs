//! Leaf Doctor command-line interface
//!
//! Classifies leaf photos through the prediction service and prints the
//! JSON response for each image.
//!
//! # Usage
//!
//! ```bash
//! leaf-doctor [OPTIONS] <IMAGES>...
//! ```
//!
//! # Arguments
//!
//! * `-m, --model-path` - Path to the ONNX model (default: `MODEL_PATH` or `./models/plant_disease.onnx`)
//! * `-c, --config` - JSON configuration file
//! * `-u, --user` - Owner id recorded with each prediction
//! * `--upload-dir` - Directory uploads are copied into
//! * `--seed` - Seed for mock predictions when no model is available
//! * `<IMAGES>...` - Leaf photos to classify
//!
//! # Example
//!
//! ```bash
//! RUST_LOG=info leaf-doctor -m models/plant_disease.onnx tomato_leaf.jpg
//! ```

use clap::Parser;
use leaf_doctor::core::init_tracing;
use leaf_doctor::models::{ClassifierAdapter, ModelHandle, ModelState, OrtModelLoader};
use leaf_doctor::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Command-line arguments for the leaf disease classifier
#[derive(Parser)]
#[command(name = "leaf-doctor")]
#[command(about = "Plant leaf disease classification - predicts the disease and suggests a remedy")]
struct Args {
    /// Path to the ONNX model file
    #[arg(short, long)]
    model_path: Option<PathBuf>,

    /// JSON configuration file; environment variables are used when absent
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Owner id recorded with each prediction
    #[arg(short, long, default_value = "local")]
    user: String,

    /// Directory uploads are copied into
    #[arg(long)]
    upload_dir: Option<PathBuf>,

    /// Session pool size for concurrent inference
    #[arg(long)]
    session_pool_size: Option<usize>,

    /// Seed for mock predictions
    #[arg(long)]
    seed: Option<u64>,

    /// Leaf photos to classify
    #[arg(required = true)]
    images: Vec<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::from_env()?,
    };
    if let Some(path) = args.model_path {
        config = config.with_model_path(path);
    }
    if let Some(dir) = args.upload_dir {
        config = config.with_upload_dir(dir);
    }
    if let Some(size) = args.session_pool_size {
        config.session_pool_size = size;
    }

    let loader = Arc::new(OrtModelLoader::from_config(&config));
    let handle = Arc::new(ModelHandle::new(loader, config.model_path.clone()));
    let classifier = match args.seed {
        Some(seed) => ClassifierAdapter::with_seed(handle, seed),
        None => ClassifierAdapter::new(handle),
    };
    let pipeline = Arc::new(DiseasePipeline::with_classifier(&config, classifier));

    match pipeline.warm_up() {
        ModelState::WithModel => info!("Model ready: {}", config.model_path.display()),
        _ => warn!("Running in mock mode, results are placeholders"),
    }

    let service = PredictionService::new(&config, pipeline, Arc::new(InMemoryPredictionStore::new()));

    let mut failures = 0usize;
    for path in &args.images {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload");
        let outcome = std::fs::read(path)
            .map_err(DiagnosisError::from)
            .and_then(|bytes| service.submit(&args.user, name, &bytes));
        match outcome {
            Ok(response) => println!("{}", serde_json::to_string_pretty(&response)?),
            Err(e) => {
                failures += 1;
                error!("Failed to classify {}: {}", path.display(), e);
            }
        }
    }

    info!(
        "Processed {} images, {} failed",
        args.images.len(),
        failures
    );
    if failures == args.images.len() {
        return Err("No image could be classified".into());
    }
    Ok(())
}
