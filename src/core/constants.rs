//! Constants used throughout the pipeline.

/// The side length of the square model input, in pixels.
pub const DEFAULT_INPUT_SIZE: u32 = 224;

/// Number of color channels fed to the model (RGB).
pub const INPUT_CHANNELS: usize = 3;

/// Default location of the model artifact.
pub const DEFAULT_MODEL_PATH: &str = "./models/plant_disease.onnx";

/// Default upload size limit (5 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5_242_880;

/// Default directory uploaded images are written to.
pub const DEFAULT_UPLOAD_DIR: &str = "./uploads";

/// URL prefix under which stored uploads are served back to clients.
pub const UPLOAD_URL_PREFIX: &str = "/uploads";

/// Maximum number of records returned by a history query.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Advisory returned for labels missing from the remediation table.
pub const FALLBACK_ADVISORY: &str = "Consult agricultural expert.";

/// Batch size from which batch prediction runs in parallel.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 4;
