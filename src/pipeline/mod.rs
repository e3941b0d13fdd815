//! The disease prediction pipeline and the service around it.
//!
//! [`DiseasePipeline`] runs the four stages on one image.
//! [`PredictionService`] adds upload validation, file storage and record
//! persistence on top.

pub mod disease;
pub mod service;
pub mod store;
pub mod upload;

pub use disease::DiseasePipeline;
pub use service::PredictionService;
pub use store::{InMemoryPredictionStore, PredictionStore};
pub use upload::{StoredUpload, UploadPolicy, UploadStore};
