//! Image and score processing for the prediction pipeline.
//!
//! # Modules
//!
//! * `image_normalizer` - Decode, cover-resize and normalize leaf photos
//! * `normalization` - Pixel scaling into batch tensors
//! * `ranking` - Arg-max selection and percentage rounding
//! * `types` - Type definitions used across the processors module

pub mod image_normalizer;
mod normalization;
pub mod ranking;
pub mod types;

pub use image_normalizer::ImageNormalizer;
pub use normalization::*;
pub use ranking::{ResultRanker, argmax, to_percent};
pub use types::*;
