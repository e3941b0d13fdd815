//! Decoding and resizing of leaf photos into model input tensors.

use crate::core::config::PipelineConfig;
use crate::core::constants::DEFAULT_INPUT_SIZE;
use crate::core::errors::DiagnosisResult;
use crate::core::tensor::Tensor4D;
use crate::processors::normalization::NormalizeImage;
use crate::processors::types::ChannelOrder;
use crate::utils::image::{ImageSource, decode_source};
use image::DynamicImage;
use image::imageops::FilterType;

/// Turns an encoded image into a `(1, size, size, 3)` tensor with values in `[0, 1]`.
///
/// The image is scaled to cover the square target and the overflow is
/// cropped evenly from both sides, so the aspect ratio is preserved.
#[derive(Debug, Clone)]
pub struct ImageNormalizer {
    input_size: u32,
    filter: FilterType,
    normalizer: NormalizeImage,
}

impl ImageNormalizer {
    /// Creates a normalizer for a square input of `input_size` pixels.
    pub fn new(input_size: u32, order: ChannelOrder) -> Self {
        Self {
            input_size,
            filter: FilterType::Lanczos3,
            normalizer: NormalizeImage::unit_range(order),
        }
    }

    /// Creates a normalizer matching the configured input geometry.
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.input_size, config.channel_order)
    }

    /// Replaces the pixel normalization applied after resizing.
    pub fn with_normalizer(mut self, normalizer: NormalizeImage) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Replaces the resampling filter.
    pub fn with_filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }

    /// Side length of the produced square.
    pub fn input_size(&self) -> u32 {
        self.input_size
    }

    /// Decodes and normalizes an image from a path or byte buffer.
    ///
    /// # Errors
    ///
    /// [`DiagnosisError::ImageDecode`](crate::core::DiagnosisError::ImageDecode)
    /// if the source is unreadable or not a raster image.
    pub fn normalize(&self, source: ImageSource<'_>) -> DiagnosisResult<Tensor4D> {
        let image = decode_source(source)?;
        self.normalize_image(&image)
    }

    /// Normalizes an already decoded image.
    pub fn normalize_image(&self, image: &DynamicImage) -> DiagnosisResult<Tensor4D> {
        let covered = image.resize_to_fill(self.input_size, self.input_size, self.filter);
        self.normalizer.normalize_to_batch(&covered.to_rgb8())
    }
}

impl Default for ImageNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_INPUT_SIZE, ChannelOrder::HWC)
    }
}
