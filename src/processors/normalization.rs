//! Pixel normalization into model input tensors.

use crate::core::constants::INPUT_CHANNELS;
use crate::core::errors::DiagnosisError;
use crate::core::tensor::Tensor4D;
use crate::processors::types::ChannelOrder;
use image::RgbImage;
use ndarray::Array4;

/// Converts RGB pixels into a single-item batch tensor.
///
/// Each channel value becomes `(pixel / divisor - mean) / std`. The defaults
/// (`divisor` 255, `mean` 0, `std` 1) map the byte range onto `[0.0, 1.0]`.
#[derive(Debug, Clone)]
pub struct NormalizeImage {
    /// Value every byte is divided by before mean/std are applied.
    pub divisor: f32,
    /// Mean subtracted per channel (RGB order).
    pub mean: [f32; 3],
    /// Standard deviation divided out per channel (RGB order).
    pub std: [f32; 3],
    /// Channel ordering of the produced tensor.
    pub order: ChannelOrder,
}

impl NormalizeImage {
    /// Creates a new NormalizeImage instance with the specified parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the divisor or any standard deviation is not a
    /// positive finite number, or if a mean is not finite.
    pub fn new(
        divisor: f32,
        mean: [f32; 3],
        std: [f32; 3],
        order: ChannelOrder,
    ) -> Result<Self, DiagnosisError> {
        if !(divisor.is_finite() && divisor > 0.0) {
            return Err(DiagnosisError::config_error(format!(
                "Divisor must be a positive finite number, got {divisor}"
            )));
        }
        for (i, &s) in std.iter().enumerate() {
            if !(s.is_finite() && s > 0.0) {
                return Err(DiagnosisError::config_error(format!(
                    "Standard deviation at index {i} must be greater than 0, got {s}"
                )));
            }
        }
        for (i, &m) in mean.iter().enumerate() {
            if !m.is_finite() {
                return Err(DiagnosisError::config_error(format!(
                    "Mean value at index {i} is not finite: {m}"
                )));
            }
        }
        Ok(Self {
            divisor,
            mean,
            std,
            order,
        })
    }

    /// Plain `[0, 1]` scaling with no mean/std shift.
    pub fn unit_range(order: ChannelOrder) -> Self {
        Self {
            divisor: 255.0,
            mean: [0.0; 3],
            std: [1.0; 3],
            order,
        }
    }

    #[inline]
    fn apply(&self, value: u8, channel: usize) -> f32 {
        (value as f32 / self.divisor - self.mean[channel]) / self.std[channel]
    }

    /// Normalizes one image into a `(1, H, W, 3)` or `(1, 3, H, W)` tensor,
    /// depending on the configured channel order.
    pub fn normalize_to_batch(&self, img: &RgbImage) -> Result<Tensor4D, DiagnosisError> {
        let (width, height) = (img.width() as usize, img.height() as usize);
        if width == 0 || height == 0 {
            return Err(DiagnosisError::invalid_input(format!(
                "cannot normalize an empty image ({}x{})",
                width, height
            )));
        }

        let raw = img.as_raw();
        let plane = width * height;
        let tensor = match self.order {
            ChannelOrder::HWC => {
                let data: Vec<f32> = raw
                    .chunks_exact(INPUT_CHANNELS)
                    .flat_map(|px| (0..INPUT_CHANNELS).map(move |c| self.apply(px[c], c)))
                    .collect();
                Array4::from_shape_vec((1, height, width, INPUT_CHANNELS), data)
            }
            ChannelOrder::CHW => {
                let mut data = vec![0.0f32; INPUT_CHANNELS * plane];
                for (i, px) in raw.chunks_exact(INPUT_CHANNELS).enumerate() {
                    for c in 0..INPUT_CHANNELS {
                        data[c * plane + i] = self.apply(px[c], c);
                    }
                }
                Array4::from_shape_vec((1, INPUT_CHANNELS, height, width), data)
            }
        }
        .map_err(|e| DiagnosisError::normalization("failed to shape image tensor", e))?;

        Ok(tensor)
    }
}

impl Default for NormalizeImage {
    fn default() -> Self {
        Self::unit_range(ChannelOrder::HWC)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_unit_range_maps_extremes() {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, Rgb([0, 0, 0]));
        img.put_pixel(1, 0, Rgb([255, 255, 255]));

        let tensor = NormalizeImage::default().normalize_to_batch(&img).unwrap();
        assert_eq!(tensor.shape(), &[1, 1, 2, 3]);
        assert_eq!(tensor[[0, 0, 0, 0]], 0.0);
        assert_eq!(tensor[[0, 0, 1, 2]], 1.0);
    }

    #[test]
    fn test_hwc_keeps_channels_interleaved() {
        let mut img = RgbImage::new(1, 1);
        img.put_pixel(0, 0, Rgb([51, 102, 204]));

        let tensor = NormalizeImage::default().normalize_to_batch(&img).unwrap();
        assert!((tensor[[0, 0, 0, 0]] - 0.2).abs() < 1e-6);
        assert!((tensor[[0, 0, 0, 1]] - 0.4).abs() < 1e-6);
        assert!((tensor[[0, 0, 0, 2]] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_chw_splits_channel_planes() {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.put_pixel(1, 0, Rgb([0, 0, 255]));

        let tensor = NormalizeImage::unit_range(ChannelOrder::CHW)
            .normalize_to_batch(&img)
            .unwrap();
        assert_eq!(tensor.shape(), &[1, 3, 1, 2]);
        assert_eq!(tensor[[0, 0, 0, 0]], 1.0);
        assert_eq!(tensor[[0, 0, 0, 1]], 0.0);
        assert_eq!(tensor[[0, 2, 0, 1]], 1.0);
    }

    #[test]
    fn test_mean_std_shift() {
        let normalizer =
            NormalizeImage::new(255.0, [0.5; 3], [0.5; 3], ChannelOrder::HWC).unwrap();
        let img = RgbImage::from_pixel(1, 1, Rgb([255, 0, 255]));
        let tensor = normalizer.normalize_to_batch(&img).unwrap();
        assert_eq!(tensor[[0, 0, 0, 0]], 1.0);
        assert_eq!(tensor[[0, 0, 0, 1]], -1.0);
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        assert!(NormalizeImage::new(0.0, [0.0; 3], [1.0; 3], ChannelOrder::HWC).is_err());
        assert!(NormalizeImage::new(255.0, [0.0; 3], [1.0, 0.0, 1.0], ChannelOrder::HWC).is_err());
        assert!(
            NormalizeImage::new(255.0, [f32::NAN, 0.0, 0.0], [1.0; 3], ChannelOrder::HWC).is_err()
        );
    }

    #[test]
    fn test_empty_image_rejected() {
        let img = RgbImage::new(0, 0);
        let err = NormalizeImage::default().normalize_to_batch(&img).unwrap_err();
        assert!(matches!(err, DiagnosisError::InvalidInput { .. }));
    }
}
