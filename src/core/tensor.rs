//! Tensor type aliases shared by the pipeline stages.

/// A 2-D f32 tensor, `(batch, classes)` for classifier outputs.
pub type Tensor2D = ndarray::Array2<f32>;

/// A 4-D f32 tensor, `(batch, height, width, channels)` or `(batch, channels, height, width)`.
pub type Tensor4D = ndarray::Array4<f32>;
