//! Utility functions for image loading.

pub mod image;

pub use self::image::{ImageSource, decode_image_bytes, decode_source, load_dynamic_image, load_image};
