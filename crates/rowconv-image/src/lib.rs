#![deny(missing_docs)]
//! Image containers with bounds-checked pixel access

/// image representation for image processing purposes.
pub mod image;

/// Error types for the image module.
pub mod error;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize, Raster};
