#![deny(missing_docs)]
//! Image types and traits for generating and manipulating digit images

/// image representation for computer vision purposes.
pub mod image;

/// Error types for the image module.
pub mod error;

/// tagged input image with a runtime channel layout.
pub mod dyn_image;

/// image basic operations.
pub mod ops;

pub use crate::dyn_image::{ChannelLayout, DynImage};
pub use crate::error::{ImageError, ScanDirection};
pub use crate::image::{Image, ImageSize};
