//! Feature extraction
//!
//! This module provides descriptors computed on normalized digit images.

/// Histogram of oriented gradients.
pub mod hog;
pub use hog::*;
