//! Filter operations
//!
//! This module provides the row-partitioned 3x3 Sobel filter.

/// Filter kernels
pub mod kernels;

/// Filter errors
mod error;
pub use error::FilterError;

/// Filter operations
mod ops;
pub use ops::*;
