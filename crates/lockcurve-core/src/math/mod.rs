//! # Mathematical Functions
//!
//! Fixed-point conversion and constant-product curve quotes.

pub mod curve;
pub mod fixed_point;

// Re-export commonly used items
pub use curve::*;
pub use fixed_point::*;
