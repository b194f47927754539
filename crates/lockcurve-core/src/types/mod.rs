//! # Type Definitions
//!
//! Direction, trade targets and the locked-order snapshot.

pub mod direction;
pub mod orders;

pub use direction::*;
pub use orders::*;
