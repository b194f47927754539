//! # Order Placement
//!
//! Overlap checks against locked intervals and the stop-loss price search
//! built on them.

pub mod overlap;
pub mod stop_loss;

pub use overlap::*;
pub use stop_loss::*;
