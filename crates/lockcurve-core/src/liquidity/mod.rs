//! # Liquidity Simulation
//!
//! Segment records and the walker that produces them.

pub mod segment;
pub mod walker;

pub use segment::*;
pub use walker::*;
