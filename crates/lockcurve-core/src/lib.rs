//! # Lockcurve Core - Pricing and Liquidity Simulation
//!
//! Pure, synchronous arithmetic behind a leveraged bonding-curve market:
//!
//! - Fixed-point conversion between raw integers and exact decimals
//! - Constant-product quotes re-anchored at any price
//! - Simulation of trades across locked-order lists
//! - Overlap checks and stop-loss placement against locked intervals
//!
//! Nothing here performs I/O; callers supply the current price and an
//! order-list snapshot and receive structured results.
//!
//! ## Feature Flags
//!
//! - `client`: Enables serde serialization for off-chain use

pub mod config;
pub mod constants;
pub mod errors;
pub mod liquidity;
pub mod math;
pub mod placement;
pub mod types;

// Re-export commonly used items
pub use config::ProtocolConfig;
pub use constants::*;
pub use errors::{CoreResult, LockCurveError};
pub use liquidity::{LimitReason, LiquiditySimulation, Segment, SegmentKind, SegmentWalker};
pub use math::curve::{CurveEngine, PriceQuote, ReservePair, TradeQuote};
pub use placement::{check_overlap, OverlapCheck, OverlapReason, StopLossPlacement, StopLossSearch};
pub use types::*;
