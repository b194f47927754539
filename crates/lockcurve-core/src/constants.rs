//! # Protocol Constants
//!
//! Fundamental constants for the locked-liquidity bonding curve:
//! - Fixed-point scales for prices, SOL and token amounts
//! - Domain price bounds
//! - Genesis reserves used to derive the curve invariant
//! - Order-list and stop-loss search defaults

// ============================================================================
// Fixed-Point Scales
// ============================================================================

/// Number of fractional decimal digits in a price (u128, 10^28 scale)
pub const PRICE_DECIMALS: u32 = 28;

/// Number of fractional decimal digits in a SOL amount (lamports)
pub const SOL_DECIMALS: u32 = 9;

/// Number of fractional decimal digits in a token amount
pub const TOKEN_DECIMALS: u32 = 6;

/// One whole SOL in lamports
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// One whole token in base units
pub const TOKEN_UNIT: u64 = 1_000_000;

// ============================================================================
// Domain Price Bounds
// ============================================================================

/// Lowest price the reserve math accepts
pub const MIN_PRICE: u128 = 119_589_934_762_348_555_452;

/// Highest price the reserve math accepts
pub const MAX_PRICE: u128 = 6_920_938_463_463_374_607_431_768_211_455;

// ============================================================================
// Genesis Reserves
// ============================================================================

/// Virtual SOL reserve at market genesis (whole SOL)
pub const INITIAL_SOL_RESERVE: u64 = 30;

/// Virtual token reserve at market genesis (whole tokens)
pub const INITIAL_TOKEN_RESERVE: u64 = 1_073_000_000;

// ============================================================================
// Fees
// ============================================================================

/// Fee denominator (100_000 = 100%)
pub const FEE_DENOMINATOR: u64 = 100_000;

/// Maximum fee (10%)
pub const MAX_FEE: u64 = 10_000;

// ============================================================================
// Order List and Placement Defaults
// ============================================================================

/// Maximum number of locked orders a single trade may cross
pub const MAX_ORDERS_COUNT: usize = 10;

/// Stop-loss price step per iteration, per mille (0.5%)
pub const PRICE_ADJUSTMENT_PER_MILLE: u32 = 5;

/// Reservation buffer as a percentage of an order's width (100% = doubled)
pub const LIQUIDITY_RESERVATION_PCT: u32 = 100;

/// Share of the free liquidity suggested after a partial fill, per mille (97.5%)
pub const SUGGEST_LIQ_RATIO_PER_MILLE: u64 = 975;

/// Iteration cap for the stop-loss price search
pub const MAX_STOP_LOSS_ITERATIONS: u32 = 1_000;

/// Per-mille denominator
pub const PER_MILLE: u64 = 1_000;

/// Upper bound reported for a partial fill's completion rate
pub const PARTIAL_COMPLETION_CAP: f64 = 99.99;
