//! # Liquidity Segments
//!
//! Records produced while walking an order list: the price axis split into
//! free gaps and locked spans, and the summary of one simulated trade.

use crate::types::direction::{Direction, TradeTarget};

#[cfg(feature = "client")]
use serde::{Deserialize, Serialize};

/// What a segment of the price axis represents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "client", serde(rename_all = "snake_case"))]
pub enum SegmentKind {
    /// Free curve liquidity between two locked boundaries
    Gap,
    /// A locked order that must be force-closed to cross it
    Locked,
    /// A locked order treated as free liquidity for this trade
    Pass,
    /// Unbounded free liquidity past the last order, up to the domain bound
    Final,
}

/// One contiguous slice of the price axis visited by the walker
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct Segment {
    pub kind: SegmentKind,
    pub start_price: u128,
    pub end_price: u128,
    /// Lamports required (buy) or obtained (sell) across the slice
    pub sol_amount: u64,
    /// Tokens obtained (buy) or consumed (sell) across the slice
    pub token_amount: u64,
    /// Index into the order list for `Locked` and `Pass` segments
    pub order_index: Option<usize>,
    /// False for zero-width or inverted gaps, which contribute nothing
    pub is_valid: bool,
}

/// Why a simulation stopped short of its target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "client", serde(rename_all = "snake_case"))]
pub enum LimitReason {
    /// More orders would have to be crossed than one transaction allows,
    /// or the snapshot ended before the on-chain list did
    OrderCountLimit,
    /// The curve cannot supply the remainder before the domain bound
    InsufficientLiquidity,
}

/// Outcome of simulating one trade against a locked-order list
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct LiquiditySimulation {
    pub direction: Direction,
    pub target: TradeTarget,
    pub start_price: u128,
    /// Furthest price the trade reaches
    pub end_price: u128,

    /// Filled share of the target in percent, 100.0 only for a full fill
    pub completion_rate: f64,

    /// Free liquidity consumed, including any pass order
    pub free_sol_amount: u64,
    pub free_token_amount: u64,

    /// Liquidity of the orders force-closed on the way
    pub locked_sol_amount: u64,
    pub locked_token_amount: u64,

    /// Whether the walk reached the unbounded tail past the last order
    pub has_infinite_lp: bool,

    /// Index of the order treated as free liquidity, if it was crossed
    pub pass_order_index: Option<usize>,

    pub force_close_num: usize,
    pub force_close_orders: Vec<String>,

    /// Counter-currency value of the target at the start price, no slippage;
    /// `None` when that value does not fit a u64
    pub ideal_amount: Option<u64>,
    /// Counter-currency amount the free liquidity actually requires or yields
    pub real_amount: u64,
    /// Display-only slippage of `real_amount` against `ideal_amount`
    pub slippage_pct: Option<f64>,

    /// Reduced target worth retrying with after a partial or degenerate fill
    pub suggested_amount: Option<u64>,

    pub limit_reason: Option<LimitReason>,
    pub segments: Vec<Segment>,
}

impl LiquiditySimulation {
    /// Whether the whole target can be executed
    pub fn is_complete(&self) -> bool {
        self.limit_reason.is_none()
    }

    /// Lamports moved across the curve, free and force-closed
    pub fn total_sol_amount(&self) -> u64 {
        self.free_sol_amount.saturating_add(self.locked_sol_amount)
    }

    /// Tokens moved across the curve, free and force-closed
    pub fn total_token_amount(&self) -> u64 {
        self.free_token_amount.saturating_add(self.locked_token_amount)
    }
}

/// Display-only deviation of `real` from `ideal`, in percent
pub fn slippage_pct(ideal: u64, real: u64) -> Option<f64> {
    if ideal == 0 || real == 0 {
        return None;
    }
    let diff = ideal.abs_diff(real) as f64;
    Some(diff / ideal as f64 * 100.0)
}
