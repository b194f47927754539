//! # Direction Types
//!
//! A single direction-parameterized view of the curve. `Up` is a buy and the
//! short-order list (ascending prices); `Down` is a sell and the long-order
//! list (descending prices).

use crate::constants::PER_MILLE;
use crate::types::orders::OrderType;

#[cfg(feature = "client")]
use serde::{Deserialize, Serialize};

/// Direction of price movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "client", serde(rename_all = "snake_case"))]
pub enum Direction {
    /// Price increases: buys, crossing short orders
    Up,
    /// Price decreases: sells, crossing long orders
    Down,
}

impl Direction {
    /// Direction in which an order of this type is exposed to adverse movement
    pub fn for_order_type(order_type: OrderType) -> Self {
        match order_type {
            OrderType::Short => Direction::Up,
            OrderType::Long => Direction::Down,
        }
    }

    /// Order type whose list lives in this direction
    pub fn order_type(self) -> OrderType {
        match self {
            Direction::Up => OrderType::Short,
            Direction::Down => OrderType::Long,
        }
    }

    /// Domain price bound reached by moving in this direction
    pub fn bound(self, min_price: u128, max_price: u128) -> u128 {
        match self {
            Direction::Up => max_price,
            Direction::Down => min_price,
        }
    }

    /// Whether `to` lies strictly further along this direction than `from`
    pub fn is_ahead(self, from: u128, to: u128) -> bool {
        match self {
            Direction::Up => to > from,
            Direction::Down => to < from,
        }
    }

    /// The price of the two that is reached first when moving in this direction
    pub fn nearest(self, a: u128, b: u128) -> u128 {
        match self {
            Direction::Up => a.min(b),
            Direction::Down => a.max(b),
        }
    }

    /// Whether the trade input in this direction is SOL (otherwise it is token)
    pub fn input_is_sol(self) -> bool {
        matches!(self, Direction::Up)
    }

    /// Move a price one step of `per_mille` along this direction
    ///
    /// Returns `None` if the step overflows or collapses the price to zero.
    pub fn step_price(self, price: u128, per_mille: u64) -> Option<u128> {
        let factor = match self {
            Direction::Up => PER_MILLE.checked_add(per_mille)?,
            Direction::Down => PER_MILLE.checked_sub(per_mille)?,
        };
        let stepped = price.checked_mul(u128::from(factor))? / u128::from(PER_MILLE);
        (stepped > 0).then_some(stepped)
    }
}

/// Size of a trade, fixed on either the input or the output leg
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "client", serde(rename_all = "snake_case"))]
pub enum TradeTarget {
    /// Spend exactly this much of the input currency
    ExactIn(u64),
    /// Receive exactly this much of the output currency
    ExactOut(u64),
}

impl TradeTarget {
    /// Raw target amount
    pub fn amount(self) -> u64 {
        match self {
            TradeTarget::ExactIn(amount) | TradeTarget::ExactOut(amount) => amount,
        }
    }

    /// Same kind of target with a different amount
    pub fn with_amount(self, amount: u64) -> Self {
        match self {
            TradeTarget::ExactIn(_) => TradeTarget::ExactIn(amount),
            TradeTarget::ExactOut(_) => TradeTarget::ExactOut(amount),
        }
    }

    /// Whether the target is denominated in SOL for the given direction
    pub fn is_sol(self, direction: Direction) -> bool {
        match self {
            TradeTarget::ExactIn(_) => direction.input_is_sol(),
            TradeTarget::ExactOut(_) => !direction.input_is_sol(),
        }
    }
}
