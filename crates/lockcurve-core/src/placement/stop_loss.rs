//! # Stop-Loss Price Search
//!
//! Finds a stop-loss price whose closing trade does not collide with any
//! locked order. Starting from the requested stop price, the closing trade is
//! quoted on the curve and the interval it spans is checked for overlap; on a
//! collision the candidate moves one adjustment step further from the
//! current price and the check repeats.
//!
//! A long closes by selling its tokens (exact-in, price moving down), so its
//! candidate steps down. A short closes by buying its tokens back (exact-out,
//! price moving up), so its candidate steps up.

use log::debug;

use crate::config::ProtocolConfig;
use crate::errors::{CoreResult, LockCurveError};
use crate::math::curve::CurveEngine;
use crate::placement::overlap::check_overlap;
use crate::types::direction::Direction;
use crate::types::orders::{OrderList, OrderType};

#[cfg(feature = "client")]
use serde::{Deserialize, Serialize};

/// An accepted stop-loss placement
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct StopLossPlacement {
    pub order_type: OrderType,
    /// Price at which the closing trade starts
    pub executable_price: u128,
    /// Price the closing trade ends at
    pub end_price: u128,
    /// Lamports received (long) or paid (short) by the closing trade
    pub trade_amount: u64,
    /// Display-only distance from the current price, in percent
    pub percentage_from_current: f64,
    /// Display-only leverage implied by that distance
    pub implied_leverage: f64,
    /// Quotes evaluated, including the accepted one
    pub iterations: u32,
    pub prev_order_id: Option<String>,
    pub next_order_id: Option<String>,
    pub insert_index: usize,
}

/// Stop-loss search for one market
#[derive(Debug, Clone, Copy)]
pub struct StopLossSearch<'a> {
    engine: &'a CurveEngine,
    config: &'a ProtocolConfig,
}

impl<'a> StopLossSearch<'a> {
    pub fn new(engine: &'a CurveEngine, config: &'a ProtocolConfig) -> Self {
        Self { engine, config }
    }

    /// Find the first non-overlapping stop price at or beyond `candidate_stop`
    ///
    /// `trade_size` is the position's token amount. `orders` must be the list
    /// of the same side as `order_type`.
    pub fn find_executable_price(
        &self,
        order_type: OrderType,
        current_price: u128,
        trade_size: u64,
        candidate_stop: u128,
        orders: &OrderList,
    ) -> CoreResult<StopLossPlacement> {
        self.engine.check_price(current_price)?;
        self.engine.check_price(candidate_stop)?;
        if trade_size == 0 {
            return Err(LockCurveError::invalid_input("trade size must be greater than zero"));
        }

        let direction = Direction::for_order_type(order_type);
        if orders.direction() != direction {
            return Err(LockCurveError::invalid_input(format!(
                "{:?} stop-loss needs the {:?} order list",
                order_type, direction
            )));
        }

        let max_iterations = self.config.max_stop_loss_iterations;
        let step = u64::from(self.config.price_adjustment_per_mille);
        let mut candidate = candidate_stop;

        for iteration in 1..=max_iterations {
            let (end_price, trade_amount) = match order_type {
                OrderType::Long => {
                    let quote = self.engine.quote_exact_in(Direction::Down, candidate, trade_size)?;
                    (quote.end_price, quote.amount)
                }
                OrderType::Short => {
                    let quote = self.engine.quote_exact_out(Direction::Up, candidate, trade_size)?;
                    (quote.end_price, quote.amount)
                }
            };

            let check = check_overlap(orders, candidate, end_price, self.config)?;
            if check.no_overlap {
                debug!(
                    "Stop-loss accepted at {} after {} iteration(s), trade ends at {}",
                    candidate, iteration, end_price
                );
                let (percentage_from_current, implied_leverage) =
                    distance_metrics(current_price, candidate);

                return Ok(StopLossPlacement {
                    order_type,
                    executable_price: candidate,
                    end_price,
                    trade_amount,
                    percentage_from_current,
                    implied_leverage,
                    iterations: iteration,
                    prev_order_id: check.prev_order_id,
                    next_order_id: check.next_order_id,
                    insert_index: check.insert_index,
                });
            }

            debug!(
                "Stop-loss candidate {} rejected ({:?} on {:?})",
                candidate, check.reason, check.conflicting_order_id
            );

            if iteration < max_iterations {
                candidate = self.adjust(direction, candidate, step)?;
            }
        }

        Err(LockCurveError::MaxIterationsReached(max_iterations))
    }

    fn adjust(&self, direction: Direction, candidate: u128, step: u64) -> CoreResult<u128> {
        let next = direction
            .step_price(candidate, step)
            .ok_or(LockCurveError::PriceOutOfBounds(candidate))?;

        if next < self.engine.min_price() || next > self.engine.max_price() {
            return Err(LockCurveError::PriceOutOfBounds(next));
        }
        Ok(next)
    }
}

/// `(percentage_from_current, implied_leverage)` for a stop at `executable`
///
/// A stop at the current price reports 0% and leverage 1.
pub fn distance_metrics(current_price: u128, executable: u128) -> (f64, f64) {
    let diff = current_price.abs_diff(executable);
    if diff == 0 || current_price == 0 {
        return (0.0, 1.0);
    }
    let current = current_price as f64;
    let diff = diff as f64;
    (diff / current * 100.0, current / diff)
}
