//! # Segment Walker
//!
//! Simulates a trade against one direction's locked-order list. The price axis
//! is walked outward from the current price as alternating free gaps and
//! locked spans:
//!
//! ```text
//! current ─gap─▶ [order 0] ─gap─▶ [order 1] ─ ... ─▶ [last] ─tail─▶ bound
//! ```
//!
//! Gaps are quoted on the curve and count toward the target. Locked spans are
//! force-closed (their liquidity is reported separately) unless the order is
//! the caller's pass order, whose liquidity counts as free. Past the last
//! order the curve is unobstructed up to the domain bound.

use log::{debug, trace};

use crate::config::ProtocolConfig;
use crate::errors::{CoreResult, LockCurveError};
use crate::liquidity::segment::{
    slippage_pct, LimitReason, LiquiditySimulation, Segment, SegmentKind,
};
use crate::math::curve::CurveEngine;
use crate::types::direction::{Direction, TradeTarget};
use crate::types::orders::OrderList;

/// Walks locked-order lists for one market
#[derive(Debug, Clone, Copy)]
pub struct SegmentWalker<'a> {
    engine: &'a CurveEngine,
    config: &'a ProtocolConfig,
}

impl<'a> SegmentWalker<'a> {
    pub fn new(engine: &'a CurveEngine, config: &'a ProtocolConfig) -> Self {
        Self { engine, config }
    }

    /// Simulate `target` from `current_price` through `orders`
    ///
    /// The trade direction is the order list's direction. `pass_order` names
    /// an order whose locked liquidity is usable instead of force-closed.
    ///
    /// If the counter amount of a full fill rounds to zero, the walk is
    /// repeated once with the suggested (reduced) amount and the slippage
    /// figure is taken from that run.
    pub fn simulate(
        &self,
        current_price: u128,
        target: TradeTarget,
        orders: &OrderList,
        pass_order: Option<&str>,
    ) -> CoreResult<LiquiditySimulation> {
        let mut result = self.walk(current_price, target, orders, pass_order)?;

        if result.is_complete() && result.real_amount == 0 {
            let suggested = self.suggest(free_target_total(&result), target.amount());
            if suggested > 0 && suggested < target.amount() {
                debug!(
                    "Degenerate fill for {:?}, re-running with suggested amount {}",
                    target, suggested
                );
                let rerun =
                    self.walk(current_price, target.with_amount(suggested), orders, pass_order)?;
                result.slippage_pct = rerun
                    .ideal_amount
                    .and_then(|ideal| slippage_pct(ideal, rerun.real_amount));
                result.suggested_amount = Some(suggested);
            }
        }

        Ok(result)
    }

    /// Buy exactly `token_amount` tokens through the short-order list
    pub fn simulate_token_buy(
        &self,
        current_price: u128,
        token_amount: u64,
        orders: &OrderList,
        pass_order: Option<&str>,
    ) -> CoreResult<LiquiditySimulation> {
        self.expect_direction(orders, Direction::Up)?;
        self.simulate(current_price, TradeTarget::ExactOut(token_amount), orders, pass_order)
    }

    /// Spend exactly `sol_amount` lamports through the short-order list
    pub fn simulate_sol_buy(
        &self,
        current_price: u128,
        sol_amount: u64,
        orders: &OrderList,
        pass_order: Option<&str>,
    ) -> CoreResult<LiquiditySimulation> {
        self.expect_direction(orders, Direction::Up)?;
        self.simulate(current_price, TradeTarget::ExactIn(sol_amount), orders, pass_order)
    }

    /// Sell exactly `token_amount` tokens through the long-order list
    pub fn simulate_token_sell(
        &self,
        current_price: u128,
        token_amount: u64,
        orders: &OrderList,
        pass_order: Option<&str>,
    ) -> CoreResult<LiquiditySimulation> {
        self.expect_direction(orders, Direction::Down)?;
        self.simulate(current_price, TradeTarget::ExactIn(token_amount), orders, pass_order)
    }

    /// Receive exactly `sol_amount` lamports through the long-order list
    pub fn simulate_sol_sell(
        &self,
        current_price: u128,
        sol_amount: u64,
        orders: &OrderList,
        pass_order: Option<&str>,
    ) -> CoreResult<LiquiditySimulation> {
        self.expect_direction(orders, Direction::Down)?;
        self.simulate(current_price, TradeTarget::ExactOut(sol_amount), orders, pass_order)
    }

    fn expect_direction(&self, orders: &OrderList, expected: Direction) -> CoreResult<()> {
        if orders.direction() != expected {
            return Err(LockCurveError::invalid_input(format!(
                "expected a {:?} order list, got {:?}",
                expected,
                orders.direction()
            )));
        }
        Ok(())
    }

    fn suggest(&self, free_total: u64, target: u64) -> u64 {
        let suggested =
            u128::from(free_total) * u128::from(self.config.suggest_liq_ratio_per_mille) / 1_000;
        u64::try_from(suggested).unwrap_or(target).min(target)
    }

    fn walk(
        &self,
        current_price: u128,
        target: TradeTarget,
        orders: &OrderList,
        pass_order: Option<&str>,
    ) -> CoreResult<LiquiditySimulation> {
        self.engine.check_price(current_price)?;
        if target.amount() == 0 {
            return Err(LockCurveError::invalid_input("trade amount must be greater than zero"));
        }

        let direction = orders.direction();
        let mut walk = Walk::new(self.engine, direction, target, current_price);
        let mut prev = current_price;
        let mut crossed = 0usize;

        for (index, order) in orders.orders().iter().enumerate() {
            // Already behind the price, nothing left to cross
            if !direction.is_ahead(prev, order.far_edge()) {
                trace!("Skipping order {} behind price {}", order.order_id, prev);
                continue;
            }

            let near = order.near_edge();
            let span_start = if direction.is_ahead(prev, near) {
                let gap = self.engine.quote_price_range(direction, prev, near)?;
                let remaining = walk.remaining();

                if walk.target_leg(gap.amount_in, gap.amount_out) >= remaining {
                    let (end, amount_in, amount_out) = walk.quote_remaining(prev, remaining)?;
                    let end = direction.nearest(end, near);
                    debug!("Target reached inside gap {} -> {} at {}", prev, near, end);

                    walk.push(SegmentKind::Gap, prev, end, amount_in, amount_out, None, true);
                    walk.add_free(amount_in, amount_out)?;
                    return walk.finish(self, end, false, None);
                }

                walk.push(SegmentKind::Gap, prev, near, gap.amount_in, gap.amount_out, None, true);
                walk.add_free(gap.amount_in, gap.amount_out)?;
                near
            } else {
                // Back-to-back orders, or a price already inside this span
                walk.push(SegmentKind::Gap, prev, near, 0, 0, None, false);
                prev
            };

            if crossed >= self.config.max_orders_count {
                debug!(
                    "Order count limit {} reached before order {}",
                    self.config.max_orders_count, order.order_id
                );
                return walk.finish(self, span_start, false, Some(LimitReason::OrderCountLimit));
            }
            crossed += 1;

            let far = order.far_edge();
            let (locked_in, locked_out) = order.legs(direction);

            if pass_order == Some(order.order_id.as_str()) {
                walk.pass_order_index = Some(index);
                let remaining = walk.remaining();

                if walk.target_leg(locked_in, locked_out) >= remaining {
                    let (end, amount_in, amount_out) = walk.quote_remaining(span_start, remaining)?;
                    let end = direction.nearest(end, far);
                    debug!("Target reached inside pass order {} at {}", order.order_id, end);

                    walk.push(
                        SegmentKind::Pass,
                        span_start,
                        end,
                        amount_in,
                        amount_out,
                        Some(index),
                        true,
                    );
                    walk.add_free(amount_in, amount_out)?;
                    return walk.finish(self, end, false, None);
                }

                walk.push(
                    SegmentKind::Pass,
                    span_start,
                    far,
                    locked_in,
                    locked_out,
                    Some(index),
                    true,
                );
                walk.add_free(locked_in, locked_out)?;
            } else {
                trace!("Force-closing order {} ({} -> {})", order.order_id, span_start, far);
                walk.push(
                    SegmentKind::Locked,
                    span_start,
                    far,
                    locked_in,
                    locked_out,
                    Some(index),
                    true,
                );
                walk.add_locked(locked_in, locked_out)?;
                walk.force_close_orders.push(order.order_id.clone());
            }

            prev = far;
        }

        if orders.is_truncated() {
            debug!("Order snapshot ends before the on-chain list does");
            return walk.finish(self, prev, false, Some(LimitReason::OrderCountLimit));
        }

        self.walk_tail(walk, prev)
    }

    /// Unobstructed curve from the last boundary to the domain bound
    fn walk_tail(&self, mut walk: Walk<'_>, prev: u128) -> CoreResult<LiquiditySimulation> {
        let direction = walk.direction;
        let bound = direction.bound(self.engine.min_price(), self.engine.max_price());

        if !direction.is_ahead(prev, bound) {
            return walk.finish(self, prev, true, Some(LimitReason::InsufficientLiquidity));
        }

        match walk.quote_remaining(prev, walk.remaining()) {
            Ok((end, amount_in, amount_out)) if !direction.is_ahead(bound, end) => {
                // Spans to the bound, amounts cover only what was used
                walk.push(SegmentKind::Final, prev, bound, amount_in, amount_out, None, true);
                walk.add_free(amount_in, amount_out)?;
                walk.finish(self, end, true, None)
            }
            Ok(_)
            | Err(LockCurveError::NonPositiveResult(_))
            | Err(LockCurveError::Overflow(_)) => {
                debug!("Tail from {} cannot supply the remaining {}", prev, walk.remaining());
                let tail = self.engine.quote_price_range(direction, prev, bound)?;
                walk.push(
                    SegmentKind::Final,
                    prev,
                    bound,
                    tail.amount_in,
                    tail.amount_out,
                    None,
                    true,
                );
                walk.add_free(tail.amount_in, tail.amount_out)?;
                walk.finish(self, bound, true, Some(LimitReason::InsufficientLiquidity))
            }
            Err(err) => Err(err),
        }
    }
}

fn free_target_total(result: &LiquiditySimulation) -> u64 {
    let (free_in, free_out) = match result.direction {
        Direction::Up => (result.free_sol_amount, result.free_token_amount),
        Direction::Down => (result.free_token_amount, result.free_sol_amount),
    };
    match result.target {
        TradeTarget::ExactIn(_) => free_in,
        TradeTarget::ExactOut(_) => free_out,
    }
}

/// Running totals of one walk, kept in trade legs (input/output)
struct Walk<'e> {
    engine: &'e CurveEngine,
    direction: Direction,
    target: TradeTarget,
    start_price: u128,
    free_in: u64,
    free_out: u64,
    locked_in: u64,
    locked_out: u64,
    pass_order_index: Option<usize>,
    force_close_orders: Vec<String>,
    segments: Vec<Segment>,
}

impl<'e> Walk<'e> {
    fn new(
        engine: &'e CurveEngine,
        direction: Direction,
        target: TradeTarget,
        start_price: u128,
    ) -> Self {
        Self {
            engine,
            direction,
            target,
            start_price,
            free_in: 0,
            free_out: 0,
            locked_in: 0,
            locked_out: 0,
            pass_order_index: None,
            force_close_orders: Vec::new(),
            segments: Vec::new(),
        }
    }

    /// The leg of `(amount_in, amount_out)` the target is measured in
    fn target_leg(&self, amount_in: u64, amount_out: u64) -> u64 {
        match self.target {
            TradeTarget::ExactIn(_) => amount_in,
            TradeTarget::ExactOut(_) => amount_out,
        }
    }

    /// The leg opposite the target
    fn counter_leg(&self, amount_in: u64, amount_out: u64) -> u64 {
        match self.target {
            TradeTarget::ExactIn(_) => amount_out,
            TradeTarget::ExactOut(_) => amount_in,
        }
    }

    fn free_target(&self) -> u64 {
        self.target_leg(self.free_in, self.free_out)
    }

    fn remaining(&self) -> u64 {
        self.target.amount().saturating_sub(self.free_target())
    }

    /// Size the remaining target from `from`, as `(end_price, amount_in, amount_out)`
    fn quote_remaining(&self, from: u128, remaining: u64) -> CoreResult<(u128, u64, u64)> {
        match self.target {
            TradeTarget::ExactIn(_) => {
                let quote = self.engine.quote_exact_in(self.direction, from, remaining)?;
                Ok((quote.end_price, remaining, quote.amount))
            }
            TradeTarget::ExactOut(_) => {
                let quote = self.engine.quote_exact_out(self.direction, from, remaining)?;
                Ok((quote.end_price, quote.amount, remaining))
            }
        }
    }

    fn add_free(&mut self, amount_in: u64, amount_out: u64) -> CoreResult<()> {
        self.free_in = checked_sum(self.free_in, amount_in)?;
        self.free_out = checked_sum(self.free_out, amount_out)?;
        Ok(())
    }

    fn add_locked(&mut self, amount_in: u64, amount_out: u64) -> CoreResult<()> {
        self.locked_in = checked_sum(self.locked_in, amount_in)?;
        self.locked_out = checked_sum(self.locked_out, amount_out)?;
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn push(
        &mut self,
        kind: SegmentKind,
        start_price: u128,
        end_price: u128,
        amount_in: u64,
        amount_out: u64,
        order_index: Option<usize>,
        is_valid: bool,
    ) {
        let (sol_amount, token_amount) = self.sol_token(amount_in, amount_out);
        trace!(
            "{:?} segment {} -> {}: {} lamports, {} tokens",
            kind, start_price, end_price, sol_amount, token_amount
        );
        self.segments.push(Segment {
            kind,
            start_price,
            end_price,
            sol_amount,
            token_amount,
            order_index,
            is_valid,
        });
    }

    /// Map trade legs to `(sol, token)`
    fn sol_token(&self, amount_in: u64, amount_out: u64) -> (u64, u64) {
        match self.direction {
            Direction::Up => (amount_in, amount_out),
            Direction::Down => (amount_out, amount_in),
        }
    }

    fn finish(
        self,
        walker: &SegmentWalker<'_>,
        end_price: u128,
        has_infinite_lp: bool,
        limit_reason: Option<LimitReason>,
    ) -> CoreResult<LiquiditySimulation> {
        let target_amount = self.target.amount();
        let free_target = self.free_target();

        let completion_rate = match limit_reason {
            None => 100.0,
            Some(_) => (free_target as f64 / target_amount as f64 * 100.0)
                .min(crate::constants::PARTIAL_COMPLETION_CAP),
        };

        let suggested_amount = limit_reason.map(|_| walker.suggest(free_target, target_amount));

        let is_sol = self.target.is_sol(self.direction);
        let ideal = self.engine.value_at_price(self.start_price, target_amount, is_sol);
        let ideal_amount = match ideal {
            Ok(value) => Some(value),
            Err(LockCurveError::Overflow(_)) => {
                debug!("Ideal value of {:?} exceeds u64, slippage not reported", self.target);
                None
            }
            Err(err) => return Err(err),
        };
        let real_amount = self.counter_leg(self.free_in, self.free_out);

        let (free_sol_amount, free_token_amount) = self.sol_token(self.free_in, self.free_out);
        let (locked_sol_amount, locked_token_amount) =
            self.sol_token(self.locked_in, self.locked_out);

        Ok(LiquiditySimulation {
            direction: self.direction,
            target: self.target,
            start_price: self.start_price,
            end_price,
            completion_rate,
            free_sol_amount,
            free_token_amount,
            locked_sol_amount,
            locked_token_amount,
            has_infinite_lp,
            pass_order_index: self.pass_order_index,
            force_close_num: self.force_close_orders.len(),
            force_close_orders: self.force_close_orders,
            ideal_amount,
            real_amount,
            slippage_pct: ideal_amount.and_then(|ideal| slippage_pct(ideal, real_amount)),
            suggested_amount,
            limit_reason,
            segments: self.segments,
        })
    }
}

fn checked_sum(a: u64, b: u64) -> CoreResult<u64> {
    a.checked_add(b)
        .ok_or(LockCurveError::Overflow("liquidity total exceeds u64"))
}
