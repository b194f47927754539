//! # Interval Overlap Checker
//!
//! Decides whether a candidate price interval can be inserted into a locked
//! order list. A candidate is rejected when it intersects an existing locked
//! interval, or the reservation buffer that extends the preceding order's
//! interval past its far edge:
//!
//! ```text
//! Up:    [prev.start ──── prev.end]~~~~ buffer ~~~~|   [next.start ── next.end]
//! Down:  [next.end ── next.start]   |~~~~ buffer ~~~~[prev.end ──── prev.start]
//! ```
//!
//! On success the flanking orders are returned so the caller can link the
//! new order between them.

use log::trace;

use crate::config::ProtocolConfig;
use crate::errors::{CoreResult, LockCurveError};
use crate::types::direction::Direction;
use crate::types::orders::{LockedOrder, OrderList};

#[cfg(feature = "client")]
use serde::{Deserialize, Serialize};

/// Why a candidate interval was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "client", serde(rename_all = "snake_case"))]
pub enum OverlapReason {
    /// Intersects an existing locked interval
    OrderRange,
    /// Intersects the reservation buffer of the preceding order
    ReservationRange,
}

impl OverlapReason {
    pub fn message(self) -> &'static str {
        match self {
            OverlapReason::OrderRange => "overlaps with existing order range",
            OverlapReason::ReservationRange => {
                "overlaps with previous order's liquidity reservation range"
            }
        }
    }
}

impl std::fmt::Display for OverlapReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Outcome of an overlap check
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct OverlapCheck {
    pub no_overlap: bool,
    /// Order at the lower list index next to the candidate
    pub prev_order_id: Option<String>,
    /// Order at the higher list index next to the candidate
    pub next_order_id: Option<String>,
    /// Order whose range or buffer the candidate hit
    pub conflicting_order_id: Option<String>,
    pub reason: Option<OverlapReason>,
    /// List position the candidate would take
    pub insert_index: usize,
}

impl OverlapCheck {
    fn clear(orders: &[LockedOrder], insert_index: usize) -> Self {
        Self {
            no_overlap: true,
            prev_order_id: order_id_at(orders, insert_index.checked_sub(1)),
            next_order_id: order_id_at(orders, Some(insert_index)),
            conflicting_order_id: None,
            reason: None,
            insert_index,
        }
    }
}

fn order_id_at(orders: &[LockedOrder], index: Option<usize>) -> Option<String> {
    index
        .and_then(|i| orders.get(i))
        .map(|order| order.order_id.clone())
}

/// Check `[candidate_start, candidate_end]` against `orders`
///
/// The candidate may be given in either orientation. Sharing a single edge
/// with an existing interval or with the outer edge of a reservation buffer
/// is not an overlap. Any wider intersection with a buffer is.
pub fn check_overlap(
    orders: &OrderList,
    candidate_start: u128,
    candidate_end: u128,
    config: &ProtocolConfig,
) -> CoreResult<OverlapCheck> {
    if candidate_start == 0 || candidate_end == 0 {
        return Err(LockCurveError::invalid_input("candidate interval has a zero price"));
    }

    let direction = orders.direction();
    let list = orders.orders();
    let (cmin, cmax) = if candidate_start <= candidate_end {
        (candidate_start, candidate_end)
    } else {
        (candidate_end, candidate_start)
    };

    let mut low = 0usize;
    let mut high = list.len();

    while low < high {
        let mid = low + (high - low) / 2;
        let order = &list[mid];
        let (omin, omax) = order.interval();
        trace!(
            "Checking order {} [{}, {}] against [{}, {}]",
            order.order_id, omin, omax, cmin, cmax
        );

        if cmin < omax && cmax > omin {
            return Ok(OverlapCheck {
                no_overlap: false,
                prev_order_id: order_id_at(list, mid.checked_sub(1)),
                next_order_id: order_id_at(list, mid.checked_add(1)),
                conflicting_order_id: Some(order.order_id.clone()),
                reason: Some(OverlapReason::OrderRange),
                insert_index: mid,
            });
        }

        let before = match direction {
            Direction::Up => cmax <= omin,
            Direction::Down => cmin >= omax,
        };
        if before {
            high = mid;
        } else {
            low = mid + 1;
        }
    }

    if let Some(prev) = low.checked_sub(1).and_then(|i| list.get(i)) {
        let (bmin, bmax) = reservation_buffer(prev, direction, config.liquidity_reservation_pct);
        if cmin < bmax && cmax > bmin {
            trace!(
                "Candidate [{}, {}] hits the buffer [{}, {}] of {}",
                cmin, cmax, bmin, bmax, prev.order_id
            );
            return Ok(OverlapCheck {
                no_overlap: false,
                conflicting_order_id: Some(prev.order_id.clone()),
                reason: Some(OverlapReason::ReservationRange),
                ..OverlapCheck::clear(list, low)
            });
        }
    }

    Ok(OverlapCheck::clear(list, low))
}

/// Zone past `order`'s far edge kept clear for its liquidation path, as `(min, max)`
pub fn reservation_buffer(
    order: &LockedOrder,
    direction: Direction,
    reservation_pct: u32,
) -> (u128, u128) {
    let width = order
        .width()
        .checked_mul(u128::from(reservation_pct))
        .map_or(u128::MAX, |scaled| scaled / 100);
    let far = order.far_edge();

    match direction {
        Direction::Up => (far, far.saturating_add(width)),
        Direction::Down => (far.saturating_sub(width), far),
    }
}
