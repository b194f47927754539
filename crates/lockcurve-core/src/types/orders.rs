//! # Order Types
//!
//! Locked orders and the direction-scoped, validated order list the
//! simulation and placement components read from. The on-chain successor
//! chain is materialized as an indexable snapshot: the successor of element
//! `i` is element `i + 1`.

use crate::errors::{CoreResult, LockCurveError};
use crate::types::direction::Direction;

#[cfg(feature = "client")]
use serde::{Deserialize, Serialize};

/// Side of a margin position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "client", serde(rename_all = "snake_case"))]
pub enum OrderType {
    /// Long position, liquidated by falling prices
    Long,
    /// Short position, liquidated by rising prices
    Short,
}

/// One margin position's claim on a slice of the price curve
///
/// `lock_start_price` is always the edge nearest the current price and
/// `lock_end_price` the far edge, so shorts have start < end and longs
/// have start > end.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct LockedOrder {
    /// Opaque order identifier (account address or any unique key)
    pub order_id: String,
    pub order_type: OrderType,
    pub lock_start_price: u128,
    pub lock_end_price: u128,
    /// Lamports locked in the slice
    pub lock_sol_amount: u64,
    /// Token base units locked in the slice
    pub lock_token_amount: u64,
    /// Identifier of the next order outward, `None` at the end of the chain
    #[cfg_attr(feature = "client", serde(default))]
    pub next_order: Option<String>,
}

impl LockedOrder {
    /// Edge reached first by a price moving toward this order
    pub fn near_edge(&self) -> u128 {
        self.lock_start_price
    }

    /// Edge reached last by a price moving through this order
    pub fn far_edge(&self) -> u128 {
        self.lock_end_price
    }

    /// Locked interval normalized to `(min, max)`
    pub fn interval(&self) -> (u128, u128) {
        if self.lock_start_price <= self.lock_end_price {
            (self.lock_start_price, self.lock_end_price)
        } else {
            (self.lock_end_price, self.lock_start_price)
        }
    }

    /// Width of the locked interval in raw price units
    pub fn width(&self) -> u128 {
        let (min, max) = self.interval();
        max - min
    }

    /// Locked amounts as `(input, output)` legs of a trade in `direction`
    pub fn legs(&self, direction: Direction) -> (u64, u64) {
        match direction {
            Direction::Up => (self.lock_sol_amount, self.lock_token_amount),
            Direction::Down => (self.lock_token_amount, self.lock_sol_amount),
        }
    }
}

/// Read-only snapshot of one direction's locked orders, nearest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderList {
    direction: Direction,
    orders: Vec<LockedOrder>,
}

impl OrderList {
    /// Build a validated order list
    ///
    /// Rejects orders of the wrong type, zero or mis-oriented prices, lists
    /// that are unsorted or overlapping, and broken successor references.
    pub fn new(direction: Direction, orders: Vec<LockedOrder>) -> CoreResult<Self> {
        let expected_type = direction.order_type();

        for (index, order) in orders.iter().enumerate() {
            if order.order_type != expected_type {
                return Err(LockCurveError::invalid_input(format!(
                    "order {} at index {} is {:?}, expected {:?}",
                    order.order_id, index, order.order_type, expected_type
                )));
            }

            if order.lock_start_price == 0 || order.lock_end_price == 0 {
                return Err(LockCurveError::invalid_input(format!(
                    "order {} has a zero lock price",
                    order.order_id
                )));
            }

            if !direction.is_ahead(order.lock_start_price, order.lock_end_price) {
                return Err(LockCurveError::invalid_input(format!(
                    "order {} lock range {} -> {} is not oriented {:?}",
                    order.order_id, order.lock_start_price, order.lock_end_price, direction
                )));
            }
        }

        for (index, pair) in orders.windows(2).enumerate() {
            let (current, next) = (&pair[0], &pair[1]);

            // Touching edges are allowed, crossing ones are not
            if direction.is_ahead(next.near_edge(), current.far_edge()) {
                return Err(LockCurveError::invalid_input(format!(
                    "orders {} and {} are unsorted or overlapping",
                    current.order_id, next.order_id
                )));
            }

            match &current.next_order {
                Some(successor) if *successor == next.order_id => {}
                Some(successor) => {
                    return Err(LockCurveError::invalid_input(format!(
                        "order {} at index {} names successor {}, but the next order is {}",
                        current.order_id, index, successor, next.order_id
                    )));
                }
                None => {
                    return Err(LockCurveError::invalid_input(format!(
                        "order {} at index {} ends the chain but more orders follow",
                        current.order_id, index
                    )));
                }
            }
        }

        Ok(Self { direction, orders })
    }

    /// An empty list for a direction
    pub fn empty(direction: Direction) -> Self {
        Self {
            direction,
            orders: Vec::new(),
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn orders(&self) -> &[LockedOrder] {
        &self.orders
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&LockedOrder> {
        self.orders.get(index)
    }

    /// Index of the order with this identifier
    pub fn position(&self, order_id: &str) -> Option<usize> {
        self.orders.iter().position(|order| order.order_id == order_id)
    }

    /// Whether the snapshot was cut off before the end of the on-chain chain
    pub fn is_truncated(&self) -> bool {
        self.orders
            .last()
            .map_or(false, |order| order.next_order.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short(id: &str, start: u128, end: u128, next: Option<&str>) -> LockedOrder {
        LockedOrder {
            order_id: id.to_string(),
            order_type: OrderType::Short,
            lock_start_price: start,
            lock_end_price: end,
            lock_sol_amount: 1_000,
            lock_token_amount: 2_000,
            next_order: next.map(str::to_string),
        }
    }

    fn long(id: &str, start: u128, end: u128, next: Option<&str>) -> LockedOrder {
        LockedOrder {
            order_type: OrderType::Long,
            ..short(id, start, end, next)
        }
    }

    #[test]
    fn test_valid_lists() {
        let list = OrderList::new(
            Direction::Up,
            vec![short("a", 100, 200, Some("b")), short("b", 200, 300, None)],
        )
        .unwrap();
        assert_eq!(list.len(), 2);
        assert!(!list.is_truncated());
        assert_eq!(list.position("b"), Some(1));

        let list = OrderList::new(
            Direction::Down,
            vec![long("a", 300, 200, Some("b")), long("b", 150, 100, Some("c"))],
        )
        .unwrap();
        assert!(list.is_truncated());
        assert_eq!(list.get(0).unwrap().interval(), (200, 300));
        assert_eq!(list.get(0).unwrap().width(), 100);
    }

    #[test]
    fn test_rejects_malformed_lists() {
        // Wrong type for direction
        assert!(OrderList::new(Direction::Down, vec![short("a", 100, 200, None)]).is_err());

        // Wrong orientation
        assert!(OrderList::new(Direction::Up, vec![short("a", 200, 100, None)]).is_err());

        // Overlapping neighbours
        assert!(OrderList::new(
            Direction::Up,
            vec![short("a", 100, 250, Some("b")), short("b", 200, 300, None)],
        )
        .is_err());

        // Broken successor chain
        assert!(OrderList::new(
            Direction::Up,
            vec![short("a", 100, 200, Some("x")), short("b", 200, 300, None)],
        )
        .is_err());
        assert!(OrderList::new(
            Direction::Up,
            vec![short("a", 100, 200, None), short("b", 200, 300, None)],
        )
        .is_err());

        // Zero price
        assert!(OrderList::new(Direction::Down, vec![long("a", 10, 0, None)]).is_err());
    }

    #[test]
    fn test_legs_follow_direction() {
        let order = short("a", 100, 200, None);
        assert_eq!(order.legs(Direction::Up), (1_000, 2_000));
        assert_eq!(order.legs(Direction::Down), (2_000, 1_000));
    }
}
