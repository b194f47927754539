use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use lockcurve_core::{CurveEngine, Direction, LockedOrder, OrderList};
use serde::{Deserialize, Serialize};

/// Market state captured from the read API, as JSON
///
/// Prices are raw 10^28-scaled integers, amounts raw lamports and token
/// base units. Each list is nearest-first and may carry one extra order
/// beyond the fetch limit.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct MarketSnapshot {
    /// Latest traded price; absent for markets without trade history
    #[serde(default)]
    pub current_price: Option<u128>,

    /// Ascending short orders, crossed by buys
    #[serde(default)]
    pub short_orders: Vec<LockedOrder>,

    /// Descending long orders, crossed by sells
    #[serde(default)]
    pub long_orders: Vec<LockedOrder>,
}

impl MarketSnapshot {
    /// Load a snapshot from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Failed to load snapshot {}", path.display()))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse snapshot JSON")
    }

    /// Current price, or the genesis price for a market that never traded
    pub fn current_price(&self, engine: &CurveEngine) -> Result<u128> {
        match self.current_price {
            Some(price) => Ok(price),
            None => {
                let price = engine.initial_price()?;
                log::info!("Snapshot has no current price, using genesis price {}", price);
                Ok(price)
            }
        }
    }

    /// Validated order list for one direction
    pub fn order_list(&self, direction: Direction) -> Result<OrderList> {
        let orders = match direction {
            Direction::Up => &self.short_orders,
            Direction::Down => &self.long_orders,
        };
        let list = OrderList::new(direction, orders.clone())
            .with_context(|| format!("Invalid {:?} order list in snapshot", direction))?;
        log::debug!("Loaded {} {:?} orders", list.len(), direction);
        Ok(list)
    }
}
