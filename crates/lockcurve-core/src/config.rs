//! # Protocol Configuration
//!
//! Runtime copy of the protocol constants. Every simulation call takes the
//! configuration by reference; nothing here is global or mutable.

use crate::constants::*;
use crate::errors::{CoreResult, LockCurveError};

#[cfg(feature = "client")]
use serde::{Deserialize, Serialize};

/// Protocol parameters used by the curve engine, walker and placement search
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "client", serde(default))]
pub struct ProtocolConfig {
    /// Maximum number of locked orders one trade may force-close
    pub max_orders_count: usize,

    /// Stop-loss price step per iteration (per mille)
    pub price_adjustment_per_mille: u32,

    /// Reservation buffer beyond an order's far edge (percent of its width)
    pub liquidity_reservation_pct: u32,

    /// Share of free liquidity suggested after a partial fill (per mille)
    pub suggest_liq_ratio_per_mille: u64,

    /// Iteration cap for the stop-loss search
    pub max_stop_loss_iterations: u32,

    /// Domain price floor
    #[cfg_attr(feature = "client", serde(with = "u128_string"))]
    pub min_price: u128,

    /// Domain price ceiling
    #[cfg_attr(feature = "client", serde(with = "u128_string"))]
    pub max_price: u128,

    /// Genesis SOL reserve (whole SOL)
    pub initial_sol_reserve: u64,

    /// Genesis token reserve (whole tokens)
    pub initial_token_reserve: u64,

    /// Maximum fee over `FEE_DENOMINATOR`
    pub max_fee: u64,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            max_orders_count: MAX_ORDERS_COUNT,
            price_adjustment_per_mille: PRICE_ADJUSTMENT_PER_MILLE,
            liquidity_reservation_pct: LIQUIDITY_RESERVATION_PCT,
            suggest_liq_ratio_per_mille: SUGGEST_LIQ_RATIO_PER_MILLE,
            max_stop_loss_iterations: MAX_STOP_LOSS_ITERATIONS,
            min_price: MIN_PRICE,
            max_price: MAX_PRICE,
            initial_sol_reserve: INITIAL_SOL_RESERVE,
            initial_token_reserve: INITIAL_TOKEN_RESERVE,
            max_fee: MAX_FEE,
        }
    }
}

impl ProtocolConfig {
    /// Validate configuration
    pub fn validate(&self) -> CoreResult<()> {
        if self.max_orders_count == 0 {
            return Err(LockCurveError::invalid_config(
                "max_orders_count",
                self.max_orders_count,
                "greater than 0",
            ));
        }

        if self.price_adjustment_per_mille == 0
            || u64::from(self.price_adjustment_per_mille) >= PER_MILLE
        {
            return Err(LockCurveError::invalid_config(
                "price_adjustment_per_mille",
                self.price_adjustment_per_mille,
                "between 1 and 999",
            ));
        }

        if self.suggest_liq_ratio_per_mille == 0 || self.suggest_liq_ratio_per_mille > PER_MILLE {
            return Err(LockCurveError::invalid_config(
                "suggest_liq_ratio_per_mille",
                self.suggest_liq_ratio_per_mille,
                "between 1 and 1000",
            ));
        }

        if self.max_stop_loss_iterations == 0 {
            return Err(LockCurveError::invalid_config(
                "max_stop_loss_iterations",
                self.max_stop_loss_iterations,
                "greater than 0",
            ));
        }

        if self.min_price == 0 || self.min_price >= self.max_price {
            return Err(LockCurveError::invalid_config(
                "min_price",
                self.min_price,
                "non-zero and below max_price",
            ));
        }

        if self.initial_sol_reserve == 0 || self.initial_token_reserve == 0 {
            return Err(LockCurveError::invalid_config(
                "initial_reserves",
                format!("{}/{}", self.initial_sol_reserve, self.initial_token_reserve),
                "both greater than 0",
            ));
        }

        if self.max_fee > FEE_DENOMINATOR {
            return Err(LockCurveError::invalid_config(
                "max_fee",
                self.max_fee,
                "at most FEE_DENOMINATOR",
            ));
        }

        Ok(())
    }
}

// TOML has no 128-bit integers, so prices travel as decimal strings
#[cfg(feature = "client")]
mod u128_string {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &u128, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u128, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.trim().parse::<u128>().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ProtocolConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_orders_count, 10);
        assert_eq!(config.suggest_liq_ratio_per_mille, 975);
    }

    #[test]
    fn test_config_validation() {
        let mut config = ProtocolConfig::default();
        config.max_orders_count = 0;
        assert!(config.validate().is_err());

        let mut config = ProtocolConfig::default();
        config.price_adjustment_per_mille = 1000;
        assert!(config.validate().is_err());

        let mut config = ProtocolConfig::default();
        config.min_price = config.max_price;
        assert!(config.validate().is_err());

        let mut config = ProtocolConfig::default();
        config.initial_token_reserve = 0;
        assert!(config.validate().is_err());
    }
}
