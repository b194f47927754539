//! # Curve Engine
//!
//! Constant-product (x·y=k) quotes against a synthetic reserve pair.
//!
//! The invariant `k` is fixed at genesis. Every quote re-derives the reserve
//! pair from the price it is given instead of tracking reserve balances:
//!
//! ```text
//! token_reserve = sqrt(k / price)
//! sol_reserve   = price * token_reserve
//! ```
//!
//! Rounding never favours the trader: inputs round up, outputs and end
//! prices round down.

use bigdecimal::BigDecimal;
use num_traits::Zero;

use crate::config::ProtocolConfig;
use crate::constants::{
    FEE_DENOMINATOR, INITIAL_SOL_RESERVE, INITIAL_TOKEN_RESERVE, MAX_FEE, MAX_PRICE, MIN_PRICE,
};
use crate::errors::{CoreResult, LockCurveError};
use crate::math::fixed_point::{
    decimal_to_price, decimal_to_sol, decimal_to_token, price_to_decimal, sol_to_decimal,
    token_to_decimal, Rounding,
};
use crate::types::direction::Direction;

#[cfg(feature = "client")]
use serde::{Deserialize, Serialize};

/// Synthetic reserves implied by a price, in whole SOL and whole tokens
#[derive(Debug, Clone, PartialEq)]
pub struct ReservePair {
    pub sol_reserve: BigDecimal,
    pub token_reserve: BigDecimal,
}

impl ReservePair {
    /// Price implied by the pair (SOL per token)
    pub fn price(&self) -> CoreResult<BigDecimal> {
        if self.token_reserve.is_zero() {
            return Err(LockCurveError::NonPositiveResult("token reserve"));
        }
        Ok(&self.sol_reserve / &self.token_reserve)
    }
}

/// Amounts exchanged between two prices
///
/// Up: SOL in, token out. Down: token in, SOL out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct TradeQuote {
    pub amount_in: u64,
    pub amount_out: u64,
}

/// Result of sizing a trade by one leg
///
/// `amount` is the complementary leg: the output for an exact-in quote,
/// the required input for an exact-out quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct PriceQuote {
    pub end_price: u128,
    pub amount: u64,
}

/// Constant-product quote engine for one market
#[derive(Debug, Clone)]
pub struct CurveEngine {
    k: BigDecimal,
    initial_sol_reserve: BigDecimal,
    initial_token_reserve: BigDecimal,
    min_price: u128,
    max_price: u128,
    max_fee: u64,
}

impl Default for CurveEngine {
    fn default() -> Self {
        let initial_sol_reserve = BigDecimal::from(INITIAL_SOL_RESERVE);
        let initial_token_reserve = BigDecimal::from(INITIAL_TOKEN_RESERVE);
        Self {
            k: &initial_sol_reserve * &initial_token_reserve,
            initial_sol_reserve,
            initial_token_reserve,
            min_price: MIN_PRICE,
            max_price: MAX_PRICE,
            max_fee: MAX_FEE,
        }
    }
}

impl CurveEngine {
    /// Build an engine from genesis reserves (whole SOL, whole tokens)
    pub fn new(initial_sol_reserve: u64, initial_token_reserve: u64) -> CoreResult<Self> {
        Self::from_config(&ProtocolConfig {
            initial_sol_reserve,
            initial_token_reserve,
            ..ProtocolConfig::default()
        })
    }

    /// Build an engine from a validated protocol configuration
    pub fn from_config(config: &ProtocolConfig) -> CoreResult<Self> {
        config.validate()?;

        let initial_sol_reserve = BigDecimal::from(config.initial_sol_reserve);
        let initial_token_reserve = BigDecimal::from(config.initial_token_reserve);

        Ok(Self {
            k: &initial_sol_reserve * &initial_token_reserve,
            initial_sol_reserve,
            initial_token_reserve,
            min_price: config.min_price,
            max_price: config.max_price,
            max_fee: config.max_fee,
        })
    }

    /// The curve invariant in whole-unit terms
    pub fn k(&self) -> &BigDecimal {
        &self.k
    }

    pub fn min_price(&self) -> u128 {
        self.min_price
    }

    pub fn max_price(&self) -> u128 {
        self.max_price
    }

    /// Genesis price, the fallback for markets without trade history
    pub fn initial_price(&self) -> CoreResult<u128> {
        decimal_to_price(
            &(&self.initial_sol_reserve / &self.initial_token_reserve),
            Rounding::Floor,
        )
    }

    /// Check a price against the domain bounds
    pub fn check_price(&self, price: u128) -> CoreResult<()> {
        if price == 0 {
            return Err(LockCurveError::InvalidPrice);
        }
        if price < self.min_price {
            return Err(LockCurveError::PriceBelowMinimum {
                price,
                min: self.min_price,
            });
        }
        if price > self.max_price {
            return Err(LockCurveError::PriceAboveMaximum {
                price,
                max: self.max_price,
            });
        }
        Ok(())
    }

    /// Derive the synthetic reserve pair at `price`
    pub fn derive_reserves(&self, price: u128) -> CoreResult<ReservePair> {
        self.check_price(price)?;

        let price = price_to_decimal(price);
        let token_reserve = (&self.k / &price)
            .sqrt()
            .ok_or(LockCurveError::NonPositiveResult("token reserve"))?;
        let sol_reserve = &price * &token_reserve;

        Ok(ReservePair {
            sol_reserve,
            token_reserve,
        })
    }

    // ========================================================================
    // Quotes
    // ========================================================================

    /// Amounts exchanged moving the price from `start` to `end`
    ///
    /// `end` must lie strictly ahead of `start` in `direction`.
    pub fn quote_price_range(
        &self,
        direction: Direction,
        start: u128,
        end: u128,
    ) -> CoreResult<TradeQuote> {
        if !direction.is_ahead(start, end) {
            return Err(LockCurveError::NonMonotonicPrices { start, end });
        }

        let from = self.derive_reserves(start)?;
        let to = self.derive_reserves(end)?;

        match direction {
            Direction::Up => {
                let sol_in = &to.sol_reserve - &from.sol_reserve;
                let token_out = &from.token_reserve - &to.token_reserve;
                ensure_positive(&sol_in, "sol in")?;
                ensure_positive(&token_out, "token out")?;

                Ok(TradeQuote {
                    amount_in: decimal_to_sol(&sol_in, Rounding::Ceil)?,
                    amount_out: decimal_to_token(&token_out, Rounding::Floor)?,
                })
            }
            Direction::Down => {
                let token_in = &to.token_reserve - &from.token_reserve;
                let sol_out = &from.sol_reserve - &to.sol_reserve;
                ensure_positive(&token_in, "token in")?;
                ensure_positive(&sol_out, "sol out")?;

                Ok(TradeQuote {
                    amount_in: decimal_to_token(&token_in, Rounding::Ceil)?,
                    amount_out: decimal_to_sol(&sol_out, Rounding::Floor)?,
                })
            }
        }
    }

    /// End price and output when spending exactly `amount_in` from `start`
    ///
    /// Up spends lamports for tokens, Down spends tokens for lamports.
    pub fn quote_exact_in(
        &self,
        direction: Direction,
        start: u128,
        amount_in: u64,
    ) -> CoreResult<PriceQuote> {
        if amount_in == 0 {
            return Err(LockCurveError::NonPositiveResult("amount in"));
        }

        let from = self.derive_reserves(start)?;

        match direction {
            Direction::Up => {
                let sol_reserve = &from.sol_reserve + &sol_to_decimal(amount_in);
                let token_reserve = &self.k / &sol_reserve;
                let token_out = &from.token_reserve - &token_reserve;
                ensure_positive(&token_out, "token out")?;

                Ok(PriceQuote {
                    end_price: encode_end_price(&sol_reserve, &token_reserve)?,
                    amount: decimal_to_token(&token_out, Rounding::Floor)?,
                })
            }
            Direction::Down => {
                let token_reserve = &from.token_reserve + &token_to_decimal(amount_in);
                let sol_reserve = &self.k / &token_reserve;
                let sol_out = &from.sol_reserve - &sol_reserve;
                ensure_positive(&sol_out, "sol out")?;

                Ok(PriceQuote {
                    end_price: encode_end_price(&sol_reserve, &token_reserve)?,
                    amount: decimal_to_sol(&sol_out, Rounding::Floor)?,
                })
            }
        }
    }

    /// End price and required input when receiving exactly `amount_out` from `start`
    ///
    /// Up buys tokens with lamports, Down buys lamports with tokens.
    pub fn quote_exact_out(
        &self,
        direction: Direction,
        start: u128,
        amount_out: u64,
    ) -> CoreResult<PriceQuote> {
        if amount_out == 0 {
            return Err(LockCurveError::NonPositiveResult("amount out"));
        }

        let from = self.derive_reserves(start)?;

        match direction {
            Direction::Up => {
                let token_reserve = &from.token_reserve - &token_to_decimal(amount_out);
                ensure_positive(&token_reserve, "token reserve")?;
                let sol_reserve = &self.k / &token_reserve;
                let sol_in = &sol_reserve - &from.sol_reserve;
                ensure_positive(&sol_in, "sol in")?;

                Ok(PriceQuote {
                    end_price: encode_end_price(&sol_reserve, &token_reserve)?,
                    amount: decimal_to_sol(&sol_in, Rounding::Ceil)?,
                })
            }
            Direction::Down => {
                let sol_reserve = &from.sol_reserve - &sol_to_decimal(amount_out);
                ensure_positive(&sol_reserve, "sol reserve")?;
                let token_reserve = &self.k / &sol_reserve;
                let token_in = &token_reserve - &from.token_reserve;
                ensure_positive(&token_in, "token in")?;

                Ok(PriceQuote {
                    end_price: encode_end_price(&sol_reserve, &token_reserve)?,
                    amount: decimal_to_token(&token_in, Rounding::Ceil)?,
                })
            }
        }
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    /// Amount left after deducting a fee expressed over `FEE_DENOMINATOR`
    pub fn fee_after(&self, amount: u64, fee: u64) -> CoreResult<u64> {
        if fee > self.max_fee {
            return Err(LockCurveError::FeeTooHigh {
                fee,
                max: self.max_fee,
            });
        }

        let fee_amount = u128::from(amount) * u128::from(fee) / u128::from(FEE_DENOMINATOR);
        // fee <= FEE_DENOMINATOR, so fee_amount <= amount
        Ok(amount - fee_amount as u64)
    }

    /// Zero-slippage value of `amount` at `price`, in the other currency
    ///
    /// `amount_is_sol` selects lamports -> tokens, otherwise tokens -> lamports.
    /// Rounds down.
    pub fn value_at_price(
        &self,
        price: u128,
        amount: u64,
        amount_is_sol: bool,
    ) -> CoreResult<u64> {
        self.check_price(price)?;
        let price = price_to_decimal(price);

        if amount_is_sol {
            decimal_to_token(&(&sol_to_decimal(amount) / &price), Rounding::Floor)
        } else {
            decimal_to_sol(&(&token_to_decimal(amount) * &price), Rounding::Floor)
        }
    }
}

fn ensure_positive(value: &BigDecimal, what: &'static str) -> CoreResult<()> {
    if *value <= BigDecimal::zero() {
        return Err(LockCurveError::NonPositiveResult(what));
    }
    Ok(())
}

fn encode_end_price(sol_reserve: &BigDecimal, token_reserve: &BigDecimal) -> CoreResult<u128> {
    let price = decimal_to_price(&(sol_reserve / token_reserve), Rounding::Floor)?;
    if price == 0 {
        return Err(LockCurveError::NonPositiveResult("end price"));
    }
    Ok(price)
}
