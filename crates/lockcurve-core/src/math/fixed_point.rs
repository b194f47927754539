//! # Fixed-Point Conversion
//!
//! Lossless conversion between arbitrary-precision decimals and the three
//! integer encodings used on-chain:
//! - Price: u128 with 28 fractional digits
//! - SOL: u64 lamports with 9 fractional digits
//! - Token: u64 base units with 6 fractional digits
//!
//! Encoding always takes an explicit rounding direction. Values that are
//! negative or do not fit the target width are rejected, never wrapped.

use std::str::FromStr;

use bigdecimal::{BigDecimal, RoundingMode};
use num_bigint::{BigInt, Sign};
use num_traits::ToPrimitive;

use crate::constants::{PRICE_DECIMALS, SOL_DECIMALS, TOKEN_DECIMALS};
use crate::errors::{CoreResult, LockCurveError};

/// Rounding direction for encoding a decimal into a fixed-point integer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub enum Rounding {
    /// Round toward negative infinity
    Floor,
    /// Round toward positive infinity
    Ceil,
}

impl From<Rounding> for RoundingMode {
    fn from(rounding: Rounding) -> Self {
        match rounding {
            Rounding::Floor => RoundingMode::Floor,
            Rounding::Ceil => RoundingMode::Ceiling,
        }
    }
}

// ============================================================================
// Generic Conversion
// ============================================================================

/// Decode a raw fixed-point integer into a decimal with `decimals` fractional digits
pub fn to_decimal(raw: u128, decimals: u32) -> BigDecimal {
    BigDecimal::new(BigInt::from(raw), i64::from(decimals))
}

/// Scale a decimal by 10^decimals and round it to an integer
fn scale_to_integer(
    value: &BigDecimal,
    decimals: u32,
    rounding: Rounding,
) -> CoreResult<BigInt> {
    let (raw, _) = value
        .with_scale_round(i64::from(decimals), rounding.into())
        .into_bigint_and_exponent();

    if raw.sign() == Sign::Minus {
        return Err(LockCurveError::Overflow("negative fixed-point value"));
    }

    Ok(raw)
}

/// Encode a decimal into a u128 with `decimals` fractional digits
pub fn from_decimal_u128(
    value: &BigDecimal,
    decimals: u32,
    rounding: Rounding,
) -> CoreResult<u128> {
    scale_to_integer(value, decimals, rounding)?
        .to_u128()
        .ok_or(LockCurveError::Overflow("value exceeds u128"))
}

/// Encode a decimal into a u64 with `decimals` fractional digits
pub fn from_decimal_u64(
    value: &BigDecimal,
    decimals: u32,
    rounding: Rounding,
) -> CoreResult<u64> {
    scale_to_integer(value, decimals, rounding)?
        .to_u64()
        .ok_or(LockCurveError::Overflow("value exceeds u64"))
}

/// Parse a human-readable decimal string
///
/// Anything that is not a finite decimal number ("NaN", "inf", empty input)
/// is rejected.
pub fn parse_decimal(input: &str) -> CoreResult<BigDecimal> {
    BigDecimal::from_str(input.trim())
        .map_err(|_| LockCurveError::Overflow("not a decimal number"))
}

// ============================================================================
// Typed Helpers
// ============================================================================

/// Decode a raw price into a decimal SOL-per-token value
pub fn price_to_decimal(price: u128) -> BigDecimal {
    to_decimal(price, PRICE_DECIMALS)
}

/// Encode a decimal SOL-per-token value into a raw price
pub fn decimal_to_price(value: &BigDecimal, rounding: Rounding) -> CoreResult<u128> {
    from_decimal_u128(value, PRICE_DECIMALS, rounding)
}

/// Decode lamports into whole SOL
pub fn sol_to_decimal(lamports: u64) -> BigDecimal {
    to_decimal(u128::from(lamports), SOL_DECIMALS)
}

/// Encode whole SOL into lamports
pub fn decimal_to_sol(value: &BigDecimal, rounding: Rounding) -> CoreResult<u64> {
    from_decimal_u64(value, SOL_DECIMALS, rounding)
}

/// Decode token base units into whole tokens
pub fn token_to_decimal(amount: u64) -> BigDecimal {
    to_decimal(u128::from(amount), TOKEN_DECIMALS)
}

/// Encode whole tokens into base units
pub fn decimal_to_token(value: &BigDecimal, rounding: Rounding) -> CoreResult<u64> {
    from_decimal_u64(value, TOKEN_DECIMALS, rounding)
}

/// Parse a decimal price string ("0.0000000279...") into a raw price
pub fn parse_price(input: &str, rounding: Rounding) -> CoreResult<u128> {
    decimal_to_price(&parse_decimal(input)?, rounding)
}
