//! Fixed-point monetary amount.
//!
//! Amounts travel to and from the gateway as invariant-culture decimal
//! strings (`.` separator, no grouping). Comparison is exact decimal equality
//! at two decimal places; floats are never involved.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Number of decimal places the gateway works with.
const SCALE: u32 = 2;

/// Monetary amount in the store currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// Wraps a decimal value as-is (order totals may carry more precision).
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the inner decimal.
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Rounds to two decimal places using banker's rounding.
    pub fn rounded(&self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(SCALE, RoundingStrategy::MidpointNearestEven),
        )
    }

    /// Formats as a fixed two-decimal invariant string, e.g. `250.00`.
    pub fn to_invariant_string(&self) -> String {
        let mut rounded = self.rounded().0;
        rounded.rescale(SCALE);
        rounded.to_string()
    }

    /// Parses an invariant-culture decimal string such as `99.99`.
    ///
    /// Grouping separators, exponents and surrounding garbage are rejected.
    pub fn parse_invariant(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        let well_formed = !trimmed.is_empty()
            && trimmed
                .chars()
                .enumerate()
                .all(|(i, c)| c.is_ascii_digit() || c == '.' || (i == 0 && c == '-'));
        if !well_formed {
            return Err(ValidationError::invalid_format(
                "amount",
                format!("'{}' is not an invariant decimal", s),
            ));
        }
        Decimal::from_str(trimmed)
            .map(Self)
            .map_err(|e| ValidationError::invalid_format("amount", e.to_string()))
    }

    /// Exact equality once this amount is rounded to gateway precision.
    ///
    /// `other` is compared unrounded, so `250.004` received never matches.
    pub fn matches_gateway_amount(&self, other: &Amount) -> bool {
        self.rounded().0 == other.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_invariant_string())
    }
}

impl FromStr for Amount {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_invariant(s)
    }
}
