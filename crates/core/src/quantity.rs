//! Quantities
//!
//! Every quantity that reaches the cart API goes through [`Quantity`]. Raw user
//! input is parsed once at the boundary; nothing downstream re-checks it.

use std::{fmt, num::NonZeroU32, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while turning raw input into a [`Quantity`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantityError {
    /// The value was zero or negative.
    #[error("quantity must be at least 1, got {0}")]
    NotPositive(i64),

    /// The value had a fractional part.
    #[error("quantity must be a whole number, got {0}")]
    NotWhole(String),

    /// The value did not fit in the supported range.
    #[error("quantity {0} is too large")]
    TooLarge(String),

    /// The input was not a number at all.
    #[error("quantity must be a number, got {0:?}")]
    NotANumber(String),
}

/// A positive whole number of units on a cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct Quantity(NonZeroU32);

impl Quantity {
    /// One unit.
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// Create a quantity from an unsigned count.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::NotPositive`] for zero.
    pub fn new(count: u32) -> Result<Self, QuantityError> {
        NonZeroU32::new(count)
            .map(Self)
            .ok_or(QuantityError::NotPositive(0))
    }

    /// Number of units.
    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<Quantity> for u32 {
    fn from(value: Quantity) -> Self {
        value.get()
    }
}

impl TryFrom<i64> for Quantity {
    type Error = QuantityError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value < 1 {
            return Err(QuantityError::NotPositive(value));
        }

        let Ok(count) = u32::try_from(value) else {
            return Err(QuantityError::TooLarge(value.to_string()));
        };

        Self::new(count)
    }
}

impl TryFrom<f64> for Quantity {
    type Error = QuantityError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::try_from(whole_number(value)?)
    }
}

impl FromStr for Quantity {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(parse_requested(s)?)
    }
}

/// What a requested quantity change means for a cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityUpdate {
    /// Set the line to this many units.
    Set(Quantity),

    /// Drop the line from the cart.
    Remove,
}

impl QuantityUpdate {
    /// Interpret a requested count. Anything below one removes the line.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::TooLarge`] when the count does not fit.
    pub fn from_requested(requested: i64) -> Result<Self, QuantityError> {
        if requested < 1 {
            return Ok(Self::Remove);
        }

        Quantity::try_from(requested).map(Self::Set)
    }
}

impl FromStr for QuantityUpdate {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_requested(parse_requested(s)?)
    }
}

/// Parse a user-entered count, accepting `"3"` and `"3.0"` but not `"2.5"`.
fn parse_requested(raw: &str) -> Result<i64, QuantityError> {
    let trimmed = raw.trim();

    if let Ok(value) = trimmed.parse::<i64>() {
        return Ok(value);
    }

    let Ok(value) = trimmed.parse::<f64>() else {
        return Err(QuantityError::NotANumber(raw.to_string()));
    };

    whole_number(value)
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "value is checked to be integral and within i64 range first"
)]
fn whole_number(value: f64) -> Result<i64, QuantityError> {
    if !value.is_finite() {
        return Err(QuantityError::NotANumber(value.to_string()));
    }

    if value.fract() != 0.0 {
        return Err(QuantityError::NotWhole(value.to_string()));
    }

    if value.abs() > f64::from(u32::MAX) {
        return Err(QuantityError::TooLarge(value.to_string()));
    }

    Ok(value as i64)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parses_plain_integers() -> TestResult {
        let quantity: Quantity = " 3 ".parse()?;

        assert_eq!(quantity.get(), 3);

        Ok(())
    }

    #[test]
    fn accepts_integral_floats() -> TestResult {
        assert_eq!("4.0".parse::<Quantity>()?.get(), 4);
        assert_eq!(Quantity::try_from(2.0_f64)?.get(), 2);

        Ok(())
    }

    #[test]
    fn rejects_fractions() {
        assert_eq!(
            "2.5".parse::<Quantity>(),
            Err(QuantityError::NotWhole("2.5".to_string()))
        );
    }

    #[test]
    fn rejects_non_positive() {
        assert_eq!(Quantity::try_from(0_i64), Err(QuantityError::NotPositive(0)));
        assert_eq!(
            "-2".parse::<Quantity>(),
            Err(QuantityError::NotPositive(-2))
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            "two".parse::<Quantity>(),
            Err(QuantityError::NotANumber(_))
        ));
        assert!(matches!(
            Quantity::try_from(f64::NAN),
            Err(QuantityError::NotANumber(_))
        ));
    }

    #[test]
    fn rejects_overflow() {
        assert!(matches!(
            Quantity::try_from(i64::from(u32::MAX) + 1),
            Err(QuantityError::TooLarge(_))
        ));
    }

    #[test]
    fn below_one_means_remove() -> TestResult {
        assert_eq!(QuantityUpdate::from_requested(0)?, QuantityUpdate::Remove);
        assert_eq!(QuantityUpdate::from_requested(-5)?, QuantityUpdate::Remove);
        assert_eq!("0".parse::<QuantityUpdate>()?, QuantityUpdate::Remove);
        assert_eq!(
            QuantityUpdate::from_requested(2)?,
            QuantityUpdate::Set(Quantity::new(2)?)
        );

        Ok(())
    }

    #[test]
    fn fractional_update_is_still_an_error() {
        assert!("1.5".parse::<QuantityUpdate>().is_err());
    }
}
