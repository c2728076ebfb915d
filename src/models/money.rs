//! Money type for representing currency amounts
//!
//! Internally stores amounts as integer minor units (cents for a scale of 2)
//! so that arithmetic and equality are exact. Decimal text and external
//! floating-point values are converted only at the boundary, and any input
//! carrying more fractional precision than the scale is rejected rather than
//! rounded.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

use crate::error::{MatchError, MatchResult};

/// Default number of fractional digits (cents)
pub const DEFAULT_SCALE: u32 = 2;

/// Largest supported minor-unit scale
pub const MAX_SCALE: u32 = 6;

/// Represents a monetary amount stored as integer minor units
///
/// Two amounts are equal iff their minor-unit integers are equal; there is no
/// epsilon comparison anywhere in the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from minor units
    ///
    /// # Examples
    /// ```
    /// use bankrec_match::models::Money;
    /// let amount = Money::from_minor(24900); // $249.00
    /// assert_eq!(amount.to_string(), "$249.00");
    /// ```
    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in minor units
    pub const fn minor_units(&self) -> i64 {
        self.0
    }

    /// Check if the amount is zero
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Check if the amount is positive
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Check if the amount is negative
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Get the absolute value
    pub const fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Add, returning `None` on overflow
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Subtract, returning `None` on overflow
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Parse a decimal amount with the default scale of two places
    ///
    /// Accepts formats: "10.50", "-10.50", "$10.50", "10", "10.5".
    /// Rejects "10.505" (too precise), "NaN", "inf" and empty input.
    pub fn parse(s: &str) -> MatchResult<Self> {
        Self::parse_with_scale(s, DEFAULT_SCALE)
    }

    /// Parse a decimal amount into minor units of the given scale
    pub fn parse_with_scale(s: &str, scale: u32) -> MatchResult<Self> {
        let factor = scale_factor(scale)?;
        let original = s;
        let s = s.trim();

        let (negative, s) = match s.strip_prefix('-') {
            Some(stripped) => (true, stripped),
            None => (false, s),
        };
        let s = s.strip_prefix('$').unwrap_or(s);

        let (whole, fraction) = match s.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (s, ""),
        };

        if whole.is_empty() || !is_digits(whole) || !is_digits(fraction) {
            return Err(MatchError::InvalidAmount(format!(
                "'{}' is not a finite decimal amount",
                original.trim()
            )));
        }

        if fraction.len() > scale as usize {
            return Err(MatchError::InvalidAmount(format!(
                "'{}' has more than {} decimal places",
                original.trim(),
                scale
            )));
        }

        let overflow = || MatchError::InvalidAmount(format!("'{}' is out of range", original.trim()));

        let whole: i64 = whole.parse().map_err(|_| overflow())?;
        let fraction: i64 = if fraction.is_empty() {
            0
        } else {
            // Pad to the full scale: "5" at scale 2 means 50 minor units
            let padding = 10_i64.pow(scale - fraction.len() as u32);
            fraction.parse::<i64>().map_err(|_| overflow())? * padding
        };

        let minor = whole
            .checked_mul(factor)
            .and_then(|m| m.checked_add(fraction))
            .ok_or_else(overflow)?;

        Ok(Self(if negative { -minor } else { minor }))
    }

    /// Convert an external floating-point value without rounding
    ///
    /// The shortest decimal rendering of `value` must fit the scale, so
    /// `216.99` converts exactly while `0.125` at scale 2 is rejected.
    pub fn from_f64_with_scale(value: f64, scale: u32) -> MatchResult<Self> {
        if !value.is_finite() {
            return Err(MatchError::InvalidAmount(format!(
                "{} is not a finite amount",
                value
            )));
        }
        Self::parse_with_scale(&value.to_string(), scale)
    }

    /// Render as plain decimal text without a currency symbol
    pub fn to_decimal_string(&self, scale: u32) -> String {
        self.format_scaled("", scale)
    }

    /// Format with a currency symbol at the given scale
    pub fn format_scaled(&self, symbol: &str, scale: u32) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();

        if scale == 0 {
            return format!("{}{}{}", sign, symbol, magnitude);
        }

        let factor = 10_u64.pow(scale.min(MAX_SCALE));
        format!(
            "{}{}{}.{:0width$}",
            sign,
            symbol,
            magnitude / factor,
            magnitude % factor,
            width = scale.min(MAX_SCALE) as usize
        )
    }

    /// Format with a currency symbol at the default scale
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        self.format_scaled(symbol, DEFAULT_SCALE)
    }
}

fn scale_factor(scale: u32) -> MatchResult<i64> {
    if scale > MAX_SCALE {
        return Err(MatchError::Config(format!(
            "minor unit scale {} exceeds the maximum of {}",
            scale, MAX_SCALE
        )));
    }
    Ok(10_i64.pow(scale))
}

fn is_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with_symbol("$"))
    }
}

impl FromStr for Money {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> std::iter::Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

/// An amount as it appears in external input: decimal text or a JSON number
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Text(String),
    Number(f64),
}

impl RawAmount {
    /// Convert at the given scale, rejecting anything that would need rounding
    pub fn to_money(&self, scale: u32) -> MatchResult<Money> {
        match self {
            RawAmount::Text(s) => Money::parse_with_scale(s, scale),
            RawAmount::Number(n) => Money::from_f64_with_scale(*n, scale),
        }
    }
}

/// Serde adapter for item records: writes "249.00", reads either a
/// decimal string or a JSON number.
///
/// Fixed at [`DEFAULT_SCALE`]. Catalog loaders read amounts through
/// [`RawAmount::to_money`] with the configured scale instead.
pub mod decimal {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{Money, RawAmount, DEFAULT_SCALE};

    pub fn serialize<S: Serializer>(amount: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&amount.to_decimal_string(DEFAULT_SCALE))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        RawAmount::deserialize(deserializer)?
            .to_money(DEFAULT_SCALE)
            .map_err(serde::de::Error::custom)
    }
}
