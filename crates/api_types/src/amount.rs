use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use thiserror::Error;

/// Decimal money amount represented as **integer cents**.
///
/// The backend is inconsistent about how it encodes amounts on the wire: a
/// balance may arrive as a JSON number (`12.5`) or as a decimal string
/// (`"12.50"`). Both deserialize to the same `Amount`; a string that does
/// not parse as a two-decimal number is a deserialization error, never a
/// silent zero.
///
/// Serialization always emits a decimal string (`"12.50"`), which the
/// backend's decimal fields accept.
///
/// # Examples
///
/// ```rust
/// use api_types::Amount;
///
/// let amount = Amount::from_cents(12_34);
/// assert_eq!(amount.cents(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// assert_eq!("12.34".parse::<Amount>().unwrap(), amount);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Amount(i64);

/// Errors from parsing a decimal amount string.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AmountParseError {
    #[error("empty amount")]
    Empty,
    #[error("invalid amount: {0}")]
    Invalid(String),
    #[error("too many decimals: {0}")]
    TooManyDecimals(String),
    #[error("amount too large: {0}")]
    Overflow(String),
}

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is 0.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Converts a float amount (as received in a JSON number) by rounding
    /// to the nearest cent.
    #[must_use]
    pub fn from_f64(value: f64) -> Self {
        Self((value * 100.0).round() as i64)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = abs / 100;
        let cents = abs % 100;
        write!(f, "{sign}{units}.{cents:02}")
    }
}

impl FromStr for Amount {
    type Err = AmountParseError;

    /// Parses a decimal string into cents.
    ///
    /// Accepts an optional leading `+`/`-` and at most two fractional
    /// digits after a `.` (the wire format never uses a comma separator).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AmountParseError::Invalid(s.to_string());
        let overflow = || AmountParseError::Overflow(s.to_string());

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AmountParseError::Empty);
        }

        let (sign, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (-1i64, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (1i64, stripped)
        } else {
            (1i64, trimmed)
        };

        if rest.is_empty() {
            return Err(AmountParseError::Empty);
        }

        let mut parts = rest.split('.');
        let units_str = parts.next().ok_or_else(invalid)?;
        let cents_str = parts.next();

        if parts.next().is_some() {
            return Err(invalid());
        }

        if units_str.is_empty() || !units_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let units: i64 = units_str.parse().map_err(|_| invalid())?;

        let cents: i64 = match cents_str {
            None | Some("") => 0,
            Some(frac) => {
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                match frac.len() {
                    1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
                    2 => frac.parse::<i64>().map_err(|_| invalid())?,
                    _ => return Err(AmountParseError::TooManyDecimals(s.to_string())),
                }
            }
        };

        let total = units
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .ok_or_else(overflow)?;

        let signed = if sign < 0 {
            total.checked_neg().ok_or_else(overflow)?
        } else {
            total
        };

        Ok(Amount(signed))
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AmountVisitor;

        impl de::Visitor<'_> for AmountVisitor {
            type Value = Amount;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a decimal number or a decimal string")
            }

            fn visit_f64<E: de::Error>(self, value: f64) -> Result<Amount, E> {
                Ok(Amount::from_f64(value))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Amount, E> {
                value
                    .checked_mul(100)
                    .map(Amount)
                    .ok_or_else(|| E::custom("amount too large"))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Amount, E> {
                i64::try_from(value)
                    .ok()
                    .and_then(|v| v.checked_mul(100))
                    .map(Amount)
                    .ok_or_else(|| E::custom("amount too large"))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Amount, E> {
                value.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(AmountVisitor)
    }
}
