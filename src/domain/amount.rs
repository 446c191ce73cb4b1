use crate::error::QrisError;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A positive, whole transaction amount in rupiah.
///
/// QRIS amounts carried in tag `54` are rendered without grouping separators,
/// decimals or leading zeros, so the only valid amounts are positive integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct Amount(u64);

impl Amount {
    pub fn new(value: u64) -> Result<Self, QrisError> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(QrisError::InvalidAmount(
                "Amount must be positive".to_string(),
            ))
        }
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// Adds a fee on top of the amount.
    pub fn checked_add(self, fee: u64) -> Result<Self, QrisError> {
        self.0
            .checked_add(fee)
            .map(Self)
            .ok_or_else(|| QrisError::InvalidAmount(format!("{} + {} overflows", self.0, fee)))
    }
}

impl TryFrom<u64> for Amount {
    type Error = QrisError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = QrisError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        if value <= Decimal::ZERO {
            return Err(QrisError::InvalidAmount(format!(
                "Amount must be positive, got {}",
                value
            )));
        }
        if !value.fract().is_zero() {
            return Err(QrisError::InvalidAmount(format!(
                "Amount must be a whole number, got {}",
                value
            )));
        }
        let whole = value
            .to_u64()
            .ok_or_else(|| QrisError::InvalidAmount(format!("Amount {} is too large", value)))?;
        Self::new(whole)
    }
}

impl FromStr for Amount {
    type Err = QrisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s.trim())
            .map_err(|_| QrisError::InvalidAmount(format!("{:?} is not a number", s)))?;
        Self::try_from(value)
    }
}

impl From<Amount> for u64 {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
