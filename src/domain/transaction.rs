use crate::error::ConsoleError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

/// A non-negative monetary amount.
///
/// Wraps `rust_decimal::Decimal` so money never passes through a binary float.
/// Serialized as a JSON string (`"100.00"`); negative values are rejected on
/// the way in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(value: Decimal) -> Result<Self, ConsoleError> {
        if value >= Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(ConsoleError::Validation(format!(
                "Amount must not be negative: {}",
                value
            )))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = ConsoleError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl FromStr for Amount {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s.trim())
            .map_err(|e| ConsoleError::Validation(format!("Invalid amount '{}': {}", s, e)))?;
        Self::new(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

/// Outcome of a transaction. No other value is representable; anything else
/// coming from a backend fails deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionStatus {
    Approved,
    Declined,
    Undefined,
}

/// Processing stage, independent from the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionSituation {
    Received,
    Processed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Payment,
    Refund,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Approved => "APPROVED",
            TransactionStatus::Declined => "DECLINED",
            TransactionStatus::Undefined => "UNDEFINED",
        }
    }
}

impl TransactionSituation {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionSituation::Received => "RECEIVED",
            TransactionSituation::Processed => "PROCESSED",
        }
    }
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Payment => "PAYMENT",
            TransactionType::Refund => "REFUND",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl fmt::Display for TransactionSituation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "APPROVED" => Ok(Self::Approved),
            "DECLINED" => Ok(Self::Declined),
            "UNDEFINED" => Ok(Self::Undefined),
            other => Err(ConsoleError::Validation(format!(
                "Unknown transaction status: {}",
                other
            ))),
        }
    }
}

impl FromStr for TransactionSituation {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RECEIVED" => Ok(Self::Received),
            "PROCESSED" => Ok(Self::Processed),
            other => Err(ConsoleError::Validation(format!(
                "Unknown transaction situation: {}",
                other
            ))),
        }
    }
}

impl FromStr for TransactionType {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PAYMENT" => Ok(Self::Payment),
            "REFUND" => Ok(Self::Refund),
            other => Err(ConsoleError::Validation(format!(
                "Unknown transaction type: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BuyerInfo {
    pub document: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SellerInfo {
    pub document: String,
    pub name: String,
}

/// Card data as the console sees it: a display mask and an opaque token.
/// Raw card numbers never reach this type.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CardInfo {
    #[serde(rename = "cardInfo")]
    pub display: String,
    pub token: String,
}

/// Reference to the upstream payment order a transaction fulfills.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentOrderRef {
    pub id: String,
}

/// Immutable record of a processed payment or refund.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub payment_order: PaymentOrderRef,
    pub amount: Amount,
    pub currency: String,
    pub buyer_info: BuyerInfo,
    pub card_info: CardInfo,
    pub created_at: DateTime<Utc>,
    pub status: TransactionStatus,
    pub situation: TransactionSituation,
    pub r#type: TransactionType,
}
