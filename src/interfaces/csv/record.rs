use crate::domain::transaction::{
    BuyerInfo, CardInfo, PaymentOrderRef, Transaction, TransactionSituation, TransactionStatus,
    TransactionType,
};
use crate::error::ConsoleError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Flat CSV row for a transaction.
///
/// Every column is kept as text and validated when converted, so amounts are
/// never read through a float.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: String,
    pub payment_order: String,
    pub amount: String,
    pub currency: String,
    pub buyer_document: String,
    pub buyer_name: String,
    pub card: String,
    #[serde(default)]
    pub card_token: Option<String>,
    pub created_at: String,
    pub status: String,
    pub situation: String,
    pub r#type: String,
}

impl From<&Transaction> for TransactionRecord {
    /// Card tokens are left out of exported rows.
    fn from(tx: &Transaction) -> Self {
        Self {
            id: tx.id.clone(),
            payment_order: tx.payment_order.id.clone(),
            amount: tx.amount.to_string(),
            currency: tx.currency.clone(),
            buyer_document: tx.buyer_info.document.clone(),
            buyer_name: tx.buyer_info.name.clone(),
            card: tx.card_info.display.clone(),
            card_token: None,
            created_at: tx.created_at.to_rfc3339(),
            status: tx.status.to_string(),
            situation: tx.situation.to_string(),
            r#type: tx.r#type.to_string(),
        }
    }
}

impl TryFrom<TransactionRecord> for Transaction {
    type Error = ConsoleError;

    fn try_from(record: TransactionRecord) -> Result<Self, Self::Error> {
        if record.id.is_empty() {
            return Err(ConsoleError::Validation(
                "Transaction id must not be empty".to_string(),
            ));
        }

        let created_at = DateTime::parse_from_rfc3339(&record.created_at)
            .map_err(|e| {
                ConsoleError::Validation(format!(
                    "Invalid created_at '{}' for transaction {}: {}",
                    record.created_at, record.id, e
                ))
            })?
            .with_timezone(&Utc);

        Ok(Self {
            payment_order: PaymentOrderRef {
                id: record.payment_order,
            },
            amount: record.amount.parse()?,
            currency: record.currency,
            buyer_info: BuyerInfo {
                document: record.buyer_document,
                name: record.buyer_name,
            },
            card_info: CardInfo {
                display: record.card,
                token: record.card_token.unwrap_or_default(),
            },
            created_at,
            status: record.status.parse::<TransactionStatus>()?,
            situation: record.situation.parse::<TransactionSituation>()?,
            r#type: record.r#type.parse::<TransactionType>()?,
            id: record.id,
        })
    }
}
