use super::transaction::{Amount, Transaction, TransactionStatus, TransactionType};
use serde::{Deserialize, Serialize};

/// Aggregate figures shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_transactions: u64,
    pub total_amount: Amount,
    pub approved_transactions: u64,
    pub declined_transactions: u64,
    pub pending_transactions: u64,
    pub total_refunds: u64,
    pub refund_amount: Amount,
}

impl DashboardStats {
    /// Derives the aggregates from a dataset.
    ///
    /// Payment counters only look at `PAYMENT` records; `UNDEFINED` payments
    /// count as pending. Amount totals only include approved records.
    pub fn from_transactions<'a, I>(transactions: I) -> Self
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut stats = Self::default();

        for tx in transactions {
            match tx.r#type {
                TransactionType::Payment => {
                    stats.total_transactions += 1;
                    match tx.status {
                        TransactionStatus::Approved => {
                            stats.approved_transactions += 1;
                            stats.total_amount += tx.amount;
                        }
                        TransactionStatus::Declined => stats.declined_transactions += 1,
                        TransactionStatus::Undefined => stats.pending_transactions += 1,
                    }
                }
                TransactionType::Refund => {
                    stats.total_refunds += 1;
                    if tx.status == TransactionStatus::Approved {
                        stats.refund_amount += tx.amount;
                    }
                }
            }
        }

        stats
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn up() -> Self {
        Self {
            status: "UP".to_string(),
        }
    }

    pub fn is_up(&self) -> bool {
        self.status.eq_ignore_ascii_case("UP")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::transaction::{BuyerInfo, CardInfo, PaymentOrderRef, TransactionSituation};
    use chrono::Utc;

    fn tx(amount: &str, status: TransactionStatus, r#type: TransactionType) -> Transaction {
        Transaction {
            id: "id".to_string(),
            payment_order: PaymentOrderRef {
                id: "order".to_string(),
            },
            amount: amount.parse().unwrap(),
            currency: "USD".to_string(),
            buyer_info: BuyerInfo::default(),
            card_info: CardInfo::default(),
            created_at: Utc::now(),
            status,
            situation: TransactionSituation::Processed,
            r#type,
        }
    }

    #[test]
    fn test_stats_from_transactions() {
        let dataset = vec![
            tx("100.00", TransactionStatus::Approved, TransactionType::Payment),
            tx("250.00", TransactionStatus::Declined, TransactionType::Payment),
            tx("40.50", TransactionStatus::Approved, TransactionType::Payment),
            tx("9.99", TransactionStatus::Undefined, TransactionType::Payment),
            tx("20.00", TransactionStatus::Approved, TransactionType::Refund),
        ];

        let stats = DashboardStats::from_transactions(&dataset);

        assert_eq!(stats.total_transactions, 4);
        assert_eq!(stats.approved_transactions, 2);
        assert_eq!(stats.declined_transactions, 1);
        assert_eq!(stats.pending_transactions, 1);
        assert_eq!(stats.total_amount, "140.50".parse().unwrap());
        assert_eq!(stats.total_refunds, 1);
        assert_eq!(stats.refund_amount, "20.00".parse().unwrap());
    }

    #[test]
    fn test_stats_of_empty_dataset() {
        let stats = DashboardStats::from_transactions(&Vec::<Transaction>::new());
        assert_eq!(stats, DashboardStats::default());
    }

    #[test]
    fn test_health_status() {
        let health: HealthStatus = serde_json::from_str(r#"{"status":"up"}"#).unwrap();
        assert!(health.is_up());
        assert!(!HealthStatus {
            status: "DOWN".to_string()
        }
        .is_up());
    }
}
