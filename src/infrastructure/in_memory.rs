use crate::config::MockConfig;
use crate::domain::payment::{PaymentRequest, PaymentResult, RefundRequest};
use crate::domain::ports::PaymentBackend;
use crate::domain::query::{PageRequest, PaginatedResponse, TransactionFilter, paginate};
use crate::domain::stats::{DashboardStats, HealthStatus};
use crate::domain::transaction::{
    Amount, BuyerInfo, CardInfo, PaymentOrderRef, Transaction, TransactionSituation, TransactionStatus,
    TransactionType,
};
use crate::error::{ApiError, ApiResult};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use rand::distributions::Bernoulli;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

/// In-memory backend for environments without a reachable payment service.
///
/// Holds a hand-seeded dataset behind `Arc<RwLock<Vec<Transaction>>>`. Reads
/// always work on a full copy, so callers never observe a reference into the
/// shared state. Processed payments and refunds append new records.
#[derive(Clone)]
pub struct MockBackend {
    transactions: Arc<RwLock<Vec<Transaction>>>,
    rng: Arc<Mutex<StdRng>>,
    sequence: Arc<AtomicU64>,
    config: MockConfig,
}

impl MockBackend {
    /// Creates a mock backend holding the default seed dataset.
    pub fn new(config: MockConfig) -> Self {
        Self::with_transactions(config, seed_transactions())
    }

    /// Creates a mock backend over a caller-supplied dataset.
    pub fn with_transactions(config: MockConfig, transactions: Vec<Transaction>) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            transactions: Arc::new(RwLock::new(transactions)),
            rng: Arc::new(Mutex::new(rng)),
            sequence: Arc::new(AtomicU64::new(1)),
            config,
        }
    }

    /// Copy of the current dataset in insertion order.
    pub async fn snapshot(&self) -> Vec<Transaction> {
        self.transactions.read().await.clone()
    }

    async fn simulate_latency(&self, delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    fn next_id(&self, prefix: &str) -> String {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}-{}", prefix, Utc::now().timestamp_millis(), seq)
    }

    async fn append(&self, tx: Transaction) {
        self.transactions.write().await.push(tx);
    }
}

#[async_trait]
impl PaymentBackend for MockBackend {
    async fn create_payment(&self, request: PaymentRequest) -> ApiResult<PaymentResult> {
        self.simulate_latency(self.config.latency.payment).await;

        let approval = Bernoulli::new(self.config.approval_rate).map_err(|e| {
            ApiError::unknown(format!(
                "Invalid approval rate {}: {}",
                self.config.approval_rate, e
            ))
        })?;
        let approved = self.rng.lock().await.sample(approval);
        let status = if approved {
            TransactionStatus::Approved
        } else {
            TransactionStatus::Declined
        };

        let id = self.next_id("txn");
        self.append(Transaction {
            id: id.clone(),
            payment_order: PaymentOrderRef {
                id: self.next_id("order"),
            },
            amount: request.amount,
            currency: request.currency,
            buyer_info: request.buyer_info,
            card_info: request.card_info,
            created_at: Utc::now(),
            status,
            situation: TransactionSituation::Processed,
            r#type: TransactionType::Payment,
        })
        .await;

        debug!("Simulated payment {} resolved as {}", id, status);

        if approved {
            Ok(PaymentResult {
                status,
                transaction_id: Some(id),
                message: Some("Payment processed successfully".to_string()),
            })
        } else {
            Ok(PaymentResult {
                status,
                transaction_id: None,
                message: Some("Payment declined - insufficient funds".to_string()),
            })
        }
    }

    async fn get_transactions(
        &self,
        filter: &TransactionFilter,
        page: PageRequest,
    ) -> ApiResult<PaginatedResponse<Transaction>> {
        self.simulate_latency(self.config.latency.list).await;

        let mut matching: Vec<Transaction> = self
            .snapshot()
            .await
            .into_iter()
            .filter(|tx| filter.matches(tx))
            .collect();
        // Stable sort: records sharing a timestamp keep insertion order.
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(paginate(matching, page))
    }

    async fn get_transaction(&self, id: &str) -> ApiResult<Transaction> {
        self.simulate_latency(self.config.latency.lookup).await;

        self.transactions
            .read()
            .await
            .iter()
            .find(|tx| tx.id == id)
            .cloned()
            .ok_or_else(|| ApiError::not_found(format!("Transaction not found: {}", id)))
    }

    async fn create_refund(&self, request: RefundRequest) -> ApiResult<PaymentResult> {
        self.simulate_latency(self.config.latency.refund).await;

        let id = self.next_id("refund");
        let original = self
            .transactions
            .read()
            .await
            .iter()
            .find(|tx| tx.id == request.transaction_id)
            .cloned();

        match original {
            Some(original) => {
                self.append(Transaction {
                    id: id.clone(),
                    payment_order: original.payment_order,
                    amount: request.amount,
                    currency: request.currency,
                    buyer_info: original.buyer_info,
                    card_info: original.card_info,
                    created_at: Utc::now(),
                    status: TransactionStatus::Approved,
                    situation: TransactionSituation::Processed,
                    r#type: TransactionType::Refund,
                })
                .await;
            }
            None => warn!(
                "Refund {} references unknown transaction {}; no record kept",
                id, request.transaction_id
            ),
        }

        Ok(PaymentResult {
            status: TransactionStatus::Approved,
            transaction_id: Some(id),
            message: Some("Refund processed successfully".to_string()),
        })
    }

    async fn get_dashboard_stats(&self) -> ApiResult<DashboardStats> {
        self.simulate_latency(self.config.latency.stats).await;

        if let Some(fixture) = &self.config.stats_fixture {
            return Ok(fixture.clone());
        }
        let transactions = self.transactions.read().await;
        Ok(DashboardStats::from_transactions(transactions.iter()))
    }

    async fn health_check(&self) -> ApiResult<HealthStatus> {
        self.simulate_latency(self.config.latency.health).await;
        Ok(HealthStatus::up())
    }
}

/// The two records the mock starts with.
pub fn seed_transactions() -> Vec<Transaction> {
    vec![
        Transaction {
            id: "1".to_string(),
            payment_order: PaymentOrderRef {
                id: "order-1".to_string(),
            },
            amount: Amount::new(dec!(100.00)).unwrap_or(Amount::ZERO),
            currency: "USD".to_string(),
            buyer_info: BuyerInfo {
                document: "12345678901".to_string(),
                name: "John Doe".to_string(),
            },
            card_info: CardInfo {
                display: "**** **** **** 1234".to_string(),
                token: "token123".to_string(),
            },
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).single().unwrap_or_default(),
            status: TransactionStatus::Approved,
            situation: TransactionSituation::Processed,
            r#type: TransactionType::Payment,
        },
        Transaction {
            id: "2".to_string(),
            payment_order: PaymentOrderRef {
                id: "order-2".to_string(),
            },
            amount: Amount::new(dec!(250.00)).unwrap_or(Amount::ZERO),
            currency: "USD".to_string(),
            buyer_info: BuyerInfo {
                document: "98765432109".to_string(),
                name: "Jane Smith".to_string(),
            },
            card_info: CardInfo {
                display: "**** **** **** 5678".to_string(),
                token: "token456".to_string(),
            },
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 11, 0, 0).single().unwrap_or_default(),
            status: TransactionStatus::Declined,
            situation: TransactionSituation::Processed,
            r#type: TransactionType::Payment,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::transaction::SellerInfo;
    use crate::error::ErrorCode;

    fn payment_request() -> PaymentRequest {
        PaymentRequest {
            amount: "42.00".parse().unwrap(),
            currency: "USD".to_string(),
            buyer_info: BuyerInfo {
                document: "111".to_string(),
                name: "Buyer".to_string(),
            },
            card_info: CardInfo {
                display: "**** 0000".to_string(),
                token: "tok".to_string(),
            },
            seller_info: SellerInfo {
                document: "222".to_string(),
                name: "Seller".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_status_filter_on_seed_dataset() {
        let backend = MockBackend::new(MockConfig::instant());
        let filter = TransactionFilter::by_status(TransactionStatus::Approved);

        let page = backend
            .get_transactions(&filter, PageRequest::new(1, 5))
            .await
            .unwrap();

        assert_eq!(page.data.len(), 1);
        assert_eq!(page.total, 1);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.data[0].id, "1");
    }

    #[tokio::test]
    async fn test_cleared_currency_filter_lists_everything() {
        let backend = MockBackend::new(MockConfig::instant());
        let filter = TransactionFilter {
            currency: Some(String::new()),
            ..TransactionFilter::default()
        };

        let page = backend
            .get_transactions(&filter, PageRequest::default())
            .await
            .unwrap();

        assert_eq!(page.total, 2);
    }

    #[tokio::test]
    async fn test_listing_is_newest_first() {
        let backend = MockBackend::new(MockConfig::instant());
        let page = backend
            .get_transactions(&TransactionFilter::default(), PageRequest::default())
            .await
            .unwrap();

        let ids: Vec<&str> = page.data.iter().map(|tx| tx.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
    }

    #[tokio::test]
    async fn test_amount_range_filter_is_applied() {
        let backend = MockBackend::new(MockConfig::instant());
        let filter = TransactionFilter {
            min_amount: Some("200".parse().unwrap()),
            ..TransactionFilter::default()
        };

        let page = backend
            .get_transactions(&filter, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.data[0].id, "2");
    }

    #[tokio::test]
    async fn test_get_transaction_not_found() {
        let backend = MockBackend::new(MockConfig::instant());
        let err = backend.get_transaction("nonexistent").await.unwrap_err();

        assert_eq!(err.code, ErrorCode::NOT_FOUND);
        assert!(err.message.contains("not found"));
    }

    #[tokio::test]
    async fn test_listed_ids_round_trip_through_lookup() {
        let backend = MockBackend::new(MockConfig::instant());
        let page = backend
            .get_transactions(&TransactionFilter::default(), PageRequest::default())
            .await
            .unwrap();

        for listed in page.data {
            let fetched = backend.get_transaction(&listed.id).await.unwrap();
            assert_eq!(fetched.id, listed.id);
            assert_eq!(fetched.amount, listed.amount);
        }
    }

    #[tokio::test]
    async fn test_approval_rate_converges() {
        let backend = MockBackend::with_transactions(MockConfig::instant(), Vec::new());

        let mut approved = 0;
        for _ in 0..1000 {
            let result = backend.create_payment(payment_request()).await.unwrap();
            assert_ne!(result.status, TransactionStatus::Undefined);
            if result.is_approved() {
                approved += 1;
            }
        }

        let rate = approved as f64 / 1000.0;
        assert!((rate - 0.7).abs() < 0.07, "approval rate was {}", rate);
    }

    #[tokio::test]
    async fn test_invalid_approval_rate_fails_without_recording() {
        let config = MockConfig {
            approval_rate: f64::NAN,
            ..MockConfig::instant()
        };
        let backend = MockBackend::new(config);

        let err = backend.create_payment(payment_request()).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::Unknown);
        assert_eq!(backend.snapshot().await.len(), 2);
    }

    #[tokio::test]
    async fn test_seeded_outcomes_are_reproducible() {
        let outcomes = |seed| async move {
            let backend = MockBackend::new(MockConfig::instant().with_seed(seed));
            let mut statuses = Vec::new();
            for _ in 0..20 {
                statuses.push(backend.create_payment(payment_request()).await.unwrap().status);
            }
            statuses
        };

        assert_eq!(outcomes(7).await, outcomes(7).await);
    }

    #[tokio::test]
    async fn test_approved_payment_gets_unique_id_and_is_recorded() {
        let backend = MockBackend::new(MockConfig::instant().with_approval_rate(1.0).unwrap());

        let first = backend.create_payment(payment_request()).await.unwrap();
        let second = backend.create_payment(payment_request()).await.unwrap();

        let first_id = first.transaction_id.unwrap();
        let second_id = second.transaction_id.unwrap();
        assert_ne!(first_id, second_id);

        let recorded = backend.get_transaction(&first_id).await.unwrap();
        assert_eq!(recorded.status, TransactionStatus::Approved);
        assert_eq!(recorded.amount, "42.00".parse().unwrap());
        assert_eq!(backend.snapshot().await.len(), 4);
    }

    #[tokio::test]
    async fn test_declined_payment_has_no_transaction_id() {
        let backend = MockBackend::new(MockConfig::instant().with_approval_rate(0.0).unwrap());
        let result = backend.create_payment(payment_request()).await.unwrap();

        assert_eq!(result.status, TransactionStatus::Declined);
        assert!(result.transaction_id.is_none());
    }

    #[tokio::test]
    async fn test_refund_appends_new_record() {
        let backend = MockBackend::new(MockConfig::instant());
        let result = backend
            .create_refund(RefundRequest {
                transaction_id: "1".to_string(),
                amount: "30.00".parse().unwrap(),
                currency: "USD".to_string(),
                reason: "Customer request".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(result.status, TransactionStatus::Approved);
        let refund_id = result.transaction_id.unwrap();
        let refund = backend.get_transaction(&refund_id).await.unwrap();
        assert_eq!(refund.r#type, TransactionType::Refund);
        assert_eq!(refund.payment_order.id, "order-1");

        let original = backend.get_transaction("1").await.unwrap();
        assert_eq!(original.r#type, TransactionType::Payment);
        assert_eq!(original.amount, "100.00".parse().unwrap());
    }

    #[tokio::test]
    async fn test_refund_of_unknown_transaction_is_still_approved() {
        let backend = MockBackend::new(MockConfig::instant());
        let result = backend
            .create_refund(RefundRequest {
                transaction_id: "missing".to_string(),
                amount: "1.00".parse().unwrap(),
                currency: "USD".to_string(),
                reason: "n/a".to_string(),
            })
            .await
            .unwrap();

        assert!(result.is_approved());
        assert_eq!(backend.snapshot().await.len(), 2);
    }

    #[tokio::test]
    async fn test_dashboard_stats_follow_dataset() {
        let backend = MockBackend::new(MockConfig::instant().with_approval_rate(1.0).unwrap());

        let before = backend.get_dashboard_stats().await.unwrap();
        assert_eq!(before.total_transactions, 2);
        assert_eq!(before.approved_transactions, 1);
        assert_eq!(before.total_amount, "100.00".parse().unwrap());

        backend.create_payment(payment_request()).await.unwrap();

        let after = backend.get_dashboard_stats().await.unwrap();
        assert_eq!(after.total_transactions, 3);
        assert_eq!(after.total_amount, "142.00".parse().unwrap());
    }

    #[tokio::test]
    async fn test_dashboard_stats_fixture_override() {
        let fixture = DashboardStats {
            total_transactions: 150,
            ..DashboardStats::default()
        };
        let config = MockConfig {
            stats_fixture: Some(fixture.clone()),
            ..MockConfig::instant()
        };

        let backend = MockBackend::new(config);
        assert_eq!(backend.get_dashboard_stats().await.unwrap(), fixture);
    }

    #[tokio::test]
    async fn test_health_check() {
        let backend = MockBackend::new(MockConfig::instant());
        assert!(backend.health_check().await.unwrap().is_up());
    }
}
