use crate::domain::payment::{PaymentRequest, PaymentResult, RefundRequest};
use crate::domain::ports::{PaymentBackend, SharedBackend};
use crate::domain::query::{PageRequest, PaginatedResponse, TransactionFilter};
use crate::domain::stats::{DashboardStats, HealthStatus};
use crate::domain::transaction::{Transaction, TransactionType};
use crate::error::ApiResult;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Single entry point for every backend call.
///
/// Wraps whichever [`PaymentBackend`] was chosen at the composition root and
/// funnels each operation through [`ApiGateway::call`], so logging is applied
/// exactly once per call no matter which backend answers. Cloning is cheap and
/// shares the backend.
#[derive(Clone)]
pub struct ApiGateway {
    backend: SharedBackend,
}

impl ApiGateway {
    pub fn new(backend: SharedBackend) -> Self {
        Self { backend }
    }

    pub fn from_backend<B: PaymentBackend + 'static>(backend: B) -> Self {
        Self::new(Arc::new(backend))
    }

    async fn call<T, F>(&self, operation: &'static str, fut: F) -> ApiResult<T>
    where
        F: Future<Output = ApiResult<T>>,
    {
        let started = Instant::now();
        debug!(operation, "gateway call started");

        let result = fut.await;
        match &result {
            Ok(_) => debug!(operation, elapsed_ms = started.elapsed().as_millis() as u64, "gateway call succeeded"),
            Err(e) => warn!(operation, code = %e.code, "gateway call failed: {}", e.message),
        }
        result
    }

    pub async fn create_payment(&self, request: PaymentRequest) -> ApiResult<PaymentResult> {
        self.call("create_payment", self.backend.create_payment(request))
            .await
    }

    pub async fn get_transactions(
        &self,
        filter: &TransactionFilter,
        page: PageRequest,
    ) -> ApiResult<PaginatedResponse<Transaction>> {
        self.call("get_transactions", self.backend.get_transactions(filter, page))
            .await
    }

    pub async fn get_transaction(&self, id: &str) -> ApiResult<Transaction> {
        self.call("get_transaction", self.backend.get_transaction(id))
            .await
    }

    pub async fn create_refund(&self, request: RefundRequest) -> ApiResult<PaymentResult> {
        self.call("create_refund", self.backend.create_refund(request))
            .await
    }

    /// Refund records only, newest first.
    pub async fn get_refunds(&self, page: PageRequest) -> ApiResult<PaginatedResponse<Transaction>> {
        let filter = TransactionFilter::by_type(TransactionType::Refund);
        self.call("get_refunds", self.backend.get_transactions(&filter, page))
            .await
    }

    pub async fn get_dashboard_stats(&self) -> ApiResult<DashboardStats> {
        self.call("get_dashboard_stats", self.backend.get_dashboard_stats())
            .await
    }

    pub async fn health_check(&self) -> ApiResult<HealthStatus> {
        self.call("health_check", self.backend.health_check())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockConfig;
    use crate::domain::transaction::TransactionStatus;
    use crate::infrastructure::in_memory::MockBackend;

    #[tokio::test]
    async fn test_get_refunds_only_returns_refunds() {
        let gateway = ApiGateway::from_backend(MockBackend::new(MockConfig::instant()));

        assert_eq!(gateway.get_refunds(PageRequest::default()).await.unwrap().total, 0);

        gateway
            .create_refund(RefundRequest {
                transaction_id: "1".to_string(),
                amount: "10.00".parse().unwrap(),
                currency: "USD".to_string(),
                reason: "Damaged item".to_string(),
            })
            .await
            .unwrap();

        let refunds = gateway.get_refunds(PageRequest::default()).await.unwrap();
        assert_eq!(refunds.total, 1);
        assert_eq!(refunds.data[0].r#type, TransactionType::Refund);
        assert_eq!(refunds.data[0].status, TransactionStatus::Approved);
    }

    #[tokio::test]
    async fn test_errors_pass_through_unchanged() {
        let gateway = ApiGateway::from_backend(MockBackend::new(MockConfig::instant()));
        let err = gateway.get_transaction("nonexistent").await.unwrap_err();
        assert_eq!(err.code.to_string(), "404");
    }
}
