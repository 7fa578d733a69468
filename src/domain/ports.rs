use super::payment::{PaymentRequest, PaymentResult, RefundRequest};
use super::query::{PageRequest, PaginatedResponse, TransactionFilter};
use super::stats::{DashboardStats, HealthStatus};
use super::transaction::Transaction;
use crate::error::ApiResult;
use async_trait::async_trait;
use std::sync::Arc;

/// The capability set every payment backend provides.
///
/// Implementations must map all of their failures to `ApiError`; nothing else
/// may leak to callers.
#[async_trait]
pub trait PaymentBackend: Send + Sync {
    async fn create_payment(&self, request: PaymentRequest) -> ApiResult<PaymentResult>;
    async fn get_transactions(
        &self,
        filter: &TransactionFilter,
        page: PageRequest,
    ) -> ApiResult<PaginatedResponse<Transaction>>;
    async fn get_transaction(&self, id: &str) -> ApiResult<Transaction>;
    async fn create_refund(&self, request: RefundRequest) -> ApiResult<PaymentResult>;
    async fn get_dashboard_stats(&self) -> ApiResult<DashboardStats>;
    async fn health_check(&self) -> ApiResult<HealthStatus>;
}

pub type SharedBackend = Arc<dyn PaymentBackend>;
