use super::gateway::ApiGateway;
use crate::domain::query::{PageRequest, PaginatedResponse, TransactionFilter};
use crate::domain::transaction::Transaction;
use crate::error::ApiResult;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

/// Hands out monotonically increasing request tokens.
///
/// Only the most recently issued token is allowed to publish its response.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
}

impl RequestSequencer {
    pub fn issue(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_latest(&self, token: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == token
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BrowseCriteria {
    pub filter: TransactionFilter,
    pub page: PageRequest,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// The response was the latest one and is now the current view.
    Applied(PaginatedResponse<Transaction>),
    /// A newer request was issued while this one was in flight; its response was dropped.
    Stale,
}

/// Transaction history screen state: filter, paging, and the page on display.
///
/// Changing the filter or the page size moves back to page 1. Each `load`
/// takes a sequence token so a slow, superseded response can never overwrite
/// the result of a newer query.
pub struct TransactionBrowser {
    gateway: ApiGateway,
    criteria: RwLock<BrowseCriteria>,
    view: RwLock<Option<PaginatedResponse<Transaction>>>,
    sequencer: RequestSequencer,
}

impl TransactionBrowser {
    pub fn new(gateway: ApiGateway, page_size: u32) -> Self {
        Self {
            gateway,
            criteria: RwLock::new(BrowseCriteria {
                filter: TransactionFilter::default(),
                page: PageRequest::first(page_size),
            }),
            view: RwLock::new(None),
            sequencer: RequestSequencer::default(),
        }
    }

    pub async fn criteria(&self) -> BrowseCriteria {
        self.criteria.read().await.clone()
    }

    pub async fn set_filter(&self, filter: TransactionFilter) {
        let mut criteria = self.criteria.write().await;
        criteria.filter = filter.normalized();
        criteria.page = PageRequest::first(criteria.page.page_size());
    }

    pub async fn set_page(&self, page: u32) {
        let mut criteria = self.criteria.write().await;
        criteria.page = PageRequest::new(page, criteria.page.page_size());
    }

    pub async fn set_page_size(&self, page_size: u32) {
        self.criteria.write().await.page = PageRequest::first(page_size);
    }

    /// Queries the gateway with the current criteria.
    ///
    /// Errors from a superseded request are dropped along with its data. A
    /// failed latest request leaves the previous view in place.
    pub async fn load(&self) -> ApiResult<LoadOutcome> {
        let token = self.sequencer.issue();
        let criteria = self.criteria().await;

        let result = self
            .gateway
            .get_transactions(&criteria.filter, criteria.page)
            .await;

        let mut view = self.view.write().await;
        if !self.sequencer.is_latest(token) {
            debug!("Discarding stale transaction page (request {})", token);
            return Ok(LoadOutcome::Stale);
        }

        let page = result?;
        *view = Some(page.clone());
        Ok(LoadOutcome::Applied(page))
    }

    /// The page currently on display, if any load has completed.
    pub async fn view(&self) -> Option<PaginatedResponse<Transaction>> {
        self.view.read().await.clone()
    }

    pub async fn details(&self, id: &str) -> ApiResult<Transaction> {
        self.gateway.get_transaction(id).await
    }
}
