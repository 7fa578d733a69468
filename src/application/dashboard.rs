use super::gateway::ApiGateway;
use crate::domain::query::{PageRequest, TransactionFilter};
use crate::domain::stats::DashboardStats;
use crate::domain::transaction::Transaction;
use crate::error::ApiResult;

/// Number of transactions shown in the dashboard's "recent" table.
pub const RECENT_LIMIT: u32 = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub stats: DashboardStats,
    pub recent: Vec<Transaction>,
}

/// Fetches the aggregates and the most recent transactions concurrently.
///
/// Both requests are issued at once and joined; the view is only produced when
/// both succeed. The first failure fails the whole load.
pub async fn load_dashboard(gateway: &ApiGateway) -> ApiResult<DashboardView> {
    let unfiltered = TransactionFilter::default();
    let (stats, recent) = tokio::try_join!(
        gateway.get_dashboard_stats(),
        gateway.get_transactions(&unfiltered, PageRequest::first(RECENT_LIMIT)),
    )?;

    Ok(DashboardView {
        stats,
        recent: recent.data,
    })
}
