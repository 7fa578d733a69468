use super::transaction::{Amount, Transaction, TransactionStatus, TransactionType};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Criteria for listing transactions.
///
/// `None` means "unconstrained on that dimension", and so does a blank
/// currency. Date bounds are inclusive and compared against the UTC calendar
/// date of `created_at`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TransactionStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#type: Option<TransactionType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_from: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_amount: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_amount: Option<Amount>,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub currency: Option<String>,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}

impl TransactionFilter {
    pub fn by_type(r#type: TransactionType) -> Self {
        Self {
            r#type: Some(r#type),
            ..Self::default()
        }
    }

    pub fn by_status(status: TransactionStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Drops a blank currency so it reads as unconstrained.
    pub fn normalized(mut self) -> Self {
        if is_blank(&self.currency) {
            self.currency = None;
        }
        self
    }

    pub fn is_unconstrained(&self) -> bool {
        self.clone().normalized() == Self::default()
    }

    fn currency_constraint(&self) -> Option<&str> {
        self.currency.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }

    /// Returns true when `tx` satisfies every constrained dimension.
    pub fn matches(&self, tx: &Transaction) -> bool {
        let created = tx.created_at.date_naive();

        self.status.is_none_or(|status| tx.status == status)
            && self.r#type.is_none_or(|t| tx.r#type == t)
            && self.date_from.is_none_or(|from| created >= from)
            && self.date_to.is_none_or(|to| created <= to)
            && self.min_amount.is_none_or(|min| tx.amount >= min)
            && self.max_amount.is_none_or(|max| tx.amount <= max)
            && self
                .currency_constraint()
                .is_none_or(|currency| tx.currency.eq_ignore_ascii_case(currency))
    }
}

/// A 1-indexed page request. Values below 1 are raised to 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl PageRequest {
    pub const DEFAULT_PAGE_SIZE: u32 = 10;

    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }

    pub fn first(page_size: u32) -> Self {
        Self::new(1, page_size)
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Index of the first item on this page within the full result set.
    pub fn offset(&self) -> usize {
        (self.page as usize - 1).saturating_mul(self.page_size as usize)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first(Self::DEFAULT_PAGE_SIZE)
    }
}

/// One page of results plus the total across all pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u64,
}

impl<T> PaginatedResponse<T> {
    pub fn is_last_page(&self) -> bool {
        u64::from(self.page) >= self.total_pages
    }
}

pub fn total_pages(total: u64, page_size: u32) -> u64 {
    total.div_ceil(u64::from(page_size.max(1)))
}

/// Cuts the page described by `request` out of an already filtered and ordered
/// result set.
pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> PaginatedResponse<T> {
    let total = items.len() as u64;
    let data = items
        .into_iter()
        .skip(request.offset())
        .take(request.page_size() as usize)
        .collect();

    PaginatedResponse {
        data,
        total,
        page: request.page(),
        page_size: request.page_size(),
        total_pages: total_pages(total, request.page_size()),
    }
}
