//! Plain-text rendering for the CLI.

use crate::application::dashboard::DashboardView;
use crate::application::wizard::PaymentOutcome;
use crate::domain::payment::PaymentResult;
use crate::domain::query::PaginatedResponse;
use crate::domain::transaction::Transaction;
use std::fmt::Write;

pub fn transaction_row(tx: &Transaction) -> String {
    format!(
        "{:<28} {:>12} {:<4} {:<9} {:<10} {:<8} {:<20} {}",
        tx.id,
        tx.amount,
        tx.currency,
        tx.status,
        tx.situation,
        tx.r#type,
        tx.buyer_info.name,
        tx.created_at.format("%Y-%m-%d"),
    )
}

pub fn transaction_page(page: &PaginatedResponse<Transaction>) -> String {
    let mut out = String::new();
    if page.data.is_empty() {
        out.push_str("No transactions found\n");
    } else {
        let _ = writeln!(
            out,
            "{:<28} {:>12} {:<4} {:<9} {:<10} {:<8} {:<20} DATE",
            "ID", "AMOUNT", "CUR", "STATUS", "SITUATION", "TYPE", "BUYER"
        );
        for tx in &page.data {
            let _ = writeln!(out, "{}", transaction_row(tx));
        }
    }
    let _ = writeln!(
        out,
        "Page {} of {} ({} total, {} per page)",
        page.page,
        page.total_pages.max(1),
        page.total,
        page.page_size
    );
    out
}

pub fn transaction_details(tx: &Transaction) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Transaction ID: {}", tx.id);
    let _ = writeln!(out, "Payment Order:  {}", tx.payment_order.id);
    let _ = writeln!(out, "Amount:         {} {}", tx.amount, tx.currency);
    let _ = writeln!(out, "Status:         {}", tx.status);
    let _ = writeln!(out, "Situation:      {}", tx.situation);
    let _ = writeln!(out, "Type:           {}", tx.r#type);
    let _ = writeln!(out, "Created:        {}", tx.created_at.format("%Y-%m-%d %H:%M:%S UTC"));
    let _ = writeln!(
        out,
        "Buyer:          {} ({})",
        tx.buyer_info.name, tx.buyer_info.document
    );
    let _ = writeln!(out, "Card:           {}", tx.card_info.display);
    out
}

pub fn payment_result(result: &PaymentResult) -> String {
    let mut out = format!("Status: {}", result.status);
    if let Some(id) = &result.transaction_id {
        let _ = write!(out, "\nTransaction ID: {}", id);
    }
    if let Some(message) = &result.message {
        let _ = write!(out, "\nMessage: {}", message);
    }
    out.push('\n');
    out
}

pub fn payment_outcome(outcome: &PaymentOutcome) -> String {
    match outcome {
        PaymentOutcome::Completed(result) => payment_result(result),
        PaymentOutcome::Failed(error) => {
            format!("Payment failed: {} (code {})\n", error.message, error.code)
        }
    }
}

pub fn dashboard(view: &DashboardView) -> String {
    let stats = &view.stats;
    let mut out = String::new();
    let _ = writeln!(out, "Total Transactions: {}", stats.total_transactions);
    let _ = writeln!(out, "Total Amount:       {}", stats.total_amount);
    let _ = writeln!(out, "Approved:           {}", stats.approved_transactions);
    let _ = writeln!(out, "Declined:           {}", stats.declined_transactions);
    let _ = writeln!(out, "Pending:            {}", stats.pending_transactions);
    let _ = writeln!(out, "Refunds:            {}", stats.total_refunds);
    let _ = writeln!(out, "Refund Amount:      {}", stats.refund_amount);
    let _ = writeln!(out);
    let _ = writeln!(out, "Recent Transactions");
    if view.recent.is_empty() {
        let _ = writeln!(out, "No transactions found");
    }
    for tx in &view.recent {
        let _ = writeln!(out, "{}", transaction_row(tx));
    }
    out
}
