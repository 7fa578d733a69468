//! Shared vocabulary of the console: transactions, payment and refund requests,
//! query criteria, aggregates, and the backend port.

pub mod payment;
pub mod ports;
pub mod query;
pub mod stats;
pub mod transaction;
