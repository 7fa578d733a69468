//! Backend adapters implementing [`crate::domain::ports::PaymentBackend`].

pub mod http;
pub mod in_memory;
