//! Application layer: the gateway funnel and the workflows built on it.
//!
//! Every workflow receives an explicitly constructed [`gateway::ApiGateway`];
//! none of them reach for a global backend.

pub mod browser;
pub mod dashboard;
pub mod gateway;
pub mod wizard;
