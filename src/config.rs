//! Runtime configuration for the gateway, the mock backend, and the console.

use crate::domain::stats::DashboardStats;
use crate::error::{ConsoleError, Result};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8086";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_CURRENCY: &str = "USD";
pub const DEFAULT_APPROVAL_RATE: f64 = 0.7;

/// Currencies offered by the payment wizard.
pub const SUPPORTED_CURRENCIES: [(&str, &str); 4] = [
    ("USD", "US Dollar"),
    ("EUR", "Euro"),
    ("GBP", "British Pound"),
    ("BRL", "Brazilian Real"),
];

/// Settings for the HTTP backend.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl GatewayConfig {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into();
        let parsed = reqwest::Url::parse(&base_url)
            .map_err(|e| ConsoleError::Config(format!("Invalid base URL '{}': {}", base_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConsoleError::Config(format!(
                "Unsupported URL scheme '{}'",
                parsed.scheme()
            )));
        }
        if timeout.is_zero() {
            return Err(ConsoleError::Config(
                "Timeout must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Simulated network latency per mock operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockLatency {
    pub payment: Duration,
    pub list: Duration,
    pub lookup: Duration,
    pub stats: Duration,
    pub refund: Duration,
    pub health: Duration,
}

impl MockLatency {
    pub fn none() -> Self {
        Self::uniform(Duration::ZERO)
    }

    pub fn uniform(delay: Duration) -> Self {
        Self {
            payment: delay,
            list: delay,
            lookup: delay,
            stats: delay,
            refund: delay,
            health: delay,
        }
    }
}

impl Default for MockLatency {
    fn default() -> Self {
        Self {
            payment: Duration::from_millis(1000),
            list: Duration::from_millis(500),
            lookup: Duration::from_millis(300),
            stats: Duration::from_millis(500),
            refund: Duration::from_millis(800),
            health: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MockConfig {
    pub latency: MockLatency,
    /// Probability that a simulated payment is approved.
    pub approval_rate: f64,
    /// Fixed RNG seed; `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// When set, returned by `get_dashboard_stats` instead of live aggregates.
    pub stats_fixture: Option<DashboardStats>,
}

impl MockConfig {
    pub fn instant() -> Self {
        Self {
            latency: MockLatency::none(),
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the approval probability. Must be a finite value in `[0, 1]`.
    pub fn with_approval_rate(mut self, rate: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&rate) {
            return Err(ConsoleError::Config(format!(
                "Approval rate must be between 0 and 1, got {}",
                rate
            )));
        }
        self.approval_rate = rate;
        Ok(self)
    }
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            latency: MockLatency::default(),
            approval_rate: DEFAULT_APPROVAL_RATE,
            seed: None,
            stats_fixture: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub default_currency: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            default_currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}
