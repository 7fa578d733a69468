use crate::config::GatewayConfig;
use crate::domain::payment::{PaymentRequest, PaymentResult, RefundRequest};
use crate::domain::ports::PaymentBackend;
use crate::domain::query::{PageRequest, PaginatedResponse, TransactionFilter};
use crate::domain::stats::{DashboardStats, HealthStatus};
use crate::domain::transaction::Transaction;
use crate::error::{ApiError, ApiResult, ConsoleError, ErrorCode, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// Backend talking to the payment executor service over HTTP/JSON.
///
/// Every request goes through [`HttpBackend::execute`], which is the only
/// place where transport failures are caught and classified:
///
/// * no response (connect, DNS, timeout) -> `NETWORK_ERROR`
/// * error status from the server -> the status code, body kept as details
/// * anything else (bad body, invalid request) -> `UNKNOWN_ERROR`
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
    timeout: Duration,
}

impl HttpBackend {
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ConsoleError::Config(format!("Invalid base URL: {}", e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ConsoleError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            timeout: config.timeout,
        })
    }

    /// Resolves path segments against the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::unknown(format!("Base URL cannot carry a path: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let request = request
            .build()
            .map_err(|e| ApiError::unknown(format!("Invalid request: {}", e)))?;
        debug!("Making {} request to {}", request.method(), request.url().path());

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::error_response(status, response).await);
        }

        let body = response.bytes().await.map_err(|e| self.transport_error(e))?;
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::unknown(format!("Malformed response body: {}", e)))
    }

    fn transport_error(&self, error: reqwest::Error) -> ApiError {
        if error.is_timeout() {
            ApiError::network(format!("Request timed out after {:?}", self.timeout))
        } else if error.is_connect() {
            ApiError::network("Network error - unable to connect to server")
        } else if error.is_builder() || error.is_decode() {
            ApiError::unknown(error.to_string())
        } else {
            ApiError::network(format!("Network error: {}", error))
        }
    }

    async fn error_response(status: StatusCode, response: reqwest::Response) -> ApiError {
        let body = response.text().await.unwrap_or_default();
        let parsed = serde_json::from_str::<serde_json::Value>(&body).ok();

        let message = parsed
            .as_ref()
            .and_then(|json| json.get("message"))
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| "Server error".to_string());

        warn!("Server responded {} : {}", status.as_u16(), message);

        let error = ApiError::new(ErrorCode::Http(status.as_u16()), message);
        match parsed {
            Some(json) => error.with_details(json),
            None if !body.is_empty() => error.with_details(serde_json::Value::String(body)),
            None => error,
        }
    }
}

#[async_trait]
impl PaymentBackend for HttpBackend {
    async fn create_payment(&self, request: PaymentRequest) -> ApiResult<PaymentResult> {
        let url = self.endpoint(&["payments"])?;
        self.execute(self.client.post(url).json(&request)).await
    }

    async fn get_transactions(
        &self,
        filter: &TransactionFilter,
        page: PageRequest,
    ) -> ApiResult<PaginatedResponse<Transaction>> {
        let url = self.endpoint(&["transactions"])?;
        self.execute(self.client.get(url).query(filter).query(&page))
            .await
    }

    async fn get_transaction(&self, id: &str) -> ApiResult<Transaction> {
        let url = self.endpoint(&["transactions", id])?;
        self.execute(self.client.get(url)).await
    }

    async fn create_refund(&self, request: RefundRequest) -> ApiResult<PaymentResult> {
        let url = self.endpoint(&["refunds"])?;
        self.execute(self.client.post(url).json(&request)).await
    }

    async fn get_dashboard_stats(&self) -> ApiResult<DashboardStats> {
        let url = self.endpoint(&["dashboard", "stats"])?;
        self.execute(self.client.get(url)).await
    }

    async fn health_check(&self) -> ApiResult<HealthStatus> {
        let url = self.endpoint(&["q", "health"])?;
        self.execute(self.client.get(url)).await
    }
}
