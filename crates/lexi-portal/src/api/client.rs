// HTTP client for the case search backend.
//
// Thin reqwest wrapper: one request per operation, no retry, no auth.
// Bodies are read as text, parsed as JSON, and handed to `decode` for shape
// normalization. Status codes are only enforced in strict mode.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::{decode, ApiError, PortalApi};
use crate::config::Config;
use crate::model::{CommissionAddress, Descriptor, SearchRequest};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const STATES_PATH: &str = "/meta/states";
const COMMISSIONS_PATH: &str = "/meta/commissions";
const ADDRESS_PATH: &str = "/meta/commission-address";
const SEARCH_PATH: &str = "/meta/case-search";

// ---------------------------------------------------------------------------
// HttpPortalClient
// ---------------------------------------------------------------------------

pub struct HttpPortalClient {
    http: reqwest::Client,
    base_url: String,
    strict_status: bool,
}

impl HttpPortalClient {
    /// Create a client for `base_url`, optionally bounding every request
    /// with `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            http: builder.build()?,
            base_url,
            strict_status: false,
        })
    }

    /// Map non-2xx responses to `ApiError::Status` instead of decoding
    /// their bodies.
    pub fn with_strict_status(mut self, strict: bool) -> Self {
        self.strict_status = strict;
        self
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Ok(Self::new(config.api.base_url.clone(), config.api.request_timeout())?
            .with_strict_status(config.api.strict_status))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET `path` with a `commissionId` query parameter, if given, and
    /// return the decoded JSON body.
    pub async fn get_json(&self, path: &str, commission_id: Option<i64>) -> Result<Value, ApiError> {
        let mut request = self.http.get(self.url(path));
        if let Some(id) = commission_id {
            request = request.query(&[("commissionId", id)]);
        }
        debug!(path, ?commission_id, "GET");
        self.read_json(request.send().await?).await
    }

    /// POST `body` as JSON to `path` and return the decoded JSON body.
    pub async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        debug!(path, "POST");
        let response = self.http.post(self.url(path)).json(body).send().await?;
        self.read_json(response).await
    }

    /// Read a response body as JSON.
    ///
    /// A non-2xx status is an `ApiError::Status` in strict mode. Otherwise
    /// it is only logged and the body is decoded as usual.
    async fn read_json(&self, response: reqwest::Response) -> Result<Value, ApiError> {
        let status = response.status();
        let url = response.url().path().to_string();
        let text = response.text().await?;
        if !status.is_success() {
            let detail = decode::error_detail(status, &text);
            if self.strict_status {
                return Err(ApiError::Status { status, detail });
            }
            warn!("{} returned {}: {}", url, status, detail);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl PortalApi for HttpPortalClient {
    async fn fetch_states(&self) -> Result<Vec<Descriptor>, ApiError> {
        let body = self.get_json(STATES_PATH, None).await?;
        Ok(decode::descriptor_list(&body))
    }

    async fn fetch_commissions(&self, state_id: i64) -> Result<Vec<Descriptor>, ApiError> {
        let body = self.get_json(COMMISSIONS_PATH, Some(state_id)).await?;
        Ok(decode::descriptor_list(&body))
    }

    async fn fetch_commission_address(
        &self,
        commission_id: i64,
    ) -> Result<Option<CommissionAddress>, ApiError> {
        let body = self.get_json(ADDRESS_PATH, Some(commission_id)).await?;
        Ok(decode::commission_address(&body))
    }

    async fn search_cases(&self, request: &SearchRequest) -> Result<Vec<Value>, ApiError> {
        let body = self.post_json(SEARCH_PATH, request).await?;
        Ok(decode::search_rows(&body))
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
