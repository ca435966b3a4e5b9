// Backend API: the `PortalApi` seam, its HTTP implementation, and the
// response decoding that turns loosely-shaped JSON into model types.

pub mod client;
pub mod decode;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::model::{CommissionAddress, Descriptor, SearchRequest};

pub use client::HttpPortalClient;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server returned status {status}: {detail}")]
    Status {
        status: reqwest::StatusCode,
        detail: String,
    },

    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// The four backend operations the controller depends on.
///
/// Each call is a single round trip with no retry.
#[async_trait]
pub trait PortalApi: Send + Sync {
    /// `GET /meta/states`
    async fn fetch_states(&self) -> Result<Vec<Descriptor>, ApiError>;

    /// `GET /meta/commissions?commissionId={state_id}`
    async fn fetch_commissions(&self, state_id: i64) -> Result<Vec<Descriptor>, ApiError>;

    /// `GET /meta/commission-address?commissionId={commission_id}`
    async fn fetch_commission_address(
        &self,
        commission_id: i64,
    ) -> Result<Option<CommissionAddress>, ApiError>;

    /// `POST /meta/case-search`. Returns the raw result rows.
    async fn search_cases(&self, request: &SearchRequest) -> Result<Vec<Value>, ApiError>;
}
