use crate::model::{self, Profile};
use log::warn;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Fixed socket timeout; there is no per-request override.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Every transport or status failure, normalized to the exact message the
/// UI shows. Callers match on the variant when they care, Display otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Network error: cannot reach the server")]
    Network,
    #[error("Not found (404)")]
    NotFound,
    #[error("Server error (5xx)")]
    Server(u16),
    #[error("Bad request (400)")]
    BadRequest,
    #[error("Unauthorized (401)")]
    Unauthorized,
    #[error("Request failed ({0})")]
    Status(u16),
}

impl ApiError {
    fn from_status(status: u16) -> Self {
        match status {
            404 => ApiError::NotFound,
            s if s >= 500 => ApiError::Server(s),
            400 => ApiError::BadRequest,
            401 => ApiError::Unauthorized,
            s => ApiError::Status(s),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let parsed = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| anyhow::anyhow!("Invalid base URL {:?}: {}", base_url, e))?;
        if parsed.cannot_be_a_base() {
            anyhow::bail!("Base URL {:?} cannot carry a path", base_url);
        }
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: parsed,
        })
    }

    /// Build `{base}/profiles[/{id}]`. The id goes in as a single path
    /// segment, percent-encoded, so an odd id cannot change the route.
    fn endpoint(&self, id: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("profiles");
            if let Some(id) = id {
                segments.push(id);
            }
        }
        url
    }

    /// GET /profiles?page={page}&limit={limit}
    pub async fn fetch_page(&self, page: u32, limit: usize) -> Result<Vec<Profile>, ApiError> {
        let resp = self
            .http
            .get(self.endpoint(None))
            .query(&[("page", page.to_string()), ("limit", limit.to_string())])
            .send()
            .await
            .map_err(|e| {
                warn!("page {} request failed: {}", page, e);
                ApiError::Network
            })?;
        let body = Self::read_json(resp).await?;
        Ok(model::profiles_from_value(body))
    }

    /// GET /profiles/{id}. Ok(None) when the server answered 2xx but the
    /// body holds no usable record.
    pub async fn fetch_profile(&self, id: &str) -> Result<Option<Profile>, ApiError> {
        let resp = self
            .http
            .get(self.endpoint(Some(id)))
            .send()
            .await
            .map_err(|e| {
                warn!("profile {} request failed: {}", id, e);
                ApiError::Network
            })?;
        let body = Self::read_json(resp).await?;
        Ok(model::profile_from_value(body))
    }

    async fn read_json(resp: reqwest::Response) -> Result<Value, ApiError> {
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::from_status(status.as_u16()));
        }
        match resp.json::<Value>().await {
            Ok(v) => Ok(v),
            // A malformed success body counts as an empty one, not a failure.
            Err(e) if e.is_decode() => {
                warn!("unparseable response body: {}", e);
                Ok(Value::Null)
            }
            Err(e) => {
                warn!("body read failed: {}", e);
                Err(ApiError::Network)
            }
        }
    }
}
