use std::time::Duration;

use thiserror::Error;

use crate::server::API_PATH;
use kubevis_types::Node;

/// Requests should finish well within the shortest poll interval
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to aggregation endpoint failed")]
    Request(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status (500 on aggregation failure)
    #[error("aggregation endpoint returned HTTP {0}")]
    Status(u16),
}

/// Client for a remote `GET /api/kubernetes` endpoint
#[derive(Clone, Debug)]
pub struct EndpointClient {
    http: reqwest::Client,
    url: String,
}

impl EndpointClient {
    /// Create a client for the server at `base` (e.g. `http://127.0.0.1:3000`)
    pub fn new(base: &str) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            url: endpoint_url(base),
        })
    }

    /// Full URL of the aggregation endpoint
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the current node tree
    pub async fn fetch(&self) -> Result<Vec<Node>, FetchError> {
        let response = self.http.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        Ok(response.json().await?)
    }
}

fn endpoint_url(base: &str) -> String {
    let base = base.trim_end_matches('/');
    if base.ends_with(API_PATH) {
        base.to_string()
    } else {
        format!("{}{}", base, API_PATH)
    }
}
