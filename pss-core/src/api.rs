//! HTTP client for the dashboard's proxy routes.
//!
//! Every call is a single attempt: a transport error, a non-success
//! status, or an unparseable body all come back as
//! [`DashboardError::DataUnavailable`] so the caller can show a
//! placeholder. Caching headers are the proxy's business.

use crate::{
    barrier::{parse_barrier_payload, BarrierSite},
    error::{DashboardError, Result},
    returns::{parse_return_payload, ReturnRecord},
    selection::SelectionState,
    station::{parse_station_payload, StationReading},
};
use log::{info, warn};
use reqwest::Client;
use std::time::Duration;

pub const WDFW_PATH: &str = "/api/wdfw";
pub const USGS_PATH: &str = "/api/usgs";
pub const BARRIERS_PATH: &str = "/api/barriers";

/// Connection settings for the proxy.
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyConfig {
    /// Scheme, host and port, e.g. "http://localhost:3000"
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            timeout: Duration::from_secs(15),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProxyClient {
    client: Client,
    base_url: String,
}

impl ProxyClient {
    pub fn new(config: &ProxyConfig) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_body(&self, path: &str, query: &[(&str, &str)]) -> Result<String> {
        let url = self.url(path);
        info!("[PSS] api: GET {} {:?}", url, query);
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                warn!("Request failed for {}: {}", url, e);
                DashboardError::unavailable(format!("{}: {}", path, e))
            })?;
        let status = response.status();
        if !status.is_success() {
            warn!("Bad response status for {}: {}", url, status);
            return Err(DashboardError::unavailable(format!("{}: HTTP {}", path, status)));
        }
        response.text().await.map_err(|e| {
            warn!("Failed to read response body for {}: {}", url, e);
            DashboardError::unavailable(format!("{}: {}", path, e))
        })
    }

    /// Current stream temperature readings for every station.
    pub async fn fetch_stations(&self) -> Result<Vec<StationReading>> {
        let body = self.get_body(USGS_PATH, &[]).await?;
        parse_station_payload(&body)
    }

    /// Return estimates for the given selection. "all" dimensions are
    /// left off the query string.
    pub async fn fetch_returns(&self, selection: &SelectionState) -> Result<Vec<ReturnRecord>> {
        let mut query: Vec<(&str, &str)> = Vec::new();
        if let Some(id) = selection.watershed.id() {
            query.push(("watershed", id));
        }
        if let Some(id) = selection.species.id() {
            query.push(("species", id));
        }
        let body = self.get_body(WDFW_PATH, &query).await?;
        parse_return_payload(&body)
    }

    pub async fn fetch_barriers(&self) -> Result<Vec<BarrierSite>> {
        let body = self.get_body(BARRIERS_PATH, &[]).await?;
        parse_barrier_payload(&body)
    }
}
