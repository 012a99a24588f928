//! Thin asynchronous client for the KPI service.
//!
//! - One typed accessor per KPI plus the aggregate `all` read.
//! - No retries or response caching: a failed read is reported to the caller.
//! - [`ClientCache`] keeps one HTTP client per base URL so refreshes share
//!   its connection pool.

#![allow(dead_code)]

use std::time::Duration;

use reqwest::{header, Client, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::domain::{
    DailyPnLData, DashboardSettings, DataSource, DrawdownData, EquityData, KpiSnapshot,
    KpiVariant, PeriodPnLData,
};
use crate::util::version::user_agent;

const KPIS_PATH: &str = "api/v1/kpis/";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum KpiClientError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("failed to decode {resource} response: {source}")]
    Decode {
        resource: &'static str,
        source: serde_json::Error,
    },
}

#[derive(Clone, Debug)]
pub struct KpiClient {
    http: Client,
    base_url: Url,
}

impl KpiClient {
    pub fn new(base: &str) -> Result<Self, KpiClientError> {
        let base_url = normalize_base(base)?;
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        let http = Client::builder()
            .user_agent(user_agent())
            .default_headers(headers)
            .timeout(DEFAULT_TIMEOUT)
            .build()?;
        Ok(Self { http, base_url })
    }

    pub async fn get_equity(&self) -> Result<EquityData, KpiClientError> {
        self.fetch(KpiVariant::Equity.resource()).await
    }

    pub async fn get_daily(&self) -> Result<DailyPnLData, KpiClientError> {
        self.fetch(KpiVariant::Daily.resource()).await
    }

    pub async fn get_period(&self) -> Result<PeriodPnLData, KpiClientError> {
        self.fetch(KpiVariant::Period.resource()).await
    }

    pub async fn get_drawdown(&self) -> Result<DrawdownData, KpiClientError> {
        self.fetch(KpiVariant::Drawdown.resource()).await
    }

    pub async fn get_all(&self) -> Result<KpiSnapshot, KpiClientError> {
        self.fetch("all").await
    }

    /// Full URL of a resource below `/api/v1/kpis/`.
    pub fn kpi_url(&self, resource: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(KPIS_PATH)?.join(resource)
    }

    async fn fetch<T>(&self, resource: &'static str) -> Result<T, KpiClientError>
    where
        T: DeserializeOwned,
    {
        let url = self.kpi_url(resource)?;
        debug!(%url, "Fetching KPI resource");
        let body = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        serde_json::from_slice(&body).map_err(|source| KpiClientError::Decode { resource, source })
    }
}

/// Where a refresh reads its snapshot from.
#[derive(Clone, Debug)]
pub enum SnapshotSource {
    Sample,
    Service(KpiClient),
}

impl SnapshotSource {
    pub async fn load(&self) -> Result<KpiSnapshot, KpiClientError> {
        match self {
            SnapshotSource::Sample => Ok(KpiSnapshot::sample()),
            SnapshotSource::Service(client) => client.get_all().await,
        }
    }
}

/// Holds the client for the most recently used base URL.
#[derive(Debug, Default)]
pub struct ClientCache {
    client: Option<KpiClient>,
    builds: usize,
}

impl ClientCache {
    /// Returns the cached client when `base` resolves to the same URL,
    /// otherwise builds and caches a new one.
    pub fn client_for(&mut self, base: &str) -> Result<KpiClient, KpiClientError> {
        let base_url = normalize_base(base)?;
        if let Some(client) = self.client.as_ref().filter(|c| c.base_url == base_url) {
            return Ok(client.clone());
        }
        let client = KpiClient::new(base_url.as_str())?;
        self.builds += 1;
        debug!(%base_url, builds = self.builds, "Built KPI client");
        self.client = Some(client.clone());
        Ok(client)
    }

    pub fn source_for(
        &mut self,
        settings: &DashboardSettings,
    ) -> Result<SnapshotSource, KpiClientError> {
        match settings.data_source {
            DataSource::Sample => Ok(SnapshotSource::Sample),
            DataSource::Service => Ok(SnapshotSource::Service(
                self.client_for(&settings.api_base_url)?,
            )),
        }
    }
}

/// Parses the base URL and makes sure relative joins append to its path.
fn normalize_base(base: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(base.trim())?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
