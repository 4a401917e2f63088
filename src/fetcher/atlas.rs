use std::{collections::HashSet, time::Duration};

use serde::Deserialize;
use url::Url;

use super::ProbeFetcher;
use crate::{
    config::Config,
    error::{Error, Result},
    probe::{ProbeCollection, ProbeRecord},
};

pub const API_PROBES: &str = "https://atlas.ripe.net/api/v2/probes/";

// The API rejects larger pages.
pub const MAX_PAGE_SIZE: u16 = 500;

/// Walks the RIPE Atlas probe listing, following `next` links until the last
/// page.
pub struct AtlasFetcher {
    client: reqwest::Client,
    endpoint: Url,
    page_size: u16,
}

#[derive(Debug, Deserialize)]
struct ProbePage {
    #[serde(default)]
    count: Option<u64>,
    #[serde(default)]
    next: Option<String>,
    #[serde(default)]
    results: Option<Vec<ProbeRecord>>,
}

impl AtlasFetcher {
    pub fn new(endpoint: Url, page_size: u16, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(Error::Client)?;

        Ok(Self {
            client,
            endpoint,
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.api_url.clone(),
            config.page_size,
            Duration::from_secs(config.timeout),
        )
    }

    fn first_page_url(&self) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("page_size", &self.page_size.to_string())
            .append_pair("sort", "id");
        url
    }

    async fn get_page(&self, url: &Url) -> Result<ProbePage> {
        tracing::debug!("Fetching {}", url);

        let network = |source: reqwest::Error| Error::Network {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(network)?
            .error_for_status()
            .map_err(network)?;
        let body = response.bytes().await.map_err(network)?;

        serde_json::from_slice(&body).map_err(|e| Error::Parse {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

impl ProbeFetcher for AtlasFetcher {
    async fn fetch(&self) -> Result<ProbeCollection> {
        tracing::info!("Listing probes from {}", self.endpoint);

        let mut probes = ProbeCollection::new();
        let mut visited = HashSet::new();
        let mut next = Some(self.first_page_url());
        let mut page_number = 0;

        while let Some(url) = next.take() {
            if !visited.insert(url.clone()) {
                return Err(Error::Parse {
                    url: url.to_string(),
                    reason: "pagination links back to an already fetched page".to_string(),
                });
            }
            page_number += 1;

            let page = self.get_page(&url).await?;

            if page.count == Some(0) {
                tracing::debug!("{} reports no probes, stopping", url);
                break;
            }

            let results = page.results.ok_or_else(|| Error::Parse {
                url: url.to_string(),
                reason: "missing `results` list".to_string(),
            })?;

            next = page
                .next
                .as_deref()
                .map(|next| url.join(next))
                .transpose()
                .map_err(|e| Error::Parse {
                    url: url.to_string(),
                    reason: format!("invalid `next` link: {}", e),
                })?;

            probes.extend_page(results);

            tracing::info!(
                "Fetched page {} ({} probes so far)",
                page_number,
                probes.len()
            );
        }

        Ok(probes)
    }
}
