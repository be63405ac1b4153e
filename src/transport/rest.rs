//! Widget endpoint client
//!
//! Each widget is fetched with one GET to the theme's REST endpoint:
//! `<wwwroot>/theme/snap/rest.php?action=get_<widget>&contextid=<id>`.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use crate::config::{HttpConfig, SiteConfig};
use crate::core::{FetchError, WidgetType};

/// Source of widget payloads
#[async_trait]
pub trait WidgetSource: Send + Sync {
    /// Fetch the raw JSON payload for one widget
    async fn fetch(&self, widget: WidgetType) -> Result<Value, FetchError>;
}

/// HTTP client for the theme REST endpoint
pub struct RestClient {
    client: reqwest::Client,
    endpoint: url::Url,
    context_id: u64,
}

impl RestClient {
    pub fn new(site: &SiteConfig, http: &HttpConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(http.timeout_secs))
            .user_agent(http.user_agent.clone())
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        Self::with_client(client, site)
    }

    pub fn with_client(client: reqwest::Client, site: &SiteConfig) -> Result<Self, FetchError> {
        let root = format!("{}/", site.wwwroot.trim_end_matches('/'));
        let endpoint = url::Url::parse(&root)?.join("theme/snap/rest.php")?;
        Ok(Self {
            client,
            endpoint,
            context_id: site.context_id,
        })
    }

    /// Full request URL for a widget
    pub fn url_for(&self, widget: WidgetType) -> url::Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("action", &widget.action())
            .append_pair("contextid", &self.context_id.to_string());
        url
    }
}

#[async_trait]
impl WidgetSource for RestClient {
    async fn fetch(&self, widget: WidgetType) -> Result<Value, FetchError> {
        let url = self.url_for(widget);
        tracing::debug!("GET {}", url);

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}
