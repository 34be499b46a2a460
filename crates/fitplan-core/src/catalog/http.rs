//! HTTP implementation of [`CatalogSource`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, ClientBuilder};

use super::{CatalogError, CatalogSource, ExerciseFilter};
use crate::model::ExerciseRecord;

/// Public exercise catalog used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.api-ninjas.com/v1/exercises";

/// Header carrying the optional catalog API key.
const API_KEY_HEADER: &str = "X-Api-Key";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Fetches exercises with `GET <base_url>?muscle=..&type=..&difficulty=..`.
#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpCatalogClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, CatalogError> {
        let client = ClientBuilder::new()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| CatalogError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: None,
        })
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogClient {
    async fn fetch(&self, filter: &ExerciseFilter) -> Result<Vec<ExerciseRecord>, CatalogError> {
        let mut request = self
            .client
            .get(&self.base_url)
            .header(CONTENT_TYPE, "application/json")
            .query(&filter.query_pairs());

        if let Some(ref key) = self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        tracing::debug!(url = %self.base_url, ?filter, "requesting exercise catalog");

        let response = request
            .send()
            .await
            .map_err(|e| CatalogError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status(status.as_u16()));
        }

        response
            .json::<Vec<ExerciseRecord>>()
            .await
            .map_err(|e| CatalogError::Decode(e.to_string()))
    }
}
