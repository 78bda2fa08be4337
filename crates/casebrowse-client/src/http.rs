//! reqwest-backed [`CaseSource`].

use std::time::Instant;

use async_trait::async_trait;
use reqwest::{header, Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tracing::{debug, info, warn};

use casebrowse_core::defaults::ERROR_BODY_PREVIEW_CHARS;
use casebrowse_core::{
    CaseDetail, CaseList, CaseSource, Error, FacetCatalog, ListCasesRequest, Result,
};

use crate::config::ClientConfig;

const CASES_PATH: &str = "/cases";
const FILTERS_PATH: &str = "/cases/filters";

/// HTTP data source talking to the case API.
#[derive(Debug, Clone)]
pub struct HttpCaseSource {
    client: Client,
    config: ClientConfig,
}

impl HttpCaseSource {
    /// Create a source from a validated configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let mut builder = Client::builder()
            .timeout(config.timeout())
            .default_headers(headers);

        if let Some(ref user_agent) = config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }

        let client = builder
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            base_url = %config.base_url,
            timeout_secs = config.timeout_seconds,
            "Initializing HTTP case source"
        );

        Ok(Self { client, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env())
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Send a GET and decode a JSON success body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<T> {
        let url = self.url(path);
        let start = Instant::now();

        let response = self.client.get(&url).query(query).send().await?;
        let status = response.status();

        debug!(
            url = %url,
            status = status.as_u16(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Case API responded"
        );

        if !status.is_success() {
            let err = error_from_response(response).await;
            warn!(url = %url, error = %err, "Case API request failed");
            return Err(err);
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl CaseSource for HttpCaseSource {
    async fn list_cases(&self, req: &ListCasesRequest) -> Result<CaseList> {
        let list: CaseList = self.get_json(CASES_PATH, &req.query_pairs()).await?;
        debug!(
            query = %req.text,
            offset = req.offset,
            result_count = list.items.len(),
            total = list.total,
            "Listed cases"
        );
        Ok(list)
    }

    async fn list_facets(&self) -> Result<FacetCatalog> {
        let catalog: FacetCatalog = self.get_json(FILTERS_PATH, &[]).await?;
        debug!(
            centers = catalog.centers.len(),
            categories = catalog.categories.len(),
            "Listed facets"
        );
        Ok(catalog)
    }

    async fn get_case(&self, case_id: &str) -> Result<CaseDetail> {
        if case_id.is_empty() {
            return Err(Error::InvalidInput("case_id cannot be empty".to_string()));
        }

        let path = format!("{}/{}", CASES_PATH, urlencoding::encode(case_id));
        match self.get_json(&path, &[]).await {
            Err(Error::Http { status: 404, .. }) => Err(Error::NotFound(case_id.to_string())),
            other => other,
        }
    }
}

/// Turn a non-success response into [`Error::Http`].
async fn error_from_response(response: Response) -> Error {
    let status = response.status();
    // A body that cannot be read is treated as empty.
    let body = response.text().await.unwrap_or_default();
    Error::http(status.as_u16(), error_message(status, &body))
}

/// Message for a failed response: the `detail` field of a JSON body, else a
/// prefix of the raw body. Empty when there is neither; the error's display
/// then shows the bare status.
pub(crate) fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(JsonValue::Object(map)) = serde_json::from_str::<JsonValue>(body) {
        match map.get("detail") {
            Some(JsonValue::String(detail)) => return detail.clone(),
            Some(JsonValue::Null) | None => {}
            Some(other) => return other.to_string(),
        }
    }

    if !body.trim().is_empty() {
        return body.chars().take(ERROR_BODY_PREVIEW_CHARS).collect();
    }

    debug!(status = status.as_u16(), "Error response without body");
    String::new()
}
