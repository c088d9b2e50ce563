use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use dashboard_core::{
    Ack, CrawlAck, HeadingRecord, HeadingsResponse, LinkRecord, LinksResponse, ResultId,
    ResultItem, ResultPage, ResultQuery, SyncError,
};
use dashboard_logging::dash_trace;

use crate::{DashboardConfig, ResultsProvider};

const API_KEY_HEADER: &str = "x-api-key";

#[derive(Serialize)]
struct CrawlRequest<'a> {
    url: &'a str,
}

#[derive(Serialize)]
struct BulkActionRequest<'a> {
    urls: &'a [String],
}

#[derive(Deserialize, Default)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// Results provider backed by the crawler's REST API.
#[derive(Debug, Clone)]
pub struct HttpResultsProvider {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpResultsProvider {
    pub fn new(config: &DashboardConfig) -> Result<Self, SyncError> {
        let mut base_url = Url::parse(&config.api_base_url).map_err(|err| {
            SyncError::validation(format!("invalid API base URL {:?}: {err}", config.api_base_url))
        })?;
        // Keep the last path segment when joining relative endpoints.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .default_headers(default_headers(config)?)
            .build()
            .map_err(|err| SyncError::Network(err.to_string()))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, SyncError> {
        self.base_url
            .join(path)
            .map_err(|err| SyncError::validation(format!("invalid endpoint {path:?}: {err}")))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<Vec<u8>>,
    ) -> Result<T, SyncError> {
        dash_trace!("{} {}", method, url);
        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request
                .header(CONTENT_TYPE, "application/json")
                .body(body);
        }

        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        if !status.is_success() {
            return Err(request_error(status, &bytes));
        }
        serde_json::from_slice(&bytes).map_err(|err| SyncError::Decode(err.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, SyncError> {
        self.send(Method::GET, url, None).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, SyncError> {
        let body = serde_json::to_vec(body).map_err(|err| SyncError::Decode(err.to_string()))?;
        self.send(Method::POST, url, Some(body)).await
    }
}

#[async_trait::async_trait]
impl ResultsProvider for HttpResultsProvider {
    async fn list_results(&self, query: &ResultQuery) -> Result<ResultPage, SyncError> {
        let mut url = self.endpoint("results")?;
        url.query_pairs_mut().extend_pairs(query.to_pairs());
        self.get(url).await
    }

    async fn create_crawl(&self, url: &str) -> Result<CrawlAck, SyncError> {
        self.post(self.endpoint("crawl")?, &CrawlRequest { url }).await
    }

    async fn get_result_meta(&self, id: ResultId) -> Result<ResultItem, SyncError> {
        self.get(self.endpoint(&format!("results/{id}"))?).await
    }

    async fn get_links(&self, id: ResultId) -> Result<Vec<LinkRecord>, SyncError> {
        let response: LinksResponse =
            self.get(self.endpoint(&format!("results/{id}/links"))?).await?;
        Ok(response.links)
    }

    async fn get_headings(&self, id: ResultId) -> Result<Vec<HeadingRecord>, SyncError> {
        let response: HeadingsResponse =
            self.get(self.endpoint(&format!("results/{id}/headings"))?).await?;
        Ok(response.headings)
    }

    async fn bulk_rerun(&self, urls: &[String]) -> Result<Ack, SyncError> {
        self.post(self.endpoint("results/rerun")?, &BulkActionRequest { urls })
            .await
    }

    async fn bulk_delete(&self, urls: &[String]) -> Result<Ack, SyncError> {
        self.post(self.endpoint("results/delete")?, &BulkActionRequest { urls })
            .await
    }

    async fn stop_crawl(&self, id: ResultId) -> Result<Ack, SyncError> {
        self.post(self.endpoint(&format!("results/{id}/stop"))?, &serde_json::json!({}))
            .await
    }
}

fn default_headers(config: &DashboardConfig) -> Result<HeaderMap, SyncError> {
    let mut headers = HeaderMap::new();
    if let Some(key) = config.api_key.as_deref() {
        headers.insert(
            HeaderName::from_static(API_KEY_HEADER),
            header_value(key, "API key")?,
        );
    }
    if let Some(token) = config.auth_token.as_deref() {
        headers.insert(AUTHORIZATION, header_value(&format!("Bearer {token}"), "auth token")?);
    }
    Ok(headers)
}

fn header_value(raw: &str, what: &str) -> Result<HeaderValue, SyncError> {
    let mut value = HeaderValue::from_str(raw)
        .map_err(|_| SyncError::validation(format!("{what} contains invalid characters")))?;
    value.set_sensitive(true);
    Ok(value)
}

fn request_error(status: StatusCode, body: &[u8]) -> SyncError {
    let parsed: ErrorBody = serde_json::from_slice(body).unwrap_or_default();
    let message = parsed
        .error
        .or(parsed.message)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| format!("API request failed: {status}"));
    SyncError::Request {
        status: status.as_u16(),
        message,
    }
}

fn map_reqwest_error(err: reqwest::Error) -> SyncError {
    if err.is_timeout() {
        return SyncError::Network(format!("request timed out: {err}"));
    }
    if err.is_decode() {
        return SyncError::Decode(err.to_string());
    }
    SyncError::Network(err.to_string())
}
