use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use shared::{
    error::TransportError,
    protocol::{
        ContextItem, EngineStatus, ExplainRequest, ExplainResult, RetrieveRequest, SyncResult,
    },
};
use tracing::{debug, warn};
use url::Url;

pub mod config;

pub use config::{load_settings, load_settings_from, EngineSettings, SettingsError};

pub const EXPLAIN_ROUTE: &str = "explain";
pub const RETRIEVE_ROUTE: &str = "context/retrieve";
pub const SYNC_ROUTE: &str = "context/sync";

/// Calls to the context engine. One attempt per call; retry policy belongs to the caller.
#[async_trait]
pub trait ContextTransport: Send + Sync {
    async fn explain(&self, request: &ExplainRequest) -> Result<ExplainResult, TransportError>;
    async fn retrieve_context(
        &self,
        request: &RetrieveRequest,
    ) -> Result<Vec<ContextItem>, TransportError>;
    async fn sync(&self) -> Result<SyncResult, TransportError>;
}

pub struct ContextEngineClient {
    http: Client,
    base_url: Url,
}

impl ContextEngineClient {
    pub fn new(settings: &EngineSettings) -> Result<Self> {
        let base_url = settings.base_url()?;
        // The engine is always addressed directly; a system proxy would only get in the way.
        let http = Client::builder()
            .timeout(settings.request_timeout)
            .no_proxy()
            .build()
            .context("failed to build context engine http client")?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET /` liveness probe.
    pub async fn health(&self) -> Result<EngineStatus, TransportError> {
        let url = self.endpoint("")?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(classify_send_error)?;
        decode_response("", response).await
    }

    fn endpoint(&self, route: &str) -> Result<Url, TransportError> {
        self.base_url
            .join(route)
            .map_err(|err| TransportError::ConnectionRefused(format!("bad route '{route}': {err}")))
    }

    async fn post<B, R>(&self, route: &str, body: Option<&B>) -> Result<R, TransportError>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let url = self.endpoint(route)?;
        debug!(route, "posting to context engine");
        let mut request = self.http.post(url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await.map_err(|err| {
            warn!(route, "context engine request failed: {err}");
            classify_send_error(err)
        })?;
        decode_response(route, response).await
    }
}

#[async_trait]
impl ContextTransport for ContextEngineClient {
    async fn explain(&self, request: &ExplainRequest) -> Result<ExplainResult, TransportError> {
        self.post(EXPLAIN_ROUTE, Some(request)).await
    }

    async fn retrieve_context(
        &self,
        request: &RetrieveRequest,
    ) -> Result<Vec<ContextItem>, TransportError> {
        self.post(RETRIEVE_ROUTE, Some(request)).await
    }

    async fn sync(&self) -> Result<SyncResult, TransportError> {
        self.post::<(), _>(SYNC_ROUTE, None).await
    }
}

async fn decode_response<R: DeserializeOwned>(
    route: &str,
    response: reqwest::Response,
) -> Result<R, TransportError> {
    let status = response.status();
    if status != StatusCode::OK {
        warn!(route, status = status.as_u16(), "context engine returned non-200 status");
        return Err(TransportError::ServerError(status.as_u16()));
    }

    let body = response.bytes().await.map_err(|err| {
        if err.is_timeout() {
            TransportError::ConnectionRefused(err.to_string())
        } else {
            TransportError::MalformedResponse(format!("failed to read body: {err}"))
        }
    })?;

    serde_json::from_slice(&body).map_err(|err| {
        warn!(route, "context engine response did not match expected shape: {err}");
        TransportError::MalformedResponse(err.to_string())
    })
}

fn classify_send_error(err: reqwest::Error) -> TransportError {
    // Connect failures, timeouts, and resets all mean the engine is not answering.
    TransportError::ConnectionRefused(err.to_string())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
