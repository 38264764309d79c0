use std::sync::Arc;

use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::api::{ApiRequest, DataEnvelope, RefreshedTokens};
use crate::devices::LogSink;
use crate::error::Error;
use crate::token_store::TokenStore;

/// Executes one logical request, transparently handling token expiry: a 401
/// triggers a refresh-token exchange and the original request is resent with
/// the new access token.
pub(crate) struct Pipeline {
    client: reqwest::Client,
    addr: String,
    store: Arc<dyn TokenStore>,
    cancel: CancellationToken,
    log: LogSink,
}

impl Pipeline {
    pub(crate) fn new(
        client: reqwest::Client,
        addr: String,
        store: Arc<dyn TokenStore>,
        cancel: CancellationToken,
        log: LogSink,
    ) -> Self {
        Self {
            client,
            addr,
            store,
            cancel,
            log,
        }
    }

    pub(crate) fn log(&self, line: &str) {
        (self.log)(line);
    }

    /// Resolution order: 2xx is returned unchanged; exactly 401 refreshes the
    /// token pair and resends the original descriptor; anything else is a
    /// terminal `Error::Request` carrying the URL.
    ///
    /// The resend recurses with no depth bound: a server that keeps answering
    /// 401 after a successful refresh keeps the call looping. Cancellation is
    /// the only way out of that loop.
    pub(crate) async fn execute(&self, request: &ApiRequest) -> Result<reqwest::Response, Error> {
        if self.cancel.is_cancelled() {
            return Err(Error::Aborted);
        }
        let response = tokio::select! {
            _ = self.cancel.cancelled() => return Err(Error::Aborted),
            sent = self.send_once(request) => sent?,
        };
        if response.status().is_success() {
            return Ok(response);
        }
        if response.status() == StatusCode::UNAUTHORIZED {
            self.log("token expired, refreshing");
            self.refresh_tokens().await?;
            self.log("token refreshed, start resending request");
            return Box::pin(self.execute(request)).await;
        }
        Err(Error::Request {
            url: request.url.clone(),
            status: response.status(),
        })
    }

    async fn send_once(&self, request: &ApiRequest) -> Result<reqwest::Response, Error> {
        let builder = self
            .client
            .request(request.method.clone(), &request.url)
            .bearer_auth(self.store.access_token())
            .header(ACCEPT, "application/json");
        let builder = match &request.body {
            Some(body) => builder.json(body),
            None => builder,
        };
        debug!(method = %request.method, url = %request.url, "http request");
        let response = builder.send().await?;
        debug!(
            method = %request.method,
            url = %request.url,
            status = %response.status(),
            "http response"
        );
        Ok(response)
    }

    /// Exchanges the current refresh token for a new pair and persists it.
    ///
    /// The exchange goes through `execute` itself, so it carries a Bearer
    /// header built from the possibly-stale access token. The server accepts
    /// that; the refresh token in the body is what authenticates the call.
    async fn refresh_tokens(&self) -> Result<(), Error> {
        let request = ApiRequest::post(
            format!("{}/token", self.addr),
            json!({ "refresh_token": self.store.refresh_token() }),
        );
        let response = Box::pin(self.execute(&request)).await?;
        let body = response.text().await?;
        let parsed: DataEnvelope<RefreshedTokens> =
            serde_json::from_str(&body).map_err(|source| Error::Parse {
                url: request.url.clone(),
                source,
            })?;
        self.store
            .update_tokens(&parsed.data.token, &parsed.data.refresh_token)?;
        Ok(())
    }
}
