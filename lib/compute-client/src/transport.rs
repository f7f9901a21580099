// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The boundary between the client and the HTTP layer.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use slog::{debug, o, Logger};

use crate::Error;

/// Carries a request to the tenant's compute endpoint and returns the raw
/// response body.
///
/// `path` is relative to the endpoint (`servers`, `images/8419`, ...); the
/// transport owns the host and tenant prefix as well as any authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        path: &str,
        method: Method,
        body: Option<Vec<u8>>,
    ) -> Result<Vec<u8>, Error>;
}

/// A [`Transport`] speaking HTTP through reqwest.
pub struct HttpTransport {
    client: reqwest::Client,
    base: String,
    log: Logger,
}

impl HttpTransport {
    pub fn new(compute_url: &str, tenant_id: &str, log: Logger) -> Self {
        Self::with_client(reqwest::Client::new(), compute_url, tenant_id, log)
    }

    /// Creates a transport that issues requests through `client`. Default
    /// headers configured on `client` (an auth token, for instance) are sent
    /// with every request.
    pub fn with_client(
        client: reqwest::Client,
        compute_url: &str,
        tenant_id: &str,
        log: Logger,
    ) -> Self {
        let mut base = compute_url.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        if !tenant_id.is_empty() {
            base.push_str(tenant_id);
            base.push('/');
        }

        let log = log.new(o!("compute_endpoint" => base.clone()));
        Self { client, base, log }
    }

    /// Returns the absolute URL for an endpoint-relative `path`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        path: &str,
        method: Method,
        body: Option<Vec<u8>>,
    ) -> Result<Vec<u8>, Error> {
        let url = self.url(path);
        debug!(self.log, "{} request to {}", method, url);

        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request =
                request.header(CONTENT_TYPE, "application/json").body(body);
        }

        // The compute API answers 200, 202 or 204 on success depending on
        // the endpoint; anything else is a failure.
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            debug!(self.log, "request failed"; "status" => status.as_u16());
            return Err(Error::Status(status.as_u16()));
        }

        Ok(response.bytes().await?.to_vec())
    }
}
