//! Authenticated synchronous transport for the segment database.
//!
//! # Design
//! `SegmentDbClient` carries no mutable state between calls: it holds only
//! the blocking HTTP client built once at construction, with the TLS client
//! identity baked in. The identity is used whenever a URL's scheme is
//! `https`; plain `http` URLs go out unauthenticated over the same client.
//! Every call blocks until the response is fully read or fails, and the
//! timeout is attached to the individual request — concurrent calls with
//! different timeouts never interfere.

use std::time::Duration;

use log::{debug, error};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;

use crate::credential::CredentialProvider;
use crate::error::Error;

/// Timeout applied when the caller does not specify one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(900);

/// Wire value the server expects for PUT/PATCH bodies. Deliberately the bare
/// token `JSON`, not `application/json`.
const JSON_CONTENT_TYPE: &str = "JSON";

/// Blocking client for the DQSEGDB REST API.
///
/// Construct with [`SegmentDbClient::new`]; point it at URLs built by the
/// [`urls`](crate::urls) module. Response bodies are returned as opaque
/// strings — JSON decoding is the caller's business.
#[derive(Debug, Clone)]
pub struct SegmentDbClient {
    http: Client,
}

impl SegmentDbClient {
    /// Resolve the client credential and build the transport.
    ///
    /// Fails fast with [`Error::CredentialNotFound`] when the provider has
    /// nothing to offer; a client without a certificate/key pair cannot
    /// authenticate to any HTTPS endpoint and is useless in production.
    pub fn new(provider: &dyn CredentialProvider) -> Result<Self, Error> {
        let credential = provider.resolve().ok_or(Error::CredentialNotFound)?;
        let identity = credential.identity()?;
        let http = Client::builder()
            .use_rustls_tls()
            .identity(identity)
            .build()
            .map_err(Error::CredentialInvalid)?;
        Ok(Self { http })
    }

    /// GET `url` with the default timeout and return the response body.
    pub fn get(&self, url: &str) -> Result<String, Error> {
        self.get_with_timeout(url, DEFAULT_TIMEOUT)
    }

    /// GET `url`, returning the full response body unmodified on success.
    pub fn get_with_timeout(&self, url: &str, timeout: Duration) -> Result<String, Error> {
        let response = self.dispatch(Method::GET, url, None, timeout)?;
        response.text().map_err(|source| {
            error!("error reading body from {url}: {source}");
            Error::Transport {
                url: url.to_string(),
                source,
            }
        })
    }

    /// PUT `payload` to `url` with the default timeout.
    pub fn put(&self, url: &str, payload: &str) -> Result<String, Error> {
        self.put_with_timeout(url, payload, DEFAULT_TIMEOUT)
    }

    /// PUT `payload` to `url`. On success returns the request URL, not the
    /// response body — the server's insert responses carry nothing useful
    /// and the URL identifies the resource just written.
    pub fn put_with_timeout(
        &self,
        url: &str,
        payload: &str,
        timeout: Duration,
    ) -> Result<String, Error> {
        self.dispatch(Method::PUT, url, Some(payload), timeout)?;
        Ok(url.to_string())
    }

    /// PATCH `payload` to `url` with the default timeout.
    pub fn patch(&self, url: &str, payload: &str) -> Result<String, Error> {
        self.patch_with_timeout(url, payload, DEFAULT_TIMEOUT)
    }

    /// PATCH `payload` to `url`. Same contract as [`put_with_timeout`]:
    /// returns the request URL on success.
    ///
    /// [`put_with_timeout`]: SegmentDbClient::put_with_timeout
    pub fn patch_with_timeout(
        &self,
        url: &str,
        payload: &str,
        timeout: Duration,
    ) -> Result<String, Error> {
        self.dispatch(Method::PATCH, url, Some(payload), timeout)?;
        Ok(url.to_string())
    }

    /// Issue one request and check the status. Failures are logged before
    /// they propagate so operators see them even when the caller swallows
    /// the error.
    fn dispatch(
        &self,
        method: Method,
        url: &str,
        body: Option<&str>,
        timeout: Duration,
    ) -> Result<reqwest::blocking::Response, Error> {
        debug!("beginning url call: {url}");

        let mut request = self.http.request(method, url).timeout(timeout);
        if let Some(payload) = body {
            request = request
                .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
                .body(payload.to_string());
        }

        let response = request.send().map_err(|source| {
            error!("error accessing url: {url}: {source}");
            Error::Transport {
                url: url.to_string(),
                source,
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("").to_string();
            error!("error accessing url: {url}: {} {reason}", status.as_u16());
            return Err(Error::Http {
                status: status.as_u16(),
                reason,
                url: url.to_string(),
            });
        }

        debug!("completed url call: {url}");
        Ok(response)
    }
}
