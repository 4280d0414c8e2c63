//! Data proxy backed by a SeqRepo REST service.
//!
//! Requests go to `<base_url>/1/sequence/<identifier>` (with optional
//! `start`/`end` query parameters) and `<base_url>/1/metadata/<identifier>`.
//! A 404, or a metadata body that is empty or not a metadata record, means the
//! identifier is unknown; every other status except 200 is a
//! [`DataProxyError::Remote`]. Nothing is cached and nothing is retried.

use std::env;
use std::io::Read;
use std::time::Duration;

use log::{info, warn};
use ureq::{Agent, AgentBuilder, Request, Response};

use crate::consts::{
    DEFAULT_SEQREPO_REST_SERVICE_URL, METADATA_ENDPOINT, REST_API_VERSION,
    SEQREPO_REST_SERVICE_URL_ENV, SEQUENCE_ENDPOINT,
};
use crate::errors::{DataProxyError, Result};
use crate::models::SequenceMetadata;
use crate::proxy::DataProxy;

/// Get default REST service base URL from environment variable
pub fn get_default_base_url() -> String {
    env::var(SEQREPO_REST_SERVICE_URL_ENV)
        .unwrap_or_else(|_| DEFAULT_SEQREPO_REST_SERVICE_URL.to_string())
}

/// Builder for constructing a [`SeqRepoRestDataProxy`] with custom configuration.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use vrs_dataproxy::SeqRepoRestDataProxy;
///
/// let dp = SeqRepoRestDataProxy::builder()
///     .with_base_url("http://localhost:5000/seqrepo")
///     .with_timeout(Duration::from_secs(30))
///     .finish();
/// assert_eq!(dp.base_url(), "http://localhost:5000/seqrepo/1/");
/// ```
#[derive(Default, Debug)]
pub struct SeqRepoRestDataProxyBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl SeqRepoRestDataProxyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the service base URL, without the API version segment.
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets an overall timeout for each request. Without one, the transport's
    /// defaults apply.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Consumes the builder and creates the proxy.
    pub fn finish(self) -> SeqRepoRestDataProxy {
        let base_url = self.base_url.unwrap_or_else(get_default_base_url);
        let mut agent = AgentBuilder::new();
        if let Some(timeout) = self.timeout {
            agent = agent.timeout(timeout);
        }
        SeqRepoRestDataProxy {
            base_url: format!("{}/{}/", base_url.trim_end_matches('/'), REST_API_VERSION),
            agent: agent.build(),
        }
    }
}

/// A [`DataProxy`] over a remote SeqRepo REST service.
#[derive(Debug, Clone)]
pub struct SeqRepoRestDataProxy {
    /// `<base_url>/<api version>/`
    base_url: String,
    agent: Agent,
}

impl SeqRepoRestDataProxy {
    pub fn new<S: Into<String>>(base_url: S) -> Self {
        Self::builder().with_base_url(base_url).finish()
    }

    pub fn builder() -> SeqRepoRestDataProxyBuilder {
        SeqRepoRestDataProxyBuilder::new()
    }

    /// The versioned base URL every request is built from.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint_url(&self, endpoint: &str, identifier: &str) -> String {
        format!("{}{}/{}", self.base_url, endpoint, identifier)
    }

    /// Send a request, translating every non-200 outcome.
    fn send(&self, request: Request, identifier: &str) -> Result<Response> {
        let url = request.url().to_string();
        info!("Fetching {}", url);
        match request.call() {
            Ok(response) if response.status() == 200 => Ok(response),
            Ok(response) => Err(DataProxyError::Remote {
                status: response.status(),
                url,
            }),
            Err(ureq::Error::Status(404, _)) => {
                Err(DataProxyError::NotFound(identifier.to_string()))
            }
            Err(ureq::Error::Status(status, _)) => Err(DataProxyError::Remote { status, url }),
            Err(ureq::Error::Transport(transport)) => Err(DataProxyError::Transport {
                url,
                message: transport.to_string(),
            }),
        }
    }
}

impl DataProxy for SeqRepoRestDataProxy {
    fn get_sequence(
        &self,
        identifier: &str,
        start: Option<usize>,
        end: Option<usize>,
    ) -> Result<String> {
        let url = self.endpoint_url(SEQUENCE_ENDPOINT, identifier);
        let mut request = self.agent.get(&url);
        if let Some(start) = start {
            request = request.query("start", &start.to_string());
        }
        if let Some(end) = end {
            request = request.query("end", &end.to_string());
        }

        let response = self.send(request, identifier)?;
        let mut sequence = String::new();
        response
            .into_reader()
            .read_to_string(&mut sequence)
            .map_err(|e| DataProxyError::InvalidResponse {
                url,
                message: e.to_string(),
            })?;
        Ok(sequence)
    }

    fn get_metadata(&self, identifier: &str) -> Result<SequenceMetadata> {
        let url = self.endpoint_url(METADATA_ENDPOINT, identifier);
        let response = self.send(self.agent.get(&url), identifier)?;
        let mut body = String::new();
        response
            .into_reader()
            .read_to_string(&mut body)
            .map_err(|e| DataProxyError::InvalidResponse {
                url: url.clone(),
                message: e.to_string(),
            })?;
        serde_json::from_str(&body).map_err(|e| {
            warn!("Unusable metadata record from {}: {}", url, e);
            DataProxyError::NotFound(identifier.to_string())
        })
    }
}
