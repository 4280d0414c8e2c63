//! Creating data proxies from URIs.
//!
//! Supported URIs:
//!
//! - `seqrepo+file:///path/to/store` (or `seqrepo:///path/to/store`): a local store
//! - `seqrepo+http://host/seqrepo`, `seqrepo+https://host/seqrepo`: a REST service
//!
//! When no URI is given, [`DATAPROXY_URI_ENV`] is consulted.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use log::info;
use vrs_seqrepo::SeqRepo;

use crate::consts::DATAPROXY_URI_ENV;
use crate::errors::{DataProxyError, Result};
use crate::proxy::{CachingDataProxy, DataProxy};
use crate::rest::SeqRepoRestDataProxy;
use crate::seqrepo::SeqRepoDataProxy;

/// A boxed data proxy that can be shared between threads.
pub type BoxedDataProxy = Box<dyn DataProxy + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataProxyUri {
    /// Local store rooted at a directory.
    SeqRepoLocal(PathBuf),
    /// REST service base URL.
    SeqRepoRest(String),
}

impl FromStr for DataProxyUri {
    type Err = DataProxyError;

    fn from_str(uri: &str) -> Result<Self> {
        let (scheme, rest) = uri
            .split_once("://")
            .ok_or_else(|| DataProxyError::Config(format!("not a URI: {}", uri)))?;
        let (provider, proto) = scheme.split_once('+').unwrap_or((scheme, ""));

        if provider != "seqrepo" {
            return Err(DataProxyError::Config(format!(
                "data proxy provider {} is not implemented",
                provider
            )));
        }
        match proto {
            "" | "file" => {
                if rest.is_empty() {
                    return Err(DataProxyError::Config(format!("missing store path in {}", uri)));
                }
                Ok(DataProxyUri::SeqRepoLocal(PathBuf::from(rest)))
            }
            "http" | "https" => Ok(DataProxyUri::SeqRepoRest(format!("{}://{}", proto, rest))),
            _ => Err(DataProxyError::Config(format!(
                "SeqRepo URI scheme {} is not implemented",
                scheme
            ))),
        }
    }
}

impl DataProxyUri {
    /// Open the backend this URI names.
    pub fn connect(&self) -> Result<BoxedDataProxy> {
        match self {
            DataProxyUri::SeqRepoLocal(root) => {
                let sr = SeqRepo::open(root)
                    .map_err(|e| DataProxyError::Store(format!("{:#}", e)))?;
                Ok(Box::new(SeqRepoDataProxy::new(Arc::new(sr))))
            }
            DataProxyUri::SeqRepoRest(base_url) => {
                Ok(Box::new(SeqRepoRestDataProxy::new(base_url.as_str())))
            }
        }
    }
}

/// Pick the explicit URI, falling back to the environment value.
fn resolve_uri(uri: Option<&str>, from_env: Option<String>) -> Result<String> {
    uri.map(str::to_string).or(from_env).ok_or_else(|| {
        DataProxyError::Config(format!(
            "no data proxy URI provided or found in {}",
            DATAPROXY_URI_ENV
        ))
    })
}

/// Create a data proxy, with identifier translation, from a URI.
///
/// # Arguments
///
/// - uri: data proxy URI; `None` reads `GA4GH_VRS_DATAPROXY_URI`
pub fn create_dataproxy(uri: Option<&str>) -> Result<CachingDataProxy<BoxedDataProxy>> {
    let uri = resolve_uri(uri, env::var(DATAPROXY_URI_ENV).ok())?;
    info!("Creating data proxy for {}", uri);
    let parsed: DataProxyUri = uri.parse()?;
    Ok(CachingDataProxy::new(parsed.connect()?))
}
