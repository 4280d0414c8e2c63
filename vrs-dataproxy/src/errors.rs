use thiserror::Error;
use vrs_seqrepo::SeqRepoError;

/// Every failure a data proxy can report, whatever its backend.
///
/// `NotFound` is the only kind callers are expected to branch on; the others
/// signal caller bugs, unsupported operations or an unhealthy backend.
#[derive(Error, Debug)]
pub enum DataProxyError {
    #[error("Sequence not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Remote service returned HTTP status {status} for {url}")]
    Remote { status: u16, url: String },

    #[error("Not implemented: {0}")]
    NotImplemented(String),

    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("Invalid response from {url}: {message}")]
    InvalidResponse { url: String, message: String },

    #[error("Sequence store error: {0}")]
    Store(String),

    #[error("Invalid data proxy configuration: {0}")]
    Config(String),
}

impl DataProxyError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Translate a local store failure for `identifier`.
    ///
    /// Missing, ambiguous and unrecognizable identifiers all become `NotFound`.
    pub(crate) fn from_store(identifier: &str, err: SeqRepoError) -> Self {
        if err.is_lookup_failure() {
            Self::NotFound(identifier.to_string())
        } else {
            Self::Store(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, DataProxyError>;
