use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeqRepoError {
    #[error("Sequence not found: {0}")]
    NotFound(String),

    #[error("Alias refers to more than one sequence: {0}")]
    AmbiguousAlias(String),

    #[error("Multiple namespaces possible for {0}")]
    AmbiguousNamespace(String),

    #[error("Could not infer namespace for {0}")]
    InvalidIdentifier(String),

    #[error("Sequence content must be ASCII: {0}")]
    InvalidSequence(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SeqRepoError {
    /// True for every failure that means "this identifier does not name a
    /// single known sequence".
    pub fn is_lookup_failure(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_)
                | Self::AmbiguousAlias(_)
                | Self::AmbiguousNamespace(_)
                | Self::InvalidIdentifier(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SeqRepoError>;
