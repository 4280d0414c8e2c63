//! Data proxy backed by a local [`SeqRepo`] store.

use std::ops::Deref;
use std::sync::Arc;

use log::debug;
use vrs_seqrepo::{SeqRepo, coerce_namespace};

use crate::errors::{DataProxyError, Result};
use crate::models::SequenceMetadata;
use crate::proxy::DataProxy;

/// A [`DataProxy`] over a caller-owned local store.
///
/// The store handle can be anything that dereferences to a [`SeqRepo`]: a
/// plain reference when the store outlives the proxy, or an [`Arc`] when
/// ownership is shared.
#[derive(Debug, Clone)]
pub struct SeqRepoDataProxy<S = Arc<SeqRepo>> {
    sr: S,
}

impl<S: Deref<Target = SeqRepo>> SeqRepoDataProxy<S> {
    pub fn new(sr: S) -> Self {
        SeqRepoDataProxy { sr }
    }

    pub fn store(&self) -> &SeqRepo {
        &self.sr
    }
}

impl<S: Deref<Target = SeqRepo>> DataProxy for SeqRepoDataProxy<S> {
    fn get_sequence(
        &self,
        identifier: &str,
        start: Option<usize>,
        end: Option<usize>,
    ) -> Result<String> {
        self.sr
            .fetch(identifier, start, end)
            .map_err(|e| DataProxyError::from_store(identifier, e))
    }

    fn get_metadata(&self, identifier: &str) -> Result<SequenceMetadata> {
        let (namespace, alias) =
            coerce_namespace(identifier).map_err(|e| DataProxyError::from_store(identifier, e))?;
        let seq_id = self
            .sr
            .find_alias(&namespace, &alias)
            .ok_or_else(|| DataProxyError::NotFound(identifier.to_string()))?;
        debug!("Resolved {} to seq_id {}", identifier, seq_id);

        let seqinfo = self
            .sr
            .fetch_seqinfo(seq_id)
            .map_err(|e| DataProxyError::from_store(identifier, e))?;
        let aliases = self
            .sr
            .fetch_aliases(seq_id)
            .into_iter()
            .map(|(namespace, alias)| format!("{}:{}", namespace, alias))
            .collect();

        Ok(SequenceMetadata {
            length: seqinfo.length,
            alphabet: seqinfo.alphabet.clone(),
            added: Some(seqinfo.added_isoformat()),
            aliases,
        })
    }
}
