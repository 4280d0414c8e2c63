//! The data proxy contract and the caching identifier translator.
//!
//! Backends implement [`DataProxy`]; [`CachingDataProxy`] wraps any of them
//! and adds the memoized [`CachingDataProxy::translate_sequence_identifier`].

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};

use log::debug;

use crate::errors::{DataProxyError, Result};
use crate::models::SequenceMetadata;

/// Sequence and metadata access, independent of where the data lives.
///
/// Implementations MUST accept GA4GH sequence identifiers (`ga4gh:SQ...`) and
/// return them among the aliases of a sequence, whether the backend stores
/// them natively or synthesizes them.
pub trait DataProxy {
    /// Return the sequence, or its half-open `[start, end)` subsequence.
    ///
    /// Out-of-range bounds are handled by the backend.
    ///
    /// # Errors
    ///
    /// [`DataProxyError::NotFound`] when the identifier is unknown.
    fn get_sequence(
        &self,
        identifier: &str,
        start: Option<usize>,
        end: Option<usize>,
    ) -> Result<String>;

    /// Return length, alphabet, aliases and other known details of a sequence.
    ///
    /// # Errors
    ///
    /// [`DataProxyError::NotFound`] when the identifier is unknown.
    fn get_metadata(&self, identifier: &str) -> Result<SequenceMetadata>;
}

impl<P: DataProxy + ?Sized> DataProxy for &P {
    fn get_sequence(
        &self,
        identifier: &str,
        start: Option<usize>,
        end: Option<usize>,
    ) -> Result<String> {
        (**self).get_sequence(identifier, start, end)
    }

    fn get_metadata(&self, identifier: &str) -> Result<SequenceMetadata> {
        (**self).get_metadata(identifier)
    }
}

impl<P: DataProxy + ?Sized> DataProxy for Box<P> {
    fn get_sequence(
        &self,
        identifier: &str,
        start: Option<usize>,
        end: Option<usize>,
    ) -> Result<String> {
        (**self).get_sequence(identifier, start, end)
    }

    fn get_metadata(&self, identifier: &str) -> Result<SequenceMetadata> {
        (**self).get_metadata(identifier)
    }
}

impl<P: DataProxy + ?Sized> DataProxy for Arc<P> {
    fn get_sequence(
        &self,
        identifier: &str,
        start: Option<usize>,
        end: Option<usize>,
    ) -> Result<String> {
        (**self).get_sequence(identifier, start, end)
    }

    fn get_metadata(&self, identifier: &str) -> Result<SequenceMetadata> {
        (**self).get_metadata(identifier)
    }
}

/// Uncached translation: deduplicated aliases of `identifier`, optionally
/// restricted to `namespace`.
fn translate<P: DataProxy + ?Sized>(
    dp: &P,
    identifier: &str,
    namespace: Option<&str>,
) -> Result<Vec<String>> {
    let metadata = dp.get_metadata(identifier).map_err(|e| match e {
        DataProxyError::NotFound(_) | DataProxyError::InvalidResponse { .. } => {
            DataProxyError::NotFound(identifier.to_string())
        }
        other => other,
    })?;
    if metadata.aliases.is_empty() {
        return Err(DataProxyError::NotFound(identifier.to_string()));
    }

    let mut seen = HashSet::new();
    let aliases = match namespace {
        Some(namespace) => metadata
            .aliases_in(namespace)
            .filter(|alias| seen.insert(*alias))
            .map(str::to_string)
            .collect(),
        None => metadata
            .aliases
            .iter()
            .filter(|alias| seen.insert(alias.as_str()))
            .cloned()
            .collect(),
    };
    Ok(aliases)
}

type TranslationKey = (String, Option<String>);

/// Wraps a [`DataProxy`] and memoizes identifier translation.
///
/// Translations are cached per `(identifier, namespace)` for the lifetime of
/// the wrapper and never expire. Failed lookups are not cached. The cache may
/// be populated concurrently; racing first lookups may each reach the backend,
/// and the first result stored is the one every caller sees afterwards.
#[derive(Debug)]
pub struct CachingDataProxy<P> {
    inner: P,
    translations: RwLock<HashMap<TranslationKey, Vec<String>>>,
}

impl<P: DataProxy> CachingDataProxy<P> {
    pub fn new(inner: P) -> Self {
        CachingDataProxy {
            inner,
            translations: RwLock::new(HashMap::new()),
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    pub fn into_inner(self) -> P {
        self.inner
    }

    /// Number of cached translations.
    pub fn cached_translations(&self) -> usize {
        self.translations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Translate an identifier into its aliases, optionally only those in `namespace`.
    ///
    /// `namespace` is case-sensitive. Aliases are unique and keep the order the
    /// backend reported them in.
    ///
    /// # Errors
    ///
    /// [`DataProxyError::NotFound`] when the identifier is unknown, malformed or
    /// has no aliases. Remote and transport failures are passed through.
    ///
    /// ```rust
    /// # use vrs_dataproxy::{CachingDataProxy, SeqRepoDataProxy};
    /// # use vrs_seqrepo::SeqRepo;
    /// let mut sr = SeqRepo::in_memory();
    /// sr.add_sequence("ACGT", ["refseq:NM_000551.3"]).unwrap();
    /// let dp = CachingDataProxy::new(SeqRepoDataProxy::new(&sr));
    /// let ids = dp.translate_sequence_identifier("NM_000551.3", Some("ga4gh")).unwrap();
    /// assert_eq!(ids, vec!["ga4gh:SQ.aKF498dAxcJAqme6QYQ7EZ07-fiw8Kw2"]);
    /// ```
    pub fn translate_sequence_identifier(
        &self,
        identifier: &str,
        namespace: Option<&str>,
    ) -> Result<Vec<String>> {
        let key = (identifier.to_string(), namespace.map(str::to_string));
        if let Some(aliases) = self
            .translations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            debug!("Translation cache hit for {:?}", key);
            return Ok(aliases.clone());
        }

        debug!("Translation cache miss for {:?}", key);
        let aliases = translate(&self.inner, identifier, namespace)?;
        let mut translations = self
            .translations
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(translations.entry(key).or_insert(aliases).clone())
    }
}

impl<P: DataProxy> DataProxy for CachingDataProxy<P> {
    fn get_sequence(
        &self,
        identifier: &str,
        start: Option<usize>,
        end: Option<usize>,
    ) -> Result<String> {
        self.inner.get_sequence(identifier, start, end)
    }

    fn get_metadata(&self, identifier: &str) -> Result<SequenceMetadata> {
        self.inner.get_metadata(identifier)
    }
}
