//! Lazy, length-aware access to one sequence through a data proxy.

use crate::errors::{DataProxyError, Result};
use crate::models::SequenceMetadata;
use crate::proxy::DataProxy;

/// A view of one sequence that fetches content only when asked.
///
/// Construction fetches the metadata once, so the length is always known.
/// Content is never cached: every access goes back to the data proxy, which
/// keeps proxies cheap to create and small in memory whatever the sequence
/// length.
///
/// ```rust
/// # use vrs_dataproxy::{SeqRepoDataProxy, SequenceProxy};
/// # use vrs_seqrepo::SeqRepo;
/// let mut sr = SeqRepo::in_memory();
/// sr.add_sequence("CCTCGCCTCCACGTAC", ["refseq:NM_000551.3"]).unwrap();
/// let sp = SequenceProxy::new(SeqRepoDataProxy::new(&sr), "refseq:NM_000551.3").unwrap();
/// assert_eq!(sp.len(), 16);
/// assert_eq!(sp.range_at(0, 10).unwrap(), "CCTCGCCTCC");
/// assert_eq!(sp.at(2).unwrap(), "T");
/// ```
#[derive(Debug, Clone)]
pub struct SequenceProxy<P> {
    dp: P,
    identifier: String,
    metadata: SequenceMetadata,
}

impl<P: DataProxy> SequenceProxy<P> {
    /// Bind a data proxy to an identifier.
    ///
    /// # Errors
    ///
    /// [`DataProxyError::NotFound`] when the identifier is unknown.
    pub fn new<S: Into<String>>(dp: P, identifier: S) -> Result<Self> {
        let identifier = identifier.into();
        let metadata = dp.get_metadata(&identifier)?;
        Ok(SequenceProxy {
            dp,
            identifier,
            metadata,
        })
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Metadata fetched at construction.
    pub fn metadata(&self) -> &SequenceMetadata {
        &self.metadata
    }

    pub fn data_proxy(&self) -> &P {
        &self.dp
    }

    /// Sequence length in residues, without a backend call.
    pub fn len(&self) -> usize {
        self.metadata.length
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fetch the whole sequence.
    pub fn full_content(&self) -> Result<String> {
        self.dp.get_sequence(&self.identifier, None, None)
    }

    /// The residue at `index`, as a one-character string.
    ///
    /// Equal to `slice(Some(index), Some(index + 1), None)` for every index
    /// inside the sequence. Unlike [`SequenceProxy::slice`], which leaves
    /// out-of-range bounds to the data proxy, an index at or past the end is
    /// rejected with [`DataProxyError::InvalidArgument`] before any fetch.
    pub fn at(&self, index: usize) -> Result<String> {
        if index >= self.len() {
            return Err(DataProxyError::InvalidArgument(format!(
                "index {} out of range for {} of length {}",
                index,
                self.identifier,
                self.len()
            )));
        }
        self.range_at(index, index + 1)
    }

    /// The half-open range `[start, end)`, which must lie within the sequence.
    ///
    /// Bounds are checked against the known length, so an out-of-range request
    /// never reaches the data proxy.
    pub fn range_at(&self, start: usize, end: usize) -> Result<String> {
        if start > end || end > self.len() {
            return Err(DataProxyError::InvalidArgument(format!(
                "range {}..{} out of bounds for {} of length {}",
                start,
                end,
                self.identifier,
                self.len()
            )));
        }
        self.dp.get_sequence(&self.identifier, Some(start), Some(end))
    }

    /// Slice-style access: bounds are passed to the data proxy as given, and
    /// out-of-range bounds follow its policy.
    ///
    /// Only contiguous slices are supported: `step` must be absent or 1.
    pub fn slice(
        &self,
        start: Option<usize>,
        stop: Option<usize>,
        step: Option<isize>,
    ) -> Result<String> {
        if !matches!(step, None | Some(1)) {
            return Err(DataProxyError::InvalidArgument(
                "only contiguous sequence ranges are supported".to_string(),
            ));
        }
        self.dp.get_sequence(&self.identifier, start, stop)
    }

    /// Reverse iteration is not supported.
    pub fn reversed(&self) -> Result<Box<dyn Iterator<Item = char>>> {
        Err(DataProxyError::NotImplemented(
            "reversed iteration of a sequence proxy".to_string(),
        ))
    }
}
