//! The local sequence store.
//!
//! A [`SeqRepo`] holds sequence content keyed by a content-derived `seq_id`
//! (the sha512t24u digest), a [`SeqInfo`] record per sequence and an
//! [`AliasIndex`] mapping namespaced aliases to seq_ids. Sequences added with
//! [`SeqRepo::add_sequence`] are reachable through their `ga4gh:SQ.` and
//! `MD5:` aliases.
//!
//! Stores are built in memory or opened from a directory written by
//! [`SeqRepo::write_to_dir`]. Opened stores serve range reads by seeking into
//! per-sequence files, so a slice of a long sequence never loads the whole
//! sequence.

use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::fs::{self, File, create_dir_all};
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use chrono::{DateTime, Utc};
use log::{debug, info};
use seq_io::fasta::{Reader, Record};
use serde::{Deserialize, Serialize};

use crate::alias::AliasIndex;
use crate::digest::{GA4GH_NAMESPACE, SEQUENCE_PREFIX, md5, sha512t24u};
use crate::errors::{Result, SeqRepoError};
use crate::namespace::{coerce_namespace, split_identifier};
use crate::utils::{get_dynamic_reader, get_sequence_path};

/// Namespace of the MD5 digest alias registered for every sequence.
pub const MD5_NAMESPACE: &str = "MD5";

const INDEX_FILE: &str = "index.json";
const ALIASES_DIR: &str = "aliases";
const INDEX_VERSION: u32 = 1;
const DEFAULT_SEQDATA_PATH_TEMPLATE: &str = "sequences/%s2/%s.seq";

/// Per-sequence information.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SeqInfo {
    pub seq_id: String,
    pub length: usize,
    /// Sorted distinct symbols of the sequence.
    pub alphabet: String,
    pub added: DateTime<Utc>,
}

impl SeqInfo {
    /// `added` as `YYYY-MM-DDTHH:MM:SSZ`.
    pub fn added_isoformat(&self) -> String {
        self.added.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

#[derive(Debug)]
enum SequenceData {
    InMemory(String),
    OnDisk(PathBuf),
}

/// Metadata for the entire store, serialized to `index.json`.
#[derive(Serialize, Deserialize, Debug)]
struct StoreIndex {
    version: u32,
    created_at: String,
    seqdata_path_template: String,
    sequences: Vec<SeqInfo>,
}

#[derive(Debug, Default)]
pub struct SeqRepo {
    seqinfo: HashMap<String, SeqInfo>,
    data: HashMap<String, SequenceData>,
    aliases: AliasIndex,
    root: Option<PathBuf>,
}

fn alphabet_of(sequence: &str) -> String {
    let mut symbols: Vec<char> = sequence.chars().collect();
    symbols.sort_unstable();
    symbols.dedup();
    symbols.into_iter().collect()
}

/// Clamp an optional half-open range to `[0, length]`.
fn clamp_range(start: Option<usize>, end: Option<usize>, length: usize) -> (usize, usize) {
    let end = end.unwrap_or(length).min(length);
    let start = start.unwrap_or(0).min(end);
    (start, end)
}

impl SeqRepo {
    /// Create an empty store held entirely in memory.
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.seqinfo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seqinfo.is_empty()
    }

    /// Directory the store was opened from, if any.
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn seq_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.seqinfo.keys().map(String::as_str)
    }

    pub fn aliases(&self) -> &AliasIndex {
        &self.aliases
    }

    /// Store a sequence and register its aliases.
    ///
    /// Aliases may be qualified (`refseq:NM_000551.3`) or bare accessions whose
    /// namespace can be inferred. The `ga4gh:SQ.` and `MD5:` aliases are always
    /// registered. Content is stored upper-cased, matching its digests, so
    /// adding the same residues in any case merges the aliases.
    ///
    /// # Returns
    /// the seq_id of the stored sequence
    pub fn add_sequence<I, S>(&mut self, sequence: &str, aliases: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let seq_id = sha512t24u(sequence);
        let is_new = self.insert(&seq_id, sequence, aliases)?;
        if is_new {
            self.aliases.add(
                GA4GH_NAMESPACE,
                &format!("{}{}", SEQUENCE_PREFIX, seq_id),
                &seq_id,
            );
            self.aliases.add(MD5_NAMESPACE, &md5(sequence), &seq_id);
        }
        Ok(seq_id)
    }

    /// Store a sequence under a seq_id assigned elsewhere, registering only the
    /// given aliases.
    ///
    /// Used when merging content from stores that already carry identifiers.
    /// Content is stored upper-cased.
    pub fn add_identified_sequence<I, S>(
        &mut self,
        seq_id: &str,
        sequence: &str,
        aliases: I,
    ) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.insert(seq_id, sequence, aliases)?;
        Ok(())
    }

    /// Register one more alias for an already stored sequence.
    pub fn add_alias(&mut self, seq_id: &str, alias: &str) -> Result<()> {
        if !self.seqinfo.contains_key(seq_id) {
            return Err(SeqRepoError::NotFound(seq_id.to_string()));
        }
        let (namespace, alias) = coerce_namespace(alias)?;
        self.aliases.add(&namespace, &alias, seq_id);
        Ok(())
    }

    /// Returns true when the content was not stored before.
    fn insert<I, S>(&mut self, seq_id: &str, sequence: &str, aliases: I) -> Result<bool>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if !sequence.is_ascii() {
            return Err(SeqRepoError::InvalidSequence(
                sequence.chars().take(20).collect(),
            ));
        }
        let sequence = sequence.to_ascii_uppercase();
        let qualified = aliases
            .into_iter()
            .map(|alias| coerce_namespace(alias.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        let is_new = !self.seqinfo.contains_key(seq_id);
        if is_new {
            self.seqinfo.insert(
                seq_id.to_string(),
                SeqInfo {
                    seq_id: seq_id.to_string(),
                    length: sequence.len(),
                    alphabet: alphabet_of(&sequence),
                    added: Utc::now(),
                },
            );
            self.data
                .insert(seq_id.to_string(), SequenceData::InMemory(sequence.clone()));
            debug!("Stored new sequence {} ({} residues)", seq_id, sequence.len());
        }
        for (namespace, alias) in qualified {
            self.aliases.add(&namespace, &alias, seq_id);
        }
        Ok(is_new)
    }

    /// Import every record of a (possibly gzipped) FASTA file, registering each
    /// record id as an alias in `namespace`.
    ///
    /// # Returns
    /// the number of records imported
    pub fn add_from_fasta<P: AsRef<Path>>(
        &mut self,
        path: P,
        namespace: &str,
    ) -> anyhow::Result<usize> {
        let path = path.as_ref();
        info!("Importing sequences from {} into namespace {}", path.display(), namespace);
        let mut reader = Reader::new(get_dynamic_reader(path)?);
        let mut count = 0;
        while let Some(record) = reader.next() {
            let record =
                record.with_context(|| format!("Failed to parse FASTA: {}", path.display()))?;
            let id = record
                .id()
                .with_context(|| {
                    format!("FASTA record id is not valid UTF-8 in {}", path.display())
                })?
                .to_string();
            let seq = record.full_seq();
            let sequence = std::str::from_utf8(&seq)
                .with_context(|| format!("Sequence {} is not valid UTF-8", id))?;
            self.add_sequence(sequence, [format!("{}:{}", namespace, id)])?;
            count += 1;
        }
        if count == 0 {
            return Err(anyhow!("No FASTA records found in {}", path.display()));
        }
        Ok(count)
    }

    /// Forward alias lookup within a namespace.
    pub fn find_alias(&self, namespace: &str, alias: &str) -> Option<&str> {
        self.aliases.resolve(namespace, alias)
    }

    pub fn fetch_seqinfo(&self, seq_id: &str) -> Result<&SeqInfo> {
        self.seqinfo
            .get(seq_id)
            .ok_or_else(|| SeqRepoError::NotFound(seq_id.to_string()))
    }

    /// Every (namespace, alias) pair of a stored sequence, sorted.
    pub fn fetch_aliases(&self, seq_id: &str) -> Vec<(String, String)> {
        self.aliases.aliases_for(seq_id)
    }

    /// Resolve an identifier to a seq_id.
    ///
    /// Qualified identifiers are looked up in their namespace. Bare identifiers
    /// are looked up in every namespace and must name exactly one sequence.
    pub fn resolve(&self, identifier: &str) -> Result<&str> {
        match split_identifier(identifier) {
            Some((namespace, alias)) => self
                .find_alias(namespace, alias)
                .ok_or_else(|| SeqRepoError::NotFound(identifier.to_string())),
            None => match self.aliases.resolve_any(identifier).as_slice() {
                [] => Err(SeqRepoError::NotFound(identifier.to_string())),
                [seq_id] => Ok(*seq_id),
                _ => Err(SeqRepoError::AmbiguousAlias(identifier.to_string())),
            },
        }
    }

    /// Fetch a sequence or the half-open `[start, end)` subsequence of it.
    ///
    /// `start` defaults to 0 and `end` to the sequence length. Both are clamped
    /// to the sequence; `start > end` yields an empty string.
    pub fn fetch(
        &self,
        identifier: &str,
        start: Option<usize>,
        end: Option<usize>,
    ) -> Result<String> {
        let seq_id = self.resolve(identifier)?;
        let length = self.fetch_seqinfo(seq_id)?.length;
        let (start, end) = clamp_range(start, end, length);
        debug!("Fetching {}[{}..{}] as {}", identifier, start, end, seq_id);
        self.read_range(seq_id, start, end)
    }

    fn read_range(&self, seq_id: &str, start: usize, end: usize) -> Result<String> {
        match self.data.get(seq_id) {
            Some(SequenceData::InMemory(sequence)) => Ok(sequence[start..end].to_string()),
            Some(SequenceData::OnDisk(path)) => {
                let mut file = File::open(path)?;
                file.seek(SeekFrom::Start(start as u64))?;
                let mut buf = String::with_capacity(end - start);
                file.take((end - start) as u64).read_to_string(&mut buf)?;
                Ok(buf)
            }
            None => Err(SeqRepoError::NotFound(seq_id.to_string())),
        }
    }

    /// Open a store previously written with [`SeqRepo::write_to_dir`].
    ///
    /// Sequence info and aliases are loaded eagerly, content is read on demand.
    pub fn open<P: AsRef<Path>>(root: P) -> anyhow::Result<Self> {
        let root = root.as_ref();
        let index_path = root.join(INDEX_FILE);
        let json = fs::read_to_string(&index_path)
            .with_context(|| format!("Failed to read {}", index_path.display()))?;
        let index: StoreIndex = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse {}", index_path.display()))?;
        if index.version != INDEX_VERSION {
            return Err(anyhow!(
                "Unsupported store index version {} in {}",
                index.version,
                index_path.display()
            ));
        }

        let mut store = SeqRepo {
            root: Some(root.to_path_buf()),
            ..Default::default()
        };
        for info in index.sequences {
            let path = root.join(get_sequence_path(&info.seq_id, &index.seqdata_path_template));
            store
                .data
                .insert(info.seq_id.clone(), SequenceData::OnDisk(path));
            store.seqinfo.insert(info.seq_id.clone(), info);
        }
        store.aliases.load_from_dir(&root.join(ALIASES_DIR))?;

        info!(
            "Opened sequence store at {} ({} sequences, {} aliases)",
            root.display(),
            store.len(),
            store.aliases.len()
        );
        Ok(store)
    }

    /// Write the store to a directory: `index.json`, one file per sequence and
    /// one alias TSV per namespace.
    pub fn write_to_dir<P: AsRef<Path>>(&self, root: P) -> anyhow::Result<()> {
        let root = root.as_ref();
        info!("Writing sequence store to {}", root.display());
        create_dir_all(root)?;

        let mut sequences: Vec<SeqInfo> = self.seqinfo.values().cloned().collect();
        sequences.sort_by(|a, b| a.seq_id.cmp(&b.seq_id));

        for info in &sequences {
            let full_path =
                root.join(get_sequence_path(&info.seq_id, DEFAULT_SEQDATA_PATH_TEMPLATE));
            if let Some(parent) = full_path.parent() {
                create_dir_all(parent)?;
            }
            let content = self.read_range(&info.seq_id, 0, info.length)?;
            fs::write(&full_path, content)
                .with_context(|| format!("Failed to write {}", full_path.display()))?;
        }

        self.aliases.write_to_dir(&root.join(ALIASES_DIR))?;

        let index = StoreIndex {
            version: INDEX_VERSION,
            created_at: Utc::now().to_rfc3339(),
            seqdata_path_template: DEFAULT_SEQDATA_PATH_TEMPLATE.to_string(),
            sequences,
        };
        let json = serde_json::to_string_pretty(&index).context("Failed to serialize store index")?;
        fs::write(root.join(INDEX_FILE), json).context("Failed to write index.json")?;
        Ok(())
    }
}

impl Display for SeqRepo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SeqRepo:")?;
        if let Some(root) = &self.root {
            writeln!(f, ">Root: {}", root.display())?;
        }
        writeln!(f, ">Sequences (n={}):", self.seqinfo.len())?;
        for info in self.seqinfo.values().take(10) {
            writeln!(
                f,
                "  - {} ({} residues, alphabet {})",
                info.seq_id, info.length, info.alphabet
            )?;
        }
        write!(f, ">Namespaces: {}", self.aliases.namespaces().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::io::Write;
    use tempfile::tempdir;

    const VHL: &str = "CCTCGCCTCCACGTAC";

    #[fixture]
    fn store() -> SeqRepo {
        let mut store = SeqRepo::in_memory();
        store.add_sequence(VHL, ["refseq:NM_000551.3"]).unwrap();
        store.add_sequence("ACGT", ["refseq:NC_000001.11", "ucsc:chr1"]).unwrap();
        store
    }

    #[rstest]
    fn test_add_sequence_registers_digest_aliases(store: SeqRepo) {
        let seq_id = store.find_alias("refseq", "NM_000551.3").unwrap();
        assert_eq!(seq_id, "kXdgVrRe9HibDFqw4jKjkOqkpjeJ-b3P");
        assert_eq!(
            store.fetch_aliases(seq_id),
            vec![
                ("MD5".to_string(), "7456d1e0831381f04d39d3a5ac2011f3".to_string()),
                ("ga4gh".to_string(), "SQ.kXdgVrRe9HibDFqw4jKjkOqkpjeJ-b3P".to_string()),
                ("refseq".to_string(), "NM_000551.3".to_string()),
            ]
        );
    }

    #[rstest]
    #[case(":local")]
    #[case("ga4gh:")]
    fn test_add_sequence_rejects_empty_alias_parts(#[case] alias: &str) {
        let mut store = SeqRepo::in_memory();
        let err = store.add_sequence("ACGT", [alias]).unwrap_err();
        assert!(matches!(err, SeqRepoError::InvalidIdentifier(_)));
        assert!(store.is_empty());
        assert!(store.aliases().is_empty());
    }

    #[rstest]
    fn test_add_sequence_case_insensitive_content() {
        let mut store = SeqRepo::in_memory();
        let lower = store.add_sequence("acgt", ["x:lower"]).unwrap();
        let upper = store.add_sequence("ACGT", ["x:upper"]).unwrap();
        assert_eq!(lower, upper);
        assert_eq!(store.len(), 1);
        assert_eq!(store.fetch("x:lower", None, None).unwrap(), "ACGT");
        assert_eq!(store.fetch("x:upper", None, None).unwrap(), "ACGT");
        assert_eq!(store.fetch_seqinfo(&lower).unwrap().alphabet, "ACGT");
        assert_eq!(
            store.find_alias("ga4gh", "SQ.aKF498dAxcJAqme6QYQ7EZ07-fiw8Kw2"),
            Some(lower.as_str())
        );
    }

    #[rstest]
    fn test_add_sequence_with_bare_accession() {
        let mut store = SeqRepo::in_memory();
        let seq_id = store.add_sequence("ACGT", ["NM_000551.3"]).unwrap();
        assert_eq!(store.find_alias("refseq", "NM_000551.3"), Some(seq_id.as_str()));

        let err = store.add_sequence("ACGT", ["no-such-id"]).unwrap_err();
        assert!(matches!(err, SeqRepoError::InvalidIdentifier(_)));
    }

    #[rstest]
    fn test_add_sequence_is_idempotent(mut store: SeqRepo) {
        let before = store.fetch_seqinfo("aKF498dAxcJAqme6QYQ7EZ07-fiw8Kw2").unwrap().clone();
        store.add_sequence("ACGT", ["lrg:LRG_1"]).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.fetch_seqinfo(&before.seq_id).unwrap(), &before);
        assert_eq!(store.resolve("lrg:LRG_1").unwrap(), before.seq_id);
    }

    #[rstest]
    fn test_add_identified_sequence() {
        let mut store = SeqRepo::in_memory();
        store
            .add_identified_sequence("custom_id", "ACGT", ["refseq:NM_000551.3"])
            .unwrap();
        assert_eq!(store.resolve("NM_000551.3").unwrap(), "custom_id");
        assert_eq!(
            store.fetch_aliases("custom_id"),
            vec![("refseq".to_string(), "NM_000551.3".to_string())]
        );
    }

    #[rstest]
    fn test_add_alias(mut store: SeqRepo) {
        let seq_id = store.resolve("ucsc:chr1").unwrap().to_string();
        store.add_alias(&seq_id, "ensembl:chr1").unwrap();
        assert_eq!(store.find_alias("ensembl", "chr1"), Some(seq_id.as_str()));
        assert!(matches!(store.add_alias("missing", "x:y"), Err(SeqRepoError::NotFound(_))));
    }

    #[rstest]
    fn test_seqinfo(store: SeqRepo) {
        let info = store.fetch_seqinfo("kXdgVrRe9HibDFqw4jKjkOqkpjeJ-b3P").unwrap();
        assert_eq!(info.length, 16);
        assert_eq!(info.alphabet, "ACGT");
        assert!(info.added_isoformat().ends_with('Z'));
        assert!(matches!(store.fetch_seqinfo("missing"), Err(SeqRepoError::NotFound(_))));
    }

    #[rstest]
    #[case(None, None, VHL)]
    #[case(Some(0), Some(10), "CCTCGCCTCC")]
    #[case(Some(10), None, "ACGTAC")]
    #[case(Some(14), Some(100), "AC")]
    #[case(Some(12), Some(4), "")]
    #[case(Some(100), None, "")]
    fn test_fetch_ranges(
        store: SeqRepo,
        #[case] start: Option<usize>,
        #[case] end: Option<usize>,
        #[case] expected: &str,
    ) {
        assert_eq!(store.fetch("refseq:NM_000551.3", start, end).unwrap(), expected);
    }

    #[rstest]
    fn test_fetch_by_any_alias(store: SeqRepo) {
        assert_eq!(store.fetch("NM_000551.3", Some(0), Some(3)).unwrap(), "CCT");
        assert_eq!(store.fetch("chr1", None, None).unwrap(), "ACGT");
        assert_eq!(
            store.fetch("ga4gh:SQ.aKF498dAxcJAqme6QYQ7EZ07-fiw8Kw2", None, None).unwrap(),
            "ACGT"
        );
    }

    #[rstest]
    fn test_fetch_unknown(store: SeqRepo) {
        assert!(matches!(store.fetch("no-such-id", None, None), Err(SeqRepoError::NotFound(_))));
        assert!(matches!(
            store.fetch("refseq:NM_999999.1", None, None),
            Err(SeqRepoError::NotFound(_))
        ));
        // namespaces are case-sensitive
        assert!(matches!(
            store.fetch("RefSeq:NM_000551.3", None, None),
            Err(SeqRepoError::NotFound(_))
        ));
    }

    #[rstest]
    fn test_fetch_ambiguous_bare_alias(mut store: SeqRepo) {
        store.add_sequence("TTTT", ["other:chr1"]).unwrap();
        let err = store.fetch("chr1", None, None).unwrap_err();
        assert!(matches!(err, SeqRepoError::AmbiguousAlias(_)));
        assert_eq!(store.fetch("ucsc:chr1", None, None).unwrap(), "ACGT");
    }

    #[rstest]
    fn test_rejects_non_ascii_sequence() {
        let mut store = SeqRepo::in_memory();
        let err = store.add_sequence("ACGTé", ["x:y"]).unwrap_err();
        assert!(matches!(err, SeqRepoError::InvalidSequence(_)));
    }

    #[rstest]
    fn test_write_and_open(store: SeqRepo) {
        let dir = tempdir().unwrap();
        store.write_to_dir(dir.path()).unwrap();
        assert!(dir.path().join("index.json").exists());
        assert!(dir.path().join("aliases/refseq.tsv").exists());
        assert!(
            dir.path()
                .join("sequences/kX/kXdgVrRe9HibDFqw4jKjkOqkpjeJ-b3P.seq")
                .exists()
        );

        let opened = SeqRepo::open(dir.path()).unwrap();
        assert_eq!(opened.root(), Some(dir.path()));
        assert_eq!(opened.len(), 2);
        assert_eq!(opened.fetch("refseq:NM_000551.3", Some(4), Some(9)).unwrap(), "GCCTC");
        assert_eq!(opened.fetch("NM_000551.3", None, None).unwrap(), VHL);
        assert_eq!(opened.fetch("ucsc:chr1", Some(2), Some(50)).unwrap(), "GT");

        let seq_id = opened.resolve("refseq:NM_000551.3").unwrap();
        assert_eq!(
            opened.fetch_seqinfo(seq_id).unwrap(),
            store.fetch_seqinfo(seq_id).unwrap()
        );
    }

    #[rstest]
    fn test_open_missing_store() {
        let dir = tempdir().unwrap();
        assert!(SeqRepo::open(dir.path()).is_err());
    }

    #[rstest]
    fn test_add_from_fasta() {
        let dir = tempdir().unwrap();
        let fasta_path = dir.path().join("test.fa");
        let mut file = File::create(&fasta_path).unwrap();
        writeln!(file, ">seq1 first sequence").unwrap();
        writeln!(file, "ACGTACGT").unwrap();
        writeln!(file, "ACGT").unwrap();
        writeln!(file, ">seq2").unwrap();
        writeln!(file, "TTGGCCAA").unwrap();
        drop(file);

        let mut store = SeqRepo::in_memory();
        assert_eq!(store.add_from_fasta(&fasta_path, "test").unwrap(), 2);
        assert_eq!(store.fetch("test:seq1", None, None).unwrap(), "ACGTACGTACGT");
        assert_eq!(
            store.find_alias("test", "seq2"),
            Some("bRJ5lza0aibzV3lBDrV-H0gpSRAfd7lY")
        );
    }

    #[rstest]
    fn test_add_from_empty_fasta() {
        let dir = tempdir().unwrap();
        let fasta_path = dir.path().join("empty.fa");
        File::create(&fasta_path).unwrap();
        let mut store = SeqRepo::in_memory();
        assert!(store.add_from_fasta(&fasta_path, "test").is_err());
    }
}
