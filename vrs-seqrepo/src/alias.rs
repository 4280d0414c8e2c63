//! Namespaced alias index for stored sequences.
//!
//! Each alias lives in a namespace (e.g. "refseq", "ga4gh") and maps to the
//! `seq_id` of one stored sequence. The index supports forward lookup within a
//! namespace, forward lookup across all namespaces, reverse lookup and
//! TSV persistence (one `<namespace>.tsv` file per namespace).

use std::collections::{BTreeSet, HashMap};
use std::fs::{self, File, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use anyhow::{Context, Result};
use log::warn;

/// namespace → { alias → seq_id }
type AliasStore = HashMap<String, HashMap<String, String>>;

#[derive(Debug, Default, Clone)]
pub struct AliasIndex {
    aliases: AliasStore,
}

impl AliasIndex {
    /// Create a new, empty AliasIndex.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of (namespace, alias) entries.
    pub fn len(&self) -> usize {
        self.aliases.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// Add an alias: namespace/alias → seq_id. Re-adding replaces the target.
    pub fn add(&mut self, namespace: &str, alias: &str, seq_id: &str) {
        self.aliases
            .entry(namespace.to_string())
            .or_default()
            .insert(alias.to_string(), seq_id.to_string());
    }

    /// Forward lookup within one namespace. Namespaces are case-sensitive.
    pub fn resolve(&self, namespace: &str, alias: &str) -> Option<&str> {
        self.aliases
            .get(namespace)
            .and_then(|ns| ns.get(alias))
            .map(String::as_str)
    }

    /// Forward lookup across every namespace.
    ///
    /// Returns the distinct seq_ids the alias points to, sorted.
    pub fn resolve_any(&self, alias: &str) -> Vec<&str> {
        let seq_ids: BTreeSet<&str> = self
            .aliases
            .values()
            .filter_map(|ns| ns.get(alias))
            .map(String::as_str)
            .collect();
        seq_ids.into_iter().collect()
    }

    /// Reverse lookup: every (namespace, alias) pair pointing at `seq_id`, sorted.
    pub fn aliases_for(&self, seq_id: &str) -> Vec<(String, String)> {
        let mut results: Vec<(String, String)> = self
            .aliases
            .iter()
            .flat_map(|(namespace, aliases)| {
                aliases
                    .iter()
                    .filter(move |(_, target)| target.as_str() == seq_id)
                    .map(move |(alias, _)| (namespace.clone(), alias.clone()))
            })
            .collect();
        results.sort();
        results
    }

    /// List all namespaces, sorted.
    pub fn namespaces(&self) -> Vec<String> {
        let mut namespaces: Vec<String> = self.aliases.keys().cloned().collect();
        namespaces.sort();
        namespaces
    }

    /// Load aliases from a TSV file into a namespace.
    /// Format: alias\tseq_id per line. Lines starting with '#' are comments.
    pub fn load_tsv(&mut self, namespace: &str, path: &Path) -> Result<usize> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open alias file: {}", path.display()))?;
        let reader = BufReader::new(file);
        let mut count = 0;
        for (line_num, line) in reader.lines().enumerate() {
            let line = line?;
            if line.starts_with('#') || line.trim().is_empty() {
                continue;
            }
            match line.split_once('\t') {
                Some((alias, seq_id)) => {
                    self.add(namespace, alias, seq_id);
                    count += 1;
                }
                None => warn!(
                    "Skipping malformed alias line {} in {}",
                    line_num + 1,
                    path.display()
                ),
            }
        }
        Ok(count)
    }

    /// Load every `<namespace>.tsv` file in a directory. A missing directory is not an error.
    pub fn load_from_dir(&mut self, dir: &Path) -> Result<()> {
        if !dir.exists() {
            return Ok(());
        }
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("tsv") {
                let namespace = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .context("Invalid alias filename")?
                    .to_string();
                self.load_tsv(&namespace, &path)?;
            }
        }
        Ok(())
    }

    /// Write one TSV file per namespace into `dir`.
    pub fn write_to_dir(&self, dir: &Path) -> Result<()> {
        create_dir_all(dir)?;
        for (namespace, aliases) in &self.aliases {
            let tsv_path = dir.join(format!("{}.tsv", namespace));
            let mut file = File::create(&tsv_path)
                .with_context(|| format!("Failed to create alias file: {}", tsv_path.display()))?;
            writeln!(file, "#alias\tseq_id")?;
            let mut sorted: Vec<_> = aliases.iter().collect();
            sorted.sort();
            for (alias, seq_id) in sorted {
                writeln!(file, "{}\t{}", alias, seq_id)?;
            }
        }
        Ok(())
    }
}
