//! Namespace inference and coercion for sequence accessions.
//!
//! Identifiers are either namespace-qualified (`refseq:NM_000551.3`) or bare
//! accessions (`NM_000551.3`). Bare accessions are qualified by matching them
//! against the accession patterns of the well-known sequence namespaces.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{Result, SeqRepoError};

/// Accession patterns, paired with the namespace they imply.
static NAMESPACE_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"^ENS[A-Z]*[EGTP]\d{11}(?:\.\d+)?$", "ensembl"),
        (
            r"^([A-Z]\d{5}|[A-Z]{2}\d{6}|[A-Z]{4}\d{8}|[A-J][A-Z]{2}\d{5})(\.\d+)?$",
            "insdc",
        ),
        (
            r"^((AC|AP|NC|NG|NM|NP|NR|NT|NW|WM|XM|XP|XR|YP|ZP)_\d+|NZ_[A-Z]{4}\d+)(\.\d+)?$",
            "refseq",
        ),
        (r"^LRG_\d+", "lrg"),
    ]
    .into_iter()
    .map(|(pattern, namespace)| {
        (
            Regex::new(pattern).expect("namespace patterns are valid regular expressions"),
            namespace,
        )
    })
    .collect()
});

/// Split a qualified identifier on its first `:`.
///
/// Returns `None` for bare accessions.
pub fn split_identifier(identifier: &str) -> Option<(&str, &str)> {
    identifier.split_once(':')
}

/// Every namespace whose accession pattern matches `accession`.
pub fn infer_namespaces(accession: &str) -> Vec<&'static str> {
    NAMESPACE_PATTERNS
        .iter()
        .filter(|(re, _)| re.is_match(accession))
        .map(|(_, namespace)| *namespace)
        .collect()
}

/// The single namespace implied by `accession`, if any.
///
/// # Errors
///
/// [`SeqRepoError::AmbiguousNamespace`] when more than one pattern matches.
pub fn infer_namespace(accession: &str) -> Result<Option<&'static str>> {
    let namespaces = infer_namespaces(accession);
    match namespaces.as_slice() {
        [] => Ok(None),
        [namespace] => Ok(Some(namespace)),
        _ => Err(SeqRepoError::AmbiguousNamespace(accession.to_string())),
    }
}

/// Normalize a possibly-unqualified identifier into a `(namespace, local_id)` pair.
///
/// # Arguments
///
/// - identifier: a qualified identifier or a bare accession
///
/// # Errors
///
/// [`SeqRepoError::InvalidIdentifier`] when either side of a qualified
/// identifier is empty or no namespace can be inferred, and
/// [`SeqRepoError::AmbiguousNamespace`] when several can.
pub fn coerce_namespace(identifier: &str) -> Result<(String, String)> {
    if let Some((namespace, local_id)) = split_identifier(identifier) {
        if namespace.is_empty() || local_id.is_empty() {
            return Err(SeqRepoError::InvalidIdentifier(identifier.to_string()));
        }
        return Ok((namespace.to_string(), local_id.to_string()));
    }
    match infer_namespace(identifier)? {
        Some(namespace) => Ok((namespace.to_string(), identifier.to_string())),
        None => Err(SeqRepoError::InvalidIdentifier(identifier.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case("NM_000551.3", "refseq")]
    #[case("NC_000019.10", "refseq")]
    #[case("NZ_ABCD12345678", "refseq")]
    #[case("ENST00000256474.3", "ensembl")]
    #[case("ENSMUSG00000017167", "ensembl")]
    #[case("AB123456.1", "insdc")]
    #[case("LRG_199", "lrg")]
    fn test_infer_namespace(#[case] accession: &str, #[case] expected: &str) {
        assert_eq!(infer_namespace(accession).unwrap(), Some(expected));
    }

    #[rstest]
    fn test_infer_namespace_unknown() {
        assert_eq!(infer_namespace("no-such-id").unwrap(), None);
        assert!(infer_namespaces("chr1").is_empty());
    }

    #[rstest]
    fn test_coerce_qualified_identifier() {
        let (ns, id) = coerce_namespace("ga4gh:SQ.v_QTc1p-MUYdgrRv4LMT6ByXIOsdw3C_").unwrap();
        assert_eq!(ns, "ga4gh");
        assert_eq!(id, "SQ.v_QTc1p-MUYdgrRv4LMT6ByXIOsdw3C_");
    }

    #[rstest]
    fn test_coerce_splits_on_first_colon() {
        let (ns, id) = coerce_namespace("custom:a:b").unwrap();
        assert_eq!(ns, "custom");
        assert_eq!(id, "a:b");
    }

    #[rstest]
    fn test_coerce_bare_accession() {
        let (ns, id) = coerce_namespace("NM_000551.3").unwrap();
        assert_eq!(ns, "refseq");
        assert_eq!(id, "NM_000551.3");
    }

    #[rstest]
    #[case("no-such-id")]
    #[case(":NM_000551.3")]
    #[case("refseq:")]
    #[case(":")]
    fn test_coerce_unrecognized(#[case] identifier: &str) {
        let err = coerce_namespace(identifier).unwrap_err();
        assert!(matches!(err, SeqRepoError::InvalidIdentifier(_)));
        assert!(err.is_lookup_failure());
    }
}
