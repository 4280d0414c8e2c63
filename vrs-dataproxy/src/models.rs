use serde::{Deserialize, Serialize};

/// Metadata record for one sequence.
///
/// This is both the value returned by [`crate::DataProxy::get_metadata`] and
/// the JSON body served by the REST `metadata` endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SequenceMetadata {
    /// Total sequence length in residues.
    pub length: usize,
    pub alphabet: String,
    /// ISO-8601 timestamp of when the backend first stored the sequence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added: Option<String>,
    /// Namespace-qualified identifiers of the sequence, in backend order.
    pub aliases: Vec<String>,
}

impl SequenceMetadata {
    /// Aliases in `namespace`, matched on the `"<namespace>:"` prefix.
    pub fn aliases_in<'a>(&'a self, namespace: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.aliases
            .iter()
            .map(String::as_str)
            .filter(move |alias| {
                alias
                    .strip_prefix(namespace)
                    .is_some_and(|rest| rest.starts_with(':'))
            })
    }
}
