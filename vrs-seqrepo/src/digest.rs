//! # Content digests for sequences
//!
//! * `sha512t24u` - the GA4GH truncated SHA-512 digest, base64url encoded.
//! * `md5` - the legacy MD5 digest, lowercase hex.
//! * `ga4gh_sequence_identifier` - the `ga4gh:SQ.` identifier derived from `sha512t24u`.
//!
//! All digests are computed over the upper-cased sequence.
//!
//! ```rust
//! use vrs_seqrepo::digest::sha512t24u;
//!
//! let digest = sha512t24u("hello world");
//! ```
use md5::Md5;
use sha2::{Digest, Sha512};

/// Namespace of content-derived identifiers.
pub const GA4GH_NAMESPACE: &str = "ga4gh";

/// Type prefix of GA4GH sequence identifiers.
pub const SEQUENCE_PREFIX: &str = "SQ.";

/// Processes a given string to compute its GA4GH sha512t24u digest.
///
/// # Arguments
///
/// * `string` - The input string to be processed.
///
/// # Returns
///
/// The first 24 bytes of the SHA-512 digest, base64url encoded.
pub fn sha512t24u(string: &str) -> String {
    let mut hasher = Sha512::new();
    for s in string.as_bytes().chunks(800) {
        hasher.update(s.to_ascii_uppercase());
    }
    base64_url::encode(&hasher.finalize()[0..24])
}

/// Process a string to compute its md5 digest
pub fn md5(string: &str) -> String {
    let mut hasher = Md5::new();
    for s in string.as_bytes().chunks(800) {
        hasher.update(s.to_ascii_uppercase());
    }
    format!("{:x}", hasher.finalize())
}

/// The `ga4gh:SQ.<sha512t24u>` identifier for a sequence.
pub fn ga4gh_sequence_identifier(sequence: &str) -> String {
    format!("{}:{}{}", GA4GH_NAMESPACE, SEQUENCE_PREFIX, sha512t24u(sequence))
}
