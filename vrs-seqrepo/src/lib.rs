//! # Local indexed sequence store
//!
//! This crate provides the sequence store that backs local data proxies:
//!
//! - `namespace` - Inference and coercion of accession namespaces (`NM_000551.3` → `refseq`)
//! - `digest` - Content digests (sha512t24u, md5) and `ga4gh:SQ.` identifiers
//! - `alias` - Namespaced alias index with TSV persistence
//! - `store` - [`SeqRepo`], the store itself: sequence info, aliases and range fetches
//!
//! ```rust
//! use vrs_seqrepo::SeqRepo;
//!
//! let mut store = SeqRepo::in_memory();
//! store.add_sequence("CCTCGCCTCCACGTAC", ["refseq:NM_000551.3"]).unwrap();
//! assert_eq!(store.fetch("NM_000551.3", Some(0), Some(10)).unwrap(), "CCTCGCCTCC");
//! ```

pub mod alias;
pub mod digest;
pub mod errors;
pub mod namespace;
pub mod store;

mod utils;

pub use alias::AliasIndex;
pub use digest::{ga4gh_sequence_identifier, md5, sha512t24u};
pub use errors::SeqRepoError;
pub use namespace::{coerce_namespace, infer_namespace, infer_namespaces};
pub use store::{SeqInfo, SeqRepo};
