//! # Sequence data proxies
//!
//! Uniform access to reference sequences and their metadata, whatever the
//! backend: a local [`vrs_seqrepo::SeqRepo`] store or a remote SeqRepo REST
//! service.
//!
//! - [`DataProxy`] is the contract every backend implements.
//! - [`CachingDataProxy`] wraps a backend and memoizes identifier translation.
//! - [`SequenceProxy`] gives length-aware, lazy access to one sequence.
//! - [`create_dataproxy`] builds a backend from a URI such as
//!   `seqrepo+file:///usr/local/share/seqrepo/latest`.
//!
//! ```rust
//! use vrs_dataproxy::{CachingDataProxy, DataProxy, SeqRepoDataProxy};
//! use vrs_seqrepo::SeqRepo;
//!
//! let mut sr = SeqRepo::in_memory();
//! sr.add_sequence("CCTCGCCTCCACGTAC", ["refseq:NM_000551.3"]).unwrap();
//!
//! let dp = CachingDataProxy::new(SeqRepoDataProxy::new(&sr));
//! assert_eq!(dp.get_sequence("NM_000551.3", Some(0), Some(5)).unwrap(), "CCTCG");
//! assert_eq!(
//!     dp.translate_sequence_identifier("NM_000551.3", Some("ga4gh")).unwrap(),
//!     vec!["ga4gh:SQ.kXdgVrRe9HibDFqw4jKjkOqkpjeJ-b3P"]
//! );
//! ```
pub mod consts;
pub mod errors;
pub mod factory;
pub mod models;
pub mod proxy;
pub mod rest;
pub mod seqrepo;
pub mod sequence;

pub use errors::DataProxyError;
pub use factory::{BoxedDataProxy, DataProxyUri, create_dataproxy};
pub use models::SequenceMetadata;
pub use proxy::{CachingDataProxy, DataProxy};
pub use rest::{SeqRepoRestDataProxy, SeqRepoRestDataProxyBuilder};
pub use seqrepo::SeqRepoDataProxy;
pub use sequence::SequenceProxy;
