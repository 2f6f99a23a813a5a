//! Streaming checksums over memory, local files and HTTP range requests.
//!
//! # Architecture
//!
//! This crate follows the three-layer pattern:
//! - [`data`] - Options, configuration, progress and result types
//! - [`core`] - The blocking read-and-digest engine
//! - [`effects`] - Background execution, batching and callback delivery
//!
//! Sources live in [`sumstream_source`] and digest primitives in
//! [`sumstream_verify`]; the commonly used items of both are re-exported here.
//!
//! # Key Features
//!
//! - **Source-agnostic**: the engine pulls fixed-size chunks from any
//!   [`Source`] until end of input, so chunking never changes a digest
//! - **Lazy remote sizes**: HTTP sources learn their size from the probe, the
//!   first `Content-Range` or the first short read
//! - **Ordered batches**: one completion per batch, results in input order,
//!   aggregate progress with one unit per subject
//!
//! ```
//! use sumstream::{DigestAlgorithm, digest_bytes};
//!
//! let digest = digest_bytes("This is a simple string", DigestAlgorithm::Md5).unwrap();
//! assert_eq!(digest, "0f13e02ea41fb763b0ad09daa72a4b6e");
//! ```

pub mod core;
pub mod data;
pub mod effects;
mod error;

pub use crate::core::{ChecksumEngine, EngineState, digest_bytes, digest_file};
pub use crate::data::{
    BatchOptions, ChecksumConfig, ChecksumOptions, ChecksumResult, Chunksize, Progress,
    ProgressCallback, ProgressSnapshot,
};
pub use crate::effects::{Checksummer, DeliveryQueue};
pub use crate::error::{ChecksumError, Result};

#[cfg(feature = "reqwest")]
pub use sumstream_source::ReqwestClient;
pub use sumstream_source::{
    HttpClient, HttpSourceOptions, Resolver, Source, SourceError, SourceResolver, Subject, Url,
};
pub use sumstream_verify::{DigestAlgorithm, VerificationError};
