//! Incremental digest primitives for streamed checksum computation.
//!
//! Wraps the MD5 and SHA families behind one algorithm enum and one
//! incremental context, so callers can feed bytes in arbitrary pieces and
//! get the same digest as if the input had been presented at once.
//!
//! # Key Features
//!
//! - **Incremental**: [`DigestContext`] accepts input in chunks of any size
//! - **Idempotent finalize**: a second `finalize` returns the cached digest
//! - **Extensible**: the minimal [`Hasher`] trait admits custom implementations
//!
//! # Example
//!
//! ```
//! use sumstream_verify::{DigestAlgorithm, DigestContext};
//!
//! let mut context = DigestContext::new(DigestAlgorithm::Md5);
//! context.update(b"This is a ");
//! context.update(b"simple string");
//!
//! assert_eq!(
//!     context.hex_digest().as_deref(),
//!     Some("0f13e02ea41fb763b0ad09daa72a4b6e"),
//! );
//! ```

pub use self::algorithm::{DigestAlgorithm, ParseAlgorithmError};
pub use self::context::DigestContext;
pub use self::error::{Result, VerificationError};
pub use self::hasher::{DigestHasher, Hasher};
pub use self::verify::verify_hex;

mod algorithm;
mod context;
mod error;
mod hasher;
mod verify;
