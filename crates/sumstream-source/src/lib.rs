//! Pull-based byte sources for streaming checksums.
//!
//! A [`Source`] hands out the next chunk of an addressable byte range on
//! demand. Three implementations are provided:
//!
//! - [`MemorySource`]: an immutable in-memory buffer.
//! - [`FileSource`]: a local file.
//! - [`HttpRangeSource`]: a remote resource read with HTTP range requests.
//!
//! A [`Resolver`] turns a [`Subject`] (buffer, text or URL) into the right
//! source. The network is reached only through the [`HttpClient`] trait, so
//! tests can substitute [`MockHttpClient`].
//!
//! ```
//! use sumstream_source::{MemorySource, Source};
//!
//! let mut source = MemorySource::new(&b"hello world"[..]);
//! assert_eq!(source.size(), Some(11));
//! assert_eq!(&source.read(5).unwrap()[..], b"hello");
//! assert_eq!(source.tell(), 5);
//! ```

pub mod error;
pub mod net;
pub mod resolver;
pub mod source;
pub mod sources;
pub mod subject;

pub use error::{Result, SourceError};
pub use net::{
    ContentRange, HttpClient, HttpRequest, HttpResponse, MockError, MockHttpClient, MockResource,
    Protocol, parse_content_range, range_header,
};
#[cfg(feature = "reqwest")]
pub use net::ReqwestClient;
pub use resolver::{Resolver, SourceResolver};
pub use source::Source;
pub use sources::{FileSource, HttpRangeSource, HttpSourceOptions, MemorySource};
pub use subject::Subject;
pub use url::Url;
