//! Network plumbing consumed by the HTTP range source.

pub mod http;
pub mod mock;
pub mod protocol;
pub mod range;

pub use http::{HttpClient, HttpRequest, HttpResponse};
#[cfg(feature = "reqwest")]
pub use http::ReqwestClient;
pub use mock::{MockError, MockHttpClient, MockResource};
pub use protocol::Protocol;
pub use range::{ContentRange, parse_content_range, range_header};
