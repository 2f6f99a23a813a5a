//! URL scheme classification.

/// Transport a URL subject is served by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    /// `file://` URLs, read from the local filesystem.
    File,
    /// `http://` and `https://` URLs, read through range requests.
    Http,
}

impl Protocol {
    /// Get the string representation of the protocol.
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::File => "file",
            Protocol::Http => "http",
        }
    }

    /// Parse a protocol from a URL scheme.
    pub fn from_scheme(scheme: &str) -> Option<Self> {
        match scheme.to_ascii_lowercase().as_str() {
            "file" => Some(Protocol::File),
            "http" | "https" => Some(Protocol::Http),
            _ => None,
        }
    }
}
