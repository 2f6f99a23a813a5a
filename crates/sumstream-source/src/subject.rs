use std::fmt;
use std::path::Path;

use bytes::Bytes;
use url::Url;

use crate::{Result, SourceError};

/// What a checksum is computed over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    /// An in-memory buffer.
    Bytes(Bytes),
    /// Text, digested as its UTF-8 encoding.
    Text(String),
    /// A `file`, `http` or `https` URL.
    Url(Url),
}

impl Subject {
    /// Parses `input` as a URL subject.
    pub fn parse_url(input: &str) -> Result<Self> {
        Url::parse(input)
            .map(Subject::Url)
            .map_err(|e| SourceError::InvalidUrl(format!("{input}: {e}")))
    }

    /// Builds a `file://` subject from an absolute path.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        Url::from_file_path(path)
            .map(Subject::Url)
            .map_err(|()| SourceError::InvalidUrl(path.display().to_string()))
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Bytes(data) => write!(f, "<{} bytes>", data.len()),
            Subject::Text(text) => write!(f, "<text, {} bytes>", text.len()),
            Subject::Url(url) => write!(f, "{url}"),
        }
    }
}

impl From<Bytes> for Subject {
    fn from(data: Bytes) -> Self { Subject::Bytes(data) }
}

impl From<Vec<u8>> for Subject {
    fn from(data: Vec<u8>) -> Self { Subject::Bytes(data.into()) }
}

impl From<&'static [u8]> for Subject {
    fn from(data: &'static [u8]) -> Self { Subject::Bytes(Bytes::from_static(data)) }
}

impl From<String> for Subject {
    fn from(text: String) -> Self { Subject::Text(text) }
}

impl From<&str> for Subject {
    fn from(text: &str) -> Self { Subject::Text(text.to_string()) }
}

impl From<Url> for Subject {
    fn from(url: Url) -> Self { Subject::Url(url) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        assert_eq!(Subject::from("abc"), Subject::Text("abc".into()));
        assert_eq!(Subject::from(vec![1u8, 2]), Subject::Bytes(Bytes::from_static(&[1, 2])));
        assert!(matches!(
            Subject::parse_url("https://example.com/a.bin").unwrap(),
            Subject::Url(url) if url.scheme() == "https"
        ));
    }

    #[test]
    fn test_invalid_url() {
        assert!(matches!(
            Subject::parse_url("not a url"),
            Err(SourceError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_relative_path_is_rejected() {
        assert!(Subject::from_path("relative/file.txt").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Subject::from(vec![0u8; 4]).to_string(), "<4 bytes>");
        assert_eq!(
            Subject::parse_url("http://example.com/x").unwrap().to_string(),
            "http://example.com/x"
        );
    }
}
