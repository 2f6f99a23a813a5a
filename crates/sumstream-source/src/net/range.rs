/// A parsed `Content-Range: bytes <start>-<end>/<total>` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentRange {
    /// First byte offset, inclusive.
    pub start: u64,
    /// Last byte offset, inclusive.
    pub end:   u64,
    /// Complete length of the resource, `None` when the server sent `*`.
    pub total: Option<u64>,
}

impl ContentRange {
    /// Number of bytes the range covers.
    pub fn byte_count(&self) -> u64 { self.end - self.start + 1 }
}

/// Parses a `Content-Range` header value.
///
/// Returns `None` unless the value has the `bytes` unit, numeric bounds with
/// `start <= end`, and a `/total` part that is either numeric or `*`.
///
/// # Examples
///
/// ```
/// use sumstream_source::{ContentRange, parse_content_range};
///
/// assert_eq!(
///     parse_content_range("bytes 0-1023/1024"),
///     Some(ContentRange { start: 0, end: 1023, total: Some(1024) }),
/// );
/// assert_eq!(parse_content_range("bytes 0-1023"), None);
/// ```
pub fn parse_content_range(value: &str) -> Option<ContentRange> {
    let value = value.trim();
    let (unit, rest) = value.split_once(' ')?;
    if !unit.eq_ignore_ascii_case("bytes") {
        return None;
    }

    let (range, total) = rest.trim_start().split_once('/')?;
    let (start, end) = range.split_once('-')?;
    let start = parse_offset(start)?;
    let end = parse_offset(end)?;
    if end < start {
        return None;
    }

    let total = match total {
        "*" => None,
        digits => Some(parse_offset(digits)?),
    };

    Some(ContentRange { start, end, total })
}

/// Builds the `Range` request header value for `[start, start + len)`, or an
/// open-ended range when `len` is `None`.
pub fn range_header(start: u64, len: Option<u64>) -> String {
    match len {
        Some(len) => format!("bytes={}-{}", start, start + len.saturating_sub(1)),
        None => format!("bytes={start}-"),
    }
}

fn parse_offset(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
