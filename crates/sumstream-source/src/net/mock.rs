//! In-memory range server for tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use bytes::Bytes;
use thiserror::Error;

use super::http::{HttpClient, HttpRequest, HttpResponse};

/// Transport failure raised by [`MockHttpClient`] for unreachable resources.
#[derive(Debug, Clone, Error)]
#[error("mock transport failure for {0}")]
pub struct MockError(pub String);

/// A resource served by [`MockHttpClient`].
#[derive(Debug, Clone)]
pub struct MockResource {
    data:           Bytes,
    probe_status:   u16,
    content_length: bool,
    range_total:    bool,
    fail_after:     Option<usize>,
    max_chunk:      Option<usize>,
    unreachable:    bool,
}

impl MockResource {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            probe_status: 200,
            content_length: true,
            range_total: true,
            fail_after: None,
            max_chunk: None,
            unreachable: false,
        }
    }

    /// Answers the `HEAD` probe with `status`.
    #[must_use]
    pub fn probe_status(mut self, status: u16) -> Self {
        self.probe_status = status;
        self
    }

    /// Omits `Content-Length` from the probe response.
    #[must_use]
    pub fn hide_length(mut self) -> Self {
        self.content_length = false;
        self
    }

    /// Reports `*` as the `Content-Range` total.
    #[must_use]
    pub fn hide_total(mut self) -> Self {
        self.range_total = false;
        self
    }

    /// Answers `500` to every range request after the first `n`.
    #[must_use]
    pub fn fail_after(mut self, n: usize) -> Self {
        self.fail_after = Some(n);
        self
    }

    /// Caps each range response at `n` bytes regardless of the request.
    #[must_use]
    pub fn max_chunk(mut self, n: usize) -> Self {
        self.max_chunk = Some(n);
        self
    }

    /// Fails every request at the transport level.
    #[must_use]
    pub fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }
}

/// Mock HTTP client serving byte ranges out of memory.
///
/// Unknown URLs answer `404`. Every request is recorded so tests can assert
/// on the exact `Range` headers sent.
#[derive(Debug, Default)]
pub struct MockHttpClient {
    resources:   HashMap<String, MockResource>,
    ranges:      Mutex<Vec<String>>,
    served:      AtomicUsize,
    transferred: AtomicUsize,
}

impl MockHttpClient {
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn with_resource(mut self, url: impl Into<String>, resource: MockResource) -> Self {
        self.resources.insert(url.into(), resource);
        self
    }

    /// `Range` headers received so far, in order.
    pub fn ranges(&self) -> Vec<String> {
        self.ranges
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Number of range requests answered with partial content.
    pub fn served(&self) -> usize { self.served.load(Ordering::SeqCst) }

    /// Body bytes sent in partial content responses.
    pub fn transferred(&self) -> usize { self.transferred.load(Ordering::SeqCst) }

    fn lookup(&self, url: &str) -> Result<Option<&MockResource>, MockError> {
        match self.resources.get(url) {
            Some(resource) if resource.unreachable => Err(MockError(url.to_string())),
            other => Ok(other),
        }
    }

    fn serve_range(&self, resource: &MockResource, range: &str) -> HttpResponse {
        let len = resource.data.len() as u64;
        let Some((start, end)) = parse_range_request(range) else {
            return HttpResponse::new(400);
        };
        if start >= len {
            return HttpResponse::new(416).header("Content-Range", format!("bytes */{len}"));
        }

        let mut end = end.unwrap_or(len - 1).min(len - 1);
        if let Some(cap) = resource.max_chunk {
            end = end.min(start + cap as u64 - 1);
        }

        let total = if resource.range_total {
            len.to_string()
        } else {
            "*".to_string()
        };
        self.served.fetch_add(1, Ordering::SeqCst);
        self.transferred
            .fetch_add((end - start + 1) as usize, Ordering::SeqCst);

        HttpResponse::new(206)
            .header("Content-Range", format!("bytes {start}-{end}/{total}"))
            .header("Content-Length", (end - start + 1).to_string())
            .body(resource.data.slice(start as usize..=end as usize))
    }
}

impl HttpClient for MockHttpClient {
    type Error = MockError;

    async fn head(&self, request: HttpRequest) -> Result<HttpResponse, Self::Error> {
        let Some(resource) = self.lookup(&request.url)? else {
            return Ok(HttpResponse::new(404));
        };

        let mut response = HttpResponse::new(resource.probe_status);
        if resource.content_length {
            response = response.header("Content-Length", resource.data.len().to_string());
        }
        Ok(response)
    }

    async fn get(&self, request: HttpRequest) -> Result<HttpResponse, Self::Error> {
        let Some(resource) = self.lookup(&request.url)? else {
            return Ok(HttpResponse::new(404));
        };

        let Some(range) = request.header_value("range") else {
            return Ok(HttpResponse::new(200).body(resource.data.clone()));
        };
        self.ranges
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(range.to_string());

        if let Some(limit) = resource.fail_after
            && self.served() >= limit
        {
            return Ok(HttpResponse::new(500));
        }

        Ok(self.serve_range(resource, range))
    }
}

fn parse_range_request(value: &str) -> Option<(u64, Option<u64>)> {
    let range = value.trim().strip_prefix("bytes=")?;
    let (start, end) = range.split_once('-')?;
    let start = start.parse().ok()?;
    let end = match end {
        "" => None,
        end => Some(end.parse().ok()?),
    };
    Some((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn request(range: &str) -> HttpRequest {
        HttpRequest::new("mock://a", Duration::from_secs(1)).header("Range", range)
    }

    #[tokio::test]
    async fn test_serves_requested_range() {
        let client = MockHttpClient::new().with_resource("mock://a", MockResource::new("0123456789"));

        let response = client.get(request("bytes=2-5")).await.unwrap();
        assert_eq!(response.status, 206);
        assert_eq!(response.header_value("content-range"), Some("bytes 2-5/10"));
        assert_eq!(&response.body[..], b"2345");

        let response = client.get(request("bytes=8-")).await.unwrap();
        assert_eq!(&response.body[..], b"89");
        assert_eq!(client.ranges(), vec!["bytes=2-5", "bytes=8-"]);
        assert_eq!(client.transferred(), 6);
    }

    #[tokio::test]
    async fn test_unsatisfiable_range() {
        let client = MockHttpClient::new().with_resource("mock://a", MockResource::new("abc"));
        let response = client.get(request("bytes=3-")).await.unwrap();
        assert_eq!(response.status, 416);
    }

    #[tokio::test]
    async fn test_unknown_url_is_not_found() {
        let client = MockHttpClient::new();
        let head = HttpRequest::new("mock://missing", Duration::from_secs(1));
        assert_eq!(client.head(head).await.unwrap().status, 404);
    }

    #[tokio::test]
    async fn test_fail_after() {
        let client =
            MockHttpClient::new().with_resource("mock://a", MockResource::new("abcdef").fail_after(1));
        assert_eq!(client.get(request("bytes=0-1")).await.unwrap().status, 206);
        assert_eq!(client.get(request("bytes=2-3")).await.unwrap().status, 500);
    }
}
