use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tracing::{debug, trace, warn};

use crate::net::{HttpClient, HttpRequest, HttpResponse, parse_content_range, range_header};
use crate::{Result, Source, SourceError};

/// Request settings shared by the probe and every range read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSourceOptions {
    /// Per-request timeout, enforced by the transport.
    ///
    /// Default: 5s
    pub timeout: Duration,

    /// Extra headers sent with every request.
    ///
    /// Default: empty
    pub headers: Vec<(String, String)>,
}

impl Default for HttpSourceOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            headers: Vec::new(),
        }
    }
}

impl HttpSourceOptions {
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }
}

/// Source over a remote resource addressed with byte-range requests.
///
/// Construction issues a `HEAD` probe that must answer `200`; its
/// `Content-Length`, when present, becomes the size. Otherwise the size is
/// discovered from the first `Content-Range` total, from a short read, or
/// from a `416` answer at the cursor.
///
/// A [`read`](Source::read) performs at most one range request on the
/// runtime behind `handle` and blocks the calling thread on a one-shot
/// channel until it completes. While the size is unknown, requests are
/// open-ended; the part of a response beyond the amount asked for is kept
/// and served by later reads without further requests.
///
/// # Panics
///
/// Construction and reads block the current thread, so they panic when
/// called from inside an asynchronous execution context. Run them on a
/// blocking worker (`spawn_blocking`) or a plain thread.
pub struct HttpRangeSource<C: HttpClient> {
    url:      String,
    client:   Option<Arc<C>>,
    handle:   Handle,
    options:  HttpSourceOptions,
    size:     Option<u64>,
    position: u64,
    /// Bytes already received starting at `position`.
    pending:  Bytes,
}

impl<C: HttpClient> HttpRangeSource<C> {
    pub fn open(
        url: impl Into<String>,
        client: Arc<C>,
        handle: Handle,
        options: HttpSourceOptions,
    ) -> Result<Self> {
        let url = url.into();
        let request = HttpRequest::new(&url, options.timeout).headers(&options.headers);

        let probe = Arc::clone(&client);
        let response = block_on_request(&handle, async move { probe.head(request).await })
            .ok_or(SourceError::Bridge)?
            .map_err(|e| SourceError::Transport(e.to_string()))?;

        if response.status != 200 {
            return Err(SourceError::ProbeFailed {
                url,
                status: response.status,
            });
        }

        let size = response.content_length();
        debug!(%url, ?size, "opened http range source");

        Ok(Self {
            url,
            client: Some(client),
            handle,
            options,
            size,
            position: 0,
            pending: Bytes::new(),
        })
    }

    pub fn url(&self) -> &str { &self.url }

    pub fn is_closed(&self) -> bool { self.client.is_none() }

    fn fetch_range(&self, client: Arc<C>, len: Option<u64>) -> Option<HttpResponse> {
        let request = HttpRequest::new(&self.url, self.options.timeout)
            .headers(&self.options.headers)
            .header("Range", range_header(self.position, len));

        match block_on_request(&self.handle, async move { client.get(request).await }) {
            Some(Ok(response)) => Some(response),
            Some(Err(err)) => {
                warn!(url = %self.url, position = self.position, %err, "range request failed");
                None
            }
            None => {
                warn!(url = %self.url, position = self.position, "range request was dropped");
                None
            }
        }
    }
}

impl<C: HttpClient> Source for HttpRangeSource<C> {
    fn size(&self) -> Option<u64> { self.size }

    fn tell(&self) -> u64 { self.position }

    fn seek(&mut self, position: u64) -> bool {
        if self.is_closed() {
            return false;
        }
        if let Some(size) = self.size
            && position >= size
        {
            return false;
        }
        if position != self.position {
            self.pending.clear();
        }
        self.position = position;
        true
    }

    fn eof(&self) -> bool { self.size == Some(self.position) }

    fn read(&mut self, amount: usize) -> Option<Bytes> {
        if amount == 0 {
            return None;
        }
        let client = Arc::clone(self.client.as_ref()?);

        if !self.pending.is_empty() {
            let chunk = self.pending.split_to(amount.min(self.pending.len()));
            self.position += chunk.len() as u64;
            trace!(url = %self.url, len = chunk.len(), position = self.position, "buffered read");
            return Some(chunk);
        }

        let requested = match self.size {
            Some(size) if self.position >= size => return None,
            Some(size) => Some((amount as u64).min(size - self.position)),
            None => None,
        };

        let response = self.fetch_range(client, requested)?;
        if response.status == 416 && self.size.is_none() {
            debug!(url = %self.url, size = self.position, "unsatisfiable range marks end of resource");
            self.size = Some(self.position);
            return None;
        }
        if response.status != 206 {
            warn!(url = %self.url, status = response.status, "expected partial content");
            return None;
        }
        let Some(range) = response
            .header_value("content-range")
            .and_then(parse_content_range)
        else {
            warn!(url = %self.url, "missing or malformed Content-Range");
            return None;
        };
        if range.start != self.position {
            warn!(url = %self.url, start = range.start, position = self.position, "range does not start at cursor");
            return None;
        }

        let mut body = response.body;
        if body.len() as u64 != range.byte_count() {
            warn!(url = %self.url, len = body.len(), expected = range.byte_count(), "body length disagrees with Content-Range");
            return None;
        }
        let Some(received_end) = self.position.checked_add(body.len() as u64) else {
            warn!(url = %self.url, "range end overflows");
            return None;
        };

        let size_was_known = self.size.is_some();
        if let Some(total) = range.total {
            if self.size != Some(total) {
                debug!(url = %self.url, previous = ?self.size, total, "adopting reported size");
            }
            self.size = Some(total.max(received_end));
        }

        let limit = requested.unwrap_or(amount as u64);
        if !size_was_known && range.total.is_none() && (body.len() as u64) < limit {
            trace!(url = %self.url, size = received_end, "short read marks end of resource");
            self.size = Some(received_end);
        }

        if body.len() as u64 > limit {
            self.pending = body.split_off(limit as usize);
        }
        self.position += body.len() as u64;

        trace!(url = %self.url, len = body.len(), position = self.position, "range read");
        Some(body)
    }

    fn close(&mut self) {
        self.pending.clear();
        if self.client.take().is_some() {
            debug!(url = %self.url, "closed http range source");
        }
    }
}

impl<C: HttpClient> Drop for HttpRangeSource<C> {
    fn drop(&mut self) { self.close(); }
}

impl<C: HttpClient> std::fmt::Debug for HttpRangeSource<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRangeSource")
            .field("url", &self.url)
            .field("size", &self.size)
            .field("position", &self.position)
            .field("pending", &self.pending.len())
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Runs one transport future on `handle` and parks the caller until it
/// signals completion. `None` means the task was dropped before answering.
fn block_on_request<T, F>(handle: &Handle, request: F) -> Option<T>
where
    T: Send + 'static,
    F: Future<Output = T> + Send + 'static,
{
    let (tx, rx) = oneshot::channel();
    handle.spawn(async move {
        let _ = tx.send(request.await);
    });
    rx.blocking_recv().ok()
}
