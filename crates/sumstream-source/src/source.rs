use bytes::Bytes;

/// A pull-based byte source.
///
/// Sources expose a cursor over an addressable byte range and hand out the
/// next chunk on demand. Every implementation upholds:
///
/// - `0 <= tell() <= size()` once the size is known.
/// - `eof()` is true iff the cursor sits at a known size.
/// - `read` returns `None`, never an empty buffer, when nothing is available.
/// - After [`close`](Source::close) every read fails and every seek is rejected.
pub trait Source: Send {
    /// Total addressable length, `None` while still undiscovered.
    fn size(&self) -> Option<u64>;

    /// Current read cursor.
    fn tell(&self) -> u64;

    /// Moves the cursor without performing any I/O.
    ///
    /// Positions at or beyond a known size are rejected and leave the cursor
    /// where it was.
    fn seek(&mut self, position: u64) -> bool;

    /// True when no further bytes are obtainable without a seek.
    fn eof(&self) -> bool;

    /// Reads up to `amount` bytes at the cursor and advances it by the number
    /// of bytes returned.
    ///
    /// A short read is a valid outcome and signals the end is at or near.
    fn read(&mut self, amount: usize) -> Option<Bytes>;

    /// Releases held resources. Idempotent.
    fn close(&mut self);
}

impl<S: Source + ?Sized> Source for Box<S> {
    fn size(&self) -> Option<u64> { (**self).size() }
    fn tell(&self) -> u64 { (**self).tell() }
    fn seek(&mut self, position: u64) -> bool { (**self).seek(position) }
    fn eof(&self) -> bool { (**self).eof() }
    fn read(&mut self, amount: usize) -> Option<Bytes> { (**self).read(amount) }
    fn close(&mut self) { (**self).close() }
}
