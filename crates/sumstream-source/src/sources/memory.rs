use bytes::Bytes;

use crate::Source;

/// Source over an immutable in-memory buffer.
#[derive(Debug, Clone)]
pub struct MemorySource {
    data:     Bytes,
    position: u64,
    closed:   bool,
}

impl MemorySource {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            position: 0,
            closed: false,
        }
    }

    fn len(&self) -> u64 { self.data.len() as u64 }
}

impl Source for MemorySource {
    fn size(&self) -> Option<u64> { Some(self.len()) }

    fn tell(&self) -> u64 { self.position }

    fn seek(&mut self, position: u64) -> bool {
        if self.closed || position >= self.len() {
            return false;
        }
        self.position = position;
        true
    }

    fn eof(&self) -> bool { self.position == self.len() }

    fn read(&mut self, amount: usize) -> Option<Bytes> {
        if self.closed || amount == 0 || self.eof() {
            return None;
        }

        // Cursor is always <= len, which fits in usize.
        let start = self.position as usize;
        let end = start.saturating_add(amount).min(self.data.len());
        let chunk = self.data.slice(start..end);
        self.position += chunk.len() as u64;
        Some(chunk)
    }

    fn close(&mut self) { self.closed = true; }
}
