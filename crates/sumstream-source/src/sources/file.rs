use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tracing::{debug, warn};

use crate::{Result, Source};

/// Source over a local file.
///
/// The file is opened on construction and its size probed once by seeking to
/// the end and back. Reads are blocking and follow the OS file position.
/// Dropping the source closes the handle.
#[derive(Debug)]
pub struct FileSource {
    path:     PathBuf,
    file:     Option<File>,
    size:     u64,
    position: u64,
}

impl FileSource {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let mut file = File::open(&path)?;

        let current = file.stream_position()?;
        let size = file.seek(SeekFrom::End(0))?;
        let position = file.seek(SeekFrom::Start(current))?;

        debug!(path = %path.display(), size, "opened file source");

        Ok(Self {
            path,
            file: Some(file),
            size,
            position,
        })
    }

    pub fn path(&self) -> &Path { &self.path }

    pub fn is_closed(&self) -> bool { self.file.is_none() }
}

impl Source for FileSource {
    fn size(&self) -> Option<u64> { Some(self.size) }

    fn tell(&self) -> u64 { self.position }

    fn seek(&mut self, position: u64) -> bool {
        if position >= self.size {
            return false;
        }
        let Some(file) = self.file.as_mut() else {
            return false;
        };

        match file.seek(SeekFrom::Start(position)) {
            Ok(actual) => {
                self.position = actual;
                true
            }
            Err(err) => {
                warn!(path = %self.path.display(), position, %err, "file seek failed");
                false
            }
        }
    }

    fn eof(&self) -> bool { self.position == self.size }

    fn read(&mut self, amount: usize) -> Option<Bytes> {
        if amount == 0 {
            return None;
        }
        let file = self.file.as_mut()?;

        let mut buf = Vec::with_capacity(amount.min(self.size.saturating_sub(self.position) as usize));
        match file.by_ref().take(amount as u64).read_to_end(&mut buf) {
            Ok(_) => {}
            Err(err) => {
                // Bytes read before the error are still returned; the caller
                // sees a short read.
                warn!(path = %self.path.display(), position = self.position, %err, "file read failed");
            }
        }

        self.position += buf.len() as u64;
        if buf.is_empty() {
            None
        } else {
            Some(Bytes::from(buf))
        }
    }

    fn close(&mut self) {
        if self.file.take().is_some() {
            debug!(path = %self.path.display(), "closed file source");
        }
    }
}

impl Drop for FileSource {
    fn drop(&mut self) { self.close(); }
}
