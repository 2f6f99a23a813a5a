use std::sync::Arc;

use bytes::Bytes;
use tokio::runtime::Handle;
use tracing::debug;

use crate::net::{HttpClient, Protocol};
use crate::sources::{FileSource, HttpRangeSource, HttpSourceOptions, MemorySource};
use crate::{Result, Source, SourceError, Subject};

/// Maps a [`Subject`] to a concrete, ready-to-read [`Source`].
///
/// Resolution may block: opening a remote source performs a metadata probe.
pub trait Resolver: Send + Sync {
    fn resolve(&self, subject: &Subject) -> Result<Box<dyn Source>>;
}

/// Default resolver.
///
/// Buffers and text become [`MemorySource`]s, `file` URLs become
/// [`FileSource`]s and `http`/`https` URLs become [`HttpRangeSource`]s that
/// issue requests through `client` on the runtime behind `handle`.
pub struct SourceResolver<C: HttpClient> {
    client:  Arc<C>,
    handle:  Handle,
    options: HttpSourceOptions,
}

impl<C: HttpClient> SourceResolver<C> {
    pub fn new(client: Arc<C>, handle: Handle) -> Self {
        Self {
            client,
            handle,
            options: HttpSourceOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: HttpSourceOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &HttpSourceOptions { &self.options }
}

impl<C: HttpClient> Resolver for SourceResolver<C> {
    fn resolve(&self, subject: &Subject) -> Result<Box<dyn Source>> {
        match subject {
            Subject::Bytes(data) => Ok(Box::new(MemorySource::new(data.clone()))),
            Subject::Text(text) => Ok(Box::new(MemorySource::new(Bytes::copy_from_slice(
                text.as_bytes(),
            )))),
            Subject::Url(url) => {
                let protocol = Protocol::from_scheme(url.scheme())
                    .ok_or_else(|| SourceError::UnsupportedScheme(url.scheme().to_string()))?;
                debug!(%url, protocol = protocol.as_str(), "resolving subject");

                match protocol {
                    Protocol::File => {
                        let path = url
                            .to_file_path()
                            .map_err(|()| SourceError::InvalidUrl(url.to_string()))?;
                        Ok(Box::new(FileSource::open(path)?))
                    }
                    Protocol::Http => Ok(Box::new(HttpRangeSource::open(
                        url.as_str(),
                        Arc::clone(&self.client),
                        self.handle.clone(),
                        self.options.clone(),
                    )?)),
                }
            }
        }
    }
}
