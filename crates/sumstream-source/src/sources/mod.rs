//! Concrete [`Source`](crate::Source) implementations.

mod file;
mod http;
mod memory;

pub use file::FileSource;
pub use http::{HttpRangeSource, HttpSourceOptions};
pub use memory::MemorySource;
