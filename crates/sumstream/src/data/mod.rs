//! Configuration, progress and result types.

pub mod chunksize;
pub mod config;
pub mod options;
pub mod progress;
pub mod result;

pub use chunksize::Chunksize;
pub use config::ChecksumConfig;
pub use options::{BatchOptions, ChecksumOptions, ProgressCallback};
pub use progress::{Progress, ProgressSnapshot};
pub use result::ChecksumResult;
