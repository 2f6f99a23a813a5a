use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

/// Maximum number of bytes requested from a source per read.
///
/// # Examples
///
/// ```
/// use sumstream::Chunksize;
///
/// assert_eq!(Chunksize::Normal.bytes(), 256 * 1024);
/// assert_eq!(Chunksize::custom(1).map(|c| c.bytes()), Some(1));
/// assert_eq!(Chunksize::custom(0), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chunksize {
    /// 16 KiB
    Tiny,
    /// 64 KiB
    Small,
    /// 256 KiB
    #[default]
    Normal,
    /// 1 MiB
    Large,
    /// 4 MiB
    Huge,
    Custom(NonZeroUsize),
}

impl Chunksize {
    pub const fn custom(bytes: usize) -> Option<Self> {
        match NonZeroUsize::new(bytes) {
            Some(n) => Some(Chunksize::Custom(n)),
            None => None,
        }
    }

    pub const fn bytes(self) -> usize {
        match self {
            Chunksize::Tiny => 16 * 1024,
            Chunksize::Small => 64 * 1024,
            Chunksize::Normal => 256 * 1024,
            Chunksize::Large => 1024 * 1024,
            Chunksize::Huge => 4 * 1024 * 1024,
            Chunksize::Custom(n) => n.get(),
        }
    }
}
