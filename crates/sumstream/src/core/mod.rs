//! The blocking read-and-digest loop.
//!
//! Nothing here spawns or awaits; [`effects`](crate::effects) runs these
//! loops on the runtime's blocking pool.

mod digest;
mod engine;

pub use digest::{digest_bytes, digest_file};
pub use engine::{ChecksumEngine, EngineState};
