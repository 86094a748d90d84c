//! Chunked large-file store with integrity verification.
//!
//! Splits an oversized artifact into bounded-size chunk files plus a JSON
//! manifest carrying per-chunk and whole-file SHA-256 digests, and
//! reconstructs a verified byte-identical copy from them. All state lives on
//! the filesystem; both operations are synchronous, single-threaded and
//! stream through fixed-size buffers.

pub mod config;
pub mod error;
pub mod hash;
pub mod manifest;
pub mod reconstructor;
pub mod splitter;

pub use config::{DEFAULT_CHUNK_SIZE, SplitOptions};
pub use error::StoreError;
pub use manifest::{ChunkEntry, Manifest};
pub use reconstructor::reconstruct;
pub use splitter::{SplitOutcome, split};
