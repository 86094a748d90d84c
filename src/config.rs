use std::num::NonZeroU64;

/// Default chunk size: 90 MiB, leaving margin under the 100 MiB per-file
/// ceiling of static hosting.
pub const DEFAULT_CHUNK_SIZE: NonZeroU64 = NonZeroU64::new(90 * 1024 * 1024).unwrap();

/// Caller-chosen split policy.
#[derive(Debug, Clone)]
pub struct SplitOptions {
    /// Maximum chunk size in bytes. Every chunk except the last is exactly
    /// this size.
    pub chunk_size: NonZeroU64,
    /// Remove the input file after a successful split. Off by default so the
    /// original stays available for local testing.
    pub delete_original: bool,
}

impl Default for SplitOptions {
    fn default() -> Self {
        SplitOptions {
            chunk_size: DEFAULT_CHUNK_SIZE,
            delete_original: false,
        }
    }
}
