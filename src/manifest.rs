//! Manifest schema and validation.
//!
//! The manifest is the single source of truth for how an artifact decomposes
//! into chunks. It is written once by the splitter and read-only thereafter;
//! the order of `chunks` is the reconstruction order.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::hash::is_sha256_hex;

/// One chunk of an artifact: its file name (relative to the manifest),
/// byte length and SHA-256 digest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkEntry {
    pub filename: String,
    pub size: u64,
    pub hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub original_filename: String,
    pub original_size: u64,
    pub original_hash: String,
    pub chunk_size: u64,
    pub chunks: Vec<ChunkEntry>,
}

impl Manifest {
    /// Manifest file name for an artifact, e.g. `model.onnx.manifest.json`.
    pub fn file_name_for(original: &str) -> String {
        format!("{original}.manifest.json")
    }

    /// Chunk file name for an artifact, e.g. `model.onnx.part007`.
    /// The fixed-width suffix keeps lexicographic order equal to
    /// reconstruction order.
    pub fn chunk_file_name(original: &str, index: usize) -> String {
        format!("{original}.part{index:03}")
    }

    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let raw = fs::read_to_string(path).map_err(|e| StoreError::from_io(e, path))?;
        let manifest: Manifest = serde_json::from_str(&raw)
            .map_err(|e| StoreError::InvalidManifest(format!("{}: {e}", path.display())))?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Write the manifest as pretty-printed JSON. Only called after every
    /// chunk write has succeeded.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let raw = serde_json::to_string_pretty(self)
            .map_err(|e| StoreError::InvalidManifest(e.to_string()))?;
        fs::write(path, raw)?;
        Ok(())
    }

    /// Check internal consistency before any chunk file is touched.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.original_filename.is_empty()
            || self.original_filename.contains('/')
            || self.original_filename.contains('\\')
        {
            return Err(StoreError::InvalidManifest(format!(
                "original_filename `{}` is not a bare file name",
                self.original_filename
            )));
        }
        if self.chunk_size == 0 {
            return Err(StoreError::InvalidManifest("chunk_size is zero".to_string()));
        }
        if self.chunks.is_empty() {
            return Err(StoreError::InvalidManifest("chunk list is empty".to_string()));
        }
        if !is_sha256_hex(&self.original_hash) {
            return Err(StoreError::InvalidManifest(format!(
                "original_hash `{}` is not a sha256 digest",
                self.original_hash
            )));
        }

        let last = self.chunks.len() - 1;
        let mut total: u64 = 0;
        for (i, chunk) in self.chunks.iter().enumerate() {
            if chunk.filename.is_empty()
                || chunk.filename.contains('/')
                || chunk.filename.contains('\\')
            {
                return Err(StoreError::InvalidManifest(format!(
                    "chunk {i} filename `{}` is not a bare file name",
                    chunk.filename
                )));
            }
            if !is_sha256_hex(&chunk.hash) {
                return Err(StoreError::InvalidManifest(format!(
                    "chunk {i} hash `{}` is not a sha256 digest",
                    chunk.hash
                )));
            }
            // every chunk but the last is exactly chunk_size
            if i != last && chunk.size != self.chunk_size {
                return Err(StoreError::InvalidManifest(format!(
                    "chunk {i} has size {} but chunk_size is {}",
                    chunk.size, self.chunk_size
                )));
            }
            if i == last && (chunk.size == 0 || chunk.size > self.chunk_size) {
                return Err(StoreError::InvalidManifest(format!(
                    "final chunk has size {} with chunk_size {}",
                    chunk.size, self.chunk_size
                )));
            }
            total = total.checked_add(chunk.size).ok_or_else(|| {
                StoreError::InvalidManifest("chunk sizes overflow u64".to_string())
            })?;
        }
        if total != self.original_size {
            return Err(StoreError::InvalidManifest(format!(
                "chunk sizes sum to {total} but original_size is {}",
                self.original_size
            )));
        }
        Ok(())
    }
}
