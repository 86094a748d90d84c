//! Rebuild and verify an artifact from its manifest and chunk files.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::error::StoreError;
use crate::hash::sha256_hex;
use crate::manifest::Manifest;

/// Reassemble the original artifact next to `manifest_path`.
///
/// Chunks are read strictly in the manifest's recorded order, never by
/// directory listing. Each chunk is verified against its recorded size and
/// digest before its bytes are appended; after the last chunk the whole-file
/// digest is checked against `original_hash`. On any failure the partial
/// output is removed, so an output file only exists if it is byte-identical
/// to the artifact that was split.
pub fn reconstruct(manifest_path: &Path) -> Result<PathBuf, StoreError> {
    let manifest = Manifest::load(manifest_path)?;
    let dir = manifest_path.parent().map(Path::to_path_buf).unwrap_or_default();
    let output_path = dir.join(&manifest.original_filename);

    tracing::info!(
        manifest = %manifest_path.display(),
        output = %output_path.display(),
        chunks = manifest.chunks.len(),
        "reconstructing artifact"
    );

    let result = assemble(&manifest, &dir, &output_path);
    if result.is_err() {
        // never leave a partial or corrupt output behind
        let _ = fs::remove_file(&output_path);
    }
    result?;

    tracing::info!(output = %output_path.display(), "reconstruction verified");
    Ok(output_path)
}

fn assemble(manifest: &Manifest, dir: &Path, output_path: &Path) -> Result<(), StoreError> {
    let mut writer = BufWriter::new(File::create(output_path)?);
    let mut whole_hasher = Sha256::new();

    for entry in &manifest.chunks {
        let chunk_path = dir.join(&entry.filename);
        // the whole chunk is buffered so it can be verified before any of
        // its bytes reach the output
        let data = fs::read(&chunk_path).map_err(|e| StoreError::from_io(e, &chunk_path))?;
        if data.len() as u64 != entry.size {
            return Err(StoreError::Integrity {
                subject: entry.filename.clone(),
                expected: format!("{} bytes", entry.size),
                actual: format!("{} bytes", data.len()),
            });
        }
        let actual = sha256_hex(&data);
        if actual != entry.hash {
            return Err(StoreError::Integrity {
                subject: entry.filename.clone(),
                expected: entry.hash.clone(),
                actual,
            });
        }
        whole_hasher.update(&data);
        writer.write_all(&data)?;
        tracing::debug!(chunk = %entry.filename, size = entry.size, "verified chunk");
    }
    writer.flush()?;

    let actual = hex::encode(whole_hasher.finalize());
    if actual != manifest.original_hash {
        return Err(StoreError::Integrity {
            subject: manifest.original_filename.clone(),
            expected: manifest.original_hash.clone(),
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU64;

    use tempfile::tempdir;

    use crate::config::SplitOptions;
    use crate::splitter::{SplitOutcome, split};

    use super::*;

    fn split_fixture(dir: &Path, data: &[u8], chunk_size: u64) -> PathBuf {
        let input = dir.join("data.bin");
        fs::write(&input, data).unwrap();
        let opts = SplitOptions {
            chunk_size: NonZeroU64::new(chunk_size).unwrap(),
            delete_original: true,
        };
        match split(&input, &opts).unwrap() {
            SplitOutcome::Split { manifest_path, .. } => manifest_path,
            SplitOutcome::NotRequired { .. } => panic!("fixture must be large enough to split"),
        }
    }

    #[test]
    fn test_reconstruct_missing_manifest() {
        let dir = tempdir().unwrap();
        let err = reconstruct(&dir.path().join("absent.manifest.json")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn test_reconstruct_missing_chunk() {
        let dir = tempdir().unwrap();
        let data: Vec<u8> = (0..100u8).collect();
        let manifest_path = split_fixture(dir.path(), &data, 40);

        fs::remove_file(dir.path().join("data.bin.part001")).unwrap();
        let err = reconstruct(&manifest_path).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        // no partial output left behind
        assert!(!dir.path().join("data.bin").exists());
    }

    #[test]
    fn test_reconstruct_rejects_tampered_chunk() {
        let dir = tempdir().unwrap();
        let data: Vec<u8> = (0..100u8).collect();
        let manifest_path = split_fixture(dir.path(), &data, 40);

        let chunk_path = dir.path().join("data.bin.part001");
        let mut chunk = fs::read(&chunk_path).unwrap();
        chunk[3] ^= 0x01;
        fs::write(&chunk_path, &chunk).unwrap();

        let err = reconstruct(&manifest_path).unwrap_err();
        assert!(matches!(err, StoreError::Integrity { .. }));
        assert!(!dir.path().join("data.bin").exists());
    }

    #[test]
    fn test_reconstruct_rejects_truncated_chunk() {
        let dir = tempdir().unwrap();
        let data: Vec<u8> = (0..100u8).collect();
        let manifest_path = split_fixture(dir.path(), &data, 40);

        let chunk_path = dir.path().join("data.bin.part000");
        let chunk = fs::read(&chunk_path).unwrap();
        fs::write(&chunk_path, &chunk[..chunk.len() - 1]).unwrap();

        let err = reconstruct(&manifest_path).unwrap_err();
        assert!(matches!(err, StoreError::Integrity { .. }));
        assert!(!dir.path().join("data.bin").exists());
    }
}
