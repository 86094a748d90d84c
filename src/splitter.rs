//! Split an oversized artifact into bounded-size chunk files plus a manifest.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::config::SplitOptions;
use crate::error::StoreError;
use crate::hash::IO_BUF_SIZE;
use crate::manifest::{ChunkEntry, Manifest};

/// Result of a split request.
#[derive(Debug)]
pub enum SplitOutcome {
    /// The artifact was split; chunk files and the manifest are on disk.
    Split {
        manifest_path: PathBuf,
        chunk_count: usize,
    },
    /// The artifact fits in a single chunk; nothing was written. Callers must
    /// check for this before assuming chunk files exist.
    NotRequired { size: u64 },
}

/// Split `input` into chunk files next to it and write a manifest.
///
/// The input is streamed once through a fixed-size buffer; per-chunk and
/// whole-file SHA-256 digests are accumulated over the same pass, so peak
/// memory stays bounded regardless of artifact size. The manifest is written
/// only after every chunk write has succeeded.
pub fn split(input: &Path, opts: &SplitOptions) -> Result<SplitOutcome, StoreError> {
    let meta = fs::metadata(input).map_err(|e| StoreError::from_io(e, input))?;
    if !meta.is_file() {
        return Err(StoreError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("{} is not a regular file", input.display()),
        )));
    }

    let chunk_size = opts.chunk_size.get();
    let size = meta.len();
    if size <= chunk_size {
        tracing::info!(
            input = %input.display(),
            size,
            chunk_size,
            "artifact fits in one chunk, no split required"
        );
        return Ok(SplitOutcome::NotRequired { size });
    }

    // metadata() succeeded on a regular file, so a file name exists
    let original = input
        .file_name()
        .ok_or_else(|| StoreError::NotFound(input.to_path_buf()))?
        .to_string_lossy()
        .into_owned();
    let dir = input.parent().map(Path::to_path_buf).unwrap_or_default();

    tracing::info!(input = %input.display(), size, chunk_size, "splitting artifact");

    let mut reader = BufReader::new(File::open(input).map_err(|e| StoreError::from_io(e, input))?);
    let mut whole_hasher = Sha256::new();
    let mut buf = vec![0u8; IO_BUF_SIZE];
    let mut chunks: Vec<ChunkEntry> = Vec::new();

    loop {
        let chunk_name = Manifest::chunk_file_name(&original, chunks.len());
        let chunk_path = dir.join(&chunk_name);
        let mut chunk_hasher = Sha256::new();
        let mut writer = BufWriter::new(File::create(&chunk_path)?);
        let mut written: u64 = 0;

        while written < chunk_size {
            let want = buf.len().min((chunk_size - written) as usize);
            let n = reader.read(&mut buf[..want])?;
            if n == 0 {
                break;
            }
            writer.write_all(&buf[..n])?;
            chunk_hasher.update(&buf[..n]);
            whole_hasher.update(&buf[..n]);
            written += n as u64;
        }
        writer.flush()?;

        if written == 0 {
            // input ended exactly on the previous chunk boundary
            fs::remove_file(&chunk_path)?;
            break;
        }

        tracing::debug!(chunk = %chunk_name, size = written, "wrote chunk");
        chunks.push(ChunkEntry {
            filename: chunk_name,
            size: written,
            hash: hex::encode(chunk_hasher.finalize()),
        });
        if written < chunk_size {
            break;
        }
    }

    let total: u64 = chunks.iter().map(|c| c.size).sum();
    if total != size {
        // the artifact changed underneath us mid-read
        return Err(StoreError::Io(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            format!(
                "read {total} bytes from {} but its size was {size}",
                input.display()
            ),
        )));
    }

    let manifest = Manifest {
        original_filename: original.clone(),
        original_size: size,
        original_hash: hex::encode(whole_hasher.finalize()),
        chunk_size,
        chunks,
    };
    let manifest_path = dir.join(Manifest::file_name_for(&original));
    manifest.save(&manifest_path)?;

    tracing::info!(
        manifest = %manifest_path.display(),
        chunks = manifest.chunks.len(),
        "split complete"
    );

    if opts.delete_original {
        fs::remove_file(input)?;
        tracing::info!(input = %input.display(), "removed original after split");
    }

    Ok(SplitOutcome::Split {
        manifest_path,
        chunk_count: manifest.chunks.len(),
    })
}
