use anyhow::Result;
use rayon::prelude::*;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::db_format::{ScanSummary, SignatureDb, SignatureEntry};
use crate::engine::HashOptions;
use crate::util::{self, FileEntry};

/// Fingerprint every file in `entries` in parallel.
/// Files that fail to read are logged and left out of the result.
pub fn fingerprint_entries(entries: &[FileEntry], options: HashOptions) -> (Vec<SignatureEntry>, usize) {
    let results: Vec<Option<SignatureEntry>> = entries
        .par_iter()
        .map(|entry| match util::digest_file(&entry.full_path, options) {
            Ok(digest) => {
                debug!(path = %entry.relative_path, fingerprint = %digest.fingerprint, "hashed");
                Some(SignatureEntry {
                    path: entry.relative_path.clone(),
                    size: digest.size,
                    fingerprint: digest.fingerprint,
                    blake3: digest.blake3,
                })
            }
            Err(err) => {
                warn!(path = %entry.full_path.display(), error = %err, "skipping file");
                None
            }
        })
        .collect();

    let skipped = results.iter().filter(|r| r.is_none()).count();
    (results.into_iter().flatten().collect(), skipped)
}

/// Build a signature database for every file below `dir` and write it to `output`.
/// Uses Tokio to keep the directory walk off the async runtime and Rayon for hashing.
pub async fn scan_directory(dir: &Path, output: &Path, options: HashOptions) -> Result<ScanSummary> {
    let dir_owned = dir.to_path_buf();
    let entries = tokio::task::spawn_blocking(move || util::walk_files(&dir_owned)).await??;
    info!(files = entries.len(), dir = %dir.display(), "walked directory");

    let (signatures, files_skipped) =
        tokio::task::spawn_blocking(move || fingerprint_entries(&entries, options)).await?;

    let summary = ScanSummary {
        files_hashed: signatures.len(),
        files_skipped,
        bytes_hashed: signatures.iter().map(|s| s.size).sum(),
    };

    let db = SignatureDb::new(options, signatures);
    db.write_to(output)?;

    Ok(summary)
}
