use anyhow::{Context, Result};
use memmap2::Mmap;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

use crate::engine::{FuzzyHasher, HashOptions};

#[derive(Debug, Clone)]
pub struct FileEntry {
    /// Path relative to the walk root, with forward slashes.
    pub relative_path: String,
    pub full_path: PathBuf,
}

/// Fingerprint plus exact-identity data for one file.
#[derive(Debug, Clone)]
pub struct FileDigest {
    pub size: u64,
    pub fingerprint: String,
    pub blake3: [u8; 32],
}

/// Walk a directory tree and collect every regular file below it.
/// Entries that cannot be read are logged and skipped.
pub fn walk_files(root: &Path) -> Result<Vec<FileEntry>> {
    let root = root
        .canonicalize()
        .with_context(|| format!("Failed to canonicalize path: {}", root.display()))?;

    let mut entries = Vec::new();

    for entry in WalkDir::new(&root).min_depth(1).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "skipping unreadable directory entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let full_path = entry.path().to_path_buf();
        let relative = full_path
            .strip_prefix(&root)
            .with_context(|| "Failed to compute relative path")?;
        let relative_path = relative.to_string_lossy().replace('\\', "/");

        entries.push(FileEntry {
            relative_path,
            full_path,
        });
    }

    Ok(entries)
}

/// Expand files and directories into a flat list of files to hash.
pub fn collect_files(paths: &[PathBuf]) -> Result<Vec<FileEntry>> {
    let mut targets = Vec::new();
    for path in paths {
        if path.is_dir() {
            for mut entry in walk_files(path)? {
                entry.relative_path = path.join(&entry.relative_path).to_string_lossy().replace('\\', "/");
                targets.push(entry);
            }
        } else {
            anyhow::ensure!(path.exists(), "No such file: {}", path.display());
            targets.push(FileEntry {
                relative_path: path.to_string_lossy().replace('\\', "/"),
                full_path: path.clone(),
            });
        }
    }
    Ok(targets)
}

/// Memory-map a file for read-only access.
///
/// # Safety
/// The mapping is read-only. Callers must not concurrently truncate or replace
/// the underlying file while the `Mmap` is live.
pub fn mmap_file(path: &Path) -> Result<Mmap> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open file: {}", path.display()))?;
    // SAFETY: We only read from this mapping; no concurrent modification of these files.
    unsafe {
        Mmap::map(&file)
            .with_context(|| format!("Failed to memory-map file: {}", path.display()))
    }
}

/// Compute the BLAKE3 hash of a byte slice.
pub fn blake3_bytes(data: &[u8]) -> [u8; 32] {
    *blake3::hash(data).as_bytes()
}

/// Fuzzy hash and BLAKE3 of a file in one pass over a memory mapping.
pub fn digest_file(path: &Path, options: HashOptions) -> Result<FileDigest> {
    let len = std::fs::metadata(path)
        .with_context(|| format!("Failed to read metadata: {}", path.display()))?
        .len();

    // Zero-length files cannot be mapped on every platform.
    let mapped;
    let data: &[u8] = if len == 0 {
        &[]
    } else {
        mapped = mmap_file(path)?;
        &mapped
    };

    let mut hasher = FuzzyHasher::with_options(options);
    hasher.update(data);
    let fingerprint = hasher
        .finish()
        .with_context(|| format!("Failed to fingerprint: {}", path.display()))?;

    Ok(FileDigest {
        size: data.len() as u64,
        fingerprint,
        blake3: blake3_bytes(data),
    })
}

/// Render a path the way ssdeep listings quote file names.
pub fn quote_path(path: &str) -> String {
    format!("\"{}\"", path.replace('"', "\\\""))
}
