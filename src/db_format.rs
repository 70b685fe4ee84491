use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

use crate::engine::HashOptions;
use crate::util;

pub const MAGIC: &[u8; 8] = b"FZDXDB01";
pub const FORMAT_VERSION: u32 = 1;

/// On-disk index of fingerprinted files: `MAGIC` followed by a zstd-compressed
/// bincode encoding of this struct.
#[derive(Debug, Serialize, Deserialize)]
pub struct SignatureDb {
    pub version: u32,
    pub options: HashOptions,
    pub entries: Vec<SignatureEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureEntry {
    pub path: String,
    pub size: u64,
    pub fingerprint: String,
    pub blake3: [u8; 32],
}

impl SignatureDb {
    pub fn new(options: HashOptions, entries: Vec<SignatureEntry>) -> Self {
        Self {
            version: FORMAT_VERSION,
            options,
            entries,
        }
    }

    pub fn write_to(&self, output: &Path) -> Result<()> {
        let encoded = bincode::serialize(self).context("Failed to serialize signature database")?;
        let compressed =
            zstd::bulk::compress(&encoded, 3).context("Failed to compress signature database")?;

        let mut file = std::fs::File::create(output)
            .with_context(|| format!("Failed to create output file: {}", output.display()))?;
        file.write_all(MAGIC)?;
        file.write_all(&compressed)?;
        file.flush()?;
        Ok(())
    }

    pub fn read_from(path: &Path) -> Result<Self> {
        let raw = util::mmap_file(path)?;

        if raw.len() < MAGIC.len() || &raw[..MAGIC.len()] != MAGIC {
            bail!("Invalid signature database: missing magic header");
        }

        let decoder =
            zstd::Decoder::new(&raw[MAGIC.len()..]).context("Failed to create zstd decoder")?;
        let db: SignatureDb =
            bincode::deserialize_from(decoder).context("Failed to deserialize signature database")?;

        if db.version != FORMAT_VERSION {
            bail!(
                "Unsupported signature database version: {} (expected {})",
                db.version,
                FORMAT_VERSION
            );
        }

        Ok(db)
    }
}

/// Counts reported after a scan.
pub struct ScanSummary {
    pub files_hashed: usize,
    pub files_skipped: usize,
    pub bytes_hashed: u64,
}
