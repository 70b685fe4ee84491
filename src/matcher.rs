use anyhow::Result;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::compare::compare_fingerprints;
use crate::db_format::SignatureDb;
use crate::fingerprint::Fingerprint;
use crate::util::{self, FileEntry};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// File that was hashed for this run.
    pub target: String,
    /// Path recorded in the signature database.
    pub known: String,
    pub score: u32,
    /// Both files have the same BLAKE3 digest.
    pub identical: bool,
}

/// Hash every target and compare it against every database entry.
/// Returns matches scoring strictly above `threshold`, best first per target.
pub fn match_targets(db: &SignatureDb, targets: &[FileEntry], threshold: u32) -> Vec<Match> {
    // Unparseable entries can only come from a hand-edited database; drop them once up front.
    let known: Vec<(&str, Fingerprint, [u8; 32])> = db
        .entries
        .iter()
        .filter_map(|e| match e.fingerprint.parse::<Fingerprint>() {
            Ok(fp) => Some((e.path.as_str(), fp, e.blake3)),
            Err(err) => {
                warn!(path = %e.path, error = %err, "ignoring malformed database entry");
                None
            }
        })
        .collect();

    targets
        .par_iter()
        .flat_map_iter(|target| {
            let digest = match util::digest_file(&target.full_path, db.options) {
                Ok(digest) => digest,
                Err(err) => {
                    warn!(path = %target.full_path.display(), error = %err, "skipping file");
                    return Vec::new().into_iter();
                }
            };
            let fp: Fingerprint = match digest.fingerprint.parse() {
                Ok(fp) => fp,
                Err(err) => {
                    warn!(path = %target.relative_path, error = %err, "unparseable fingerprint");
                    return Vec::new().into_iter();
                }
            };

            let mut found: Vec<Match> = known
                .iter()
                .filter_map(|(path, known_fp, blake3)| {
                    let identical = *blake3 == digest.blake3;
                    let score = if identical { 100 } else { compare_fingerprints(&fp, known_fp) };
                    (score > threshold).then(|| Match {
                        target: target.relative_path.clone(),
                        known: path.to_string(),
                        score,
                        identical,
                    })
                })
                .collect();
            found.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.known.cmp(&b.known)));
            found.into_iter()
        })
        .collect()
}

/// Load a signature database and match the given paths against it.
pub async fn match_paths(db_path: &Path, paths: Vec<PathBuf>, threshold: u32) -> Result<Vec<Match>> {
    let db_path = db_path.to_path_buf();
    tokio::task::spawn_blocking(move || -> Result<Vec<Match>> {
        let db = SignatureDb::read_from(&db_path)?;
        info!(entries = db.entries.len(), db = %db_path.display(), "loaded signature database");
        let targets = util::collect_files(&paths)?;
        Ok(match_targets(&db, &targets, threshold))
    })
    .await?
}
