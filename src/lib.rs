//! Context-triggered piecewise hashing.
//!
//! Produces ssdeep-compatible fuzzy hashes (`blocksize:part1:part2`) and scores
//! the similarity of two hashes from 0 to 100.
//!
//! ```
//! let a = fuzzdex::hash_bytes(b"a")?;
//! assert_eq!(a, "3:E:E");
//! assert_eq!(fuzzdex::compare(&a, &a)?, 100);
//! # Ok::<(), fuzzdex::FuzzyError>(())
//! ```

pub mod block_hash;
pub mod compare;
pub mod db_format;
pub mod edit_distance;
pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod logging;
pub mod matcher;
pub mod rolling_hash;
pub mod scan;
pub mod util;

use std::path::Path;

pub use compare::{compare, compare_fingerprints};
pub use engine::{FuzzyHasher, HashOptions};
pub use error::{FuzzyError, Result};
pub use fingerprint::Fingerprint;

/// Fuzzy hash of a byte slice with default options.
pub fn hash_bytes(data: &[u8]) -> Result<String> {
    hash_bytes_with(data, HashOptions::default())
}

/// Fuzzy hash of a byte slice.
pub fn hash_bytes_with(data: &[u8], options: HashOptions) -> Result<String> {
    let mut hasher = FuzzyHasher::with_options(options);
    hasher.update(data);
    hasher.finish()
}

/// Fuzzy hash of `data[offset..offset + len]`.
pub fn hash_buffer_range(data: &[u8], offset: usize, len: usize, options: HashOptions) -> Result<String> {
    if offset > data.len() {
        return Err(FuzzyError::InvalidArgument(format!(
            "offset {} is past the end of a {}-byte buffer",
            offset,
            data.len()
        )));
    }
    let end = offset
        .checked_add(len)
        .filter(|&end| end <= data.len())
        .ok_or_else(|| {
            FuzzyError::InvalidArgument(format!(
                "length {} at offset {} exceeds a {}-byte buffer",
                len,
                offset,
                data.len()
            ))
        })?;
    hash_bytes_with(&data[offset..end], options)
}

/// Fuzzy hash of a file's contents, read in a streaming fashion.
pub fn hash_file(path: &Path, options: HashOptions) -> Result<String> {
    let file = std::fs::File::open(path)?;
    let mut reader = std::io::BufReader::with_capacity(256 * 1024, file);
    let mut hasher = FuzzyHasher::with_options(options);
    std::io::copy(&mut reader, &mut hasher)?;
    hasher.finish()
}
