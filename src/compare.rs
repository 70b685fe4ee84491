//! Similarity scoring between two fingerprints.

use crate::edit_distance::{edit_distance, has_common_substring};
use crate::error::Result;
use crate::fingerprint::{Fingerprint, MIN_BLOCKSIZE, SPAMSUM_LENGTH};
use crate::rolling_hash::ROLLING_WINDOW;

/// Block sizes from here on can reach a score of 100 with the shortest
/// comparable parts, so the short-match cap never applies.
const CAP_FREE_BLOCK_SIZE: u64 =
    ((99 + ROLLING_WINDOW as u64) / ROLLING_WINDOW as u64) * MIN_BLOCKSIZE as u64;

/// Compare two fingerprint strings, returning a score in `0..=100`.
pub fn compare(a: &str, b: &str) -> Result<u32> {
    let a: Fingerprint = a.parse()?;
    let b: Fingerprint = b.parse()?;
    Ok(compare_fingerprints(&a, &b))
}

/// Compare two parsed fingerprints.
pub fn compare_fingerprints(a: &Fingerprint, b: &Fingerprint) -> u32 {
    let bs1 = a.block_size as u64;
    let bs2 = b.block_size as u64;

    if bs1 != bs2 && bs1 * 2 != bs2 && bs2 * 2 != bs1 {
        return 0;
    }

    let a = a.normalized();
    let b = b.normalized();

    if bs1 == bs2 && a.part1 == b.part1 && a.part2 == b.part2 {
        return 100;
    }

    if bs1 == bs2 {
        let score1 = score_strings(a.part1.as_bytes(), b.part1.as_bytes(), bs1);
        let score2 = score_strings(a.part2.as_bytes(), b.part2.as_bytes(), bs1 * 2);
        score1.max(score2)
    } else if bs1 * 2 == bs2 {
        score_strings(b.part1.as_bytes(), a.part2.as_bytes(), bs2)
    } else {
        score_strings(a.part1.as_bytes(), b.part2.as_bytes(), bs1)
    }
}

/// Score two digest parts taken at the same block size.
fn score_strings(s1: &[u8], s2: &[u8], block_size: u64) -> u32 {
    if s1.len() > SPAMSUM_LENGTH || s2.len() > SPAMSUM_LENGTH {
        return 0;
    }
    // Without a shared run of ROLLING_WINDOW symbols any similarity is noise.
    if !has_common_substring(s1, s2) {
        return 0;
    }

    let total = (s1.len() + s2.len()) as u32;
    let dist = edit_distance(s1, s2);
    let scaled = dist * SPAMSUM_LENGTH as u32 / total;
    let penalty = 100 * scaled / SPAMSUM_LENGTH as u32;
    if penalty >= 100 {
        return 0;
    }
    let score = 100 - penalty;

    if block_size >= CAP_FREE_BLOCK_SIZE {
        return score;
    }

    // Short matches at small block sizes stand for only a few bytes of input.
    let cap = block_size / MIN_BLOCKSIZE as u64 * s1.len().min(s2.len()) as u64;
    score.min(cap as u32)
}
