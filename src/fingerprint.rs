//! Fingerprint text format and the symbol alphabet shared by the engine and the comparer.
//!
//! A fingerprint reads `<blocksize>:<part1>:<part2>`. `part1` is the digest at
//! `blocksize`, `part2` the digest at twice that block size.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FuzzyError;

/// Smallest block size; slot `i` uses `MIN_BLOCKSIZE << i`.
pub const MIN_BLOCKSIZE: u32 = 3;
/// Maximum number of symbols in one fingerprint part.
pub const SPAMSUM_LENGTH: usize = 64;
/// Number of block size slots. `MIN_BLOCKSIZE << (NUM_BLOCKHASHES - 1)` still fits in a `u32`.
pub const NUM_BLOCKHASHES: usize = 31;
/// Longest run of one symbol kept by sequence elimination.
pub const MAX_SEQUENCE_RUN: usize = 3;

pub const BASE64_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Map a hash value onto its fingerprint symbol.
#[inline]
pub fn symbol(h: u32) -> u8 {
    BASE64_ALPHABET[(h % 64) as usize]
}

#[inline]
pub fn is_symbol(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'+' || b == b'/'
}

#[inline]
pub fn block_size(index: usize) -> u32 {
    MIN_BLOCKSIZE << index
}

/// Append `sym` to `out` unless sequence elimination is on and it would be the
/// fourth identical symbol in a row since `part_start`.
#[inline]
pub(crate) fn push_symbol(out: &mut String, part_start: usize, sym: u8, eliminate: bool) {
    if eliminate {
        let part = &out.as_bytes()[part_start..];
        if part.len() >= MAX_SEQUENCE_RUN && part[part.len() - MAX_SEQUENCE_RUN..].iter().all(|&b| b == sym) {
            return;
        }
    }
    out.push(sym as char);
}

/// Collapse every run of identical bytes longer than `MAX_SEQUENCE_RUN` to exactly that length.
pub fn eliminate_sequences(input: &[u8]) -> Vec<u8> {
    let mut out: Vec<u8> = Vec::with_capacity(input.len());
    for &b in input {
        let n = out.len();
        if n >= MAX_SEQUENCE_RUN && out[n - MAX_SEQUENCE_RUN..].iter().all(|&x| x == b) {
            continue;
        }
        out.push(b);
    }
    out
}

/// A parsed fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint {
    pub block_size: u32,
    pub part1: String,
    pub part2: String,
}

impl Fingerprint {
    /// The same fingerprint with runs longer than three symbols collapsed.
    pub fn normalized(&self) -> Fingerprint {
        // Parts only ever hold ASCII symbols.
        let squash = |s: &str| String::from_utf8_lossy(&eliminate_sequences(s.as_bytes())).into_owned();
        Fingerprint {
            block_size: self.block_size,
            part1: squash(&self.part1),
            part2: squash(&self.part2),
        }
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.block_size, self.part1, self.part2)
    }
}

impl FromStr for Fingerprint {
    type Err = FuzzyError;

    /// Parses `blocksize:part1:part2`. A trailing `,"filename"` annotation, as
    /// found in ssdeep listings, is accepted and ignored.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &'static str| FuzzyError::InvalidFingerprint {
            input: input.to_string(),
            reason,
        };

        if input.is_empty() {
            return Err(FuzzyError::InvalidArgument("fingerprint is empty".to_string()));
        }

        let mut fields = input.splitn(3, ':');
        let (bs, part1, rest) = match (fields.next(), fields.next(), fields.next()) {
            (Some(bs), Some(part1), Some(rest)) => (bs, part1, rest),
            _ => return Err(invalid("expected three ':'-separated fields")),
        };
        let part2 = match rest.find(',') {
            Some(pos) => &rest[..pos],
            None => rest,
        };

        if bs.is_empty() || !bs.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("block size is not a decimal number"));
        }
        let block_size: u32 = bs.parse().map_err(|_| invalid("block size out of range"))?;
        if block_size == 0 {
            return Err(invalid("block size must be positive"));
        }
        if !part1.bytes().all(is_symbol) || !part2.bytes().all(is_symbol) {
            return Err(invalid("digest contains characters outside the base64 alphabet"));
        }

        Ok(Fingerprint {
            block_size,
            part1: part1.to_string(),
            part2: part2.to_string(),
        })
    }
}
