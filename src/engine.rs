//! Piecewise hashing engine.
//!
//! Every byte goes through one rolling checksum and the FNV-style hash of each
//! active block size. Whenever the rolling sum hits `bs - 1 (mod bs)` the block
//! size emits one symbol. The set of active block sizes grows as soon as the
//! largest one sees its first breakpoint, and shrinks from below once the
//! smallest one can no longer describe the input in 64 symbols.

use serde::{Deserialize, Serialize};
use std::io;
use tracing::trace;

use crate::block_hash::BlockHash;
use crate::error::{FuzzyError, Result};
use crate::fingerprint::{block_size, push_symbol, symbol, NUM_BLOCKHASHES, SPAMSUM_LENGTH};
use crate::rolling_hash::RollingHash;

/// Output options for [`FuzzyHasher::finish`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashOptions {
    /// Collapse runs of more than three identical symbols.
    pub eliminate_sequences: bool,
    /// Emit the second part at full length instead of 32 symbols.
    pub do_not_truncate: bool,
}

/// Incremental fuzzy hash state.
///
/// Feeding the same bytes in any chunking yields the same fingerprint.
#[derive(Debug, Clone)]
pub struct FuzzyHasher {
    slots: [BlockHash; NUM_BLOCKHASHES],
    start: usize,
    end: usize,
    total_size: u64,
    roll: RollingHash,
    options: HashOptions,
}

impl Default for FuzzyHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl FuzzyHasher {
    pub fn new() -> Self {
        Self::with_options(HashOptions::default())
    }

    pub fn with_options(options: HashOptions) -> Self {
        Self {
            slots: [BlockHash::default(); NUM_BLOCKHASHES],
            start: 0,
            end: 1,
            total_size: 0,
            roll: RollingHash::new(),
            options,
        }
    }

    pub fn options(&self) -> HashOptions {
        self.options
    }

    /// Number of bytes fed so far.
    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    /// Discard all input, keeping the options.
    pub fn reset(&mut self) {
        *self = Self::with_options(self.options);
    }

    pub fn update(&mut self, data: &[u8]) {
        for &c in data {
            self.step(c);
        }
    }

    #[inline]
    fn step(&mut self, c: u8) {
        self.roll.push(c);
        let h = self.roll.sum();

        for slot in &mut self.slots[self.start..self.end] {
            slot.update(c);
        }

        // If h is not -1 mod bs it cannot be -1 mod 2*bs either, so the scan
        // stops at the first miss.
        let mut i = self.start;
        while i < self.end {
            let bs = block_size(i);
            if h % bs != bs - 1 {
                break;
            }
            if self.slots[i].is_empty() {
                self.try_fork();
            }
            if !self.slots[i].emit() {
                self.try_reduce();
            }
            i += 1;
        }

        self.total_size += 1;
    }

    fn try_fork(&mut self) {
        if self.end >= NUM_BLOCKHASHES {
            return;
        }
        self.slots[self.end] = self.slots[self.end - 1].fork();
        self.end += 1;
        trace!(block_size = block_size(self.end - 1), "forked block hash");
    }

    fn try_reduce(&mut self) {
        // Need at least two working block sizes.
        if self.end - self.start < 2 {
            return;
        }
        // The size estimate in finish() would still pick this block size.
        if block_size(self.start) as u64 * SPAMSUM_LENGTH as u64 >= self.total_size {
            return;
        }
        // The digest length adjustment would still pick this block size.
        if self.slots[self.start + 1].len() < SPAMSUM_LENGTH / 2 {
            return;
        }
        trace!(block_size = block_size(self.start), "retired block hash");
        self.start += 1;
    }

    /// Render the fingerprint of everything fed so far. The state is left
    /// untouched, so more data may be fed afterwards.
    pub fn finish(&self) -> Result<String> {
        let eliminate = self.options.eliminate_sequences;
        let untruncated = self.options.do_not_truncate;
        let roll_sum = self.roll.sum();

        let mut bi = self.start;
        while (block_size(bi) as u64 * SPAMSUM_LENGTH as u64) < self.total_size {
            bi += 1;
            if bi >= NUM_BLOCKHASHES {
                return Err(FuzzyError::BlockSizeOverflow {
                    total_bytes: self.total_size,
                });
            }
        }
        bi = bi.min(self.end - 1);
        while bi > self.start && self.slots[bi].len() < SPAMSUM_LENGTH / 2 {
            bi -= 1;
        }

        let mut out = String::with_capacity(2 * SPAMSUM_LENGTH + 20);
        out.push_str(&block_size(bi).to_string());
        out.push(':');

        let slot = &self.slots[bi];
        let part = out.len();
        for &sym in slot.digest() {
            push_symbol(&mut out, part, sym, eliminate);
        }
        if roll_sum != 0 {
            push_symbol(&mut out, part, symbol(slot.h), eliminate);
        } else if let Some(tail) = slot.tail {
            push_symbol(&mut out, part, tail, eliminate);
        }
        out.push(':');

        if bi < self.end - 1 {
            let next = &self.slots[bi + 1];
            let digest = next.digest();
            let n = if untruncated {
                digest.len()
            } else {
                digest.len().min(SPAMSUM_LENGTH / 2 - 1)
            };

            let part = out.len();
            for &sym in &digest[..n] {
                push_symbol(&mut out, part, sym, eliminate);
            }
            if roll_sum != 0 {
                let h = if untruncated { next.h } else { next.half_h };
                push_symbol(&mut out, part, symbol(h), eliminate);
            } else {
                let last = if untruncated { next.tail } else { next.half_digest };
                if let Some(sym) = last {
                    push_symbol(&mut out, part, sym, eliminate);
                }
            }
        } else if roll_sum != 0 {
            out.push(symbol(slot.h) as char);
        }

        Ok(out)
    }
}

impl io::Write for FuzzyHasher {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
