use crate::fingerprint::{symbol, SPAMSUM_LENGTH};

const HASH_PRIME: u32 = 0x0100_0193;
pub const HASH_INIT: u32 = 0x2802_1967;

/// Digest state for one block size.
///
/// `h` is reset at every breakpoint. `half_h` stops being reset once the digest
/// is half full, so the truncated second fingerprint part can end with a
/// symbol covering the whole remaining tail.
#[derive(Debug, Clone, Copy)]
pub struct BlockHash {
    pub h: u32,
    pub half_h: u32,
    digest: [u8; SPAMSUM_LENGTH - 1],
    len: usize,
    /// Symbol emitted after the digest filled up; overwritten at each later breakpoint.
    pub tail: Option<u8>,
    pub half_digest: Option<u8>,
}

impl Default for BlockHash {
    fn default() -> Self {
        Self {
            h: HASH_INIT,
            half_h: HASH_INIT,
            digest: [0; SPAMSUM_LENGTH - 1],
            len: 0,
            tail: None,
            half_digest: None,
        }
    }
}

impl BlockHash {
    /// Start the next block size from the hash state of this one.
    pub fn fork(&self) -> Self {
        Self {
            h: self.h,
            half_h: self.half_h,
            ..Self::default()
        }
    }

    #[inline]
    pub fn update(&mut self, c: u8) {
        self.h = self.h.wrapping_mul(HASH_PRIME) ^ c as u32;
        self.half_h = self.half_h.wrapping_mul(HASH_PRIME) ^ c as u32;
    }

    /// Record a breakpoint. Returns `false` when the digest is already full and
    /// the symbol only replaced the pending tail.
    pub fn emit(&mut self) -> bool {
        let sym = symbol(self.h);
        self.half_digest = Some(symbol(self.half_h));
        if self.len < SPAMSUM_LENGTH - 1 {
            self.digest[self.len] = sym;
            self.reset();
            true
        } else {
            self.tail = Some(sym);
            false
        }
    }

    fn reset(&mut self) {
        self.len += 1;
        self.h = HASH_INIT;
        if self.len < SPAMSUM_LENGTH / 2 {
            self.half_h = HASH_INIT;
            self.half_digest = None;
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn digest(&self) -> &[u8] {
        &self.digest[..self.len]
    }
}
