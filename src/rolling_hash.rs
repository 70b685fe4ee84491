/// Rolling checksum over the last `ROLLING_WINDOW` bytes, used to find breakpoints.
///
/// Three accumulators are combined into the 32-bit sum:
/// `h1` is the plain sum of the window, `h2` weights each byte by its distance
/// from the window's end, and `h3` is a shift/xor mix of the whole history.
/// All arithmetic wraps.
pub const ROLLING_WINDOW: usize = 7;

#[derive(Debug, Clone, Default)]
pub struct RollingHash {
    window: [u8; ROLLING_WINDOW],
    h1: u32,
    h2: u32,
    h3: u32,
    n: usize,
}

impl RollingHash {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slide the window forward by one byte.
    #[inline]
    pub fn push(&mut self, c: u8) {
        let c = c as u32;
        let slot = self.n % ROLLING_WINDOW;

        self.h2 = self
            .h2
            .wrapping_sub(self.h1)
            .wrapping_add((ROLLING_WINDOW as u32).wrapping_mul(c));
        self.h1 = self
            .h1
            .wrapping_add(c)
            .wrapping_sub(self.window[slot] as u32);
        self.window[slot] = c as u8;
        self.h3 = (self.h3 << 5) ^ c;

        // Only the residue matters, keep the counter bounded.
        self.n = (slot + 1) % ROLLING_WINDOW;
    }

    #[inline]
    pub fn sum(&self) -> u32 {
        self.h1.wrapping_add(self.h2).wrapping_add(self.h3)
    }
}
