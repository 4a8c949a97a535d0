//! Shared utilities

/// xorshift64* stream for maze layout and entity placement.
///
/// Same seed, same level: the simulator's `--seed` flag relies on it.
pub struct Rng {
    state: u64,
}

const XORSHIFT_STAR_MULT: u64 = 0x2545_F491_4F6C_DD1D;

impl Rng {
    pub fn new(seed: u64) -> Self {
        // A zero state never leaves zero
        let state = if seed == 0 { XORSHIFT_STAR_MULT } else { seed };
        Self { state }
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let mut s = self.state;
        s ^= s >> 12;
        s ^= s << 25;
        s ^= s >> 27;
        self.state = s;
        s.wrapping_mul(XORSHIFT_STAR_MULT)
    }

    /// High half of the next output; the low bits are the weakest
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    /// Index in `0..n`, slightly biased for large `n`; `n` must be non-zero
    #[inline]
    pub fn below(&mut self, n: usize) -> usize {
        debug_assert!(n > 0, "below: empty range");
        (self.next_u64() % n as u64) as usize
    }
}
