//! Seeded random stream for reproducible mazes
//!
//! A seed string is folded into a 32-bit state which then drives a linear
//! congruential generator. All arithmetic is wrapping `u32`, so the same seed
//! string yields the exact same sequence of draws on every platform.
//!
//! An empty seed means "surprise me": the stream is backed by ChaCha8 seeded
//! from the thread RNG and is not reproducible.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::{SystemTime, UNIX_EPOCH};

const LCG_MULTIPLIER: u32 = 1_664_525;
const LCG_INCREMENT: u32 = 1_013_904_223;

/// 2^32, the divisor turning a `u32` state into a float in [0, 1)
const STATE_SPAN: f64 = 4_294_967_296.0;

#[derive(Debug, Clone)]
enum Source {
    Lcg(u32),
    Entropy(ChaCha8Rng),
}

/// Random stream used by every stage of maze generation
///
/// Each call to [`MazeRng::next_f64`] consumes exactly one state transition.
///
/// # Example
///
/// ```rust
/// use voronoi_maze::MazeRng;
///
/// let mut a = MazeRng::from_seed_str("abc");
/// let mut b = MazeRng::from_seed_str("abc");
/// assert_eq!(a.next_f64(), b.next_f64());
/// ```
#[derive(Debug, Clone)]
pub struct MazeRng {
    source: Source,
}

impl MazeRng {
    /// Create a stream from a seed string
    ///
    /// An empty seed falls back to [`MazeRng::from_entropy`]. A seed that folds
    /// to zero is replaced by a nonzero value taken from the system clock.
    pub fn from_seed_str(seed: &str) -> Self {
        if seed.is_empty() {
            return Self::from_entropy();
        }

        let mut state = fold_seed(seed);
        if state == 0 {
            state = clock_seed();
        }

        Self {
            source: Source::Lcg(state),
        }
    }

    /// Create a non-reproducible stream
    pub fn from_entropy() -> Self {
        Self {
            source: Source::Entropy(ChaCha8Rng::seed_from_u64(rand::random())),
        }
    }

    /// Create a stream from an optional seed (`None` behaves like an empty seed)
    pub fn from_optional_seed(seed: Option<&str>) -> Self {
        match seed {
            Some(seed) => Self::from_seed_str(seed),
            None => Self::from_entropy(),
        }
    }

    /// Whether this stream replays identically for the same seed
    #[inline]
    pub fn is_deterministic(&self) -> bool {
        matches!(self.source, Source::Lcg(_))
    }

    /// Draw the next value in [0, 1)
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / STATE_SPAN
    }

    /// Draw the next value in [0, max)
    #[inline]
    pub fn next_scaled(&mut self, max: f64) -> f64 {
        self.next_f64() * max
    }
}

/// Fold a seed string into a 32-bit state
///
/// Folds UTF-16 code units with `acc = acc * 31 + unit (mod 2^32)`.
pub fn fold_seed(seed: &str) -> u32 {
    seed.encode_utf16().fold(0u32, |acc, unit| {
        acc.wrapping_mul(31).wrapping_add(u32::from(unit))
    })
}

fn clock_seed() -> u32 {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u32)
        .unwrap_or(0);
    millis.max(1)
}

impl RngCore for MazeRng {
    fn next_u32(&mut self) -> u32 {
        match &mut self.source {
            Source::Lcg(state) => {
                *state = LCG_MULTIPLIER.wrapping_mul(*state).wrapping_add(LCG_INCREMENT);
                *state
            }
            Source::Entropy(rng) => rng.next_u32(),
        }
    }

    fn next_u64(&mut self) -> u64 {
        let low = u64::from(self.next_u32());
        let high = u64::from(self.next_u32());
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
