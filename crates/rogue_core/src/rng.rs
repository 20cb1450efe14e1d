//! Uniform integer random sources.
//!
//! Level generation and spawn placement draw through [`RandomSource`]. Two
//! implementations are provided:
//!
//! - [`SeededRng`]: an owned ChaCha8 stream. Same seed, same draws.
//! - [`GlobalRng`]: a handle to one process-wide generator behind a mutex,
//!   shared by every caller (including gameplay code on other threads).
//!   It is seeded from the OS on first use unless [`seed_global`] ran first.

use std::sync::{Mutex, OnceLock, PoisonError};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// A source of uniformly distributed integers.
pub trait RandomSource {
    /// Draw an integer in `[min, max]`, inclusive on both ends.
    ///
    /// A reversed range is drawn as if the bounds were swapped.
    fn random_int(&mut self, min: i32, max: i32) -> i32;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn random_int(&mut self, min: i32, max: i32) -> i32 {
        (**self).random_int(min, max)
    }
}

/// Deterministic generator backed by ChaCha8.
#[derive(Debug, Clone)]
pub struct SeededRng {
    inner: ChaCha8Rng,
}

impl SeededRng {
    /// Create a generator whose draws are fully determined by `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Create a generator seeded from the thread-local OS-backed RNG.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::rng().random())
    }
}

impl RandomSource for SeededRng {
    fn random_int(&mut self, min: i32, max: i32) -> i32 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        self.inner.random_range(lo..=hi)
    }
}

static GLOBAL: OnceLock<Mutex<SeededRng>> = OnceLock::new();

fn global() -> &'static Mutex<SeededRng> {
    GLOBAL.get_or_init(|| Mutex::new(SeededRng::from_entropy()))
}

/// Re-seed the process-wide generator.
///
/// Every [`GlobalRng`] handle observes the new stream immediately.
pub fn seed_global(seed: u64) {
    let mut rng = global().lock().unwrap_or_else(PoisonError::into_inner);
    *rng = SeededRng::new(seed);
}

/// Handle to the process-wide generator. Each draw takes the lock once.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalRng;

impl RandomSource for GlobalRng {
    fn random_int(&mut self, min: i32, max: i32) -> i32 {
        global()
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .random_int(min, max)
    }
}
