//! Random number generation for the breakup pipeline.
//!
//! Two modes exist:
//!
//! - **Entropy mode** (default): every worker thread owns a thread-local
//!   PCG generator seeded from OS entropy on first use. Sampling is
//!   lock-free and the distribution steps may run in parallel.
//! - **Fixed-seed mode**: a single process-wide PCG generator behind a
//!   mutex; every sample acquires the lock. Byte-identical output is
//!   guaranteed *only* when the pipeline additionally runs sequentially,
//!   because parallel workers race for the lock in nondeterministic order.
//!   The pipeline never silently forces sequential execution.

use std::cell::RefCell;
use std::sync::Mutex;

use rand::prelude::*;
use rand_pcg::Pcg64;

thread_local! {
    static WORKER_RNG: RefCell<Pcg64> = RefCell::new(Pcg64::from_entropy());
}

/// Dual-mode random source of the breakup pipeline.
#[derive(Debug, Default)]
pub struct FragmentRng {
    /// Present in fixed-seed mode; `None` selects the thread-local mode.
    fixed: Option<Mutex<Pcg64>>,
}

impl FragmentRng {
    /// Entropy mode: one thread-local generator per worker.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self { fixed: None }
    }

    /// Fixed-seed mode with a single synchronized generator.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            fixed: Some(Mutex::new(Pcg64::seed_from_u64(seed))),
        }
    }

    /// Whether this source runs in fixed-seed mode.
    #[must_use]
    pub const fn is_seeded(&self) -> bool {
        self.fixed.is_some()
    }

    /// Run a closure with exclusive access to the active generator.
    fn with_rng<T>(&self, f: impl FnOnce(&mut Pcg64) -> T) -> T {
        match &self.fixed {
            Some(mutex) => {
                let mut guard = mutex
                    .lock()
                    .unwrap_or_else(std::sync::PoisonError::into_inner);
                f(&mut guard)
            }
            None => WORKER_RNG.with(|rng| f(&mut rng.borrow_mut())),
        }
    }

    /// Sample a uniform value in `[0, 1)`.
    pub fn uniform(&self) -> f64 {
        self.with_rng(|rng| rng.gen())
    }

    /// Sample a normal value via the Box-Muller transform.
    pub fn normal(&self, mean: f64, sigma: f64) -> f64 {
        self.with_rng(|rng| {
            let u1: f64 = rng.gen();
            let u2: f64 = rng.gen();
            // Avoid log(0).
            let u1 = if u1 < f64::EPSILON { f64::EPSILON } else { u1 };
            let standard =
                (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
            mean + sigma * standard
        })
    }
}
