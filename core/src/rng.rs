//! Deterministic random number generation.
//!
//! RULE: Nothing in the simulation may call any platform RNG.
//! All randomness flows through SubsystemRng streams held by the
//! RngBank, each seeded from (master_seed XOR slot index).
//!
//! Streams persist for the life of the engine, so the draws a phase
//! sees depend only on the seed and how many draws that phase made
//! before. Adding a new slot never changes existing streams.

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;
use serde::{Deserialize, Serialize};

/// Below this many trials the sampler runs every Bernoulli trial.
const DIRECT_TRIAL_LIMIT: u64 = 64;

/// Expected successes above which the normal approximation is used.
const NORMAL_APPROX_MEAN: f64 = 40.0;

/// One binomial draw together with its expectation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct BinomialDraw {
    pub sample:   u64,
    pub expected: f64,
}

/// A named, deterministic RNG for a single stream.
pub struct SubsystemRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl SubsystemRng {
    /// Create an RNG from the master seed and a stable slot index.
    /// The index must never change once assigned.
    pub fn new(master_seed: u64, slot_index: u64) -> Self {
        let derived_seed = master_seed ^ (slot_index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        use rand::RngCore;
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a float in (0.0, 1.0], safe to take the log of.
    fn next_f64_nonzero(&mut self) -> f64 {
        1.0 - self.next_f64()
    }

    /// Uniform draw from [lower, upper). Mean is (lower + upper) / 2.
    pub fn uniform(&mut self, lower: f64, upper: f64) -> f64 {
        lower + self.next_f64() * (upper - lower)
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Number of successes in `trials` independent Bernoulli(p) draws.
    ///
    /// Zero trials always yields zero. `p` is clamped into [0, 1] and the
    /// reported expectation uses the clamped value.
    pub fn binomial(&mut self, trials: u64, p: f64) -> BinomialDraw {
        let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
        let expected = trials as f64 * p;

        if trials == 0 || p == 0.0 {
            return BinomialDraw { sample: 0, expected };
        }
        if p == 1.0 {
            return BinomialDraw { sample: trials, expected };
        }

        // Sample the rarer outcome and mirror, which keeps the waiting-time
        // path short for p close to 1.
        let q = p.min(1.0 - p);
        let k = if trials <= DIRECT_TRIAL_LIMIT {
            self.binomial_direct(trials, q)
        } else if trials as f64 * q < NORMAL_APPROX_MEAN {
            self.binomial_waiting_time(trials, q)
        } else {
            self.binomial_normal(trials, q)
        };
        let sample = if p > 0.5 { trials - k } else { k };

        BinomialDraw { sample, expected }
    }

    fn binomial_direct(&mut self, trials: u64, q: f64) -> u64 {
        (0..trials).filter(|_| self.chance(q)).count() as u64
    }

    /// Skip ahead by geometric gaps between successes. Cost is O(n·q).
    fn binomial_waiting_time(&mut self, trials: u64, q: f64) -> u64 {
        let log_miss = (-q).ln_1p();
        let mut position = 0.0f64;
        let mut successes = 0u64;
        loop {
            let gap = (self.next_f64_nonzero().ln() / log_miss).floor();
            position += gap + 1.0;
            if position > trials as f64 {
                return successes;
            }
            successes += 1;
        }
    }

    fn binomial_normal(&mut self, trials: u64, q: f64) -> u64 {
        let n = trials as f64;
        let mean = n * q;
        let std_dev = (n * q * (1.0 - q)).sqrt();
        let draw = (mean + std_dev * self.standard_normal()).round();
        draw.clamp(0.0, n) as u64
    }

    /// Box–Muller transform.
    fn standard_normal(&mut self) -> f64 {
        let u1 = self.next_f64_nonzero();
        let u2 = self.next_f64();
        (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
    }
}

/// All RNG streams for a single run, indexed by stable slot.
pub struct RngBank {
    master_seed: u64,
    streams:     Vec<SubsystemRng>,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        let streams = RngSlot::ALL
            .iter()
            .map(|slot| SubsystemRng::new(master_seed, *slot as u64).with_name(slot.name()))
            .collect();
        Self { master_seed, streams }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    pub fn stream(&mut self, slot: RngSlot) -> &mut SubsystemRng {
        &mut self.streams[slot as usize]
    }
}

/// Stable stream slot assignments.
/// NEVER reorder or remove entries, only append.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum RngSlot {
    Growth = 0,
    Churn = 1,
    Marketing = 2,
    Financing = 3,
}

impl RngSlot {
    pub const ALL: [RngSlot; 4] = [Self::Growth, Self::Churn, Self::Marketing, Self::Financing];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Growth => "growth",
            Self::Churn => "churn",
            Self::Marketing => "marketing",
            Self::Financing => "financing",
        }
    }
}
