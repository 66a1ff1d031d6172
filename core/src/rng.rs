//! Deterministic random number generation for demo rosters.
//!
//! RULE: Demo data never touches a platform RNG. Every stream is derived
//! from one seed plus a stable stream index, so the same seed always
//! produces the same roster.

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

/// A named, deterministic RNG for one part of the demo roster.
pub struct RosterRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl RosterRng {
    /// The index must never change once assigned.
    pub fn new(seed: u64, stream_index: u64) -> Self {
        let derived_seed = seed ^ (stream_index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    pub fn for_stream(seed: u64, stream: DemoStream) -> Self {
        Self::new(seed, stream as u64).with_name(stream.name())
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

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        use rand::RngCore;
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Uniform pick from a non-empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        let index = self.next_u64_below(items.len() as u64) as usize;
        &items[index]
    }
}

/// Stable stream assignments.
/// NEVER reorder or remove entries; only append.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum DemoStream {
    Offices = 0,
    Names = 1,
    Assignment = 2,
    Attendance = 3,
}

impl DemoStream {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Offices => "offices",
            Self::Names => "names",
            Self::Assignment => "assignment",
            Self::Attendance => "attendance",
        }
    }
}
