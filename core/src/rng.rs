//! Random number generation.
//!
//! RULE: Nothing in the simulation may call any platform RNG.
//! All randomness flows through SubsystemRng instances owned by the
//! engine's RngBank and passed down explicitly.
//!
//! Each subsystem gets its own RNG stream, seeded from
//! (master_seed XOR subsystem_index). This means:
//!   - Adding a new subsystem never changes existing subsystems' streams.
//!   - A seeded bank reproduces a whole game; an entropy bank does not.

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

/// A named RNG stream for a single subsystem.
pub struct SubsystemRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl SubsystemRng {
    /// Create a subsystem RNG from the master seed and a stable
    /// subsystem index. The index must never change once assigned.
    pub fn new(master_seed: u64, subsystem_index: u64) -> Self {
        let derived_seed = master_seed ^ (subsystem_index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
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

    /// Roll a float in [min, max).
    pub fn range_f64(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        use rand::RngCore;
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Roll an integer in [min, max] inclusive.
    pub fn range_inclusive(&mut self, min: u8, max: u8) -> u8 {
        debug_assert!(min <= max);
        min + self.next_u64_below(u64::from(max - min) + 1) as u8
    }

    /// Pick an index into a slice of length `len`.
    pub fn pick_index(&mut self, len: usize) -> usize {
        self.next_u64_below(len as u64) as usize
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Sixteen random bytes, used to mint member identifiers.
    pub fn next_bytes_16(&mut self) -> [u8; 16] {
        use rand::RngCore;
        let mut bytes = [0u8; 16];
        self.inner.fill_bytes(&mut bytes);
        bytes
    }
}

/// All subsystem RNGs for a single game, indexed by stable slot.
pub struct RngBank {
    master_seed: u64,
    streams:     Vec<SubsystemRng>,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        let streams = SubsystemSlot::ALL
            .iter()
            .map(|slot| SubsystemRng::new(master_seed, *slot as u64).with_name(slot.name()))
            .collect();
        Self { master_seed, streams }
    }

    /// Unseeded bank for regular play.
    pub fn from_entropy() -> Self {
        Self::new(rand::random::<u64>())
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    pub fn for_subsystem(&mut self, slot: SubsystemSlot) -> &mut SubsystemRng {
        &mut self.streams[slot as usize]
    }
}

/// Stable subsystem slot assignments.
/// NEVER reorder or remove entries: only append.
/// Reordering changes every subsystem's seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum SubsystemSlot {
    Growth = 0,     // one-off growth actions
    Recurring = 1,
    Events = 2,     // trigger roll, draw, offers, event effects
    Recruiting = 3, // candidates and founder ids
    // Add new subsystems here: append only.
}

impl SubsystemSlot {
    pub const ALL: [SubsystemSlot; 4] = [
        Self::Growth,
        Self::Recurring,
        Self::Events,
        Self::Recruiting,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Growth => "growth",
            Self::Recurring => "recurring",
            Self::Events => "events",
            Self::Recruiting => "recruiting",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = RngBank::new(7);
        let mut b = RngBank::new(7);
        for _ in 0..32 {
            assert_eq!(
                a.for_subsystem(SubsystemSlot::Events).next_u64_below(1000),
                b.for_subsystem(SubsystemSlot::Events).next_u64_below(1000),
            );
        }
    }

    #[test]
    fn streams_are_independent() {
        let mut bank = RngBank::new(7);
        let growth: Vec<u64> = (0..8)
            .map(|_| bank.for_subsystem(SubsystemSlot::Growth).next_u64_below(u64::MAX))
            .collect();
        let events: Vec<u64> = (0..8)
            .map(|_| bank.for_subsystem(SubsystemSlot::Events).next_u64_below(u64::MAX))
            .collect();
        assert_ne!(growth, events);
    }

    #[test]
    fn range_inclusive_stays_in_bounds() {
        let mut rng = SubsystemRng::new(3, 0);
        for _ in 0..500 {
            let v = rng.range_inclusive(6, 9);
            assert!((6..=9).contains(&v));
        }
    }
}
