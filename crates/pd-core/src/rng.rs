//! Deterministic per-entity and simulation-level RNG wrappers.
//!
//! # Determinism strategy
//!
//! Every entity gets its own independent `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (entity_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive entity IDs uniformly across the seed space.
//! Entities never share RNG state, so the draws one entity makes (e.g. a
//! comm device rolling its reliability) do not shift the stream seen by any
//! other entity.  Spawning more parcels later in a run leaves the streams of
//! existing entities untouched.
//!
//! Generators are always injected explicitly; nothing in the workspace
//! reaches for a thread-local or global RNG.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::EntityId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── EntityRng ─────────────────────────────────────────────────────────────────

/// Per-entity deterministic RNG.
pub struct EntityRng(SmallRng);

impl EntityRng {
    /// Seed deterministically from the run's global seed and an entity ID.
    pub fn new(global_seed: u64, entity: EntityId) -> Self {
        let seed = global_seed ^ (entity.0 as u64).wrapping_mul(MIXING_CONSTANT);
        EntityRng(SmallRng::seed_from_u64(seed))
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    ///
    /// `p == 1.0` never fails and `p == 0.0` never succeeds.
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}

impl std::fmt::Debug for EntityRng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("EntityRng")
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Simulation-level RNG for global operations: random placement and the
/// per-tick parcel spawn roll.
///
/// Used only from the scheduler's single thread.
pub struct SimRng {
    rng:  SmallRng,
    seed: u64,
}

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng { rng: SmallRng::seed_from_u64(seed), seed }
    }

    /// The seed this generator was created from.
    ///
    /// Entity RNGs are derived from it with [`SimRng::entity_rng`].
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Build the [`EntityRng`] for `entity` from this run's seed.
    ///
    /// Does not advance `self`.
    #[inline]
    pub fn entity_rng(&self, entity: EntityId) -> EntityRng {
        EntityRng::new(self.seed, entity)
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.rng.gen_range(range)
    }

    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.rng.gen_bool(p.clamp(0.0, 1.0))
    }
}

impl std::fmt::Debug for SimRng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimRng").field("seed", &self.seed).finish()
    }
}
