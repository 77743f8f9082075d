//! Deterministic randomness and the per-turn randomness provider.
//!
//! ## GameRng
//!
//! ChaCha8-backed RNG: same seed, same sequence. Independent streams are
//! derived per context.
//!
//! ## RandomnessOracle
//!
//! The engine draws exactly one resolution-scoped value per turn from the
//! match's oracle. Tie-breaks and any content-level chance roll derive from
//! that value.
//!
//! ```
//! use monclash::core::{MatchKey, PlayerPair, RandomnessOracle, SaltOracle, TurnSeeds};
//!
//! let seeds = TurnSeeds {
//!     match_key: MatchKey(1),
//!     turn_id: 3,
//!     salts: PlayerPair::new(11, 22),
//! };
//!
//! // Same seeds, same value
//! assert_eq!(SaltOracle.turn_randomness(&seeds), SaltOracle.turn_randomness(&seeds));
//! ```

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::hash::{Hash, Hasher};

use super::player::PlayerPair;
use super::types::MatchKey;

/// Deterministic RNG with per-context streams.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create an independent stream for a specific context.
    ///
    /// The same context always produces the same stream from the same seed.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;

        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Next raw 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }
}

/// Inputs from which a turn's random value is derived.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TurnSeeds {
    pub match_key: MatchKey,
    pub turn_id: u64,
    /// Salts revealed by each side this turn (0 when a side did not reveal).
    pub salts: PlayerPair<u64>,
}

/// Supplies one resolution-scoped random value per turn.
pub trait RandomnessOracle: Send + Sync {
    fn turn_randomness(&self, seeds: &TurnSeeds) -> u64;
}

/// Default oracle: SHA-256 over both revealed salts and the turn coordinates.
///
/// Neither player controls the result alone because each salt is fixed
/// before the other side's is known.
#[derive(Clone, Copy, Debug, Default)]
pub struct SaltOracle;

impl RandomnessOracle for SaltOracle {
    fn turn_randomness(&self, seeds: &TurnSeeds) -> u64 {
        let mut hasher = Sha256::new();
        hasher.update(seeds.match_key.0.to_le_bytes());
        hasher.update(seeds.turn_id.to_le_bytes());
        for (_, salt) in seeds.salts.iter() {
            hasher.update(salt.to_le_bytes());
        }
        let digest = hasher.finalize();
        let mut word = [0u8; 8];
        word.copy_from_slice(&digest[..8]);
        u64::from_le_bytes(word)
    }
}

/// Oracle ignoring salts, derived from a fixed seed. For simulations and tests.
#[derive(Clone, Copy, Debug)]
pub struct SeededOracle {
    pub seed: u64,
}

impl SeededOracle {
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl RandomnessOracle for SeededOracle {
    fn turn_randomness(&self, seeds: &TurnSeeds) -> u64 {
        let mut rng = GameRng::new(self.seed ^ seeds.match_key.0)
            .for_context(&format!("turn-{}", seeds.turn_id));
        rng.next_u64()
    }
}

/// Oracle returning a fixed value every turn. Useful to pin tie-breaks.
#[derive(Clone, Copy, Debug)]
pub struct FixedOracle(pub u64);

impl RandomnessOracle for FixedOracle {
    fn turn_randomness(&self, _seeds: &TurnSeeds) -> u64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeds(turn_id: u64, salts: (u64, u64)) -> TurnSeeds {
        TurnSeeds {
            match_key: MatchKey(7),
            turn_id,
            salts: PlayerPair::new(salts.0, salts.1),
        }
    }

    #[test]
    fn test_determinism() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.next_u64(), rng2.next_u64());
        }
    }

    #[test]
    fn test_context_streams_differ() {
        let rng = GameRng::new(42);
        let mut a = rng.for_context("turn-1");
        let mut b = rng.for_context("turn-2");
        let mut again = rng.for_context("turn-1");

        let seq_a: Vec<_> = (0..10).map(|_| a.next_u64()).collect();
        let seq_b: Vec<_> = (0..10).map(|_| b.next_u64()).collect();
        let seq_again: Vec<_> = (0..10).map(|_| again.next_u64()).collect();

        assert_ne!(seq_a, seq_b);
        assert_eq!(seq_a, seq_again);
    }

    #[test]
    fn test_salt_oracle_depends_on_each_salt() {
        let base = SaltOracle.turn_randomness(&seeds(1, (5, 9)));
        assert_ne!(base, SaltOracle.turn_randomness(&seeds(1, (6, 9))));
        assert_ne!(base, SaltOracle.turn_randomness(&seeds(1, (5, 10))));
        assert_ne!(base, SaltOracle.turn_randomness(&seeds(2, (5, 9))));
    }

    #[test]
    fn test_seeded_oracle_varies_per_turn() {
        let oracle = SeededOracle::new(99);
        let a = oracle.turn_randomness(&seeds(0, (0, 0)));
        let b = oracle.turn_randomness(&seeds(1, (0, 0)));
        assert_ne!(a, b);
        assert_eq!(a, oracle.turn_randomness(&seeds(0, (123, 456))));
    }
}
