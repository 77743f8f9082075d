//! Move commitments.
//!
//! A commitment is SHA-256 over the bincode encoding of the revealed
//! decisions (raw selector and extra data per slot) followed by the salt.
//! Singles commit one decision; doubles bundle both slots under one hash.
//! A selector with no wire encoding hashes as `None`; reveals carrying one
//! are refused before any hash is compared.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::moves::MoveDecision;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveHash(pub [u8; 32]);

impl std::fmt::Display for MoveHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for byte in &self.0[..4] {
            write!(f, "{byte:02x}")?;
        }
        write!(f, "…")
    }
}

#[derive(Serialize)]
struct Preimage<'a> {
    decisions: &'a [(Option<u8>, u64)],
    salt: u64,
}

/// Commitment over one or more slot decisions.
#[must_use]
pub fn commitment(decisions: &[MoveDecision], salt: u64) -> MoveHash {
    let encoded: Vec<(Option<u8>, u64)> = decisions
        .iter()
        .map(|d| (d.selector.raw(), d.extra_data))
        .collect();
    let preimage = Preimage {
        decisions: &encoded,
        salt,
    };
    // Serializing plain integers into a Vec cannot fail.
    let bytes = bincode::serialize(&preimage).unwrap_or_default();
    MoveHash(Sha256::digest(&bytes).into())
}

/// Commitment over a single-slot decision.
#[must_use]
pub fn singles_commitment(decision: MoveDecision, salt: u64) -> MoveHash {
    commitment(&[decision], salt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_submitted_flag_not_hashed() {
        let mut decision = MoveDecision::use_move(1, 0);
        let before = singles_commitment(decision, 9);
        decision.submitted = true;
        assert_eq!(singles_commitment(decision, 9), before);
    }

    #[test]
    fn test_out_of_range_move_does_not_alias() {
        assert_ne!(
            singles_commitment(MoveDecision::use_move(200, 0), 4),
            singles_commitment(MoveDecision::use_move(124, 0), 4)
        );
    }

    #[test]
    fn test_bundle_differs_from_single() {
        let decision = MoveDecision::use_move(0, 0);
        assert_ne!(
            commitment(&[decision], 1),
            commitment(&[decision, MoveDecision::no_op()], 1)
        );
    }

    proptest! {
        #[test]
        fn prop_any_field_change_changes_hash(
            index in 0usize..4,
            extra in any::<u64>(),
            salt in any::<u64>(),
        ) {
            let base = singles_commitment(MoveDecision::use_move(index, extra), salt);
            prop_assert_ne!(base, singles_commitment(MoveDecision::use_move(index, extra), salt.wrapping_add(1)));
            prop_assert_ne!(base, singles_commitment(MoveDecision::use_move(index, extra.wrapping_add(1)), salt));
            prop_assert_ne!(base, singles_commitment(MoveDecision::use_move(index + 1, extra), salt));
            prop_assert_ne!(base, singles_commitment(MoveDecision::new(crate::moves::MoveSelector::Switch, extra), salt));
        }
    }
}
