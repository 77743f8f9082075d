use serde::{Deserialize, Serialize};

use super::hash::MoveHash;

/// Commit/reveal bookkeeping of one player in one match.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub move_hash: Option<MoveHash>,
    /// Turn the stored hash was committed for.
    pub committed_turn: Option<u64>,
    /// Last turn this player revealed for.
    pub revealed_turn: Option<u64>,
    /// Number of reveals so far.
    pub moves_revealed: u64,
    /// Time of the last commit or reveal.
    pub last_move_timestamp: u64,
}

impl CommitRecord {
    #[must_use]
    pub fn has_committed(&self, turn_id: u64) -> bool {
        self.committed_turn == Some(turn_id)
    }

    #[must_use]
    pub fn has_revealed(&self, turn_id: u64) -> bool {
        self.revealed_turn == Some(turn_id)
    }

    pub(crate) fn record_commit(&mut self, turn_id: u64, hash: MoveHash, now: u64) {
        self.move_hash = Some(hash);
        self.committed_turn = Some(turn_id);
        self.last_move_timestamp = now;
    }

    pub(crate) fn record_reveal(&mut self, turn_id: u64, now: u64) {
        self.revealed_turn = Some(turn_id);
        self.moves_revealed += 1;
        self.last_move_timestamp = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_scoped_flags() {
        let mut record = CommitRecord::default();
        assert!(!record.has_committed(0));

        record.record_commit(0, MoveHash([1; 32]), 10);
        assert!(record.has_committed(0));
        assert!(!record.has_committed(1));

        record.record_reveal(0, 12);
        assert!(record.has_revealed(0));
        assert!(!record.has_revealed(1));
        assert_eq!(record.moves_revealed, 1);
        assert_eq!(record.last_move_timestamp, 12);
    }
}
