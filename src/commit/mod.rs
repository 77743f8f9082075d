//! Commit/reveal move submission.
//!
//! Players hide their decisions behind a hash until both required parties
//! are bound, then reveal. `CommitManager` enforces the ordering, checks
//! preimages and legality, and forwards accepted decisions to the engine.

mod hash;
mod manager;
mod record;

pub use hash::{commitment, singles_commitment, MoveHash};
pub use manager::{CommitManager, RevealOutcome};
pub use record::CommitRecord;
