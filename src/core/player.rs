//! Player identification and per-side data storage.
//!
//! ## PlayerId
//!
//! Side index of a match: `PlayerId::P0` or `PlayerId::P1`.
//!
//! ## PlayerPair
//!
//! Fixed two-entry storage indexed by `PlayerId`. Every match has exactly
//! two sides, so this is backed by an array rather than a `Vec`.
//!
//! ## PlayerKey / ManagerId
//!
//! External identities: who a side belongs to, and which move manager is
//! allowed to drive a match.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};
use std::sync::atomic::{AtomicU32, Ordering};

/// Side of a match. Index 0 or 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(u8);

impl PlayerId {
    /// The first side.
    pub const P0: PlayerId = PlayerId(0);
    /// The second side.
    pub const P1: PlayerId = PlayerId(1);

    /// Create a player ID from a raw index.
    ///
    /// Panics if `index > 1`.
    #[must_use]
    pub const fn new(index: u8) -> Self {
        assert!(index < 2, "PlayerId must be 0 or 1");
        Self(index)
    }

    /// Get the raw side index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The opposing side.
    ///
    /// ```
    /// use monclash::core::PlayerId;
    ///
    /// assert_eq!(PlayerId::P0.other(), PlayerId::P1);
    /// assert_eq!(PlayerId::P1.other(), PlayerId::P0);
    /// ```
    #[must_use]
    pub const fn other(self) -> Self {
        Self(1 - self.0)
    }

    /// Both sides in index order.
    pub fn both() -> impl Iterator<Item = PlayerId> {
        [PlayerId::P0, PlayerId::P1].into_iter()
    }

    /// The side whose parity matches a turn number.
    ///
    /// Even turns map to `P0`, odd turns to `P1`.
    #[must_use]
    pub const fn for_turn_parity(turn_id: u64) -> Self {
        Self((turn_id % 2) as u8)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// External identity of a participant (an account, a connection, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerKey(pub u64);

impl std::fmt::Display for PlayerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PlayerKey({:#x})", self.0)
    }
}

/// Identity of a move manager (the commit/reveal layer driving a match).
///
/// Ids are only issued by `CommitManager::new`, each one distinct, so an
/// engine caller cannot pose as another manager.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ManagerId(u32);

impl ManagerId {
    /// Held by matches set up without a manager. Never issued.
    pub(crate) const UNASSIGNED: ManagerId = ManagerId(0);

    pub(crate) fn issue() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(1);
        ManagerId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for ManagerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Manager({})", self.0)
    }
}

/// Per-side data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use monclash::core::{PlayerId, PlayerPair};
///
/// let mut hp: PlayerPair<i32> = PlayerPair::splat(100);
/// hp[PlayerId::P1] -= 30;
///
/// assert_eq!(hp[PlayerId::P0], 100);
/// assert_eq!(hp[PlayerId::P1], 70);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerPair<T> {
    data: [T; 2],
}

impl<T> PlayerPair<T> {
    /// Create from explicit values for `P0` and `P1`.
    pub const fn new(p0: T, p1: T) -> Self {
        Self { data: [p0, p1] }
    }

    /// Create with a factory function receiving each side.
    pub fn from_fn(mut factory: impl FnMut(PlayerId) -> T) -> Self {
        let p0 = factory(PlayerId::P0);
        let p1 = factory(PlayerId::P1);
        Self { data: [p0, p1] }
    }

    /// Create with both entries set to the same value.
    pub fn splat(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            data: [value.clone(), value],
        }
    }

    /// Get a reference to a side's data.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }

    /// Get a mutable reference to a side's data.
    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Iterate over (PlayerId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        PlayerId::both().zip(self.data.iter())
    }

    /// Map both entries into a new pair.
    pub fn map<U>(&self, mut f: impl FnMut(PlayerId, &T) -> U) -> PlayerPair<U> {
        PlayerPair::new(f(PlayerId::P0, &self.data[0]), f(PlayerId::P1, &self.data[1]))
    }

    /// Find the side holding a value.
    pub fn position(&self, value: &T) -> Option<PlayerId>
    where
        T: PartialEq,
    {
        self.iter().find(|(_, v)| *v == value).map(|(p, _)| p)
    }
}

impl<T> Index<PlayerId> for PlayerPair<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerPair<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issued_manager_ids_are_distinct() {
        let a = ManagerId::issue();
        let b = ManagerId::issue();
        assert_ne!(a, b);
        assert_ne!(a, ManagerId::UNASSIGNED);
        assert_ne!(b, ManagerId::UNASSIGNED);
    }

    #[test]
    fn test_player_id_basics() {
        assert_eq!(PlayerId::P0.index(), 0);
        assert_eq!(PlayerId::P1.index(), 1);
        assert_eq!(format!("{}", PlayerId::P1), "Player 1");
    }

    #[test]
    fn test_turn_parity() {
        assert_eq!(PlayerId::for_turn_parity(0), PlayerId::P0);
        assert_eq!(PlayerId::for_turn_parity(1), PlayerId::P1);
        assert_eq!(PlayerId::for_turn_parity(8), PlayerId::P0);
    }

    #[test]
    #[should_panic(expected = "PlayerId must be 0 or 1")]
    fn test_player_id_out_of_range() {
        let _ = PlayerId::new(2);
    }

    #[test]
    fn test_pair_position() {
        let keys = PlayerPair::new(PlayerKey(7), PlayerKey(9));
        assert_eq!(keys.position(&PlayerKey(9)), Some(PlayerId::P1));
        assert_eq!(keys.position(&PlayerKey(1)), None);
    }

    #[test]
    fn test_pair_map() {
        let pair = PlayerPair::new(2, 3);
        let doubled = pair.map(|_, v| v * 2);
        assert_eq!(doubled, PlayerPair::new(4, 6));
    }

    #[test]
    fn test_pair_serialization() {
        let pair = PlayerPair::new(1u8, 2u8);
        let json = serde_json::to_string(&pair).unwrap();
        let back: PlayerPair<u8> = serde_json::from_str(&json).unwrap();
        assert_eq!(pair, back);
    }
}
