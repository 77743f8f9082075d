//! Bit-packed per-match state words.
//!
//! ## Layout
//!
//! - `ActiveSlots` (u16): 4 bits per (player, slot), at bit
//!   `(player * 2 + slot) * 4`. Value = roster position currently fielded.
//! - `KoBitmaps` (u16): low byte is P0's bitmap, high byte is P1's.
//!   Bit *i* set means roster position *i* is knocked out.
//! - `SlotFlags` (u8): bits 0..=3 are per (player, slot) switch-required
//!   flags at bit `player * 2 + slot`; bit 4 is the game mode
//!   (set = doubles).
//!
//! All-zero words are the cleared state, so recycling a match slot resets
//! each word with a single store.

use serde::{Deserialize, Serialize};

use crate::core::{GameMode, PlayerId, MAX_TEAM_SIZE};

/// Active slots per side the packing reserves room for.
pub const MAX_ACTIVE_SLOTS: usize = 2;

const SLOT_BITS: u32 = 4;
const SLOT_MASK: u16 = 0x0F;
const GAME_MODE_BIT: u8 = 1 << 4;
const SWITCH_FLAGS_MASK: u8 = 0x0F;

#[inline]
fn slot_offset(player: PlayerId, slot: usize) -> u32 {
    debug_assert!(slot < MAX_ACTIVE_SLOTS, "slot out of range");
    (player.index() * MAX_ACTIVE_SLOTS + slot) as u32
}

/// Packed roster positions fielded in every active slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActiveSlots(u16);

impl ActiveSlots {
    /// Initial layout for a mode: slot *i* fields roster position *i*.
    #[must_use]
    pub fn initial(mode: GameMode) -> Self {
        let mut packed = Self::default();
        for player in PlayerId::both() {
            for slot in 0..mode.active_slots() {
                packed.set(player, slot, slot);
            }
        }
        packed
    }

    #[must_use]
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Roster position fielded in `(player, slot)`.
    #[must_use]
    pub fn get(self, player: PlayerId, slot: usize) -> usize {
        let shift = slot_offset(player, slot) * SLOT_BITS;
        ((self.0 >> shift) & SLOT_MASK) as usize
    }

    /// Field roster position `mon_index` in `(player, slot)`.
    pub fn set(&mut self, player: PlayerId, slot: usize, mon_index: usize) {
        debug_assert!(mon_index <= SLOT_MASK as usize, "mon index exceeds 4 bits");
        let shift = slot_offset(player, slot) * SLOT_BITS;
        self.0 = (self.0 & !(SLOT_MASK << shift)) | (((mon_index as u16) & SLOT_MASK) << shift);
    }

    /// Slot of `player` currently fielding `mon_index`, searching the first
    /// `active_slots` slots.
    #[must_use]
    pub fn slot_of(self, player: PlayerId, mon_index: usize, active_slots: usize) -> Option<usize> {
        (0..active_slots).find(|&slot| self.get(player, slot) == mon_index)
    }
}

/// Packed per-player knockout bitmaps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KoBitmaps(u16);

impl KoBitmaps {
    #[must_use]
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Bitmap of a single side.
    #[must_use]
    pub fn get(self, player: PlayerId) -> u8 {
        (self.0 >> (player.index() * 8)) as u8
    }

    /// Replace a side's bitmap.
    pub fn set(&mut self, player: PlayerId, bitmap: u8) {
        let shift = player.index() * 8;
        self.0 = (self.0 & !(0xFF << shift)) | ((bitmap as u16) << shift);
    }

    #[must_use]
    pub fn is_knocked_out(self, player: PlayerId, mon_index: usize) -> bool {
        mon_index < MAX_TEAM_SIZE && self.get(player) & (1 << mon_index) != 0
    }

    pub fn mark(&mut self, player: PlayerId, mon_index: usize, knocked_out: bool) {
        debug_assert!(mon_index < MAX_TEAM_SIZE, "mon index exceeds bitmap width");
        let bitmap = self.get(player);
        let bit = 1u8 << mon_index;
        let next = if knocked_out { bitmap | bit } else { bitmap & !bit };
        self.set(player, next);
    }

    /// Mask with one bit per roster position.
    #[must_use]
    pub fn full_mask(team_size: usize) -> u8 {
        debug_assert!(team_size <= MAX_TEAM_SIZE);
        if team_size >= 8 {
            u8::MAX
        } else {
            (1u8 << team_size) - 1
        }
    }

    /// Is every roster position of `player` knocked out?
    #[must_use]
    pub fn all_knocked_out(self, player: PlayerId, team_size: usize) -> bool {
        let mask = Self::full_mask(team_size);
        self.get(player) & mask == mask
    }
}

/// Packed switch-required flags and the game-mode bit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotFlags(u8);

impl SlotFlags {
    #[must_use]
    pub fn new(mode: GameMode) -> Self {
        let mut flags = Self::default();
        flags.set_mode(mode);
        flags
    }

    #[must_use]
    pub const fn from_raw(raw: u8) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn mode(self) -> GameMode {
        if self.0 & GAME_MODE_BIT != 0 {
            GameMode::Doubles
        } else {
            GameMode::Singles
        }
    }

    pub fn set_mode(&mut self, mode: GameMode) {
        match mode {
            GameMode::Singles => self.0 &= !GAME_MODE_BIT,
            GameMode::Doubles => self.0 |= GAME_MODE_BIT,
        }
    }

    #[must_use]
    pub fn switch_required(self, player: PlayerId, slot: usize) -> bool {
        self.0 & (1 << slot_offset(player, slot)) != 0
    }

    pub fn set_switch_required(&mut self, player: PlayerId, slot: usize, required: bool) {
        let bit = 1u8 << slot_offset(player, slot);
        if required {
            self.0 |= bit;
        } else {
            self.0 &= !bit;
        }
    }

    /// Does any slot of `player` have to switch?
    #[must_use]
    pub fn any_switch_required(self, player: PlayerId) -> bool {
        let shift = player.index() * MAX_ACTIVE_SLOTS;
        (self.0 >> shift) & 0b11 != 0
    }

    /// Clear every switch flag, keeping the mode bit.
    pub fn clear_switch_flags(&mut self) {
        self.0 &= !SWITCH_FLAGS_MASK;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn player_strategy() -> impl Strategy<Value = PlayerId> {
        prop_oneof![Just(PlayerId::P0), Just(PlayerId::P1)]
    }

    #[test]
    fn test_initial_active_slots() {
        let singles = ActiveSlots::initial(GameMode::Singles);
        assert_eq!(singles.raw(), 0);

        let doubles = ActiveSlots::initial(GameMode::Doubles);
        assert_eq!(doubles.get(PlayerId::P0, 0), 0);
        assert_eq!(doubles.get(PlayerId::P0, 1), 1);
        assert_eq!(doubles.get(PlayerId::P1, 0), 0);
        assert_eq!(doubles.get(PlayerId::P1, 1), 1);
        assert_eq!(doubles.slot_of(PlayerId::P1, 1, 2), Some(1));
        assert_eq!(doubles.slot_of(PlayerId::P1, 3, 2), None);
    }

    #[test]
    fn test_ko_full_mask() {
        assert_eq!(KoBitmaps::full_mask(1), 0b1);
        assert_eq!(KoBitmaps::full_mask(4), 0b1111);
        assert_eq!(KoBitmaps::full_mask(8), 0xFF);
    }

    #[test]
    fn test_all_knocked_out_ignores_bits_past_team() {
        let mut ko = KoBitmaps::default();
        ko.mark(PlayerId::P1, 0, true);
        ko.mark(PlayerId::P1, 1, true);
        assert!(ko.all_knocked_out(PlayerId::P1, 2));
        assert!(!ko.all_knocked_out(PlayerId::P1, 3));
        assert!(!ko.all_knocked_out(PlayerId::P0, 2));
    }

    #[test]
    fn test_slot_flags_mode_and_switch_share_word() {
        let mut flags = SlotFlags::new(GameMode::Doubles);
        flags.set_switch_required(PlayerId::P1, 1, true);
        assert_eq!(flags.mode(), GameMode::Doubles);
        assert!(flags.switch_required(PlayerId::P1, 1));
        assert!(flags.any_switch_required(PlayerId::P1));
        assert!(!flags.any_switch_required(PlayerId::P0));

        flags.clear_switch_flags();
        assert_eq!(flags.mode(), GameMode::Doubles);
        assert!(!flags.any_switch_required(PlayerId::P1));
    }

    proptest! {
        #[test]
        fn prop_active_slot_set_is_isolated(
            raw in any::<u16>(),
            player in player_strategy(),
            slot in 0usize..2,
            mon in 0usize..16,
        ) {
            let before = ActiveSlots::from_raw(raw);
            let mut after = before;
            after.set(player, slot, mon);
            prop_assert_eq!(after.get(player, slot), mon);
            for p in PlayerId::both() {
                for s in 0..2 {
                    if (p, s) != (player, slot) {
                        prop_assert_eq!(after.get(p, s), before.get(p, s));
                    }
                }
            }
        }

        #[test]
        fn prop_ko_mark_is_isolated(
            raw in any::<u16>(),
            player in player_strategy(),
            mon in 0usize..MAX_TEAM_SIZE,
            knocked_out in any::<bool>(),
        ) {
            let before = KoBitmaps::from_raw(raw);
            let mut after = before;
            after.mark(player, mon, knocked_out);
            prop_assert_eq!(after.is_knocked_out(player, mon), knocked_out);
            prop_assert_eq!(after.get(player.other()), before.get(player.other()));
        }

        #[test]
        fn prop_switch_flag_preserves_mode(
            doubles in any::<bool>(),
            player in player_strategy(),
            slot in 0usize..2,
            required in any::<bool>(),
        ) {
            let mode = if doubles { GameMode::Doubles } else { GameMode::Singles };
            let mut flags = SlotFlags::new(mode);
            flags.set_switch_required(player, slot, required);
            prop_assert_eq!(flags.mode(), mode);
            prop_assert_eq!(flags.switch_required(player, slot), required);
        }
    }
}
