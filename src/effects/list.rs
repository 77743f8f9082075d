//! Per-target effect storage.
//!
//! Lists are append-only persistent vectors. Removal tombstones an entry
//! instead of shifting the tail, so an index handed to a callback stays
//! valid for the rest of the pass and effects appended mid-pass are seen
//! by iteration that re-reads the length.

use std::sync::Arc;

use im::Vector;

use super::effect::{Effect, EffectTarget};
use crate::core::{PlayerPair, MAX_TEAM_SIZE};

/// One attached effect.
#[derive(Clone)]
pub struct EffectSlot {
    pub effect: Arc<dyn Effect>,
    pub data: u64,
    pub removed: bool,
}

impl std::fmt::Debug for EffectSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectSlot")
            .field("effect", &self.effect.name())
            .field("data", &self.data)
            .field("removed", &self.removed)
            .finish()
    }
}

/// Read-only summary of a live effect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EffectInfo {
    pub index: usize,
    pub name: String,
    pub data: u64,
}

/// Effects attached to one target, in insertion order.
#[derive(Clone, Debug, Default)]
pub struct EffectList {
    entries: Vector<EffectSlot>,
}

impl EffectList {
    /// Total entries including tombstones. Grows during a pass when effects
    /// are appended.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&EffectSlot> {
        self.entries.get(index)
    }

    /// Live (non-tombstoned) entry at `index`.
    #[must_use]
    pub fn live(&self, index: usize) -> Option<&EffectSlot> {
        self.entries.get(index).filter(|slot| !slot.removed)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut EffectSlot> {
        self.entries.get_mut(index)
    }

    pub(crate) fn push(&mut self, effect: Arc<dyn Effect>, data: u64) -> usize {
        self.entries.push_back(EffectSlot {
            effect,
            data,
            removed: false,
        });
        self.entries.len() - 1
    }

    #[must_use]
    pub fn live_count(&self) -> usize {
        self.entries.iter().filter(|slot| !slot.removed).count()
    }

    /// Summaries of live entries.
    #[must_use]
    pub fn infos(&self) -> Vec<EffectInfo> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, slot)| !slot.removed)
            .map(|(index, slot)| EffectInfo {
                index,
                name: slot.effect.name().to_string(),
                data: slot.data,
            })
            .collect()
    }
}

/// Global list plus one list per roster position of each side.
#[derive(Clone, Debug)]
pub struct EffectTable {
    global: EffectList,
    mons: PlayerPair<Vector<EffectList>>,
}

impl Default for EffectTable {
    fn default() -> Self {
        Self {
            global: EffectList::default(),
            mons: PlayerPair::from_fn(|_| {
                std::iter::repeat(EffectList::default())
                    .take(MAX_TEAM_SIZE)
                    .collect()
            }),
        }
    }
}

impl EffectTable {
    /// List for a target; `None` for an out-of-range roster position.
    #[must_use]
    pub fn list(&self, target: EffectTarget) -> Option<&EffectList> {
        match target {
            EffectTarget::Global => Some(&self.global),
            EffectTarget::Mon { player, mon_index } => self.mons[player].get(mon_index),
        }
    }

    pub(crate) fn list_mut(&mut self, target: EffectTarget) -> Option<&mut EffectList> {
        match target {
            EffectTarget::Global => Some(&mut self.global),
            EffectTarget::Mon { player, mon_index } => self.mons[player].get_mut(mon_index),
        }
    }

    /// Does any target hold a live effect?
    #[must_use]
    pub fn is_clear(&self) -> bool {
        self.global.live_count() == 0
            && self
                .mons
                .iter()
                .all(|(_, lists)| lists.iter().all(|list| list.live_count() == 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::CountdownEffect;
    use crate::core::PlayerId;

    #[test]
    fn test_push_and_tombstone() {
        let mut list = EffectList::default();
        let a = list.push(Arc::new(CountdownEffect), 3);
        let b = list.push(Arc::new(CountdownEffect), 1);
        assert_eq!((a, b), (0, 1));

        if let Some(slot) = list.get_mut(a) {
            slot.removed = true;
        }
        assert!(list.live(a).is_none());
        assert_eq!(list.live(b).map(|s| s.data), Some(1));
        assert_eq!(list.len(), 2);
        assert_eq!(list.live_count(), 1);
        assert_eq!(list.infos()[0].index, 1);
    }

    #[test]
    fn test_table_targets() {
        let mut table = EffectTable::default();
        assert!(table.is_clear());

        let target = EffectTarget::mon(PlayerId::P1, 2);
        if let Some(list) = table.list_mut(target) {
            list.push(Arc::new(CountdownEffect), 2);
        }
        assert!(!table.is_clear());
        assert_eq!(table.list(target).map(EffectList::live_count), Some(1));
        assert_eq!(
            table.list(EffectTarget::mon(PlayerId::P0, 2)).map(EffectList::live_count),
            Some(0)
        );
        assert!(table.list(EffectTarget::mon(PlayerId::P0, MAX_TEAM_SIZE)).is_none());
    }
}
