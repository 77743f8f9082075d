//! Catalog of combatant definitions and per-player team storage.
//!
//! - `MonCatalog`: "is this roster entry a legal instance of a registered
//!   species?" Consulted by the validator at match start.
//! - `TeamProvider`: supplies a player's saved roster.
//!
//! `MonRegistry` and `TeamRegistry` are the in-memory implementations.

use rustc_hash::{FxHashMap, FxHashSet};

use super::definition::{Combatant, MonId, MonStats};
use crate::core::PlayerKey;

/// Validates roster entries against the current catalog.
pub trait MonCatalog: Send + Sync {
    fn validate_mon(&self, mon: &Combatant) -> bool;
}

/// Supplies saved rosters.
pub trait TeamProvider {
    fn team(&self, player: PlayerKey, team_index: usize) -> Option<Vec<Combatant>>;
}

/// A registered species: canonical stats and the moves/abilities it may use.
#[derive(Clone, Debug)]
pub struct MonDefinition {
    pub id: MonId,
    pub name: String,
    pub stats: MonStats,
    pub moves: FxHashSet<String>,
    pub abilities: FxHashSet<String>,
}

impl MonDefinition {
    pub fn new(id: MonId, name: impl Into<String>, stats: MonStats) -> Self {
        Self {
            id,
            name: name.into(),
            stats,
            moves: FxHashSet::default(),
            abilities: FxHashSet::default(),
        }
    }

    /// Permit a move by name (builder pattern).
    #[must_use]
    pub fn with_move(mut self, name: impl Into<String>) -> Self {
        self.moves.insert(name.into());
        self
    }

    /// Permit an ability by name (builder pattern).
    #[must_use]
    pub fn with_ability(mut self, name: impl Into<String>) -> Self {
        self.abilities.insert(name.into());
        self
    }
}

/// Registry of species definitions.
///
/// ## Example
///
/// ```
/// use monclash::mons::{Combatant, MonCatalog, MonDefinition, MonId, MonRegistry, MonStats};
///
/// let mut registry = MonRegistry::new();
/// registry.register(MonDefinition::new(MonId(1), "Pebblet", MonStats::default()));
///
/// let mon = Combatant::new(MonId(1), "Pebblet", MonStats::default());
/// assert!(registry.validate_mon(&mon));
///
/// let stranger = Combatant::new(MonId(2), "Ghost", MonStats::default());
/// assert!(!registry.validate_mon(&stranger));
/// ```
#[derive(Clone, Debug, Default)]
pub struct MonRegistry {
    mons: FxHashMap<MonId, MonDefinition>,
}

impl MonRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition.
    ///
    /// Panics if a definition with the same ID already exists.
    pub fn register(&mut self, definition: MonDefinition) {
        if self.mons.contains_key(&definition.id) {
            panic!("Mon with ID {:?} already registered", definition.id);
        }
        self.mons.insert(definition.id, definition);
    }

    #[must_use]
    pub fn get(&self, id: MonId) -> Option<&MonDefinition> {
        self.mons.get(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.mons.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mons.is_empty()
    }
}

impl MonCatalog for MonRegistry {
    fn validate_mon(&self, mon: &Combatant) -> bool {
        let Some(definition) = self.mons.get(&mon.id) else {
            return false;
        };
        if definition.stats != mon.stats {
            return false;
        }
        if !mon.moves.iter().all(|m| definition.moves.contains(m.name())) {
            return false;
        }
        mon.ability
            .as_ref()
            .map_or(true, |a| definition.abilities.contains(a.name()))
    }
}

/// Saved rosters keyed by owner and team index.
#[derive(Clone, Debug, Default)]
pub struct TeamRegistry {
    teams: FxHashMap<(PlayerKey, usize), Vec<Combatant>>,
}

impl TeamRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store (or replace) a team.
    pub fn save(&mut self, player: PlayerKey, team_index: usize, team: Vec<Combatant>) {
        self.teams.insert((player, team_index), team);
    }

    /// Number of teams saved for a player.
    #[must_use]
    pub fn team_count(&self, player: PlayerKey) -> usize {
        self.teams.keys().filter(|(p, _)| *p == player).count()
    }
}

impl TeamProvider for TeamRegistry {
    fn team(&self, player: PlayerKey, team_index: usize) -> Option<Vec<Combatant>> {
        self.teams.get(&(player, team_index)).cloned()
    }
}
