//! Combatant definitions.
//!
//! A `Combatant` is the immutable per-match description of one roster
//! entry: base stats, type pair, passive ability and move list. Moves and
//! abilities are strategy objects shared by reference.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::core::{ElementType, MonStateIndex};
use crate::moves::{Ability, Move};

/// Catalog identifier of a combatant species.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonId(pub u32);

impl std::fmt::Display for MonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Mon({})", self.0)
    }
}

/// Base stats and types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonStats {
    pub hp: u32,
    pub stamina: u32,
    pub speed: u32,
    pub attack: u32,
    pub defense: u32,
    pub special_attack: u32,
    pub special_defense: u32,
    pub type1: ElementType,
    pub type2: ElementType,
}

impl Default for MonStats {
    fn default() -> Self {
        Self {
            hp: 100,
            stamina: 5,
            speed: 50,
            attack: 50,
            defense: 50,
            special_attack: 50,
            special_defense: 50,
            type1: ElementType::None,
            type2: ElementType::None,
        }
    }
}

impl MonStats {
    /// Base value of a delta stat. Flags have no base and read as 0.
    #[must_use]
    pub fn base(&self, stat: MonStateIndex) -> i32 {
        let value = match stat {
            MonStateIndex::Hp => self.hp,
            MonStateIndex::Stamina => self.stamina,
            MonStateIndex::Speed => self.speed,
            MonStateIndex::Attack => self.attack,
            MonStateIndex::Defense => self.defense,
            MonStateIndex::SpecialAttack => self.special_attack,
            MonStateIndex::SpecialDefense => self.special_defense,
            MonStateIndex::IsKnockedOut | MonStateIndex::ShouldSkipTurn => 0,
        };
        i32::try_from(value).unwrap_or(i32::MAX)
    }

    #[must_use]
    pub fn with_hp(mut self, hp: u32) -> Self {
        self.hp = hp;
        self
    }

    #[must_use]
    pub fn with_speed(mut self, speed: u32) -> Self {
        self.speed = speed;
        self
    }

    #[must_use]
    pub fn with_stamina(mut self, stamina: u32) -> Self {
        self.stamina = stamina;
        self
    }

    #[must_use]
    pub fn with_types(mut self, type1: ElementType, type2: ElementType) -> Self {
        self.type1 = type1;
        self.type2 = type2;
        self
    }
}

/// One roster entry.
#[derive(Clone)]
pub struct Combatant {
    pub id: MonId,
    pub name: String,
    pub stats: MonStats,
    pub ability: Option<Arc<dyn Ability>>,
    pub moves: Vec<Arc<dyn Move>>,
}

impl Combatant {
    pub fn new(id: MonId, name: impl Into<String>, stats: MonStats) -> Self {
        Self {
            id,
            name: name.into(),
            stats,
            ability: None,
            moves: Vec::new(),
        }
    }

    /// Append a move (builder pattern).
    #[must_use]
    pub fn with_move(mut self, mv: Arc<dyn Move>) -> Self {
        self.moves.push(mv);
        self
    }

    /// Set the passive ability (builder pattern).
    #[must_use]
    pub fn with_ability(mut self, ability: Arc<dyn Ability>) -> Self {
        self.ability = Some(ability);
        self
    }

    #[must_use]
    pub fn move_at(&self, index: usize) -> Option<&Arc<dyn Move>> {
        self.moves.get(index)
    }
}

impl std::fmt::Debug for Combatant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Combatant")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("stats", &self.stats)
            .field("ability", &self.ability.as_ref().map(|a| a.name().to_string()))
            .field(
                "moves",
                &self.moves.iter().map(|m| m.name().to_string()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
