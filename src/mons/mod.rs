//! Combatant definitions, the species catalog and saved teams.

mod definition;
mod registry;

pub use definition::{Combatant, MonId, MonStats};
pub use registry::{MonCatalog, MonDefinition, MonRegistry, TeamProvider, TeamRegistry};
