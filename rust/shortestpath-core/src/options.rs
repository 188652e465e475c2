use serde::{Deserialize, Serialize};

use crate::transport::TransportKind;

/// Game tick length in milliseconds.
pub const TICK_MS: u64 = 600;
/// Default time a search keeps going after its last improvement: five ticks.
pub const DEFAULT_CALCULATION_CUTOFF_MS: u64 = 5 * TICK_MS;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathfinderSettings {
    pub avoid_wilderness: bool,

    pub use_agility_shortcuts: bool,
    pub use_grapple_shortcuts: bool,
    pub use_boats: bool,
    pub use_canoes: bool,
    pub use_charter_ships: bool,
    pub use_ships: bool,
    pub use_fairy_rings: bool,
    pub use_gnome_gliders: bool,
    pub use_spirit_trees: bool,
    pub use_teleportation_levers: bool,
    pub use_teleportation_portals: bool,
    pub use_teleportation_spells: bool,
    pub use_teleportation_items: bool,
    pub use_teleportation_minigames: bool,
    pub use_quetzals: bool,
    pub use_wilderness_obelisks: bool,

    pub include_bank_items: bool,
    pub calculation_cutoff_ms: u64,
}

impl Default for PathfinderSettings {
    fn default() -> Self {
        Self {
            avoid_wilderness: true,
            use_agility_shortcuts: true,
            use_grapple_shortcuts: false,
            use_boats: true,
            use_canoes: false,
            use_charter_ships: false,
            use_ships: true,
            use_fairy_rings: true,
            use_gnome_gliders: true,
            use_spirit_trees: true,
            use_teleportation_levers: true,
            use_teleportation_portals: true,
            use_teleportation_spells: true,
            use_teleportation_items: false,
            use_teleportation_minigames: true,
            use_quetzals: true,
            use_wilderness_obelisks: true,
            include_bank_items: false,
            calculation_cutoff_ms: DEFAULT_CALCULATION_CUTOFF_MS,
        }
    }
}

impl PathfinderSettings {
    /// Whether transports of `kind` may be used at all. Plain transports (stairs, doors,
    /// ladders) are always enabled.
    pub fn allows(&self, kind: TransportKind) -> bool {
        match kind {
            TransportKind::Transport => true,
            TransportKind::AgilityShortcut => self.use_agility_shortcuts,
            TransportKind::GrappleShortcut => self.use_grapple_shortcuts,
            TransportKind::Boat => self.use_boats,
            TransportKind::Canoe => self.use_canoes,
            TransportKind::CharterShip => self.use_charter_ships,
            TransportKind::Ship => self.use_ships,
            TransportKind::FairyRing => self.use_fairy_rings,
            TransportKind::GnomeGlider => self.use_gnome_gliders,
            TransportKind::SpiritTree => self.use_spirit_trees,
            TransportKind::TeleportationLever => self.use_teleportation_levers,
            TransportKind::TeleportationPortal => self.use_teleportation_portals,
            TransportKind::TeleportationSpell => self.use_teleportation_spells,
            TransportKind::TeleportationItem => self.use_teleportation_items,
            TransportKind::TeleportationMinigame => self.use_teleportation_minigames,
            TransportKind::Quetzal => self.use_quetzals,
            TransportKind::WildernessObelisk => self.use_wilderness_obelisks,
        }
    }
}
