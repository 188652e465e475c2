//! Transport definitions and the catalog loaded from SQLite.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::db::rows::{TransportItemRow, TransportRequirementRow, TransportRow};
use crate::db::Database;
use crate::error::LoadError;
use crate::point::PackedPoint;
use crate::requirements::{Comparison, ItemRequirement, Requirement};

/// Default restriction level for teleports that do not state one.
pub const DEFAULT_MAX_WILDERNESS_LEVEL: i32 = 20;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportKind {
    Transport,
    AgilityShortcut,
    GrappleShortcut,
    Boat,
    Canoe,
    CharterShip,
    Ship,
    FairyRing,
    GnomeGlider,
    SpiritTree,
    TeleportationLever,
    TeleportationPortal,
    TeleportationSpell,
    TeleportationItem,
    TeleportationMinigame,
    Quetzal,
    WildernessObelisk,
}

impl TransportKind {
    pub const ALL: [TransportKind; 17] = [
        TransportKind::Transport,
        TransportKind::AgilityShortcut,
        TransportKind::GrappleShortcut,
        TransportKind::Boat,
        TransportKind::Canoe,
        TransportKind::CharterShip,
        TransportKind::Ship,
        TransportKind::FairyRing,
        TransportKind::GnomeGlider,
        TransportKind::SpiritTree,
        TransportKind::TeleportationLever,
        TransportKind::TeleportationPortal,
        TransportKind::TeleportationSpell,
        TransportKind::TeleportationItem,
        TransportKind::TeleportationMinigame,
        TransportKind::Quetzal,
        TransportKind::WildernessObelisk,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TransportKind::Transport => "transport",
            TransportKind::AgilityShortcut => "agility_shortcut",
            TransportKind::GrappleShortcut => "grapple_shortcut",
            TransportKind::Boat => "boat",
            TransportKind::Canoe => "canoe",
            TransportKind::CharterShip => "charter_ship",
            TransportKind::Ship => "ship",
            TransportKind::FairyRing => "fairy_ring",
            TransportKind::GnomeGlider => "gnome_glider",
            TransportKind::SpiritTree => "spirit_tree",
            TransportKind::TeleportationLever => "teleportation_lever",
            TransportKind::TeleportationPortal => "teleportation_portal",
            TransportKind::TeleportationSpell => "teleportation_spell",
            TransportKind::TeleportationItem => "teleportation_item",
            TransportKind::TeleportationMinigame => "teleportation_minigame",
            TransportKind::Quetzal => "quetzal",
            TransportKind::WildernessObelisk => "wilderness_obelisk",
        }
    }

    /// Accepts `fairy_ring`, `FAIRY_RING`, `fairy ring` and `fairy-ring`.
    pub fn from_db_str(s: &str) -> Option<Self> {
        let norm = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        TransportKind::ALL.iter().copied().find(|k| k.as_str() == norm)
    }

    /// Kinds that may be used from anywhere (no origin tile).
    pub fn is_teleport(self) -> bool {
        matches!(
            self,
            TransportKind::TeleportationSpell | TransportKind::TeleportationItem | TransportKind::TeleportationMinigame
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Transport {
    /// `None` for teleports usable from anywhere.
    pub origin: Option<PackedPoint>,
    pub destination: PackedPoint,
    pub kind: TransportKind,
    /// Travel time in ticks.
    pub duration: u32,
    pub max_wilderness_level: i32,
    pub members: bool,
    pub requirements: Vec<Requirement>,
    pub items: Vec<ItemRequirement>,
    pub display_info: Option<String>,
}

impl Transport {
    pub fn new(origin: Option<PackedPoint>, destination: PackedPoint, kind: TransportKind, duration: u32) -> Self {
        Self {
            origin,
            destination,
            kind,
            duration,
            max_wilderness_level: DEFAULT_MAX_WILDERNESS_LEVEL,
            members: false,
            requirements: Vec::new(),
            items: Vec::new(),
            display_info: None,
        }
    }

    pub fn with_max_wilderness_level(mut self, level: i32) -> Self {
        self.max_wilderness_level = level;
        self
    }

    pub fn members_only(mut self) -> Self {
        self.members = true;
        self
    }

    pub fn with_requirement(mut self, requirement: Requirement) -> Self {
        self.requirements.push(requirement);
        self
    }

    pub fn with_items(mut self, items: ItemRequirement) -> Self {
        self.items.push(items);
        self
    }

    /// The edge this transport contributes when taken from `from`.
    pub fn edge_from(&self, from: PackedPoint) -> TransportEdge {
        TransportEdge {
            origin: Some(from),
            destination: self.destination,
            travel_time: self.duration,
            kind: self.kind,
        }
    }
}

/// A usable transport as seen by the search: where it leads and what it costs.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TransportEdge {
    pub origin: Option<PackedPoint>,
    pub destination: PackedPoint,
    pub travel_time: u32,
    pub kind: TransportKind,
}

/// Every known transport: fixed ones indexed by origin, teleports kept separately.
#[derive(Debug, Default)]
pub struct TransportCatalog {
    by_origin: FxHashMap<PackedPoint, Vec<Transport>>,
    teleports: Vec<Transport>,
}

impl TransportCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, transport: Transport) {
        match transport.origin {
            Some(origin) => self.by_origin.entry(origin).or_default().push(transport),
            None => self.teleports.push(transport),
        }
    }

    pub fn with(mut self, transport: Transport) -> Self {
        self.insert(transport);
        self
    }

    pub fn len(&self) -> usize {
        self.by_origin.values().map(Vec::len).sum::<usize>() + self.teleports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn from_origin(&self, origin: PackedPoint) -> &[Transport] {
        self.by_origin.get(&origin).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn origins(&self) -> impl Iterator<Item = (&PackedPoint, &Vec<Transport>)> {
        self.by_origin.iter()
    }

    pub fn teleports(&self) -> &[Transport] {
        &self.teleports
    }

    /// Loads `transports` together with their `transport_requirements` and `transport_items`.
    /// Missing requirement or item tables mean "no requirements".
    pub fn from_database(db: &Database) -> Result<Self, LoadError> {
        let mut requirements: FxHashMap<i64, Vec<Requirement>> = FxHashMap::default();
        for row in db.iter_transport_requirements()? {
            let (id, req) = requirement_from_row(row)?;
            requirements.entry(id).or_default().push(req);
        }

        let mut items: FxHashMap<i64, BTreeMap<i64, ItemRequirement>> = FxHashMap::default();
        for row in db.iter_transport_items()? {
            add_item_row(&mut items, row)?;
        }

        let mut catalog = TransportCatalog::new();
        for row in db.iter_transports()? {
            let id = row.id;
            let mut transport = transport_from_row(row)?;
            transport.requirements = requirements.remove(&id).unwrap_or_default();
            transport.items = items.remove(&id).map(|groups| groups.into_values().collect()).unwrap_or_default();
            catalog.insert(transport);
        }
        debug!(
            transports = catalog.len(),
            teleports = catalog.teleports.len(),
            origins = catalog.by_origin.len(),
            "loaded transport catalog"
        );
        Ok(catalog)
    }
}

fn point(x: i32, y: i32, plane: i32) -> Result<PackedPoint, LoadError> {
    PackedPoint::new(x, y, plane).ok_or(LoadError::InvalidTile { x, y, plane })
}

fn to_u32(id: i64, column: &'static str, value: i64) -> Result<u32, LoadError> {
    u32::try_from(value).map_err(|_| LoadError::OutOfRange { id, column, value })
}

fn transport_from_row(row: TransportRow) -> Result<Transport, LoadError> {
    let kind = TransportKind::from_db_str(&row.kind).ok_or_else(|| LoadError::InvalidTransportKind(row.kind.clone()))?;
    let origin = match (row.origin_x, row.origin_y, row.origin_plane) {
        (Some(x), Some(y), Some(plane)) => Some(point(x, y, plane)?),
        (None, None, None) if kind.is_teleport() => None,
        (None, None, None) => return Err(LoadError::MissingOrigin { id: row.id, kind: kind.as_str() }),
        _ => return Err(LoadError::PartialOrigin { id: row.id }),
    };
    Ok(Transport {
        origin,
        destination: point(row.dest_x, row.dest_y, row.dest_plane)?,
        kind,
        duration: to_u32(row.id, "duration", row.duration.unwrap_or(0))?,
        max_wilderness_level: row.max_wilderness_level.unwrap_or(DEFAULT_MAX_WILDERNESS_LEVEL),
        members: row.members.unwrap_or(false),
        requirements: Vec::new(),
        items: Vec::new(),
        display_info: row.display_info,
    })
}

fn requirement_from_row(row: TransportRequirementRow) -> Result<(i64, Requirement), LoadError> {
    let comparison = Comparison::from_db_str(&row.comparison).ok_or_else(|| LoadError::InvalidComparison {
        key: row.key.clone(),
        comparison: row.comparison.clone(),
    })?;
    Ok((row.transport_id, Requirement::new(row.key, comparison, row.value)))
}

/// Groups are kept in `group_index` order; indices need not be contiguous.
fn add_item_row(
    items: &mut FxHashMap<i64, BTreeMap<i64, ItemRequirement>>,
    row: TransportItemRow,
) -> Result<(), LoadError> {
    let quantity = row.quantity.map(|q| to_u32(row.transport_id, "quantity", q)).transpose()?;
    let group = items.entry(row.transport_id).or_default().entry(row.group_index).or_default();
    match row.role.as_deref().map(str::trim) {
        Some("staff") => group.staves.push(row.item_id),
        Some("offhand") => group.offhands.push(row.item_id),
        _ => group.variants.push(row.item_id),
    }
    if let Some(q) = quantity {
        group.quantity = group.quantity.max(q);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::packed;

    #[test]
    fn kind_parsing_accepts_common_spellings() {
        assert_eq!(TransportKind::from_db_str("FAIRY_RING"), Some(TransportKind::FairyRing));
        assert_eq!(TransportKind::from_db_str("spirit tree"), Some(TransportKind::SpiritTree));
        assert_eq!(TransportKind::from_db_str("teleportation-spell"), Some(TransportKind::TeleportationSpell));
        assert_eq!(TransportKind::from_db_str("hot air balloon"), None);
        for k in TransportKind::ALL {
            assert_eq!(TransportKind::from_db_str(k.as_str()), Some(k));
        }
    }

    #[test]
    fn catalog_separates_teleports() {
        let home = packed(3200, 3200, 0);
        let catalog = TransportCatalog::new()
            .with(Transport::new(Some(home), packed(3300, 3300, 0), TransportKind::Boat, 10))
            .with(Transport::new(Some(home), packed(3400, 3400, 0), TransportKind::Ship, 20))
            .with(Transport::new(None, packed(3222, 3218, 0), TransportKind::TeleportationSpell, 4));
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.from_origin(home).len(), 2);
        assert_eq!(catalog.teleports().len(), 1);
        assert!(catalog.from_origin(packed(1, 1, 0)).is_empty());
    }

    #[test]
    fn item_rows_build_groups() {
        let mut items = FxHashMap::default();
        let row = |group_index, item_id, role: Option<&str>, quantity| TransportItemRow {
            transport_id: 7,
            group_index,
            item_id,
            role: role.map(str::to_string),
            quantity,
        };
        add_item_row(&mut items, row(9, 563, None, Some(1))).unwrap();
        add_item_row(&mut items, row(0, 556, None, Some(3))).unwrap();
        add_item_row(&mut items, row(0, 4697, None, Some(3))).unwrap();
        add_item_row(&mut items, row(0, 1381, Some("staff"), None)).unwrap();
        let groups: Vec<&ItemRequirement> = items[&7].values().collect();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].variants, vec![556, 4697]);
        assert_eq!(groups[0].staves, vec![1381]);
        assert_eq!(groups[0].quantity, 3);
        assert_eq!(groups[1].variants, vec![563]);

        let huge = add_item_row(&mut items, row(i64::MAX, 563, None, Some(1)));
        assert!(huge.is_ok());
        let err = add_item_row(&mut items, row(1, 563, None, Some(-1))).unwrap_err();
        assert!(matches!(err, LoadError::OutOfRange { id: 7, column: "quantity", value: -1 }));
        let err = add_item_row(&mut items, row(1, 563, None, Some(i64::from(u32::MAX) + 1))).unwrap_err();
        assert!(matches!(err, LoadError::OutOfRange { column: "quantity", .. }));
    }

    fn transport_row(kind: &str, origin: (Option<i32>, Option<i32>, Option<i32>), duration: Option<i64>) -> TransportRow {
        TransportRow {
            id: 3,
            kind: kind.to_string(),
            origin_x: origin.0,
            origin_y: origin.1,
            origin_plane: origin.2,
            dest_x: 3400,
            dest_y: 3400,
            dest_plane: 0,
            duration,
            max_wilderness_level: None,
            members: None,
            display_info: None,
        }
    }

    #[test]
    fn origins_must_be_complete_and_only_teleports_may_omit_them() {
        let fixed = transport_from_row(transport_row("boat", (Some(3300), Some(3300), Some(0)), Some(5))).unwrap();
        assert_eq!(fixed.origin, Some(packed(3300, 3300, 0)));
        let spell = transport_from_row(transport_row("teleportation_spell", (None, None, None), Some(4))).unwrap();
        assert_eq!(spell.origin, None);

        let err = transport_from_row(transport_row("boat", (Some(3300), Some(3300), None), Some(5))).unwrap_err();
        assert!(matches!(err, LoadError::PartialOrigin { id: 3 }));
        let err = transport_from_row(transport_row("teleportation_spell", (None, Some(3300), None), Some(5))).unwrap_err();
        assert!(matches!(err, LoadError::PartialOrigin { id: 3 }));
        let err = transport_from_row(transport_row("boat", (None, None, None), Some(5))).unwrap_err();
        assert!(matches!(err, LoadError::MissingOrigin { id: 3, kind: "boat" }));
    }

    #[test]
    fn durations_outside_u32_are_rejected() {
        let origin = (Some(3300), Some(3300), Some(0));
        assert_eq!(transport_from_row(transport_row("boat", origin, None)).unwrap().duration, 0);
        let err = transport_from_row(transport_row("boat", origin, Some(-2))).unwrap_err();
        assert!(matches!(err, LoadError::OutOfRange { id: 3, column: "duration", value: -2 }));
        let err = transport_from_row(transport_row("boat", origin, Some(i64::MAX))).unwrap_err();
        assert!(matches!(err, LoadError::OutOfRange { column: "duration", .. }));
    }
}
