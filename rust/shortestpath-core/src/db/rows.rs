use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRow {
    pub x: i32,
    pub y: i32,
    pub plane: i32,
    pub tiledata: Option<i64>,
    pub allowed_directions: Option<String>,
    pub blocked_directions: Option<String>,
}

/// Origin columns are either all set or, for teleport kinds, all NULL.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportRow {
    pub id: i64,
    pub kind: String,
    pub origin_x: Option<i32>,
    pub origin_y: Option<i32>,
    pub origin_plane: Option<i32>,
    pub dest_x: i32,
    pub dest_y: i32,
    pub dest_plane: i32,
    pub duration: Option<i64>,
    pub max_wilderness_level: Option<i32>,
    pub members: Option<bool>,
    pub display_info: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportRequirementRow {
    pub transport_id: i64,
    pub key: String,
    pub comparison: String,
    pub value: String,
}

/// `role` is `item` (default), `staff` or `offhand`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportItemRow {
    pub transport_id: i64,
    pub group_index: i64,
    pub item_id: i32,
    pub role: Option<String>,
    pub quantity: Option<i64>,
}
