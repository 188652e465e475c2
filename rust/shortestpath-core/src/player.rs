use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Game state the transport filter is evaluated against.
///
/// `values` holds skills, quest states and varbits keyed by name; item maps hold quantities by
/// item id.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerState {
    pub members: bool,
    pub values: BTreeMap<String, Value>,
    pub inventory: HashMap<i32, u32>,
    pub equipment: HashMap<i32, u32>,
    pub bank: HashMap<i32, u32>,
}

impl PlayerState {
    /// Looks a key up exactly first, then case-insensitively. Among keys differing only by case
    /// the first in byte order wins.
    pub fn value(&self, key: &str) -> Option<&Value> {
        let key = key.trim();
        self.values.get(key).or_else(|| {
            self.values
                .iter()
                .find(|(k, _)| k.trim().eq_ignore_ascii_case(key))
                .map(|(_, v)| v)
        })
    }

    /// Carried plus worn quantity of an item, and banked quantity when `include_bank` is set.
    pub fn item_count(&self, item_id: i32, include_bank: bool) -> u32 {
        let held = |m: &HashMap<i32, u32>| m.get(&item_id).copied().unwrap_or(0);
        let mut n = held(&self.inventory).saturating_add(held(&self.equipment));
        if include_bank {
            n = n.saturating_add(held(&self.bank));
        }
        n
    }
}
