//! Transport requirements evaluated against a [`PlayerState`].

use serde_json::Value;

use crate::player::PlayerState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison { Eq, Ne, Ge, Gt, Le, Lt }

impl Comparison {
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.trim() {
            "==" | "=" => Some(Comparison::Eq),
            "!=" => Some(Comparison::Ne),
            ">=" => Some(Comparison::Ge),
            ">" => Some(Comparison::Gt),
            "<=" => Some(Comparison::Le),
            "<" => Some(Comparison::Lt),
            _ => None,
        }
    }

    fn eval_num(self, lhs: f64, rhs: f64) -> bool {
        match self {
            Comparison::Eq => lhs == rhs,
            Comparison::Ne => lhs != rhs,
            Comparison::Ge => lhs >= rhs,
            Comparison::Gt => lhs > rhs,
            Comparison::Le => lhs <= rhs,
            Comparison::Lt => lhs < rhs,
        }
    }
}

/// `key <comparison> value`, e.g. `agility >= 52` or `quest_state == done`.
#[derive(Debug, Clone, PartialEq)]
pub struct Requirement {
    pub key: String,
    pub comparison: Comparison,
    pub value: String,
}

impl Requirement {
    pub fn new(key: impl Into<String>, comparison: Comparison, value: impl Into<String>) -> Self {
        Self { key: key.into(), comparison, value: value.into() }
    }

    /// Numeric comparison when both sides parse as numbers; otherwise only `==`/`!=` on
    /// case-insensitive strings. A key the player does not report is unsatisfied.
    pub fn is_satisfied(&self, player: &PlayerState) -> bool {
        let Some(actual) = player.value(&self.key) else { return false };
        let rhs = self.value.trim();
        if let (Some(lhs), Ok(rhs)) = (as_number(actual), rhs.parse::<f64>()) {
            return self.comparison.eval_num(lhs, rhs);
        }
        let Some(lhs) = as_text(actual) else { return false };
        match self.comparison {
            Comparison::Eq => lhs.trim().eq_ignore_ascii_case(rhs),
            Comparison::Ne => !lhs.trim().eq_ignore_ascii_case(rhs),
            _ => false,
        }
    }
}

fn as_number(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// One item group of a transport: any listed variant at `quantity`, or any listed staff or
/// offhand that provides the item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemRequirement {
    pub variants: Vec<i32>,
    pub staves: Vec<i32>,
    pub offhands: Vec<i32>,
    pub quantity: u32,
}

impl ItemRequirement {
    pub fn is_satisfied(&self, player: &PlayerState, include_bank: bool) -> bool {
        let quantity = self.quantity.max(1);
        self.variants.iter().any(|&id| player.item_count(id, include_bank) >= quantity)
            || self.staves.iter().chain(&self.offhands).any(|&id| player.item_count(id, include_bank) > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn player() -> PlayerState {
        serde_json::from_value(json!({
            "members": true,
            "values": {
                "agility": 52,
                "varbit_38": "1",
                "Quest_State": "done",
                "account": "normal"
            },
            "inventory": { "563": 2, "556": 10 },
            "equipment": { "1381": 1 },
            "bank": { "995": 1000 }
        }))
        .unwrap()
    }

    #[test]
    fn numeric_and_string_eval() {
        let p = player();
        let sat = |k: &str, c: &str, v: &str| Requirement::new(k, Comparison::from_db_str(c).unwrap(), v).is_satisfied(&p);
        assert!(sat("agility", ">=", "52"));
        assert!(!sat("agility", ">", "52"));
        assert!(sat("agility", "<", "60"));
        assert!(sat("varbit_38", "==", "1"));
        assert!(sat("quest_state", "=", "DONE"));
        assert!(sat("account", "!=", "ironman"));
    }

    #[test]
    fn unsatisfied_cases() {
        let p = player();
        // missing key
        assert!(!Requirement::new("coins", Comparison::Ge, "1").is_satisfied(&p));
        // ordering on strings is never satisfied
        assert!(!Requirement::new("account", Comparison::Ge, "a").is_satisfied(&p));
        assert!(!Requirement::new("account", Comparison::Ne, "Normal").is_satisfied(&p));
        assert_eq!(Comparison::from_db_str("~="), None);
    }

    #[test]
    fn item_groups_accept_any_variant_or_staff() {
        let p = player();
        let law = ItemRequirement { variants: vec![563], quantity: 1, ..Default::default() };
        assert!(law.is_satisfied(&p, false));
        let many_laws = ItemRequirement { variants: vec![563], quantity: 3, ..Default::default() };
        assert!(!many_laws.is_satisfied(&p, false));
        // air runes: not enough in inventory, but an air staff is equipped
        let air = ItemRequirement { variants: vec![556], staves: vec![1381], quantity: 20, ..Default::default() };
        assert!(air.is_satisfied(&p, false));
        let coins = ItemRequirement { variants: vec![995], quantity: 500, ..Default::default() };
        assert!(!coins.is_satisfied(&p, false));
        assert!(coins.is_satisfied(&p, true));
    }
}
