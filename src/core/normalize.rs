// canonicalization of user/url supplied identifiers
//
// Both functions are pure and total: anything that cannot be resolved comes back as
// `None` (nightlords) or unchanged (slots) and the engine decides what to do with it.
use crate::core::catalog::{Nightlord, SeedCatalog};
use crate::core::types::{NightlordKey, SlotId, RESERVED_EVENT, RESERVED_NIGHTLORD};

//lowercase alphanumerics only, so "Gaping-Jaw", "gaping jaw" and "GAPINGJAW" collide
fn fold(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Resolve free text to a canonical nightlord key.
///
/// Tried in order:
/// 1) exact canonical key
/// 2) folded match against canonical keys
/// 3) folded match against display names
/// 4) folded match against the name portion of the keys
pub fn normalize_nightlord(nightlords: &[Nightlord], input: &str) -> Option<NightlordKey> {
    if let Some(n) = nightlords.iter().find(|n| n.key.as_str() == input) {
        return Some(n.key.clone());
    }

    let wanted = fold(input);
    if wanted.is_empty() {
        return None;
    }

    nightlords
        .iter()
        .find(|n| fold(n.key.as_str()) == wanted)
        .or_else(|| nightlords.iter().find(|n| fold(&n.name) == wanted))
        .or_else(|| nightlords.iter().find(|n| fold(n.key.name()) == wanted))
        .map(|n| n.key.clone())
}

/// Canonical slot id: reserved words unchanged, numeric ids in minimal form,
/// anything else passed through for the engine to reject.
pub fn normalize_slot_id(input: &str) -> SlotId {
    let trimmed = input.trim();
    if trimmed == RESERVED_NIGHTLORD || trimmed == RESERVED_EVENT {
        return SlotId::new(trimmed);
    }

    if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
        let minimal = trimmed.trim_start_matches('0');
        return SlotId::new(if minimal.is_empty() { "0" } else { minimal });
    }

    SlotId::new(input)
}

impl SeedCatalog {
    pub fn resolve_nightlord(&self, input: &str) -> Option<NightlordKey> {
        normalize_nightlord(self.nightlords(), input)
    }
}
