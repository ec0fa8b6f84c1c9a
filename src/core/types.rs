// identifiers shared by the catalog, the engine and the session surface
use std::fmt;

use serde::{Deserialize, Serialize};

pub type SeedId = u32;

/// Building/feature token stored in a slot, e.g. `church`.
pub type Building = String;

pub const RESERVED_NIGHTLORD: &str = "nightlord";
pub const RESERVED_EVENT: &str = "event";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapType {
    Normal,
    Mountaintop,
    Crater,
    Rotted,
    Noklateo,
}

impl MapType {
    pub const ALL: [MapType; 5] = [
        MapType::Normal,
        MapType::Mountaintop,
        MapType::Crater,
        MapType::Rotted,
        MapType::Noklateo,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MapType::Normal => "normal",
            MapType::Mountaintop => "mountaintop",
            MapType::Crater => "crater",
            MapType::Rotted => "rotted",
            MapType::Noklateo => "noklateo",
        }
    }

    //lenient lookup for url/user input: trims and ignores case
    pub fn parse(input: &str) -> Option<MapType> {
        let wanted = input.trim();
        MapType::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(wanted))
    }
}

impl fmt::Display for MapType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fixed map location. Numeric ids are kept in minimal form (`"7"`, never `"07"`);
/// `nightlord` and `event` are reserved non-building slots.
///
/// Construction does not canonicalize, see `normalize::normalize_slot_id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotId(String);

impl SlotId {
    pub fn new(id: impl Into<String>) -> Self {
        SlotId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_reserved(&self) -> bool {
        self.0 == RESERVED_NIGHTLORD || self.0 == RESERVED_EVENT
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonical nightlord key, `<index>_<Name>` (e.g. `1_Gladius`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NightlordKey(String);

impl NightlordKey {
    pub fn new(key: impl Into<String>) -> Self {
        NightlordKey(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    //true iff the key has the `<digits>_<non-empty name>` shape
    pub fn is_well_formed(&self) -> bool {
        match self.0.split_once('_') {
            Some((index, name)) => {
                !index.is_empty() && index.chars().all(|c| c.is_ascii_digit()) && !name.is_empty()
            }
            None => false,
        }
    }

    /// Name portion of the key (`Gladius` for `1_Gladius`); the whole key if malformed.
    pub fn name(&self) -> &str {
        match self.0.split_once('_') {
            Some((_, name)) => name,
            None => &self.0,
        }
    }
}

impl fmt::Display for NightlordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derived session stage. Never set directly, see `classify::derive_phase`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Selection,
    Building,
    Complete,
}
