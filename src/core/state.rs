// the user's accumulated partial knowledge
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::catalog::SeedCatalog;
use crate::core::types::{Building, MapType, NightlordKey, SlotId};

/// Every key in `slots` is valid for `map_type` (when set). Values are stored
/// exactly as given; nothing is normalized at match time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub map_type: Option<MapType>,
    pub nightlord: Option<NightlordKey>,
    pub slots: BTreeMap<SlotId, Building>,
}

impl Assignment {
    pub fn is_empty(&self) -> bool {
        self.map_type.is_none() && self.nightlord.is_none() && self.slots.is_empty()
    }

    /// Drop slot entries the layout of `map_type` does not have.
    pub fn retain_valid_slots(&mut self, catalog: &SeedCatalog, map_type: MapType) {
        self.slots.retain(|slot, _| catalog.is_valid_slot(map_type, slot));
    }

    pub(crate) fn summary(&self) -> String {
        format!(
            "map={} nightlord={} slots={}",
            self.map_type.map_or("-", MapType::as_str),
            self.nightlord.as_ref().map_or("-", NightlordKey::as_str),
            self.slots.len()
        )
    }
}
