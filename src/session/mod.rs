// the read/action surface presentation code talks to
pub mod url_state;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::ResolverConfig;
use crate::core::catalog::SeedCatalog;
use crate::core::engine::Engine;
use crate::core::normalize::normalize_slot_id;
use crate::core::state::Assignment;
use crate::core::types::{Building, MapType, NightlordKey, Phase, SeedId, SlotId};
use crate::session::url_state::{UrlState, UrlStateError};

/// Everything presentation needs, recomputed from the engine on every call.
/// `active_slot` and `active_building_panel` are UI cursors and never affect matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub map_type: Option<MapType>,
    pub slots: BTreeMap<SlotId, Building>,
    pub nightlord: Option<NightlordKey>,
    pub found_seed: Option<SeedId>,
    pub current_phase: Phase,
    pub matching_seeds: Vec<SeedId>,
    pub can_undo: bool,
    pub can_redo: bool,
    pub active_slot: Option<SlotId>,
    pub active_building_panel: Option<String>,
}

/// One-way consumer of published snapshots (renderers, url sync, session cache).
pub trait SessionObserver {
    fn on_snapshot(&mut self, snapshot: &Snapshot);
}

/// Actions take `&mut self`, so they run one at a time and to completion; callers
/// sharing a session across tasks serialize access around it.
pub struct Session {
    engine: Engine,
    active_slot: Option<SlotId>,
    active_building_panel: Option<String>,
    observers: Vec<Box<dyn SessionObserver>>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("engine", &self.engine)
            .field("active_slot", &self.active_slot)
            .field("active_building_panel", &self.active_building_panel)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Session {
    pub fn new(catalog: Arc<SeedCatalog>) -> Self {
        Self::with_config(catalog, &ResolverConfig::default())
    }

    pub fn with_config(catalog: Arc<SeedCatalog>, config: &ResolverConfig) -> Self {
        Session {
            engine: Engine::with_history_limit(catalog, config.history_limit),
            active_slot: None,
            active_building_panel: None,
            observers: Vec::new(),
        }
    }

    /// Rebuild a session from its shareable form. Every identifier goes through the
    /// normalization layer; a missing or unknown map type yields a fresh session.
    pub fn restore(catalog: Arc<SeedCatalog>, state: &UrlState, config: &ResolverConfig) -> Self {
        let mut session = Self::with_config(catalog, config);

        let Some(map_type) = state.map.as_deref().and_then(MapType::parse) else {
            warn!(map = ?state.map, "restore fell back to selection: missing or unknown map type");
            return session;
        };

        let catalog = session.engine.catalog();
        let nightlord = state.nightlord.as_deref().and_then(|raw| {
            let key = catalog.resolve_nightlord(raw);
            if key.is_none() {
                debug!(raw, "restore dropped unresolved nightlord");
            }
            key
        });

        let mut slots = BTreeMap::new();
        for (raw_slot, building) in &state.slots {
            let slot = normalize_slot_id(raw_slot);
            if building.is_empty() || !catalog.is_valid_slot(map_type, &slot) {
                debug!(raw_slot = %raw_slot, %map_type, "restore dropped slot");
                continue;
            }
            slots.insert(slot, building.clone());
        }

        let assignment = Assignment {
            map_type: Some(map_type),
            nightlord,
            slots,
        };
        info!(assignment = %assignment.summary(), "session restored");
        session.engine.apply_assignment(assignment);
        session
    }

    /// Like `restore`, from a raw query string. Malformed input falls back to selection.
    pub fn from_query(catalog: Arc<SeedCatalog>, query: &str, config: &ResolverConfig) -> Self {
        match UrlState::parse_query(query) {
            Ok(state) => Self::restore(catalog, &state, config),
            Err(err) => {
                warn!(%err, "restore fell back to selection: unreadable query");
                Self::with_config(catalog, config)
            }
        }
    }

    pub fn subscribe(&mut self, observer: Box<dyn SessionObserver>) {
        self.observers.push(observer);
    }

    pub fn snapshot(&self) -> Snapshot {
        let assignment = self.engine.assignment();
        Snapshot {
            map_type: assignment.map_type,
            slots: assignment.slots.clone(),
            nightlord: assignment.nightlord.clone(),
            found_seed: self.engine.found_seed().map(|s| s.seed_id),
            current_phase: self.engine.phase(),
            matching_seeds: self.engine.matching_seeds().iter().map(|s| s.seed_id).collect(),
            can_undo: self.engine.can_undo(),
            can_redo: self.engine.can_redo(),
            active_slot: self.active_slot.clone(),
            active_building_panel: self.active_building_panel.clone(),
        }
    }

    pub fn catalog(&self) -> &SeedCatalog {
        self.engine.catalog()
    }

    pub fn candidates_for(&self, slot: &str) -> BTreeSet<&str> {
        self.engine.candidates_for(&normalize_slot_id(slot))
    }

    pub fn to_url_state(&self) -> UrlState {
        UrlState::from_assignment(self.engine.assignment())
    }

    pub fn to_query(&self) -> String {
        self.to_url_state().to_query()
    }

    pub fn parse_and_restore(
        catalog: Arc<SeedCatalog>,
        query: &str,
        config: &ResolverConfig,
    ) -> Result<Self, UrlStateError> {
        let state = UrlState::parse_query(query)?;
        Ok(Self::restore(catalog, &state, config))
    }

    fn publish(&mut self, changed: bool) -> bool {
        if changed && !self.observers.is_empty() {
            let snapshot = self.snapshot();
            for observer in &mut self.observers {
                observer.on_snapshot(&snapshot);
            }
        }
        changed
    }

    pub fn set_map_type(&mut self, map_type: MapType) -> bool {
        let changed = self.engine.set_map_type(map_type);
        self.publish(changed)
    }

    pub fn set_slot(&mut self, slot: &str, building: &str) -> bool {
        let changed = self.engine.set_slot(slot, building);
        self.publish(changed)
    }

    pub fn clear_slot(&mut self, slot: &str) -> bool {
        let changed = self.engine.clear_slot(slot);
        self.publish(changed)
    }

    pub fn set_nightlord(&mut self, input: &str) -> bool {
        let changed = self.engine.set_nightlord(input);
        self.publish(changed)
    }

    pub fn clear_nightlord(&mut self) -> bool {
        let changed = self.engine.clear_nightlord();
        self.publish(changed)
    }

    pub fn set_found_seed(&mut self, seed_id: SeedId) -> bool {
        let changed = self.engine.set_found_seed(seed_id);
        self.publish(changed)
    }

    pub fn undo(&mut self) -> bool {
        let changed = self.engine.undo();
        self.publish(changed)
    }

    pub fn redo(&mut self) -> bool {
        let changed = self.engine.redo();
        self.publish(changed)
    }

    pub fn restart(&mut self) {
        self.engine.restart();
        self.active_slot = None;
        self.active_building_panel = None;
        self.publish(true);
    }

    /// UI cursor only. Slots outside the active layout are not selectable.
    pub fn select_slot(&mut self, slot: Option<&str>) -> bool {
        let next = match slot {
            Some(raw) => {
                let slot = normalize_slot_id(raw);
                let valid = self
                    .engine
                    .assignment()
                    .map_type
                    .is_some_and(|m| self.engine.catalog().is_valid_slot(m, &slot));
                if !valid {
                    return false;
                }
                Some(slot)
            }
            None => None,
        };
        if next == self.active_slot {
            return false;
        }
        self.active_slot = next;
        self.publish(true)
    }

    pub fn set_building_panel(&mut self, panel: Option<&str>) -> bool {
        let next = panel.map(str::to_string);
        if next == self.active_building_panel {
            return false;
        }
        self.active_building_panel = next;
        self.publish(true)
    }
}
