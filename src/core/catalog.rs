// ground-truth seed table + slot layouts, loaded once and shared read-only
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::core::normalize::normalize_slot_id;
use crate::core::types::{Building, MapType, NightlordKey, SeedId, SlotId};

const SAMPLE_CATALOG: &str = include_str!("../../data/sample_catalog.toon");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog: {0}")]
    Parse(String),
    #[error("catalog has no seeds")]
    Empty,
    #[error("duplicate seed id {0}")]
    DuplicateSeed(SeedId),
    #[error("duplicate nightlord key {0}")]
    DuplicateNightlord(NightlordKey),
    #[error("nightlord key {0} is not of the form <index>_<Name>")]
    MalformedNightlord(NightlordKey),
    #[error("seed {seed} references unknown nightlord {nightlord}")]
    UnknownNightlord { seed: SeedId, nightlord: NightlordKey },
    #[error("slot row references unknown seed {0}")]
    UnknownSeed(SeedId),
    #[error("slot id {0:?} is not canonical")]
    NonCanonicalSlot(String),
    #[error("seed {seed} lists slot {slot} more than once")]
    DuplicateSlotValue { seed: SeedId, slot: SlotId },
    #[error("slot {slot} has two coordinates on {map_type}")]
    DuplicateCoord { slot: SlotId, map_type: MapType },
    #[error("seed {seed} has no value for slot {slot} of its {map_type} layout")]
    MissingSlot {
        seed: SeedId,
        map_type: MapType,
        slot: SlotId,
    },
    #[error("seed {seed} assigns slot {slot}, which is not part of the {map_type} layout")]
    ForeignSlot {
        seed: SeedId,
        map_type: MapType,
        slot: SlotId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nightlord {
    pub key: NightlordKey,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub x: f32,
    pub y: f32,
}

/// One row of the coordinate table: where `slot` is drawn on `map_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotCoord {
    pub slot: SlotId,
    pub map_type: MapType,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seed {
    pub seed_id: SeedId,
    pub map_type: MapType,
    pub nightlord: NightlordKey,
    pub slots: BTreeMap<SlotId, Building>,
    pub event: Option<String>,
}

//on-disk shape: flat tables, assembled into `Seed`s by `from_file`
#[derive(Debug, Deserialize)]
struct CatalogFile {
    nightlords: Vec<Nightlord>,
    slot_coords: Vec<SlotCoord>,
    seeds: Vec<SeedRow>,
    seed_slots: Vec<SeedSlotRow>,
}

#[derive(Debug, Deserialize)]
struct SeedRow {
    seed_id: SeedId,
    map_type: MapType,
    nightlord: NightlordKey,
    event: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SeedSlotRow {
    seed_id: SeedId,
    slot: SlotId,
    building: Building,
}

#[derive(Debug)]
pub struct SeedCatalog {
    nightlords: Vec<Nightlord>,
    layouts: BTreeMap<MapType, BTreeMap<SlotId, Coord>>,
    seeds: Vec<Seed>,
    by_id: HashMap<SeedId, usize>,
}

impl SeedCatalog {
    /// Build and validate a catalog. Every check here is fatal: a catalog that fails
    /// cannot back an engine.
    pub fn from_parts(
        nightlords: Vec<Nightlord>,
        slot_coords: Vec<SlotCoord>,
        seeds: Vec<Seed>,
    ) -> Result<Self, CatalogError> {
        if seeds.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut known_lords = BTreeSet::new();
        for n in &nightlords {
            if !n.key.is_well_formed() {
                return Err(CatalogError::MalformedNightlord(n.key.clone()));
            }
            if !known_lords.insert(n.key.clone()) {
                return Err(CatalogError::DuplicateNightlord(n.key.clone()));
            }
        }

        let mut layouts: BTreeMap<MapType, BTreeMap<SlotId, Coord>> = BTreeMap::new();
        for row in slot_coords {
            expect_canonical(&row.slot)?;
            let layout = layouts.entry(row.map_type).or_default();
            if layout.contains_key(&row.slot) {
                return Err(CatalogError::DuplicateCoord {
                    slot: row.slot,
                    map_type: row.map_type,
                });
            }
            layout.insert(row.slot, Coord { x: row.x, y: row.y });
        }

        let mut by_id = HashMap::with_capacity(seeds.len());
        for (idx, seed) in seeds.iter().enumerate() {
            if by_id.insert(seed.seed_id, idx).is_some() {
                return Err(CatalogError::DuplicateSeed(seed.seed_id));
            }
            if !known_lords.contains(&seed.nightlord) {
                return Err(CatalogError::UnknownNightlord {
                    seed: seed.seed_id,
                    nightlord: seed.nightlord.clone(),
                });
            }
            check_coverage(seed, layouts.get(&seed.map_type))?;
        }

        Ok(SeedCatalog {
            nightlords,
            layouts,
            seeds,
            by_id,
        })
    }

    pub fn from_toon(input: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile =
            toon_format::decode_default(input).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Self::from_file(file)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_toon(&text)?;
        info!(path = %path.display(), seeds = catalog.len(), "seed catalog loaded");
        Ok(catalog)
    }

    /// The catalog bundled with the crate.
    pub fn sample() -> Result<Self, CatalogError> {
        let catalog = Self::from_toon(SAMPLE_CATALOG)?;
        info!(seeds = catalog.len(), "sample seed catalog loaded");
        Ok(catalog)
    }

    fn from_file(file: CatalogFile) -> Result<Self, CatalogError> {
        let mut slots_by_seed: HashMap<SeedId, BTreeMap<SlotId, Building>> = HashMap::new();
        for row in &file.seeds {
            slots_by_seed.entry(row.seed_id).or_default();
        }
        for row in file.seed_slots {
            expect_canonical(&row.slot)?;
            let slots = slots_by_seed
                .get_mut(&row.seed_id)
                .ok_or(CatalogError::UnknownSeed(row.seed_id))?;
            if slots.contains_key(&row.slot) {
                return Err(CatalogError::DuplicateSlotValue {
                    seed: row.seed_id,
                    slot: row.slot,
                });
            }
            slots.insert(row.slot, row.building);
        }

        let seeds = file
            .seeds
            .into_iter()
            .map(|row| Seed {
                slots: slots_by_seed.get(&row.seed_id).cloned().unwrap_or_default(),
                seed_id: row.seed_id,
                map_type: row.map_type,
                nightlord: row.nightlord,
                event: row.event,
            })
            .collect();

        Self::from_parts(file.nightlords, file.slot_coords, seeds)
    }

    pub fn seeds(&self) -> &[Seed] {
        &self.seeds
    }

    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }

    pub fn seed(&self, id: SeedId) -> Option<&Seed> {
        self.by_id.get(&id).map(|&idx| &self.seeds[idx])
    }

    pub fn nightlords(&self) -> &[Nightlord] {
        &self.nightlords
    }

    pub fn nightlord(&self, key: &NightlordKey) -> Option<&Nightlord> {
        self.nightlords.iter().find(|n| &n.key == key)
    }

    /// Slot ids of a layout; empty if the catalog never draws that map.
    pub fn slots_for(&self, map_type: MapType) -> impl Iterator<Item = &SlotId> + '_ {
        self.layouts.get(&map_type).into_iter().flat_map(|l| l.keys())
    }

    pub fn is_valid_slot(&self, map_type: MapType, slot: &SlotId) -> bool {
        self.layouts
            .get(&map_type)
            .is_some_and(|l| l.contains_key(slot))
    }

    pub fn coords(&self, slot: &SlotId, map_type: MapType) -> Option<Coord> {
        self.layouts.get(&map_type)?.get(slot).copied()
    }
}

fn expect_canonical(slot: &SlotId) -> Result<(), CatalogError> {
    if normalize_slot_id(slot.as_str()) != *slot || slot.as_str().is_empty() {
        return Err(CatalogError::NonCanonicalSlot(slot.as_str().to_string()));
    }
    Ok(())
}

//a seed must assign exactly the slot set of its layout
fn check_coverage(seed: &Seed, layout: Option<&BTreeMap<SlotId, Coord>>) -> Result<(), CatalogError> {
    let empty = BTreeMap::new();
    let layout = layout.unwrap_or(&empty);

    if let Some(slot) = seed.slots.keys().find(|s| !layout.contains_key(*s)) {
        return Err(CatalogError::ForeignSlot {
            seed: seed.seed_id,
            map_type: seed.map_type,
            slot: slot.clone(),
        });
    }
    if let Some(slot) = layout.keys().find(|s| !seed.slots.contains_key(*s)) {
        return Err(CatalogError::MissingSlot {
            seed: seed.seed_id,
            map_type: seed.map_type,
            slot: slot.clone(),
        });
    }
    Ok(())
}
