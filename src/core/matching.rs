// seed matching: a full scan of the catalog against the current assignment
use std::collections::BTreeSet;

use crate::core::catalog::{Seed, SeedCatalog};
use crate::core::engine::Engine;
use crate::core::state::Assignment;
use crate::core::types::SlotId;

impl Assignment {
    /// A seed matches iff every defined field agrees with it. A pure conjunction, so
    /// the order in which the user supplied the fields never matters.
    pub fn admits(&self, seed: &Seed) -> bool {
        if self.map_type.is_some_and(|m| m != seed.map_type) {
            return false;
        }
        if self.nightlord.as_ref().is_some_and(|n| *n != seed.nightlord) {
            return false;
        }
        self.slots
            .iter()
            .all(|(slot, building)| seed.slots.get(slot) == Some(building))
    }
}

/// Catalog order is preserved. An empty result is a valid, over-constrained state.
pub fn match_seeds<'c>(catalog: &'c SeedCatalog, assignment: &Assignment) -> Vec<&'c Seed> {
    catalog.seeds().iter().filter(|s| assignment.admits(s)).collect()
}

impl Engine {
    pub fn matching_seeds(&self) -> Vec<&Seed> {
        match_seeds(self.catalog(), self.assignment())
    }

    /// Distinct buildings `slot` still takes across the current matches.
    pub fn candidates_for(&self, slot: &SlotId) -> BTreeSet<&str> {
        self.matching_seeds()
            .into_iter()
            .filter_map(|s| s.slots.get(slot).map(String::as_str))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::tests::mk_catalog;
    use crate::core::types::{MapType, NightlordKey, SeedId};

    fn ids(seeds: &[&Seed]) -> Vec<SeedId> {
        seeds.iter().map(|s| s.seed_id).collect()
    }

    fn mk_assignment(map: Option<MapType>, lord: Option<&str>, slots: &[(&str, &str)]) -> Assignment {
        Assignment {
            map_type: map,
            nightlord: lord.map(NightlordKey::new),
            slots: slots
                .iter()
                .map(|(s, b)| (SlotId::new(*s), b.to_string()))
                .collect(),
        }
    }

    #[test]
    fn empty_assignment_matches_whole_catalog() {
        let c = mk_catalog();
        assert_eq!(match_seeds(&c, &Assignment::default()).len(), c.len());
    }

    #[test]
    fn single_slot_matches_exactly_the_seeds_with_that_building() {
        let c = mk_catalog();
        for map in [MapType::Normal, MapType::Crater] {
            let slots: Vec<SlotId> = c.slots_for(map).cloned().collect();
            for slot in &slots {
                for token in ["church", "fort", "ruins", "nothing"] {
                    let a = mk_assignment(Some(map), None, &[(slot.as_str(), token)]);
                    let expected: Vec<SeedId> = c
                        .seeds()
                        .iter()
                        .filter(|s| s.map_type == map && s.slots.get(slot).map(String::as_str) == Some(token))
                        .map(|s| s.seed_id)
                        .collect();
                    assert_eq!(ids(&match_seeds(&c, &a)), expected, "{map} {slot} {token}");
                }
            }
        }
    }

    #[test]
    fn nightlord_and_map_type_narrow_independently() {
        let c = mk_catalog();
        let a = mk_assignment(None, Some("1_Gladius"), &[]);
        assert_eq!(ids(&match_seeds(&c, &a)), vec![1, 3, 5]);

        let a = mk_assignment(Some(MapType::Normal), Some("1_Gladius"), &[]);
        assert_eq!(ids(&match_seeds(&c, &a)), vec![1, 3]);
    }

    #[test]
    fn over_constrained_assignment_yields_empty_set() {
        let c = mk_catalog();
        let a = mk_assignment(Some(MapType::Normal), Some("2_Adel"), &[("5", "fort")]);
        assert!(match_seeds(&c, &a).is_empty());
    }

    #[test]
    fn matching_is_case_sensitive_on_tokens() {
        let c = mk_catalog();
        let a = mk_assignment(Some(MapType::Normal), None, &[("3", "Church")]);
        assert!(match_seeds(&c, &a).is_empty());
    }

    #[test]
    fn insertion_order_of_constraints_does_not_matter() {
        let c = mk_catalog();
        let constraints = [("3", "church"), ("5", "fort")];

        let mut forward = Assignment::default();
        for (s, b) in constraints {
            forward.slots.insert(SlotId::new(s), b.to_string());
        }
        forward.map_type = Some(MapType::Normal);

        let mut backward = Assignment {
            map_type: Some(MapType::Normal),
            ..Assignment::default()
        };
        for (s, b) in constraints.into_iter().rev() {
            backward.slots.insert(SlotId::new(s), b.to_string());
        }

        assert_eq!(ids(&match_seeds(&c, &forward)), ids(&match_seeds(&c, &backward)));
        assert_eq!(ids(&match_seeds(&c, &forward)), vec![1]);
    }
}
