// mutating actions
//
// Every action either commits a new history entry and returns true, or leaves the
// engine untouched and returns false. Bad input never surfaces as an error.
use tracing::debug;

use crate::core::classify::derive_phase;
use crate::core::engine::Engine;
use crate::core::history::HistoryEntry;
use crate::core::matching::match_seeds;
use crate::core::normalize::normalize_slot_id;
use crate::core::state::Assignment;
use crate::core::types::{MapType, Phase, SeedId};

impl Engine {
    //recompute matches + phase for the next state and record it
    fn commit(&mut self, assignment: Assignment, pinned: Option<SeedId>) -> bool {
        let current = self.current();
        if current.assignment == assignment && current.pinned == pinned {
            return false;
        }

        let matches = match_seeds(self.catalog(), &assignment).len();
        let phase = derive_phase(&assignment, matches, pinned.is_some());
        debug!(
            assignment = %assignment.summary(),
            matches,
            ?phase,
            ?pinned,
            "assignment recomputed"
        );

        self.history.push(HistoryEntry {
            assignment,
            pinned,
            phase,
        });
        true
    }

    /// Switch layouts. Slots the new layout lacks are dropped; from a completed
    /// session only the new map type survives.
    pub fn set_map_type(&mut self, map_type: MapType) -> bool {
        let next = if self.phase() == Phase::Complete {
            Assignment {
                map_type: Some(map_type),
                ..Assignment::default()
            }
        } else {
            let mut next = self.assignment().clone();
            next.map_type = Some(map_type);
            next.retain_valid_slots(self.catalog(), map_type);
            next
        };
        self.commit(next, None)
    }

    /// Record the building at a slot. Unknown buildings are accepted (they just match
    /// nothing); slots outside the active layout are ignored.
    pub fn set_slot(&mut self, slot: &str, building: &str) -> bool {
        let Some(map_type) = self.assignment().map_type else {
            debug!(slot, "set_slot ignored: no map type selected");
            return false;
        };
        let slot = normalize_slot_id(slot);
        if !self.catalog().is_valid_slot(map_type, &slot) {
            debug!(%slot, %map_type, "set_slot ignored: slot not in layout");
            return false;
        }
        if building.is_empty() {
            debug!(%slot, "set_slot ignored: empty building");
            return false;
        }

        let mut next = self.assignment().clone();
        next.slots.insert(slot, building.to_string());
        self.commit(next, None)
    }

    pub fn clear_slot(&mut self, slot: &str) -> bool {
        let slot = normalize_slot_id(slot);
        if !self.assignment().slots.contains_key(&slot) {
            debug!(%slot, "clear_slot ignored: slot not assigned");
            return false;
        }
        let mut next = self.assignment().clone();
        next.slots.remove(&slot);
        self.commit(next, None)
    }

    /// Free text is resolved through the nightlord table; unresolved input is a no-op.
    pub fn set_nightlord(&mut self, input: &str) -> bool {
        let Some(key) = self.catalog().resolve_nightlord(input) else {
            debug!(input, "set_nightlord ignored: unresolved nightlord");
            return false;
        };
        let mut next = self.assignment().clone();
        next.nightlord = Some(key);
        self.commit(next, None)
    }

    pub fn clear_nightlord(&mut self) -> bool {
        let mut next = self.assignment().clone();
        if next.nightlord.take().is_none() {
            debug!("clear_nightlord ignored: no nightlord set");
            return false;
        }
        self.commit(next, None)
    }

    /// Manual override: pin `seed_id` as the answer regardless of the match count.
    /// The assignment is left alone except that an unset map type takes the seed's;
    /// a seed from a different layout than the selected one is refused.
    pub fn set_found_seed(&mut self, seed_id: SeedId) -> bool {
        let Some(seed_map) = self.catalog().seed(seed_id).map(|s| s.map_type) else {
            debug!(seed_id, "set_found_seed ignored: unknown seed");
            return false;
        };

        let mut next = self.assignment().clone();
        match next.map_type {
            Some(m) if m != seed_map => {
                debug!(seed_id, selected = %m, seed_map = %seed_map, "set_found_seed ignored: layout mismatch");
                return false;
            }
            Some(_) => {}
            None => next.map_type = Some(seed_map),
        }
        self.commit(next, Some(seed_id))
    }

    pub fn undo(&mut self) -> bool {
        self.history.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo()
    }

    pub fn restart(&mut self) {
        debug!("session restarted");
        self.history.reset();
    }

    /// Apply an already-normalized assignment as a single step (session restore).
    /// Slots the layout lacks are dropped, and without a map type no slots are kept.
    pub(crate) fn apply_assignment(&mut self, mut assignment: Assignment) -> bool {
        match assignment.map_type {
            Some(map_type) => assignment.retain_valid_slots(self.catalog(), map_type),
            None => assignment.slots.clear(),
        }
        self.commit(assignment, None)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::core::catalog::tests::mk_catalog;
    use crate::core::engine::Engine;
    use crate::core::types::{MapType, NightlordKey, Phase, SeedId, SlotId};

    fn mk_engine() -> Engine {
        Engine::new(Arc::new(mk_catalog()))
    }

    fn match_ids(e: &Engine) -> Vec<SeedId> {
        e.matching_seeds().iter().map(|s| s.seed_id).collect()
    }

    #[test]
    fn church_then_free_text_nightlord_completes() {
        let mut e = mk_engine();

        assert!(e.set_map_type(MapType::Normal));
        assert_eq!(match_ids(&e), vec![1, 2, 3]);

        assert!(e.set_slot("3", "church"));
        assert_eq!(match_ids(&e), vec![1, 2]);
        assert_eq!(e.phase(), Phase::Building);

        assert!(e.set_nightlord("gladius"));
        assert_eq!(e.assignment().nightlord, Some(NightlordKey::new("1_Gladius")));
        assert_eq!(match_ids(&e), vec![1]);
        assert_eq!(e.phase(), Phase::Complete);
        assert_eq!(e.found_seed().map(|s| s.seed_id), Some(1));
    }

    #[test]
    fn slot_outside_layout_is_a_silent_no_op() {
        let mut e = mk_engine();
        e.set_map_type(MapType::Normal);
        let before = e.assignment().clone();
        let cursor = e.history.cursor();

        assert!(!e.set_slot("99", "anything"));
        assert!(!e.set_slot("7", "fort"));

        assert_eq!(e.assignment(), &before);
        assert_eq!(e.history.cursor(), cursor);
        assert_eq!(match_ids(&e), vec![1, 2, 3]);
    }

    #[test]
    fn slot_without_map_type_is_ignored() {
        let mut e = mk_engine();
        assert!(!e.set_slot("3", "church"));
        assert!(e.assignment().is_empty());
        assert!(!e.can_undo());
    }

    #[test]
    fn padded_slot_ids_are_normalized_before_storing() {
        let mut e = mk_engine();
        e.set_map_type(MapType::Normal);
        assert!(e.set_slot("03", "church"));
        assert!(e.assignment().slots.contains_key(&SlotId::new("3")));
    }

    #[test]
    fn unknown_building_is_kept_and_matches_nothing() {
        let mut e = mk_engine();
        e.set_map_type(MapType::Normal);

        assert!(e.set_slot("5", "castle"));

        assert_eq!(e.assignment().slots.get(&SlotId::new("5")).map(String::as_str), Some("castle"));
        assert!(e.matching_seeds().is_empty());
        assert_eq!(e.phase(), Phase::Building);
        assert!(e.found_seed().is_none());

        // correcting the slot recovers
        assert!(e.set_slot("5", "ruins"));
        assert_eq!(match_ids(&e), vec![2]);
    }

    #[test]
    fn map_switch_drops_only_slots_missing_from_new_layout() {
        let mut e = mk_engine();
        e.set_map_type(MapType::Normal);
        e.set_slot("3", "church");
        e.set_slot("5", "castle");
        assert!(e.matching_seeds().is_empty());
        assert_eq!(e.phase(), Phase::Building);

        // normal {3, 5} -> crater {3, 7}: slot 3 survives, slot 5 goes
        assert!(e.set_map_type(MapType::Crater));

        assert_eq!(e.assignment().slots.len(), 1);
        assert_eq!(e.assignment().slots.get(&SlotId::new("3")).map(String::as_str), Some("church"));
        assert_eq!(match_ids(&e), vec![4]);
    }

    #[test]
    fn map_switch_from_complete_restarts_slot_knowledge() {
        let mut e = mk_engine();
        e.set_map_type(MapType::Normal);
        e.set_slot("3", "church");
        e.set_nightlord("gladius");
        assert_eq!(e.phase(), Phase::Complete);

        assert!(e.set_map_type(MapType::Crater));

        assert!(e.assignment().slots.is_empty());
        assert!(e.assignment().nightlord.is_none());
        assert_eq!(e.assignment().map_type, Some(MapType::Crater));
        assert_eq!(match_ids(&e), vec![4, 5]);
    }

    #[test]
    fn clearing_what_was_never_set_is_a_no_op() {
        let mut e = mk_engine();
        e.set_map_type(MapType::Normal);
        e.set_slot("3", "church");
        let len = e.history.len();

        assert!(!e.clear_slot("5"));
        assert!(!e.clear_nightlord());
        assert_eq!(e.history.len(), len);

        assert!(e.clear_slot("03"));
        assert!(e.assignment().slots.is_empty());
    }

    #[test]
    fn unresolved_nightlord_is_a_no_op() {
        let mut e = mk_engine();
        e.set_map_type(MapType::Normal);
        assert!(!e.set_nightlord("malenia"));
        assert!(e.assignment().nightlord.is_none());
    }

    #[test]
    fn repeating_the_same_action_does_not_grow_history() {
        let mut e = mk_engine();
        e.set_map_type(MapType::Normal);
        e.set_slot("3", "church");
        let len = e.history.len();

        assert!(!e.set_slot("3", "church"));
        assert!(!e.set_map_type(MapType::Normal));
        assert_eq!(e.history.len(), len);
    }

    #[test]
    fn three_slots_then_two_undos_leaves_first_slot_only() {
        let mut e = mk_engine();
        e.set_map_type(MapType::Crater);
        e.set_slot("3", "church");
        let after_first = e.assignment().clone();
        e.set_slot("7", "fort");
        e.set_slot("3", "ruins");

        assert!(e.undo());
        assert!(e.undo());

        assert_eq!(e.assignment(), &after_first);
        assert_eq!(match_ids(&e), vec![4]);
    }

    #[test]
    fn undo_past_start_never_changes_state() {
        let mut e = mk_engine();
        e.set_map_type(MapType::Normal);
        assert!(e.undo());
        for _ in 0..3 {
            assert!(!e.undo());
            assert!(e.assignment().is_empty());
            assert_eq!(e.phase(), Phase::Selection);
        }
    }

    #[test]
    fn edit_after_undo_discards_redo() {
        let mut e = mk_engine();
        e.set_map_type(MapType::Normal);
        e.set_slot("3", "church");
        e.undo();
        assert!(e.can_redo());

        e.set_slot("3", "fort");
        assert!(!e.can_redo());
        assert!(!e.redo());
        assert_eq!(match_ids(&e), vec![3]);
    }

    #[test]
    fn restart_returns_to_empty_selection() {
        let mut e = mk_engine();
        e.set_map_type(MapType::Normal);
        e.set_slot("3", "church");
        e.set_found_seed(2);

        e.restart();

        assert!(e.assignment().is_empty());
        assert_eq!(e.phase(), Phase::Selection);
        assert!(!e.can_undo());
        assert!(!e.can_redo());
        assert!(e.pinned().is_none());
    }

    #[test]
    fn found_seed_override_pins_without_touching_slots() {
        let mut e = mk_engine();
        e.set_map_type(MapType::Normal);
        e.set_slot("3", "church");
        let slots = e.assignment().slots.clone();

        assert!(e.set_found_seed(2));

        assert_eq!(e.phase(), Phase::Complete);
        assert_eq!(e.found_seed().map(|s| s.seed_id), Some(2));
        assert_eq!(e.assignment().slots, slots);
        assert_eq!(match_ids(&e), vec![1, 2]);

        // undo releases the pin
        e.undo();
        assert_eq!(e.phase(), Phase::Building);
        assert!(e.found_seed().is_none());
    }

    #[test]
    fn found_seed_fills_an_unset_map_type_and_refuses_mismatch() {
        let mut e = mk_engine();
        assert!(e.set_found_seed(4));
        assert_eq!(e.assignment().map_type, Some(MapType::Crater));
        assert_eq!(e.phase(), Phase::Complete);

        let mut other = mk_engine();
        other.set_map_type(MapType::Normal);
        assert!(!other.set_found_seed(4));
        assert!(!other.set_found_seed(404));
        assert_eq!(other.phase(), Phase::Building);
    }

    #[test]
    fn next_edit_releases_a_pin() {
        let mut e = mk_engine();
        e.set_map_type(MapType::Normal);
        e.set_found_seed(3);
        assert!(e.set_slot("5", "fort"));
        assert!(e.pinned().is_none());
        assert_eq!(match_ids(&e), vec![1, 3]);
        assert_eq!(e.phase(), Phase::Building);
    }
}
