// phase derivation
use crate::core::catalog::Seed;
use crate::core::engine::Engine;
use crate::core::state::Assignment;
use crate::core::types::Phase;

/// - no map type            -> Selection
/// - map type + one match   -> Complete
/// - map type + manual pin  -> Complete
/// - anything else          -> Building (including zero matches)
pub fn derive_phase(assignment: &Assignment, match_count: usize, pinned: bool) -> Phase {
    if assignment.map_type.is_none() {
        return Phase::Selection;
    }
    if pinned || match_count == 1 {
        Phase::Complete
    } else {
        Phase::Building
    }
}

impl Engine {
    pub fn phase(&self) -> Phase {
        derive_phase(
            self.assignment(),
            self.matching_seeds().len(),
            self.pinned().is_some(),
        )
    }

    /// The definite answer: the pinned seed, else the sole match while one is defined.
    pub fn found_seed(&self) -> Option<&Seed> {
        if self.assignment().map_type.is_none() {
            return None;
        }
        if let Some(id) = self.pinned() {
            return self.catalog().seed(id);
        }
        match self.matching_seeds().as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }
}
