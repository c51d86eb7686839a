//! Move catalog and selection
//!
//! The catalog is the single source of truth for which moves exist and which
//! are selected. The selected subset is always derived by filtering, never
//! stored alongside.

use tracing::{debug, info};

use super::types::{Move, MoveId, Quantity};

/// Moves every new session starts with
pub fn default_moves() -> Vec<Move> {
    vec![
        Move::new(1, "Shoot", 3),
        Move::new(2, "Block", 2),
        Move::new(3, "Sprawl", 3),
        Move::new(4, "Double Leg", 4),
        Move::new(5, "Single Leg", 4),
        Move::new(6, "Arm Drag", 3),
        Move::new(7, "Duck Under", 3),
        Move::new(8, "Penetration Step", 2),
        Move::new(9, "Post", 2),
        Move::new(10, "Snap", 2),
    ]
}

#[derive(Debug, Clone)]
pub struct MoveCatalog {
    moves: Vec<Move>,
    next_id: u64,
}

impl Default for MoveCatalog {
    fn default() -> Self {
        Self::new(default_moves())
    }
}

impl MoveCatalog {
    pub fn new(moves: Vec<Move>) -> Self {
        let next_id = moves.iter().map(|m| m.id.0).max().unwrap_or(0) + 1;
        Self { moves, next_id }
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn selected(&self) -> Vec<Move> {
        self.moves.iter().filter(|m| m.selected).cloned().collect()
    }

    pub fn selected_count(&self) -> usize {
        self.moves.iter().filter(|m| m.selected).count()
    }

    pub fn get(&self, id: MoveId) -> Option<&Move> {
        self.moves.iter().find(|m| m.id == id)
    }

    /// Case-insensitive lookup by display name
    pub fn find_by_name(&self, name: &str) -> Option<&Move> {
        let wanted = name.trim();
        self.moves
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(wanted))
    }

    /// Flip selection of a move. Returns false when the id is unknown.
    pub fn toggle(&mut self, id: MoveId) -> bool {
        match self.moves.iter_mut().find(|m| m.id == id) {
            Some(m) => {
                m.selected = !m.selected;
                debug!(move_id = %id, selected = m.selected, "Toggled move selection");
                true
            }
            None => {
                debug!(move_id = %id, "Ignoring toggle for unknown move");
                false
            }
        }
    }

    pub fn set_selected(&mut self, id: MoveId, selected: bool) -> bool {
        match self.moves.iter_mut().find(|m| m.id == id) {
            Some(m) => {
                m.selected = selected;
                true
            }
            None => false,
        }
    }

    pub fn deselect_all(&mut self) {
        for m in &mut self.moves {
            m.selected = false;
        }
    }

    /// Append a user-defined move, selected and without a goal
    pub fn add_custom(&mut self, name: &str, duration_secs: u32) -> Option<MoveId> {
        let name = name.trim();
        if name.is_empty() || duration_secs == 0 {
            debug!(name, duration_secs, "Rejecting custom move");
            return None;
        }

        let id = MoveId(self.next_id);
        self.next_id += 1;
        self.moves.push(Move {
            id,
            name: name.to_string(),
            duration_secs,
            selected: true,
            quantity: Quantity::Auto,
        });
        info!(move_id = %id, name, duration_secs, "Added custom move");
        Some(id)
    }

    pub fn set_goal(&mut self, id: MoveId, quantity: Quantity) -> bool {
        if !quantity.is_valid() {
            debug!(move_id = %id, %quantity, "Rejecting goal below 1");
            return false;
        }
        match self.moves.iter_mut().find(|m| m.id == id) {
            Some(m) => {
                m.quantity = quantity;
                debug!(move_id = %id, %quantity, "Updated move goal");
                true
            }
            None => false,
        }
    }
}
