use chrono::Utc;
use tracing::{debug, info};

use super::catalog::MoveCatalog;
use super::types::{Move, MoveId, Sequence, SequenceId};

/// Saved, named snapshots of move selections
#[derive(Debug, Clone)]
pub struct SequenceLibrary {
    sequences: Vec<Sequence>,
    next_id: u64,
}

impl SequenceLibrary {
    pub fn empty() -> Self {
        Self {
            sequences: Vec::new(),
            next_id: 1,
        }
    }

    /// Library seeded with the stock sequences, snapshotted from `catalog`
    pub fn with_defaults(catalog: &MoveCatalog) -> Self {
        let mut library = Self::empty();
        let stock: [(&str, [u64; 3]); 2] = [
            ("Defensive Takedown Counter", [2, 3, 9]),
            ("Offensive Chain", [1, 4, 10]),
        ];
        for (name, ids) in stock {
            let moves: Vec<Move> = ids
                .iter()
                .filter_map(|id| catalog.get(MoveId(*id)).cloned())
                .collect();
            library.insert(name, moves);
        }
        library
    }

    pub fn sequences(&self) -> &[Sequence] {
        &self.sequences
    }

    pub fn get(&self, id: SequenceId) -> Option<&Sequence> {
        self.sequences.iter().find(|s| s.id == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Sequence> {
        let wanted = name.trim();
        self.sequences
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(wanted))
    }

    /// Snapshot the current selection under `name`.
    ///
    /// The stored moves are value copies; later catalog edits never reach
    /// them.
    pub fn save(&mut self, name: &str, selected: Vec<Move>) -> Option<SequenceId> {
        let name = name.trim();
        if name.is_empty() || selected.is_empty() {
            debug!(name, moves = selected.len(), "Rejecting sequence save");
            return None;
        }
        let id = self.insert(name, selected);
        info!(sequence_id = %id, name, "Saved sequence");
        Some(id)
    }

    fn insert(&mut self, name: &str, moves: Vec<Move>) -> SequenceId {
        let id = SequenceId(self.next_id);
        self.next_id += 1;
        self.sequences.push(Sequence {
            id,
            name: name.to_string(),
            moves,
            saved_at: Utc::now(),
        });
        id
    }

    /// Apply a sequence to the catalog: deselect everything, then select the
    /// catalog moves the sequence names. Ids no longer in the catalog are
    /// skipped. Returns false for an unknown sequence.
    pub fn apply(&self, id: SequenceId, catalog: &mut MoveCatalog) -> bool {
        let Some(sequence) = self.get(id) else {
            debug!(sequence_id = %id, "Ignoring load of unknown sequence");
            return false;
        };

        let wanted: Vec<MoveId> = catalog
            .moves()
            .iter()
            .map(|m| m.id)
            .filter(|move_id| sequence.contains(*move_id))
            .collect();
        catalog.deselect_all();
        for move_id in &wanted {
            catalog.set_selected(*move_id, true);
        }
        let skipped = sequence.moves.len() - wanted.len();
        info!(
            sequence_id = %id,
            name = %sequence.name,
            selected = wanted.len(),
            skipped,
            "Loaded sequence"
        );
        true
    }
}
