// Move catalog, goals and saved sequences

pub mod catalog;
pub mod sequences;
pub mod types;

pub use catalog::{default_moves, MoveCatalog};
pub use sequences::SequenceLibrary;
pub use types::{Move, MoveId, Quantity, Sequence, SequenceId};
