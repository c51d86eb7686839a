use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a move in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MoveId(pub u64);

impl fmt::Display for MoveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a saved sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SequenceId(pub u64);

impl fmt::Display for SequenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-move completion goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quantity {
    /// No goal, only a running count
    #[default]
    Auto,
    Goal(u32),
}

impl Quantity {
    /// `Goal(0)` is the only unacceptable value
    pub fn is_valid(&self) -> bool {
        !matches!(self, Quantity::Goal(0))
    }

    pub fn target(&self) -> Option<u32> {
        match self {
            Quantity::Auto => None,
            Quantity::Goal(n) => Some(*n),
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Auto => write!(f, "auto"),
            Quantity::Goal(n) => write!(f, "{n}"),
        }
    }
}

impl std::str::FromStr for Quantity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("auto") {
            return Ok(Quantity::Auto);
        }
        trimmed
            .parse::<u32>()
            .map(Quantity::Goal)
            .map_err(|_| format!("expected a whole number or 'auto', got '{s}'"))
    }
}

/// A drillable movement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub id: MoveId,
    pub name: String,
    /// Seconds the move is held at 1x speed
    pub duration_secs: u32,
    pub selected: bool,
    pub quantity: Quantity,
}

impl Move {
    pub fn new(id: u64, name: &str, duration_secs: u32) -> Self {
        Self {
            id: MoveId(id),
            name: name.to_string(),
            duration_secs,
            selected: false,
            quantity: Quantity::Auto,
        }
    }
}

/// A named snapshot of selected moves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sequence {
    pub id: SequenceId,
    pub name: String,
    pub moves: Vec<Move>,
    pub saved_at: DateTime<Utc>,
}

impl Sequence {
    pub fn contains(&self, id: MoveId) -> bool {
        self.moves.iter().any(|m| m.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_parsing() {
        assert_eq!("auto".parse::<Quantity>(), Ok(Quantity::Auto));
        assert_eq!(" AUTO ".parse::<Quantity>(), Ok(Quantity::Auto));
        assert_eq!("12".parse::<Quantity>(), Ok(Quantity::Goal(12)));
        assert!("-1".parse::<Quantity>().is_err());
        assert!("lots".parse::<Quantity>().is_err());
    }

    #[test]
    fn test_quantity_validity() {
        assert!(Quantity::Auto.is_valid());
        assert!(Quantity::Goal(1).is_valid());
        assert!(!Quantity::Goal(0).is_valid());
        assert_eq!(Quantity::Goal(4).target(), Some(4));
        assert_eq!(Quantity::Auto.target(), None);
    }
}
