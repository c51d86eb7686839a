use anyhow::{bail, Result};

use super::Command;
use crate::moves::MoveCatalog;
use crate::workout::{hold_seconds, MAX_SPEED, MIN_SPEED};

pub struct MovesCommand {
    pub speed: f64,
}

impl MovesCommand {
    pub fn new() -> Self {
        Self { speed: 1.0 }
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }
}

impl Default for MovesCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl Command for MovesCommand {
    async fn execute(&self) -> Result<()> {
        if !(MIN_SPEED..=MAX_SPEED).contains(&self.speed) {
            bail!("Speed must be between {MIN_SPEED} and {MAX_SPEED}, got {}", self.speed);
        }

        let catalog = MoveCatalog::default();
        println!("📋 MOVE CATALOG (speed {:.1}x):", self.speed);
        println!("─────────────────────────────");
        for m in catalog.moves() {
            println!(
                "  {:>3}  {:<18} {:>4.1}s",
                m.id.0,
                m.name,
                hold_seconds(m.duration_secs, self.speed)
            );
        }
        println!();
        println!("💡 Pick moves with 'shadow-drill run --move \"Double Leg\"'");
        Ok(())
    }
}
