use anyhow::Result;

use super::Command;
use crate::moves::{MoveCatalog, SequenceLibrary};

pub struct SequencesCommand {
    pub json: bool,
}

impl SequencesCommand {
    pub fn new() -> Self {
        Self { json: false }
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }
}

impl Default for SequencesCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl Command for SequencesCommand {
    async fn execute(&self) -> Result<()> {
        let library = SequenceLibrary::with_defaults(&MoveCatalog::default());

        if self.json {
            println!("{}", serde_json::to_string_pretty(library.sequences())?);
            return Ok(());
        }

        println!("📚 SAVED SEQUENCES:");
        println!("───────────────────");
        for sequence in library.sequences() {
            let names: Vec<&str> = sequence.moves.iter().map(|m| m.name.as_str()).collect();
            println!("  {:>3}  {}", sequence.id.0, sequence.name);
            println!("       {}", names.join(" → "));
        }
        println!();
        println!("💡 Drill one with 'shadow-drill run --sequence \"Offensive Chain\"'");
        Ok(())
    }
}
