use anyhow::Result;

use super::Command;
use crate::config::ShadowDrillConfig;

pub struct ConfigCommand {
    pub config: ShadowDrillConfig,
    pub write: Option<String>,
}

impl ConfigCommand {
    pub fn new(config: ShadowDrillConfig) -> Self {
        Self {
            config,
            write: None,
        }
    }

    pub fn with_write(mut self, path: Option<String>) -> Self {
        self.write = path;
        self
    }
}

impl Command for ConfigCommand {
    async fn execute(&self) -> Result<()> {
        print!("{}", self.config.to_toml()?);
        if let Some(path) = &self.write {
            self.config.save_to_file(path)?;
            eprintln!("✅ Configuration written to {path}");
        }
        Ok(())
    }
}
