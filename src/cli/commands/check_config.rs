use anyhow::Result;

use super::Command;
use crate::config::config;

pub struct CheckConfigCommand;

impl CheckConfigCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CheckConfigCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl Command for CheckConfigCommand {
    async fn execute(&self) -> Result<()> {
        let config = config()?;
        println!("✅ Configuration is valid");
        println!();
        print!("{}", toml::to_string_pretty(config)?);
        Ok(())
    }
}
