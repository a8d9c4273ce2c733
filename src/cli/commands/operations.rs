use anyhow::Result;

use super::Command;
use crate::delegate::InMemoryDelegate;
use crate::dispatch::Portal;

pub struct OperationsCommand {
    pub json: bool,
}

impl OperationsCommand {
    pub fn new() -> Self {
        Self { json: false }
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }
}

impl Default for OperationsCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl Command for OperationsCommand {
    async fn execute(&self) -> Result<()> {
        let portal = Portal::init(InMemoryDelegate::new());
        let operations = portal.operations();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&operations)?);
            return Ok(());
        }

        println!("📋 PORTAL OPERATIONS ({})", operations.len());
        println!("──────────────────────────");
        for operation in &operations {
            let note = if operation.checks_arguments {
                ""
            } else {
                "   (partial update)"
            };
            println!("  {}{note}", operation.signature);
        }
        Ok(())
    }
}
