use anyhow::{bail, Context, Result};
use std::path::PathBuf;

use super::Command;
use crate::config::config;
use crate::dispatch::{Portal, SharedPortal};
use crate::script::Script;

pub struct RunCommand {
    pub script: PathBuf,
    pub keep_going: bool,
}

impl RunCommand {
    pub fn new(script: PathBuf) -> Self {
        Self {
            script,
            keep_going: false,
        }
    }

    pub fn with_keep_going(mut self, keep_going: bool) -> Self {
        self.keep_going = keep_going;
        self
    }
}

impl Command for RunCommand {
    async fn execute(&self) -> Result<()> {
        let script = Script::from_file(&self.script)?;
        let portal = Portal::from_config(config()?).context("Failed to set up portal")?;
        let portal = SharedPortal::new(portal);

        println!(
            "▶️  Running {} ({} steps)",
            self.script.display(),
            script.steps.len()
        );
        let report = script.run(&portal, self.keep_going).await;

        for step in &report.steps {
            let mark = if step.passed { "✅" } else { "❌" };
            let actual = match (&step.error, &step.message) {
                (Some(kind), Some(message)) => format!("{kind}: {message}"),
                (Some(kind), None) => kind.to_string(),
                (None, _) => "ok".to_string(),
            };
            println!(
                "{mark} #{} {} (expected {}, got {actual})",
                step.index, step.op, step.expected
            );
        }
        if report.skipped > 0 {
            println!("⏭️  {} step(s) not run", report.skipped);
        }

        if !report.passed() {
            bail!(
                "{} step(s) did not match their expectation",
                report.failures().count()
            );
        }

        println!("🎉 All {} steps matched", report.steps.len());
        Ok(())
    }
}
