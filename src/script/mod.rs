//! Operation scripts: a JSON list of calls replayed through a portal, each
//! with the result it is expected to produce.
//!
//! ```json
//! { "steps": [
//!   { "op": "login",
//!     "args": { "user": { "type": "user", "value": { ... } },
//!               "role": { "type": "role", "value": { "name": "admin" } } } },
//!   { "op": "AddUser", "args": { ... }, "expect": "auth" }
//! ] }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{info, warn};

use crate::delegate::Delegate;
use crate::dispatch::{Args, Outcome, SharedPortal};
use crate::errors::ErrorKind;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read script {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed script: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("script has no steps")]
    Empty,
}

/// What a step should produce: success, or an error of one kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Expectation {
    #[default]
    Ok,
    Fail(ErrorKind),
}

impl Expectation {
    pub fn is_met_by(self, result: &Result<Outcome, ErrorKind>) -> bool {
        match (self, result) {
            (Expectation::Ok, Ok(_)) => true,
            (Expectation::Fail(expected), Err(actual)) => expected == *actual,
            _ => false,
        }
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expectation::Ok => f.write_str("ok"),
            Expectation::Fail(kind) => write!(f, "{kind}"),
        }
    }
}

impl FromStr for Expectation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ok" => Ok(Expectation::Ok),
            other => other.parse().map(Expectation::Fail),
        }
    }
}

impl TryFrom<String> for Expectation {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Expectation> for String {
    fn from(value: Expectation) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub op: String,
    #[serde(default)]
    pub args: Args,
    #[serde(default)]
    pub expect: Expectation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub steps: Vec<Step>,
}

/// Result of one replayed step.
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub index: usize,
    pub op: String,
    pub expected: Expectation,
    pub outcome: Option<Outcome>,
    pub error: Option<ErrorKind>,
    pub message: Option<String>,
    pub passed: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ScriptReport {
    pub steps: Vec<StepReport>,
    /// Steps left unrun after a failure.
    pub skipped: usize,
}

impl ScriptReport {
    pub fn passed(&self) -> bool {
        self.skipped == 0 && self.steps.iter().all(|step| step.passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &StepReport> {
        self.steps.iter().filter(|step| !step.passed)
    }
}

impl Script {
    pub fn from_json(json: &str) -> Result<Self, ScriptError> {
        let script: Script = serde_json::from_str(json)?;
        if script.steps.is_empty() {
            return Err(ScriptError::Empty);
        }
        Ok(script)
    }

    pub fn from_file(path: &Path) -> Result<Self, ScriptError> {
        let json = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Replay every step in order. Without `keep_going` the run stops at the
    /// first step whose result differs from its expectation.
    pub async fn run<D: Delegate>(&self, portal: &SharedPortal<D>, keep_going: bool) -> ScriptReport {
        let mut report = ScriptReport::default();

        for (index, step) in self.steps.iter().enumerate() {
            let result = portal.execute(&step.op, &step.args).await;
            let message = result.as_ref().err().map(|err| err.to_string());
            let result = result.map_err(|err| err.kind());
            let passed = step.expect.is_met_by(&result);

            if passed {
                info!(step = index, op = %step.op, expected = %step.expect, "Script step passed");
            } else {
                warn!(step = index, op = %step.op, expected = %step.expect, "Script step failed");
            }

            let (outcome, error) = match result {
                Ok(outcome) => (Some(outcome), None),
                Err(kind) => (None, Some(kind)),
            };
            report.steps.push(StepReport {
                index,
                op: step.op.clone(),
                expected: step.expect,
                outcome,
                error,
                message,
                passed,
            });

            if !passed && !keep_going {
                report.skipped = self.steps.len() - index - 1;
                break;
            }
        }
        report
    }
}
