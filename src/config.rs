use anyhow::{bail, Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::lifecycle::CONDUCT_OUTCOMES;
use crate::model::WorkshopStatus;

/// Main configuration structure for the outreach portal
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Logging settings
    pub observability: ObservabilityConfig,
    /// Workshop lifecycle settings
    pub workshops: WorkshopConfig,
    /// Administrator seeded into a fresh portal
    pub bootstrap: BootstrapConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level or `EnvFilter` directive
    pub log_level: String,
    /// Emit JSON log lines instead of the human-readable format
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WorkshopConfig {
    /// Status a workshop moves to when conducted
    pub conduct_status: WorkshopStatus,
}

impl Default for WorkshopConfig {
    fn default() -> Self {
        Self {
            conduct_status: WorkshopStatus::Completed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BootstrapConfig {
    pub admin_id: String,
    pub admin_name: String,
    pub admin_email: String,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            admin_id: "admin".to_string(),
            admin_name: "Portal Administrator".to_string(),
            admin_email: "admin@outreach.example".to_string(),
        }
    }
}

impl PortalConfig {
    /// Load configuration from the current directory. See [`PortalConfig::load_from`].
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("."))
    }

    /// Load configuration with precedence:
    /// 1. Default values
    /// 2. Configuration files (outreach-portal.toml, .outreach-portal-rc)
    /// 3. Environment variables (prefixed with OUTREACH_PORTAL_, `__` between sections)
    pub fn load_from(dir: &Path) -> Result<Self> {
        let mut builder = Config::builder();

        let main_file = dir.join("outreach-portal.toml");
        if main_file.exists() {
            builder = builder.add_source(File::from(main_file.as_path()));
        }

        let rc_file = dir.join(".outreach-portal-rc");
        if rc_file.exists() {
            builder = builder.add_source(File::from(rc_file.as_path()).format(FileFormat::Toml));
        }

        builder = builder.add_source(
            Environment::with_prefix("OUTREACH_PORTAL")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to read configuration sources")?;
        let portal_config: PortalConfig = config
            .try_deserialize()
            .context("Failed to parse configuration")?;
        Ok(portal_config)
    }

    /// Reject settings the portal cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !CONDUCT_OUTCOMES.contains(&self.workshops.conduct_status) {
            bail!(
                "workshops.conduct_status must be one of: {}",
                CONDUCT_OUTCOMES
                    .iter()
                    .map(|status| status.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }

        let bootstrap = &self.bootstrap;
        for (field, value) in [
            ("admin_id", &bootstrap.admin_id),
            ("admin_name", &bootstrap.admin_name),
            ("admin_email", &bootstrap.admin_email),
        ] {
            if value.trim().is_empty() {
                bail!("bootstrap.{field} must not be empty");
            }
        }
        if !crate::dispatch::predicates::is_email_address(&bootstrap.admin_email) {
            bail!("bootstrap.admin_email is not an email address");
        }
        Ok(())
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}

/// Global configuration instance
static CONFIG: std::sync::LazyLock<Result<PortalConfig, anyhow::Error>> =
    std::sync::LazyLock::new(|| {
        let _ = PortalConfig::load_env_file();
        let config = PortalConfig::load()?;
        config.validate()?;
        Ok(config)
    });

/// Get the global configuration
pub fn config() -> Result<&'static PortalConfig> {
    CONFIG
        .as_ref()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {:#}", e))
}
