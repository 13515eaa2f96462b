//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Review and reservation policy.
    #[serde(default)]
    pub policy: PolicyConfig,
}

/// Policy knobs for the reconciliation workflow.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PolicyConfig {
    /// When true, a completed task cannot be approved without at least one
    /// bill evidence reference attached to its budget binding.
    #[serde(default)]
    pub require_bill_evidence: bool,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        // Pick up a local .env before reading the environment.
        dotenvy::dotenv().ok();

        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("NIVARAN").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_do_not_require_evidence() {
        let config = AppConfig::default();
        assert!(!config.policy.require_bill_evidence);
    }
}
