use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for the lead intake service
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LeadIntakeConfig {
    /// Email notification settings
    pub email: EmailConfig,
    /// Submission rate limiting settings
    pub rate_limit: RateLimitConfig,
    /// Form controller settings
    pub form: FormConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailConfig {
    /// Notification provider API key (can be set via env var)
    pub api_key: Option<String>,
    /// Sender address for inquiry notifications
    pub from_address: String,
    /// Operator address notifications are delivered to
    pub to_address: String,
    /// Address shown to users when automated delivery is unavailable
    pub fallback_contact: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Rolling window length in milliseconds
    pub window_ms: u64,
    /// Attempts admitted per identifier per window
    pub max_requests: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FormConfig {
    /// Delay before a successful submission resets the form
    pub reset_delay_seconds: u64,
    /// Per-file attachment size cap in bytes
    pub max_attachment_bytes: u64,
}

impl Default for LeadIntakeConfig {
    fn default() -> Self {
        Self {
            email: EmailConfig {
                api_key: None, // Will be read from env var
                from_address: "Portfolio <inquiries@example.dev>".to_string(),
                to_address: "hello@example.dev".to_string(),
                fallback_contact: "hello@example.dev".to_string(),
            },
            rate_limit: RateLimitConfig {
                window_ms: 3_600_000, // 1 hour
                max_requests: 3,
            },
            form: FormConfig {
                reset_delay_seconds: 5,
                max_attachment_bytes: 10 * 1024 * 1024,
            },
        }
    }
}

impl LeadIntakeConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration file (lead-intake.toml)
    /// 3. Environment variables (prefixed with LEAD_INTAKE_)
    pub fn load() -> Result<Self> {
        // Seed with defaults so a partial file or environment still parses
        let mut builder = Config::builder().add_source(Config::try_from(&LeadIntakeConfig::default())?);

        if Path::new("lead-intake.toml").exists() {
            builder = builder.add_source(File::with_name("lead-intake"));
        }

        // Override with environment variables
        builder = builder.add_source(
            Environment::with_prefix("LEAD_INTAKE")
                .separator("_")
                .try_parsing(true),
        );

        let config = builder.build()?;

        let mut intake_config: LeadIntakeConfig = config.try_deserialize()?;

        // Special handling for the notification API key - check multiple sources
        if intake_config.email.api_key.is_none() {
            if let Ok(key) = std::env::var("LEAD_INTAKE_EMAIL_API_KEY") {
                intake_config.email.api_key = Some(key);
            } else if let Ok(key) = std::env::var("RESEND_API_KEY") {
                intake_config.email.api_key = Some(key);
            }
        }

        if intake_config.email.api_key.is_none() {
            // Absence is logged, never fatal; the boundary reports
            // not-configured on every submission instead.
            tracing::warn!("no notification API key found in configuration or environment");
        }

        Ok(intake_config)
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
static CONFIG: std::sync::LazyLock<Result<LeadIntakeConfig, anyhow::Error>> =
    std::sync::LazyLock::new(|| {
        // Load .env file first
        let _ = LeadIntakeConfig::load_env_file();
        LeadIntakeConfig::load()
    });

/// Get the global configuration
pub fn config() -> Result<&'static LeadIntakeConfig> {
    CONFIG
        .as_ref()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
}

/// Initialize configuration (called at startup)
pub fn init_config() -> Result<()> {
    let _config = config()?;
    tracing::info!("Configuration loaded successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_stated_policy() {
        let config = LeadIntakeConfig::default();
        assert_eq!(config.form.reset_delay_seconds, 5);
        assert_eq!(config.form.max_attachment_bytes, 10 * 1024 * 1024);
        assert_eq!(config.rate_limit.max_requests, 3);
        assert!(config.email.api_key.is_none());
    }

    #[test]
    fn config_round_trips_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lead-intake.toml");
        let config = LeadIntakeConfig::default();
        config.save_to_file(&path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let parsed: LeadIntakeConfig = toml::from_str(&raw).unwrap();
        assert_eq!(parsed.email.to_address, config.email.to_address);
        assert_eq!(parsed.rate_limit.window_ms, config.rate_limit.window_ms);
    }
}
