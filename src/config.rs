use anyhow::Result;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure that can be loaded from CLI, config file, or environment
///
/// Example configuration file content
/// # Media Gateway Configuration
///
/// # Server configuration
/// listen_on_port = 8080
///
/// # Provider configuration
/// fal_key = "key-id:key-secret"
/// fal_queue_url = "https://queue.fal.run"
/// poll_interval_ms = 1000
/// request_timeout_secs = 300
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(version, about, long_about = None)]
#[serde(default)]
pub struct Config {
    /// Port to listen on
    #[arg(short, long, default_value_t = 8080)]
    #[serde(default = "default_port")]
    pub listen_on_port: u16,

    /// Credential for the hosted inference provider.
    /// Falls back to the FAL_KEY environment variable when unset; a missing
    /// credential is a runtime configuration error, not a startup failure.
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fal_key: Option<String>,

    /// Base URL of the provider queue API
    #[arg(long, default_value_t = default_queue_url())]
    #[serde(default = "default_queue_url")]
    pub fal_queue_url: String,

    /// Interval between provider status polls, in milliseconds
    #[arg(long, default_value_t = 1000)]
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Timeout for individual provider HTTP calls, in seconds
    #[arg(long, default_value_t = 300)]
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Configuration file path (overrides all other arguments)
    #[arg(short, long)]
    #[serde(skip)]
    pub config: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_on_port: default_port(),
            fal_key: None,
            fal_queue_url: default_queue_url(),
            poll_interval_ms: default_poll_interval_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            config: None,
        }
    }
}

impl Config {
    /// Load configuration from CLI args, optionally merging with a config file
    pub fn load() -> Result<Self> {
        // First parse CLI args
        let mut config = Config::parse();

        // If a config file is specified, load it and merge
        if let Some(config_path) = &config.config {
            let file_config = Self::from_file(Path::new(config_path))?;
            config = config.merge_with_file(file_config);
        }

        // Environment fallback for the credential, so deployments that only
        // export FAL_KEY keep working without a flag or config file
        if config.fal_key.is_none() {
            config.fal_key = std::env::var("FAL_KEY").ok().filter(|key| !key.is_empty());
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Merge with file config, CLI args take precedence
    fn merge_with_file(mut self, file_config: Config) -> Self {
        // If CLI value is default, use file value
        if self.listen_on_port == default_port() {
            self.listen_on_port = file_config.listen_on_port;
        }
        if self.fal_queue_url == default_queue_url() {
            self.fal_queue_url = file_config.fal_queue_url;
        }
        if self.poll_interval_ms == default_poll_interval_ms() {
            self.poll_interval_ms = file_config.poll_interval_ms;
        }
        if self.request_timeout_secs == default_request_timeout_secs() {
            self.request_timeout_secs = file_config.request_timeout_secs;
        }

        // For Option fields, CLI takes precedence if Some
        if self.fal_key.is_none() {
            self.fal_key = file_config.fal_key;
        }

        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.fal_queue_url.starts_with("http://") && !self.fal_queue_url.starts_with("https://")
        {
            return Err(anyhow::anyhow!(
                "Provider queue URL must start with http:// or https://"
            ));
        }

        if self.poll_interval_ms == 0 {
            return Err(anyhow::anyhow!("poll_interval_ms must be greater than 0"));
        }

        if self.request_timeout_secs == 0 {
            return Err(anyhow::anyhow!(
                "request_timeout_secs must be greater than 0"
            ));
        }

        Ok(())
    }
}

// Default value functions
fn default_port() -> u16 {
    8080
}

fn default_queue_url() -> String {
    "https://queue.fal.run".to_string()
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_request_timeout_secs() -> u64 {
    300
}
