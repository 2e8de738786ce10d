//! Configuration module for the call relay
//!
//! This module handles server configuration from various sources: .env files, YAML files,
//! and environment variables. Priority: YAML > ENV vars > .env values > defaults.
//!
//! # Modules
//! - `yaml`: YAML configuration file loading
//! - `env`: Environment variable helpers
//! - `merge`: Merging YAML and environment configurations
//! - `validation`: Configuration validation logic
//!
//! # Example
//! ```rust,no_run
//! use call_relay::config::ServerConfig;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load from environment variables only
//! let config = ServerConfig::from_env()?;
//!
//! // Load from YAML file with environment variable overrides
//! let config_path = PathBuf::from("config.yaml");
//! let config = ServerConfig::from_file(&config_path)?;
//!
//! println!("Server listening on {}", config.address());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

mod env;
mod merge;
mod validation;
mod yaml;

use crate::core::realtime::{OpenAIRealtimeVoice, RealtimeConfig};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5050;
pub const DEFAULT_VOICE: &str = "alloy";
pub const DEFAULT_KNOWLEDGE_DIR: &str = "PDF";
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful AI assistant. If the question is not in this text, do not answer it:";
pub const DEFAULT_GREETING: &str =
    "Please wait while we connect your call to the A. I. voice assistant.";
pub const DEFAULT_MAX_CALLS_PER_IP: u32 = 100;

/// TLS configuration for HTTPS and WSS
#[derive(Debug, Clone)]
pub struct TlsConfig {
    /// Path to the TLS certificate file (PEM format)
    pub cert_path: PathBuf,
    /// Path to the TLS private key file (PEM format)
    pub key_path: PathBuf,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub tls: Option<TlsConfig>,

    /// Host advertised to the telephony platform in the stream URL.
    /// Falls back to the request's `Host` header when unset.
    pub public_host: Option<String>,

    // Realtime AI endpoint
    pub openai_api_key: String,
    pub realtime_url: String,
    pub realtime_model: String,
    pub voice: String,

    // Instructions
    pub knowledge_dir: PathBuf,
    pub system_prompt: String,

    // Telephony handshake
    pub greeting: String,

    // Admission control
    /// Maximum concurrent calls (None = unlimited)
    pub max_concurrent_calls: Option<usize>,
    /// Maximum concurrent calls from a single IP address
    pub max_calls_per_ip: u32,
}

/// Zeroize the AI credential when the configuration is dropped.
impl Drop for ServerConfig {
    fn drop(&mut self) {
        use zeroize::Zeroize;
        self.openai_api_key.zeroize();
    }
}

impl ServerConfig {
    /// Load configuration from environment variables (and defaults).
    ///
    /// # Errors
    /// Returns an error if a variable has an invalid format or validation fails.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let config = merge::merge_config(None)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file with environment variable base
    ///
    /// Priority order (highest to lowest):
    /// 1. YAML file values
    /// 2. Environment variables (actual ENV vars override .env values)
    /// 3. .env file values
    /// 4. Default values
    ///
    /// # Errors
    /// Returns an error if:
    /// - The YAML file cannot be read or is malformed
    /// - Environment variables have invalid formats
    /// - Configuration validation fails
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        // .env is loaded into the process environment by main.rs at startup
        let yaml_config = yaml::YamlConfig::from_file(path)?;

        let config = merge::merge_config(Some(yaml_config))?;
        config.validate()?;

        Ok(config)
    }

    /// Merge all sources without validating the result.
    ///
    /// For offline commands that never contact the AI endpoint, so a missing
    /// credential is not an error here. Malformed values still are.
    pub fn load_unvalidated(path: Option<&PathBuf>) -> Result<Self, Box<dyn std::error::Error>> {
        let yaml_config = path.map(yaml::YamlConfig::from_file).transpose()?;
        merge::merge_config(yaml_config)
    }

    fn validate(&self) -> Result<(), String> {
        validation::validate_api_key(&self.openai_api_key)?;
        validation::validate_realtime_url(&self.realtime_url)?;
        validation::validate_model(&self.realtime_model)?;
        validation::validate_voice(&self.voice)?;
        validation::validate_limits(self.max_concurrent_calls, self.max_calls_per_ip)?;
        Ok(())
    }

    /// Get the server address as a string
    ///
    /// Returns the address in the format "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if TLS is enabled
    pub fn is_tls_enabled(&self) -> bool {
        self.tls.is_some()
    }

    /// Connection settings for the realtime AI endpoint.
    pub fn realtime_config(&self) -> RealtimeConfig {
        RealtimeConfig {
            api_key: self.openai_api_key.clone(),
            url: self.realtime_url.clone(),
            model: self.realtime_model.clone(),
        }
    }

    /// Configured output voice.
    pub fn realtime_voice(&self) -> OpenAIRealtimeVoice {
        OpenAIRealtimeVoice::from_str_or_default(&self.voice)
    }
}
