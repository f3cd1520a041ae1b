use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result, anyhow};

use crate::chat::ResponseBook;
use crate::marquee::{default_logos, MarqueeOptions};
use crate::relay::FormRelayClient;

/// Placeholder relay forms; point these at your own form ids.
pub const DEFAULT_CONTACT_ENDPOINT: &str = "https://formspree.io/f/your-contact-form";
pub const DEFAULT_CHAT_ENDPOINT: &str = "https://formspree.io/f/your-chat-form";

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Config {
    pub profile: Profile,
    pub relay: RelayConfig,
    pub marquee: MarqueeOptions,
    /// Overrides the stock answers built from `profile.name`
    pub responses: Option<ResponseBook>,
    pub log_level: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Profile {
    pub name: String,
    /// Phrases the header types out in turn
    pub roles: Vec<String>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: "Alex Morgan".to_string(),
            roles: vec![
                "Full-Stack Developer".to_string(),
                "AWS Cloud Enthusiast".to_string(),
                "Team Lead & Mentor".to_string(),
                "Problem Solver".to_string(),
            ],
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct RelayConfig {
    pub contact_endpoint: String,
    pub chat_endpoint: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            contact_endpoint: DEFAULT_CONTACT_ENDPOINT.to_string(),
            chat_endpoint: DEFAULT_CHAT_ENDPOINT.to_string(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            profile: Profile::default(),
            relay: RelayConfig::default(),
            marquee: MarqueeOptions {
                logos: default_logos(),
                speed: 50.0,
                ..MarqueeOptions::default()
            },
            responses: None,
            log_level: "info".to_string(),
        }
    }

    /// Load from the default location; a missing file yields defaults.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            return Ok(Self::new());
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {:?}", path))?;
        let config: Config = serde_json::from_str(&config_content)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(path, config_content)?;
        Ok(())
    }

    pub fn response_book(&self) -> ResponseBook {
        self.responses
            .clone()
            .unwrap_or_else(|| ResponseBook::for_owner(&self.profile.name))
    }

    pub fn relay_client(&self) -> FormRelayClient {
        FormRelayClient::new(&self.relay.contact_endpoint, &self.relay.chat_endpoint)
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("folio").join("config.json"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
