//! Application configuration module for placeseek
//!
//! Provides TOML-based configuration with environment variable override support.
//! Priority: CLI args > Environment variables > Config file > Defaults

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration
///
/// Built once at startup and handed to the rewriter and the place-search
/// client when they are constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Address the HTTP server binds to
    #[serde(default = "default_bind_addr")]
    bind_addr: String,

    /// Google Maps Platform key for the Places API
    #[serde(default)]
    google_maps_api_key: Option<String>,

    /// Anthropic key for query rewriting
    #[serde(default)]
    anthropic_api_key: Option<String>,

    /// Anthropic API base URL
    #[serde(default = "default_anthropic_base_url")]
    anthropic_base_url: String,

    /// Model used for query rewriting
    #[serde(default = "default_anthropic_model")]
    anthropic_model: String,

    /// Places API base URL
    #[serde(default = "default_places_base_url")]
    places_base_url: String,

    /// Per-call timeout for both upstreams; unset keeps the transport default
    #[serde(default)]
    request_timeout_secs: Option<u64>,

    /// Allow any origin on the HTTP surface
    #[serde(default = "default_cors_permissive")]
    cors_permissive: bool,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8010".to_string()
}

fn default_anthropic_base_url() -> String {
    "https://api.anthropic.com/v1".to_string()
}

fn default_anthropic_model() -> String {
    "claude-3-5-sonnet-20241022".to_string()
}

fn default_places_base_url() -> String {
    "https://maps.googleapis.com/maps/api/place".to_string()
}

fn default_cors_permissive() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            google_maps_api_key: None,
            anthropic_api_key: None,
            anthropic_base_url: default_anthropic_base_url(),
            anthropic_model: default_anthropic_model(),
            places_base_url: default_places_base_url(),
            request_timeout_secs: None,
            cors_permissive: default_cors_permissive(),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.trim().is_empty())
}

/// Values set in the environment, layered over the file config
///
/// `None` means the variable was not set, so a variable explicitly set to a
/// default value still overrides the file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverlay {
    pub bind_addr: Option<String>,
    pub google_maps_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub anthropic_base_url: Option<String>,
    pub anthropic_model: Option<String>,
    pub places_base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub cors_permissive: Option<bool>,
}

impl ConfigOverlay {
    /// Read the overlay from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Read the overlay through `lookup`, which maps a variable name to its value
    ///
    /// Unparsable numeric or boolean values are rejected.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let request_timeout_secs = match lookup("PLACESEEK_REQUEST_TIMEOUT_SECS") {
            Some(raw) => Some(raw.trim().parse::<u64>().with_context(|| {
                format!("Invalid PLACESEEK_REQUEST_TIMEOUT_SECS value {:?}", raw)
            })?),
            None => None,
        };

        let cors_permissive = match lookup("PLACESEEK_CORS_PERMISSIVE") {
            Some(raw) => Some(parse_bool(&raw).ok_or_else(|| {
                anyhow!(
                    "Invalid PLACESEEK_CORS_PERMISSIVE value {:?} (expected true/false)",
                    raw
                )
            })?),
            None => None,
        };

        Ok(Self {
            bind_addr: lookup("PLACESEEK_BIND_ADDR"),
            google_maps_api_key: lookup("GOOGLE_MAPS_API_KEY"),
            anthropic_api_key: lookup("ANTHROPIC_API_KEY"),
            anthropic_base_url: lookup("PLACESEEK_ANTHROPIC_BASE_URL"),
            anthropic_model: lookup("PLACESEEK_ANTHROPIC_MODEL"),
            places_base_url: lookup("PLACESEEK_PLACES_BASE_URL"),
            request_timeout_secs,
            cors_permissive,
        })
    }
}

impl AppConfig {
    /// Create config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path.display(), e))?;
        let config: AppConfig = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file: {}", e))?;
        Ok(config)
    }

    /// Create config from defaults plus environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self::default().merge_with(&ConfigOverlay::from_env()?))
    }

    /// Apply an overlay; every field the overlay sets wins
    pub fn merge_with(&self, overlay: &ConfigOverlay) -> Self {
        let mut merged = self.clone();
        if let Some(addr) = &overlay.bind_addr {
            merged.bind_addr = addr.clone();
        }
        if let Some(key) = &overlay.google_maps_api_key {
            merged.google_maps_api_key = Some(key.clone());
        }
        if let Some(key) = &overlay.anthropic_api_key {
            merged.anthropic_api_key = Some(key.clone());
        }
        if let Some(url) = &overlay.anthropic_base_url {
            merged.anthropic_base_url = url.clone();
        }
        if let Some(model) = &overlay.anthropic_model {
            merged.anthropic_model = model.clone();
        }
        if let Some(url) = &overlay.places_base_url {
            merged.places_base_url = url.clone();
        }
        if let Some(secs) = overlay.request_timeout_secs {
            merged.request_timeout_secs = Some(secs);
        }
        if let Some(flag) = overlay.cors_permissive {
            merged.cors_permissive = flag;
        }
        merged
    }

    /// Override bind_addr
    pub fn with_bind_addr(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Override google_maps_api_key
    pub fn with_google_maps_api_key(mut self, key: &str) -> Self {
        self.google_maps_api_key = Some(key.to_string());
        self
    }

    /// Override anthropic_api_key
    pub fn with_anthropic_api_key(mut self, key: &str) -> Self {
        self.anthropic_api_key = Some(key.to_string());
        self
    }

    /// Override anthropic_base_url
    pub fn with_anthropic_base_url(mut self, url: &str) -> Self {
        self.anthropic_base_url = url.to_string();
        self
    }

    /// Override places_base_url
    pub fn with_places_base_url(mut self, url: &str) -> Self {
        self.places_base_url = url.to_string();
        self
    }

    /// Override request_timeout_secs
    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = Some(secs);
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.google_maps_api_key().is_none() {
            return Err(anyhow!(
                "google_maps_api_key is required (set GOOGLE_MAPS_API_KEY)"
            ));
        }

        if self.anthropic_api_key().is_none() {
            return Err(anyhow!(
                "anthropic_api_key is required (set ANTHROPIC_API_KEY)"
            ));
        }

        if self.bind_addr.trim().is_empty() {
            return Err(anyhow!("bind_addr must not be empty"));
        }

        if self.request_timeout_secs == Some(0) {
            return Err(anyhow!("request_timeout_secs must be greater than 0"));
        }

        Ok(())
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| anyhow!("Failed to serialize config: {}", e))
    }

    // Getters
    pub fn bind_addr(&self) -> &str {
        &self.bind_addr
    }

    /// Google Maps key, `None` when unset or blank
    pub fn google_maps_api_key(&self) -> Option<&str> {
        non_blank(self.google_maps_api_key.as_ref())
    }

    /// Anthropic key, `None` when unset or blank
    pub fn anthropic_api_key(&self) -> Option<&str> {
        non_blank(self.anthropic_api_key.as_ref())
    }

    pub fn anthropic_base_url(&self) -> &str {
        &self.anthropic_base_url
    }

    pub fn anthropic_model(&self) -> &str {
        &self.anthropic_model
    }

    pub fn places_base_url(&self) -> &str {
        &self.places_base_url
    }

    pub fn request_timeout_secs(&self) -> Option<u64> {
        self.request_timeout_secs
    }

    pub fn cors_permissive(&self) -> bool {
        self.cors_permissive
    }
}
