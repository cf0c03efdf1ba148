//! CLI configuration.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use storescan_commerce::Currency;
use storescan_data::DEFAULT_MOBILE;

/// Environment variable overriding `api.base_url`.
pub const API_URL_ENV: &str = "STORESCAN_API_URL";
/// Environment variable overriding `api.mobile`.
pub const MOBILE_ENV: &str = "STORESCAN_MOBILE";

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Store backend.
    #[serde(default)]
    pub api: ApiConfig,

    /// Price display.
    #[serde(default)]
    pub display: DisplayConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;
        Self::parse(&content, path.ends_with(".json"))
            .with_context(|| format!("Failed to parse config file: {}", path))
    }

    fn parse(content: &str, json: bool) -> Result<Self> {
        if json {
            Ok(serde_json::from_str(content)?)
        } else {
            Ok(toml::from_str(content)?)
        }
    }

    /// Apply `STORESCAN_*` environment overrides.
    pub fn with_env(self) -> Self {
        self.with_overrides(
            std::env::var(API_URL_ENV).ok(),
            std::env::var(MOBILE_ENV).ok(),
        )
    }

    fn with_overrides(mut self, base_url: Option<String>, mobile: Option<String>) -> Self {
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            self.api.base_url = url;
        }
        if let Some(mobile) = mobile.filter(|m| !m.trim().is_empty()) {
            self.api.mobile = mobile;
        }
        self
    }

    /// Currency prices are shown and sent in.
    pub fn currency(&self) -> Result<Currency> {
        Currency::from_code(&self.display.currency)
            .ok_or_else(|| anyhow!("Unsupported currency: {}", self.display.currency))
    }
}

/// Store backend settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL `/stores` and `/orders` are resolved against.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Customer number attached to orders.
    #[serde(default = "default_mobile")]
    pub mobile: String,
}

fn default_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_mobile() -> String {
    DEFAULT_MOBILE.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            mobile: default_mobile(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// ISO currency code.
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    Currency::default().code().to_string()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
        }
    }
}

/// Generate a default storescan.toml config file.
pub fn generate_default_config() -> String {
    format!(
        r#"# storescan configuration

[api]
base_url = "{base_url}"
# Customer number sent with every order
mobile = "{mobile}"

[display]
currency = "{currency}"
"#,
        base_url = default_base_url(),
        mobile = default_mobile(),
        currency = default_currency(),
    )
}
