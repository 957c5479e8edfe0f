//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Environment variable that overrides `sanity.token`
pub const TOKEN_ENV: &str = "SANITY_API_TOKEN";

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub tagline: String,
    pub description: String,

    // URL
    pub url: String,
    pub root: String,

    // Content lake
    #[serde(default)]
    pub sanity: SanityConfig,

    /// Seconds a rendered post page may be cached by clients and proxies
    pub revalidate: u64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Medium Blog".to_string(),
            tagline: "A place to write, read, and connect".to_string(),
            description: String::new(),

            url: "http://localhost:3000".to_string(),
            root: "/".to_string(),

            sanity: SanityConfig::default(),

            revalidate: 60,
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Pick up the API token from the environment, if set
    pub fn apply_env(&mut self) {
        if let Ok(token) = std::env::var(TOKEN_ENV) {
            if !token.is_empty() {
                tracing::debug!("Using Sanity token from {}", TOKEN_ENV);
                self.sanity.token = Some(token);
            }
        }
    }
}

/// Sanity project configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SanityConfig {
    pub project_id: String,
    pub dataset: String,
    pub api_version: String,
    /// Read through the API CDN instead of the live API
    pub use_cdn: bool,
    /// Write token; required for comment creation
    pub token: Option<String>,
}

impl Default for SanityConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            dataset: "production".to_string(),
            api_version: "2021-10-21".to_string(),
            use_cdn: true,
            token: None,
        }
    }
}

impl SanityConfig {
    /// Base URL of the data API for this project
    pub fn api_base(&self, cdn: bool) -> String {
        let host = if cdn { "apicdn" } else { "api" };
        format!(
            "https://{}.{}.sanity.io/v{}",
            self.project_id, host, self.api_version
        )
    }
}
