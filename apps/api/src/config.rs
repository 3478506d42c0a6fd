use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::pricing::profiles::PricingConfig;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// JSON pricing config. When unset, the embedded reference profiles are used.
    pub pricing_config_path: Option<PathBuf>,
    /// Directory searched for the DejaVu Sans TTFs.
    pub font_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            pricing_config_path: optional_env("PRICING_CONFIG").map(PathBuf::from),
            font_dir: optional_env("FONT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("fonts")),
        })
    }

    /// Loads the pricing profiles. A configured but unusable file is fatal.
    pub fn load_pricing(&self) -> Result<PricingConfig> {
        match &self.pricing_config_path {
            Some(path) => PricingConfig::from_file(path)
                .with_context(|| format!("Failed to load pricing config from {}", path.display())),
            None => Ok(PricingConfig::reference()),
        }
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
