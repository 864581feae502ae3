use crate::paths::AppPaths;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;

/// Environment override for the server address, read once at startup.
pub const BASE_URL_ENV: &str = "FICHE_BASE_URL";

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct Config {
    pub base_url: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        // The environment wins over the config file.
        if let Ok(url) = env::var(BASE_URL_ENV)
            && !url.is_empty()
        {
            return Ok(Self { base_url: url });
        }

        let path = AppPaths::get_config_file_path()?;
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)?;
            return Ok(config);
        }
        Err(anyhow::anyhow!("Config file not found"))
    }

    pub fn get_path_string() -> Result<String> {
        let path = AppPaths::get_config_file_path()?;
        Ok(path.to_string_lossy().to_string())
    }
}
