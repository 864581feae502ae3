use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::env;
use std::fs;
use std::path::PathBuf;

pub struct AppPaths;

impl AppPaths {
    fn get_proj_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("com", "trougnouf", "fiche")
    }

    /// Helper to ensure a directory exists before returning it.
    fn ensure_exists(path: PathBuf) -> Result<PathBuf> {
        if !path.exists() {
            fs::create_dir_all(&path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(path)
    }

    fn resolve_base(subdir: &str) -> Option<PathBuf> {
        // Test override
        if let Ok(test_dir) = env::var("FICHE_TEST_DIR") {
            return Some(PathBuf::from(test_dir));
        }

        let proj = Self::get_proj_dirs()?;
        let dir = match subdir {
            "config" => proj.config_dir(),
            "cache" => proj.cache_dir(),
            _ => return None,
        };
        Some(dir.to_path_buf())
    }

    pub fn get_config_dir() -> Result<PathBuf> {
        let path = Self::resolve_base("config")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Self::ensure_exists(path)
    }

    pub fn get_cache_dir() -> Result<PathBuf> {
        let path = Self::resolve_base("cache")
            .ok_or_else(|| anyhow::anyhow!("Could not determine cache directory"))?;
        Self::ensure_exists(path)
    }

    pub fn get_config_file_path() -> Result<PathBuf> {
        Ok(Self::get_config_dir()?.join("config.toml"))
    }

    pub fn get_log_file_path() -> Result<PathBuf> {
        Ok(Self::get_cache_dir()?.join("fiche.log"))
    }
}
