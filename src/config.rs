use std::path::PathBuf;

use directories::ProjectDirs;
use serde::Deserialize;

use crate::cli::OutputFormat;
use crate::error::{Result, StoreError};

const FILE_ENV: &str = "USERSTORE_FILE";

#[derive(Deserialize, Default, Debug)]
pub struct Config {
    pub file_name: Option<PathBuf>,
    pub format: Option<OutputFormat>,
}

impl Config {
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(path),
            None => Ok(Config::default()),
        }
    }

    pub fn load_from(config_path: PathBuf) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let contents =
            std::fs::read_to_string(&config_path).map_err(|e| StoreError::ConfigRead {
                path: config_path.clone(),
                source: e,
            })?;

        toml::from_str(&contents).map_err(|e| StoreError::ConfigParse {
            path: config_path,
            source: e,
        })
    }

    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "userstore").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Get the store file, preferring an explicit argument over the
    /// environment and the environment over the config file
    pub fn resolve_file_name(&self, explicit: Option<PathBuf>) -> Option<PathBuf> {
        let from_env = std::env::var_os(FILE_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        self.resolve_file_name_with(explicit, from_env)
    }

    fn resolve_file_name_with(
        &self,
        explicit: Option<PathBuf>,
        from_env: Option<PathBuf>,
    ) -> Option<PathBuf> {
        explicit
            .filter(|p| !p.as_os_str().is_empty())
            .or(from_env)
            .or_else(|| self.file_name.clone())
    }
}
