use crate::error::{CliError, Result};
use directories::ProjectDirs;
use novelpan::engine::cache::PredictionCache;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const QUALIFIER: &str = "org";
const ORGANIZATION: &str = "novelpan";
const APPLICATION: &str = "novelpan";
const PATH_CONFIG_FILE: &str = "cache-path.conf";

/// Resolves where predictions are cached: a user-set path if one was saved, else the OS cache directory.
#[derive(Debug)]
pub struct CacheManager {
    base_path: PathBuf,
}

impl CacheManager {
    pub fn new() -> Result<Self> {
        let path = Self::determine_cache_path()?;
        debug!("CacheManager initialized with path: {:?}", &path);
        Ok(Self { base_path: path })
    }

    pub fn with_custom_path(path: PathBuf) -> Self {
        Self { base_path: path }
    }

    pub fn cache_path(&self) -> &Path {
        &self.base_path
    }

    pub fn prediction_cache(&self) -> PredictionCache {
        PredictionCache::new(&self.base_path)
    }

    pub fn set_custom_path(path: &Path) -> Result<()> {
        if !path.is_absolute() {
            return Err(CliError::Argument(format!(
                "Cache path must be absolute: {}",
                path.display()
            )));
        }
        let config_path = Self::path_config_file()?;
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(config_path, path.to_string_lossy().as_bytes()).map_err(CliError::from)
    }

    pub fn reset_path() -> Result<()> {
        if let Ok(config_path) = Self::path_config_file() {
            if config_path.exists() {
                fs::remove_file(config_path)?;
            }
        }
        Ok(())
    }

    fn determine_cache_path() -> Result<PathBuf> {
        match Self::path_config_file() {
            Ok(config_path) if config_path.exists() => {
                Self::read_custom_path(&config_path)?.map_or_else(Self::default_cache_path, Ok)
            }
            _ => Self::default_cache_path(),
        }
    }

    fn read_custom_path(config_path: &Path) -> Result<Option<PathBuf>> {
        let custom_path_str = fs::read_to_string(config_path)?.trim().to_string();
        if custom_path_str.is_empty() {
            warn!("Custom cache path file is empty, falling back to default path.");
            return Ok(None);
        }
        Ok(Some(PathBuf::from(custom_path_str)))
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
            .ok_or_else(|| CliError::Cache("Could not determine a home directory.".to_string()))
    }

    fn path_config_file() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join(PATH_CONFIG_FILE))
    }

    fn default_cache_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.cache_dir().join("predictions"))
    }
}
