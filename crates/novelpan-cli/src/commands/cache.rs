use crate::cache::CacheManager;
use crate::cli::{CacheArgs, CacheCommands};
use crate::error::{CliError, Result};
use tracing::info;

pub fn run(args: CacheArgs) -> Result<()> {
    match args.command {
        CacheCommands::Path => {
            let manager = CacheManager::new()?;
            println!("{}", manager.cache_path().display());
        }
        CacheCommands::Clear => {
            let manager = CacheManager::new()?;
            info!("Clearing prediction cache at {:?}", manager.cache_path());
            manager
                .prediction_cache()
                .clear()
                .map_err(|e| CliError::Cache(e.to_string()))?;
            println!("✓ Cleared prediction cache at {}", manager.cache_path().display());
        }
        CacheCommands::SetPath { path } => {
            CacheManager::set_custom_path(&path)?;
            println!("✓ Cache path set to {}", path.display());
        }
        CacheCommands::ResetPath => {
            CacheManager::reset_path()?;
            let manager = CacheManager::new()?;
            println!(
                "✓ Cache path reset to default: {}",
                manager.cache_path().display()
            );
        }
    }
    Ok(())
}
