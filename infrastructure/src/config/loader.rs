//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::PathBuf;

const PROJECT_FILES: [&str; 2] = ["dashboard.toml", ".dashboard.toml"];
const ENV_PREFIX: &str = "DASHBOARD_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `DASHBOARD_*` environment variables
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./dashboard.toml` or `./.dashboard.toml`
    /// 4. XDG config: `$XDG_CONFIG_HOME/dashboard/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(project_path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(project_path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        Self::extract(figment)
    }

    /// Load defaults plus `DASHBOARD_*` overrides, skipping every file (for --no-config)
    pub fn load_defaults() -> Result<FileConfig, Box<figment::Error>> {
        Self::extract(Figment::new().merge(Serialized::defaults(FileConfig::default())))
    }

    fn extract(figment: Figment) -> Result<FileConfig, Box<figment::Error>> {
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(Box::new)
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/dashboard/config.toml if set,
    /// otherwise falls back to ~/.config/dashboard/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("dashboard").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources() {
        println!("Configuration sources (in priority order):");

        println!("  [     ] Environment: {}*", ENV_PREFIX);

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./dashboard.toml or ./.dashboard.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }
}
