//! Configuration loading and root folder resolution
//!
//! The root folder holds everything the portal persists: the `records/`
//! CSV directory, the SQLite database, and the `refs/` reference CSVs.
//! Admin credentials and the bind address come from the environment, with
//! development defaults matching the original deployment.

use crate::{Error, Result};
use std::path::PathBuf;

/// Environment variable naming the root folder
pub const ROOT_ENV_VAR: &str = "PORTAL_ROOT";

/// Runtime settings assembled from CLI, environment and defaults
#[derive(Debug, Clone)]
pub struct Settings {
    /// Root folder for all persisted state
    pub root_folder: PathBuf,
    /// Host:port to bind the HTTP listener to
    pub bind_addr: String,
    /// Admin login used by the environment credential fallback
    pub admin_username: String,
    /// Plaintext admin secret (development fallback)
    pub admin_password: Option<String>,
    /// Pre-hashed admin secret; takes precedence over the plaintext one
    pub admin_password_hash: Option<String>,
}

impl Settings {
    /// Assemble settings, resolving the root folder through the priority
    /// chain and reading the rest from the environment.
    pub fn load(cli_root: Option<&str>) -> Result<Self> {
        Ok(Self {
            root_folder: resolve_root_folder(cli_root)?,
            bind_addr: std::env::var("PORTAL_BIND")
                .unwrap_or_else(|_| "127.0.0.1:5010".to_string()),
            admin_username: std::env::var("ADMIN_USERNAME")
                .unwrap_or_else(|_| "admin".to_string()),
            admin_password: Some(
                std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin".to_string()),
            ),
            admin_password_hash: std::env::var("ADMIN_PASSWORD_HASH").ok(),
        })
    }

    /// Directory holding one CSV file per record
    pub fn records_dir(&self) -> PathBuf {
        self.root_folder.join("records")
    }

    /// SQLite database path
    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join("portal.db")
    }

    /// Reference CSV mapping occupations to services
    pub fn occupations_csv(&self) -> PathBuf {
        self.root_folder.join("refs").join("services_consolidated.csv")
    }

    /// Reference CSV listing requesting organizations
    pub fn organizations_csv(&self) -> PathBuf {
        self.root_folder.join("refs").join("organizations.csv")
    }

    /// Create the root and records directories if they do not exist
    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root_folder)?;
        std::fs::create_dir_all(self.records_dir())?;
        Ok(())
    }
}

/// Root folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. `PORTAL_ROOT` environment variable
/// 3. TOML config file (`root_folder` key)
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(cli_arg: Option<&str>) -> Result<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Ok(PathBuf::from(path));
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(ROOT_ENV_VAR) {
        return Ok(PathBuf::from(path));
    }

    // Priority 3: TOML config file
    if let Ok(config_path) = locate_config_file() {
        if let Ok(toml_content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&toml_content) {
                if let Some(root_folder) = config.get("root_folder").and_then(|v| v.as_str()) {
                    return Ok(PathBuf::from(root_folder));
                }
            }
        }
    }

    // Priority 4: OS-dependent compiled default
    Ok(default_root_folder())
}

/// Find the configuration file for the platform
fn locate_config_file() -> Result<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("service-portal").join("config.toml"));

    if let Some(path) = user_config {
        if path.exists() {
            return Ok(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/service-portal/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
    }

    Err(Error::Config("No config file found".to_string()))
}

/// OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("service-portal"))
        .unwrap_or_else(|| PathBuf::from("./portal_data"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_argument_wins() {
        let root = resolve_root_folder(Some("/tmp/portal-test")).unwrap();
        assert_eq!(root, PathBuf::from("/tmp/portal-test"));
    }

    #[test]
    fn derived_paths_hang_off_the_root() {
        let settings = Settings {
            root_folder: PathBuf::from("/data/portal"),
            bind_addr: "127.0.0.1:5010".to_string(),
            admin_username: "admin".to_string(),
            admin_password: Some("admin".to_string()),
            admin_password_hash: None,
        };
        assert_eq!(settings.records_dir(), PathBuf::from("/data/portal/records"));
        assert_eq!(settings.database_path(), PathBuf::from("/data/portal/portal.db"));
        assert!(settings.occupations_csv().starts_with("/data/portal/refs"));
    }
}
