use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::version::data::VersionData;
use crate::version::error::ConfigError;
use crate::version::family::FamilyRegistry;
use crate::version::range::UnknownConstraintPolicy;

/// Default log level when neither the config nor RUST_LOG set one
pub const DEFAULT_LOG_LEVEL: &str = "info";

const APP_DIR: &str = "sld-vendor-options";

/// Resolver configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ResolverConfig {
    pub catalogue: CatalogueConfig,
    pub preferences: PreferencesConfig,
    pub unknown_constraint: UnknownConstraintPolicy,
    pub log: LogConfig,
}

/// Where the version catalogue comes from
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CatalogueConfig {
    /// JSON catalogue replacing the built-in one
    pub path: Option<PathBuf>,
}

/// User preferences
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PreferencesConfig {
    /// Encoded versions (`geoserver@2.4.2`) used when a style has no vendor options
    pub vendor_options: Vec<String>,
}

impl PreferencesConfig {
    /// Decode the preferred versions, skipping entries that do not decode
    pub fn default_versions(&self, registry: &FamilyRegistry) -> Vec<VersionData> {
        self.vendor_options
            .iter()
            .filter_map(|encoded| match VersionData::decode(registry, encoded) {
                Ok(version) => Some(version),
                Err(e) => {
                    warn!("Ignoring preferred vendor option {:?}: {}", encoded, e);
                    None
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl ResolverConfig {
    /// Read configuration from a JSON file
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Read `path` if given, otherwise the default config file when it
    /// exists, otherwise use defaults
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_path(path),
            None => {
                let default_path = config_path();
                if default_path.exists() {
                    info!("Using configuration at {:?}", default_path);
                    Self::from_path(&default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

/// Returns the path to the data directory for sld-vendor-options.
/// Uses $XDG_DATA_HOME/sld-vendor-options if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/sld-vendor-options,
/// or ./sld-vendor-options if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the default configuration file.
pub fn config_path() -> PathBuf {
    data_dir().join("config.json")
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("sld-vendor-options.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join(APP_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::family::VendorOptionFamily;
    use serde_json::json;

    #[test]
    fn config_from_partial_object_uses_defaults_for_missing_fields() {
        let result = serde_json::from_value::<ResolverConfig>(json!({
            "unknownConstraint": "allow"
        }))
        .unwrap();

        assert_eq!(result.unknown_constraint, UnknownConstraintPolicy::Allow);
        assert_eq!(result.catalogue, CatalogueConfig::default());
        assert_eq!(result.log.level, "info");
    }

    #[test]
    fn config_from_full_object_parses_all_fields() {
        let result = serde_json::from_value::<ResolverConfig>(json!({
            "catalogue": { "path": "/etc/versions.json" },
            "preferences": { "vendorOptions": ["geoserver@2.4.2"] },
            "unknownConstraint": "reject",
            "log": { "level": "debug" }
        }))
        .unwrap();

        assert_eq!(
            result,
            ResolverConfig {
                catalogue: CatalogueConfig {
                    path: Some(PathBuf::from("/etc/versions.json"))
                },
                preferences: PreferencesConfig {
                    vendor_options: vec!["geoserver@2.4.2".to_string()]
                },
                unknown_constraint: UnknownConstraintPolicy::Reject,
                log: LogConfig {
                    level: "debug".to_string()
                },
            }
        );
    }

    #[test]
    fn default_versions_skips_undecodable_entries() {
        let preferences = PreferencesConfig {
            vendor_options: vec![
                "geoserver@2.4.2".to_string(),
                "mapserver@7.0".to_string(),
                "geoserver@abc".to_string(),
            ],
        };

        let versions = preferences.default_versions(&FamilyRegistry::with_defaults());

        assert_eq!(
            versions,
            vec![VersionData::parse(VendorOptionFamily::GeoServer, "2.4.2").unwrap()]
        );
    }

    #[test]
    fn data_dir_with_env_uses_xdg_data_home_when_set() {
        let path = data_dir_with_env(
            Some("/tmp/test-data".to_string()),
            Some(PathBuf::from("/home/user")),
        );

        assert_eq!(path, PathBuf::from("/tmp/test-data/sld-vendor-options"));
    }

    #[test]
    fn data_dir_with_env_falls_back_to_home_local_share() {
        let path = data_dir_with_env(None, Some(PathBuf::from("/home/user")));

        assert_eq!(
            path,
            PathBuf::from("/home/user/.local/share/sld-vendor-options")
        );
    }

    #[test]
    fn data_dir_with_env_falls_back_to_current_dir_when_no_dirs_available() {
        let path = data_dir_with_env(None, None);
        assert_eq!(path, PathBuf::from("./sld-vendor-options"));
    }
}
