//! Catalogue of known versions per vendor option family

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::{debug, info};

use crate::version::data::VersionData;
use crate::version::error::{ConfigError, VersionError};
use crate::version::family::VendorOptionFamily;

/// Versions shipped with the crate
const BUILTIN_CATALOGUE: &str = include_str!("versions.json");

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogueFile {
    vendor_options: Vec<CatalogueEntry>,
}

#[derive(Debug, Deserialize)]
struct CatalogueEntry {
    family: VendorOptionFamily,
    #[serde(default)]
    versions: Vec<String>,
}

/// Known versions of every vendor option family, in catalogue order.
///
/// Each family's list starts with its "Not Set" sentinel.
#[derive(Debug, Clone)]
pub struct VendorOptionCatalogue {
    versions: IndexMap<VendorOptionFamily, Vec<VersionData>>,
}

impl VendorOptionCatalogue {
    /// Load the catalogue embedded in the crate
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_json(BUILTIN_CATALOGUE)
    }

    /// Load a catalogue from a JSON file
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        info!("Loading vendor option catalogue from {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let file: CatalogueFile = serde_json::from_str(content)?;

        let mut versions: IndexMap<VendorOptionFamily, Vec<VersionData>> = VendorOptionFamily::ALL
            .iter()
            .map(|family| (*family, vec![VersionData::not_set(*family)]))
            .collect();

        for entry in file.vendor_options {
            let list = versions.entry(entry.family).or_default();
            for text in &entry.versions {
                let version = VersionData::parse(entry.family, text)?;
                if !list.contains(&version) {
                    list.push(version);
                }
            }
            debug!(
                "Catalogued {} versions for {}",
                entry.versions.len(),
                entry.family
            );
        }

        Ok(Self { versions })
    }

    /// All catalogued versions of a family, starting with "Not Set"
    pub fn versions(&self, family: VendorOptionFamily) -> &[VersionData] {
        self.versions.get(&family).map(Vec::as_slice).unwrap_or_default()
    }

    /// Parse version text and return the catalogued version it names
    pub fn find(&self, family: VendorOptionFamily, text: &str) -> Result<VersionData, VersionError> {
        let parsed = VersionData::parse(family, text)?;
        self.versions(family)
            .iter()
            .find(|v| **v == parsed)
            .cloned()
            .ok_or_else(|| VersionError::InvalidVersion(text.to_string()))
    }

    /// The newest catalogued version of a family
    pub fn latest(&self, family: VendorOptionFamily) -> Option<&VersionData> {
        self.versions(family)
            .iter()
            .filter(|v| !v.is_not_set())
            .fold(None, |newest: Option<&VersionData>, v| match newest {
                Some(n) if n >= v => Some(n),
                _ => Some(v),
            })
    }
}
