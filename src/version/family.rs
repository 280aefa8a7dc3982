//! Vendor option families and the registry that resolves their identifiers

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::version::error::VersionError;

/// The vendor-option namespace a version belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VendorOptionFamily {
    /// Plain SLD without any vendor extension
    StrictSld,
    /// GeoServer vendor options
    #[serde(rename = "geoserver")]
    GeoServer,
}

impl VendorOptionFamily {
    pub const ALL: [VendorOptionFamily; 2] =
        [VendorOptionFamily::StrictSld, VendorOptionFamily::GeoServer];

    /// Returns the canonical identifier used in encoded strings
    pub fn as_str(&self) -> &'static str {
        match self {
            VendorOptionFamily::StrictSld => "strict_sld",
            VendorOptionFamily::GeoServer => "geoserver",
        }
    }

    /// Returns the human readable name shown in titles
    pub fn display_name(&self) -> &'static str {
        match self {
            VendorOptionFamily::StrictSld => "Strict SLD",
            VendorOptionFamily::GeoServer => "GeoServer",
        }
    }
}

impl fmt::Display for VendorOptionFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps string identifiers to vendor option families.
///
/// Built once at startup and handed to whatever decodes persisted versions,
/// so an unknown identifier is a lookup miss rather than a load failure.
#[derive(Debug, Clone)]
pub struct FamilyRegistry {
    families: IndexMap<String, VendorOptionFamily>,
}

impl FamilyRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            families: IndexMap::new(),
        }
    }

    /// Create a registry holding the canonical identifier of every family
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for family in VendorOptionFamily::ALL {
            registry.register_alias(family.as_str(), family);
        }
        registry
    }

    /// Register an additional identifier for a family
    pub fn register_alias(&mut self, identifier: impl Into<String>, family: VendorOptionFamily) {
        self.families.insert(identifier.into(), family);
    }

    /// Resolve an identifier to its family
    pub fn resolve(&self, identifier: &str) -> Result<VendorOptionFamily, VersionError> {
        self.families
            .get(identifier.trim())
            .copied()
            .ok_or_else(|| VersionError::UnknownFamily(identifier.to_string()))
    }

    /// Identifiers known to this registry, in registration order
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.families.keys().map(String::as_str)
    }
}

impl Default for FamilyRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("strict_sld", Ok(VendorOptionFamily::StrictSld))]
    #[case("geoserver", Ok(VendorOptionFamily::GeoServer))]
    #[case(" geoserver ", Ok(VendorOptionFamily::GeoServer))]
    #[case("mapserver", Err(VersionError::UnknownFamily("mapserver".to_string())))]
    #[case("", Err(VersionError::UnknownFamily(String::new())))]
    fn resolve_returns_expected(
        #[case] identifier: &str,
        #[case] expected: Result<VendorOptionFamily, VersionError>,
    ) {
        assert_eq!(FamilyRegistry::with_defaults().resolve(identifier), expected);
    }

    #[test]
    fn register_alias_resolves_to_family() {
        let mut registry = FamilyRegistry::with_defaults();
        registry.register_alias("gs", VendorOptionFamily::GeoServer);

        assert_eq!(registry.resolve("gs"), Ok(VendorOptionFamily::GeoServer));
        assert_eq!(
            registry.identifiers().collect::<Vec<_>>(),
            vec!["strict_sld", "geoserver", "gs"]
        );
    }

    #[test]
    fn empty_registry_resolves_nothing() {
        let registry = FamilyRegistry::new();
        assert!(registry.resolve("geoserver").is_err());
    }
}
