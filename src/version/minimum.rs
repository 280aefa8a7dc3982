//! Minimum version inference for a style document
//!
//! Given the vendor options found in a document, work out the lowest version
//! of each family that still supports all of them.

use std::collections::BTreeMap;

use crate::version::data::VersionData;
use crate::version::family::VendorOptionFamily;
use crate::version::range::VendorOptionVersion;

/// A vendor option found in a document, with the range that supports it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorOptionPresent {
    /// What was found, e.g. `labelObstacle` on a point symbolizer
    pub name: String,
    pub range: VendorOptionVersion,
}

impl VendorOptionPresent {
    pub fn new(name: impl Into<String>, range: VendorOptionVersion) -> Self {
        Self {
            name: name.into(),
            range,
        }
    }
}

/// Infer the versions a document needs.
///
/// Per family, the answer is the greatest lower bound across every vendor
/// option present. When no vendor option with a lower bound is present,
/// `defaults` is returned as is.
pub fn minimum_versions(
    present: &[VendorOptionPresent],
    defaults: &[VersionData],
) -> Vec<VersionData> {
    let mut required: BTreeMap<VendorOptionFamily, VersionData> = BTreeMap::new();

    for option in present {
        let family = option.range.family();
        if family == VendorOptionFamily::StrictSld {
            continue;
        }
        let Some(minimum) = option.range.minimum() else {
            continue;
        };
        if minimum.is_earliest() {
            continue;
        }

        let raises = required
            .get(&family)
            .is_none_or(|current| current < minimum);
        if raises {
            required.insert(family, minimum.clone());
        }
    }

    if required.is_empty() {
        return defaults.to_vec();
    }

    required.into_values().collect()
}
