//! Version ranges attached to vendor options

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::version::data::VersionData;
use crate::version::error::VersionError;
use crate::version::family::{FamilyRegistry, VendorOptionFamily};

const DELIMITER: char = ';';
const UNBOUNDED: &str = "-";

/// An inclusive `[minimum, maximum]` range of versions within one family.
/// Either bound may be absent, meaning unbounded on that side.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VendorOptionVersion {
    family: VendorOptionFamily,
    minimum: Option<VersionData>,
    maximum: Option<VersionData>,
}

impl VendorOptionVersion {
    /// Create a range, checking that both bounds belong to `family` and are ordered
    pub fn new(
        family: VendorOptionFamily,
        minimum: Option<VersionData>,
        maximum: Option<VersionData>,
    ) -> Result<Self, VersionError> {
        for bound in minimum.iter().chain(maximum.iter()) {
            if bound.family() != family {
                return Err(VersionError::MismatchedFamily {
                    expected: family,
                    found: bound.family(),
                });
            }
        }

        if let (Some(min), Some(max)) = (&minimum, &maximum) {
            if min.partial_cmp(max) == Some(Ordering::Greater) {
                return Err(VersionError::InvertedRange {
                    minimum: min.to_string(),
                    maximum: max.to_string(),
                });
            }
        }

        Ok(Self {
            family,
            minimum,
            maximum,
        })
    }

    /// A range holding exactly one version
    pub fn exact(version: VersionData) -> Self {
        Self {
            family: version.family(),
            minimum: Some(version.clone()),
            maximum: Some(version),
        }
    }

    /// The `First..Latest` range of a family
    pub fn full(family: VendorOptionFamily) -> Self {
        Self {
            family,
            minimum: Some(VersionData::earliest(family)),
            maximum: Some(VersionData::latest(family)),
        }
    }

    pub fn family(&self) -> VendorOptionFamily {
        self.family
    }

    pub fn minimum(&self) -> Option<&VersionData> {
        self.minimum.as_ref()
    }

    pub fn maximum(&self) -> Option<&VersionData> {
        self.maximum.as_ref()
    }

    /// Check if a selected version enables this vendor option
    pub fn is_allowed(&self, version: &VersionData) -> bool {
        if version.family() != self.family {
            return false;
        }
        version.in_range(self.minimum(), self.maximum())
    }

    /// Encode as `<family id>;<minimum or '-'>;<maximum or '-'>`
    pub fn encode(&self) -> String {
        let bound =
            |b: Option<&VersionData>| b.map_or_else(|| UNBOUNDED.to_string(), VersionData::encode);
        format!(
            "{}{DELIMITER}{}{DELIMITER}{}",
            self.family.as_str(),
            bound(self.minimum()),
            bound(self.maximum())
        )
    }

    /// Decode a string produced by [`VendorOptionVersion::encode`]
    pub fn decode(registry: &FamilyRegistry, encoded: &str) -> Result<Self, VersionError> {
        let components: Vec<&str> = encoded.split(DELIMITER).collect();
        let [identifier, minimum, maximum] = components.as_slice() else {
            return Err(VersionError::MalformedEncoding(encoded.to_string()));
        };

        let family = registry.resolve(identifier)?;
        let bound = |text: &str| -> Result<Option<VersionData>, VersionError> {
            if text.trim() == UNBOUNDED {
                Ok(None)
            } else {
                VersionData::decode(registry, text).map(Some)
            }
        };

        Self::new(family, bound(*minimum)?, bound(*maximum)?)
    }
}

impl fmt::Display for VendorOptionVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// What a persisted range string turned out to mean
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeConstraint {
    /// Nothing was stored; no additional constraint applies
    Unconstrained,
    /// A valid range
    Constrained(VendorOptionVersion),
    /// Something was stored but could not be understood
    Unknown { reason: String },
}

impl RangeConstraint {
    /// Decode a stored range string. Failures are logged and reported as
    /// [`RangeConstraint::Unknown`], never as errors.
    pub fn decode(registry: &FamilyRegistry, encoded: &str) -> Self {
        if encoded.trim().is_empty() {
            return RangeConstraint::Unconstrained;
        }

        match VendorOptionVersion::decode(registry, encoded) {
            Ok(range) => RangeConstraint::Constrained(range),
            Err(e) => {
                warn!("Failed to decode vendor option range {:?}: {}", encoded, e);
                RangeConstraint::Unknown {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Check a version against this constraint.
    ///
    /// Returns `None` for [`RangeConstraint::Unknown`]; resolve it with an
    /// [`UnknownConstraintPolicy`].
    pub fn permits(&self, version: &VersionData) -> Option<bool> {
        match self {
            RangeConstraint::Unconstrained => Some(true),
            RangeConstraint::Constrained(range) => Some(range.is_allowed(version)),
            RangeConstraint::Unknown { .. } => None,
        }
    }

    pub fn range(&self) -> Option<&VendorOptionVersion> {
        match self {
            RangeConstraint::Constrained(range) => Some(range),
            _ => None,
        }
    }
}

/// How to treat a constraint that could not be decoded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UnknownConstraintPolicy {
    /// Hide anything guarded by an unreadable constraint
    #[default]
    Reject,
    /// Show it as if no constraint were stored
    Allow,
}

impl UnknownConstraintPolicy {
    pub fn resolve(&self, permitted: Option<bool>) -> bool {
        permitted.unwrap_or(matches!(self, UnknownConstraintPolicy::Allow))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const GS: VendorOptionFamily = VendorOptionFamily::GeoServer;
    const STRICT: VendorOptionFamily = VendorOptionFamily::StrictSld;

    fn v(family: VendorOptionFamily, text: &str) -> VersionData {
        VersionData::parse(family, text).unwrap()
    }

    fn range(min: &str, max: &str) -> VendorOptionVersion {
        VendorOptionVersion::new(GS, Some(v(GS, min)), Some(v(GS, max))).unwrap()
    }

    #[test]
    fn new_rejects_bound_of_another_family() {
        let result = VendorOptionVersion::new(GS, Some(v(STRICT, "1.0")), None);

        assert_eq!(
            result,
            Err(VersionError::MismatchedFamily {
                expected: GS,
                found: STRICT
            })
        );
    }

    #[test]
    fn new_rejects_inverted_bounds() {
        let result = VendorOptionVersion::new(GS, Some(v(GS, "2.9.0")), Some(v(GS, "2.4.0")));

        assert_eq!(
            result,
            Err(VersionError::InvertedRange {
                minimum: "2.9.0".to_string(),
                maximum: "2.4.0".to_string()
            })
        );
    }

    #[rstest]
    #[case(v(GS, "1.8.3"), false)]
    #[case(v(GS, "2.4.1"), true)]
    #[case(v(GS, "2.7.x"), true)]
    #[case(v(GS, "2.8.3"), true)]
    #[case(v(GS, "2.8.4"), false)]
    #[case(v(STRICT, "2.5.0"), false)]
    #[case(VersionData::not_set(GS), false)]
    fn is_allowed_returns_expected(#[case] candidate: VersionData, #[case] expected: bool) {
        assert_eq!(range("2.4.1", "2.8.3").is_allowed(&candidate), expected);
    }

    #[test]
    fn full_range_allows_every_release_of_its_family_only() {
        let full = VendorOptionVersion::full(STRICT);

        assert!(full.is_allowed(&VersionData::latest(STRICT)));
        assert!(full.is_allowed(&v(STRICT, "1.0.0")));
        assert!(!full.is_allowed(&VersionData::latest(GS)));
    }

    #[test]
    fn exact_range_allows_single_version() {
        let exact = VendorOptionVersion::exact(v(GS, "2.8.0"));

        assert!(exact.is_allowed(&v(GS, "2.8.0")));
        assert!(!exact.is_allowed(&v(GS, "2.8.1")));
    }

    #[rstest]
    #[case(range("2.4.1", "2.8.3"))]
    #[case(VendorOptionVersion::new(GS, None, Some(v(GS, "2.8.3"))).unwrap())]
    #[case(VendorOptionVersion::new(GS, Some(v(GS, "2.4.1")), None).unwrap())]
    #[case(VendorOptionVersion::new(STRICT, None, None).unwrap())]
    #[case(VendorOptionVersion::full(GS))]
    fn decode_restores_encoded_range(#[case] original: VendorOptionVersion) {
        let registry = FamilyRegistry::with_defaults();

        let decoded = VendorOptionVersion::decode(&registry, &original.encode()).unwrap();

        assert_eq!(decoded, original);
    }

    #[test]
    fn encode_uses_dash_for_missing_bounds() {
        let open = VendorOptionVersion::new(GS, Some(v(GS, "2.4.1")), None).unwrap();

        assert_eq!(open.encode(), "geoserver;geoserver@2.4.1;-");
    }

    #[rstest]
    #[case("", RangeConstraint::Unconstrained)]
    #[case("  ", RangeConstraint::Unconstrained)]
    #[case(
        "geoserver;geoserver@2.4.1;geoserver@2.8.3",
        RangeConstraint::Constrained(range("2.4.1", "2.8.3"))
    )]
    fn constraint_decode_returns_expected(#[case] text: &str, #[case] expected: RangeConstraint) {
        let registry = FamilyRegistry::with_defaults();
        assert_eq!(RangeConstraint::decode(&registry, text), expected);
    }

    #[rstest]
    #[case("mapserver;-;-")]
    #[case("geoserver;mapserver@1.0;-")]
    #[case("geoserver;strict_sld@1.0;-")]
    #[case("geoserver;geoserver@2.9;geoserver@2.4")]
    #[case("geoserver;-")]
    #[case("geoserver;geoserver@abc;-")]
    fn constraint_decode_reports_unknown(#[case] text: &str) {
        let registry = FamilyRegistry::with_defaults();

        let constraint = RangeConstraint::decode(&registry, text);

        assert!(matches!(constraint, RangeConstraint::Unknown { .. }));
        assert_eq!(constraint.permits(&v(GS, "2.5.0")), None);
    }

    #[rstest]
    #[case(UnknownConstraintPolicy::Reject, None, false)]
    #[case(UnknownConstraintPolicy::Allow, None, true)]
    #[case(UnknownConstraintPolicy::Allow, Some(false), false)]
    #[case(UnknownConstraintPolicy::Reject, Some(true), true)]
    fn policy_resolves_only_unknown(
        #[case] policy: UnknownConstraintPolicy,
        #[case] permitted: Option<bool>,
        #[case] expected: bool,
    ) {
        assert_eq!(policy.resolve(permitted), expected);
    }

    #[test]
    fn unconstrained_permits_everything() {
        assert_eq!(
            RangeConstraint::Unconstrained.permits(&VersionData::not_set(GS)),
            Some(true)
        );
    }
}
