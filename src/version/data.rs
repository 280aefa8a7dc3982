//! Single vendor option version identifiers
//!
//! A [`VersionData`] names one version of one vendor option family. Besides
//! ordinary releases (`2.8.3`, `2.7.x`, `2.10.0-SNAPSHOT`) every family has
//! three special values: the "Not Set" sentinel, `First` and `Latest`.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::LazyLock;

use regex::Regex;

use crate::version::error::VersionError;
use crate::version::family::{FamilyRegistry, VendorOptionFamily};

const SNAPSHOT_SUFFIX: &str = "-SNAPSHOT";
const EARLIEST: &str = "First";
const LATEST: &str = "Latest";
pub const NOT_SET: &str = "Not Set";

/// Separator between family identifier and version text
const DELIMITER: char = '@';

static RELEASE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d+|[xX])(?:\.(?:\d+|[xX])){0,3}$").expect("release pattern is valid")
});

/// One numeric position of a release. `Any` covers every number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Component {
    Number(u32),
    Any,
}

impl Component {
    fn parse(text: &str) -> Result<Self, VersionError> {
        if text.eq_ignore_ascii_case("x") {
            return Ok(Component::Any);
        }
        text.parse::<u32>()
            .map(Component::Number)
            .map_err(|_| VersionError::InvalidVersion(text.to_string()))
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Number(n) => write!(f, "{n}"),
            Component::Any => f.write_str("x"),
        }
    }
}

/// Snapshots sort before the release carrying the same numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    Snapshot,
    Release,
}

/// Numeric part of a release: major, minor, patch, sub-patch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReleaseNumber {
    pub components: [Component; 4],
    pub stage: Stage,
}

impl ReleaseNumber {
    pub fn major(&self) -> Component {
        self.components[0]
    }

    pub fn minor(&self) -> Component {
        self.components[1]
    }

    fn parse(text: &str) -> Result<Self, VersionError> {
        let (numbers, stage) = match text.strip_suffix(SNAPSHOT_SUFFIX) {
            Some(rest) => (rest, Stage::Snapshot),
            None => (text, Stage::Release),
        };

        if !RELEASE_RE.is_match(numbers) {
            return Err(VersionError::InvalidVersion(text.to_string()));
        }

        let mut components = [Component::Any; 4];
        for (slot, part) in components.iter_mut().zip(numbers.split('.')) {
            *slot = Component::parse(part)
                .map_err(|_| VersionError::InvalidVersion(text.to_string()))?;
        }

        Ok(Self { components, stage })
    }
}

/// Kind of version, declared in ascending sort order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VersionKind {
    NotSet,
    Earliest,
    Release(ReleaseNumber),
    Latest,
}

/// An immutable (family, version) value.
///
/// Equality, hashing and ordering use the family and the parsed kind only, so
/// `2.7` and `2.7.x` are the same version. Versions of different families are
/// unordered.
#[derive(Debug, Clone)]
pub struct VersionData {
    family: VendorOptionFamily,
    kind: VersionKind,
    label: String,
}

impl VersionData {
    /// Parse version text for a family
    pub fn parse(family: VendorOptionFamily, text: &str) -> Result<Self, VersionError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(VersionError::InvalidVersion(text.to_string()));
        }

        let kind = if trimmed.eq_ignore_ascii_case(EARLIEST) {
            VersionKind::Earliest
        } else if trimmed.eq_ignore_ascii_case(LATEST) {
            VersionKind::Latest
        } else if trimmed.eq_ignore_ascii_case(NOT_SET) || trimmed.eq_ignore_ascii_case("NotSet")
        {
            VersionKind::NotSet
        } else {
            VersionKind::Release(ReleaseNumber::parse(trimmed)?)
        };

        Ok(Self {
            family,
            kind,
            label: trimmed.to_string(),
        })
    }

    /// The "no vendor option selected" sentinel of a family
    pub fn not_set(family: VendorOptionFamily) -> Self {
        Self {
            family,
            kind: VersionKind::NotSet,
            label: NOT_SET.to_string(),
        }
    }

    pub fn earliest(family: VendorOptionFamily) -> Self {
        Self {
            family,
            kind: VersionKind::Earliest,
            label: EARLIEST.to_string(),
        }
    }

    pub fn latest(family: VendorOptionFamily) -> Self {
        Self {
            family,
            kind: VersionKind::Latest,
            label: LATEST.to_string(),
        }
    }

    /// A concrete three-part release
    pub fn release(family: VendorOptionFamily, major: u32, minor: u32, patch: u32) -> Self {
        Self {
            family,
            kind: VersionKind::Release(ReleaseNumber {
                components: [
                    Component::Number(major),
                    Component::Number(minor),
                    Component::Number(patch),
                    Component::Any,
                ],
                stage: Stage::Release,
            }),
            label: format!("{major}.{minor}.{patch}"),
        }
    }

    pub fn family(&self) -> VendorOptionFamily {
        self.family
    }

    pub fn kind(&self) -> &VersionKind {
        &self.kind
    }

    /// Text this version was created from
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_not_set(&self) -> bool {
        self.kind == VersionKind::NotSet
    }

    pub fn is_earliest(&self) -> bool {
        self.kind == VersionKind::Earliest
    }

    pub fn is_latest(&self) -> bool {
        self.kind == VersionKind::Latest
    }

    pub fn release_number(&self) -> Option<&ReleaseNumber> {
        match &self.kind {
            VersionKind::Release(number) => Some(number),
            _ => None,
        }
    }

    /// Check whether this version lies within `[minimum, maximum]`.
    ///
    /// An absent bound is unbounded. A bound from another family, or this
    /// version being the "Not Set" sentinel, yields false.
    pub fn in_range(&self, minimum: Option<&VersionData>, maximum: Option<&VersionData>) -> bool {
        if self.is_not_set() {
            return false;
        }

        let above_minimum = minimum.is_none_or(|min| {
            matches!(
                self.partial_cmp(min),
                Some(Ordering::Greater | Ordering::Equal)
            )
        });
        let below_maximum = maximum.is_none_or(|max| {
            matches!(self.partial_cmp(max), Some(Ordering::Less | Ordering::Equal))
        });

        above_minimum && below_maximum
    }

    /// Encode as `<family id>@<version text>`
    pub fn encode(&self) -> String {
        format!("{}{}{}", self.family.as_str(), DELIMITER, self.label)
    }

    /// Decode a string produced by [`VersionData::encode`]
    pub fn decode(registry: &FamilyRegistry, encoded: &str) -> Result<Self, VersionError> {
        let Some((identifier, text)) = encoded.split_once(DELIMITER) else {
            return Err(VersionError::MalformedEncoding(encoded.to_string()));
        };

        let family = registry.resolve(identifier)?;
        Self::parse(family, text)
    }
}

impl PartialEq for VersionData {
    fn eq(&self, other: &Self) -> bool {
        self.family == other.family && self.kind == other.kind
    }
}

impl Eq for VersionData {}

impl Hash for VersionData {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.family.hash(state);
        self.kind.hash(state);
    }
}

impl PartialOrd for VersionData {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.family != other.family {
            return None;
        }
        Some(self.kind.cmp(&other.kind))
    }
}

impl fmt::Display for VersionData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}
