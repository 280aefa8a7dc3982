//! Grouping of version lists into selectable menus
//!
//! A menu always starts with a synthetic "Not Set" entry, followed by one
//! group per minor version series. A series holding a single version is shown
//! as that version; larger series are shown as `<major>.<minor>.x` with the
//! versions as children.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use tracing::{debug, warn};

use crate::version::data::{Component, NOT_SET, VersionData, VersionKind};
use crate::version::family::VendorOptionFamily;

/// One menu entry: a label and the versions it stands for
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionGroup {
    pub label: String,
    #[serde(serialize_with = "serialize_labels")]
    pub versions: Vec<VersionData>,
}

fn serialize_labels<S: serde::Serializer>(
    versions: &[VersionData],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(versions.iter().map(VersionData::label))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum GroupKey {
    Earliest,
    Series(Component, Component),
    Latest,
}

impl GroupKey {
    fn of(version: &VersionData) -> Option<Self> {
        match version.kind() {
            VersionKind::NotSet => None,
            VersionKind::Earliest => Some(GroupKey::Earliest),
            VersionKind::Latest => Some(GroupKey::Latest),
            VersionKind::Release(number) => {
                Some(GroupKey::Series(number.major(), number.minor()))
            }
        }
    }
}

/// A built menu plus the entry currently marked active
#[derive(Debug, Clone)]
pub struct VersionMenu {
    family: VendorOptionFamily,
    groups: Arc<[VersionGroup]>,
    selected: (usize, usize),
}

impl VersionMenu {
    pub fn family(&self) -> VendorOptionFamily {
        self.family
    }

    pub fn groups(&self) -> &[VersionGroup] {
        &self.groups
    }

    /// Shared group list; identical for menus served from the cache
    pub fn shared_groups(&self) -> &Arc<[VersionGroup]> {
        &self.groups
    }

    /// The active entry
    pub fn selected(&self) -> &VersionData {
        let (group, member) = self.selected;
        &self.groups[group].versions[member]
    }

    /// The group holding the active entry
    pub fn selected_group(&self) -> &VersionGroup {
        &self.groups[self.selected.0]
    }

    /// Mark the entry equal to `target` as active and return it.
    ///
    /// The "Not Set" sentinel selects the first entry. A target that is not in
    /// the menu leaves the selection unchanged and returns `None`.
    pub fn set_selected(&mut self, target: &VersionData) -> Option<&VersionData> {
        let position = self.groups.iter().enumerate().find_map(|(g, group)| {
            group
                .versions
                .iter()
                .position(|v| v == target)
                .map(|m| (g, m))
        });

        match position {
            Some(found) => {
                self.selected = found;
                Some(self.selected())
            }
            None => {
                debug!("Version {} is not in the {} menu", target, self.family);
                None
            }
        }
    }
}

struct CachedMenu {
    family: VendorOptionFamily,
    input: Vec<VersionData>,
    groups: Arc<[VersionGroup]>,
}

impl CachedMenu {
    fn matches(&self, family: VendorOptionFamily, versions: &[VersionData]) -> bool {
        self.family == family
            && self.input.len() == versions.len()
            && self
                .input
                .iter()
                .zip(versions)
                .all(|(a, b)| a == b && a.label() == b.label())
    }
}

/// Builds version menus, remembering the most recent input.
///
/// Only one input list is memoized; a different list replaces it.
#[derive(Default)]
pub struct MenuBuilder {
    cache: Mutex<Option<CachedMenu>>,
}

impl MenuBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group `versions` of `family` into a menu with "Not Set" selected
    pub fn create_menu(&self, family: VendorOptionFamily, versions: &[VersionData]) -> VersionMenu {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);

        let hit = cache
            .as_ref()
            .filter(|cached| cached.matches(family, versions))
            .map(|cached| Arc::clone(&cached.groups));

        let groups = match hit {
            Some(groups) => {
                debug!("Reusing cached {} menu", family);
                groups
            }
            None => {
                let groups: Arc<[VersionGroup]> = group_versions(family, versions).into();
                *cache = Some(CachedMenu {
                    family,
                    input: versions.to_vec(),
                    groups: Arc::clone(&groups),
                });
                groups
            }
        };

        VersionMenu {
            family,
            groups,
            selected: (0, 0),
        }
    }
}

/// Partition versions by minor series, behind a leading "Not Set" group
pub fn group_versions(family: VendorOptionFamily, versions: &[VersionData]) -> Vec<VersionGroup> {
    let mut series: BTreeMap<GroupKey, Vec<VersionData>> = BTreeMap::new();

    for version in versions {
        if version.family() != family {
            warn!(
                "Skipping {} version {} in {} menu",
                version.family(),
                version,
                family
            );
            continue;
        }

        let Some(key) = GroupKey::of(version) else {
            continue;
        };

        let members = series.entry(key).or_default();
        if !members.contains(version) {
            members.push(version.clone());
        }
    }

    let mut groups = Vec::with_capacity(series.len() + 1);
    groups.push(VersionGroup {
        label: NOT_SET.to_string(),
        versions: vec![VersionData::not_set(family)],
    });

    for (key, mut members) in series {
        members.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

        let label = match (key, members.as_slice()) {
            (_, [single]) => single.label().to_string(),
            (GroupKey::Series(major, minor), _) => format!("{major}.{minor}.x"),
            (_, members) => members[0].label().to_string(),
        };

        groups.push(VersionGroup {
            label,
            versions: members,
        });
    }

    groups
}
