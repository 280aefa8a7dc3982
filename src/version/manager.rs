//! Vendor option service
//!
//! Owns the family registry, the version catalogue and the versions currently
//! selected for the open document, and tells listeners when that selection
//! changes.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[cfg(test)]
use mockall::automock;
use tracing::{debug, info};

use crate::config::ResolverConfig;
use crate::version::catalogue::VendorOptionCatalogue;
use crate::version::data::VersionData;
use crate::version::error::{ConfigError, VersionError};
use crate::version::family::{FamilyRegistry, VendorOptionFamily};
use crate::version::menu::{MenuBuilder, VersionMenu};
use crate::version::minimum::{VendorOptionPresent, minimum_versions};
use crate::version::range::{RangeConstraint, UnknownConstraintPolicy, VendorOptionVersion};

const VENDOR_OPTION_TITLE: &str = "Vendor Option";

/// Receives the selected versions whenever they change
#[cfg_attr(test, automock)]
pub trait VendorOptionListener: Send + Sync {
    fn vendor_options_updated(&self, versions: &[VersionData]);
}

/// Where the vendor options of a loaded document come from
#[derive(Debug, Clone)]
pub enum DocumentSource {
    /// The editor's own file stored an explicit selection
    EditorFile(Vec<VersionData>),
    /// Vendor options detected in the style itself
    Detected(Vec<VendorOptionPresent>),
}

#[derive(Debug)]
struct SelectionState {
    selected: Vec<VersionData>,
    overridden: bool,
}

pub struct VendorOptionManager {
    registry: FamilyRegistry,
    catalogue: VendorOptionCatalogue,
    menus: MenuBuilder,
    unknown_policy: UnknownConstraintPolicy,
    preferences: Vec<VersionData>,
    state: Mutex<SelectionState>,
    listeners: Mutex<Vec<Arc<dyn VendorOptionListener>>>,
}

impl VendorOptionManager {
    /// Create a manager. `preferences` are the versions used when a document
    /// carries no vendor options; empty means strict SLD only.
    pub fn new(
        registry: FamilyRegistry,
        catalogue: VendorOptionCatalogue,
        unknown_policy: UnknownConstraintPolicy,
        preferences: Vec<VersionData>,
    ) -> Self {
        let default_version = Self::strict_default();
        let preferences = if preferences.is_empty() {
            vec![default_version.clone()]
        } else {
            preferences
        };

        Self {
            registry,
            catalogue,
            menus: MenuBuilder::new(),
            unknown_policy,
            preferences,
            state: Mutex::new(SelectionState {
                selected: vec![default_version],
                overridden: false,
            }),
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Build a manager from configuration
    pub fn from_config(config: &ResolverConfig) -> Result<Self, ConfigError> {
        let registry = FamilyRegistry::with_defaults();
        let catalogue = match &config.catalogue.path {
            Some(path) => VendorOptionCatalogue::from_path(path)?,
            None => VendorOptionCatalogue::builtin()?,
        };
        let preferences = config.preferences.default_versions(&registry);

        Ok(Self::new(
            registry,
            catalogue,
            config.unknown_constraint,
            preferences,
        ))
    }

    fn strict_default() -> VersionData {
        VersionData::latest(VendorOptionFamily::StrictSld)
    }

    fn lock_state(&self) -> MutexGuard<'_, SelectionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn registry(&self) -> &FamilyRegistry {
        &self.registry
    }

    pub fn preferences(&self) -> &[VersionData] {
        &self.preferences
    }

    /// Strict SLD `First..Latest`
    pub fn default_range(&self) -> VendorOptionVersion {
        VendorOptionVersion::full(VendorOptionFamily::StrictSld)
    }

    /// Upper bound of the default range
    pub fn default_version(&self) -> VersionData {
        Self::strict_default()
    }

    /// `First..Latest` of a family
    pub fn range_for(&self, family: VendorOptionFamily) -> VendorOptionVersion {
        VendorOptionVersion::full(family)
    }

    /// A range between two catalogued versions. A missing or unknown bound
    /// falls back to `First` or `Latest`.
    pub fn range_between(
        &self,
        family: VendorOptionFamily,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<VendorOptionVersion, VersionError> {
        let minimum = start
            .and_then(|text| self.catalogue.find(family, text).ok())
            .unwrap_or_else(|| VersionData::earliest(family));
        let maximum = end
            .and_then(|text| self.catalogue.find(family, text).ok())
            .unwrap_or_else(|| VersionData::latest(family));

        VendorOptionVersion::new(family, Some(minimum), Some(maximum))
    }

    /// True if any of `selected` enables `range`. Strict SLD ranges are
    /// always enabled.
    pub fn is_allowed(&self, selected: &[VersionData], range: &VendorOptionVersion) -> bool {
        if range.family() == VendorOptionFamily::StrictSld {
            return true;
        }
        selected.iter().any(|version| range.is_allowed(version))
    }

    /// Like [`Self::is_allowed`] for a decoded constraint, applying the
    /// configured policy to constraints that could not be read
    pub fn is_constraint_allowed(&self, selected: &[VersionData], constraint: &RangeConstraint) -> bool {
        match constraint {
            RangeConstraint::Unconstrained => true,
            RangeConstraint::Constrained(range) => self.is_allowed(selected, range),
            RangeConstraint::Unknown { .. } => self.unknown_policy.resolve(None),
        }
    }

    /// Decode a stored range with this manager's registry
    pub fn decode_constraint(&self, encoded: &str) -> RangeConstraint {
        RangeConstraint::decode(&self.registry, encoded)
    }

    /// Panel title describing a range, e.g. `- Vendor Option (GeoServer 2.4.2-2.9.0)`
    pub fn title(&self, range: Option<&VendorOptionVersion>) -> String {
        let mut title = format!("- {VENDOR_OPTION_TITLE} ");

        if let Some(range) = range {
            let earliest = range.minimum().map_or("First", VersionData::label);
            let latest = range.maximum().map_or("Latest", VersionData::label);

            title.push('(');
            title.push_str(range.family().display_name());
            title.push(' ');
            title.push_str(earliest);
            if earliest != latest {
                title.push('-');
                title.push_str(latest);
            }
            title.push(')');
        }

        title
    }

    /// The newest GeoServer version, as a selection
    pub fn latest(&self) -> Vec<VersionData> {
        let newest = self
            .catalogue
            .latest(VendorOptionFamily::GeoServer)
            .cloned()
            .unwrap_or_else(|| VersionData::latest(VendorOptionFamily::GeoServer));
        vec![newest]
    }

    /// Currently selected versions
    pub fn selected(&self) -> Vec<VersionData> {
        self.lock_state().selected.clone()
    }

    /// Register a listener; it is told the current selection straight away
    pub fn add_listener(&self, listener: Arc<dyn VendorOptionListener>) {
        {
            let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
            if listeners.iter().any(|l| Arc::ptr_eq(l, &listener)) {
                return;
            }
            listeners.push(Arc::clone(&listener));
        }

        let selected = self.selected();
        listener.vendor_options_updated(&selected);
    }

    /// Replace the selection. Ignored when unchanged or after
    /// [`Self::override_selected`]. Returns whether listeners were notified.
    pub fn set_selected(&self, versions: Vec<VersionData>) -> bool {
        {
            let mut state = self.lock_state();
            if state.overridden || state.selected == versions {
                debug!("Vendor option selection unchanged");
                return false;
            }
            state.selected = versions.clone();
        }

        self.notify(&versions);
        true
    }

    /// Apply a selection and ignore later [`Self::set_selected`] calls
    pub fn override_selected(&self, versions: Vec<VersionData>) {
        self.lock_state().overridden = false;
        self.set_selected(versions);
        self.lock_state().overridden = true;
    }

    fn notify(&self, versions: &[VersionData]) {
        let listeners = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for listener in listeners {
            listener.vendor_options_updated(versions);
        }
    }

    /// Select the vendor options of a newly loaded document
    pub fn load_document(&self, source: DocumentSource) -> Vec<VersionData> {
        let (versions, origin) = match source {
            DocumentSource::EditorFile(versions) => (versions, "editor file"),
            DocumentSource::Detected(present) => {
                (minimum_versions(&present, &self.preferences), "style")
            }
        };

        self.set_selected(versions.clone());

        if let Some(highest) = highest_version(&versions) {
            info!("Vendor options loaded from {} : {}", origin, version_string(highest));
        }

        versions
    }

    /// Menu of catalogued versions for a family, with the currently selected
    /// version of that family marked active
    pub fn menu(&self, family: VendorOptionFamily) -> VersionMenu {
        let mut menu = self
            .menus
            .create_menu(family, self.catalogue.versions(family));

        if let Some(current) = self.selected().iter().find(|v| v.family() == family) {
            menu.set_selected(current);
        }

        menu
    }
}

/// The most specific version of a selection: any vendor family wins over
/// strict SLD, the highest version within a family wins
fn highest_version(versions: &[VersionData]) -> Option<&VersionData> {
    versions.iter().fold(None, |best: Option<&VersionData>, v| match best {
        None => Some(v),
        Some(b) if b.family() == v.family() => Some(if v > b { v } else { b }),
        Some(b) if b.family() < v.family() => Some(v),
        Some(b) => Some(b),
    })
}

fn version_string(version: &VersionData) -> String {
    format!("{} {}", version.family().display_name(), version)
}
