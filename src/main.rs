use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::debug;

use sld_vendor_options::config::{ResolverConfig, log_path};
use sld_vendor_options::logging::init_logging;
use sld_vendor_options::version::data::VersionData;
use sld_vendor_options::version::manager::{DocumentSource, VendorOptionManager};
use sld_vendor_options::version::family::FamilyRegistry;
use sld_vendor_options::version::menu::{MenuBuilder, VersionMenu};
use sld_vendor_options::version::minimum::VendorOptionPresent;
use sld_vendor_options::version::range::{RangeConstraint, VendorOptionVersion};

#[derive(Parser)]
#[command(name = "sld-vendor-options")]
#[command(version, about = "Vendor option version resolution for SLD styles")]
struct Cli {
    /// Configuration file (defaults to the data directory's config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Group versions of a family into a menu
    Menu {
        /// Family identifier, e.g. geoserver
        family: String,
        /// Versions to group; defaults to the catalogue
        versions: Vec<String>,
        /// Version to mark as selected
        #[arg(long)]
        select: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Check whether selected versions enable a vendor option range
    Check {
        /// Encoded range, e.g. "geoserver;geoserver@2.4.1;-"
        range: String,
        /// Encoded selected versions, e.g. geoserver@2.8.0
        #[arg(required = true)]
        selected: Vec<String>,
    },
    /// Print the panel title of an encoded range
    Title { range: Option<String> },
    /// Print the newest known GeoServer version
    Latest,
    /// Infer the versions needed by a set of vendor option ranges
    Minimum {
        /// Encoded ranges of the vendor options found in a style
        present: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = ResolverConfig::load(cli.config.as_deref()).context("loading configuration")?;
    let _guard = init_logging(&log_path(), &config.log.level)
        .context("initialising logging")?;
    debug!("Configuration: {:?}", config);

    let manager = VendorOptionManager::from_config(&config).context("loading vendor options")?;

    match cli.command {
        Command::Menu {
            family,
            versions,
            select,
            json,
        } => {
            let family = manager.registry().resolve(&family)?;
            let mut menu = if versions.is_empty() {
                manager.menu(family)
            } else {
                let versions = versions
                    .iter()
                    .map(|text| VersionData::parse(family, text))
                    .collect::<Result<Vec<_>, _>>()?;
                MenuBuilder::new().create_menu(family, &versions)
            };

            if let Some(select) = select {
                let target = VersionData::parse(family, &select)?;
                if let Err(message) = select_version(&mut menu, &target) {
                    eprintln!("{message}");
                }
            }

            if json {
                println!("{}", serde_json::to_string_pretty(menu.groups())?);
            } else {
                for line in render_menu(&menu) {
                    println!("{line}");
                }
            }
        }
        Command::Check { range, selected } => {
            let constraint = manager.decode_constraint(&range);
            let selected = selected
                .iter()
                .map(|encoded| VersionData::decode(manager.registry(), encoded))
                .collect::<Result<Vec<_>, _>>()?;

            if let RangeConstraint::Unknown { reason } = &constraint {
                eprintln!("Unreadable range: {reason}");
            }
            let allowed = manager.is_constraint_allowed(&selected, &constraint);
            println!("{}", if allowed { "allowed" } else { "not allowed" });
        }
        Command::Title { range } => {
            let range = range
                .map(|encoded| VendorOptionVersion::decode(manager.registry(), &encoded))
                .transpose()?;
            println!("{}", manager.title(range.as_ref()));
        }
        Command::Latest => {
            for version in manager.latest() {
                println!("{}", version.encode());
            }
        }
        Command::Minimum { present } => {
            let present = decode_present(manager.registry(), &present)?;

            for version in manager.load_document(DocumentSource::Detected(present)) {
                println!("{}", version.encode());
            }
        }
    }

    Ok(())
}

/// One line per group, the active group marked with `*`
fn render_menu(menu: &VersionMenu) -> Vec<String> {
    menu.groups()
        .iter()
        .map(|group| {
            let marker = if group == menu.selected_group() { "*" } else { " " };
            if group.versions.len() > 1 {
                let members: Vec<&str> = group.versions.iter().map(|v| v.label()).collect();
                format!("{marker} {} [{}]", group.label, members.join(", "))
            } else {
                format!("{marker} {}", group.label)
            }
        })
        .collect()
}

fn select_version(menu: &mut VersionMenu, target: &VersionData) -> Result<(), String> {
    match menu.set_selected(target) {
        Some(_) => Ok(()),
        None => Err(format!("{target} is not in the menu")),
    }
}

fn decode_present(
    registry: &FamilyRegistry,
    encoded: &[String],
) -> anyhow::Result<Vec<VendorOptionPresent>> {
    encoded
        .iter()
        .map(|text| {
            VendorOptionVersion::decode(registry, text)
                .map(|range| VendorOptionPresent::new(text.clone(), range))
                .with_context(|| format!("decoding vendor option range {text:?}"))
        })
        .collect()
}
