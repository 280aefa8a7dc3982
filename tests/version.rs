use std::collections::HashSet;

use rstest::rstest;
use sld_vendor_options::version::data::VersionData;
use sld_vendor_options::version::family::{FamilyRegistry, VendorOptionFamily};
use sld_vendor_options::version::menu::MenuBuilder;
use sld_vendor_options::version::range::{RangeConstraint, VendorOptionVersion};

const GS: VendorOptionFamily = VendorOptionFamily::GeoServer;

fn parse_all(texts: &[&str]) -> Vec<VersionData> {
    texts
        .iter()
        .map(|t| VersionData::parse(GS, t).unwrap())
        .collect()
}

#[test]
fn menu_groups_mixed_versions_into_minor_series() {
    let mut input = parse_all(&["1.3.1", "1.2.0", "1.3.99", "1.4.5", "1.4.1", "1.3.3"]);
    input.push(VersionData::not_set(GS));

    let menu = MenuBuilder::new().create_menu(GS, &input);
    let groups = menu.groups();

    assert_eq!(groups.len(), 4);
    assert_eq!(groups[0].label, "Not Set");
    assert_eq!(groups[1].label, "1.2.0");
    assert_eq!(groups[1].versions, parse_all(&["1.2.0"]));
    assert_eq!(groups[2].label, "1.3.x");
    assert_eq!(groups[2].versions, parse_all(&["1.3.1", "1.3.3", "1.3.99"]));
    assert_eq!(groups[3].label, "1.4.x");
    assert_eq!(groups[3].versions, parse_all(&["1.4.1", "1.4.5"]));
}

#[rstest]
#[case(&["2.4.1", "2.4.1", "2.10.0", "2.9.3", "2.9.0"])]
#[case(&["1.0", "1.0.1", "3.2.1", "Latest"])]
#[case(&["0.1.0"])]
fn menu_groups_partition_the_input(#[case] texts: &[&str]) {
    let input = parse_all(texts);

    let menu = MenuBuilder::new().create_menu(GS, &input);

    let grouped: Vec<&VersionData> = menu.groups()[1..]
        .iter()
        .flat_map(|g| g.versions.iter())
        .collect();
    let distinct: HashSet<&VersionData> = input.iter().collect();
    assert_eq!(grouped.len(), distinct.len());
    assert_eq!(grouped.into_iter().collect::<HashSet<_>>(), distinct);
}

#[test]
fn menu_built_twice_from_equal_lists_is_identical() {
    let builder = MenuBuilder::new();

    let first = builder.create_menu(GS, &parse_all(&["2.8.0", "2.8.1", "2.9.0"]));
    let second = builder.create_menu(GS, &parse_all(&["2.8.0", "2.8.1", "2.9.0"]));

    assert_eq!(first.groups(), second.groups());
}

#[test]
fn set_selected_with_unknown_version_keeps_selection() {
    let mut menu = MenuBuilder::new().create_menu(GS, &parse_all(&["2.8.0", "2.8.1"]));
    let chosen = VersionData::parse(GS, "2.8.1").unwrap();
    menu.set_selected(&chosen);

    assert!(menu.set_selected(&VersionData::parse(GS, "9.9.9").unwrap()).is_none());
    assert_eq!(menu.selected(), &chosen);
}

#[test]
fn stored_range_round_trips_and_guards_versions() {
    let registry = FamilyRegistry::with_defaults();
    let range = VendorOptionVersion::new(
        GS,
        Some(VersionData::parse(GS, "2.4.1").unwrap()),
        Some(VersionData::parse(GS, "2.8.3").unwrap()),
    )
    .unwrap();

    let constraint = RangeConstraint::decode(&registry, &range.encode());

    assert_eq!(constraint, RangeConstraint::Constrained(range));
    assert_eq!(
        constraint.permits(&VersionData::parse(GS, "2.7.x").unwrap()),
        Some(true)
    );
    assert_eq!(
        constraint.permits(&VersionData::parse(GS, "2.10.0").unwrap()),
        Some(false)
    );
    assert_eq!(
        constraint.permits(&VersionData::parse(VendorOptionFamily::StrictSld, "2.5").unwrap()),
        Some(false)
    );
}

#[test]
fn stored_range_with_unknown_family_is_unknown_not_error() {
    let registry = FamilyRegistry::with_defaults();

    let constraint = RangeConstraint::decode(&registry, "qgis;qgis@3.4;-");

    assert!(matches!(constraint, RangeConstraint::Unknown { .. }));
}
