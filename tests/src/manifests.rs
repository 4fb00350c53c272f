use crate::data::*;
use crate::fixtures::*;
use diesel::prelude::*;
use imagerd::models::{Manifest, PackageSet};
use imagerd::schema::{manifests, package_sets};
use rstest::rstest;

#[rstest]
pub fn add_manifest_is_idempotent(isolated_database: IsolatedDatabase) {
    let mut connection = isolated_database.connection();

    let first = Manifest::add(DUMMY_MANIFEST_HASH, &mut connection).unwrap();
    let second = Manifest::add(DUMMY_MANIFEST_HASH, &mut connection).unwrap();

    assert_eq!(first, second);
    let total = manifests::table
        .count()
        .get_result::<i64>(&mut connection)
        .unwrap();
    assert_eq!(total, 1);
}

#[rstest]
pub fn manifest_packages_round_trip(isolated_database: IsolatedDatabase) {
    let mut connection = isolated_database.connection();

    Manifest::add(DUMMY_MANIFEST_HASH, &mut connection).unwrap();
    Manifest::add_packages(DUMMY_MANIFEST_HASH, &dummy_manifest_packages(), &mut connection)
        .unwrap();

    let packages = Manifest::packages(DUMMY_MANIFEST_HASH, &mut connection).unwrap();
    assert_eq!(packages, dummy_manifest_packages());
}

#[rstest]
pub fn add_packages_for_unknown_manifest_is_an_error(isolated_database: IsolatedDatabase) {
    let mut connection = isolated_database.connection();

    let result =
        Manifest::add_packages(DUMMY_MANIFEST_HASH, &dummy_manifest_packages(), &mut connection);

    assert!(result.is_err());
}

#[rstest]
pub fn package_sets_are_stored_once_per_hash(isolated_database: IsolatedDatabase) {
    let mut connection = isolated_database.connection();

    let first = PackageSet::add(&dummy_packages(), &mut connection).unwrap();
    let second = PackageSet::add(&dummy_packages(), &mut connection).unwrap();

    assert_eq!(first, second);
    let total = package_sets::table
        .count()
        .get_result::<i64>(&mut connection)
        .unwrap();
    assert_eq!(total, 1);
}

#[rstest]
pub fn package_set_lookup_returns_the_normalized_list(isolated_database: IsolatedDatabase) {
    let mut connection = isolated_database.connection();

    let unsorted = vec![
        "vim".to_string(),
        "curl".to_string(),
        "luci".to_string(),
        "curl".to_string(),
    ];
    let hash = PackageSet::add(&unsorted, &mut connection).unwrap();

    let packages = PackageSet::get(&hash, &mut connection).unwrap().unwrap();
    assert_eq!(packages, dummy_packages());

    assert!(PackageSet::get("000000000000", &mut connection)
        .unwrap()
        .is_none());
}
