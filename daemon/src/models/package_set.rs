use crate::schema::*;
use diesel::prelude::*;
use imagerd_common::config::PACKAGES_HASH_LEN;
use imagerd_common::errors::*;
use imagerd_common::utils::content_hash;

/// Content-addressed package-name list. Requests reference package sets by
/// this fixed-width hash instead of an unbounded string.
#[derive(Queryable, Selectable, Insertable, Clone, PartialEq, Eq, Debug)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(table_name = package_sets)]
pub struct PackageSet {
    pub hash: String,
    pub packages: String,
}

impl PackageSet {
    /// Normalizes the list (sorted, deduplicated, space-joined), stores it
    /// under its content hash and returns the hash. Write-once per hash,
    /// safe to call repeatedly.
    pub fn add(packages: &[String], connection: &mut SqliteConnection) -> Result<String> {
        let joined = Self::normalize(packages);
        let set = PackageSet {
            hash: content_hash(&joined, PACKAGES_HASH_LEN),
            packages: joined,
        };

        diesel::insert_into(package_sets::table)
            .values(&set)
            .on_conflict_do_nothing()
            .execute(connection)?;
        Ok(set.hash)
    }

    pub fn get(my_hash: &str, connection: &mut SqliteConnection) -> Result<Option<Vec<String>>> {
        let packages = package_sets::table
            .filter(package_sets::hash.eq(my_hash))
            .select(package_sets::packages)
            .first::<String>(connection)
            .optional()?;
        Ok(packages.map(|packages| {
            packages
                .split_whitespace()
                .map(str::to_string)
                .collect()
        }))
    }

    fn normalize(packages: &[String]) -> String {
        let mut packages = packages.to_vec();
        packages.sort();
        packages.dedup();
        packages.join(" ")
    }
}
