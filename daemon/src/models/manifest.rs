use crate::schema::*;
use diesel::prelude::*;
use imagerd_common::errors::*;

#[derive(Identifiable, Queryable, Selectable, Clone, PartialEq, Eq, Debug)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(table_name = manifests)]
pub struct Manifest {
    pub id: i32,
    pub hash: String,
}

impl Manifest {
    /// Insert-if-absent keyed by content hash. Always returns the resolved
    /// id, whether freshly inserted or pre-existing.
    pub fn add(my_hash: &str, connection: &mut SqliteConnection) -> Result<i32> {
        let inserted = diesel::insert_into(manifests::table)
            .values(manifests::hash.eq(my_hash))
            .on_conflict_do_nothing()
            .returning(manifests::id)
            .get_result::<i32>(connection)
            .optional()?;

        if let Some(id) = inserted {
            return Ok(id);
        }

        let existing = manifests::table
            .filter(manifests::hash.eq(my_hash))
            .select(manifests::id)
            .first::<i32>(connection)?;
        Ok(existing)
    }

    /// Append-only: the child rows of a manifest are written once, right
    /// after the manifest itself was first inserted. Callers must not call
    /// this twice for the same hash.
    pub fn add_packages(
        my_hash: &str,
        packages: &[(String, String)],
        connection: &mut SqliteConnection,
    ) -> Result<()> {
        debug!("add manifest packages for {my_hash}");
        let manifest_id = manifests::table
            .filter(manifests::hash.eq(my_hash))
            .select(manifests::id)
            .first::<i32>(connection)
            .optional()?
            .ok_or_else(|| format_err!("No manifest for hash {my_hash:?}"))?;

        let rows = packages
            .iter()
            .map(|(name, version)| NewManifestPackage {
                manifest_id,
                name: name.to_string(),
                version: version.to_string(),
            })
            .collect::<Vec<_>>();

        diesel::insert_into(manifest_packages::table)
            .values(rows)
            .execute(connection)?;
        Ok(())
    }

    pub fn packages(
        my_hash: &str,
        connection: &mut SqliteConnection,
    ) -> Result<Vec<(String, String)>> {
        let results = manifests::table
            .inner_join(manifest_packages::table)
            .filter(manifests::hash.eq(my_hash))
            .order_by(manifest_packages::id)
            .select((manifest_packages::name, manifest_packages::version))
            .load::<(String, String)>(connection)?;
        Ok(results)
    }
}

#[derive(Insertable, PartialEq, Eq, Debug, Clone)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(table_name = manifest_packages)]
pub struct NewManifestPackage {
    pub manifest_id: i32,
    pub name: String,
    pub version: String,
}
