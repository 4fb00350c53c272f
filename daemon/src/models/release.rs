use crate::schema::*;
use diesel::prelude::*;
use imagerd_common::errors::*;

#[derive(Identifiable, Queryable, Selectable, Clone, PartialEq, Eq, Debug)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(table_name = releases)]
pub struct Release {
    pub id: i32,
    pub distro: String,
    pub release: String,
}

impl Release {
    pub fn list(connection: &mut SqliteConnection) -> Result<Vec<Release>> {
        let results = releases::table
            .order_by((releases::distro, releases::release))
            .select(Release::as_select())
            .load::<Release>(connection)?;
        Ok(results)
    }

    pub fn for_distro(my_distro: &str, connection: &mut SqliteConnection) -> Result<Vec<String>> {
        let results = releases::table
            .filter(releases::distro.eq(my_distro))
            .order_by(releases::release)
            .select(releases::release)
            .load::<String>(connection)?;
        Ok(results)
    }
}

#[derive(Insertable, PartialEq, Eq, Debug, Clone)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(table_name = releases)]
pub struct NewRelease {
    pub distro: String,
    pub release: String,
}

impl NewRelease {
    /// Releases are immutable once imported, re-importing a known pair is
    /// a no-op.
    pub fn insert(&self, connection: &mut SqliteConnection) -> Result<()> {
        info!("insert release {}/{}", self.distro, self.release);
        diesel::insert_into(releases::table)
            .values(self)
            .on_conflict_do_nothing()
            .execute(connection)?;
        Ok(())
    }
}
