use crate::schema::*;
use diesel::prelude::*;
use imagerd_common::api::SubtargetKey;
use imagerd_common::errors::*;

#[derive(Identifiable, Queryable, Selectable, Clone, PartialEq, Eq, Debug)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(table_name = subtargets)]
pub struct Subtarget {
    pub id: i32,
    pub distro: String,
    pub release: String,
    pub target: String,
    pub subtarget: String,
    pub supported: bool,
}

impl Subtarget {
    /// Resolves a key tuple to the row id referenced by worker skills and
    /// demand signals.
    pub fn get_id(key: &SubtargetKey, connection: &mut SqliteConnection) -> Result<Option<i32>> {
        let id = subtargets::table
            .filter(subtargets::distro.eq(&key.distro))
            .filter(subtargets::release.eq(&key.release))
            .filter(subtargets::target.eq(&key.target))
            .filter(subtargets::subtarget.eq(&key.subtarget))
            .select(subtargets::id)
            .first::<i32>(connection)
            .optional()?;
        Ok(id)
    }

    pub fn list(
        my_distro: &str,
        my_release: &str,
        my_target: Option<&str>,
        my_subtarget: Option<&str>,
        connection: &mut SqliteConnection,
    ) -> Result<Vec<Subtarget>> {
        let mut query = subtargets::table
            .select(Subtarget::as_select())
            .filter(subtargets::distro.eq(my_distro))
            .filter(subtargets::release.eq(my_release))
            .into_boxed();

        if let Some(my_target) = my_target {
            query = query.filter(subtargets::target.eq(my_target));
        }
        if let Some(my_subtarget) = my_subtarget {
            query = query.filter(subtargets::subtarget.eq(my_subtarget));
        }

        let results = query.order_by(subtargets::id).load::<Subtarget>(connection)?;
        Ok(results)
    }

    /// Flips `supported` after external validation. A missing subtarget
    /// argument marks the whole target.
    pub fn set_supported(
        my_distro: &str,
        my_release: &str,
        my_target: &str,
        my_subtarget: Option<&str>,
        connection: &mut SqliteConnection,
    ) -> Result<usize> {
        info!(
            "mark supported {}/{}/{}/{}",
            my_distro,
            my_release,
            my_target,
            my_subtarget.unwrap_or("%")
        );
        let rows = diesel::update(subtargets::table)
            .filter(subtargets::distro.eq(my_distro))
            .filter(subtargets::release.eq(my_release))
            .filter(subtargets::target.eq(my_target))
            .filter(subtargets::subtarget.like(my_subtarget.unwrap_or("%")))
            .set(subtargets::supported.eq(true))
            .execute(connection)?;
        Ok(rows)
    }
}

#[derive(Insertable, PartialEq, Eq, Debug, Clone)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(table_name = subtargets)]
pub struct NewSubtarget {
    pub distro: String,
    pub release: String,
    pub target: String,
    pub subtarget: String,
    pub supported: bool,
}

impl NewSubtarget {
    /// Bulk import per release. Subtargets start out unsupported.
    pub fn insert_batch(
        my_distro: &str,
        my_release: &str,
        my_target: &str,
        names: &[String],
        connection: &mut SqliteConnection,
    ) -> Result<()> {
        info!("insert subtargets {}/{}", my_target, names.join(" "));
        let rows = names
            .iter()
            .map(|name| NewSubtarget {
                distro: my_distro.to_string(),
                release: my_release.to_string(),
                target: my_target.to_string(),
                subtarget: name.to_string(),
                supported: false,
            })
            .collect::<Vec<_>>();

        // SQLite (via diesel) does not support a multi-row batch insert
        // combined with ON CONFLICT in a single statement, so insert each
        // row individually — same resulting rows, same conflict handling.
        for row in &rows {
            diesel::insert_into(subtargets::table)
                .values(row)
                .on_conflict_do_nothing()
                .execute(connection)?;
        }
        Ok(())
    }
}
