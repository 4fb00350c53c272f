use crate::schema::*;
use diesel::prelude::*;
use imagerd_common::api::{BuilderStatus, SubtargetKey};
use imagerd_common::errors::*;

#[derive(Identifiable, Queryable, Selectable, Clone, PartialEq, Eq, Debug)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(table_name = imagebuilders)]
pub struct ImageBuilder {
    pub id: i32,
    pub distro: String,
    pub release: String,
    pub target: String,
    pub subtarget: String,
    pub status: BuilderStatus,
}

impl ImageBuilder {
    /// Current provisioning state for a key. A key never seen before is
    /// registered as `requested` and that state returned: querying is also
    /// how demand for a new build environment is raised, so this is a read
    /// with a write side effect.
    pub fn status(key: &SubtargetKey, connection: &mut SqliteConnection) -> Result<BuilderStatus> {
        if let Some(status) = Self::lookup(key, connection)? {
            return Ok(status);
        }

        debug!("registering imagebuilder {key}");
        diesel::insert_into(imagebuilders::table)
            .values((
                imagebuilders::distro.eq(&key.distro),
                imagebuilders::release.eq(&key.release),
                imagebuilders::target.eq(&key.target),
                imagebuilders::subtarget.eq(&key.subtarget),
                imagebuilders::status.eq(BuilderStatus::Requested),
            ))
            .on_conflict_do_nothing()
            .execute(connection)?;

        // a racing loser still answers with the winner's row
        let status = Self::lookup(key, connection)?
            .ok_or_else(|| format_err!("Imagebuilder vanished during registration: {key}"))?;
        Ok(status)
    }

    /// Lifecycle states past `initialize` come from the provisioning
    /// pipeline and are stored verbatim.
    pub fn set_status(
        key: &SubtargetKey,
        status: BuilderStatus,
        connection: &mut SqliteConnection,
    ) -> Result<()> {
        let rows = diesel::update(imagebuilders::table)
            .filter(imagebuilders::distro.eq(&key.distro))
            .filter(imagebuilders::release.eq(&key.release))
            .filter(imagebuilders::target.eq(&key.target))
            .filter(imagebuilders::subtarget.eq(&key.subtarget))
            .set(imagebuilders::status.eq(status))
            .execute(connection)?;
        if rows == 0 {
            bail!("No imagebuilder for {key}");
        }
        Ok(())
    }

    /// FIFO claim for the provisioning pipeline, same discipline as the job
    /// queue: the oldest `requested` environment flips to `initialize` for
    /// exactly one caller.
    pub fn claim_next(connection: &mut SqliteConnection) -> Result<Option<SubtargetKey>> {
        connection.immediate_transaction::<_, Error, _>(|connection| {
            let candidate = imagebuilders::table
                .filter(imagebuilders::status.eq(BuilderStatus::Requested))
                .order_by(imagebuilders::id.asc())
                .select(ImageBuilder::as_select())
                .first::<ImageBuilder>(connection)
                .optional()?;

            let Some(builder) = candidate else {
                return Ok(None);
            };

            let claimed = diesel::update(imagebuilders::table)
                .filter(imagebuilders::id.eq(builder.id))
                .filter(imagebuilders::status.eq(BuilderStatus::Requested))
                .set(imagebuilders::status.eq(BuilderStatus::Initialize))
                .execute(connection)?;
            if claimed == 0 {
                return Ok(None);
            }

            debug!(
                "claimed imagebuilder setup {}/{}/{}/{}",
                builder.distro, builder.release, builder.target, builder.subtarget
            );
            Ok(Some(SubtargetKey {
                distro: builder.distro,
                release: builder.release,
                target: builder.target,
                subtarget: builder.subtarget,
            }))
        })
    }

    fn lookup(
        key: &SubtargetKey,
        connection: &mut SqliteConnection,
    ) -> Result<Option<BuilderStatus>> {
        let status = imagebuilders::table
            .filter(imagebuilders::distro.eq(&key.distro))
            .filter(imagebuilders::release.eq(&key.release))
            .filter(imagebuilders::target.eq(&key.target))
            .filter(imagebuilders::subtarget.eq(&key.subtarget))
            .select(imagebuilders::status)
            .first::<BuilderStatus>(connection)
            .optional()?;
        Ok(status)
    }
}
