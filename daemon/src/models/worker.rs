use crate::schema::*;
use chrono::prelude::*;
use chrono::Duration;
use diesel::prelude::*;
use imagerd_common::api::SubtargetKey;
use imagerd_common::errors::*;

#[derive(Identifiable, Queryable, Selectable, Clone, PartialEq, Eq, Debug)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(table_name = workers)]
pub struct Worker {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub last_seen: NaiveDateTime,
}

impl Worker {
    pub fn get(my_id: i32, connection: &mut SqliteConnection) -> Result<Option<Worker>> {
        let worker = workers::table
            .filter(workers::id.eq(my_id))
            .select(Worker::as_select())
            .first::<Worker>(connection)
            .optional()?;
        Ok(worker)
    }

    pub fn list(connection: &mut SqliteConnection) -> Result<Vec<Worker>> {
        let results = workers::table
            .order_by(workers::id)
            .select(Worker::as_select())
            .load::<Worker>(connection)?;
        Ok(results)
    }

    /// Heartbeats only move `last_seen`. Staleness interpretation and
    /// eviction belong to the caller, an idle worker never fails here.
    pub fn heartbeat(my_id: i32, connection: &mut SqliteConnection) -> Result<()> {
        debug!("heartbeat {my_id}");
        let now: DateTime<Utc> = Utc::now();
        let rows = diesel::update(workers::table)
            .filter(workers::id.eq(my_id))
            .set(workers::last_seen.eq(now.naive_utc()))
            .execute(connection)?;
        if rows == 0 {
            bail!("No worker registered with id {my_id}");
        }
        Ok(())
    }

    /// The only way a worker disappears. Its skills go with it through the
    /// schema's cascading foreign key. Unknown ids are a no-op.
    pub fn destroy(my_id: i32, connection: &mut SqliteConnection) -> Result<()> {
        info!("destroy worker {my_id}");
        diesel::delete(workers::table.filter(workers::id.eq(my_id))).execute(connection)?;
        Ok(())
    }

    pub fn add_skill(
        my_id: i32,
        my_subtarget_id: i32,
        connection: &mut SqliteConnection,
    ) -> Result<()> {
        info!("register worker skill {my_id} {my_subtarget_id}");
        diesel::insert_into(worker_skills::table)
            .values((
                worker_skills::worker_id.eq(my_id),
                worker_skills::subtarget_id.eq(my_subtarget_id),
            ))
            .execute(connection)?;
        Ok(())
    }

    /// At most one subtarget with outstanding work that no live worker can
    /// build. Read-only, feeds the autoscaler. A worker counts as live when
    /// its last heartbeat is younger than `stale_after`.
    pub fn demand(
        stale_after: Duration,
        connection: &mut SqliteConnection,
    ) -> Result<Option<SubtargetKey>> {
        let deadline = Utc::now().naive_utc() - stale_after;

        // subtargets some live worker can already build
        let covered = worker_skills::table
            .inner_join(workers::table)
            .filter(workers::last_seen.ge(deadline))
            .select(worker_skills::subtarget_id);

        let needed = worker_needed::table
            .inner_join(subtargets::table)
            .filter(worker_needed::subtarget_id.ne_all(covered))
            .order_by(worker_needed::id.asc())
            .select((
                subtargets::distro,
                subtargets::release,
                subtargets::target,
                subtargets::subtarget,
            ))
            .first::<SubtargetKey>(connection)
            .optional()?;

        if let Some(key) = &needed {
            debug!("need worker for {key}");
        }
        Ok(needed)
    }
}

#[derive(Insertable, PartialEq, Eq, Debug, Clone)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(table_name = workers)]
pub struct NewWorker {
    pub name: String,
    pub address: String,
    pub last_seen: NaiveDateTime,
}

impl NewWorker {
    pub fn new(name: String, address: String) -> NewWorker {
        let now: DateTime<Utc> = Utc::now();

        NewWorker {
            name,
            address,
            last_seen: now.naive_utc(),
        }
    }

    /// Returns the identity the worker must present on every later call.
    pub fn register(&self, connection: &mut SqliteConnection) -> Result<i32> {
        info!("register worker {} {}", self.name, self.address);
        let id = diesel::insert_into(workers::table)
            .values(self)
            .returning(workers::id)
            .get_result::<i32>(connection)?;
        Ok(id)
    }
}

/// Demand signals are produced by an external collaborator watching the
/// request stream, this core only stores and joins them.
#[derive(Insertable, PartialEq, Eq, Debug, Clone)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(table_name = worker_needed)]
pub struct NewWorkerNeeded {
    pub subtarget_id: i32,
}

impl NewWorkerNeeded {
    pub fn insert(&self, connection: &mut SqliteConnection) -> Result<()> {
        diesel::insert_into(worker_needed::table)
            .values(self)
            .execute(connection)?;
        Ok(())
    }
}
