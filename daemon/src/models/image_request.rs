use crate::schema::*;
use chrono::prelude::*;
use diesel::prelude::*;
use imagerd_common::api::{BuildJob, BuildRequest, RequestStatus};
use imagerd_common::errors::*;

#[derive(Identifiable, Queryable, Selectable, Clone, PartialEq, Eq, Debug)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(table_name = image_requests)]
pub struct ImageRequest {
    pub id: i32,
    pub request_hash: String,
    pub distro: String,
    pub release: String,
    pub target: String,
    pub subtarget: String,
    pub profile: String,
    pub packages_hash: String,
    pub network_profile: String,
    pub status: RequestStatus,
    pub image_hash: Option<String>,
    pub requested_at: NaiveDateTime,
}

impl ImageRequest {
    pub fn get(hash: &str, connection: &mut SqliteConnection) -> Result<Option<ImageRequest>> {
        let request = image_requests::table
            .filter(image_requests::request_hash.eq(hash))
            .select(ImageRequest::as_select())
            .first::<ImageRequest>(connection)
            .optional()?;
        Ok(request)
    }

    /// Hands the oldest pending request to exactly one caller, with the
    /// package list resolved from the package set store. A request whose
    /// package set is missing is not eligible.
    ///
    /// The transaction takes the write lock up front and the update repeats
    /// the state filter, so the `requested -> building` transition is a
    /// row-scoped compare-and-swap even across processes.
    pub fn claim(connection: &mut SqliteConnection) -> Result<Option<BuildJob>> {
        connection.immediate_transaction::<_, Error, _>(|connection| {
            let candidate = image_requests::table
                .inner_join(
                    package_sets::table.on(package_sets::hash.eq(image_requests::packages_hash)),
                )
                .filter(image_requests::status.eq(RequestStatus::Requested))
                .order_by(image_requests::id.asc())
                .select((ImageRequest::as_select(), package_sets::packages))
                .first::<(ImageRequest, String)>(connection)
                .optional()?;

            let Some((request, packages)) = candidate else {
                return Ok(None);
            };

            let claimed = diesel::update(image_requests::table)
                .filter(image_requests::id.eq(request.id))
                .filter(image_requests::status.eq(RequestStatus::Requested))
                .set(image_requests::status.eq(RequestStatus::Building))
                .execute(connection)?;
            if claimed == 0 {
                return Ok(None);
            }

            debug!("claimed build job {} ({})", request.id, request.request_hash);
            Ok(Some(BuildJob {
                id: request.id,
                request_hash: request.request_hash,
                distro: request.distro,
                release: request.release,
                target: request.target,
                subtarget: request.subtarget,
                profile: request.profile,
                packages: packages.split_whitespace().map(str::to_string).collect(),
                network_profile: request.network_profile,
            }))
        })
    }

    /// Records a finished build and stamps the artifact identity. Keyed by
    /// the request hash, the one identity that is stable across the whole
    /// request lifecycle.
    pub fn complete(
        hash: &str,
        my_image_hash: &str,
        connection: &mut SqliteConnection,
    ) -> Result<()> {
        let rows = diesel::update(image_requests::table)
            .filter(image_requests::request_hash.eq(hash))
            .set((
                image_requests::status.eq(RequestStatus::Created),
                image_requests::image_hash.eq(my_image_hash),
            ))
            .execute(connection)?;
        if rows == 0 {
            bail!("No image request for hash {hash:?}");
        }
        Ok(())
    }

    /// Terminal: failed jobs are never retried by the queue itself, a retry
    /// is a fresh submission.
    pub fn fail(hash: &str, connection: &mut SqliteConnection) -> Result<()> {
        let rows = diesel::update(image_requests::table)
            .filter(image_requests::request_hash.eq(hash))
            .set(image_requests::status.eq(RequestStatus::Failed))
            .execute(connection)?;
        if rows == 0 {
            bail!("No image request for hash {hash:?}");
        }
        Ok(())
    }

    /// Returns every `building` row to the pending pool. This cannot tell a
    /// crashed claim from one still in progress elsewhere, run it only at
    /// startup before claimants are accepted.
    pub fn recover(connection: &mut SqliteConnection) -> Result<usize> {
        let rows = diesel::update(image_requests::table)
            .filter(image_requests::status.eq(RequestStatus::Building))
            .set(image_requests::status.eq(RequestStatus::Requested))
            .execute(connection)?;
        if rows > 0 {
            info!("reset {rows} orphaned build jobs");
        }
        Ok(rows)
    }
}

#[derive(Insertable, PartialEq, Eq, Debug, Clone)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(table_name = image_requests)]
pub struct NewImageRequest {
    pub request_hash: String,
    pub distro: String,
    pub release: String,
    pub target: String,
    pub subtarget: String,
    pub profile: String,
    pub packages_hash: String,
    pub network_profile: String,
    pub status: RequestStatus,
    pub requested_at: NaiveDateTime,
}

impl NewImageRequest {
    pub fn new(request: &BuildRequest) -> NewImageRequest {
        let now: DateTime<Utc> = Utc::now();

        NewImageRequest {
            request_hash: request.fingerprint(),
            distro: request.distro.clone(),
            release: request.release.clone(),
            target: request.target.clone(),
            subtarget: request.subtarget.clone(),
            profile: request.profile.clone(),
            packages_hash: request.packages_hash.clone(),
            network_profile: request.network_profile.clone(),
            status: RequestStatus::Requested,
            requested_at: now.naive_utc(),
        }
    }

    /// Idempotent submission: a request already known by fingerprint
    /// answers with its current state and has no side effect. `(requested,
    /// 0)` is the sentinel for a newly enqueued request, the id is not
    /// revealed until claim time.
    pub fn submit(&self, connection: &mut SqliteConnection) -> Result<(RequestStatus, i32)> {
        for (field, value) in [
            ("distro", &self.distro),
            ("release", &self.release),
            ("target", &self.target),
            ("subtarget", &self.subtarget),
            ("profile", &self.profile),
            ("packages_hash", &self.packages_hash),
            ("network_profile", &self.network_profile),
        ] {
            if value.is_empty() {
                bail!("Rejecting image request with empty {field}");
            }
        }

        if let Some(existing) = Self::lookup(&self.request_hash, connection)? {
            return Ok(existing);
        }

        debug!("add build job {}", self.request_hash);
        let inserted = diesel::insert_into(image_requests::table)
            .values(self)
            .on_conflict_do_nothing()
            .execute(connection)?;

        if inserted == 0 {
            // lost an insert race, the winner's row answers the submission
            let existing = Self::lookup(&self.request_hash, connection)?.ok_or_else(|| {
                format_err!("Request vanished during submission: {}", self.request_hash)
            })?;
            return Ok(existing);
        }

        Ok((RequestStatus::Requested, 0))
    }

    fn lookup(
        hash: &str,
        connection: &mut SqliteConnection,
    ) -> Result<Option<(RequestStatus, i32)>> {
        let row = image_requests::table
            .filter(image_requests::request_hash.eq(hash))
            .select((image_requests::status, image_requests::id))
            .first::<(RequestStatus, i32)>(connection)
            .optional()?;
        Ok(row)
    }
}
