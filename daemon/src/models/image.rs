use crate::schema::*;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use imagerd_common::errors::*;

/// A completed build artifact. Immutable once inserted.
#[derive(Identifiable, Queryable, Selectable, Clone, PartialEq, Eq, Debug)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(table_name = images)]
pub struct Image {
    pub id: i32,
    pub image_hash: String,
    pub distro: String,
    pub release: String,
    pub target: String,
    pub subtarget: String,
    pub profile: String,
    pub manifest_hash: String,
    pub network_profile: String,
    pub checksum: String,
    pub filesize: i64,
    pub built_at: NaiveDateTime,
}

impl Image {
    pub fn get(my_id: i32, connection: &mut SqliteConnection) -> Result<Option<Image>> {
        let image = images::table
            .filter(images::id.eq(my_id))
            .select(Image::as_select())
            .first::<Image>(connection)
            .optional()?;
        Ok(image)
    }

    pub fn get_by_hash(my_hash: &str, connection: &mut SqliteConnection) -> Result<Option<Image>> {
        let image = images::table
            .filter(images::image_hash.eq(my_hash))
            .select(Image::as_select())
            .first::<Image>(connection)
            .optional()?;
        Ok(image)
    }

    /// The artifact built for a request, `None` while the build has not
    /// finished.
    pub fn find_for_request(
        request_id: i32,
        connection: &mut SqliteConnection,
    ) -> Result<Option<Image>> {
        let image = image_requests::table
            .inner_join(
                images::table.on(image_requests::image_hash.eq(images::image_hash.nullable())),
            )
            .filter(image_requests::id.eq(request_id))
            .select(Image::as_select())
            .first::<Image>(connection)
            .optional()?;
        Ok(image)
    }
}

#[derive(Insertable, PartialEq, Eq, Debug, Clone)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(table_name = images)]
pub struct NewImage {
    pub image_hash: String,
    pub distro: String,
    pub release: String,
    pub target: String,
    pub subtarget: String,
    pub profile: String,
    pub manifest_hash: String,
    pub network_profile: String,
    pub checksum: String,
    pub filesize: i64,
    pub built_at: NaiveDateTime,
}

impl NewImage {
    /// Terminal step of a successful build.
    pub fn insert(&self, connection: &mut SqliteConnection) -> Result<i32> {
        debug!("add image {}", self.image_hash);
        let id = diesel::insert_into(images::table)
            .values(self)
            .returning(images::id)
            .get_result::<i32>(connection)?;
        Ok(id)
    }
}
