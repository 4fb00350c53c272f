use crate::config::REQUEST_HASH_LEN;
use crate::utils::content_hash;
#[cfg(feature = "diesel")]
use diesel::{
    deserialize::FromSql,
    serialize::{IsNull, Output, ToSql},
    sql_types::Text,
    sqlite::{Sqlite, SqliteValue},
    {AsExpression, FromSqlRow, Queryable},
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum_macros::{Display, EnumString};

/// A fully specified build request as handed in by a client. The package
/// list is referenced by its content hash, which must already be resolved
/// through the package set store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRequest {
    pub distro: String,
    pub release: String,
    pub target: String,
    pub subtarget: String,
    pub profile: String,
    pub packages_hash: String,
    pub network_profile: String,
}

impl BuildRequest {
    /// Deduplication fingerprint. The field order is fixed; reordering it
    /// changes every fingerprint and orphans all previously stored requests.
    pub fn fingerprint(&self) -> String {
        content_hash(&self.as_fields().join(" "), REQUEST_HASH_LEN)
    }

    fn as_fields(&self) -> [&str; 7] {
        [
            &self.distro,
            &self.release,
            &self.target,
            &self.subtarget,
            &self.profile,
            &self.packages_hash,
            &self.network_profile,
        ]
    }
}

/// Lifecycle of an image request. `Building -> Requested` happens only
/// through crash recovery, every other transition is driven by the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "diesel", derive(FromSqlRow, AsExpression))]
#[cfg_attr(feature = "diesel", diesel(sql_type = Text))]
pub enum RequestStatus {
    Requested,
    Building,
    Created,
    Failed,
}

#[cfg(feature = "diesel")]
impl FromSql<Text, Sqlite> for RequestStatus {
    fn from_sql(bytes: SqliteValue) -> diesel::deserialize::Result<Self> {
        let value = <String as FromSql<Text, Sqlite>>::from_sql(bytes)?;
        Ok(RequestStatus::from_str(&value)?)
    }
}

#[cfg(feature = "diesel")]
impl ToSql<Text, Sqlite> for RequestStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> diesel::serialize::Result {
        out.set_value(self.to_string());
        Ok(IsNull::No)
    }
}

/// Provisioning state of a per-subtarget build environment. `Requested` and
/// `Initialize` are the states this core transitions itself; everything the
/// provisioning pipeline reports beyond that is stored verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(into = "String", from = "String")]
#[cfg_attr(feature = "diesel", derive(FromSqlRow, AsExpression))]
#[cfg_attr(feature = "diesel", diesel(sql_type = Text))]
pub enum BuilderStatus {
    Requested,
    Initialize,
    #[strum(default)]
    Other(String),
}

impl From<String> for BuilderStatus {
    fn from(value: String) -> Self {
        // from_str is infallible here, the default variant catches the rest
        BuilderStatus::from_str(&value).unwrap_or(BuilderStatus::Other(value))
    }
}

impl From<BuilderStatus> for String {
    fn from(status: BuilderStatus) -> String {
        status.to_string()
    }
}

#[cfg(feature = "diesel")]
impl FromSql<Text, Sqlite> for BuilderStatus {
    fn from_sql(bytes: SqliteValue) -> diesel::deserialize::Result<Self> {
        let value = <String as FromSql<Text, Sqlite>>::from_sql(bytes)?;
        Ok(BuilderStatus::from(value))
    }
}

#[cfg(feature = "diesel")]
impl ToSql<Text, Sqlite> for BuilderStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> diesel::serialize::Result {
        out.set_value(self.to_string());
        Ok(IsNull::No)
    }
}

/// The (distro, release, target, subtarget) tuple that keys subtargets,
/// build environments and worker skills.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "diesel", derive(Queryable))]
#[cfg_attr(feature = "diesel", diesel(check_for_backend(diesel::sqlite::Sqlite)))]
pub struct SubtargetKey {
    pub distro: String,
    pub release: String,
    pub target: String,
    pub subtarget: String,
}

impl fmt::Display for SubtargetKey {
    fn fmt(&self, w: &mut fmt::Formatter) -> fmt::Result {
        write!(
            w,
            "{}/{}/{}/{}",
            self.distro, self.release, self.target, self.subtarget
        )
    }
}

/// Claimed job payload handed to exactly one worker, with the package list
/// already resolved from the package set store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildJob {
    pub id: i32,
    pub request_hash: String,
    pub distro: String,
    pub release: String,
    pub target: String,
    pub subtarget: String,
    pub profile: String,
    pub packages: Vec<String>,
    pub network_profile: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobAssignment {
    Nothing,
    Build(Box<BuildJob>),
}

impl From<Option<BuildJob>> for JobAssignment {
    fn from(job: Option<BuildJob>) -> JobAssignment {
        match job {
            Some(job) => JobAssignment::Build(Box::new(job)),
            None => JobAssignment::Nothing,
        }
    }
}
