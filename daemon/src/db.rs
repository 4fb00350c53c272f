use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use imagerd_common::errors::*;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

pub type Pool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

pub fn setup(url: &str) -> Result<SqliteConnection> {
    let mut connection = SqliteConnection::establish(url)?;
    configure(&mut connection)?;
    connection
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| format_err!("Failed to run migrations: {err}"))?;
    Ok(connection)
}

pub fn setup_pool(url: &str) -> Result<Pool> {
    setup(url)?;

    let manager = ConnectionManager::<SqliteConnection>::new(url);
    let pool = r2d2::Pool::builder()
        .connection_customizer(Box::new(ConnectionSetup))
        .build(manager)
        .context("Failed to create pool")?;
    Ok(pool)
}

#[derive(Debug)]
struct ConnectionSetup;

impl CustomizeConnection<SqliteConnection, r2d2::Error> for ConnectionSetup {
    fn on_acquire(&self, connection: &mut SqliteConnection) -> std::result::Result<(), r2d2::Error> {
        configure(connection).map_err(r2d2::Error::QueryError)
    }
}

// busy_timeout makes concurrent claimants wait on the write lock instead of
// failing fast with SQLITE_BUSY
fn configure(connection: &mut SqliteConnection) -> QueryResult<()> {
    connection.batch_execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 10000;")
}
