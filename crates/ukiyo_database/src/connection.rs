//! Connection pool and migrations.

use crate::DatabaseResult;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{info, instrument};
use ukiyo_error::{DatabaseError, DatabaseErrorKind};

/// Pool of PostgreSQL connections.
pub type DbPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Build a connection pool for `database_url`.
///
/// # Errors
///
/// Returns a connection error if the pool cannot open its first connection.
#[instrument(skip(database_url))]
pub fn establish_pool(database_url: &str, max_size: u32) -> DatabaseResult<DbPool> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder()
        .max_size(max_size)
        .build(manager)
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Connection(e.to_string())))
}

/// Run pending migrations.
pub fn run_migrations(conn: &mut PgConnection) -> DatabaseResult<()> {
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Migration(e.to_string())))?;
    info!(count = applied.len(), "Migrations applied");
    Ok(())
}
