use crate::config::Config;
use crate::error::AppError;
use crate::telemetry;
use anyhow::{anyhow, Context};
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("../migrations");

pub type DbPool = r2d2::Pool<ConnectionManager<PgConnection>>;

pub fn create_pool(config: &Config) -> anyhow::Result<DbPool> {
    let manager = ConnectionManager::<PgConnection>::new(&config.database_url);
    let pool = r2d2::Pool::builder()
        .max_size(config.pool_max_size)
        .connection_timeout(config.connection_timeout)
        .build(manager)
        .context("Failed to create database pool")?;

    // Schema bootstrap happens once, before any request is served
    let mut conn = pool
        .get()
        .context("Failed to get DB connection for migrations")?;
    run_migrations(&mut conn)?;

    Ok(pool)
}

pub fn run_migrations(conn: &mut PgConnection) -> anyhow::Result<()> {
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| anyhow!("Failed to run database migrations: {e}"))?;
    for version in applied {
        tracing::info!(%version, "applied migration");
    }
    Ok(())
}

/// Runs `f` with a pooled connection on the blocking thread pool.
///
/// Diesel is synchronous, so checkout and queries never run on the async
/// workers. The caller's span and per-request query counter follow the work
/// onto the blocking thread.
pub async fn with_conn<T, F>(pool: &DbPool, f: F) -> Result<T, AppError>
where
    F: FnOnce(&mut PgConnection) -> QueryResult<T> + Send + 'static,
    T: Send + 'static,
{
    let pool = pool.clone();
    let span = tracing::Span::current();
    let work = telemetry::with_query_counter(move || {
        span.in_scope(|| -> Result<T, AppError> {
            let mut conn = pool.get()?;
            Ok(f(&mut *conn)?)
        })
    });

    tokio::task::spawn_blocking(work).await?
}
