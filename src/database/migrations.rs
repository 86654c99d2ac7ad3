//! Embedded schema migrations, applied at startup.

use anyhow::anyhow;
use diesel::PgConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Applies every migration not yet recorded in `__diesel_schema_migrations`.
pub fn run(conn: &mut PgConnection) -> anyhow::Result<()> {
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| anyhow!("schema migration failed: {}", err))?;

    for version in &applied {
        tracing::info!(%version, "applied migration");
    }
    tracing::info!(count = applied.len(), "schema is up to date");
    Ok(())
}
