use rusqlite::Connection;

use crate::error::AppError;

/// Run the idempotent schema migration.
pub fn run(conn: &Connection) -> Result<(), AppError> {
    tracing::debug!("Running database migrations");

    conn.execute_batch(SCHEMA)?;

    tracing::info!("Database migrations complete");
    Ok(())
}

const SCHEMA: &str = r#"

-- ============================================================================
-- App Settings
--
-- Durable key/value storage. Holds the API origin override and the sample id
-- of the most recent successful generation (the only state that must survive
-- leaving and returning to the generator page).
-- ============================================================================

CREATE TABLE IF NOT EXISTS app_settings (
    key         TEXT PRIMARY KEY,
    value       TEXT NOT NULL,
    updated_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

"#;
