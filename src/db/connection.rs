use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Ensure the preferences database exists, run lazy migrations, and return a
/// live connection.
pub fn open_preferences(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create data directory")?;
    }

    let conn = Connection::open(path).context("failed to open preferences database")?;
    apply_schema(&conn)?;
    Ok(conn)
}

/// Create every table the preferences store needs. Safe to run repeatedly;
/// tests call it on in-memory connections.
pub fn apply_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        [],
    )
    .context("failed to create settings table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS bookmarks (
            ayah_id INTEGER PRIMARY KEY,
            created_at INTEGER NOT NULL
        )",
        [],
    )
    .context("failed to create bookmarks table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS last_read (
            slot INTEGER PRIMARY KEY CHECK (slot = 0),
            mode TEXT NOT NULL,
            target_id INTEGER NOT NULL,
            item_index INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        )",
        [],
    )
    .context("failed to create last_read table")?;

    Ok(())
}
