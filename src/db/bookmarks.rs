use std::collections::BTreeSet;

use anyhow::{Context, Result};
use rusqlite::{params, Connection};

/// Every bookmarked verse, by global identity.
pub fn fetch_bookmarks(conn: &Connection) -> Result<BTreeSet<u32>> {
    let mut stmt = conn
        .prepare("SELECT ayah_id FROM bookmarks ORDER BY ayah_id")
        .context("failed to prepare bookmark query")?;

    let bookmarks = stmt
        .query_map([], |row| row.get::<_, u32>(0))
        .context("failed to load bookmarks")?
        .collect::<Result<BTreeSet<_>, _>>()
        .context("failed to collect bookmarks")?;

    Ok(bookmarks)
}

/// Add the bookmark when absent, remove it when present. Returns whether the
/// verse is bookmarked afterwards.
pub fn toggle_bookmark(conn: &Connection, ayah_id: u32) -> Result<bool> {
    let removed = conn
        .execute("DELETE FROM bookmarks WHERE ayah_id = ?1", params![ayah_id])
        .context("failed to remove bookmark")?;
    if removed > 0 {
        return Ok(false);
    }

    conn.execute(
        "INSERT INTO bookmarks (ayah_id, created_at) VALUES (?1, ?2)",
        params![ayah_id, chrono::Utc::now().timestamp()],
    )
    .context("failed to insert bookmark")?;
    Ok(true)
}
