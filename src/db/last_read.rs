use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::warn;

use crate::projector::{BrowseMode, BrowseTarget};

/// Where the reader was when the last session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LastRead {
    pub target: BrowseTarget,
    /// Playback index inside the target's display sequence.
    pub index: usize,
    /// Unix timestamp (seconds) of the last update.
    pub updated_at: i64,
}

impl LastRead {
    pub fn now(target: BrowseTarget, index: usize) -> Self {
        Self {
            target,
            index,
            updated_at: chrono::Utc::now().timestamp(),
        }
    }
}

/// Load the single last-read row. Rows that no longer parse are ignored.
pub fn load_last_read(conn: &Connection) -> Result<Option<LastRead>> {
    let row = conn
        .query_row(
            "SELECT mode, target_id, item_index, updated_at FROM last_read WHERE slot = 0",
            [],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, u32>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, i64>(3)?,
                ))
            },
        )
        .optional()
        .context("failed to read last position")?;

    let Some((mode, target_id, index, updated_at)) = row else {
        return Ok(None);
    };

    let target = mode
        .parse::<BrowseMode>()
        .ok()
        .and_then(|mode| BrowseTarget::from_parts(mode, target_id));
    match (target, usize::try_from(index)) {
        (Some(target), Ok(index)) => Ok(Some(LastRead {
            target,
            index,
            updated_at,
        })),
        _ => {
            warn!(%mode, target_id, index, "ignoring unreadable last position");
            Ok(None)
        }
    }
}

pub fn save_last_read(conn: &Connection, last: &LastRead) -> Result<()> {
    let index = i64::try_from(last.index).context("verse index out of range")?;
    conn.execute(
        "INSERT INTO last_read (slot, mode, target_id, item_index, updated_at)
         VALUES (0, ?1, ?2, ?3, ?4)
         ON CONFLICT(slot) DO UPDATE SET
            mode = excluded.mode,
            target_id = excluded.target_id,
            item_index = excluded.item_index,
            updated_at = excluded.updated_at",
        params![
            last.target.mode().as_str(),
            last.target.id(),
            index,
            last.updated_at
        ],
    )
    .context("failed to save last position")?;
    Ok(())
}
