use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::warn;

use crate::models::{FontSize, Theme};

const THEME_KEY: &str = "theme";
const FONT_SIZE_KEY: &str = "font_size";

/// Read the stored theme. Unknown values fall back to the default so a
/// hand-edited database cannot block startup.
pub fn load_theme(conn: &Connection) -> Result<Theme> {
    let Some(raw) = read_setting(conn, THEME_KEY)? else {
        return Ok(Theme::default());
    };
    Ok(raw.parse().unwrap_or_else(|err: String| {
        warn!("ignoring stored theme: {}", err);
        Theme::default()
    }))
}

pub fn save_theme(conn: &Connection, theme: Theme) -> Result<()> {
    write_setting(conn, THEME_KEY, theme.as_str())
}

pub fn load_font_size(conn: &Connection) -> Result<FontSize> {
    let Some(raw) = read_setting(conn, FONT_SIZE_KEY)? else {
        return Ok(FontSize::default());
    };
    match raw.trim().parse::<u8>() {
        Ok(rank) => Ok(FontSize::new(rank)),
        Err(_) => {
            warn!("ignoring stored font size '{}'", raw);
            Ok(FontSize::default())
        }
    }
}

pub fn save_font_size(conn: &Connection, size: FontSize) -> Result<()> {
    write_setting(conn, FONT_SIZE_KEY, &size.rank().to_string())
}

fn read_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    conn.query_row(
        "SELECT value FROM settings WHERE key = ?1",
        params![key],
        |row| row.get(0),
    )
    .optional()
    .with_context(|| format!("failed to read setting '{key}'"))
}

fn write_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )
    .with_context(|| format!("failed to save setting '{key}'"))?;
    Ok(())
}
