//! Detect the opening invocation shared by most chapters and strip it from
//! their first verse, so the reader shows it once as the intro row.

use tracing::{debug, info, warn};

use crate::error::PrepError;
use crate::models::Surah;

/// Shorter prefixes mean the two reference verses diverged too early.
pub const MIN_BISMILLAH_CHARS: usize = 10;

/// The two short chapters compared to find the prefix. Both open with the
/// invocation and continue differently.
const REFERENCE_CHAPTERS: (u16, u16) = (111, 112);

/// Chapters whose first verse is left alone.
const SKIPPED_CHAPTERS: [u16; 2] = [1, 9];

/// Common leading text of the reference chapters' first verses, trimmed.
pub fn detect_bismillah(surahs: &[Surah]) -> Result<String, PrepError> {
    let first_text = |number: u16| {
        surahs
            .iter()
            .find(|s| s.surah_number == number)
            .and_then(|s| s.ayahs.first())
            .map(|a| a.text_arabic.as_str())
            .ok_or_else(|| PrepError::Bismillah(format!("chapter {number} has no first verse")))
    };
    let a = first_text(REFERENCE_CHAPTERS.0)?;
    let b = first_text(REFERENCE_CHAPTERS.1)?;

    let shared_bytes: usize = a
        .chars()
        .zip(b.chars())
        .take_while(|(x, y)| x == y)
        .map(|(x, _)| x.len_utf8())
        .sum();
    let prefix = a[..shared_bytes].trim();

    if prefix.chars().count() < MIN_BISMILLAH_CHARS {
        return Err(PrepError::Bismillah(format!(
            "shared prefix '{prefix}' is shorter than {MIN_BISMILLAH_CHARS} characters"
        )));
    }
    debug!(%prefix, "detected bismillah");
    Ok(prefix.to_string())
}

/// Remove `prefix` from the first verse of every eligible chapter. Returns the
/// number of verses changed.
pub fn strip_bismillah(surahs: &mut [Surah], prefix: &str) -> usize {
    let mut stripped = 0;
    for surah in surahs
        .iter_mut()
        .filter(|s| !SKIPPED_CHAPTERS.contains(&s.surah_number))
    {
        let Some(first) = surah.ayahs.first_mut() else {
            continue;
        };
        let Some(rest) = first.text_arabic.strip_prefix(prefix) else {
            continue;
        };
        let rest = rest.trim();
        if rest.is_empty() {
            warn!(surah = surah.surah_number, "first verse is only the bismillah, kept");
            continue;
        }
        first.text_arabic = rest.to_string();
        stripped += 1;
    }
    info!(count = stripped, "stripped bismillah from first verses");
    stripped
}
