//! Offline data preparation: download the upstream editions, merge them into
//! the content file, and clean up the leading bismillah.
//!
//! Both commands write through a temporary sibling file and rename it into
//! place, so a failed run never leaves a half-written content file behind.

mod bismillah;
mod merge;
mod sources;

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::thread;

use tracing::{info, warn};

pub use bismillah::{detect_bismillah, strip_bismillah, MIN_BISMILLAH_CHARS};
pub use merge::{global_ayah_id, merge_editions, total_ayahs, AYAH_COUNTS, SURAH_COUNT};
pub use sources::{
    audio_url, ChapterInfo, Edition, EditionChapter, EditionVerse, UpstreamClient, API_BASE,
    ARABIC_EDITION, ENGLISH_EDITION, URDU_EDITION,
};

use crate::corpus::read_surahs;
use crate::error::PrepError;
use crate::models::Surah;

/// Options of the `fetch` command.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub out: PathBuf,
    /// Leave the bismillah inside the first verses.
    pub keep_bismillah: bool,
}

/// What a successful `fetch` produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSummary {
    pub chapters: usize,
    pub verses: usize,
    pub stripped: usize,
}

/// Download, merge, clean, and write the content file.
pub fn run_fetch(client: &UpstreamClient, options: &FetchOptions) -> Result<FetchSummary, PrepError> {
    info!("fetching chapter metadata");
    let chapters = client.fetch_chapter_list()?;

    info!("fetching text editions");
    let (arabic, urdu, english) = thread::scope(|scope| {
        let arabic = scope.spawn(|| client.fetch_edition(ARABIC_EDITION));
        let urdu = scope.spawn(|| client.fetch_edition(URDU_EDITION));
        let english = scope.spawn(|| client.fetch_edition(ENGLISH_EDITION));
        (
            join_download(arabic, ARABIC_EDITION),
            join_download(urdu, URDU_EDITION),
            join_download(english, ENGLISH_EDITION),
        )
    });
    let (arabic, urdu, english) = (arabic?, urdu?, english?);

    let mut surahs = merge_editions(&chapters, &arabic, &urdu, &english)?;
    let stripped = if options.keep_bismillah {
        0
    } else {
        let prefix = detect_bismillah(&surahs)?;
        strip_bismillah(&mut surahs, &prefix)
    };

    write_content_file(&options.out, &surahs)?;
    let summary = FetchSummary {
        chapters: surahs.len(),
        verses: surahs.iter().map(|s| s.ayahs.len()).sum(),
        stripped,
    };
    info!(?summary, out = %options.out.display(), "content file written");
    Ok(summary)
}

fn join_download(
    handle: thread::ScopedJoinHandle<'_, Result<Edition, PrepError>>,
    edition: &str,
) -> Result<Edition, PrepError> {
    handle.join().unwrap_or_else(|_| {
        Err(PrepError::Upstream {
            url: edition.to_string(),
            message: "download thread panicked".into(),
        })
    })
}

/// Re-run the bismillah clean-up on an existing content file. Returns how
/// many first verses were changed; the file is left untouched when zero.
pub fn run_strip(path: &Path) -> Result<usize, PrepError> {
    let mut surahs = read_surahs(path)?;
    let prefix = detect_bismillah(&surahs)?;
    let stripped = strip_bismillah(&mut surahs, &prefix);
    if stripped == 0 {
        info!(path = %path.display(), "nothing to strip");
        return Ok(0);
    }
    write_content_file(path, &surahs)?;
    Ok(stripped)
}

/// Serialize the chapter array to `path` via a temporary sibling file.
pub fn write_content_file(path: &Path, surahs: &[Surah]) -> Result<(), PrepError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error(parent))?;
    }

    let tmp = temp_path(path);
    let result = write_then_rename(&tmp, path, surahs);
    if result.is_err() && tmp.exists() {
        if let Err(err) = fs::remove_file(&tmp) {
            warn!(path = %tmp.display(), "failed to remove temporary file: {}", err);
        }
    }
    result
}

fn write_then_rename(tmp: &Path, path: &Path, surahs: &[Surah]) -> Result<(), PrepError> {
    let file = File::create(tmp).map_err(io_error(tmp))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, surahs)?;
    writer.flush().map_err(io_error(tmp))?;
    fs::rename(tmp, path).map_err(io_error(path))
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> PrepError {
    let path = path.to_path_buf();
    move |source| PrepError::Io { path, source }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "content.json".into());
    name.push(".tmp");
    path.with_file_name(name)
}
