//! Read-only content index built from the merged JSON file.
//!
//! The index is loaded once at startup and shared behind an `Arc`; nothing
//! downstream mutates it. Lookups for the alternate partitions (juz and ruku)
//! are precomputed so the projector and the navigation lists agree on the
//! same ordering.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::CorpusError;
use crate::models::Surah;

/// Number of fixed 1-of-30 partitions.
pub const JUZ_COUNT: u8 = 30;

/// Ordered corpus of chapters plus the distinct partition tags it contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentIndex {
    surahs: Vec<Surah>,
    juz_ids: Vec<u8>,
    ruku_tags: Vec<u16>,
}

impl ContentIndex {
    /// Read and parse the content file. A missing, malformed, or empty file is
    /// reported as an error so the caller can show a placeholder instead of
    /// rendering partial data.
    pub fn load(path: &Path) -> Result<Self, CorpusError> {
        let surahs = read_surahs(path)?;
        debug!(chapters = surahs.len(), path = %path.display(), "content file loaded");
        Ok(Self::from_surahs(surahs))
    }

    /// Build the index from already-parsed chapters. Consistency problems are
    /// logged and tolerated.
    pub fn from_surahs(surahs: Vec<Surah>) -> Self {
        for surah in &surahs {
            check_consistency(surah);
        }

        let mut juz_ids: Vec<u8> = surahs
            .iter()
            .flat_map(|s| s.ayahs.iter().map(|a| a.juz))
            .collect();
        juz_ids.sort_unstable();
        juz_ids.dedup();

        let mut ruku_tags: Vec<u16> = surahs
            .iter()
            .flat_map(|s| s.ayahs.iter().map(|a| a.ruku))
            .collect();
        ruku_tags.sort_unstable();
        ruku_tags.dedup();

        Self {
            surahs,
            juz_ids,
            ruku_tags,
        }
    }

    pub fn surahs(&self) -> &[Surah] {
        &self.surahs
    }

    pub fn surah(&self, number: u16) -> Option<&Surah> {
        self.surahs.iter().find(|s| s.surah_number == number)
    }

    pub fn first_surah(&self) -> Option<&Surah> {
        self.surahs.first()
    }

    /// Distinct juz tags present in the corpus, ascending.
    pub fn juz_ids(&self) -> &[u8] {
        &self.juz_ids
    }

    /// Distinct ruku tags present in the corpus, ascending.
    pub fn ruku_tags(&self) -> &[u16] {
        &self.ruku_tags
    }

    pub fn ruku_count(&self) -> usize {
        self.ruku_tags.len()
    }

    /// Map a 1-based sub-section ordinal to the concrete ruku tag.
    pub fn resolve_ruku(&self, ordinal: u16) -> Option<u16> {
        let position = usize::from(ordinal).checked_sub(1)?;
        self.ruku_tags.get(position).copied()
    }

    /// Inverse of [`resolve_ruku`](Self::resolve_ruku).
    pub fn ruku_ordinal(&self, tag: u16) -> Option<u16> {
        self.ruku_tags
            .binary_search(&tag)
            .ok()
            .and_then(|pos| u16::try_from(pos + 1).ok())
    }

    /// Find the chapter number and in-chapter index of a verse by its global
    /// identity.
    pub fn locate(&self, global_id: u32) -> Option<(u16, usize)> {
        self.surahs.iter().find_map(|surah| {
            surah
                .ayahs
                .iter()
                .position(|a| a.id == global_id)
                .map(|idx| (surah.surah_number, idx))
        })
    }
}

/// Parse the raw chapter array without building the lookup tables. The
/// offline clean-up commands edit this array in place.
pub fn read_surahs(path: &Path) -> Result<Vec<Surah>, CorpusError> {
    let raw = fs::read_to_string(path).map_err(|source| CorpusError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let surahs: Vec<Surah> = serde_json::from_str(&raw).map_err(|source| CorpusError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    if surahs.is_empty() {
        return Err(CorpusError::Empty(path.to_path_buf()));
    }
    Ok(surahs)
}

fn check_consistency(surah: &Surah) {
    let contiguous = surah
        .ayahs
        .iter()
        .enumerate()
        .all(|(idx, ayah)| usize::from(ayah.ayah_number) == idx + 1);
    if !contiguous {
        warn!(
            surah = surah.surah_number,
            "verse numbers are not contiguous from 1"
        );
    }
    if surah.meta.ayah_count != 0 && surah.meta.ayah_count != surah.ayahs.len() {
        warn!(
            surah = surah.surah_number,
            declared = surah.meta.ayah_count,
            actual = surah.ayahs.len(),
            "declared verse count differs from the verse list"
        );
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Small hand-built corpus shared by unit tests.

    use crate::models::{Ayah, Surah, SurahMeta};

    pub(crate) const INTRO_URL: &str = "https://audio.test/intro.mp3";

    /// Build a chapter whose verses carry the given `(juz, ruku)` tags.
    pub(crate) fn surah(number: u16, first_global: u32, tags: &[(u8, u16)]) -> Surah {
        let ayahs = tags
            .iter()
            .enumerate()
            .map(|(idx, &(juz, ruku))| {
                let global = first_global + idx as u32;
                Ayah {
                    id: global,
                    ayah_number: (idx + 1) as u16,
                    text_arabic: format!("ar {number}:{}", idx + 1),
                    text_urdu: format!("ur {number}:{}", idx + 1),
                    text_english: format!("en {number}:{}", idx + 1),
                    juz,
                    manzil: 1,
                    page: 1,
                    ruku,
                    hizb_quarter: 1,
                    audio_url: format!("https://audio.test/{global}.mp3"),
                }
            })
            .collect::<Vec<_>>();
        Surah {
            id: number,
            surah_number: number,
            meta: SurahMeta {
                surah_name_ar: format!("سورة {number}"),
                surah_name_en: format!("Surah {number}"),
                surah_meaning: format!("Meaning {number}"),
                revelation_type: String::new(),
                ayah_count: ayahs.len(),
                audio_bismillah: if number == 1 {
                    String::new()
                } else {
                    INTRO_URL.to_string()
                },
            },
            ayahs,
        }
    }

    /// Three chapters: #1 and #2 share juz 1, #2 continues into juz 2, #3 is
    /// entirely juz 2. Ruku tags run 1..=5 across the corpus.
    pub(crate) fn sample_surahs() -> Vec<Surah> {
        vec![
            surah(1, 1, &[(1, 1), (1, 1), (1, 1)]),
            surah(2, 4, &[(1, 2), (1, 2), (1, 3), (2, 3), (2, 4)]),
            surah(3, 9, &[(2, 4), (2, 5)]),
        ]
    }
}
