//! Merge the upstream metadata list and the three text editions into the
//! content file's chapter array.

use std::collections::HashMap;

use tracing::warn;

use super::sources::{audio_url, ChapterInfo, Edition};
use crate::error::PrepError;
use crate::models::{Ayah, Surah, SurahMeta};

/// Number of chapters in the corpus.
pub const SURAH_COUNT: u16 = 114;

/// Verse count of every chapter, in order. The global verse identity is
/// derived from this table rather than trusted from upstream.
pub const AYAH_COUNTS: [u16; SURAH_COUNT as usize] = [
    7, 286, 200, 176, 120, 165, 206, 75, 129, 109, 123, 111, 43, 52, 99, 128, 111, 110, 98, 135,
    112, 78, 118, 64, 77, 227, 93, 88, 69, 60, 34, 30, 73, 54, 45, 83, 182, 88, 75, 85, 54, 53,
    89, 59, 37, 35, 38, 29, 18, 45, 60, 49, 62, 55, 78, 96, 29, 22, 24, 13, 14, 11, 11, 18, 12,
    12, 30, 52, 52, 44, 28, 28, 20, 56, 40, 31, 50, 40, 46, 42, 29, 19, 36, 25, 22, 17, 19, 26,
    30, 20, 15, 21, 11, 8, 8, 19, 5, 8, 8, 11, 11, 8, 3, 9, 5, 4, 7, 3, 6, 3, 5, 4, 5, 6,
];

/// Chapters that never carry a separate introductory recitation: chapter 9
/// opens without a bismillah and chapter 1 recites it as its first verse.
const NO_INTRO: [u16; 2] = [1, 9];

/// Global 1-based identity of `surah:ayah`, or `None` when either number is
/// outside the table.
pub fn global_ayah_id(surah: u16, ayah: u16) -> Option<u32> {
    let chapter = usize::from(surah).checked_sub(1)?;
    let count = *AYAH_COUNTS.get(chapter)?;
    if ayah == 0 || ayah > count {
        return None;
    }
    let before: u32 = AYAH_COUNTS[..chapter].iter().map(|&c| u32::from(c)).sum();
    Some(before + u32::from(ayah))
}

/// Total number of verses in the table.
pub fn total_ayahs() -> u32 {
    AYAH_COUNTS.iter().map(|&c| u32::from(c)).sum()
}

type VerseKey = (u16, u16);

fn translation_map(edition: &Edition) -> HashMap<VerseKey, &str> {
    edition
        .surahs
        .iter()
        .flat_map(|chapter| {
            chapter
                .ayahs
                .iter()
                .map(move |verse| ((chapter.number, verse.number_in_surah), verse.text.as_str()))
        })
        .collect()
}

/// Combine the metadata list with the Arabic, Urdu, and English editions.
///
/// Partition tags come from the Arabic edition. A translation missing for a
/// verse becomes an empty string; the number of gaps is logged per edition.
pub fn merge_editions(
    chapters: &[ChapterInfo],
    arabic: &Edition,
    urdu: &Edition,
    english: &Edition,
) -> Result<Vec<Surah>, PrepError> {
    if chapters.len() != usize::from(SURAH_COUNT) {
        return Err(PrepError::Merge(format!(
            "expected {SURAH_COUNT} chapters in metadata, got {}",
            chapters.len()
        )));
    }

    let urdu_by_key = translation_map(urdu);
    let english_by_key = translation_map(english);
    let mut missing_urdu = 0usize;
    let mut missing_english = 0usize;

    let mut ordered: Vec<&ChapterInfo> = chapters.iter().collect();
    ordered.sort_by_key(|info| info.number);

    let mut surahs = Vec::with_capacity(ordered.len());
    for info in ordered {
        let source = arabic
            .surahs
            .iter()
            .find(|chapter| chapter.number == info.number)
            .ok_or_else(|| {
                PrepError::Merge(format!("chapter {} missing from Arabic edition", info.number))
            })?;

        if source.ayahs.len() != info.number_of_ayahs {
            warn!(
                surah = info.number,
                metadata = info.number_of_ayahs,
                edition = source.ayahs.len(),
                "upstream verse counts disagree"
            );
        }

        let mut ayahs = Vec::with_capacity(source.ayahs.len());
        for verse in &source.ayahs {
            let key = (info.number, verse.number_in_surah);
            let global = global_ayah_id(info.number, verse.number_in_surah).ok_or_else(|| {
                PrepError::Merge(format!(
                    "verse {}:{} is outside the verse-count table",
                    info.number, verse.number_in_surah
                ))
            })?;
            if verse.number != global {
                warn!(
                    surah = info.number,
                    ayah = verse.number_in_surah,
                    upstream = verse.number,
                    derived = global,
                    "upstream global number differs from derived identity"
                );
            }

            let text_urdu = urdu_by_key.get(&key).copied().unwrap_or_else(|| {
                missing_urdu += 1;
                ""
            });
            let text_english = english_by_key.get(&key).copied().unwrap_or_else(|| {
                missing_english += 1;
                ""
            });

            ayahs.push(Ayah {
                id: global,
                ayah_number: verse.number_in_surah,
                text_arabic: verse.text.clone(),
                text_urdu: text_urdu.to_string(),
                text_english: text_english.to_string(),
                juz: verse.juz,
                manzil: verse.manzil,
                page: verse.page,
                ruku: verse.ruku,
                hizb_quarter: verse.hizb_quarter,
                audio_url: audio_url(global),
            });
        }

        surahs.push(Surah {
            id: info.number,
            surah_number: info.number,
            meta: SurahMeta {
                surah_name_ar: info.name.clone(),
                surah_name_en: info.english_name.clone(),
                surah_meaning: info.english_name_translation.clone(),
                revelation_type: info.revelation_type.clone(),
                ayah_count: ayahs.len(),
                audio_bismillah: if NO_INTRO.contains(&info.number) {
                    String::new()
                } else {
                    audio_url(1)
                },
            },
            ayahs,
        });
    }

    if missing_urdu > 0 {
        warn!(count = missing_urdu, "verses without Urdu translation");
    }
    if missing_english > 0 {
        warn!(count = missing_english, "verses without English translation");
    }

    Ok(surahs)
}
