//! Domain models that mirror the content file and the preferences schema and
//! get passed throughout the reader. These types stay light-weight data
//! holders so other layers can focus on projection, playback, and
//! presentation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One chapter of the corpus together with its verses. The content file is an
/// ordered array of these objects.
pub struct Surah {
    /// Stable identifier, equal to `surah_number` in every data set we ship.
    pub id: u16,
    /// Position of the chapter in the corpus (1..=114).
    pub surah_number: u16,
    pub meta: SurahMeta,
    /// Verses in reading order. `ayah_number` starts at 1 without gaps.
    pub ayahs: Vec<Ayah>,
}

impl Surah {
    /// Short `number. Latin name` label used by navigation lists and headers.
    pub fn display_title(&self) -> String {
        format!("{}. {}", self.surah_number, self.meta.surah_name_en)
    }

    /// Whether a separate introductory recitation exists for this chapter.
    pub fn has_intro(&self) -> bool {
        !self.meta.audio_bismillah.trim().is_empty()
    }
}

impl fmt::Display for Surah {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.meta.surah_name_en)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Display metadata of a chapter. The aliases accept the semantic field names
/// used by hand-written content files.
pub struct SurahMeta {
    /// Name in the source script.
    #[serde(alias = "name_native")]
    pub surah_name_ar: String,
    /// Transliterated name.
    #[serde(alias = "name_latin")]
    pub surah_name_en: String,
    /// Short English gloss of the name.
    #[serde(alias = "gloss")]
    pub surah_meaning: String,
    /// Meccan or Medinan, when the upstream data provides it.
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub revelation_type: String,
    #[serde(alias = "item_count", default)]
    pub ayah_count: usize,
    /// Introductory recitation played before the first verse in whole-chapter
    /// mode. Empty when the chapter has none.
    #[serde(alias = "intro_audio_url", default)]
    pub audio_bismillah: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A single verse with its texts, partition tags, and audio reference.
pub struct Ayah {
    /// Global identity across the whole corpus (1..=6236). Also the key used
    /// by bookmarks and by the audio host.
    pub id: u32,
    /// 1-based position inside the chapter.
    pub ayah_number: u16,
    pub text_arabic: String,
    pub text_urdu: String,
    pub text_english: String,
    /// 1-of-30 partition tag.
    pub juz: u8,
    #[serde(default)]
    pub manzil: u8,
    #[serde(default)]
    pub page: u16,
    /// Sub-section tag (global ruku number).
    pub ruku: u16,
    #[serde(rename = "hizbQuarter", default)]
    pub hizb_quarter: u16,
    pub audio_url: String,
}

/// Two-valued colour scheme persisted in the preferences store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(format!("unknown theme '{other}'")),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Font size rank. Values outside 1..=5 are clamped on construction so the
/// rest of the code never sees an out-of-range rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FontSize(u8);

impl FontSize {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(rank: u8) -> Self {
        Self(rank.clamp(Self::MIN, Self::MAX))
    }

    pub fn rank(self) -> u8 {
        self.0
    }

    pub fn larger(self) -> Self {
        Self::new(self.0.saturating_add(1))
    }

    pub fn smaller(self) -> Self {
        Self::new(self.0.saturating_sub(1))
    }
}

impl Default for FontSize {
    fn default() -> Self {
        Self(3)
    }
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_size_is_clamped() {
        assert_eq!(FontSize::new(0).rank(), 1);
        assert_eq!(FontSize::new(9).rank(), 5);
        assert_eq!(FontSize::new(5).larger().rank(), 5);
        assert_eq!(FontSize::new(1).smaller().rank(), 1);
        assert_eq!(FontSize::default().larger().rank(), 4);
    }

    #[test]
    fn theme_parses_case_insensitively() {
        assert_eq!("Light".parse::<Theme>(), Ok(Theme::Light));
        assert_eq!(" dark ".parse::<Theme>(), Ok(Theme::Dark));
        assert!("sepia".parse::<Theme>().is_err());
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
    }

    #[test]
    fn meta_accepts_semantic_aliases() {
        let json = r#"{
            "name_native": "الفاتحة",
            "name_latin": "Al-Fatihah",
            "gloss": "The Opener",
            "item_count": 7,
            "intro_audio_url": ""
        }"#;
        let meta: SurahMeta = serde_json::from_str(json).unwrap();
        assert_eq!(meta.surah_name_en, "Al-Fatihah");
        assert_eq!(meta.ayah_count, 7);
        assert!(meta.revelation_type.is_empty());
    }
}
