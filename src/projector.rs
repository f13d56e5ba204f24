//! Derive the displayed verse sequence for a browsing target.
//!
//! Three browsing modes exist: a whole chapter, one of the 30 juz partitions,
//! or one ruku sub-section. Chapter mode is a straight copy of the chapter's
//! verses. The two partition modes scan the corpus in order and interleave a
//! header before each contributing chapter. Headers are display-only: the
//! playback index counts verses alone, from 0, in display order.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::corpus::ContentIndex;
use crate::models::{Ayah, Surah};

/// Which partition scheme the navigation list and the reader are using.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrowseMode {
    Surah,
    Juz,
    Ruku,
}

impl BrowseMode {
    pub const ALL: [BrowseMode; 3] = [BrowseMode::Surah, BrowseMode::Juz, BrowseMode::Ruku];

    /// Storage key used by the preferences store.
    pub fn as_str(self) -> &'static str {
        match self {
            BrowseMode::Surah => "surah",
            BrowseMode::Juz => "juz",
            BrowseMode::Ruku => "ruku",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BrowseMode::Surah => "Surahs",
            BrowseMode::Juz => "Juz",
            BrowseMode::Ruku => "Ruku",
        }
    }
}

impl FromStr for BrowseMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "surah" => Ok(BrowseMode::Surah),
            "juz" => Ok(BrowseMode::Juz),
            "ruku" => Ok(BrowseMode::Ruku),
            other => Err(format!("unknown browse mode '{other}'")),
        }
    }
}

impl fmt::Display for BrowseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The user's current selection. The variant fixes the browsing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrowseTarget {
    /// A chapter, by its number.
    Surah(u16),
    /// One of the 30 fixed partitions, 1..=30.
    Juz(u8),
    /// A sub-section, by 1-based ordinal over the distinct ruku tags.
    Ruku(u16),
}

impl BrowseTarget {
    pub fn mode(self) -> BrowseMode {
        match self {
            BrowseTarget::Surah(_) => BrowseMode::Surah,
            BrowseTarget::Juz(_) => BrowseMode::Juz,
            BrowseTarget::Ruku(_) => BrowseMode::Ruku,
        }
    }

    /// Numeric identity inside the mode, as persisted in the last-read row.
    pub fn id(self) -> u32 {
        match self {
            BrowseTarget::Surah(n) => u32::from(n),
            BrowseTarget::Juz(n) => u32::from(n),
            BrowseTarget::Ruku(n) => u32::from(n),
        }
    }

    /// Rebuild a target from its persisted `(mode, id)` pair.
    pub fn from_parts(mode: BrowseMode, id: u32) -> Option<Self> {
        match mode {
            BrowseMode::Surah => u16::try_from(id).ok().map(BrowseTarget::Surah),
            BrowseMode::Juz => u8::try_from(id).ok().map(BrowseTarget::Juz),
            BrowseMode::Ruku => u16::try_from(id).ok().map(BrowseTarget::Ruku),
        }
    }
}

/// Display-only row introducing a chapter inside a multi-chapter sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionHeader {
    pub surah_number: u16,
    pub title: String,
    pub name_native: String,
}

impl SectionHeader {
    fn from_surah(surah: &Surah) -> Self {
        Self {
            surah_number: surah.surah_number,
            title: surah.display_title(),
            name_native: surah.meta.surah_name_ar.clone(),
        }
    }
}

/// A playable verse row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayItem {
    pub playback_index: usize,
    pub surah_number: u16,
    pub ayah: Ayah,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayEntry {
    Header(SectionHeader),
    Item(DisplayItem),
}

/// Ordered, possibly header-interleaved rows for one browsing target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplaySequence {
    target: BrowseTarget,
    title: String,
    subtitle: String,
    intro_audio: Option<String>,
    entries: Vec<DisplayEntry>,
    item_rows: Vec<usize>,
}

impl DisplaySequence {
    /// Sequence with no rows, used before any target is selected.
    pub fn empty(target: BrowseTarget) -> Self {
        Self {
            target,
            title: String::new(),
            subtitle: String::new(),
            intro_audio: None,
            entries: Vec::new(),
            item_rows: Vec::new(),
        }
    }

    /// The target actually displayed, after any fallback.
    pub fn target(&self) -> BrowseTarget {
        self.target
    }

    pub fn mode(&self) -> BrowseMode {
        self.target.mode()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn subtitle(&self) -> &str {
        &self.subtitle
    }

    /// Introductory recitation, only present in whole-chapter mode.
    pub fn intro_audio(&self) -> Option<&str> {
        self.intro_audio.as_deref()
    }

    pub fn entries(&self) -> &[DisplayEntry] {
        &self.entries
    }

    /// Number of playable rows (headers excluded).
    pub fn item_count(&self) -> usize {
        self.item_rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.item_rows.is_empty()
    }

    /// Playable row by playback index.
    pub fn item(&self, index: usize) -> Option<&DisplayItem> {
        let row = *self.item_rows.get(index)?;
        match &self.entries[row] {
            DisplayEntry::Item(item) => Some(item),
            DisplayEntry::Header(_) => None,
        }
    }

    /// Entry row holding the given playback index, used to scroll the view.
    pub fn row_of(&self, index: usize) -> Option<usize> {
        self.item_rows.get(index).copied()
    }

    pub fn items(&self) -> impl Iterator<Item = &DisplayItem> {
        self.entries.iter().filter_map(|entry| match entry {
            DisplayEntry::Item(item) => Some(item),
            DisplayEntry::Header(_) => None,
        })
    }

    /// Playback index of the verse with the given global identity.
    pub fn index_of_ayah(&self, global_id: u32) -> Option<usize> {
        self.items()
            .find(|item| item.ayah.id == global_id)
            .map(|item| item.playback_index)
    }

    fn push_header(&mut self, surah: &Surah) {
        self.entries
            .push(DisplayEntry::Header(SectionHeader::from_surah(surah)));
    }

    fn push_item(&mut self, surah_number: u16, ayah: &Ayah) {
        let playback_index = self.item_rows.len();
        self.item_rows.push(self.entries.len());
        self.entries.push(DisplayEntry::Item(DisplayItem {
            playback_index,
            surah_number,
            ayah: ayah.clone(),
        }));
    }
}

/// Compute the display sequence for `target`. Unknown targets fall back to
/// the first available target of the same mode; this never fails.
pub fn project(index: &ContentIndex, target: BrowseTarget) -> DisplaySequence {
    match target {
        BrowseTarget::Surah(number) => project_surah(index, number),
        BrowseTarget::Juz(id) => {
            let resolved = if index.juz_ids().contains(&id) {
                id
            } else {
                let fallback = index.juz_ids().first().copied().unwrap_or(1);
                warn!(requested = id, fallback, "unknown juz, falling back");
                fallback
            };
            let mut sequence = grouped(index, BrowseTarget::Juz(resolved), |ayah| {
                ayah.juz == resolved
            });
            sequence.title = format!("Juz {resolved}");
            sequence.subtitle = chapter_span(&sequence);
            sequence
        }
        BrowseTarget::Ruku(ordinal) => {
            let (ordinal, tag) = match index.resolve_ruku(ordinal) {
                Some(tag) => (ordinal, tag),
                None => {
                    let Some(tag) = index.resolve_ruku(1) else {
                        return DisplaySequence::empty(BrowseTarget::Ruku(1));
                    };
                    warn!(requested = ordinal, "unknown ruku ordinal, falling back");
                    (1, tag)
                }
            };
            let mut sequence = grouped(index, BrowseTarget::Ruku(ordinal), |ayah| {
                ayah.ruku == tag
            });
            sequence.title = format!("Ruku {ordinal}");
            sequence.subtitle = chapter_span(&sequence);
            sequence
        }
    }
}

fn project_surah(index: &ContentIndex, number: u16) -> DisplaySequence {
    let surah = match index.surah(number) {
        Some(surah) => surah,
        None => match index.first_surah() {
            Some(first) => {
                warn!(
                    requested = number,
                    fallback = first.surah_number,
                    "unknown surah, falling back"
                );
                first
            }
            None => return DisplaySequence::empty(BrowseTarget::Surah(number)),
        },
    };

    let mut sequence = DisplaySequence::empty(BrowseTarget::Surah(surah.surah_number));
    sequence.title = surah.display_title();
    sequence.subtitle = surah.meta.surah_meaning.clone();
    sequence.intro_audio = surah
        .has_intro()
        .then(|| surah.meta.audio_bismillah.clone());
    for ayah in &surah.ayahs {
        sequence.push_item(surah.surah_number, ayah);
    }
    sequence
}

fn grouped<F>(index: &ContentIndex, target: BrowseTarget, matches: F) -> DisplaySequence
where
    F: Fn(&Ayah) -> bool,
{
    let mut sequence = DisplaySequence::empty(target);
    for surah in index.surahs() {
        let mut matching = surah.ayahs.iter().filter(|ayah| matches(ayah)).peekable();
        if matching.peek().is_none() {
            continue;
        }
        sequence.push_header(surah);
        for ayah in matching {
            sequence.push_item(surah.surah_number, ayah);
        }
    }
    sequence
}

fn chapter_span(sequence: &DisplaySequence) -> String {
    let headers: Vec<&SectionHeader> = sequence
        .entries
        .iter()
        .filter_map(|entry| match entry {
            DisplayEntry::Header(header) => Some(header),
            DisplayEntry::Item(_) => None,
        })
        .collect();
    match (headers.first(), headers.last()) {
        (Some(first), Some(last)) if first.surah_number == last.surah_number => {
            first.title.clone()
        }
        (Some(first), Some(last)) => format!("{} to {}", first.title, last.title),
        _ => String::new(),
    }
}

/// Memoizing wrapper around [`project`]. Results are cached per target since
/// the index never changes after load.
pub struct Projector {
    index: Arc<ContentIndex>,
    cache: HashMap<BrowseTarget, Arc<DisplaySequence>>,
}

impl Projector {
    pub fn new(index: Arc<ContentIndex>) -> Self {
        Self {
            index,
            cache: HashMap::new(),
        }
    }

    pub fn index(&self) -> &ContentIndex {
        &self.index
    }

    pub fn project(&mut self, target: BrowseTarget) -> Arc<DisplaySequence> {
        if let Some(hit) = self.cache.get(&target) {
            return Arc::clone(hit);
        }
        let sequence = Arc::new(project(&self.index, target));
        debug!(
            ?target,
            rows = sequence.entries().len(),
            items = sequence.item_count(),
            "projected display sequence"
        );
        self.cache.insert(target, Arc::clone(&sequence));
        sequence
    }
}
