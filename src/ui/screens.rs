use std::collections::BTreeSet;

use crate::corpus::ContentIndex;
use crate::projector::{BrowseMode, BrowseTarget};

/// One selectable row of the navigation sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NavEntry {
    pub(crate) target: BrowseTarget,
    pub(crate) label: String,
    pub(crate) detail: String,
    /// Lower-cased text the inline filter matches against.
    haystack: String,
}

impl NavEntry {
    fn new(target: BrowseTarget, label: String, detail: String, extra: &[&str]) -> Self {
        let mut haystack = format!("{} {} {}", target.id(), label, detail);
        for part in extra {
            haystack.push(' ');
            haystack.push_str(part);
        }
        Self {
            target,
            label,
            detail,
            haystack: haystack.to_lowercase(),
        }
    }

    fn matches(&self, query: &str) -> bool {
        self.haystack.contains(query)
    }
}

/// Sidebar list for the active browse mode plus the shell-owned text filter.
pub(crate) struct NavigationList {
    pub(crate) mode: BrowseMode,
    entries: Vec<NavEntry>,
    /// Positions into `entries` that survive the filter.
    visible: Vec<usize>,
    pub(crate) filter: Option<String>,
    pub(crate) selected: usize,
}

impl NavigationList {
    pub(crate) fn for_mode(index: &ContentIndex, mode: BrowseMode) -> Self {
        let entries = match mode {
            BrowseMode::Surah => surah_entries(index),
            BrowseMode::Juz => juz_entries(index),
            BrowseMode::Ruku => ruku_entries(index),
        };
        let mut list = Self {
            mode,
            visible: Vec::new(),
            entries,
            filter: None,
            selected: 0,
        };
        list.apply_filter();
        list
    }

    pub(crate) fn apply_filter(&mut self) {
        let query = self
            .filter
            .as_deref()
            .map(|q| q.trim().to_lowercase())
            .unwrap_or_default();

        self.visible = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| query.is_empty() || entry.matches(&query))
            .map(|(pos, _)| pos)
            .collect();

        if self.visible.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.visible.len() {
            self.selected = self.visible.len() - 1;
        }
    }

    pub(crate) fn set_filter(&mut self, filter: Option<String>) {
        self.filter = filter;
        self.apply_filter();
    }

    pub(crate) fn visible_entries(&self) -> impl Iterator<Item = &NavEntry> {
        self.visible.iter().map(|&pos| &self.entries[pos])
    }

    pub(crate) fn visible_len(&self) -> usize {
        self.visible.len()
    }

    pub(crate) fn current_target(&self) -> Option<BrowseTarget> {
        self.visible
            .get(self.selected)
            .map(|&pos| self.entries[pos].target)
    }

    pub(crate) fn first_target(&self) -> Option<BrowseTarget> {
        self.entries.first().map(|entry| entry.target)
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.visible.is_empty() {
            return;
        }
        let last = self.visible.len() as isize - 1;
        self.selected = (self.selected as isize + offset).clamp(0, last) as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.visible.len().saturating_sub(1);
    }

    /// Move the selection onto `target` when it is visible.
    pub(crate) fn focus_target(&mut self, target: BrowseTarget) {
        if let Some(pos) = self
            .visible
            .iter()
            .position(|&entry| self.entries[entry].target == target)
        {
            self.selected = pos;
        }
    }
}

fn surah_entries(index: &ContentIndex) -> Vec<NavEntry> {
    index
        .surahs()
        .iter()
        .map(|surah| {
            NavEntry::new(
                BrowseTarget::Surah(surah.surah_number),
                surah.display_title(),
                format!("{} · {} verses", surah.meta.surah_meaning, surah.ayahs.len()),
                &[&surah.meta.surah_name_ar],
            )
        })
        .collect()
}

fn juz_entries(index: &ContentIndex) -> Vec<NavEntry> {
    index
        .juz_ids()
        .iter()
        .map(|&juz| {
            let opening = index
                .surahs()
                .iter()
                .find_map(|s| s.ayahs.iter().find(|a| a.juz == juz).map(|a| (s, a)));
            let detail = opening
                .map(|(s, a)| {
                    format!(
                        "from {} {}:{}",
                        s.meta.surah_name_en, s.surah_number, a.ayah_number
                    )
                })
                .unwrap_or_default();
            NavEntry::new(BrowseTarget::Juz(juz), format!("Juz {juz}"), detail, &[])
        })
        .collect()
}

fn ruku_entries(index: &ContentIndex) -> Vec<NavEntry> {
    // one pass: the first verse of every tag, in corpus order
    let mut seen = BTreeSet::new();
    let mut openings = Vec::with_capacity(index.ruku_count());
    for surah in index.surahs() {
        for ayah in &surah.ayahs {
            if seen.insert(ayah.ruku) {
                openings.push((ayah.ruku, surah, ayah));
            }
        }
    }
    openings.sort_by_key(|(tag, _, _)| *tag);

    openings
        .into_iter()
        .filter_map(|(tag, surah, ayah)| {
            let ordinal = index.ruku_ordinal(tag)?;
            Some(NavEntry::new(
                BrowseTarget::Ruku(ordinal),
                format!("Ruku {ordinal}"),
                format!(
                    "{} {}:{}",
                    surah.meta.surah_name_en, surah.surah_number, ayah.ayah_number
                ),
                &[],
            ))
        })
        .collect()
}

/// Saved verses shown in the bookmarks overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BookmarkEntry {
    pub(crate) ayah_id: u32,
    pub(crate) surah_number: u16,
    pub(crate) item_index: usize,
    pub(crate) label: String,
}

pub(crate) struct BookmarkList {
    pub(crate) entries: Vec<BookmarkEntry>,
    pub(crate) selected: usize,
}

impl BookmarkList {
    /// Resolve stored identities against the corpus. Identities the corpus no
    /// longer contains are skipped.
    pub(crate) fn build(index: &ContentIndex, bookmarks: &BTreeSet<u32>) -> Self {
        let entries = bookmarks
            .iter()
            .filter_map(|&ayah_id| {
                let (surah_number, item_index) = index.locate(ayah_id)?;
                let surah = index.surah(surah_number)?;
                let ayah = surah.ayahs.get(item_index)?;
                Some(BookmarkEntry {
                    ayah_id,
                    surah_number,
                    item_index,
                    label: format!(
                        "{}:{}  {}",
                        surah_number, ayah.ayah_number, surah.meta.surah_name_en
                    ),
                })
            })
            .collect();
        Self {
            entries,
            selected: 0,
        }
    }

    pub(crate) fn current(&self) -> Option<&BookmarkEntry> {
        self.entries.get(self.selected)
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.entries.is_empty() {
            return;
        }
        let last = self.entries.len() as isize - 1;
        self.selected = (self.selected as isize + offset).clamp(0, last) as usize;
    }

    /// Rebuild after a removal, keeping the cursor near where it was.
    pub(crate) fn refresh(&mut self, index: &ContentIndex, bookmarks: &BTreeSet<u32>) {
        let selected = self.selected;
        *self = Self::build(index, bookmarks);
        self.selected = selected.min(self.entries.len().saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::fixtures::sample_surahs;

    fn index() -> ContentIndex {
        ContentIndex::from_surahs(sample_surahs())
    }

    #[test]
    fn lists_targets_per_mode() {
        let index = index();
        let surahs = NavigationList::for_mode(&index, BrowseMode::Surah);
        assert_eq!(surahs.visible_len(), 3);
        assert_eq!(surahs.current_target(), Some(BrowseTarget::Surah(1)));

        let juz = NavigationList::for_mode(&index, BrowseMode::Juz);
        assert_eq!(juz.visible_len(), 2);

        let ruku = NavigationList::for_mode(&index, BrowseMode::Ruku);
        let targets: Vec<_> = ruku.visible_entries().map(|e| e.target).collect();
        assert_eq!(targets.first(), Some(&BrowseTarget::Ruku(1)));
        assert_eq!(targets.len(), 5);
        assert_eq!(
            ruku.visible_entries().nth(3).map(|e| e.detail.as_str()),
            Some("Surah 2 2:5")
        );
    }

    #[test]
    fn filter_matches_names_and_numbers_case_insensitively() {
        let index = index();
        let mut list = NavigationList::for_mode(&index, BrowseMode::Surah);
        list.set_filter(Some("MEANING 3".into()));
        assert_eq!(list.current_target(), Some(BrowseTarget::Surah(3)));

        list.set_filter(Some("surah 2".into()));
        assert_eq!(list.visible_len(), 1);

        list.set_filter(Some("nothing like this".into()));
        assert_eq!(list.visible_len(), 0);
        assert_eq!(list.current_target(), None);
        list.move_selection(1);

        list.set_filter(None);
        assert_eq!(list.visible_len(), 3);
    }

    #[test]
    fn selection_is_clamped_and_can_follow_a_target() {
        let index = index();
        let mut list = NavigationList::for_mode(&index, BrowseMode::Surah);
        list.move_selection(10);
        assert_eq!(list.current_target(), Some(BrowseTarget::Surah(3)));
        list.move_selection(-10);
        assert_eq!(list.current_target(), Some(BrowseTarget::Surah(1)));
        list.focus_target(BrowseTarget::Surah(2));
        assert_eq!(list.selected, 1);
        list.select_last();
        assert_eq!(list.selected, 2);
    }

    #[test]
    fn bookmarks_resolve_against_the_corpus() {
        let index = index();
        let stored: BTreeSet<u32> = [5, 10, 999].into_iter().collect();
        let mut list = BookmarkList::build(&index, &stored);
        assert_eq!(list.entries.len(), 2);
        assert_eq!(list.entries[0].surah_number, 2);
        assert_eq!(list.entries[0].item_index, 1);
        list.move_selection(5);
        assert_eq!(list.current().map(|e| e.ayah_id), Some(10));

        let remaining: BTreeSet<u32> = [5].into_iter().collect();
        list.refresh(&index, &remaining);
        assert_eq!(list.selected, 0);
    }
}
