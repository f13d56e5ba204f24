use std::collections::BTreeSet;
use std::mem;
use std::sync::Arc;

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;
use rusqlite::Connection;
use tracing::{debug, error, info};

use crate::corpus::ContentIndex;
use crate::db::{
    fetch_bookmarks, load_font_size, load_last_read, load_theme, save_font_size,
    save_last_read, save_theme, toggle_bookmark, LastRead,
};
use crate::error::CorpusError;
use crate::models::{FontSize, Theme};
use crate::playback::{AudioSink, PlaybackController, PlaybackState, Slot};
use crate::projector::{
    BrowseMode, BrowseTarget, DisplayEntry, DisplayItem, DisplaySequence, Projector,
};

use super::forms::{ResumePrompt, SearchState};
use super::helpers::{
    arabic_style, block_spacing, centered_rect, surface_error, wrap_text, Palette,
};
use super::screens::{BookmarkList, NavigationList};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Width of the navigation sidebar.
const SIDEBAR_WIDTH: u16 = 34;
/// Rows moved by PageUp/PageDown.
const PAGE_STEP: isize = 10;

/// Which pane receives movement keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Navigation,
    Reader,
}

/// Fine-grained modes layered over the reader.
enum Mode {
    Normal,
    Searching(SearchState),
    Resume(ResumePrompt),
    Bookmarks(BookmarkList),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Everything that only exists once the content file loaded.
struct Library {
    projector: Projector,
    nav: NavigationList,
    /// Playback index the reader cursor sits on.
    cursor: usize,
}

/// Central application state shared across the TUI.
pub struct App {
    conn: Connection,
    library: Option<Library>,
    load_error: Option<String>,
    player: PlaybackController<Box<dyn AudioSink>>,
    theme: Theme,
    font_size: FontSize,
    bookmarks: BTreeSet<u32>,
    focus: Focus,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    /// Hydrate preferences and the first display sequence. A content load
    /// failure is not fatal: the reader shows a placeholder instead.
    pub fn new(
        conn: Connection,
        content: Result<ContentIndex, CorpusError>,
        sink: Box<dyn AudioSink>,
    ) -> Result<Self> {
        let theme = load_theme(&conn)?;
        let font_size = load_font_size(&conn)?;
        let bookmarks = fetch_bookmarks(&conn)?;
        let last_read = load_last_read(&conn)?;

        let mut mode = Mode::Normal;
        let (library, load_error, sequence) = match content {
            Ok(index) => {
                let mut projector = Projector::new(Arc::new(index));
                if let Some(last) = last_read {
                    let saved = projector.project(last.target);
                    mode = Mode::Resume(ResumePrompt::new(last, saved.title()));
                }
                let nav = NavigationList::for_mode(projector.index(), BrowseMode::Surah);
                let first = nav.first_target().unwrap_or(BrowseTarget::Surah(1));
                let sequence = projector.project(first);
                let library = Library {
                    projector,
                    nav,
                    cursor: 0,
                };
                (Some(library), None, sequence)
            }
            Err(err) => {
                error!("content unavailable: {}", err);
                (
                    None,
                    Some(err.to_string()),
                    Arc::new(DisplaySequence::empty(BrowseTarget::Surah(1))),
                )
            }
        };

        Ok(Self {
            conn,
            library,
            load_error,
            player: PlaybackController::new(sink, sequence),
            theme,
            font_size,
            bookmarks,
            focus: Focus::Navigation,
            mode,
            status: None,
        })
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.player.state()
    }

    pub fn target(&self) -> BrowseTarget {
        self.player.target()
    }

    pub fn sequence(&self) -> &DisplaySequence {
        self.player.sequence()
    }

    /// Playback index under the reader cursor.
    pub fn cursor(&self) -> usize {
        self.library.as_ref().map_or(0, |library| library.cursor)
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn font_size(&self) -> FontSize {
        self.font_size
    }

    pub fn bookmarks(&self) -> &BTreeSet<u32> {
        &self.bookmarks
    }

    /// True while the content file is missing or malformed.
    pub fn is_placeholder(&self) -> bool {
        self.library.is_none()
    }

    pub fn is_resume_prompt_open(&self) -> bool {
        matches!(self.mode, Mode::Resume(_))
    }

    /// Called on every loop iteration: drain audio notifications and react to
    /// index changes.
    pub fn on_tick(&mut self) {
        self.player.pump_events();
        self.sync_playback();
    }

    /// Silence audio before the terminal is torn down.
    pub fn shutdown(&mut self) {
        self.player.stop();
    }

    /// Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mut mode = mem::replace(&mut self.mode, Mode::Normal);

        mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::Searching(state) => self.handle_search(code, state),
            Mode::Resume(prompt) => self.handle_resume(code, prompt),
            Mode::Bookmarks(list) => self.handle_bookmarks(code, list)?,
        };

        self.mode = mode;
        self.sync_playback();
        if exit {
            self.shutdown();
        }
        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        if self.library.is_none() {
            if matches!(code, KeyCode::Char('q') | KeyCode::Esc) {
                *exit = true;
            }
            return Ok(Mode::Normal);
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => *exit = true,
            KeyCode::Char('1') => self.switch_mode(BrowseMode::Surah),
            KeyCode::Char('2') => self.switch_mode(BrowseMode::Juz),
            KeyCode::Char('3') => self.switch_mode(BrowseMode::Ruku),
            KeyCode::Tab => {
                self.focus = match self.focus {
                    Focus::Navigation => Focus::Reader,
                    Focus::Reader => Focus::Navigation,
                };
            }
            KeyCode::Char('/') => {
                self.clear_status();
                self.focus = Focus::Navigation;
                return Ok(Mode::Searching(SearchState::default()));
            }
            KeyCode::Up => self.move_focused(-1),
            KeyCode::Down => self.move_focused(1),
            KeyCode::PageUp => self.move_focused(-PAGE_STEP),
            KeyCode::PageDown => self.move_focused(PAGE_STEP),
            KeyCode::Home => self.jump_focused(true),
            KeyCode::End => self.jump_focused(false),
            KeyCode::Enter => match self.focus {
                Focus::Navigation => {
                    if let Some(target) = self.nav_target() {
                        self.select_target(target);
                        self.focus = Focus::Reader;
                    }
                }
                Focus::Reader => {
                    let cursor = self.cursor();
                    self.player.toggle_single_item(cursor);
                }
            },
            KeyCode::Char(' ') => self.player.toggle_sequential_play(),
            KeyCode::Char('s') | KeyCode::Char('S') => {
                self.player.stop();
                self.set_status("Playback stopped.", StatusKind::Info);
            }
            KeyCode::Char('b') | KeyCode::Char('B') => self.toggle_bookmark_at_cursor()?,
            KeyCode::Char('m') | KeyCode::Char('M') => {
                if let Some(library) = &self.library {
                    let list = BookmarkList::build(library.projector.index(), &self.bookmarks);
                    if list.entries.is_empty() {
                        self.set_status(
                            "No bookmarks yet. Press 'b' on a verse.",
                            StatusKind::Info,
                        );
                    } else {
                        self.clear_status();
                        return Ok(Mode::Bookmarks(list));
                    }
                }
            }
            KeyCode::Char('t') | KeyCode::Char('T') => {
                self.theme = self.theme.toggled();
                save_theme(&self.conn, self.theme)?;
                self.set_status(format!("Theme: {}.", self.theme), StatusKind::Info);
            }
            KeyCode::Char('+') | KeyCode::Char('=') => self.change_font_size(FontSize::larger)?,
            KeyCode::Char('-') => self.change_font_size(FontSize::smaller)?,
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_search(&mut self, code: KeyCode, mut state: SearchState) -> Mode {
        let Some(library) = self.library.as_mut() else {
            return Mode::Normal;
        };

        match code {
            KeyCode::Esc => {
                library.nav.set_filter(None);
                self.focus_active_target();
                return Mode::Normal;
            }
            KeyCode::Up => {
                library.nav.move_selection(-1);
                return Mode::Searching(state);
            }
            KeyCode::Down => {
                library.nav.move_selection(1);
                return Mode::Searching(state);
            }
            KeyCode::Enter => {
                let target = library.nav.current_target();
                library.nav.set_filter(None);
                match target {
                    Some(target) => {
                        self.select_target(target);
                        self.focus = Focus::Reader;
                    }
                    None => {
                        self.focus_active_target();
                        self.set_status("No match.", StatusKind::Error);
                    }
                }
                return Mode::Normal;
            }
            KeyCode::Backspace => {
                state.query.pop();
            }
            KeyCode::Char(ch) if !ch.is_control() => state.query.push(ch),
            _ => {}
        }

        library.nav.set_filter(state.filter());
        Mode::Searching(state)
    }

    fn handle_resume(&mut self, code: KeyCode, prompt: ResumePrompt) -> Mode {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                self.select_target(prompt.target());
                let count = self.player.sequence().item_count();
                if let Some(library) = self.library.as_mut() {
                    library.cursor = prompt.last.index.min(count.saturating_sub(1));
                }
                self.focus = Focus::Reader;
                self.set_status(format!("Resumed at {}.", prompt.location), StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Mode::Normal,
            _ => Mode::Resume(prompt),
        }
    }

    fn handle_bookmarks(&mut self, code: KeyCode, mut list: BookmarkList) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('m') | KeyCode::Char('M') => return Ok(Mode::Normal),
            KeyCode::Up => list.move_selection(-1),
            KeyCode::Down => list.move_selection(1),
            KeyCode::Enter => {
                if let Some(entry) = list.current().cloned() {
                    self.select_target(BrowseTarget::Surah(entry.surah_number));
                    if let Some(library) = self.library.as_mut() {
                        library.cursor = entry.item_index;
                    }
                    self.focus = Focus::Reader;
                    self.set_status(format!("Opened {}.", entry.label), StatusKind::Info);
                    return Ok(Mode::Normal);
                }
            }
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Delete => {
                if let Some(entry) = list.current().cloned() {
                    toggle_bookmark(&self.conn, entry.ayah_id)?;
                    self.bookmarks = fetch_bookmarks(&self.conn)?;
                    if let Some(library) = &self.library {
                        list.refresh(library.projector.index(), &self.bookmarks);
                    }
                    self.set_status(format!("Removed {}.", entry.label), StatusKind::Info);
                    if list.entries.is_empty() {
                        return Ok(Mode::Normal);
                    }
                }
            }
            _ => {}
        }
        Ok(Mode::Bookmarks(list))
    }

    /// Stop playback, recompute the display sequence for `target`, and reset
    /// the reader cursor.
    pub fn select_target(&mut self, target: BrowseTarget) {
        let Some(library) = self.library.as_mut() else {
            return;
        };
        let sequence = library.projector.project(target);
        let resolved = sequence.target();
        if library.nav.mode != resolved.mode() {
            library.nav = NavigationList::for_mode(library.projector.index(), resolved.mode());
        }
        library.nav.focus_target(resolved);
        library.cursor = 0;
        info!(?target, ?resolved, items = sequence.item_count(), "target selected");
        self.player.set_sequence(sequence);
    }

    /// Switch browse mode, keeping the reader on the verse under the cursor.
    pub fn switch_mode(&mut self, mode: BrowseMode) {
        let Some(library) = self.library.as_ref() else {
            return;
        };
        if self.player.target().mode() == mode {
            return;
        }

        let anchor = self.player.sequence().item(library.cursor).map(|item| {
            let target = match mode {
                BrowseMode::Surah => Some(BrowseTarget::Surah(item.surah_number)),
                BrowseMode::Juz => Some(BrowseTarget::Juz(item.ayah.juz)),
                BrowseMode::Ruku => library
                    .projector
                    .index()
                    .ruku_ordinal(item.ayah.ruku)
                    .map(BrowseTarget::Ruku),
            };
            (target, item.ayah.id)
        });

        let (target, ayah_id) = match anchor {
            Some((Some(target), ayah_id)) => (target, Some(ayah_id)),
            _ => match NavigationList::for_mode(library.projector.index(), mode).first_target() {
                Some(first) => (first, None),
                None => return,
            },
        };

        self.select_target(target);
        if let (Some(ayah_id), Some(library)) = (ayah_id, self.library.as_mut()) {
            if let Some(index) = self.player.sequence().index_of_ayah(ayah_id) {
                library.cursor = index;
            }
        }
        self.set_status(format!("Browsing by {}.", mode.label()), StatusKind::Info);
    }

    /// Apply the controller's latest index change: move the cursor onto the
    /// playing verse and persist it as the last-read position.
    fn sync_playback(&mut self) {
        let Some(Slot::Item(index)) = self.player.take_index_change() else {
            return;
        };
        if let Some(library) = self.library.as_mut() {
            library.cursor = index;
        }
        let last = LastRead::now(self.player.target(), index);
        if let Err(err) = save_last_read(&self.conn, &last) {
            error!("failed to persist last position: {:#}", err);
            self.set_status(surface_error(&err), StatusKind::Error);
        } else {
            debug!(?last, "last position saved");
        }
    }

    fn toggle_bookmark_at_cursor(&mut self) -> Result<()> {
        let Some(item) = self.player.sequence().item(self.cursor()) else {
            self.set_status("No verse selected.", StatusKind::Error);
            return Ok(());
        };
        let label = format!("{}:{}", item.surah_number, item.ayah.ayah_number);
        let added = toggle_bookmark(&self.conn, item.ayah.id)?;
        self.bookmarks = fetch_bookmarks(&self.conn)?;
        let message = if added {
            format!("Bookmarked {label}.")
        } else {
            format!("Removed bookmark {label}.")
        };
        self.set_status(message, StatusKind::Info);
        Ok(())
    }

    fn change_font_size(&mut self, step: fn(FontSize) -> FontSize) -> Result<()> {
        let next = step(self.font_size);
        if next != self.font_size {
            self.font_size = next;
            save_font_size(&self.conn, next)?;
        }
        self.set_status(format!("Font size {}.", self.font_size), StatusKind::Info);
        Ok(())
    }

    fn move_focused(&mut self, offset: isize) {
        let item_count = self.player.sequence().item_count();
        let Some(library) = self.library.as_mut() else {
            return;
        };
        match self.focus {
            Focus::Navigation => library.nav.move_selection(offset),
            Focus::Reader => {
                if item_count == 0 {
                    return;
                }
                let last = item_count as isize - 1;
                let next = (library.cursor as isize).saturating_add(offset).clamp(0, last);
                library.cursor = next as usize;
            }
        }
    }

    fn jump_focused(&mut self, to_start: bool) {
        let item_count = self.player.sequence().item_count();
        let Some(library) = self.library.as_mut() else {
            return;
        };
        match (self.focus, to_start) {
            (Focus::Navigation, true) => library.nav.select_first(),
            (Focus::Navigation, false) => library.nav.select_last(),
            (Focus::Reader, true) => library.cursor = 0,
            (Focus::Reader, false) => library.cursor = item_count.saturating_sub(1),
        }
    }

    fn nav_target(&self) -> Option<BrowseTarget> {
        self.library
            .as_ref()
            .and_then(|library| library.nav.current_target())
    }

    fn focus_active_target(&mut self) {
        let target = self.player.target();
        if let Some(library) = self.library.as_mut() {
            library.nav.focus_target(target);
        }
    }

    pub fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let palette = Palette::for_theme(self.theme);
        frame.render_widget(Block::default().style(palette.background), area);

        let footer_height = FOOTER_HEIGHT.min(area.height);
        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        match &self.library {
            Some(library) => {
                let columns = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
                    .split(content_area);
                self.draw_navigation(frame, columns[0], library, &palette);
                self.draw_reader(frame, columns[1], library, &palette);
            }
            None => self.draw_placeholder(frame, content_area, &palette),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::Searching(state) => self.draw_search_bar(frame, area, state),
            Mode::Resume(prompt) => self.draw_resume(frame, area, prompt),
            Mode::Bookmarks(list) => self.draw_bookmarks(frame, area, list, &palette),
            Mode::Normal => {}
        }
    }

    fn draw_navigation(&self, frame: &mut Frame, area: Rect, library: &Library, palette: &Palette) {
        let nav = &library.nav;
        let active = self.player.target();
        let mut title = format!(" {} ", nav.mode.label());
        if let Some(filter) = &nav.filter {
            title = format!(" {} /{} ", nav.mode.label(), filter);
        }

        let items: Vec<ListItem> = nav
            .visible_entries()
            .map(|entry| {
                let marker = if entry.target == active { "▶ " } else { "  " };
                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(marker, palette.accent),
                        Span::styled(entry.label.clone(), palette.text),
                    ]),
                    Line::from(Span::styled(format!("  {}", entry.detail), palette.muted)),
                ])
            })
            .collect();

        let border_style = if self.focus == Focus::Navigation {
            palette.accent
        } else {
            palette.muted
        };
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border_style)
                    .title(title),
            )
            .highlight_style(palette.highlight);

        let mut state = ListState::default();
        if nav.visible_len() > 0 {
            state.select(Some(nav.selected));
        }
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_reader(&self, frame: &mut Frame, area: Rect, library: &Library, palette: &Palette) {
        let sequence = self.player.sequence();
        let border_style = if self.focus == Focus::Reader {
            palette.accent
        } else {
            palette.muted
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(Line::from(format!(" {} ", sequence.title())).style(palette.header))
            .title(Line::from(format!(" {} ", sequence.subtitle())).right_aligned());
        let inner_width = block.inner(area).width.saturating_sub(2) as usize;

        if sequence.is_empty() {
            let paragraph = Paragraph::new("Nothing to show for this selection.")
                .style(palette.muted)
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(paragraph, area);
            return;
        }

        let state = self.player.state();
        let mut items = Vec::with_capacity(sequence.entries().len() + 1);
        let mut offset = 0;

        if sequence.intro_audio().is_some() {
            let marker = slot_marker(state, Slot::Intro);
            items.push(ListItem::new(Line::from(vec![
                Span::styled(marker, palette.accent),
                Span::styled("بِسْمِ ٱللَّهِ ٱلرَّحْمَٰنِ ٱلرَّحِيمِ", palette.header),
            ])
            .alignment(Alignment::Center)));
            offset = 1;
        }

        for entry in sequence.entries() {
            match entry {
                DisplayEntry::Header(header) => {
                    items.push(ListItem::new(vec![
                        Line::from(""),
                        Line::from(Span::styled(
                            format!("── {} · {} ──", header.title, header.name_native),
                            palette.header,
                        ))
                        .alignment(Alignment::Center),
                    ]));
                }
                DisplayEntry::Item(item) => {
                    items.push(self.verse_item(item, state, inner_width, palette));
                }
            }
        }

        let list = List::new(items)
            .block(block)
            .highlight_style(palette.highlight);
        let mut list_state = ListState::default();
        if let Some(row) = sequence.row_of(library.cursor) {
            list_state.select(Some(row + offset));
        }
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn verse_item(
        &self,
        item: &DisplayItem,
        state: PlaybackState,
        width: usize,
        palette: &Palette,
    ) -> ListItem<'static> {
        let ayah = &item.ayah;
        let mut lines = Vec::new();

        let mut heading = vec![
            Span::styled(slot_marker(state, Slot::Item(item.playback_index)), palette.accent),
            Span::styled(
                format!("{}:{}", item.surah_number, ayah.ayah_number),
                palette.accent,
            ),
        ];
        if self.bookmarks.contains(&ayah.id) {
            heading.push(Span::styled(" ★", palette.header));
        }
        lines.push(Line::from(heading));

        let arabic = arabic_style(self.font_size, palette);
        for row in wrap_text(&ayah.text_arabic, width) {
            lines.push(Line::from(Span::styled(row, arabic)).alignment(Alignment::Right));
        }
        for row in wrap_text(&ayah.text_urdu, width) {
            lines.push(Line::from(Span::styled(row, palette.text)).alignment(Alignment::Right));
        }
        for row in wrap_text(&ayah.text_english, width) {
            lines.push(Line::from(Span::styled(row, palette.muted)));
        }
        for _ in 0..block_spacing(self.font_size) {
            lines.push(Line::from(""));
        }
        ListItem::new(lines)
    }

    fn draw_placeholder(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let mut lines = vec![
            Line::from(Span::styled("Content not loaded", palette.header)),
            Line::from(""),
        ];
        if let Some(err) = &self.load_error {
            lines.push(Line::from(Span::styled(err.clone(), palette.muted)));
            lines.push(Line::from(""));
        }
        lines.push(Line::from(
            "Run `noble-quran fetch` to download the content file, then start the reader again.",
        ));

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title(" Noble Quran "));
        frame.render_widget(paragraph, area);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from(self.playback_summary())
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn playback_summary(&self) -> String {
        let sequence = self.player.sequence();
        let describe = |slot: Slot| match slot {
            Slot::Intro => "bismillah".to_string(),
            Slot::Item(index) => sequence
                .item(index)
                .map(|item| format!("{}:{}", item.surah_number, item.ayah.ayah_number))
                .unwrap_or_default(),
        };
        let mode = if self.player.auto_advance() {
            "continuous"
        } else {
            "single verse"
        };
        match self.player.state() {
            PlaybackState::Stopped => {
                format!("Stopped · {} · font {}", sequence.title(), self.font_size)
            }
            PlaybackState::Playing(slot) => format!("Playing {} ({mode})", describe(slot)),
            PlaybackState::Paused(slot) => format!("Paused at {} ({mode})", describe(slot)),
        }
    }

    fn draw_search_bar(&self, frame: &mut Frame, area: Rect, state: &SearchState) {
        let height = 3u16.min(area.height);
        let popup_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width.min(SIDEBAR_WIDTH.max(30)),
            height,
        };
        frame.render_widget(Clear, popup_area);

        let block = Block::default().borders(Borders::ALL).title("Search");
        let paragraph = Paragraph::new(Span::raw(format!("Search: {}", state.query)))
            .block(block.clone())
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);

        let inner = block.inner(popup_area);
        let cursor_x = inner.x + "Search: ".len() as u16 + state.query.chars().count() as u16;
        let cursor_y = inner.y;
        frame.set_cursor_position((cursor_x.min(inner.right().saturating_sub(1)), cursor_y));
    }

    fn draw_resume(&self, frame: &mut Frame, area: Rect, prompt: &ResumePrompt) {
        let popup = centered_rect(50, 40, area);
        frame.render_widget(Clear, popup);
        let paragraph = Paragraph::new(prompt.lines())
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title(" Resume "));
        frame.render_widget(paragraph, popup);
    }

    fn draw_bookmarks(&self, frame: &mut Frame, area: Rect, list: &BookmarkList, palette: &Palette) {
        let popup = centered_rect(50, 60, area);
        frame.render_widget(Clear, popup);
        let items: Vec<ListItem> = list
            .entries
            .iter()
            .map(|entry| ListItem::new(Line::from(entry.label.clone())))
            .collect();
        let widget = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(" Bookmarks "))
            .highlight_style(palette.highlight);
        let mut state = ListState::default();
        state.select(Some(list.selected));
        frame.render_stateful_widget(widget, popup, &mut state);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let pairs: &[(&str, &str)] = match (&self.mode, self.library.is_some()) {
            (_, false) => &[("[q]", " Quit")],
            (Mode::Searching(_), _) => &[
                ("[↑↓]", " Navigate   "),
                ("[Enter]", " Open   "),
                ("[Esc]", " Cancel"),
            ],
            (Mode::Resume(_), _) => &[("[y]", " Resume   "), ("[n]", " Start fresh")],
            (Mode::Bookmarks(_), _) => &[
                ("[↑↓]", " Navigate   "),
                ("[Enter]", " Open   "),
                ("[d]", " Remove   "),
                ("[Esc]", " Close"),
            ],
            (Mode::Normal, _) => &[
                ("[1/2/3]", " Surah/Juz/Ruku  "),
                ("[Tab]", " Focus  "),
                ("[/]", " Search  "),
                ("[Enter]", " Open/Play verse  "),
                ("[Space]", " Play all  "),
                ("[s]", " Stop  "),
                ("[b/m]", " Bookmark/List  "),
                ("[t]", " Theme  "),
                ("[+/-]", " Font  "),
                ("[q]", " Quit"),
            ],
        };
        Line::from(
            pairs
                .iter()
                .flat_map(|(key, label)| {
                    [Span::styled(*key, key_style), Span::raw(*label)]
                })
                .collect::<Vec<_>>(),
        )
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }
}

fn slot_marker(state: PlaybackState, slot: Slot) -> &'static str {
    match state {
        PlaybackState::Playing(current) if current == slot => "▶ ",
        PlaybackState::Paused(current) if current == slot => "⏸ ",
        _ => "  ",
    }
}
