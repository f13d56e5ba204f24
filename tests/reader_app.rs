mod common;

use std::path::{Path, PathBuf};

use common::{audio_for, sample_index, RecordingSink, SinkCommand, INTRO_URL};
use crossterm::event::KeyCode;
use noble_quran::db::{
    fetch_bookmarks, load_font_size, load_last_read, load_theme, open_preferences, save_last_read,
    LastRead,
};
use noble_quran::ui::Focus;
use noble_quran::{App, BrowseTarget, ContentIndex, PlaybackState, SinkEvent, Slot, Theme};
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use tempfile::TempDir;

struct Harness {
    _dir: TempDir,
    db_path: PathBuf,
    sink: RecordingSink,
    app: App,
}

fn harness_with(setup: impl FnOnce(&Path)) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("prefs.sqlite");
    setup(&db_path);
    let sink = RecordingSink::default();
    let conn = open_preferences(&db_path).unwrap();
    let app = App::new(conn, Ok(sample_index()), Box::new(sink.clone())).unwrap();
    Harness {
        _dir: dir,
        db_path,
        sink,
        app,
    }
}

fn harness() -> Harness {
    harness_with(|_| {})
}

fn press(app: &mut App, keys: &[KeyCode]) {
    for &key in keys {
        assert!(!app.handle_key(key).unwrap(), "unexpected exit on {key:?}");
    }
}

fn type_text(app: &mut App, text: &str) {
    for ch in text.chars() {
        press(app, &[KeyCode::Char(ch)]);
    }
}

fn render(app: &App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
    terminal.draw(|frame| app.draw(frame)).unwrap();
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|cell| cell.symbol())
        .collect()
}

#[test]
fn test_starts_on_first_chapter_without_prompt() {
    let h = harness();
    assert!(!h.app.is_placeholder());
    assert!(!h.app.is_resume_prompt_open());
    assert_eq!(h.app.target(), BrowseTarget::Surah(1));
    assert_eq!(h.app.playback_state(), PlaybackState::Stopped);
    assert_eq!(h.app.focus(), Focus::Navigation);

    let screen = render(&h.app);
    assert!(screen.contains("1. Surah 1"));
    assert!(screen.contains("3. Surah 3"));
    assert!(screen.contains("english 1:2"));
}

#[test]
fn test_sequential_playback_moves_cursor_and_saves_position() {
    let mut h = harness();
    press(&mut h.app, &[KeyCode::Down, KeyCode::Enter]);
    assert_eq!(h.app.target(), BrowseTarget::Surah(2));
    assert_eq!(h.app.focus(), Focus::Reader);

    press(&mut h.app, &[KeyCode::Char(' ')]);
    assert_eq!(h.app.playback_state(), PlaybackState::Playing(Slot::Intro));
    assert_eq!(h.sink.loads().last(), Some(&INTRO_URL.to_string()));

    let conn = open_preferences(&h.db_path).unwrap();
    assert_eq!(load_last_read(&conn).unwrap(), None);

    h.sink.push_event(SinkEvent::Ended);
    h.app.on_tick();
    h.sink.push_event(SinkEvent::Ended);
    h.app.on_tick();
    assert_eq!(h.app.playback_state(), PlaybackState::Playing(Slot::Item(1)));
    assert_eq!(h.app.cursor(), 1);
    assert_eq!(h.sink.loads().last(), Some(&audio_for(5)));

    let saved = load_last_read(&conn).unwrap().expect("position saved");
    assert_eq!(saved.target, BrowseTarget::Surah(2));
    assert_eq!(saved.index, 1);
}

#[test]
fn test_pause_before_tick_is_not_overridden_by_pending_end() {
    let mut h = harness();
    press(&mut h.app, &[KeyCode::Down, KeyCode::Enter, KeyCode::Char(' ')]);
    assert_eq!(h.app.playback_state(), PlaybackState::Playing(Slot::Intro));

    h.sink.push_event(SinkEvent::Ended);
    press(&mut h.app, &[KeyCode::Char(' ')]);
    h.app.on_tick();

    assert_eq!(h.app.playback_state(), PlaybackState::Paused(Slot::Intro));
    assert_eq!(h.sink.loads(), vec![INTRO_URL.to_string()]);
}

#[test]
fn test_mode_switch_stops_playback_and_keeps_the_verse() {
    let mut h = harness();
    press(
        &mut h.app,
        &[KeyCode::Down, KeyCode::Enter, KeyCode::Down, KeyCode::Down, KeyCode::Down],
    );
    assert_eq!(h.app.cursor(), 3);
    press(&mut h.app, &[KeyCode::Enter]);
    assert_eq!(h.app.playback_state(), PlaybackState::Playing(Slot::Item(3)));

    press(&mut h.app, &[KeyCode::Char('2')]);
    assert_eq!(h.app.playback_state(), PlaybackState::Stopped);
    assert_eq!(h.sink.commands().last(), Some(&SinkCommand::Pause));
    // verse 2:4 (global 7) sits in juz 2, first item there
    assert_eq!(h.app.target(), BrowseTarget::Juz(2));
    assert_eq!(h.app.cursor(), 0);

    press(&mut h.app, &[KeyCode::Char('3')]);
    assert_eq!(h.app.target(), BrowseTarget::Ruku(3));
    assert_eq!(h.app.cursor(), 1);
}

#[test]
fn test_search_filters_navigation_and_selects() {
    let mut h = harness();
    press(&mut h.app, &[KeyCode::Char('/')]);
    type_text(&mut h.app, "meaning 3");
    let screen = render(&h.app);
    assert!(screen.contains("Search: meaning 3"));
    assert!(!screen.contains("2. Surah 2"));

    press(&mut h.app, &[KeyCode::Enter]);
    assert_eq!(h.app.target(), BrowseTarget::Surah(3));
    assert_eq!(h.app.focus(), Focus::Reader);
    assert!(render(&h.app).contains("2. Surah 2"));
}

#[test]
fn test_preferences_are_persisted() {
    let mut h = harness();
    assert_eq!(h.app.theme(), Theme::Dark);
    press(
        &mut h.app,
        &[
            KeyCode::Char('t'),
            KeyCode::Char('+'),
            KeyCode::Char('+'),
            KeyCode::Char('+'),
            KeyCode::Tab,
            KeyCode::Down,
            KeyCode::Char('b'),
        ],
    );
    assert_eq!(h.app.font_size().rank(), 5);
    assert!(h.app.bookmarks().contains(&2));

    let conn = open_preferences(&h.db_path).unwrap();
    assert_eq!(load_theme(&conn).unwrap(), Theme::Light);
    assert_eq!(load_font_size(&conn).unwrap().rank(), 5);
    assert!(fetch_bookmarks(&conn).unwrap().contains(&2));

    press(&mut h.app, &[KeyCode::Char('b')]);
    assert!(fetch_bookmarks(&conn).unwrap().is_empty());
}

#[test]
fn test_bookmark_list_jumps_to_verse() {
    let mut h = harness();
    press(
        &mut h.app,
        &[KeyCode::Down, KeyCode::Down, KeyCode::Enter, KeyCode::Down, KeyCode::Char('b')],
    );
    press(&mut h.app, &[KeyCode::Char('1')]);
    assert_eq!(h.app.target(), BrowseTarget::Surah(3));

    press(&mut h.app, &[KeyCode::Char('2'), KeyCode::Char('m')]);
    assert!(render(&h.app).contains("3:2  Surah 3"));
    press(&mut h.app, &[KeyCode::Enter]);
    assert_eq!(h.app.target(), BrowseTarget::Surah(3));
    assert_eq!(h.app.cursor(), 1);
}

#[test]
fn test_resume_prompt_restores_last_position() {
    let mut h = harness_with(|db| {
        let conn = open_preferences(db).unwrap();
        save_last_read(
            &conn,
            &LastRead {
                target: BrowseTarget::Juz(2),
                index: 2,
                updated_at: 0,
            },
        )
        .unwrap();
    });
    assert!(h.app.is_resume_prompt_open());
    assert!(render(&h.app).contains("Juz 2, verse 3"));

    press(&mut h.app, &[KeyCode::Char('y')]);
    assert!(!h.app.is_resume_prompt_open());
    assert_eq!(h.app.target(), BrowseTarget::Juz(2));
    assert_eq!(h.app.cursor(), 2);
    assert_eq!(h.app.playback_state(), PlaybackState::Stopped);
}

#[test]
fn test_declining_resume_keeps_first_chapter() {
    let mut h = harness_with(|db| {
        let conn = open_preferences(db).unwrap();
        save_last_read(&conn, &LastRead::now(BrowseTarget::Surah(3), 1)).unwrap();
    });
    press(&mut h.app, &[KeyCode::Char('n')]);
    assert!(!h.app.is_resume_prompt_open());
    assert_eq!(h.app.target(), BrowseTarget::Surah(1));
}

#[test]
fn test_missing_content_shows_placeholder() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_preferences(&dir.path().join("prefs.sqlite")).unwrap();
    let content = ContentIndex::load(&dir.path().join("absent.json"));
    let sink = RecordingSink::default();
    let mut app = App::new(conn, content, Box::new(sink.clone())).unwrap();

    assert!(app.is_placeholder());
    assert!(render(&app).contains("Content not loaded"));

    press(&mut app, &[KeyCode::Char(' '), KeyCode::Char('2'), KeyCode::Enter]);
    assert!(sink.loads().is_empty());
    assert!(app.handle_key(KeyCode::Char('q')).unwrap());
}

#[test]
fn test_quit_stops_audio() {
    let mut h = harness();
    press(&mut h.app, &[KeyCode::Char(' ')]);
    assert!(h.app.playback_state().is_playing());
    assert!(h.app.handle_key(KeyCode::Char('q')).unwrap());
    assert_eq!(h.app.playback_state(), PlaybackState::Stopped);
}
