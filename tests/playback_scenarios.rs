mod common;

use std::sync::Arc;

use common::{audio_for, long_chapter_index, sample_index, RecordingSink, SinkCommand, INTRO_URL};
use noble_quran::{
    project, BrowseTarget, DisplayEntry, PlaybackController, PlaybackState, Projector, SinkEvent,
    Slot,
};

fn controller(
    index: &noble_quran::ContentIndex,
    target: BrowseTarget,
) -> (PlaybackController<RecordingSink>, RecordingSink) {
    let sink = RecordingSink::default();
    let player = PlaybackController::new(sink.clone(), Arc::new(project(index, target)));
    (player, sink)
}

#[test]
fn test_scenario_a_intro_then_first_verse() {
    let index = long_chapter_index(114);
    let (mut player, sink) = controller(&index, BrowseTarget::Surah(2));
    assert_eq!(player.sequence().item_count(), 114);

    player.toggle_sequential_play();
    assert_eq!(player.state(), PlaybackState::Playing(Slot::Intro));
    assert_eq!(sink.loads(), vec![INTRO_URL.to_string()]);

    sink.push_event(SinkEvent::Ended);
    player.pump_events();
    assert_eq!(player.state(), PlaybackState::Playing(Slot::Item(0)));
    assert_eq!(sink.loads().last(), Some(&audio_for(2)));
}

#[test]
fn test_scenario_b_juz_spanning_two_chapters() {
    let index = sample_index();
    let sequence = project(&index, BrowseTarget::Juz(1));

    let shape: Vec<String> = sequence
        .entries()
        .iter()
        .map(|entry| match entry {
            DisplayEntry::Header(header) => format!("H{}", header.surah_number),
            DisplayEntry::Item(item) => format!("{}:{}", item.surah_number, item.ayah.ayah_number),
        })
        .collect();
    assert_eq!(
        shape,
        vec!["H1", "1:1", "1:2", "1:3", "H2", "2:1", "2:2", "2:3"]
    );

    let first = sequence.item(0).expect("index 0 exists");
    assert_eq!(first.surah_number, 1);
    assert_eq!(first.ayah.ayah_number, 1);

    let (player, _) = controller(&index, BrowseTarget::Juz(1));
    assert_eq!(player.resolve_source(Slot::Item(0)), Some(audio_for(1).as_str()));
    assert_eq!(player.resolve_source(Slot::Intro), None);
}

#[test]
fn test_scenario_c_single_item_pause_and_resume_without_reload() {
    let index = long_chapter_index(10);
    let (mut player, sink) = controller(&index, BrowseTarget::Surah(2));

    player.toggle_single_item(5);
    assert_eq!(player.state(), PlaybackState::Playing(Slot::Item(5)));
    player.toggle_single_item(5);
    assert_eq!(player.state(), PlaybackState::Paused(Slot::Item(5)));
    player.toggle_single_item(5);
    assert_eq!(player.state(), PlaybackState::Playing(Slot::Item(5)));

    assert_eq!(
        sink.commands(),
        vec![
            SinkCommand::Load(audio_for(7)),
            SinkCommand::Pause,
            SinkCommand::Resume,
        ]
    );
}

#[test]
fn test_scenario_d_other_item_reloads_and_clears_auto_advance() {
    let index = long_chapter_index(10);
    for sequential_first in [true, false] {
        let (mut player, sink) = controller(&index, BrowseTarget::Surah(2));
        if sequential_first {
            player.toggle_sequential_play();
            for _ in 0..6 {
                player.advance_or_stop();
            }
            assert!(player.auto_advance());
        } else {
            player.toggle_single_item(5);
        }
        assert_eq!(player.state(), PlaybackState::Playing(Slot::Item(5)));
        sink.clear();

        player.toggle_single_item(3);
        assert_eq!(player.state(), PlaybackState::Playing(Slot::Item(3)));
        assert!(!player.auto_advance());
        assert_eq!(sink.loads(), vec![audio_for(5)]);
    }
}

#[test]
fn test_double_sequential_toggle_from_stopped_pauses_at_start() {
    let index = sample_index();
    let (mut player, _) = controller(&index, BrowseTarget::Surah(2));
    player.toggle_sequential_play();
    player.toggle_sequential_play();
    assert_eq!(player.state(), PlaybackState::Paused(Slot::Intro));

    let (mut player, _) = controller(&index, BrowseTarget::Ruku(2));
    player.toggle_sequential_play();
    player.toggle_sequential_play();
    assert_eq!(player.state(), PlaybackState::Paused(Slot::Item(0)));
}

#[test]
fn test_auto_advance_stops_at_the_last_index() {
    let index = sample_index();
    let (mut player, sink) = controller(&index, BrowseTarget::Juz(2));
    let last = player.sequence().item_count() - 1;

    player.toggle_single_item(last);
    player.toggle_sequential_play();
    player.toggle_sequential_play();
    assert!(player.auto_advance());
    assert_eq!(player.state(), PlaybackState::Playing(Slot::Item(last)));

    sink.push_event(SinkEvent::Ended);
    player.pump_events();
    assert_eq!(player.state(), PlaybackState::Stopped);
}

#[test]
fn test_one_shot_always_stops() {
    let index = sample_index();
    let (mut player, _) = controller(&index, BrowseTarget::Surah(2));
    player.toggle_single_item(0);
    player.advance_or_stop();
    assert_eq!(player.state(), PlaybackState::Stopped);
}

#[test]
fn test_target_switch_stops_before_new_sequence_is_visible() {
    let index = Arc::new(sample_index());
    let mut projector = Projector::new(Arc::clone(&index));
    let sink = RecordingSink::default();
    let mut player = PlaybackController::new(sink.clone(), projector.project(BrowseTarget::Surah(2)));

    player.toggle_sequential_play();
    sink.push_event(SinkEvent::Ended);
    player.pump_events();
    assert!(player.is_playing());

    player.set_sequence(projector.project(BrowseTarget::Ruku(5)));
    assert_eq!(player.state(), PlaybackState::Stopped);
    assert_eq!(player.target(), BrowseTarget::Ruku(5));
    assert_eq!(sink.commands().last(), Some(&SinkCommand::Pause));

    // a late end notification from the old resource does nothing
    sink.push_event(SinkEvent::Ended);
    player.pump_events();
    assert_eq!(player.state(), PlaybackState::Stopped);
}

#[test]
fn test_sink_failure_returns_to_stopped() {
    let index = sample_index();
    let (mut player, sink) = controller(&index, BrowseTarget::Surah(3));
    player.toggle_sequential_play();
    sink.push_event(SinkEvent::Failed("no output device".into()));
    player.pump_events();
    assert_eq!(player.state(), PlaybackState::Stopped);
    assert_eq!(player.current(), None);
}
