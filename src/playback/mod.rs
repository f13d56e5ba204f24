//! Playback controller: which verse is current, whether audio is running, and
//! whether the end of one verse starts the next.
//!
//! The controller is the single owner of the audio sink. Everything else
//! talks to it through the operations below and observes it through
//! [`PlaybackController::state`] and [`PlaybackController::take_index_change`].
//!
//! Transitions:
//!
//! - `toggle_sequential_play`: Playing -> Paused, Paused -> Playing (resume),
//!   Stopped -> Playing(start). Always enables auto-advance.
//! - `toggle_single_item(i)`: pause/resume when `i` is current, otherwise load
//!   `i`. Always disables auto-advance.
//! - `advance_or_stop`: on natural end while Playing, next slot when
//!   auto-advancing and one exists, Stopped otherwise. Ignored when Paused
//!   or Stopped.
//! - `stop`: Stopped from anywhere.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::projector::{BrowseTarget, DisplaySequence};


/// Position inside the current display sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Introductory recitation of the active chapter (whole-chapter mode only).
    Intro,
    /// Playback index into the verse-only projection.
    Item(usize),
}

impl Slot {
    /// The slot that follows this one in sequential playback.
    pub fn next(self) -> Slot {
        match self {
            Slot::Intro => Slot::Item(0),
            Slot::Item(index) => Slot::Item(index + 1),
        }
    }

    pub fn item_index(self) -> Option<usize> {
        match self {
            Slot::Intro => None,
            Slot::Item(index) => Some(index),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing(Slot),
    Paused(Slot),
}

impl PlaybackState {
    pub fn current(self) -> Option<Slot> {
        match self {
            PlaybackState::Stopped => None,
            PlaybackState::Playing(slot) | PlaybackState::Paused(slot) => Some(slot),
        }
    }

    pub fn is_playing(self) -> bool {
        matches!(self, PlaybackState::Playing(_))
    }
}

/// Notification delivered by the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    /// The active resource played to its natural end.
    Ended,
    /// The active resource could not be fetched, decoded, or played.
    Failed(String),
}

/// Commands the controller issues to the audio output. Loading a new resource
/// interrupts whatever was playing before.
pub trait AudioSink {
    fn load_and_play(&mut self, url: &str);
    fn pause(&mut self);
    fn resume(&mut self);
    /// Next pending notification for the active resource, if any.
    fn poll_event(&mut self) -> Option<SinkEvent>;
}

impl<S: AudioSink + ?Sized> AudioSink for Box<S> {
    fn load_and_play(&mut self, url: &str) {
        (**self).load_and_play(url);
    }

    fn pause(&mut self) {
        (**self).pause();
    }

    fn resume(&mut self) {
        (**self).resume();
    }

    fn poll_event(&mut self) -> Option<SinkEvent> {
        (**self).poll_event()
    }
}

pub struct PlaybackController<S: AudioSink> {
    sink: S,
    sequence: Arc<DisplaySequence>,
    state: PlaybackState,
    auto_advance: bool,
    index_change: Option<Slot>,
}

impl<S: AudioSink> PlaybackController<S> {
    pub fn new(sink: S, sequence: Arc<DisplaySequence>) -> Self {
        Self {
            sink,
            sequence,
            state: PlaybackState::Stopped,
            auto_advance: false,
            index_change: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn current(&self) -> Option<Slot> {
        self.state.current()
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    pub fn auto_advance(&self) -> bool {
        self.auto_advance
    }

    pub fn sequence(&self) -> &Arc<DisplaySequence> {
        &self.sequence
    }

    pub fn target(&self) -> BrowseTarget {
        self.sequence.target()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Replace the display sequence after a target or mode switch. Playback is
    /// stopped before the new sequence becomes visible.
    pub fn set_sequence(&mut self, sequence: Arc<DisplaySequence>) {
        self.stop();
        self.index_change = None;
        self.sequence = sequence;
    }

    /// Play/pause for the whole sequence with auto-advance.
    pub fn toggle_sequential_play(&mut self) {
        self.auto_advance = true;
        match self.state {
            PlaybackState::Playing(slot) => self.pause(slot),
            PlaybackState::Paused(slot) => self.resume(slot),
            PlaybackState::Stopped => {
                let start = if self.sequence.intro_audio().is_some() {
                    Slot::Intro
                } else {
                    Slot::Item(0)
                };
                self.play_slot(start);
            }
        }
    }

    /// Play/pause for one verse without auto-advance.
    pub fn toggle_single_item(&mut self, index: usize) {
        self.auto_advance = false;
        let slot = Slot::Item(index);
        match self.state {
            PlaybackState::Playing(current) if current == slot => self.pause(slot),
            PlaybackState::Paused(current) if current == slot => self.resume(slot),
            _ => self.play_slot(slot),
        }
    }

    /// Handle the natural end of the active resource. Only a playing slot can
    /// end; a pause or stop issued before the notification was drained wins.
    pub fn advance_or_stop(&mut self) {
        let PlaybackState::Playing(current) = self.state else {
            debug!(state = ?self.state, "ignoring end of resource outside playback");
            return;
        };
        if !self.auto_advance {
            self.stop();
            return;
        }
        let next = current.next();
        if self.resolve_source(next).is_some() {
            self.play_slot(next);
        } else {
            info!(?current, "reached end of sequence");
            self.stop();
        }
    }

    /// Pause the sink and forget the current slot, from any state.
    pub fn stop(&mut self) {
        self.sink.pause();
        if self.state != PlaybackState::Stopped {
            debug!(previous = ?self.state, "playback stopped");
        }
        self.state = PlaybackState::Stopped;
    }

    /// Audio resource for a slot in the current sequence.
    pub fn resolve_source(&self, slot: Slot) -> Option<&str> {
        match slot {
            Slot::Intro => self.sequence.intro_audio(),
            Slot::Item(index) => self
                .sequence
                .item(index)
                .map(|item| item.ayah.audio_url.as_str()),
        }
    }

    /// React to a sink notification. A failed load ends playback instead of
    /// leaving the state claiming audio that is not there.
    pub fn handle_sink_event(&mut self, event: SinkEvent) {
        match event {
            SinkEvent::Ended => self.advance_or_stop(),
            SinkEvent::Failed(message) => {
                warn!(state = ?self.state, %message, "audio playback failed");
                self.stop();
            }
        }
    }

    /// Drain pending sink notifications. Returns how many were handled.
    pub fn pump_events(&mut self) -> usize {
        let mut handled = 0;
        while let Some(event) = self.sink.poll_event() {
            self.handle_sink_event(event);
            handled += 1;
        }
        handled
    }

    /// Latest concrete slot the controller moved to since the last call.
    pub fn take_index_change(&mut self) -> Option<Slot> {
        self.index_change.take()
    }

    fn play_slot(&mut self, slot: Slot) {
        let Some(url) = self.resolve_source(slot).map(str::to_owned) else {
            debug!(?slot, "no audio resource for slot");
            self.stop();
            return;
        };
        self.sink.load_and_play(&url);
        self.state = PlaybackState::Playing(slot);
        self.index_change = Some(slot);
        debug!(?slot, %url, auto_advance = self.auto_advance, "playing");
    }

    fn pause(&mut self, slot: Slot) {
        self.sink.pause();
        self.state = PlaybackState::Paused(slot);
    }

    fn resume(&mut self, slot: Slot) {
        self.sink.resume();
        self.state = PlaybackState::Playing(slot);
    }
}
