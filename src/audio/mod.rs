//! Audio output backed by rodio.
//!
//! [`RodioSink`] is the production [`AudioSink`]: it forwards commands to a
//! dedicated `audio-player` thread and hands back notifications tagged with the
//! load they belong to.
//!
//! ```text
//! UI thread (RodioSink) --[AudioCommand]--> audio thread (download, decode, play)
//! UI thread             <--[AudioEvent]---- audio thread
//! ```

mod thread;

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::JoinHandle;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::playback::{AudioSink, SinkEvent};

/// Commands sent from the UI thread to the audio thread.
#[derive(Debug)]
pub(crate) enum AudioCommand {
    /// Fetch `url` and play it, replacing whatever is active.
    Load { url: String, generation: u64 },
    Pause,
    Resume,
    Shutdown,
}

/// Events sent back from the audio thread. The generation identifies the load
/// they refer to.
#[derive(Debug)]
pub(crate) enum AudioEvent {
    Ended { generation: u64 },
    Failed { generation: u64, message: String },
}

pub struct RodioSink {
    command_tx: Sender<AudioCommand>,
    event_rx: Receiver<AudioEvent>,
    generation: u64,
    pending: Option<SinkEvent>,
    thread_handle: Option<JoinHandle<()>>,
}

impl RodioSink {
    /// Spawn the audio thread. A missing output device is not an error here:
    /// the thread then reports every load as failed.
    pub fn spawn() -> Result<Self> {
        let (command_tx, command_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        let thread_handle = std::thread::Builder::new()
            .name("audio-player".to_string())
            .spawn(move || thread::audio_thread_main(command_rx, event_tx))
            .context("failed to spawn audio thread")?;

        Ok(Self {
            command_tx,
            event_rx,
            generation: 0,
            pending: None,
            thread_handle: Some(thread_handle),
        })
    }

    fn send(&mut self, command: AudioCommand) {
        if let Err(err) = self.command_tx.send(command) {
            warn!("audio thread is gone: {}", err);
            self.pending = Some(SinkEvent::Failed("audio thread stopped".to_string()));
        }
    }
}

impl AudioSink for RodioSink {
    fn load_and_play(&mut self, url: &str) {
        self.generation += 1;
        self.pending = None;
        let generation = self.generation;
        self.send(AudioCommand::Load {
            url: url.to_string(),
            generation,
        });
    }

    fn pause(&mut self) {
        self.send(AudioCommand::Pause);
    }

    fn resume(&mut self) {
        self.send(AudioCommand::Resume);
    }

    fn poll_event(&mut self) -> Option<SinkEvent> {
        if let Some(event) = self.pending.take() {
            return Some(event);
        }
        loop {
            match self.event_rx.try_recv() {
                Ok(AudioEvent::Ended { generation }) if generation == self.generation => {
                    return Some(SinkEvent::Ended);
                }
                Ok(AudioEvent::Failed {
                    generation,
                    message,
                }) if generation == self.generation => {
                    return Some(SinkEvent::Failed(message));
                }
                Ok(stale) => debug!(?stale, "dropping event from superseded load"),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return None,
            }
        }
    }
}

impl Drop for RodioSink {
    fn drop(&mut self) {
        let _ = self.command_tx.send(AudioCommand::Shutdown);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}
