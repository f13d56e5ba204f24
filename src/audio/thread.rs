//! Audio thread implementation.
//!
//! The thread owns the output stream and at most one active rodio sink. It may
//! block while downloading a resource; the UI thread never waits on it.

use std::io::Cursor;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use reqwest::blocking::Client;
use rodio::mixer::Mixer;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink};

use super::{AudioCommand, AudioEvent};

/// How often the thread checks whether the active sink ran dry.
const END_POLL_INTERVAL: Duration = Duration::from_millis(100);
/// Upper bound for fetching one verse recording.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

struct ActiveTrack {
    sink: Sink,
    generation: u64,
}

pub(super) fn audio_thread_main(command_rx: Receiver<AudioCommand>, event_tx: Sender<AudioEvent>) {
    tracing::info!("Audio thread started");

    let stream: Option<OutputStream> = match OutputStreamBuilder::open_default_stream() {
        Ok(mut stream) => {
            // rodio prints to stderr on drop, which would land on the TUI
            stream.log_on_drop(false);
            Some(stream)
        }
        Err(e) => {
            tracing::warn!("No audio output available: {}", e);
            None
        }
    };
    let client = match Client::builder().timeout(DOWNLOAD_TIMEOUT).build() {
        Ok(client) => Some(client),
        Err(e) => {
            tracing::error!("Failed to build HTTP client: {}", e);
            None
        }
    };

    let mut active: Option<ActiveTrack> = None;

    loop {
        match command_rx.recv_timeout(END_POLL_INTERVAL) {
            Ok(AudioCommand::Load { url, generation }) => {
                if let Some(previous) = active.take() {
                    previous.sink.stop();
                }
                let loaded = match (&stream, &client) {
                    (Some(stream), Some(client)) => load_track(client, stream.mixer(), &url),
                    (None, _) => Err("no audio output device".to_string()),
                    (_, None) => Err("HTTP client unavailable".to_string()),
                };
                match loaded {
                    Ok(sink) => {
                        tracing::debug!(generation, %url, "track started");
                        active = Some(ActiveTrack { sink, generation });
                    }
                    Err(message) => {
                        tracing::warn!(generation, %url, "failed to load track: {}", message);
                        let _ = event_tx.send(AudioEvent::Failed {
                            generation,
                            message,
                        });
                    }
                }
            }
            Ok(AudioCommand::Pause) => {
                if let Some(track) = &active {
                    track.sink.pause();
                }
            }
            Ok(AudioCommand::Resume) => {
                if let Some(track) = &active {
                    track.sink.play();
                }
            }
            Ok(AudioCommand::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {}
        }

        let finished = active
            .as_ref()
            .filter(|track| track.sink.empty())
            .map(|track| track.generation);
        if let Some(generation) = finished {
            active = None;
            if event_tx.send(AudioEvent::Ended { generation }).is_err() {
                break;
            }
        }
    }

    if let Some(track) = active.take() {
        track.sink.stop();
    }
    tracing::info!("Audio thread stopped");
}

fn load_track(client: &Client, mixer: &Mixer, url: &str) -> Result<Sink, String> {
    let response = client
        .get(url)
        .send()
        .and_then(|response| response.error_for_status())
        .map_err(|e| format!("download failed: {}", e))?;
    let bytes = response
        .bytes()
        .map_err(|e| format!("download interrupted: {}", e))?;
    let source = Decoder::new(Cursor::new(bytes.to_vec()))
        .map_err(|e| format!("failed to decode audio: {}", e))?;

    let sink = Sink::connect_new(mixer);
    sink.append(source);
    Ok(sink)
}
