use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use tokio::sync::mpsc::{self, error::TryRecvError};

use crate::common::{
    ChatMessage, ChatRequestPayload, ClientError, Result, SessionUpdate, StreamEvent,
};
use crate::network::ZodiacApi;
use crate::storage::ProfileStore;

use super::decoder::Utf8Assembler;
use super::transcript::Transcript;

const STREAM_BUFFER: usize = 64;
pub const CONNECTION_ERROR_MARKER: &str = "\n[Connection Error]";
const NO_BIRTH_PROFILE: &str = "Please set up your birth profile first.";
const NO_COORDINATES: &str =
    "Could not resolve your birth location coordinates. Please update your profile.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Submitting,
    Streaming,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank prompt or a turn already in flight; nothing changed.
    Ignored,
    /// The request is out and the placeholder entry is waiting for text.
    Streaming,
}

/// The turn whose stream is currently filling a placeholder entry.
struct ActiveTurn {
    message_id: String,
    events: mpsc::Receiver<StreamEvent>,
    decoder: Utf8Assembler,
    deferred: Option<StreamEvent>,
    /// Set by `reset`: the stream runs to its end but no longer has an entry.
    detached: bool,
}

/// Drives chat turns against the streaming endpoint and keeps the transcript.
pub struct ChatSession {
    api: Arc<dyn ZodiacApi>,
    transcript: Transcript,
    state: SessionState,
    active: Option<ActiveTurn>,
}

impl ChatSession {
    pub fn new(api: Arc<dyn ZodiacApi>) -> Self {
        Self {
            api,
            transcript: Transcript::new(),
            state: SessionState::Idle,
            active: None,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Start a turn. Precondition failures are written to the transcript as
    /// an assistant entry and returned as `MissingProfile`; no chat request
    /// is made in that case.
    pub async fn submit(&mut self, prompt: &str, profile: &ProfileStore) -> Result<SubmitOutcome> {
        let prompt = prompt.trim();
        self.settle_detached();
        if prompt.is_empty() || self.state != SessionState::Idle {
            return Ok(SubmitOutcome::Ignored);
        }

        self.state = SessionState::Submitting;
        let history = self.transcript.history();
        self.transcript.push(ChatMessage::user(prompt));

        let (birth_datetime, birth_coordinates) = match self.resolve_context(profile).await {
            Ok(context) => context,
            Err(err) => {
                log::warn!("Chat turn rejected before sending: {err}");
                self.transcript
                    .push(ChatMessage::assistant(format!("Error: {err}")));
                self.state = SessionState::Idle;
                return Err(err);
            }
        };

        let payload = ChatRequestPayload {
            message: prompt.to_string(),
            birth_datetime,
            birth_coordinates,
            transit_datetime: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            history,
        };

        let message_id = self.transcript.push(ChatMessage::assistant(""));
        let (sink, events) = mpsc::channel(STREAM_BUFFER);
        let api = Arc::clone(&self.api);
        tokio::spawn(async move {
            api.stream_chat(payload, sink).await;
        });

        log::debug!("Chat turn {message_id} streaming");
        self.active = Some(ActiveTurn {
            message_id,
            events,
            decoder: Utf8Assembler::new(),
            deferred: None,
            detached: false,
        });
        self.state = SessionState::Streaming;
        Ok(SubmitOutcome::Streaming)
    }

    /// Wait for the next change to the streaming entry. Returns `None` when
    /// no turn is in flight. A turn detached by `reset` yields only
    /// `Discarded`, once its stream has ended.
    pub async fn next_update(&mut self) -> Option<SessionUpdate> {
        loop {
            let turn = self.active.as_mut()?;
            let event = match turn.deferred.take() {
                Some(event) => event,
                None => turn.events.recv().await.unwrap_or_else(|| {
                    StreamEvent::TransportFailed("stream closed without a terminal event".into())
                }),
            };

            if turn.detached {
                if !event.is_terminal() {
                    continue;
                }
                log::debug!("Detached chat turn {} finished", turn.message_id);
                self.active = None;
                self.state = SessionState::Idle;
                return Some(SessionUpdate::Discarded);
            }

            let outcome = match &event {
                StreamEvent::Chunk(bytes) => {
                    let delta = turn.decoder.push(bytes);
                    if delta.is_empty() {
                        continue;
                    }
                    self.transcript.append_to(&turn.message_id, &delta);
                    return Some(SessionUpdate::Delta(delta));
                }
                StreamEvent::Finished { status } => Ok(*status),
                StreamEvent::TransportFailed(reason) => Err(reason.clone()),
            };

            let tail = turn.decoder.finish();
            if !tail.is_empty() {
                self.transcript.append_to(&turn.message_id, &tail);
                turn.deferred = Some(event);
                return Some(SessionUpdate::Delta(tail));
            }

            let turn = self.active.take()?;
            return Some(self.finish_turn(turn, outcome));
        }
    }

    /// Consume updates until the in-flight turn, if any, has ended.
    #[cfg(test)]
    pub async fn wait_idle(&mut self) {
        while self.next_update().await.is_some() {}
    }

    /// Back to the greeting. A turn still streaming cannot be aborted: it
    /// keeps the session busy until its stream ends, but its output no
    /// longer reaches the transcript.
    pub fn reset(&mut self) {
        if let Some(turn) = self.active.as_mut() {
            log::info!("Detaching chat turn {} on reset", turn.message_id);
            turn.detached = true;
        }
        self.transcript.reset();
    }

    /// Consume whatever a detached turn has already delivered, going Idle if
    /// its stream has ended.
    fn settle_detached(&mut self) {
        let Some(turn) = self.active.as_mut().filter(|turn| turn.detached) else {
            return;
        };
        if turn.deferred.take().is_none() {
            loop {
                match turn.events.try_recv() {
                    Ok(event) if event.is_terminal() => break,
                    Ok(_) => continue,
                    Err(TryRecvError::Empty) => return,
                    Err(TryRecvError::Disconnected) => break,
                }
            }
        }
        log::debug!("Detached chat turn {} finished", turn.message_id);
        self.active = None;
        self.state = SessionState::Idle;
    }

    async fn resolve_context(&self, profile: &ProfileStore) -> Result<(String, String)> {
        let stored = profile.load().unwrap_or_else(|err| {
            log::error!("Failed to read stored profile: {err}");
            Default::default()
        });

        let birth_datetime = stored
            .birth_datetime
            .ok_or_else(|| ClientError::MissingProfile(NO_BIRTH_PROFILE.into()))?;

        let mut coordinates = stored.coordinates;
        if coordinates.is_none() {
            if let Some(city) = stored.city.as_deref() {
                coordinates = self.lazy_resolve(city, profile).await;
            }
        }

        let coordinates =
            coordinates.ok_or_else(|| ClientError::MissingProfile(NO_COORDINATES.into()))?;
        Ok((birth_datetime, coordinates))
    }

    async fn lazy_resolve(&self, city: &str, profile: &ProfileStore) -> Option<String> {
        match self.api.resolve_location(city).await {
            Ok(coordinates) if !coordinates.trim().is_empty() => {
                if let Err(err) = profile.save_coordinates(&coordinates) {
                    log::warn!("Failed to persist resolved coordinates: {err}");
                }
                Some(coordinates)
            }
            Ok(_) => {
                log::warn!("Location service returned no coordinates for {city}");
                None
            }
            Err(err) => {
                log::error!("Failed to lazy-resolve coordinates for {city}: {err}");
                None
            }
        }
    }

    fn finish_turn(
        &mut self,
        turn: ActiveTurn,
        outcome: std::result::Result<u16, String>,
    ) -> SessionUpdate {
        self.state = SessionState::Idle;
        let received = turn.decoder.bytes_received();

        match outcome {
            Ok(status) if status == 200 => {
                log::info!("Chat turn {} completed ({received} bytes)", turn.message_id);
                SessionUpdate::Completed { status }
            }
            Ok(status) if received == 0 => {
                let message = format!("Error: Server returned {status}");
                self.transcript
                    .replace_content(&turn.message_id, message.clone());
                log::warn!("Chat turn {} failed with status {status}", turn.message_id);
                SessionUpdate::ServerFailed { status, message }
            }
            Ok(status) => {
                log::warn!(
                    "Chat turn {} ended with status {status} after {received} bytes; keeping partial reply",
                    turn.message_id
                );
                SessionUpdate::Completed { status }
            }
            Err(reason) => {
                log::error!("Chat turn {} lost its connection: {reason}", turn.message_id);
                self.transcript
                    .append_to(&turn.message_id, CONNECTION_ERROR_MARKER);
                SessionUpdate::ConnectionLost {
                    marker: CONNECTION_ERROR_MARKER.to_string(),
                }
            }
        }
    }
}
