//! Scripted `ZodiacApi` used by unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::{Notify, mpsc};

use crate::common::{
    ChatRequestPayload, ClientError, DailyTransit, DailyTransitRequest, Portrait, PortraitRequest,
    Result, StreamEvent,
};

use super::api::ZodiacApi;

#[derive(Default)]
pub struct ScriptedApi {
    /// `None` makes location resolution answer 404.
    pub location: Option<String>,
    /// Events replayed for every chat stream, in order.
    pub chat_script: Vec<StreamEvent>,
    /// `None` makes the daily transit endpoint answer 500.
    pub transit: Option<DailyTransit>,
    pub portrait: Option<serde_json::Value>,
    /// When set, the terminal chat event waits for one notification.
    pub hold_terminal: Option<Arc<Notify>>,
    pub(crate) calls: Mutex<Vec<String>>,
    pub(crate) chat_payloads: Mutex<Vec<ChatRequestPayload>>,
    pub(crate) transit_requests: Mutex<Vec<DailyTransitRequest>>,
}

impl ScriptedApi {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn chat_payloads(&self) -> Vec<ChatRequestPayload> {
        self.chat_payloads.lock().unwrap().clone()
    }

    pub fn transit_requests(&self) -> Vec<DailyTransitRequest> {
        self.transit_requests.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

#[async_trait]
impl ZodiacApi for ScriptedApi {
    async fn resolve_location(&self, city: &str) -> Result<String> {
        self.record(format!("resolve:{city}"));
        self.location.clone().ok_or(ClientError::Server {
            status: 404,
            body: "Location not found".into(),
        })
    }

    async fn stream_chat(&self, payload: ChatRequestPayload, sink: mpsc::Sender<StreamEvent>) {
        self.record("chat");
        self.chat_payloads.lock().unwrap().push(payload);
        for event in self.chat_script.clone() {
            let terminal = event.is_terminal();
            if terminal {
                if let Some(gate) = &self.hold_terminal {
                    gate.notified().await;
                }
            }
            // A closed sink is ignored, like a transport finishing unobserved.
            let _ = sink.send(event).await;
            if terminal {
                return;
            }
        }
    }

    async fn daily_transit(&self, request: &DailyTransitRequest) -> Result<DailyTransit> {
        self.record("transit");
        self.transit_requests.lock().unwrap().push(request.clone());
        self.transit.clone().ok_or(ClientError::Server {
            status: 500,
            body: "stars misaligned".into(),
        })
    }

    async fn portrait(&self, _request: &PortraitRequest) -> Result<(Portrait, serde_json::Value)> {
        self.record("portrait");
        let raw = self.portrait.clone().ok_or(ClientError::Server {
            status: 400,
            body: "Could not resolve coordinates".into(),
        })?;
        let portrait = serde_json::from_value(raw.clone())?;
        Ok((portrait, raw))
    }
}
