use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::common::{
    ChatRequestPayload, DailyTransit, DailyTransitRequest, Portrait, PortraitRequest, Result,
    StreamEvent,
};

/// Remote operations the client depends on.
#[async_trait]
pub trait ZodiacApi: Send + Sync {
    /// `GET /api/v1/location/resolve?city=<name>`; the coordinate string is
    /// returned verbatim.
    async fn resolve_location(&self, city: &str) -> Result<String>;

    /// `POST /api/v1/chat/stream`. Pushes body chunks into `sink` as they
    /// arrive and finishes with exactly one terminal event. A closed sink
    /// ends the delivery early.
    async fn stream_chat(&self, payload: ChatRequestPayload, sink: mpsc::Sender<StreamEvent>);

    /// `POST /api/v1/divination/zodiac/daily-transit`.
    async fn daily_transit(&self, request: &DailyTransitRequest) -> Result<DailyTransit>;

    /// `POST /api/v1/divination/zodiac/portrait`. Returns the typed portrait
    /// alongside the raw document for storage.
    async fn portrait(&self, request: &PortraitRequest) -> Result<(Portrait, serde_json::Value)>;
}
