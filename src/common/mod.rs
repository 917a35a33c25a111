pub mod error;
pub mod events;
pub mod types;

pub use error::{ClientError, Result};
pub use events::{SessionUpdate, StreamEvent};
pub use types::{
    CachedDailyInsight, ChatMessage, ChatRequestPayload, DailyTransit, DailyTransitRequest,
    HistoryEntry, LocationResponse, Portrait, PortraitRequest, Role,
};
