use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One transcript entry. Only the newest assistant entry is mutated, while
/// its stream is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
}

/// Body of `POST /api/v1/chat/stream`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequestPayload {
    pub message: String,
    pub birth_datetime: String,
    pub birth_coordinates: String,
    pub transit_datetime: String,
    pub history: Vec<HistoryEntry>,
}

/// Daily transit document as produced by the current backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTransit {
    pub headline: String,
    pub mood_word: String,
    pub the_tension: String,
    pub the_shift: String,
    pub pro_tip: String,
}

impl DailyTransit {
    /// Fields a stored document must carry to be accepted by this build.
    pub const REQUIRED_FIELDS: [&'static str; 5] =
        ["headline", "mood_word", "the_tension", "the_shift", "pro_tip"];
}

/// Persisted form of the daily insight slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedDailyInsight {
    /// Local calendar day, `YYYY-MM-DD`.
    pub date: String,
    pub data: DailyTransit,
}

/// Body of `POST /api/v1/divination/zodiac/daily-transit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTransitRequest {
    pub birth_datetime: String,
    pub birth_city: String,
    pub transit_datetime: String,
    pub current_city: String,
    pub ai_portrait: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortraitRequest {
    pub city: String,
    pub datetime: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortraitSection {
    pub summary: String,
    pub content: String,
}

/// Birth portrait returned by the backend and kept in `user_portrait`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Portrait {
    pub core_identity: PortraitSection,
    pub psychological_dynamics: PortraitSection,
    pub drive_career_values: PortraitSection,
    pub growth_pathway: PortraitSection,
}

impl Portrait {
    pub fn sections(&self) -> [(&'static str, &PortraitSection); 4] {
        [
            ("Core Identity", &self.core_identity),
            ("Psychological Dynamics", &self.psychological_dynamics),
            ("Drive, Career & Values", &self.drive_career_values),
            ("Growth Pathway", &self.growth_pathway),
        ]
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocationResponse {
    pub coordinates: String,
}
