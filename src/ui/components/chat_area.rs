use crate::common::{ChatMessage, Role, SessionUpdate};

pub fn render_message(message: &ChatMessage) -> String {
    let speaker = match message.role {
        Role::User => "you",
        Role::Assistant => "guide",
    };
    format!("{speaker}: {}", message.content)
}

/// Text to print for one streaming update.
pub fn render_update(update: &SessionUpdate) -> String {
    match update {
        SessionUpdate::Delta(text) => text.clone(),
        SessionUpdate::Completed { .. } => "\n".to_string(),
        SessionUpdate::ServerFailed { message, .. } => format!("{message}\n"),
        SessionUpdate::ConnectionLost { marker } => format!("{marker}\n"),
        SessionUpdate::Discarded => String::new(),
    }
}
