use crate::common::{ChatMessage, HistoryEntry, Role};

pub const GREETING_ID: &str = "greeting";
pub const GREETING: &str = "Hello! I am your celestial guide. Ask me anything about your stars, your daily vibe, or your birth chart.";

/// Ordered chat entries for the current session, starting with the greeting.
#[derive(Debug, Clone)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn new() -> Self {
        Self {
            messages: vec![greeting()],
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    #[cfg(test)]
    pub fn get(&self, id: &str) -> Option<&ChatMessage> {
        self.messages.iter().find(|message| message.id == id)
    }

    /// Append an entry and return its id.
    pub fn push(&mut self, message: ChatMessage) -> String {
        let id = message.id.clone();
        self.messages.push(message);
        id
    }

    /// Append text to an existing entry. Returns `false` if `id` is gone.
    pub fn append_to(&mut self, id: &str, text: &str) -> bool {
        match self.find_mut(id) {
            Some(message) => {
                message.content.push_str(text);
                true
            }
            None => false,
        }
    }

    pub fn replace_content(&mut self, id: &str, content: String) -> bool {
        match self.find_mut(id) {
            Some(message) => {
                message.content = content;
                true
            }
            None => false,
        }
    }

    /// Prior turns to send with a request: no greeting, no empty placeholders.
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.messages
            .iter()
            .filter(|message| message.id != GREETING_ID)
            .filter(|message| !(message.role == Role::Assistant && message.content.is_empty()))
            .map(|message| HistoryEntry {
                role: message.role,
                content: message.content.clone(),
            })
            .collect()
    }

    pub fn reset(&mut self) {
        self.messages.clear();
        self.messages.push(greeting());
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut ChatMessage> {
        // The streaming entry is nearly always last.
        self.messages.iter_mut().rev().find(|message| message.id == id)
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

fn greeting() -> ChatMessage {
    ChatMessage {
        id: GREETING_ID.to_string(),
        role: Role::Assistant,
        content: GREETING.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_greeting_only() {
        let transcript = Transcript::new();
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.messages()[0].id, GREETING_ID);
        assert!(transcript.history().is_empty());
    }

    #[test]
    fn history_skips_greeting_and_placeholders() {
        let mut transcript = Transcript::new();
        transcript.push(ChatMessage::user("Who am I?"));
        transcript.push(ChatMessage::assistant("A Taurus."));
        transcript.push(ChatMessage::assistant(""));

        let history = transcript.history();
        assert_eq!(
            history,
            vec![
                HistoryEntry {
                    role: Role::User,
                    content: "Who am I?".into()
                },
                HistoryEntry {
                    role: Role::Assistant,
                    content: "A Taurus.".into()
                },
            ]
        );
    }

    #[test]
    fn append_to_unknown_entry_is_rejected() {
        let mut transcript = Transcript::new();
        let id = transcript.push(ChatMessage::assistant(""));
        assert!(transcript.append_to(&id, "Venus"));
        assert!(transcript.append_to(&id, " smiles"));
        assert_eq!(transcript.get(&id).unwrap().content, "Venus smiles");

        transcript.reset();
        assert!(!transcript.append_to(&id, "late"));
        assert_eq!(transcript.len(), 1);
    }
}
