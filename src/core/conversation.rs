//! Append-only conversation store.

use chrono::Utc;

use crate::core::message::{Message, MessageId, TranscriptRole};

/// Ordered message history for one widget instance.
///
/// Messages are only ever appended. There is no way to edit, remove or clear
/// an entry; the history lives as long as the widget does.
#[derive(Debug, Default)]
pub struct Conversation {
    messages: Vec<Message>,
    next_seq: u64,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, role: TranscriptRole, content: impl Into<String>) -> MessageId {
        self.next_seq += 1;
        let id = MessageId::new(self.next_seq, Utc::now().timestamp_millis());
        self.messages.push(Message::new(id, role, content));
        id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|message| message.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_preserve_insertion_order() {
        let mut conversation = Conversation::new();
        conversation.append(TranscriptRole::User, "first");
        conversation.append(TranscriptRole::Assistant, "second");
        conversation.append(TranscriptRole::AppInfo, "third");

        let contents: Vec<_> = conversation
            .messages()
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(contents, ["first", "second", "third"]);
        assert_eq!(conversation.last().map(|m| m.role), Some(TranscriptRole::AppInfo));
    }

    #[test]
    fn ids_are_unique_and_increasing() {
        let mut conversation = Conversation::new();
        let ids: Vec<_> = (0..50)
            .map(|i| conversation.append(TranscriptRole::User, format!("m{i}")))
            .collect();

        for pair in ids.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        let mut deduped = ids.clone();
        deduped.dedup();
        assert_eq!(deduped.len(), ids.len());
    }

    #[test]
    fn get_finds_messages_by_id() {
        let mut conversation = Conversation::new();
        let id = conversation.append(TranscriptRole::User, "hello");
        assert_eq!(conversation.get(id).map(|m| m.content.as_str()), Some("hello"));
        assert!(!conversation.is_empty());
        assert_eq!(conversation.len(), 1);
    }
}
