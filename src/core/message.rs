use chrono::{DateTime, TimeZone, Utc};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TranscriptRole {
    User,
    Assistant,
    /// Locally generated notice that is neither user input nor a reply.
    AppInfo,
}

impl TranscriptRole {
    pub fn as_str(self) -> &'static str {
        match self {
            TranscriptRole::User => "user",
            TranscriptRole::Assistant => "assistant",
            TranscriptRole::AppInfo => "app/info",
        }
    }

    pub fn is_user(self) -> bool {
        self == TranscriptRole::User
    }

    pub fn is_assistant(self) -> bool {
        self == TranscriptRole::Assistant
    }

    /// Label shown next to messages of this role.
    pub fn display_name(self) -> &'static str {
        match self {
            TranscriptRole::User => "You",
            TranscriptRole::Assistant | TranscriptRole::AppInfo => "NEXUS AI",
        }
    }
}

/// Session-unique message identifier.
///
/// Ids compare by their sequence number, which follows insertion order. The
/// creation timestamp rides along for display and transcript output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId {
    seq: u64,
    created_ms: i64,
}

impl MessageId {
    pub(crate) fn new(seq: u64, created_ms: i64) -> Self {
        Self { seq, created_ms }
    }

    pub fn created_at(self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.created_ms)
            .single()
            .unwrap_or_default()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.created_ms, self.seq)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub role: TranscriptRole,
    pub content: String,
}

impl Message {
    pub fn new(id: MessageId, role: TranscriptRole, content: impl Into<String>) -> Self {
        Self {
            id,
            role,
            content: content.into(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.role.is_user()
    }

    pub fn is_assistant(&self) -> bool {
        self.role.is_assistant()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_user_role_is_user() {
        assert!(TranscriptRole::User.is_user());
        assert!(!TranscriptRole::Assistant.is_user());
        assert!(!TranscriptRole::AppInfo.is_user());
    }

    #[test]
    fn ids_order_by_sequence_even_when_clock_goes_backwards() {
        let first = MessageId::new(1, 2_000);
        let second = MessageId::new(2, 1_000);
        assert!(first < second);
        assert_ne!(first, second);
    }

    #[test]
    fn id_display_includes_timestamp_and_sequence() {
        let id = MessageId::new(7, 1_700_000_000_000);
        assert_eq!(id.to_string(), "1700000000000-7");
        assert_eq!(id.created_at().timestamp_millis(), 1_700_000_000_000);
    }
}
