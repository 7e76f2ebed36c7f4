//! Shared constants used across the application

/// Appended instead of sending when no AI capability is registered yet.
pub const NOT_READY_NOTICE: &str = "AI is not ready yet, please wait...";

/// Assistant reply recorded when a call succeeds without usable text.
pub const UNRECOGNIZED_REPLY: &str = "Sorry, I didn't understand that.";

/// Assistant reply recorded when the call fails.
pub const CHAT_ERROR_REPLY: &str = "An error occurred while chatting with AI.";

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default readiness probe period in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 300;
