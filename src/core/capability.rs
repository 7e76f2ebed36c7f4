//! The external AI chat capability and its registration slot.
//!
//! The widget never reaches into ambient state to find a backend. The host
//! installs an [`AiClient`] into a [`CapabilitySlot`] once it is available,
//! and everything that needs the backend observes that slot through a
//! [`Readiness`] handle.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::watch;

/// Result of a successful chat call.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatReply {
    Text(String),
    /// Structured payload; the reply text is read from `message.content`.
    Structured(Value),
}

impl From<Value> for ChatReply {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => ChatReply::Text(text),
            other => ChatReply::Structured(other),
        }
    }
}

impl From<String> for ChatReply {
    fn from(value: String) -> Self {
        ChatReply::Text(value)
    }
}

impl From<&str> for ChatReply {
    fn from(value: &str) -> Self {
        ChatReply::Text(value.to_string())
    }
}

impl ChatReply {
    /// Text carried by the reply, if any.
    ///
    /// Plain text is returned as-is. Structured replies must carry a
    /// non-empty string at `message.content`.
    pub fn text(&self) -> Option<&str> {
        match self {
            ChatReply::Text(text) => Some(text),
            ChatReply::Structured(value) => value
                .pointer("/message/content")
                .and_then(Value::as_str)
                .filter(|content| !content.is_empty()),
        }
    }
}

/// Failure signalled by the chat backend.
#[derive(Debug)]
pub enum ChatError {
    /// The request never produced a response.
    Transport(String),

    /// The backend answered with a non-success status.
    Status {
        status: u16,
        /// Short description extracted from the error body.
        summary: String,
    },

    /// The response body could not be decoded.
    Decode(String),
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatError::Transport(reason) => write!(f, "request failed: {reason}"),
            ChatError::Status { status, summary } => {
                write!(f, "backend returned HTTP {status}: {summary}")
            }
            ChatError::Decode(reason) => write!(f, "could not decode response: {reason}"),
        }
    }
}

impl StdError for ChatError {}

/// The single operation the widget needs from its backend.
#[async_trait]
pub trait AiClient: Send + Sync {
    async fn chat(&self, message: &str) -> Result<ChatReply, ChatError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityError {
    /// A client was already registered; the slot only accepts one.
    AlreadyInstalled,
}

impl fmt::Display for CapabilityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CapabilityError::AlreadyInstalled => {
                f.write_str("an AI client is already installed for this widget")
            }
        }
    }
}

impl StdError for CapabilityError {}

type SharedClient = Option<Arc<dyn AiClient>>;

/// Write side of the capability registration.
///
/// Starts empty and accepts exactly one client.
pub struct CapabilitySlot {
    tx: watch::Sender<SharedClient>,
}

impl Default for CapabilitySlot {
    fn default() -> Self {
        Self::new()
    }
}

impl CapabilitySlot {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// Slot that is ready from the start.
    pub fn with_client(client: Arc<dyn AiClient>) -> Self {
        let (tx, _rx) = watch::channel(Some(client));
        Self { tx }
    }

    pub fn install(&self, client: Arc<dyn AiClient>) -> Result<(), CapabilityError> {
        let mut pending = Some(client);
        let installed = self.tx.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            *current = pending.take();
            true
        });

        if installed {
            tracing::info!("AI capability installed");
            Ok(())
        } else {
            Err(CapabilityError::AlreadyInstalled)
        }
    }

    pub fn is_installed(&self) -> bool {
        self.tx.borrow().is_some()
    }

    pub fn readiness(&self) -> Readiness {
        Readiness {
            rx: self.tx.subscribe(),
        }
    }
}

/// Read side of the capability registration.
///
/// Once `is_ready` reports true it never reports false again.
#[derive(Clone)]
pub struct Readiness {
    rx: watch::Receiver<SharedClient>,
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        self.rx.borrow().is_some()
    }

    pub fn client(&self) -> Option<Arc<dyn AiClient>> {
        self.rx.borrow().clone()
    }

    /// Resolves once a client is installed. Returns `None` when the slot is
    /// dropped without ever being filled.
    pub async fn wait(&mut self) -> Option<Arc<dyn AiClient>> {
        match self.rx.wait_for(Option::is_some).await {
            Ok(client) => client.clone(),
            Err(_) => None,
        }
    }
}

impl fmt::Debug for Readiness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Readiness")
            .field("ready", &self.is_ready())
            .finish()
    }
}
