//! Message dispatch: validate input, call the AI capability, record the reply.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::core::capability::{ChatReply, Readiness};
use crate::core::constants::{CHAT_ERROR_REPLY, NOT_READY_NOTICE, UNRECOGNIZED_REPLY};
use crate::core::conversation::Conversation;
use crate::core::message::{Message, MessageId, TranscriptRole};

/// Where the assistant message of a completed submit came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplySource {
    Text,
    Structured,
    /// The call succeeded but carried no usable text.
    Unrecognized,
    /// The call failed; a generic notice was recorded instead.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Input was empty after trimming.
    Ignored,
    /// No capability yet; a notice was appended and nothing was sent.
    NotReady(MessageId),
    /// Another submit is still in flight; nothing was appended or sent.
    Rejected,
    /// The widget was torn down before the reply arrived.
    Discarded { user: MessageId },
    Completed {
        user: MessageId,
        assistant: MessageId,
        reply: ReplySource,
    },
}

/// Shared busy indicator. True from the moment a submit is accepted until
/// its reply has been recorded or dropped.
#[derive(Debug, Clone, Default)]
struct BusyFlag(Arc<AtomicBool>);

impl BusyFlag {
    fn is_busy(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn try_acquire(&self) -> Option<BusyGuard> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard(self.clone()))
    }
}

/// Proof that the caller holds the dispatcher's single in-flight slot.
///
/// Clears the busy flag when dropped, whichever way the dispatch ends.
#[derive(Debug)]
pub struct BusyGuard(BusyFlag);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0 .0.store(false, Ordering::Release);
    }
}

/// Sends user messages to the AI capability and records the exchange.
///
/// Clones share the same conversation, busy flag and teardown token, so a
/// clone can be moved into a spawned task while the owner keeps rendering.
#[derive(Clone)]
pub struct Dispatcher {
    conversation: Arc<Mutex<Conversation>>,
    readiness: Readiness,
    busy: BusyFlag,
    teardown: CancellationToken,
}

impl Dispatcher {
    pub fn new(readiness: Readiness) -> Self {
        Self {
            conversation: Arc::new(Mutex::new(Conversation::new())),
            readiness,
            busy: BusyFlag::default(),
            teardown: CancellationToken::new(),
        }
    }

    pub fn readiness(&self) -> &Readiness {
        &self.readiness
    }

    pub fn is_ready(&self) -> bool {
        self.readiness.is_ready()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    /// Claims the in-flight slot ahead of a submit. Returns `None` while
    /// another submit holds it.
    pub fn try_begin(&self) -> Option<BusyGuard> {
        self.busy.try_acquire()
    }

    pub async fn messages(&self) -> Vec<Message> {
        self.conversation.lock().await.messages().to_vec()
    }

    pub async fn message_count(&self) -> usize {
        self.conversation.lock().await.len()
    }

    /// Marks the widget as gone. Replies that arrive afterwards are dropped.
    pub fn teardown(&self) {
        self.teardown.cancel();
    }

    pub fn is_torn_down(&self) -> bool {
        self.teardown.is_cancelled()
    }

    pub async fn submit(&self, raw_text: &str) -> SubmitOutcome {
        self.dispatch(raw_text, None).await
    }

    /// Like [`Dispatcher::submit`], using a slot already claimed with
    /// [`Dispatcher::try_begin`].
    pub async fn submit_claimed(&self, guard: BusyGuard, raw_text: &str) -> SubmitOutcome {
        self.dispatch(raw_text, Some(guard)).await
    }

    async fn dispatch(&self, raw_text: &str, claimed: Option<BusyGuard>) -> SubmitOutcome {
        let text = raw_text.trim();
        if text.is_empty() {
            return SubmitOutcome::Ignored;
        }

        let Some(client) = self.readiness.client() else {
            let id = self
                .conversation
                .lock()
                .await
                .append(TranscriptRole::AppInfo, NOT_READY_NOTICE);
            return SubmitOutcome::NotReady(id);
        };

        let Some(_busy) = claimed.or_else(|| self.busy.try_acquire()) else {
            debug!("submit rejected: a reply is still pending");
            return SubmitOutcome::Rejected;
        };

        let user = self
            .conversation
            .lock()
            .await
            .append(TranscriptRole::User, text);

        let (reply_text, reply) = match client.chat(text).await {
            Ok(response) => match response.text() {
                Some(content) => {
                    let source = if matches!(response, ChatReply::Text(_)) {
                        ReplySource::Text
                    } else {
                        ReplySource::Structured
                    };
                    (content.to_string(), source)
                }
                None => (UNRECOGNIZED_REPLY.to_string(), ReplySource::Unrecognized),
            },
            Err(err) => {
                error!(error = %err, "error during AI chat");
                (CHAT_ERROR_REPLY.to_string(), ReplySource::Failed)
            }
        };

        if self.teardown.is_cancelled() {
            debug!(?reply, "widget torn down; reply discarded");
            return SubmitOutcome::Discarded { user };
        }

        let assistant = self
            .conversation
            .lock()
            .await
            .append(TranscriptRole::Assistant, reply_text);

        SubmitOutcome::Completed {
            user,
            assistant,
            reply,
        }
    }
}
