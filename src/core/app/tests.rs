use super::*;
use crate::core::capability::{AiClient, CapabilitySlot, ChatError, ChatReply};
use crate::core::dispatcher::ReplySource;
use async_trait::async_trait;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

struct FixedClient(&'static str);

#[async_trait]
impl AiClient for FixedClient {
    async fn chat(&self, _message: &str) -> Result<ChatReply, ChatError> {
        Ok(ChatReply::from(self.0))
    }
}

fn app_with(slot: &CapabilitySlot) -> App {
    let logging = LoggingState::new(None).expect("logging");
    App::new(Dispatcher::new(slot.readiness()), "test-model", logging)
}

fn type_text(app: &mut App, text: &str) {
    for ch in text.chars() {
        app.handle_input(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE));
    }
}

#[test]
fn input_is_disabled_until_ready() {
    let slot = CapabilitySlot::new();
    let mut app = app_with(&slot);

    type_text(&mut app, "hi");
    assert_eq!(app.input_text(), "");
    assert!(!app.input_enabled());
    assert!(!app.can_send());

    slot.install(Arc::new(FixedClient("ok"))).expect("install");
    type_text(&mut app, "hi");
    assert_eq!(app.input_text(), "hi");
    assert!(app.can_send());
}

#[test]
fn whitespace_input_cannot_be_sent() {
    let slot = CapabilitySlot::with_client(Arc::new(FixedClient("ok")));
    let mut app = app_with(&slot);

    type_text(&mut app, "   ");
    assert!(app.input_enabled());
    assert!(!app.can_send());
    assert_eq!(app.take_submission(), None);
    assert_eq!(app.input_text(), "   ");
}

#[test]
fn newline_is_inserted_without_submitting() {
    let slot = CapabilitySlot::with_client(Arc::new(FixedClient("ok")));
    let mut app = app_with(&slot);

    type_text(&mut app, "line one");
    app.insert_newline();
    type_text(&mut app, "line two");

    assert_eq!(app.input_text(), "line one\nline two");
}

#[tokio::test]
async fn submission_clears_input_and_records_exchange() {
    let slot = CapabilitySlot::with_client(Arc::new(FixedClient("Hi there!")));
    let mut app = app_with(&slot);
    type_text(&mut app, "Hello");

    let notified = Arc::new(AtomicBool::new(false));
    let flag = notified.clone();
    let handle = app
        .spawn_submission(move || flag.store(true, Ordering::SeqCst))
        .expect("submission spawned");
    assert_eq!(app.input_text(), "");

    let outcome = handle.await.expect("join");
    assert!(matches!(
        outcome,
        SubmitOutcome::Completed {
            reply: ReplySource::Text,
            ..
        }
    ));
    assert!(notified.load(Ordering::SeqCst));

    let messages = app.dispatcher().messages().await;
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].content, "Hello");
    assert_eq!(messages[1].content, "Hi there!");
}

#[tokio::test]
async fn new_messages_restore_auto_scroll() {
    let slot = CapabilitySlot::with_client(Arc::new(FixedClient("reply")));
    let mut app = app_with(&slot);

    app.scroll_up(3);
    assert!(!app.auto_scroll);

    app.dispatcher().submit("Hello").await;
    let messages = app.dispatcher().messages().await;
    assert!(app.observe_messages(&messages));
    assert!(app.auto_scroll);

    app.scroll_up(1);
    assert!(!app.observe_messages(&messages));
    assert!(!app.auto_scroll);
}

#[test]
fn teardown_requests_exit() {
    let slot = CapabilitySlot::new();
    let mut app = app_with(&slot);
    app.teardown();
    assert!(app.exit_requested);
    assert!(app.dispatcher().is_torn_down());
}

#[tokio::test]
async fn second_enter_before_first_submit_runs_keeps_its_text() {
    let slot = CapabilitySlot::with_client(Arc::new(FixedClient("re: first")));
    let mut app = app_with(&slot);

    type_text(&mut app, "first");
    let first = app.spawn_submission(|| {}).expect("first submission spawned");
    assert!(app.is_busy());
    assert!(!app.input_enabled());

    // Text that reached the field in the same batch, such as a paste.
    app.textarea.insert_str("second");
    assert!(app.spawn_submission(|| {}).is_none());
    assert_eq!(app.input_text(), "second");

    first.await.expect("join");
    let contents: Vec<_> = app
        .dispatcher()
        .messages()
        .await
        .into_iter()
        .map(|m| m.content)
        .collect();
    assert_eq!(contents, vec!["first", "re: first"]);

    assert!(!app.is_busy());
    let second = app.spawn_submission(|| {}).expect("second submission spawned");
    second.await.expect("join");
    assert_eq!(app.dispatcher().message_count().await, 4);
}
