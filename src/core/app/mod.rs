//! Chat widget state.
//!
//! [`App`] owns everything the view needs besides the conversation itself:
//! the input textarea, scroll position and transcript logging. The
//! conversation and the busy flag live in the shared [`Dispatcher`] so that
//! spawned submits can update them while the event loop keeps drawing.

use std::time::Instant;

use tokio::task::JoinHandle;
use tracing::{debug, warn};
use tui_textarea::{Input, TextArea};

use crate::core::dispatcher::{Dispatcher, SubmitOutcome};
use crate::core::message::Message;
use crate::utils::logging::LoggingState;

pub struct App {
    dispatcher: Dispatcher,
    pub textarea: TextArea<'static>,
    pub scroll_offset: u16,
    pub auto_scroll: bool,
    pub exit_requested: bool,
    pub model: String,
    pub logging: LoggingState,
    pub pulse_start: Instant,
    seen_messages: usize,
}

impl App {
    pub fn new(dispatcher: Dispatcher, model: impl Into<String>, logging: LoggingState) -> Self {
        Self {
            dispatcher,
            textarea: TextArea::default(),
            scroll_offset: 0,
            auto_scroll: true,
            exit_requested: false,
            model: model.into(),
            logging,
            pulse_start: Instant::now(),
            seen_messages: 0,
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn is_ready(&self) -> bool {
        self.dispatcher.is_ready()
    }

    pub fn is_busy(&self) -> bool {
        self.dispatcher.is_busy()
    }

    pub fn input_text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    /// The input accepts typing only while the AI is ready and idle.
    pub fn input_enabled(&self) -> bool {
        self.is_ready() && !self.is_busy()
    }

    pub fn can_send(&self) -> bool {
        self.input_enabled() && !self.input_text().trim().is_empty()
    }

    pub fn clear_input(&mut self) {
        self.textarea = TextArea::default();
    }

    /// Feeds a key to the textarea. Returns true when the text changed.
    pub fn handle_input(&mut self, input: impl Into<Input>) -> bool {
        if !self.input_enabled() {
            return false;
        }
        self.textarea.input(input)
    }

    pub fn paste(&mut self, text: &str) {
        if self.input_enabled() {
            let _ = self.textarea.insert_str(text);
        }
    }

    pub fn insert_newline(&mut self) {
        if self.input_enabled() {
            self.textarea.insert_newline();
        }
    }

    /// Takes the current input for sending and clears the field.
    pub fn take_submission(&mut self) -> Option<String> {
        if !self.can_send() {
            return None;
        }
        let text = self.input_text();
        self.clear_input();
        Some(text)
    }

    /// Takes the input and runs the submit on a background task.
    /// `on_done` runs after the conversation has been updated.
    ///
    /// The dispatcher's in-flight slot is claimed before the input is
    /// cleared, so a second Enter arriving before the task runs leaves its
    /// text in the field.
    pub fn spawn_submission<F>(&mut self, on_done: F) -> Option<JoinHandle<SubmitOutcome>>
    where
        F: FnOnce() + Send + 'static,
    {
        if !self.can_send() {
            return None;
        }
        let guard = self.dispatcher.try_begin()?;
        let text = self.input_text();
        self.clear_input();
        let dispatcher = self.dispatcher.clone();
        Some(tokio::spawn(async move {
            let outcome = dispatcher.submit_claimed(guard, &text).await;
            debug!(?outcome, "submit finished");
            on_done();
            outcome
        }))
    }

    /// Records the latest conversation snapshot. New messages re-enable
    /// auto-scroll and are written to the transcript log.
    pub fn observe_messages(&mut self, messages: &[Message]) -> bool {
        if messages.len() <= self.seen_messages {
            return false;
        }

        for message in &messages[self.seen_messages..] {
            debug!(id = %message.id, role = message.role.as_str(), "message added");
            if let Err(err) = self.logging.log_conversation_message(message) {
                warn!(error = %err, "failed to write transcript log");
            }
        }
        self.seen_messages = messages.len();
        self.auto_scroll = true;
        true
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.auto_scroll = false;
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.auto_scroll = false;
        self.scroll_offset = self.scroll_offset.saturating_add(lines);
    }

    pub fn scroll_to_top(&mut self) {
        self.auto_scroll = false;
        self.scroll_offset = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.auto_scroll = true;
    }

    pub fn get_logging_status(&self) -> String {
        self.logging.get_status_string()
    }

    /// Ends the widget's lifetime; replies still in flight are dropped.
    pub fn teardown(&mut self) {
        self.exit_requested = true;
        self.dispatcher.teardown();
    }
}

#[cfg(test)]
mod tests;
