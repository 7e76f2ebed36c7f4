//! Presentation model derived from the widget state.
//!
//! Everything here is a pure function of the conversation, the readiness and
//! busy flags, and the current input text. The renderer only lays it out.

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::core::message::{Message, TranscriptRole};

pub const READY_STATUS: &str = "AI online";
pub const INITIALIZING_STATUS: &str = "Initializing...";
pub const READY_PLACEHOLDER: &str = "Type your message and press Enter...";
pub const WAITING_PLACEHOLDER: &str = "Waiting for AI initialization...";
pub const PENDING_TEXT: &str = "Processing your request...";
pub const WELCOME_TITLE: &str = "Ready to Chat!";
pub const WELCOME_HINT: &str = "Start your conversation with our advanced AI assistant";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub role: TranscriptRole,
    pub label: &'static str,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModel {
    pub ready: bool,
    pub status: &'static str,
    pub entries: Vec<Entry>,
    pub show_welcome: bool,
    pub pending: bool,
    pub input_enabled: bool,
    pub send_enabled: bool,
    pub placeholder: &'static str,
}

impl ViewModel {
    pub fn build(messages: &[Message], ready: bool, busy: bool, input: &str) -> Self {
        let input_enabled = ready && !busy;
        Self {
            ready,
            status: if ready {
                READY_STATUS
            } else {
                INITIALIZING_STATUS
            },
            entries: messages
                .iter()
                .map(|message| Entry {
                    role: message.role,
                    label: message.role.display_name(),
                    content: message.content.clone(),
                })
                .collect(),
            show_welcome: messages.is_empty(),
            pending: busy,
            input_enabled,
            send_enabled: input_enabled && !input.trim().is_empty(),
            placeholder: if ready {
                READY_PLACEHOLDER
            } else {
                WAITING_PLACEHOLDER
            },
        }
    }

    /// Lines for the message pane, newest last.
    pub fn message_lines(&self, spinner: &'static str) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        if self.show_welcome {
            lines.push(Line::from(Span::styled(
                WELCOME_TITLE,
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(Span::styled(
                WELCOME_HINT,
                Style::default().fg(Color::DarkGray),
            )));
            lines.push(Line::from(""));
        }

        for entry in &self.entries {
            let (label_style, text_style) = entry_styles(entry.role);
            lines.push(Line::from(Span::styled(entry.label, label_style)));
            for content_line in entry.content.lines() {
                lines.push(Line::from(Span::styled(
                    content_line.to_string(),
                    text_style,
                )));
            }
            if entry.content.is_empty() {
                lines.push(Line::from(""));
            }
            lines.push(Line::from(""));
        }

        if self.pending {
            let (label_style, text_style) = entry_styles(TranscriptRole::Assistant);
            lines.push(Line::from(Span::styled(
                TranscriptRole::Assistant.display_name(),
                label_style,
            )));
            lines.push(Line::from(vec![
                Span::styled(format!("{spinner} "), text_style),
                Span::styled(PENDING_TEXT, text_style.add_modifier(Modifier::ITALIC)),
            ]));
        }

        lines
    }
}

fn entry_styles(role: TranscriptRole) -> (Style, Style) {
    match role {
        TranscriptRole::User => (
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            Style::default().fg(Color::Cyan),
        ),
        TranscriptRole::Assistant => (
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            Style::default().fg(Color::White),
        ),
        TranscriptRole::AppInfo => (
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            Style::default().fg(Color::DarkGray),
        ),
    }
}

/// Word-wraps `lines` to `width` columns, keeping span styles.
///
/// The result is rendered without further wrapping, so its length is the
/// exact number of rows the message pane needs. Words wider than the pane
/// are broken at the column limit. Whitespace at a wrap point is dropped.
pub fn wrap_lines(lines: Vec<Line<'static>>, width: u16) -> Vec<Line<'static>> {
    let width = usize::from(width.max(1));
    let mut wrapped = Vec::with_capacity(lines.len());
    for line in lines {
        wrap_line(line, width, &mut wrapped);
    }
    wrapped
}

fn wrap_line(line: Line<'static>, width: usize, out: &mut Vec<Line<'static>>) {
    let mut row = RowBuilder::default();
    // Whitespace is held back until the next word lands on the same row.
    let mut pending: Vec<(&str, Style, usize)> = Vec::new();

    for span in &line.spans {
        for (is_space, token) in split_tokens(span.content.as_ref()) {
            let token_width = UnicodeWidthStr::width(token);
            if is_space {
                if row.width > 0 || !row.wrapped {
                    pending.push((token, span.style, token_width));
                }
                continue;
            }

            let pending_width: usize = pending.iter().map(|(_, _, w)| w).sum();
            let fits = row.width + pending_width + token_width <= width;
            if !fits && row.width > 0 && (token_width <= width || row.width + pending_width >= width)
            {
                pending.clear();
                out.push(row.finish());
            }
            for (text, style, text_width) in pending.drain(..) {
                row.push(text, style, text_width);
            }

            if row.width + token_width <= width {
                row.push(token, span.style, token_width);
                continue;
            }

            // Wider than the pane: fill the row, then keep breaking.
            for ch in token.chars() {
                let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
                if row.width + ch_width > width && row.width > 0 {
                    out.push(row.finish());
                }
                let mut buf = [0u8; 4];
                row.push(ch.encode_utf8(&mut buf), span.style, ch_width);
            }
        }
    }

    out.push(row.finish());
}

/// Splits text into alternating runs of whitespace and non-whitespace.
fn split_tokens(text: &str) -> Vec<(bool, &str)> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut current: Option<bool> = None;
    for (idx, ch) in text.char_indices() {
        let is_space = ch.is_whitespace();
        match current {
            Some(kind) if kind == is_space => {}
            Some(kind) => {
                tokens.push((kind, &text[start..idx]));
                start = idx;
                current = Some(is_space);
            }
            None => current = Some(is_space),
        }
    }
    if let Some(kind) = current {
        tokens.push((kind, &text[start..]));
    }
    tokens
}

#[derive(Default)]
struct RowBuilder {
    spans: Vec<Span<'static>>,
    width: usize,
    wrapped: bool,
}

impl RowBuilder {
    fn push(&mut self, text: &str, style: Style, text_width: usize) {
        match self.spans.last_mut() {
            Some(last) if last.style == style => last.content.to_mut().push_str(text),
            _ => self.spans.push(Span::styled(text.to_string(), style)),
        }
        self.width += text_width;
    }

    fn finish(&mut self) -> Line<'static> {
        self.width = 0;
        self.wrapped = true;
        Line::from(std::mem::take(&mut self.spans))
    }
}

/// Scroll offset that keeps the view inside the content. Auto-scroll pins
/// the view to the newest line.
pub fn resolve_scroll(auto_scroll: bool, offset: u16, content_height: u16, view_height: u16) -> u16 {
    let max_offset = content_height.saturating_sub(view_height);
    if auto_scroll {
        max_offset
    } else {
        offset.min(max_offset)
    }
}
