//! Main chat event loop and UI rendering
//!
//! Terminal input is read on a background task and forwarded over a
//! channel. Submits and readiness changes post redraw requests on the same
//! channel, and the loop redraws at most once per frame.

mod keybindings;
mod lifecycle;

use std::{
    error::Error,
    sync::Arc,
    time::{Duration, Instant},
};

use ratatui::crossterm::event::{self, Event, KeyEventKind};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use self::keybindings::{classify_key, KeyAction};
use self::lifecycle::{restore_terminal, setup_terminal, ChatTerminal};
use crate::api::client::{HttpChatClient, HttpProbe};
use crate::core::app::App;
use crate::core::capability::{CapabilitySlot, Readiness};
use crate::core::config::defaults::ResolvedSettings;
use crate::core::dispatcher::Dispatcher;
use crate::core::readiness::ReadinessPoller;
use crate::ui::renderer::ui;
use crate::ui::view::ViewModel;
use crate::utils::logging::LoggingState;

#[derive(Debug)]
pub enum UiEvent {
    Crossterm(Event),
    RequestRedraw,
}

const MAX_FPS: u64 = 30;

fn spawn_event_reader(
    event_tx: mpsc::UnboundedSender<UiEvent>,
    stop: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while !stop.is_cancelled() {
            if let Ok(true) = event::poll(Duration::from_millis(10)) {
                match event::read() {
                    Ok(ev) => {
                        if event_tx.send(UiEvent::Crossterm(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => continue,
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
    })
}

/// Posts a redraw once the AI capability shows up.
fn spawn_readiness_notifier(
    mut readiness: Readiness,
    event_tx: mpsc::UnboundedSender<UiEvent>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if readiness.wait().await.is_some() {
            info!("AI capability ready");
            let _ = event_tx.send(UiEvent::RequestRedraw);
        }
    })
}

/// Applies one terminal event. Returns true when the screen needs a redraw.
fn handle_event(app: &mut App, event: Event, event_tx: &mpsc::UnboundedSender<UiEvent>) -> bool {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => match classify_key(&key) {
            KeyAction::Quit => {
                app.exit_requested = true;
                false
            }
            KeyAction::Submit => {
                let tx = event_tx.clone();
                let spawned = app
                    .spawn_submission(move || {
                        let _ = tx.send(UiEvent::RequestRedraw);
                    })
                    .is_some();
                if spawned {
                    app.pulse_start = Instant::now();
                }
                spawned
            }
            KeyAction::NewLine => {
                app.insert_newline();
                true
            }
            KeyAction::ScrollUp(lines) => {
                app.scroll_up(lines);
                true
            }
            KeyAction::ScrollDown(lines) => {
                app.scroll_down(lines);
                true
            }
            KeyAction::ScrollTop => {
                app.scroll_to_top();
                true
            }
            KeyAction::ScrollBottom => {
                app.scroll_to_bottom();
                true
            }
            KeyAction::Edit => app.handle_input(key),
        },
        Event::Paste(text) => {
            app.paste(&text);
            true
        }
        Event::Resize(_, _) => true,
        _ => false,
    }
}

async fn draw_frame(terminal: &mut ChatTerminal, app: &mut App) -> Result<(), Box<dyn Error>> {
    let messages = app.dispatcher().messages().await;
    app.observe_messages(&messages);

    let view = ViewModel::build(&messages, app.is_ready(), app.is_busy(), &app.input_text());
    let mut applied_offset = app.scroll_offset;
    terminal.draw(|f| {
        applied_offset = ui(f, app, &view);
    })?;
    app.scroll_offset = applied_offset;
    Ok(())
}

async fn event_loop(
    terminal: &mut ChatTerminal,
    app: &mut App,
    event_rx: &mut mpsc::UnboundedReceiver<UiEvent>,
    event_tx: &mpsc::UnboundedSender<UiEvent>,
) -> Result<(), Box<dyn Error>> {
    let frame_duration = Duration::from_millis(1000 / MAX_FPS);
    let mut request_redraw = true;
    let mut last_draw = Instant::now() - frame_duration;

    while !app.exit_requested {
        let animating = app.is_busy();
        if (request_redraw || animating) && last_draw.elapsed() >= frame_duration {
            draw_frame(terminal, app).await?;
            last_draw = Instant::now();
            request_redraw = false;
        }

        let mut events_processed = false;
        while let Ok(ui_event) = event_rx.try_recv() {
            events_processed = true;
            match ui_event {
                UiEvent::Crossterm(ev) => {
                    if handle_event(app, ev, event_tx) {
                        request_redraw = true;
                    }
                }
                UiEvent::RequestRedraw => request_redraw = true,
            }
            if app.exit_requested {
                break;
            }
        }

        if !events_processed && !request_redraw {
            tokio::time::sleep(Duration::from_millis(16)).await;
        }
    }

    Ok(())
}

pub async fn run_chat(
    settings: ResolvedSettings,
    log_file: Option<String>,
) -> Result<(), Box<dyn Error>> {
    let logging = LoggingState::new(log_file)?;

    let client = Arc::new(HttpChatClient::new(
        settings.base_url.clone(),
        settings.api_key.clone(),
        settings.model.clone(),
    ));
    let slot = Arc::new(CapabilitySlot::new());
    let poller = ReadinessPoller::spawn(
        slot.clone(),
        Arc::new(HttpProbe::new(client)),
        settings.poll_interval,
    );
    info!(
        base_url = %settings.base_url,
        model = %settings.model,
        poll_ms = settings.poll_interval.as_millis() as u64,
        "starting chat session"
    );

    let mut app = App::new(Dispatcher::new(slot.readiness()), settings.model, logging);

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<UiEvent>();
    let stop_reader = CancellationToken::new();
    let reader = spawn_event_reader(event_tx.clone(), stop_reader.clone());
    let notifier = spawn_readiness_notifier(slot.readiness(), event_tx.clone());

    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, &mut app, &mut event_rx, &event_tx).await;

    app.teardown();
    poller.shutdown().await;
    notifier.abort();
    stop_reader.cancel();
    let _ = reader.await;
    restore_terminal(&mut terminal)?;
    debug!("chat session ended");

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::capability::{AiClient, ChatError, ChatReply};
    use async_trait::async_trait;
    use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    struct FixedClient;

    #[async_trait]
    impl AiClient for FixedClient {
        async fn chat(&self, _message: &str) -> Result<ChatReply, ChatError> {
            Ok(ChatReply::from("Hi there!"))
        }
    }

    fn ready_app() -> (CapabilitySlot, App) {
        let slot = CapabilitySlot::with_client(Arc::new(FixedClient));
        let app = App::new(
            Dispatcher::new(slot.readiness()),
            "test-model",
            LoggingState::new(None).expect("logging"),
        );
        (slot, app)
    }

    fn press(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> bool {
        let (tx, _rx) = mpsc::unbounded_channel();
        handle_event(app, Event::Key(KeyEvent::new(code, modifiers)), &tx)
    }

    #[tokio::test]
    async fn enter_sends_and_redraw_is_requested_when_reply_lands() {
        let (_slot, mut app) = ready_app();
        for ch in "Hello".chars() {
            press(&mut app, KeyCode::Char(ch), KeyModifiers::NONE);
        }

        let (tx, mut rx) = mpsc::unbounded_channel();
        let redraw = handle_event(
            &mut app,
            Event::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)),
            &tx,
        );
        assert!(redraw);
        assert_eq!(app.input_text(), "");

        assert!(matches!(rx.recv().await, Some(UiEvent::RequestRedraw)));
        let messages = app.dispatcher().messages().await;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].content, "Hi there!");
    }

    #[tokio::test]
    async fn shift_enter_never_submits() {
        let (_slot, mut app) = ready_app();
        press(&mut app, KeyCode::Char('a'), KeyModifiers::NONE);
        press(&mut app, KeyCode::Enter, KeyModifiers::SHIFT);
        press(&mut app, KeyCode::Char('b'), KeyModifiers::NONE);

        assert_eq!(app.input_text(), "a\nb");
        tokio::task::yield_now().await;
        assert!(app.dispatcher().messages().await.is_empty());
    }

    #[test]
    fn ctrl_c_requests_exit() {
        let (_slot, mut app) = ready_app();
        press(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(app.exit_requested);
    }

    #[test]
    fn enter_with_blank_input_does_nothing() {
        let (_slot, mut app) = ready_app();
        press(&mut app, KeyCode::Char(' '), KeyModifiers::NONE);
        assert!(!press(&mut app, KeyCode::Enter, KeyModifiers::NONE));
        assert_eq!(app.input_text(), " ");
    }
}
