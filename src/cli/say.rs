//! TUI-less "say" command

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::api::client::{HttpChatClient, HttpProbe};
use crate::core::capability::CapabilitySlot;
use crate::core::config::defaults::ResolvedSettings;
use crate::core::dispatcher::{Dispatcher, SubmitOutcome};
use crate::core::message::MessageId;
use crate::core::readiness::ReadinessPoller;
use crate::utils::logging::LoggingState;

/// How long `say` waits for the AI service before giving up.
const READY_TIMEOUT: Duration = Duration::from_secs(30);

pub async fn run_say(
    prompt: Vec<String>,
    settings: ResolvedSettings,
    log_file: Option<String>,
) -> Result<(), Box<dyn Error>> {
    let prompt = prompt.join(" ");
    if prompt.trim().is_empty() {
        eprintln!("Usage: nexus say <prompt>");
        std::process::exit(1);
    }

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

    let mut readiness = slot.readiness();
    if tokio::time::timeout(READY_TIMEOUT, readiness.wait())
        .await
        .is_err()
    {
        warn!(
            timeout_secs = READY_TIMEOUT.as_secs(),
            base_url = %settings.base_url,
            "AI service did not become ready"
        );
    }
    poller.shutdown().await;

    let dispatcher = Dispatcher::new(slot.readiness());
    let outcome = dispatcher.submit(&prompt).await;
    info!(?outcome, "say finished");

    for message in dispatcher.messages().await {
        if let Err(e) = logging.log_conversation_message(&message) {
            warn!(error = %e, "failed to write transcript log");
        }
    }

    match outcome {
        SubmitOutcome::Completed { assistant, .. } => {
            println!("{}", content_of(&dispatcher, assistant).await);
            Ok(())
        }
        SubmitOutcome::NotReady(notice) => {
            eprintln!("❌ {}", content_of(&dispatcher, notice).await);
            std::process::exit(1);
        }
        other => {
            eprintln!("❌ Message was not sent ({other:?})");
            std::process::exit(1);
        }
    }
}

async fn content_of(dispatcher: &Dispatcher, id: MessageId) -> String {
    dispatcher
        .messages()
        .await
        .into_iter()
        .find(|message| message.id == id)
        .map(|message| message.content)
        .unwrap_or_default()
}
