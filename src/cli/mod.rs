//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod say;

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::say::run_say;
use crate::core::config::data::{Config, ConfigKey};
use crate::core::config::defaults::SettingsOverrides;
use crate::ui::chat_loop::run_chat;
use crate::utils::diagnostics::{self, DiagnosticsTarget};

#[derive(Parser)]
#[command(name = "nexus")]
#[command(about = "A terminal chat widget for an OpenAI-compatible AI service")]
#[command(
    long_about = "Nexus is a full-screen terminal chat widget. It waits until the AI service \
answers, then sends each message and shows the reply below it.\n\n\
Environment Variables:\n\
  OPENAI_API_KEY    API key sent as a bearer token\n\
  OPENAI_BASE_URL   API base URL (defaults to https://api.openai.com/v1)\n\
  NEXUS_LOG         Diagnostic log filter (defaults to info)\n\n\
Controls:\n\
  Enter             Send the message\n\
  Shift+Enter       Insert a newline\n\
  Up/Down/PgUp/PgDn Scroll through chat history\n\
  Ctrl+End          Jump back to the newest message\n\
  Ctrl+C            Quit the application"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Model to use for chat
    #[arg(short = 'm', long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// API base URL
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// How often to check whether the AI service is ready, in milliseconds
    #[arg(long, global = true, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
    pub poll_interval_ms: Option<u64>,

    /// Enable transcript logging to specified file
    #[arg(short = 'l', long, global = true)]
    pub log: Option<String>,

    /// Write diagnostic logs to specified file
    #[arg(long, global = true, value_name = "FILE")]
    pub debug_log: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Send a single message and print the reply
    Say {
        /// Message to send
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        prompt: Vec<String>,
    },
    /// Set configuration values
    Set {
        /// Configuration key to set
        key: String,
        /// Value to set for the key
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
    /// Print the current configuration
    Config,
}

impl Args {
    fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            poll_interval_ms: self.poll_interval_ms,
        }
    }
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let overrides = args.overrides();

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            if let Some(path) = args.debug_log.or_else(diagnostics::default_log_path) {
                diagnostics::init(DiagnosticsTarget::File(path))?;
            }
            let settings = Config::load()?.resolve(&overrides);
            run_chat(settings, args.log).await
        }
        Commands::Say { prompt } => {
            let target = match args.debug_log {
                Some(path) => DiagnosticsTarget::File(path),
                None => DiagnosticsTarget::Stderr,
            };
            diagnostics::init(target)?;
            let settings = Config::load()?.resolve(&overrides);
            run_say(prompt, settings, args.log).await
        }
        Commands::Set { key, value } => {
            let key = parse_key(&key);
            let mut config = Config::load()?;
            if value.is_empty() {
                config.print_all();
                return Ok(());
            }
            let value = value.join(" ");
            if let Err(e) = config.set(key, &value) {
                eprintln!("❌ {e}");
                std::process::exit(1);
            }
            config.save()?;
            println!("✅ Set {key} to: {value}");
            Ok(())
        }
        Commands::Unset { key } => {
            let key = parse_key(&key);
            let mut config = Config::load()?;
            config.unset(key);
            config.save()?;
            println!("✅ Unset {key}");
            Ok(())
        }
        Commands::Config => {
            Config::load()?.print_all();
            Ok(())
        }
    }
}

fn parse_key(key: &str) -> ConfigKey {
    match key.parse::<ConfigKey>() {
        Ok(key) => key,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    }
}
