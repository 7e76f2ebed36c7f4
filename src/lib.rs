//! Nexus is a terminal chat widget for an OpenAI-compatible AI service.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the conversation, the AI capability slot, the readiness
//!   poller and the message dispatcher that ties them together.
//! - [`ui`] renders the terminal interface and runs the interactive event loop
//!   that drives user input and display updates.
//! - [`api`] defines the chat payloads and the HTTP client that implements
//!   the AI capability.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which initializes and dispatches into
//! [`ui::chat_loop`] for interactive sessions.

pub mod api;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
