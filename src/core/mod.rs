pub mod app;
pub mod capability;
pub mod config;
pub mod constants;
pub mod conversation;
pub mod dispatcher;
pub mod message;
pub mod readiness;
