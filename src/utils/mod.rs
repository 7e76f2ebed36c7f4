pub mod auth;
pub mod diagnostics;
pub mod logging;
pub mod url;
