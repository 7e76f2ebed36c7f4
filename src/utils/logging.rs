//! Plain-text transcript logging.

use crate::core::message::Message;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub struct LoggingState {
    file_path: Option<PathBuf>,
}

impl LoggingState {
    /// Enables logging when `log_file` is given. Fails if the file cannot be
    /// opened for appending.
    pub fn new(log_file: Option<String>) -> Result<Self, Box<dyn std::error::Error>> {
        let file_path = match log_file {
            Some(path) => {
                let path = PathBuf::from(path);
                check_file_access(&path)?;
                Some(path)
            }
            None => None,
        };
        Ok(LoggingState { file_path })
    }

    /// Appends one conversation message in the same shape it has on screen.
    pub fn log_conversation_message(
        &self,
        message: &Message,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let stamp = message.id.created_at().format("%H:%M:%S");
        let entry = format!(
            "[{stamp}] {}: {}",
            message.role.display_name(),
            message.content
        );
        self.log_message(&entry)
    }

    pub fn log_message(&self, content: &str) -> Result<(), Box<dyn std::error::Error>> {
        let Some(file_path) = self.file_path.as_deref() else {
            return Ok(());
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path)?;
        let mut writer = BufWriter::new(file);

        // Write each line of content, preserving the exact formatting
        for line in content.lines() {
            writeln!(writer, "{line}")?;
        }

        // Add an empty line after each message for spacing (matching screen display)
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.file_path.is_some()
    }

    pub fn get_status_string(&self) -> String {
        match &self.file_path {
            None => "disabled".to_string(),
            Some(path) => format!(
                "active ({})",
                path.file_name().unwrap_or_default().to_string_lossy()
            ),
        }
    }
}

fn check_file_access(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.flush()?;
    Ok(())
}
