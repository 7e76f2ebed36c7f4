//! Endpoint URLs for the OpenAI-compatible service.

/// Paths the client calls under the configured base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Probed to decide whether the service is ready.
    Models,
    ChatCompletions,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Models => "models",
            Endpoint::ChatCompletions => "chat/completions",
        }
    }
}

/// Joins a base URL and an endpoint without doubling or dropping slashes.
///
/// ```
/// use nexus_chat::utils::url::{endpoint_url, Endpoint};
///
/// assert_eq!(
///     endpoint_url("https://api.example.com/v1/", Endpoint::ChatCompletions),
///     "https://api.example.com/v1/chat/completions"
/// );
/// ```
pub fn endpoint_url(base_url: &str, endpoint: Endpoint) -> String {
    format!("{}/{}", base_url.trim().trim_end_matches('/'), endpoint.path())
}

/// Checks that a configured base URL is an absolute http(s) URL.
pub fn validate_base_url(base_url: &str) -> Result<(), String> {
    let trimmed = base_url.trim();
    let rest = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .ok_or_else(|| format!("'{trimmed}' must start with http:// or https://"))?;
    if rest.trim_matches('/').is_empty() {
        return Err(format!("'{trimmed}' has no host"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_url_normalizes_trailing_slashes() {
        assert_eq!(
            endpoint_url("http://localhost:11434/v1", Endpoint::Models),
            "http://localhost:11434/v1/models"
        );
        assert_eq!(
            endpoint_url("http://localhost:11434/v1///", Endpoint::Models),
            "http://localhost:11434/v1/models"
        );
        assert_eq!(
            endpoint_url(" https://api.openai.com/v1 ", Endpoint::ChatCompletions),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn base_url_needs_scheme_and_host() {
        assert!(validate_base_url("https://api.openai.com/v1").is_ok());
        assert!(validate_base_url("http://127.0.0.1:8080").is_ok());

        let err = validate_base_url("api.openai.com/v1").unwrap_err();
        assert!(err.contains("http://"));
        assert!(validate_base_url("https:///").is_err());
    }
}
