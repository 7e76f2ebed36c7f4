//! Authentication utilities for API requests

/// Add a bearer `Authorization` header when an API key is configured.
///
/// Requests without a key are sent unauthenticated, which is what local
/// OpenAI-compatible servers expect.
pub fn add_auth_headers(
    request: reqwest::RequestBuilder,
    api_key: Option<&str>,
) -> reqwest::RequestBuilder {
    match api_key {
        Some(key) => request.header("Authorization", format!("Bearer {key}")),
        None => request,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_header_is_added_for_keys() {
        let client = reqwest::Client::new();
        let request = add_auth_headers(client.get("https://example.com"), Some("test-key"))
            .build()
            .unwrap();

        assert_eq!(
            request
                .headers()
                .get("Authorization")
                .and_then(|v| v.to_str().ok()),
            Some("Bearer test-key")
        );
    }

    #[test]
    fn no_header_without_key() {
        let client = reqwest::Client::new();
        let request = add_auth_headers(client.get("https://example.com"), None)
            .build()
            .unwrap();

        assert!(request.headers().get("Authorization").is_none());
    }
}
