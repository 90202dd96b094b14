use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotionError {
    #[error("Notion API key not set (configure notion.api_key or the notion.api_key_env variable)")]
    MissingApiKey,

    #[error("Notion request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Notion API error {status} ({code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("could not decode Notion response: {0}")]
    Decode(String),

    #[error("block '{0}' not found")]
    NotFound(String),

    #[error("invalid fixture: {0}")]
    Fixture(String),
}

impl NotionError {
    /// Build an [`NotionError::Api`] from a non-success status and the raw
    /// response body.  Notion error bodies carry `code` and `message`; any
    /// other body is kept verbatim as the message.
    pub(crate) fn from_response(status: u16, body: &str) -> Self {
        let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
        let field = |name: &str| {
            parsed
                .as_ref()
                .and_then(|v| v[name].as_str())
                .map(str::to_string)
        };
        NotionError::Api {
            status,
            code: field("code").unwrap_or_else(|| "unknown".into()),
            message: field("message").unwrap_or_else(|| body.trim().to_string()),
        }
    }
}
