/// Errors produced while resolving a link into metadata.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("Missing configuration: {0}")]
    Configuration(String),

    #[error("Model returned an empty response")]
    EmptyResponse,

    #[error("Model returned malformed metadata: {source}")]
    MalformedResponse {
        #[source]
        source: serde_json::Error,
        body: String,
    },

    #[error("Upstream request failed: {0}")]
    Upstream(String),

    #[error("Upstream API error: {status} - {message}")]
    Api { status: u16, message: String },
}

impl ResolveError {
    /// Transport or service failures, as opposed to unusable replies.
    pub fn is_upstream(&self) -> bool {
        matches!(self, ResolveError::Upstream(_) | ResolveError::Api { .. })
    }
}
