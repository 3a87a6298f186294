use super::{error::ResolveError, types::MediaMetadata};
use async_trait::async_trait;
use serde_json::Value;

/// A single structured-output request to a text model.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Free-text instructions for the model
    pub prompt: String,
    /// Schema the reply must conform to
    pub schema: Value,
}

#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Human-readable name of the backend
    fn name(&self) -> &'static str;

    /// Send the request and return the reply text, if the model produced any
    async fn generate(&self, request: GenerationRequest) -> Result<Option<String>, ResolveError>;
}

#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Turn a link into (fabricated) media metadata
    async fn resolve(&self, url: &str) -> Result<MediaMetadata, ResolveError>;
}
