mod error;
mod gemini;
mod provider;
mod schema;
mod types;

pub use error::ResolveError;
pub use gemini::GeminiClient;
pub use provider::{GenerativeBackend, MetadataProvider};
pub use types::{MediaFormat, MediaMetadata, Platform};

use async_trait::async_trait;
use tracing::{debug, info, warn};

/// Resolves links by asking a generative backend to fill in the metadata schema.
///
/// The reply is trusted as-is: nothing checks the reported platform against
/// the link's domain, and calling twice with the same link may return
/// different metadata.
pub struct Resolver<B> {
    backend: B,
}

impl<B: GenerativeBackend> Resolver<B> {
    pub fn new(backend: B) -> Self {
        info!("Metadata resolver initialized with {} backend", backend.name());
        Self { backend }
    }

    #[cfg(test)]
    pub(crate) fn backend(&self) -> &B {
        &self.backend
    }

    fn parse(text: Option<String>) -> Result<MediaMetadata, ResolveError> {
        let body = match text {
            Some(body) if !body.trim().is_empty() => body,
            _ => return Err(ResolveError::EmptyResponse),
        };

        serde_json::from_str(body.trim())
            .map_err(|source| ResolveError::MalformedResponse { source, body })
    }
}

#[async_trait]
impl<B: GenerativeBackend> MetadataProvider for Resolver<B> {
    async fn resolve(&self, url: &str) -> Result<MediaMetadata, ResolveError> {
        info!("Resolving metadata for URL: {}", url);

        let text = self.backend.generate(schema::metadata_request(url)).await?;
        debug!("{} raw reply: {:?}", self.backend.name(), text);

        match Self::parse(text) {
            Ok(metadata) => {
                info!(
                    "Resolved \"{}\" on {} with {} formats",
                    metadata.title,
                    metadata.platform,
                    metadata.formats.len()
                );
                Ok(metadata)
            }
            Err(e) => {
                warn!("{} returned unusable metadata: {}", self.backend.name(), e);
                if let ResolveError::MalformedResponse { body, .. } = &e {
                    debug!("Unparseable reply body: {}", body);
                }
                Err(e)
            }
        }
    }
}
