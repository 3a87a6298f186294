mod state;

pub use state::{AppState, NoticeKind};

use crate::{
    config::ExportConfig,
    export::{export_format, FileExporter},
    history::{HistoryCache, HistoryEntry, KeyValueStore},
    media::MetadataProvider,
};
use tracing::{error, info, warn};

pub const RESOLVE_FAILED_MESSAGE: &str = "Invalid link or server busy.";
pub const EXPORT_FAILED_MESSAGE: &str = "Failed to create the download file.";

/// Drives a provider, the history cache and an exporter through [`AppState`] transitions.
pub struct App<P, S, E> {
    provider: P,
    history: HistoryCache<S>,
    exporter: E,
    export: ExportConfig,
    state: AppState,
}

impl<P, S, E> App<P, S, E>
where
    P: MetadataProvider,
    S: KeyValueStore,
    E: FileExporter,
{
    pub fn new(provider: P, history: HistoryCache<S>, exporter: E, export: ExportConfig) -> Self {
        let state = AppState::default().with_history(history.entries().to_vec());
        Self {
            provider,
            history,
            exporter,
            export,
            state,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// The link is used verbatim; whitespace only matters for the blank check.
    pub async fn analyze(&mut self, url: &str) -> &AppState {
        if !self.state.can_submit(url) {
            return &self.state;
        }

        self.state = self.state.submitted(url);

        self.state = match self.provider.resolve(url).await {
            Ok(metadata) => {
                let history = self
                    .history
                    .record(HistoryEntry::new(url, &metadata))
                    .to_vec();
                self.state.resolved(metadata, history)
            }
            Err(e) => {
                error!(upstream = e.is_upstream(), "Failed to resolve {}: {}", url, e);
                self.state.failed(RESOLVE_FAILED_MESSAGE)
            }
        };

        &self.state
    }

    pub fn download(&mut self, format_id: &str) -> &AppState {
        let Some(metadata) = self.state.metadata.clone() else {
            warn!("Download requested before any link was resolved");
            self.state = self.state.download_failed("Nothing to download yet.");
            return &self.state;
        };
        let Some(format) = metadata.find_format(format_id) else {
            warn!("Unknown format requested: {}", format_id);
            self.state = self
                .state
                .download_failed(&format!("Unknown format: {format_id}"));
            return &self.state;
        };

        self.state = self.state.download_started(format_id);

        self.state = match export_format(&self.exporter, &self.export, &metadata, format) {
            Ok(path) => {
                info!("Download artifact ready at {}", path.display());
                self.state
                    .download_finished(&format!("Started download of {}.", format.quality))
            }
            Err(e) => {
                error!("Failed to export {}: {:#}", format_id, e);
                self.state.download_failed(EXPORT_FAILED_MESSAGE)
            }
        };

        &self.state
    }
}

/// Pull the target link out of a deep link such as `https://host/?url=<encoded>`.
pub fn target_from_deep_link(link: &str) -> Option<String> {
    let parsed = url::Url::parse(link).ok()?;
    parsed
        .query_pairs()
        .find(|(key, _)| key == "url")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.trim().is_empty())
}
