use crate::{history::HistoryEntry, media::MediaMetadata};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

/// Snapshot of everything the front-end shows. Transitions return a new snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub url: String,
    pub loading: bool,
    pub metadata: Option<MediaMetadata>,
    pub history: Vec<HistoryEntry>,
    pub error: Option<String>,
    /// Format currently being exported
    pub downloading: Option<String>,
    pub notice: Option<Notice>,
}

impl AppState {
    /// No new lookup while one is in flight, and never for a blank link.
    pub fn can_submit(&self, url: &str) -> bool {
        !self.loading && !url.trim().is_empty()
    }

    pub fn with_history(&self, history: Vec<HistoryEntry>) -> Self {
        Self {
            history,
            ..self.clone()
        }
    }

    pub fn submitted(&self, url: &str) -> Self {
        Self {
            url: url.to_string(),
            loading: true,
            metadata: None,
            error: None,
            ..self.clone()
        }
    }

    pub fn resolved(&self, metadata: MediaMetadata, history: Vec<HistoryEntry>) -> Self {
        Self {
            loading: false,
            metadata: Some(metadata),
            history,
            error: None,
            ..self.clone()
        }
    }

    pub fn failed(&self, message: &str) -> Self {
        Self {
            loading: false,
            metadata: None,
            error: Some(message.to_string()),
            notice: Some(Notice::error(message)),
            ..self.clone()
        }
    }

    pub fn download_started(&self, format_id: &str) -> Self {
        Self {
            downloading: Some(format_id.to_string()),
            ..self.clone()
        }
    }

    pub fn download_finished(&self, message: &str) -> Self {
        Self {
            downloading: None,
            notice: Some(Notice::success(message)),
            ..self.clone()
        }
    }

    pub fn download_failed(&self, message: &str) -> Self {
        Self {
            downloading: None,
            notice: Some(Notice::error(message)),
            ..self.clone()
        }
    }
}
