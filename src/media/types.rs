use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Youtube,
    Tiktok,
    Instagram,
    Facebook,
    #[serde(other)]
    Unknown,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Youtube => "youtube",
            Platform::Tiktok => "tiktok",
            Platform::Instagram => "instagram",
            Platform::Facebook => "facebook",
            Platform::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Matched case-insensitively; anything else is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FormatKind {
    Video,
    Audio,
    Image,
    Other(String),
}

impl From<String> for FormatKind {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "video" => FormatKind::Video,
            "audio" => FormatKind::Audio,
            "image" => FormatKind::Image,
            _ => FormatKind::Other(value),
        }
    }
}

impl From<FormatKind> for String {
    fn from(kind: FormatKind) -> Self {
        match kind {
            FormatKind::Video => "video".to_string(),
            FormatKind::Audio => "audio".to_string(),
            FormatKind::Image => "image".to_string(),
            FormatKind::Other(value) => value,
        }
    }
}

/// One downloadable variant offered for a resolved link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaFormat {
    pub id: String,
    pub quality: String,
    #[serde(rename = "type")]
    pub kind: FormatKind,
    pub ext: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

/// Metadata the model fabricated for a single link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaMetadata {
    pub title: String,
    pub author: String,
    pub thumbnail: String,
    pub platform: Platform,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    pub formats: Vec<MediaFormat>,
}

impl MediaMetadata {
    pub fn video_formats(&self) -> impl Iterator<Item = &MediaFormat> {
        self.formats_of(FormatKind::Video)
    }

    pub fn audio_formats(&self) -> impl Iterator<Item = &MediaFormat> {
        self.formats_of(FormatKind::Audio)
    }

    pub fn image_formats(&self) -> impl Iterator<Item = &MediaFormat> {
        self.formats_of(FormatKind::Image)
    }

    pub fn find_format(&self, id: &str) -> Option<&MediaFormat> {
        self.formats.iter().find(|f| f.id == id)
    }

    fn formats_of(&self, kind: FormatKind) -> impl Iterator<Item = &MediaFormat> {
        self.formats.iter().filter(move |f| f.kind == kind)
    }
}
