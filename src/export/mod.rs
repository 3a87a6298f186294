use crate::{
    config::ExportConfig,
    media::{MediaFormat, MediaMetadata},
    utils::{sanitize_file_component, sanitize_title},
};
use anyhow::{Context, Result};
use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};
use tracing::info;

/// Hands a synthesized file to the user.
pub trait FileExporter {
    /// Save `contents` under `file_name` and return where it ended up
    fn save(&self, file_name: &str, contents: &[u8]) -> Result<PathBuf>;
}

/// Writes exported files into a directory, creating it on demand.
pub struct DirectoryExporter {
    dir: PathBuf,
}

impl DirectoryExporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl FileExporter for DirectoryExporter {
    fn save(&self, file_name: &str, contents: &[u8]) -> Result<PathBuf> {
        if Path::new(file_name).file_name() != Some(OsStr::new(file_name)) {
            anyhow::bail!(
                "Refusing to export outside {}: {}",
                self.dir.display(),
                file_name
            );
        }

        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;

        let path = self.dir.join(file_name);
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }
}

/// `<prefix>_<sanitized-title>_<quality>.<ext>`, always a single path component.
pub fn artifact_file_name(prefix: &str, title: &str, quality: &str, ext: &str) -> String {
    let title = if title.is_empty() {
        "video".to_string()
    } else {
        sanitize_title(title)
    };
    let quality = sanitize_file_component(quality);
    let ext = sanitize_file_component(ext);
    format!("{prefix}_{title}_{quality}.{ext}")
}

pub fn placeholder_contents(brand: &str, quality: &str) -> String {
    format!("{brand} Content: {quality}")
}

/// Write the placeholder artifact for one format of a resolved link.
pub fn export_format<E: FileExporter + ?Sized>(
    exporter: &E,
    options: &ExportConfig,
    metadata: &MediaMetadata,
    format: &MediaFormat,
) -> Result<PathBuf> {
    let file_name = artifact_file_name(
        &options.prefix,
        &metadata.title,
        &format.quality,
        &format.ext,
    );
    let contents = placeholder_contents(&options.brand, &format.quality);

    let path = exporter.save(&file_name, contents.as_bytes())?;
    info!("Exported {} placeholder to {}", format.quality, path.display());
    Ok(path)
}
