use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

mod app;
mod config;
mod export;
mod history;
mod media;
mod utils;

use app::{App, AppState, NoticeKind};
use config::Config;
use export::DirectoryExporter;
use history::{FileStore, HistoryCache};
use media::{GeminiClient, MediaFormat, MediaMetadata, Resolver};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the config file
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Look up a link and optionally export one of its formats
    Resolve {
        url: String,
        /// Format id to download after resolving
        #[arg(short, long)]
        format: Option<String>,
    },
    /// Same as `resolve`, taking the link from a `?url=` deep link
    Open {
        link: String,
        #[arg(short, long)]
        format: Option<String>,
    },
    /// Show recent lookups
    History,
}

fn get_config_path(args: &Args) -> Option<String> {
    if let Some(path) = &args.config {
        return Some(path.clone());
    }

    if let Ok(path) = std::env::var("CONFIG_FILE") {
        return Some(path);
    }

    if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
        let config_path = format!("{}/grablink/config.toml", xdg_config_home);
        if std::path::Path::new(&config_path).exists() {
            return Some(config_path);
        }
    }

    if let Some(home) = dirs::home_dir() {
        let config_path = format!("{}/.config/grablink/config.toml", home.display());
        if std::path::Path::new(&config_path).exists() {
            return Some(config_path);
        }
    }

    None
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    if config.get_logging_format() == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match get_config_path(&args) {
        Some(path) => Config::from_file(&path)
            .with_context(|| format!("Failed to load config from {}", path))?,
        None => Config::default(),
    };

    init_logging(&config);
    info!("Starting grablink...");

    let store = FileStore::new(config.storage.data_dir());
    info!("History stored in {}", store.dir().display());
    let history = HistoryCache::load(store);
    info!("Loaded {} history entries", history.len());

    let (url, format) = match args.command {
        Command::History => {
            if history.is_empty() {
                println!("No history yet.");
            } else {
                print_history(history.entries());
            }
            return Ok(());
        }
        Command::Resolve { url, format } => (url, format),
        Command::Open { link, format } => {
            let url = app::target_from_deep_link(&link)
                .with_context(|| format!("No url parameter in {}", link))?;
            (url, format)
        }
    };

    let resolver = Resolver::new(GeminiClient::from_config(&config.gemini)?);
    let exporter = DirectoryExporter::new(config.storage.download_dir());
    info!("Downloads go to {}", exporter.dir().display());

    let mut app = App::new(resolver, history, exporter, config.export.clone());

    app.analyze(&url).await;
    if let Some(message) = &app.state().error {
        anyhow::bail!("{}", message);
    }
    render(app.state());

    if let Some(format_id) = format {
        let state = app.download(&format_id);
        print_notice(state);
        if matches!(&state.notice, Some(n) if n.kind == NoticeKind::Error) {
            anyhow::bail!("Download of {} failed", format_id);
        }
    }

    Ok(())
}

fn render(state: &AppState) {
    let Some(metadata) = &state.metadata else {
        return;
    };
    print_metadata(metadata);
}

fn print_metadata(metadata: &MediaMetadata) {
    println!("{}", metadata.title);
    println!("by {} • {}", metadata.author, metadata.platform);
    if let Some(duration) = &metadata.duration {
        println!("duration: {}", duration);
    }
    println!("thumbnail: {}", metadata.thumbnail);

    print_formats("Video", metadata.video_formats());
    print_formats("Audio", metadata.audio_formats());
    print_formats("Image", metadata.image_formats());
}

fn print_formats<'a>(heading: &str, formats: impl Iterator<Item = &'a MediaFormat>) {
    let mut formats = formats.peekable();
    if formats.peek().is_none() {
        return;
    }
    println!();
    println!("{}:", heading);
    for f in formats {
        match &f.size {
            Some(size) => println!("  [{}] {} ({}, {})", f.id, f.quality, f.ext, size),
            None => println!("  [{}] {} ({})", f.id, f.quality, f.ext),
        }
    }
}

fn print_notice(state: &AppState) {
    if let Some(notice) = &state.notice {
        let marker = match notice.kind {
            NoticeKind::Success => "ok",
            NoticeKind::Error => "error",
        };
        println!("{}: {}", marker, notice.message);
    }
}

fn print_history(entries: &[history::HistoryEntry]) {
    for entry in entries {
        let when = chrono::DateTime::from_timestamp_millis(entry.timestamp)
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("{}  [{}] {}  {}", when, entry.platform, entry.title, entry.url);
    }
}
