//! # Versecast CLI
//!
//! Serves randomly drawn scripture passages to push subscribers at the time
//! of day each one picked.
//!
//! Usage:
//!   versecast serve                          # Gateway + minute scheduler
//!   versecast verse -t BBE                   # Print one random passage
//!   versecast inspect public/data/BBE.txt    # Parse a corpus file, show counts
//!   versecast tick --at 08:00 -p prefs.json  # Run one tick offline
//!   versecast config show                    # Show effective configuration

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use versecast_core::VersecastConfig;
use versecast_core::config::CorpusFormat;
use versecast_core::types::PreferenceRequest;
use versecast_corpus::library::{load_file, load_translation};
use versecast_corpus::{CorpusLibrary, select_random, text};
use versecast_gateway::AppState;
use versecast_scheduler::{
    LogNotifier, PreferenceStore, ScheduleMode, SchedulerEngine, create_notifier,
};

#[derive(Parser)]
#[command(
    name = "versecast",
    version,
    about = "🌿 Versecast — scheduled scripture push notifications"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway and the scheduler
    Serve {
        /// Override the listening port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print one random passage
    Verse {
        /// Translation id or label (defaults to schedule.default_translation)
        #[arg(short, long)]
        translation: Option<String>,
    },

    /// Parse a corpus file and report what it contains
    Inspect {
        path: PathBuf,

        /// Input encoding; guessed from the extension when omitted
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,
    },

    /// Run a single tick against preferences from a JSON file
    Tick {
        /// Wall-clock time to simulate, HH:MM
        #[arg(long)]
        at: String,

        /// JSON array of preference requests
        #[arg(short, long)]
        preferences: PathBuf,

        /// Deliver through the configured push relay instead of logging
        #[arg(long)]
        send: bool,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Json,
    Text,
}

impl From<FormatArg> for CorpusFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Json => CorpusFormat::Json,
            FormatArg::Text => CorpusFormat::Text,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "versecast=debug,versecast_core=debug,versecast_corpus=debug,versecast_scheduler=debug,versecast_gateway=debug,tower_http=debug"
    } else {
        "versecast=info,versecast_corpus=info,versecast_scheduler=info,versecast_gateway=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .init();

    // Load config
    let mut config = if let Some(path) = &cli.config {
        VersecastConfig::load_from(std::path::Path::new(path))?
    } else {
        VersecastConfig::load()?
    };

    match cli.command {
        Commands::Serve { port } => {
            if let Some(p) = port {
                config.server.port = p;
            }
            serve(config).await?;
        }

        Commands::Verse { translation } => {
            let key = translation.unwrap_or_else(|| config.schedule.default_translation.clone());
            let source = config
                .translation(&key)
                .with_context(|| format!("translation '{key}' is not configured"))?;
            let corpus = load_translation(source).await?;
            let passage = select_random(Some(&corpus))?;
            println!("{}\n\n{}", passage.reference, passage.text);
        }

        Commands::Inspect { path, format } => {
            let format = format.map(CorpusFormat::from).unwrap_or_else(|| guess_format(&path));
            inspect(&path, format).await?;
        }

        Commands::Tick { at, preferences, send } => {
            run_single_tick(&config, &at, &preferences, send).await?;
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                println!("# {}", VersecastConfig::default_path().display());
                println!("{}", config.to_toml()?);
            }
        },
    }

    Ok(())
}

async fn load_library(config: &VersecastConfig) -> Result<Arc<CorpusLibrary>> {
    let library = CorpusLibrary::load_all(&config.translations).await;
    if library.is_empty() {
        anyhow::bail!("no translation could be loaded, check [[translations]] paths");
    }
    Ok(Arc::new(library))
}

async fn serve(config: VersecastConfig) -> Result<()> {
    println!("🌿 Versecast v{}", env!("CARGO_PKG_VERSION"));

    let library = load_library(&config).await?;
    let store = PreferenceStore::new();
    let notifier = create_notifier(&config.push)?;

    let engine = Arc::new(
        SchedulerEngine::new(store.clone(), Arc::clone(&library), notifier)
            .with_mode(ScheduleMode::from(&config.schedule))
            .with_notification(config.notification.clone()),
    );

    let (stop_tx, mut stop_rx) = tokio::sync::watch::channel(());
    let scheduler = tokio::spawn(engine.run(async move {
        let _ = stop_rx.changed().await;
    }));

    let state = Arc::new(AppState::new(config, library, store));
    versecast_gateway::serve(state, async {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("Shutting down...");
    })
    .await?;

    let _ = stop_tx.send(());
    let _ = scheduler.await;
    println!("👋 Stopped.");
    Ok(())
}

fn guess_format(path: &std::path::Path) -> CorpusFormat {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => CorpusFormat::Json,
        _ => CorpusFormat::Text,
    }
}

async fn inspect(path: &std::path::Path, format: CorpusFormat) -> Result<()> {
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("corpus")
        .to_string();

    let corpus = match format {
        CorpusFormat::Json => load_file(path, format, &name).await?,
        CorpusFormat::Text => {
            let raw = tokio::fs::read(path)
                .await
                .with_context(|| format!("cannot read {}", path.display()))?;
            let (corpus, stats) = text::parse_with_stats(&String::from_utf8_lossy(&raw), &name);
            println!("Lines ignored: {}, verses before any book: {}", stats.ignored, stats.orphaned);
            corpus
        }
    };

    println!("Translation: {}", corpus.name);
    println!(
        "Books: {} | Chapters: {} | Verses: {}",
        corpus.books.len(),
        corpus.chapter_count(),
        corpus.verse_count()
    );
    for book in corpus.books.iter().filter(|b| b.verse_count() == 0) {
        println!("  ⚠️  {} has no verses", book.name);
    }
    Ok(())
}

async fn run_single_tick(
    config: &VersecastConfig,
    at: &str,
    preferences: &std::path::Path,
    send: bool,
) -> Result<()> {
    let time = chrono::NaiveTime::parse_from_str(at, "%H:%M")
        .with_context(|| format!("--at must be HH:MM, got '{at}'"))?;
    let now = chrono::Local::now().date_naive().and_time(time);

    let raw = tokio::fs::read_to_string(preferences)
        .await
        .with_context(|| format!("cannot read {}", preferences.display()))?;
    let requests: Vec<PreferenceRequest> = serde_json::from_str(&raw)?;

    let store = PreferenceStore::new();
    for request in requests {
        if let Err(e) = store.add(request) {
            tracing::warn!("Skipping preference: {e}");
        }
    }

    let notifier: Arc<dyn versecast_core::traits::Notifier> = if send {
        create_notifier(&config.push)?
    } else {
        Arc::new(LogNotifier)
    };

    let library = load_library(config).await?;
    let engine = SchedulerEngine::new(store, library, notifier)
        .with_mode(ScheduleMode::from(&config.schedule))
        .with_notification(config.notification.clone());

    let report = engine.tick(now).await;
    println!(
        "Tick {at}: {} due, {} delivered, {} failed",
        report.matched, report.delivered, report.failed
    );
    Ok(())
}
