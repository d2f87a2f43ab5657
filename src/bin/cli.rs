//! PhishGuard CLI
//!
//! Submits URL batches to the classification service and presents the
//! verdicts of the current session.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use phishguard::{
    error::{AppError, Result},
    models::{Config, FileCandidate, SelectionSource, TrainingStatus, format_percent},
    pipeline::{self, AnalysisResults, Navigation, ResultsView, SubmitView},
    services::{
        ExportGenerator, FileIngestor, ResponseParser, TrainingTrigger, UploadClient,
        render_table,
    },
    storage::{ResultStore, SessionStore, default_session_id},
    utils::{console, http},
};

/// PhishGuard - Phishing URL Detection Client
#[derive(Parser, Debug)]
#[command(
    name = "phishguard",
    version,
    about = "Phishing URL detection client"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "storage/config.toml")]
    config: PathBuf,

    /// Session whose results are read and written [default: this terminal]
    #[arg(long, env = "PHISHGUARD_SESSION")]
    session: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress console output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload a CSV of URLs for analysis
    Submit {
        file: PathBuf,
        /// Override the media type inferred from the extension
        #[arg(long)]
        media_type: Option<String>,
        /// Treat the file as dropped rather than picked
        #[arg(long = "drop")]
        dropped: bool,
    },

    /// Show the results of the last submission
    Results {
        /// Empty the result slot after reading
        #[arg(long)]
        consume: bool,
        /// Also export the results as CSV into this directory
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Submit a file and show its results
    Analyze {
        file: PathBuf,
        #[arg(long)]
        media_type: Option<String>,
    },

    /// Export the results of the last submission as CSV
    Export {
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Retrain the detection model
    Train,

    /// Validate the configuration
    Validate,

    /// End the session and discard its results
    Clear,
}

/// Initialize logging based on verbosity flag.
///
/// Without `RUST_LOG` the logger lets every record through and the global
/// max level does the filtering, so the configured level can be applied
/// once the config file has been read.
fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("trace"))
        .format_timestamp_secs()
        .init();
    if !env_override() {
        log::set_max_level(level);
    }
}

/// Apply `logging.level` unless `RUST_LOG` or `--verbose` already decided.
fn apply_config_level(verbose: bool, level: &str) {
    if verbose || env_override() {
        return;
    }
    match level.parse::<log::LevelFilter>() {
        Ok(filter) => log::set_max_level(filter),
        Err(_) => log::warn!("Unknown logging.level '{}', keeping info", level),
    }
}

fn env_override() -> bool {
    std::env::var_os("RUST_LOG").is_some()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = Config::load_or_default(&cli.config);
    apply_config_level(cli.verbose, &config.logging.level);
    console::set_quiet(cli.quiet);

    let session = cli.session.clone().unwrap_or_else(default_session_id);
    let store = SessionStore::new(&config.store.root_dir, &session)?;
    log::debug!("Session store at {}", store.session_dir().display());

    match cli.command {
        Command::Submit {
            file,
            media_type,
            dropped,
        } => {
            let source = if dropped {
                SelectionSource::Drop
            } else {
                SelectionSource::Picker
            };
            submit(&config, &store, &file, media_type, source).await?;
        }

        Command::Results { consume, export } => {
            show_results(&config, &store, consume, export.as_deref()).await?;
        }

        Command::Analyze { file, media_type } => {
            let nav = submit(&config, &store, &file, media_type, SelectionSource::Picker).await?;
            if nav == Navigation::Results {
                show_results(&config, &store, false, None).await?;
            }
        }

        Command::Export { output } => {
            let parser = ResponseParser::new()?;
            match pipeline::load_results(&store, &parser, &config.store.key, false).await? {
                ResultsView::Ready(results) => {
                    let path = ExportGenerator::new(&config.export)
                        .write(&output, &results.records)
                        .await?;
                    console::success(&format!("Exported to {}", path.display()));
                }
                ResultsView::NoData => console::failure("No records to export"),
                ResultsView::Redirect => redirect_hint(),
            }
        }

        Command::Train => train(&config).await?,

        Command::Validate => {
            log::info!("Validating configuration...");
            let config = Config::load(&cli.config).inspect_err(|e| {
                log::error!("Cannot read {}: {}", cli.config.display(), e);
            })?;
            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            console::success("Config OK");
        }

        Command::Clear => {
            store.end_session().await?;
            console::success(&format!("Session '{}' cleared", session));
        }
    }

    Ok(())
}

async fn submit(
    config: &Config,
    store: &dyn ResultStore,
    path: &Path,
    media_type: Option<String>,
    source: SelectionSource,
) -> Result<Navigation> {
    let mut candidate = FileCandidate::from_path(path).await?.with_source(source);
    if let Some(media_type) = media_type {
        candidate = candidate.with_media_type(media_type);
    }

    let mut view = SubmitView::new(FileIngestor::new(&config.ingest));
    if let Err(e) = view.select(candidate) {
        console::failure(view.error().unwrap_or_default());
        return Err(AppError::from(e));
    }
    if let Some(file) = view.selected() {
        console::success(&format!("{} ({})", file.name, file.display_size()));
    }

    let client = http::create_async_client(&config.service)?;
    let uploader = UploadClient::new(client, &config.service)?;
    console::progress("Analyzing...");
    let nav = view.submit(&uploader, store, &config.store.key).await?;
    console::end_progress();

    match nav {
        Navigation::Results => console::success("Analysis complete. Run `phishguard results`."),
        Navigation::Submission => console::failure(view.error().unwrap_or_default()),
    }
    Ok(nav)
}

async fn show_results(
    config: &Config,
    store: &dyn ResultStore,
    consume: bool,
    export: Option<&Path>,
) -> Result<()> {
    let parser = ResponseParser::new()?;
    match pipeline::load_results(store, &parser, &config.store.key, consume).await? {
        ResultsView::Redirect => redirect_hint(),
        ResultsView::NoData => {
            console::header("Analysis Results");
            console::failure("No data: the report contained no rows");
        }
        ResultsView::Ready(results) => {
            print_results(&results);
            if let Some(dir) = export {
                let path = ExportGenerator::new(&config.export)
                    .write(dir, &results.records)
                    .await?;
                console::success(&format!("Exported to {}", path.display()));
            }
        }
    }
    Ok(())
}

fn print_results(results: &AnalysisResults) {
    let summary = &results.summary;
    console::header(&format!("{} URLs Analyzed", summary.total));
    console::block(&summary.headline());
    console::summary(
        "Verdicts",
        &[
            ("Total Processed", summary.total.to_string()),
            (
                "Legitimate",
                format!(
                    "{} ({} of total)",
                    summary.legitimate_count,
                    format_percent(summary.legitimate_percent)
                ),
            ),
            (
                "Suspicious",
                format!(
                    "{} ({} of total)",
                    summary.suspicious_count,
                    format_percent(summary.suspicious_percent)
                ),
            ),
            ("Unclassified", summary.unknown_count.to_string()),
        ],
    );

    console::header("Distribution");
    console::block(&results.chart().render());
    console::header("Detailed Results");
    console::block(&render_table(&results.records));
}

fn redirect_hint() {
    console::failure(
        "No analysis results in this session. Submit a file first: `phishguard submit <FILE>`",
    );
}

async fn train(config: &Config) -> Result<()> {
    let client = http::create_async_client(&config.service)?;
    let trigger = TrainingTrigger::new(client, &config.service, &config.training)?;

    console::header("Model Training");
    let run = pipeline::run_training(&trigger, |run| {
        if run.is_running() {
            console::progress(&format!("{:>3.0}% {}", run.progress, run.stage()));
        }
    })
    .await?;
    console::end_progress();

    match run.status {
        TrainingStatus::Succeeded => {
            console::success(run.message.as_deref().unwrap_or_default())
        }
        _ => console::failure(run.message.as_deref().unwrap_or_default()),
    }
    Ok(())
}
