//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use quarry_core::{
    DirSink, DocumentOutcome, NullSink, OutputSink, ProgressReporter, RunReport,
    TransformPipeline, run_pipeline,
};
use quarry_shared::{DocumentIdentity, QuarryError, init_config, load_config};
use quarry_vault::{DiscoverOptions, PermalinkIndex, discover};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Quarry — turn a vault of Markdown notes into TSX component modules.
#[derive(Parser)]
#[command(
    name = "quarry",
    version,
    about = "Transform a tree of Markdown notes into formatted component modules.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Transform every note under a vault root.
    Build {
        /// Vault root directory containing the Markdown notes.
        root: PathBuf,

        /// Write generated modules to the output directory.
        /// Without this flag modules are computed but not persisted.
        #[arg(long)]
        write: bool,

        /// Output directory for generated modules (implies nothing unless
        /// --write is set; defaults to the configured output dir).
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Maximum transform invocations in flight at once.
        #[arg(short, long)]
        concurrency: Option<usize>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "quarry=info",
        1 => "quarry=debug",
        _ => "quarry=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Build {
            root,
            write,
            out,
            concurrency,
        } => cmd_build(&root, write, out.as_deref(), concurrency).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

// ---------------------------------------------------------------------------
// build
// ---------------------------------------------------------------------------

async fn cmd_build(
    root: &Path,
    write: bool,
    out: Option<&Path>,
    concurrency: Option<usize>,
) -> Result<()> {
    let config = load_config()?;

    // Fatal upstream stages: discovery and index build happen before any
    // document is processed.
    let opts = DiscoverOptions {
        ignore: config.discovery.ignore.clone(),
    };
    let paths = discover(root, &opts)?;
    if paths.is_empty() {
        println!("no notes found under {}", root.display());
        return Ok(());
    }

    let index = Arc::new(PermalinkIndex::build(root, &paths));
    info!(
        notes = paths.len(),
        permalinks = index.len(),
        "vault indexed"
    );

    let pipeline = TransformPipeline::new(index, config.component.clone());
    let limit = concurrency.unwrap_or(config.pipeline.concurrency);

    let progress = BarProgress::new(paths.len() as u64);
    let report = run_pipeline(paths, pipeline, limit, &progress).await;
    progress.finish();

    // Informational channel first: every result, even if persistence
    // fails later.
    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(text) => println!("ok    {} ({} bytes)", outcome.path.display(), text.len()),
            Err(_) => println!("fail  {}", outcome.path.display()),
        }
    }

    // Persistence is explicitly invoked, never implicit.
    let sink: Box<dyn OutputSink> = if write || config.output.write {
        let out_dir = out.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from(&config.output.dir));
        Box::new(DirSink::new(out_dir)?)
    } else {
        Box::new(NullSink)
    };
    let persist_failures = persist_outcomes(sink.as_ref(), &report);

    // Diagnostic channel: the full failure set, not just the first.
    for outcome in report.failures() {
        if let Err(e) = &outcome.result {
            eprintln!("{}: {e}", outcome.path.display());
        }
    }
    for (path, e) in &persist_failures {
        eprintln!("{}: {e}", path.display());
    }

    let failed = report.failure_count() + persist_failures.len();
    if failed > 0 {
        return Err(eyre!(
            "{failed} of {} documents failed",
            report.outcomes.len()
        ));
    }

    Ok(())
}

/// Persist every successful outcome, collecting write failures instead of
/// aborting the batch on the first one.
fn persist_outcomes(sink: &dyn OutputSink, report: &RunReport) -> Vec<(PathBuf, QuarryError)> {
    let mut failures = Vec::new();
    for outcome in &report.outcomes {
        if let Ok(text) = &outcome.result {
            let slug = DocumentIdentity::from_path(&outcome.path).slug;
            if let Err(e) = sink.persist(&slug, text) {
                failures.push((outcome.path.clone(), e));
            }
        }
    }
    failures
}

// ---------------------------------------------------------------------------
// Progress bar adapter
// ---------------------------------------------------------------------------

/// Adapts the coordinator's progress callbacks to an indicatif bar.
struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    fn new(total: u64) -> Self {
        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
                .expect("valid progress template"),
        );
        Self { bar }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressReporter for BarProgress {
    fn document_done(&self, outcome: &DocumentOutcome, _done: usize, _total: usize) {
        if let Some(name) = outcome.path.file_name() {
            self.bar.set_message(name.to_string_lossy().into_owned());
        }
        self.bar.inc(1);
    }
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("wrote {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config = load_config()?;
    let rendered = toml::to_string_pretty(&config)?;
    print!("{rendered}");
    Ok(())
}
