//! Command line surface of the maintenance tools.

use std::io::Write;
use std::num::NonZeroUsize;
use std::path::{
    Path,
    PathBuf,
};

use clap::{
    CommandFactory,
    Parser,
    Subcommand,
    ValueEnum,
};
use thiserror::Error;

use crate::config::{
    ConfigError,
    ConfigManager,
    InputMatcher,
    MatcherError,
};
use crate::input::dictionary::DictionaryError;
use crate::pipeline::{
    MergeMode,
    MergeOptions,
    PipelineError,
    coverage_report,
    merge_files,
    split_batches,
    write_batches,
};
use crate::rewrite::Node;
use crate::session::storage::FileStorage;
use crate::session::{
    LocaleSession,
    SessionOptions,
};
use crate::store::{
    DictionaryStore,
    StoreError,
};
use crate::types::Locale;

#[derive(Parser, Debug)]
#[command(name = "market-i18n", version, about = "Dictionary maintenance for the marketplace front-end")]
pub struct Cli {
    /// Workspace root; relative paths in the configuration resolve against it.
    #[arg(long, global = true, value_name = "DIR", default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file (defaults to `.market-i18n.json` in the workspace).
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write logs to this file instead of stderr.
    #[arg(long, global = true, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Report translated and missing keys per locale.
    Coverage {
        /// Number of missing keys listed per locale.
        #[arg(long, value_name = "N")]
        sample: Option<usize>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Export the default dictionary as numbered batch files.
    Split {
        /// Entries per batch (defaults to `batch.size`).
        batch_size: Option<NonZeroUsize>,
    },

    /// Apply translated batch files to a locale dictionary.
    Merge {
        /// Target locale; must be enabled and not the default.
        locale: Locale,

        /// Batch files or glob patterns, relative to the workspace.
        #[arg(required = true, value_name = "FILES")]
        files: Vec<String>,

        /// Batch keys are default source strings instead of key paths.
        #[arg(long)]
        by_source_text: bool,
    },

    /// Print a UI tree (JSON) auto-translated into a locale.
    Rewrite {
        /// Locale to render in.
        locale: Locale,

        /// React-shaped element JSON, relative to the workspace.
        tree_file: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Matcher(#[from] MatcherError),

    #[error(transparent)]
    Dictionary(#[from] DictionaryError),

    #[error("Failed to read UI tree '{}': {source}", path.display())]
    Tree {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse UI tree '{}': {source}", path.display())]
    TreeParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),

    #[error("Failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

impl CliError {
    /// True for errors caused by the invocation rather than the environment.
    #[must_use]
    pub const fn is_usage(&self) -> bool {
        matches!(
            self,
            Self::Pipeline(
                PipelineError::DefaultLocaleTarget(_)
                    | PipelineError::UnsupportedLocale(_)
                    | PipelineError::NoInputFiles
            )
        )
    }

    /// Process exit status: 2 for usage errors, 1 otherwise.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        if self.is_usage() { 2 } else { 1 }
    }
}

/// Writes `error: ...` to `err`, followed by the usage line for usage errors.
///
/// Independent of the log filter, so a failure is always visible.
pub fn write_error(error: &CliError, err: &mut impl Write) -> std::io::Result<()> {
    writeln!(err, "error: {error}")?;
    if error.is_usage() {
        writeln!(err, "{}", Cli::command().render_usage())?;
    }
    Ok(())
}

/// Runs the parsed command, writing results to `out`.
pub fn run(cli: &Cli, out: &mut impl Write) -> Result<(), CliError> {
    let mut config_manager = ConfigManager::new(cli.workspace.clone());
    config_manager.load_settings(cli.config.as_deref())?;

    match &cli.command {
        Command::Coverage { sample, format } => run_coverage(&config_manager, *sample, *format, out),
        Command::Split { batch_size } => run_split(&config_manager, *batch_size, out),
        Command::Merge { locale, files, by_source_text } => {
            let mode = if *by_source_text { MergeMode::SourceText } else { MergeMode::Key };
            run_merge(&config_manager, *locale, files, mode, out)
        }
        Command::Rewrite { locale, tree_file } => run_rewrite(&config_manager, *locale, tree_file, out),
    }
}

/// Loads only the default dictionary.
fn load_default_store(config_manager: &ConfigManager) -> Result<DictionaryStore, StoreError> {
    let default_locale = config_manager.get_settings().default_locale();
    DictionaryStore::load(&config_manager.locales_dir(), default_locale, &[default_locale])
}

/// Loads every enabled locale.
fn load_store(config_manager: &ConfigManager) -> Result<DictionaryStore, StoreError> {
    let settings = config_manager.get_settings();
    DictionaryStore::load(
        &config_manager.locales_dir(),
        settings.default_locale(),
        &settings.supported_locales(),
    )
}

/// `coverage`
fn run_coverage(
    config_manager: &ConfigManager,
    sample: Option<usize>,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let settings = config_manager.get_settings();
    let store = load_store(config_manager)?;

    let report = coverage_report(
        &store,
        &settings.translation_targets(),
        &settings.key_separator,
        sample.unwrap_or(settings.coverage.sample_size),
    );

    match format {
        OutputFormat::Text => write!(out, "{report}")?,
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?,
    }
    Ok(())
}

/// `split`
fn run_split(
    config_manager: &ConfigManager,
    batch_size: Option<NonZeroUsize>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let settings = config_manager.get_settings();
    let batch_size = batch_size
        .or_else(|| NonZeroUsize::new(settings.batch.size))
        .unwrap_or(NonZeroUsize::MIN);
    let store = load_default_store(config_manager)?;

    let entries = store.default_dictionary().entries(&settings.key_separator);
    let batches = split_batches(&entries, batch_size);
    let dir = config_manager.batch_dir();
    let written = write_batches(&dir, &settings.batch.file_prefix, &batches)?;

    tracing::info!(
        entries = entries.len(),
        batches = written.len(),
        dir = %dir.display(),
        "Split finished"
    );
    writeln!(
        out,
        "Wrote {} batch file(s) of up to {batch_size} entries to {}",
        written.len(),
        dir.display()
    )?;
    for path in &written {
        writeln!(out, "  {}", path.display())?;
    }
    Ok(())
}

/// `merge`; inputs are expanded against the workspace first.
fn run_merge(
    config_manager: &ConfigManager,
    locale: Locale,
    inputs: &[String],
    mode: MergeMode,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let settings = config_manager.get_settings();
    let matcher = InputMatcher::new(config_manager.workspace_root().to_path_buf(), settings)?;
    let files = matcher.expand(inputs)?;
    let store = load_default_store(config_manager)?;

    let options = MergeOptions { mode, key_separator: settings.key_separator.clone() };
    let report = merge_files(
        &store,
        &config_manager.locales_dir(),
        locale,
        &settings.supported_locales(),
        &files,
        &options,
    )?;

    writeln!(out, "{report}")?;
    Ok(())
}

/// `rewrite`; the locale choice goes through the persisted session.
fn run_rewrite(
    config_manager: &ConfigManager,
    locale: Locale,
    tree_file: &Path,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let path = config_manager.workspace_root().join(tree_file);
    let content = std::fs::read_to_string(&path)
        .map_err(|source| CliError::Tree { path: path.clone(), source })?;
    let value = serde_json::from_str(&content)
        .map_err(|source| CliError::TreeParse { path: path.clone(), source })?;
    let tree = Node::from_json(value);

    let store = load_store(config_manager)?;
    let storage = FileStorage::new(config_manager.session_storage_file());
    let mut session =
        LocaleSession::init(store, storage, SessionOptions::from(config_manager.get_settings()));
    let effective = session.set_locale(locale);
    if effective != locale {
        tracing::warn!(%locale, %effective, "Locale not enabled, rendering the default");
    }

    let translated = session.auto_translate(&tree);
    writeln!(out, "{}", serde_json::to_string_pretty(&translated.to_json())?)?;
    Ok(())
}
