// crates/conformance-cli/src/main.rs
// ============================================================================
// Module: Conformance CLI Entry Point
// Description: Command dispatcher for corpus checks and result rollups.
// Purpose: Provide a localized CLI over the checker, aggregator, and report.
// Dependencies: clap, conformance-config, conformance-core, conformance-corpus,
// conformance-report, serde, serde_jcs, thiserror.
// ============================================================================

//! ## Overview
//! The conformance CLI loads `conformance.toml`, runs the corpus consistency
//! checks, and reduces per-renderer results into summaries and report
//! artifacts. All user-facing strings are routed through the i18n catalog;
//! structured run events go to the configured [`EventSink`].
//!
//! Exit codes: success is `0`. A check run with violations, a failed report
//! verification, and every fatal error exit with `1`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use conformance_cli::events::CheckRunEvent;
use conformance_cli::events::EventSink;
use conformance_cli::events::ReportWrittenEvent;
use conformance_cli::events::open_event_sink;
use conformance_cli::i18n::Locale;
use conformance_cli::i18n::set_locale;
use conformance_cli::t;
use conformance_config::ConformanceConfig;
use conformance_config::VcsMode;
use conformance_core::CheckInputs;
use conformance_core::CheckReport;
use conformance_core::ConformanceStats;
use conformance_core::FeatureKey;
use conformance_core::OutcomeTable;
use conformance_core::RendererId;
use conformance_core::RendererSchema;
use conformance_core::RollupAggregator;
use conformance_core::SummaryTree;
use conformance_core::conformance_stats;
use conformance_core::outline;
use conformance_core::run_checks;
use conformance_corpus::CorpusLoader;
use conformance_corpus::LoadedCorpus;
use conformance_corpus::read_order_list;
use conformance_corpus::read_results;
use conformance_corpus::tracked_files;
use conformance_corpus::write_results;
use conformance_report::ReportBuilder;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Environment variable for CLI locale selection.
const LANG_ENV: &str = "CONFORMANCE_LANG";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "conformance", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Preferred output language (overrides `CONFORMANCE_LANG`).
    #[arg(long, value_enum, value_name = "LANG", global = true)]
    lang: Option<LangArg>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the corpus consistency checks.
    Check(CheckCommand),
    /// Write or verify the conformance report artifacts.
    Report(ReportCommand),
    /// Print the rolled-up conformance summary.
    Summary(SummaryCommand),
    /// List test documents with their titles.
    Outline(OutlineCommand),
    /// Print per-renderer pass counts as chart data.
    Stats(StatsCommand),
    /// Results table utilities.
    Results {
        /// Selected results subcommand.
        #[command(subcommand)]
        command: ResultsCommand,
    },
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Shared config location argument.
#[derive(Args, Debug)]
struct ConfigArgs {
    /// Optional config file path (defaults to conformance.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Output formats for structured CLI commands.
#[derive(ValueEnum, Copy, Clone, Debug)]
enum OutputFormat {
    /// Canonical JSON output.
    Json,
    /// Human-readable text output.
    Text,
}

/// Arguments for `check`.
#[derive(Args, Debug)]
struct CheckCommand {
    /// Config location.
    #[command(flatten)]
    config: ConfigArgs,
    /// Output format for the check report.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Skip the revision-control snapshot and the untracked-files check.
    #[arg(long = "skip-vcs", action = ArgAction::SetTrue)]
    skip_vcs: bool,
}

/// Arguments for `report`.
#[derive(Args, Debug)]
struct ReportCommand {
    /// Config location.
    #[command(flatten)]
    config: ConfigArgs,
    /// Output directory (overrides `report.output_dir`).
    #[arg(long = "output-dir", value_name = "DIR")]
    output_dir: Option<PathBuf>,
    /// Verify existing artifacts instead of writing them.
    #[arg(long, action = ArgAction::SetTrue)]
    verify: bool,
}

/// Arguments for `summary`.
#[derive(Args, Debug)]
struct SummaryCommand {
    /// Config location.
    #[command(flatten)]
    config: ConfigArgs,
    /// Output format for the summary.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

/// Arguments for `outline`.
#[derive(Args, Debug)]
struct OutlineCommand {
    /// Config location.
    #[command(flatten)]
    config: ConfigArgs,
    /// Restrict the listing to one feature key (for example `e-rect`).
    #[arg(long, value_name = "KEY")]
    feature: Option<FeatureKey>,
}

/// Arguments for `stats`.
#[derive(Args, Debug)]
struct StatsCommand {
    /// Config location.
    #[command(flatten)]
    config: ConfigArgs,
}

/// Results subcommands.
#[derive(Subcommand, Debug)]
enum ResultsCommand {
    /// Rewrite the results table in order-list order.
    Sync(ResultsSyncCommand),
}

/// Arguments for `results sync`.
#[derive(Args, Debug)]
struct ResultsSyncCommand {
    /// Config location.
    #[command(flatten)]
    config: ConfigArgs,
    /// Output path (defaults to `corpus.results_file`).
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a conformance configuration file.
    Validate(ConfigValidateCommand),
}

/// Arguments for config validation.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Config location.
    #[command(flatten)]
    config: ConfigArgs,
}

/// Supported CLI language selections.
#[derive(ValueEnum, Copy, Clone, Debug)]
enum LangArg {
    /// English.
    En,
    /// Catalan.
    Ca,
}

impl From<LangArg> for Locale {
    fn from(value: LangArg) -> Self {
        match value {
            LangArg::En => Self::En,
            LangArg::Ca => Self::Ca,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for localized error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a localized message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let env_lang = std::env::var(LANG_ENV).ok();
    let locale = resolve_locale(cli.lang, env_lang.as_deref())?;
    set_locale(locale);
    if locale != Locale::En {
        write_stderr_line(&t!("i18n.disclaimer.machine_translated"))
            .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    }

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Check(command) => command_check(&command),
        Commands::Report(command) => command_report(&command),
        Commands::Summary(command) => command_summary(&command),
        Commands::Outline(command) => command_outline(&command),
        Commands::Stats(command) => command_stats(&command),
        Commands::Results {
            command,
        } => command_results(command),
        Commands::Config {
            command,
        } => command_config(command),
    }
}

/// Emits the top-level help message for the CLI.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Check Command
// ============================================================================

/// Executes the `check` command.
fn command_check(command: &CheckCommand) -> CliResult<ExitCode> {
    let config = load_config(&command.config)?;
    let sink = open_sink(&config)?;
    let schema = renderer_schema(&config)?;
    let layout =
        config.report_layout().map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    let check_config =
        config.check_config().map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;

    let loaded = load_corpus(&config)?;
    let order = config
        .order_file()
        .map(|path| read_order_list(&path))
        .transpose()
        .map_err(|err| CliError::new(t!("order.load_failed", error = err)))?;
    let outcomes = config
        .results_file()
        .map(|path| read_results(&path, &schema))
        .transpose()
        .map_err(|err| CliError::new(t!("results.load_failed", error = err)))?;
    let tracked = if command.skip_vcs || config.corpus.vcs == VcsMode::None {
        None
    } else {
        Some(
            tracked_files(&config.corpus_root())
                .map_err(|err| CliError::new(t!("vcs.failed", error = err)))?,
        )
    };

    let inputs = CheckInputs {
        order: order.as_ref(),
        outcomes: outcomes.as_ref(),
        schema: Some(&schema),
        layout: Some(&layout),
        present_files: Some(&loaded.present_files),
        tracked_files: tracked.as_ref(),
        ..CheckInputs::new(&loaded.corpus, &loaded.texts)
    };
    let report = run_checks(&inputs, &check_config);
    sink.record_check_run(&CheckRunEvent::from_report(&report));

    match command.format {
        OutputFormat::Json => write_canonical_json(&report)?,
        OutputFormat::Text => write_check_text(&report)?,
    }
    Ok(if report.is_clean() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Writes the human-readable check digest to stdout.
fn write_check_text(report: &CheckReport) -> CliResult<()> {
    let mut output = String::new();
    output.push_str(&t!(
        "check.summary",
        cases = report.cases_checked,
        checks = report.checks_run.len(),
        skipped = report.checks_skipped.len()
    ));
    output.push('\n');
    if report.is_clean() {
        output.push_str(&t!("check.pass"));
        output.push('\n');
    } else {
        output.push_str(&t!("check.fail", count = report.violations.len()));
        output.push('\n');
        for line in report.digest_lines() {
            output.push_str(&line);
            output.push('\n');
        }
    }
    write_stdout_bytes(output.as_bytes()).map_err(|err| CliError::new(output_error("stdout", &err)))
}

// ============================================================================
// SECTION: Report Commands
// ============================================================================

/// Executes the `report` command.
fn command_report(command: &ReportCommand) -> CliResult<ExitCode> {
    let config = load_config(&command.config)?;
    let sink = open_sink(&config)?;
    let (tree, stats) = build_summary(&config)?;
    let output_dir = command.output_dir.clone().unwrap_or_else(|| config.report_dir());
    let builder = ReportBuilder::new(tree, stats);

    let manifest = if command.verify {
        builder
            .verify_output(&output_dir)
            .map_err(|err| CliError::new(t!("report.failed", error = err)))?;
        builder.build().map_err(|err| CliError::new(t!("report.failed", error = err)))?.manifest
    } else {
        builder
            .write_to(&output_dir)
            .map_err(|err| CliError::new(t!("report.failed", error = err)))?
    };
    sink.record_report_written(&ReportWrittenEvent::new(
        &output_dir,
        manifest.summary_digest.clone(),
        manifest.feature_count,
        manifest.test_count,
        command.verify,
    ));

    let message = if command.verify {
        t!("report.verified", path = output_dir.display())
    } else {
        t!(
            "report.written",
            path = output_dir.display(),
            artifacts = manifest.artifacts.len(),
            digest = manifest.summary_digest.value
        )
    };
    write_stdout_line(&message).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the `summary` command.
fn command_summary(command: &SummaryCommand) -> CliResult<ExitCode> {
    let config = load_config(&command.config)?;
    let (tree, _) = build_summary(&config)?;
    match command.format {
        OutputFormat::Json => write_canonical_json(&tree)?,
        OutputFormat::Text => write_summary_text(&tree)?,
    }
    Ok(ExitCode::SUCCESS)
}

/// Writes the summary tree as indented text.
fn write_summary_text(tree: &SummaryTree) -> CliResult<()> {
    let mut output = String::new();
    output.push_str(&t!(
        "summary.header",
        features = tree.feature_count(),
        tests = tree.test_count()
    ));
    output.push('\n');
    for category in &tree.categories {
        output.push_str(&t!("summary.category", title = category.title));
        output.push('\n');
        for feature in &category.features {
            let rollups = feature
                .rollups
                .iter()
                .map(|rollup| {
                    t!(
                        "summary.rollup",
                        renderer = rollup.renderer,
                        status = rollup.status.as_str(),
                        covered = rollup.covered,
                        total = rollup.total
                    )
                })
                .collect::<Vec<_>>()
                .join(", ");
            output.push_str(&t!("summary.feature", feature = feature.feature_key, rollups = rollups));
            output.push('\n');
        }
    }
    write_stdout_bytes(output.as_bytes()).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Executes the `stats` command.
fn command_stats(command: &StatsCommand) -> CliResult<ExitCode> {
    let config = load_config(&command.config)?;
    let schema = renderer_schema(&config)?;
    let outcomes = load_outcomes(&config, &schema)?;
    let stats = conformance_stats(&schema, &outcomes)
        .map_err(|err| CliError::new(t!("stats.failed", error = err)))?;
    write_canonical_json(&stats)?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Outline Command
// ============================================================================

/// Executes the `outline` command.
fn command_outline(command: &OutlineCommand) -> CliResult<ExitCode> {
    let config = load_config(&command.config)?;
    let loaded = load_corpus(&config)?;
    let listing = outline(&loaded.corpus, command.feature.as_ref());
    if listing.entries.is_empty() {
        write_stdout_line(&t!("outline.empty"))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }
    let mut output = String::new();
    for entry in &listing.entries {
        output.push_str(&t!("outline.entry", id = entry.id, title = entry.title));
        output.push('\n');
    }
    write_stdout_bytes(output.as_bytes())
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    for warning in &listing.warnings {
        write_stderr_line(&t!(
            "outline.warning",
            title = warning.title,
            first = warning.first,
            second = warning.second
        ))
        .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Results Commands
// ============================================================================

/// Dispatches results subcommands.
fn command_results(command: ResultsCommand) -> CliResult<ExitCode> {
    match command {
        ResultsCommand::Sync(command) => command_results_sync(&command),
    }
}

/// Executes the `results sync` command.
fn command_results_sync(command: &ResultsSyncCommand) -> CliResult<ExitCode> {
    let config = load_config(&command.config)?;
    let schema = renderer_schema(&config)?;
    let order_path =
        config.order_file().ok_or_else(|| CliError::new(t!("order.not_configured")))?;
    let order = read_order_list(&order_path)
        .map_err(|err| CliError::new(t!("order.load_failed", error = err)))?;
    let output = command
        .output
        .clone()
        .or_else(|| config.results_file())
        .ok_or_else(|| CliError::new(t!("results.not_configured")))?;

    let existing = match config.results_file().filter(|path| path.exists()) {
        Some(path) => read_results(&path, &schema)
            .map_err(|err| CliError::new(t!("results.load_failed", error = err)))?,
        None => empty_outcomes(&schema)?,
    };
    let resynced = existing
        .resync(&schema, &order)
        .map_err(|err| CliError::new(t!("results.sync.failed", error = err)))?;
    write_results(&output, &schema, &resynced)
        .map_err(|err| CliError::new(t!("results.sync.failed", error = err)))?;
    write_stdout_line(&t!("results.sync.ok", path = output.display(), count = resynced.len()))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Builds an empty table with one column per schema renderer.
fn empty_outcomes(schema: &RendererSchema) -> CliResult<OutcomeTable> {
    let renderers: Vec<RendererId> =
        schema.renderers().iter().map(|renderer| renderer.id.clone()).collect();
    OutcomeTable::new(renderers)
        .map_err(|err| CliError::new(t!("results.sync.failed", error = err)))
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(command) => command_config_validate(&command),
    }
}

/// Executes the config validation command.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let _config = load_config(&command.config)?;
    write_stdout_line(&t!("config.validate.ok"))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Pipeline Helpers
// ============================================================================

/// Loads and validates the configuration.
fn load_config(args: &ConfigArgs) -> CliResult<ConformanceConfig> {
    ConformanceConfig::load(args.config.as_deref())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))
}

/// Opens the configured event sink.
fn open_sink(config: &ConformanceConfig) -> CliResult<Box<dyn EventSink>> {
    let path = config.logging.path.as_deref().map(|value| config.resolve(value));
    open_event_sink(config.logging.enabled, path.as_deref()).map_err(|err| {
        let label = path.as_deref().map_or_else(String::new, |path| path.display().to_string());
        CliError::new(t!("events.open_failed", path = label, error = err))
    })
}

/// Builds the renderer schema from configuration.
fn renderer_schema(config: &ConformanceConfig) -> CliResult<RendererSchema> {
    config.renderer_schema().map_err(|err| CliError::new(t!("config.load_failed", error = err)))
}

/// Loads every document under the corpus root.
fn load_corpus(config: &ConformanceConfig) -> CliResult<LoadedCorpus> {
    CorpusLoader::new(config.corpus_root(), config.corpus.extension.clone())
        .with_max_document_bytes(config.corpus.max_document_bytes)
        .load()
        .map_err(|err| CliError::new(t!("corpus.load_failed", error = err)))
}

/// Loads the results table, which must be configured.
fn load_outcomes(config: &ConformanceConfig, schema: &RendererSchema) -> CliResult<OutcomeTable> {
    let path = config.results_file().ok_or_else(|| CliError::new(t!("results.not_configured")))?;
    read_results(&path, schema).map_err(|err| CliError::new(t!("results.load_failed", error = err)))
}

/// Rolls up the results table and computes chart data.
fn build_summary(config: &ConformanceConfig) -> CliResult<(SummaryTree, ConformanceStats)> {
    let schema = renderer_schema(config)?;
    let layout =
        config.report_layout().map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    let outcomes = load_outcomes(config, &schema)?;
    let loaded = load_corpus(config)?;
    let tree = RollupAggregator::new(&schema, &layout)
        .with_corpus(&loaded.corpus)
        .aggregate(&outcomes)
        .map_err(|err| CliError::new(t!("summary.failed", error = err)))?;
    let stats = conformance_stats(&schema, &outcomes)
        .map_err(|err| CliError::new(t!("stats.failed", error = err)))?;
    Ok((tree, stats))
}

/// Resolves the CLI locale from flags or environment.
fn resolve_locale(lang: Option<LangArg>, env_lang: Option<&str>) -> CliResult<Locale> {
    if let Some(lang) = lang {
        return Ok(lang.into());
    }
    if let Some(value) = env_lang {
        return Locale::parse(value).ok_or_else(|| {
            CliError::new(t!("i18n.lang.invalid_env", env = LANG_ENV, value = value))
        });
    }
    Ok(Locale::En)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes raw bytes to stdout without adding a newline.
fn write_stdout_bytes(bytes: &[u8]) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(bytes)
}

/// Writes canonical JSON to stdout followed by a newline.
fn write_canonical_json<T: Serialize>(value: &T) -> CliResult<()> {
    let mut bytes = serde_jcs::to_vec(value)
        .map_err(|err| CliError::new(t!("output.json_failed", error = err)))?;
    bytes.push(b'\n');
    write_stdout_bytes(&bytes).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats a localized output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}

