//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use walkscore_core::pipeline::{self, ProgressReporter, RunConfig, RunSummary};
use walkscore_shared::{
    AppConfig, InputRecord, WalkScoreError, init_config, load_config, load_config_from,
};

/// Crates whose events are shown at the `-v` derived level.
const LOG_TARGETS: &[&str] = &[
    "walkscore",
    "walkscore_core",
    "walkscore_fetcher",
    "walkscore_extractor",
    "walkscore_shared",
];

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// walkscore: look up walk scores for a table of cities.
#[derive(Parser)]
#[command(
    name = "walkscore",
    version,
    about = "Fetch walk scores for the cities in input_cities.csv and print them as CSV.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (defaults to ./walkscore.toml when present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Input CSV file, overriding `input.path`.
    #[arg(long, global = true)]
    pub input: Option<PathBuf>,

    /// Site to query, overriding `fetch.base_url`.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Per-request timeout in seconds, overriding `fetch.timeout_secs`.
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Command>,
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
    /// Fetch scores and print the result table (the default).
    Run,

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
    /// Write a default walkscore.toml into the working directory.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Events go to stderr so stdout only
/// carries the result table.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(level)));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
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

fn default_filter(level: &str) -> String {
    LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        None | Some(Command::Run) => {
            let config = resolve_config(&cli)?;
            cmd_run(&config).await
        }
        Some(Command::Config { action }) => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => {
                let config = resolve_config(&cli)?;
                cmd_config_show(&config)
            }
        },
    }
}

/// Load the config file, apply CLI overrides, and validate the result.
fn resolve_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config(&current_dir()?)?,
    };

    apply_overrides(&mut config, cli);
    config.validate()?;
    Ok(config)
}

/// CLI flags win over config file values.
fn apply_overrides(config: &mut AppConfig, cli: &Cli) {
    if let Some(input) = &cli.input {
        config.input.path = input.clone();
    }
    if let Some(base_url) = &cli.base_url {
        config.fetch.base_url = base_url.clone();
    }
    if let Some(timeout_secs) = cli.timeout_secs {
        config.fetch.timeout_secs = timeout_secs;
    }
}

fn current_dir() -> Result<PathBuf> {
    std::env::current_dir().map_err(|e| eyre!("cannot determine working directory: {e}"))
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_run(config: &AppConfig) -> Result<()> {
    let run_config = RunConfig::from(config);

    info!(
        input = %run_config.input_path.display(),
        base_url = %run_config.fetch.base_url,
        timeout_secs = run_config.fetch.timeout_secs,
        "processing cities"
    );

    let reporter = CliProgress::new();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    pipeline::run(&run_config, &mut out, &reporter).await?;
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config(&current_dir()?)?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config: &AppConfig) -> Result<()> {
    let toml_str = toml::to_string_pretty(config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Progress reporting
// ---------------------------------------------------------------------------

/// Spinner on stderr; indicatif hides it when stderr is not a terminal.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn record_started(&self, record: &InputRecord, current: usize, total: usize) {
        self.spinner.set_message(format!(
            "Fetching [{current}/{total}] {}/{}",
            record.region_code, record.locality_name
        ));
    }

    fn record_skipped(&self, _record: &InputRecord, _error: &WalkScoreError) {
        self.spinner.tick();
    }

    fn done(&self, _summary: &RunSummary) {
        self.spinner.finish_and_clear();
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        // Fatal errors skip `done`; don't leave a spinner behind.
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_arguments_means_run() {
        let cli = Cli::try_parse_from(["walkscore"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.input.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn overrides_win() {
        let cli = Cli::try_parse_from([
            "walkscore",
            "run",
            "--input",
            "cities.csv",
            "--base-url",
            "http://localhost:9000",
            "--timeout-secs",
            "7",
        ])
        .unwrap();

        let mut config = AppConfig::default();
        apply_overrides(&mut config, &cli);

        assert_eq!(config.input.path, PathBuf::from("cities.csv"));
        assert_eq!(config.fetch.base_url, "http://localhost:9000");
        assert_eq!(config.fetch.timeout_secs, 7);
        config.validate().unwrap();
    }

    #[test]
    fn no_overrides_keep_config() {
        let cli = Cli::try_parse_from(["walkscore", "-vv"]).unwrap();
        let mut config = AppConfig::default();
        apply_overrides(&mut config, &cli);

        assert_eq!(config.input.path, PathBuf::from("input_cities.csv"));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn explicit_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[fetch]\ntimeout_secs = 12\n").unwrap();

        let cli = Cli::try_parse_from([
            "walkscore",
            "--config",
            path.to_str().unwrap(),
            "config",
            "show",
        ])
        .unwrap();

        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.fetch.timeout_secs, 12);
        assert!(matches!(
            cli.command,
            Some(Command::Config {
                action: ConfigAction::Show
            })
        ));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let cli = Cli::try_parse_from(["walkscore", "--timeout-secs", "0"]).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("walkscore.toml");
        std::fs::write(&path, "").unwrap();

        let mut config = load_config_from(&path).unwrap();
        apply_overrides(&mut config, &cli);
        assert!(config.validate().is_err());
    }

    #[test]
    fn default_filter_covers_workspace() {
        let filter = default_filter("debug");
        assert!(filter.contains("walkscore=debug"));
        assert!(filter.contains("walkscore_fetcher=debug"));
    }
}
