use anyhow::{Context as AnyhowContext, Result};
use clap::{Parser, ValueEnum};
use disclosure_scanner::{Language, Layer, ScanReport, Scanner, ScannerConfig};
use std::io;
use std::path::PathBuf;

/// Every file produced records
pub const EXIT_OK: i32 = 0;

/// At least one file produced an error entry; the report was still printed
pub const EXIT_PARTIAL: i32 = 2;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser, Debug)]
#[command(name = "disclosure-scan")]
#[command(about = "Progressive-disclosure metadata for public functions", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Files or directories to scan (directories are walked, .gitignore aware)
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Force a language for named files (rust, python, javascript, typescript, tsx or an
    /// extension); directories contribute only files already in that language
    #[arg(long = "lang")]
    pub lang: Option<String>,

    /// Deepest disclosure layer to emit
    #[arg(long, value_enum, default_value_t = LayerArg::Full)]
    pub layer: LayerArg,

    /// Scanner config file (JSON or TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override the summary bound from the config
    #[arg(long)]
    pub max_summary_chars: Option<usize>,

    /// Override the worker count from the config
    #[arg(long)]
    pub jobs: Option<usize>,

    /// Pretty-print the JSON report
    #[arg(long)]
    pub pretty: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LayerArg {
    Hook,
    Tool,
    Full,
}

impl From<LayerArg> for Layer {
    fn from(value: LayerArg) -> Self {
        match value {
            LayerArg::Hook => Layer::Hook,
            LayerArg::Tool => Layer::Tool,
            LayerArg::Full => Layer::Full,
        }
    }
}

pub fn main_entry() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(&cli);
    run(&cli)
}

fn init_logging(cli: &Cli) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();
}

/// Scan `cli.paths`, print the report and return the process exit code
pub fn run(cli: &Cli) -> Result<i32> {
    let config = resolve_config(cli)?;
    let scanner = Scanner::new(config).context("Invalid scanner configuration")?;

    let report = match &cli.lang {
        Some(tag) => {
            let language = Language::from_tag(tag).context("Invalid --lang")?;
            scanner.scan_paths_as(&cli.paths, language)
        }
        None => scanner.scan_paths(&cli.paths),
    };

    let rendered = render(&report, cli.layer.into(), cli.pretty)?;
    print_stdout(&rendered)?;

    if report.has_errors() {
        log::warn!(
            "{} of {} files could not be scanned",
            report.summary.failed,
            report.summary.files
        );
        return Ok(EXIT_PARTIAL);
    }
    Ok(EXIT_OK)
}

/// Config file first, then command-line overrides
fn resolve_config(cli: &Cli) -> Result<ScannerConfig> {
    let mut config = match &cli.config {
        Some(path) => ScannerConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ScannerConfig::default(),
    };

    if let Some(max) = cli.max_summary_chars {
        config.max_summary_chars = max;
    }
    if let Some(jobs) = cli.jobs {
        config.jobs = Some(jobs);
    }
    Ok(config)
}

fn render(report: &ScanReport, layer: Layer, pretty: bool) -> Result<String> {
    let value = report
        .to_json(layer)
        .context("Failed to serialize scan report")?;
    let text = if pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    Ok(text)
}
