//! har-report command line.
//!
//! Turns a HAR capture plus tracker annotations into a typeset document:
//! - `render`: compile a PDF with the external `typst` binary
//! - `markup`: write the generated Typst sources to a directory
//! - `version`: print version information

use clap::{Args, Parser, Subcommand};
use hr_core::config::AppConfig;
use hr_core::exit_codes::ExitCode;
use hr_core::logging::{init_logging, LogConfig, LogFormat, LogLevel, Stage};
use hr_core::pipeline::{write_sources, Pipeline, PipelineError, ReportInputs};
use hr_findings::{parse_annotations, AdapterRegistry, AnnotationSlot};
use hr_report::{
    DocumentKind, Language, RenderOptions, ReportMetadata, Translations, TypstCli,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Render HAR captures and tracker findings into typeset reports
#[derive(Parser)]
#[command(name = "har-report")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Config file (default: $HR_CONFIG, then ~/.config/har-report/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log output format on stderr
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a document to PDF
    Render(RenderArgs),

    /// Write the generated Typst sources without compiling
    Markup(MarkupArgs),

    /// Print version information
    Version {
        /// Machine-readable output
        #[arg(long)]
        json: bool,
    },
}

/// Inputs shared by every document-producing command
#[derive(Args, Debug)]
struct InputArgs {
    /// HAR capture (JSON)
    #[arg(long)]
    har: PathBuf,

    /// Detector output: one annotation slot per archive entry
    #[arg(long)]
    annotations: Option<PathBuf>,

    /// Adapter registry (JSON array of adapters)
    #[arg(long)]
    adapters: Option<PathBuf>,

    /// Analysis metadata (JSON); required for report and notice
    #[arg(long)]
    metadata: Option<PathBuf>,

    /// Document kind: report, notice or traffic
    #[arg(long, default_value = "report")]
    kind: String,

    /// Output language (en, de, fr); overrides the config file
    #[arg(long)]
    language: Option<String>,

    /// Cut request/response content after this many characters
    #[arg(long)]
    truncate: Option<usize>,

    /// Omit response sections
    #[arg(long)]
    no_responses: bool,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Typst executable; overrides the config file
    #[arg(long)]
    typst: Option<PathBuf>,

    /// Output PDF path
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Args, Debug)]
struct MarkupArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Directory receiving main.typ, style.typ and har.typ
    #[arg(long)]
    out_dir: PathBuf,
}

// ============================================================================
// Main entry point
// ============================================================================

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version come through here too
            let code = if e.use_stderr() {
                ExitCode::ArgsError
            } else {
                ExitCode::Clean
            };
            let _ = e.print();
            std::process::exit(code.as_i32());
        }
    };

    // Leave the level to HR_LOG/RUST_LOG unless asked explicitly.
    let cli_level = (cli.global.verbose > 0 || cli.global.quiet)
        .then(|| LogLevel::from_verbosity(cli.global.verbose, cli.global.quiet));
    init_logging(&LogConfig::from_env(cli_level, cli.global.log_format));

    let exit_code = match &cli.command {
        Commands::Render(args) => run_render(&cli.global, args),
        Commands::Markup(args) => run_markup(&cli.global, args),
        Commands::Version { json } => {
            print_version(*json);
            ExitCode::Clean
        }
    };

    std::process::exit(exit_code.as_i32());
}

fn run_render(global: &GlobalOpts, args: &RenderArgs) -> ExitCode {
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("har-report: failed to start runtime: {}", e);
            return ExitCode::InternalError;
        }
    };

    report_outcome(runtime.block_on(render(global, args)))
}

fn run_markup(global: &GlobalOpts, args: &MarkupArgs) -> ExitCode {
    report_outcome(markup(global, args))
}

fn report_outcome(result: Result<(), PipelineError>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::Clean,
        Err(e) => {
            let code = ExitCode::from(&e);
            eprintln!("har-report: {}", e);
            debug!(code = %code, "Exiting with error");
            code
        }
    }
}

// ============================================================================
// Command implementations
// ============================================================================

async fn render(global: &GlobalOpts, args: &RenderArgs) -> Result<(), PipelineError> {
    let config = load_config(global)?;
    let inputs = LoadedInputs::read(&args.input)?;
    let options = render_options(&config, &args.input)?;
    let kind: DocumentKind = args.input.kind.parse()?;

    let translations = Translations::bundled()?;
    let pipeline = Pipeline::new(&translations, &inputs.registry, options);

    let binary = args.typst.clone().unwrap_or(config.compiler.binary);
    let mut compiler = TypstCli::new(binary);
    let pdf = pipeline
        .generate(&mut compiler, &inputs.as_report_inputs(kind))
        .await?;

    tokio::fs::write(&args.output, &pdf).await?;
    info!(stage = %Stage::Write, path = %args.output.display(), bytes = pdf.len(), "PDF written");
    println!("{}", args.output.display());
    Ok(())
}

fn markup(global: &GlobalOpts, args: &MarkupArgs) -> Result<(), PipelineError> {
    let config = load_config(global)?;
    let inputs = LoadedInputs::read(&args.input)?;
    let options = render_options(&config, &args.input)?;
    let kind: DocumentKind = args.input.kind.parse()?;

    let translations = Translations::bundled()?;
    let pipeline = Pipeline::new(&translations, &inputs.registry, options);
    let document = pipeline.render_markup(&inputs.as_report_inputs(kind))?;

    for path in write_sources(&document, &args.out_dir)? {
        println!("{}", path.display());
    }
    Ok(())
}

fn load_config(global: &GlobalOpts) -> Result<AppConfig, PipelineError> {
    let (config, source) = AppConfig::load(global.config.as_deref())?;
    debug!(stage = %Stage::Config, source = %source, "Configuration resolved");
    Ok(config)
}

/// Config file values with command-line overrides applied.
fn render_options(config: &AppConfig, args: &InputArgs) -> Result<RenderOptions, PipelineError> {
    let mut options = config.render.clone();
    if let Some(language) = &args.language {
        options.language = language.parse::<Language>()?;
    }
    if args.truncate.is_some() {
        options.truncate_content = args.truncate;
    }
    if args.no_responses {
        options.include_responses = false;
    }
    Ok(options)
}

/// Input files read from disk.
struct LoadedInputs {
    archive: Vec<u8>,
    annotations: Vec<AnnotationSlot>,
    registry: AdapterRegistry,
    metadata: Option<ReportMetadata>,
}

impl LoadedInputs {
    fn read(args: &InputArgs) -> Result<Self, PipelineError> {
        let archive = read_file(&args.har)?;

        let annotations = match &args.annotations {
            Some(path) => parse_annotations(&read_text(path)?)?,
            None => Vec::new(),
        };

        let registry = match &args.adapters {
            Some(path) => AdapterRegistry::from_json(&read_text(path)?)?,
            None => AdapterRegistry::default(),
        };

        let metadata = match &args.metadata {
            Some(path) => Some(
                ReportMetadata::from_json(&read_text(path)?)
                    .map_err(|e| PipelineError::input(path, e))?,
            ),
            None => None,
        };

        info!(
            stage = %Stage::Load,
            archive_bytes = archive.len(),
            annotation_slots = annotations.len(),
            adapters = registry.len(),
            "Inputs loaded"
        );

        Ok(Self {
            archive,
            annotations,
            registry,
            metadata,
        })
    }

    fn as_report_inputs(&self, kind: DocumentKind) -> ReportInputs<'_> {
        ReportInputs {
            archive: &self.archive,
            annotations: &self.annotations,
            metadata: self.metadata.as_ref(),
            kind,
        }
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, PipelineError> {
    std::fs::read(path).map_err(|e| PipelineError::input(path, e))
}

fn read_text(path: &Path) -> Result<String, PipelineError> {
    std::fs::read_to_string(path).map_err(|e| PipelineError::input(path, e))
}

fn print_version(json: bool) {
    if json {
        let version_info = serde_json::json!({
            "har_report_version": env!("CARGO_PKG_VERSION"),
            "rust_version": env!("CARGO_PKG_RUST_VERSION"),
            "languages": Language::ALL.iter().map(Language::as_str).collect::<Vec<_>>(),
        });
        println!("{}", version_info);
    } else {
        println!("har-report {}", env!("CARGO_PKG_VERSION"));
    }
}
