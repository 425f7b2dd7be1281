//! ddx - differential diagnosis from symptom observations
//!
//! The main entry point for the `ddx` CLI, handling:
//! - Bayesian ranking of diseases from present/absent symptoms
//! - Per-disease reasoning explanations
//! - Body-systems assessments
//! - Configuration inspection and validation
//! - JSON schemas for every output type

use clap::{Args, CommandFactory, Parser, Subcommand};
use ddx_common::error::{format_error_human, StructuredError};
use ddx_common::{Error, OutputFormat};
use ddx_config::{BodySystem, CONFIG_SCHEMA_VERSION};
use ddx_core::config::{load_config, ConfigOptions, ResolvedConfig};
use ddx_core::exit_codes::ExitCode;
use ddx_core::log_event;
use ddx_core::logging::{
    event_names, generate_run_id, init_logging, LogConfig, LogContext, LogFormat, LogLevel, Stage,
};
use ddx_core::schema;
use ddx_core::session::{render, DiagnosticSession, ObservationOutcome};
use serde::Serialize;
use std::io::IsTerminal;
use std::path::PathBuf;

/// Sequential Bayesian differential diagnosis
#[derive(Parser)]
#[command(name = "ddx")]
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
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Directory holding table.json and graph.json
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Probability table file
    #[arg(long, global = true)]
    table: Option<PathBuf>,

    /// Body-system graph file
    #[arg(long, global = true)]
    graph: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log format on stderr
    #[arg(long, global = true, env = "DDX_LOG_FORMAT")]
    log_format: Option<LogFormat>,
}

impl GlobalOpts {
    fn config_options(&self) -> ConfigOptions {
        ConfigOptions {
            config_dir: self.config.clone(),
            table_path: self.table.clone(),
            graph_path: self.graph.clone(),
        }
    }

    fn log_level(&self) -> Option<LogLevel> {
        if self.quiet || self.verbose > 0 {
            Some(LogLevel::from_verbosity(self.verbose, self.quiet))
        } else {
            None
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Rank diseases given present and absent symptoms
    Diagnose(DiagnoseArgs),

    /// Explain the posterior of one disease
    Explain(ExplainArgs),

    /// Body-systems assessment of a set of symptoms
    Systems(SystemsArgs),

    /// Configuration management
    Config(ConfigArgs),

    /// Print JSON schemas for output and config types
    Schema(SchemaArgs),

    /// Generate shell completions
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },

    /// Print version information
    Version,
}

/// Symptom answers shared by `diagnose` and `explain`.
#[derive(Args, Debug)]
struct ObservationArgs {
    /// Symptoms the patient has (repeatable or comma-separated)
    #[arg(long, short = 'p', value_delimiter = ',')]
    present: Vec<String>,

    /// Symptoms the patient does not have
    #[arg(long, short = 'a', value_delimiter = ',')]
    absent: Vec<String>,
}

impl ObservationArgs {
    /// Present answers first, then absent ones; a symptom named in both
    /// ends up absent.
    fn batch(&self) -> Vec<(&str, bool)> {
        self.present
            .iter()
            .map(|s| (s.as_str(), true))
            .chain(self.absent.iter().map(|s| (s.as_str(), false)))
            .collect()
    }
}

#[derive(Args, Debug)]
struct DiagnoseArgs {
    #[command(flatten)]
    observations: ObservationArgs,

    /// Number of diagnoses to report
    #[arg(long, default_value = "3")]
    top: usize,

    /// Number of follow-up questions to suggest
    #[arg(long, default_value = "3")]
    questions: usize,
}

#[derive(Args, Debug)]
struct ExplainArgs {
    /// Disease to explain (defaults to the leading diagnosis)
    disease: Option<String>,

    #[command(flatten)]
    observations: ObservationArgs,
}

#[derive(Args, Debug)]
struct SystemsArgs {
    /// Reported symptoms
    #[arg(required = true)]
    symptoms: Vec<String>,

    /// Symptoms already asked about
    #[arg(long, value_delimiter = ',')]
    asked: Vec<String>,

    /// Lifestyle mention as FACTOR=TEXT, e.g. "Sleep=wakes at 3am"
    #[arg(long, value_parser = parse_lifestyle)]
    lifestyle: Vec<(String, String)>,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show the resolved configuration and where it came from
    Show,
    /// Load and validate configuration files
    Validate,
}

#[derive(Args, Debug)]
struct SchemaArgs {
    /// Type name (defaults to SessionReport)
    name: Option<String>,

    /// List available types
    #[arg(long, conflicts_with_all = ["name", "all"])]
    list: bool,

    /// Print every schema keyed by type name
    #[arg(long, conflicts_with = "name")]
    all: bool,
}

fn parse_lifestyle(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((factor, mention)) if !factor.trim().is_empty() => {
            Ok((factor.trim().to_string(), mention.trim().to_string()))
        }
        _ => Err(format!("expected FACTOR=TEXT, got '{}'", s)),
    }
}

// ============================================================================
// Main entry point
// ============================================================================

fn main() {
    let cli = Cli::parse();

    let log_config = LogConfig::from_env(cli.global.log_level(), cli.global.log_format);
    init_logging(&log_config);

    let ctx = LogContext::new(generate_run_id());
    log_event!(ctx, DEBUG, event_names::RUN_STARTED, Stage::Init, "ddx started");

    let exit_code = match dispatch(&cli, &ctx) {
        Ok(()) => ExitCode::Clean,
        Err(err) => output_error(&cli.global, &err),
    };

    log_event!(
        ctx,
        DEBUG,
        event_names::RUN_FINISHED,
        Stage::Report,
        "ddx finished",
        exit_code = exit_code.as_i32()
    );
    std::process::exit(exit_code.as_i32());
}

fn dispatch(cli: &Cli, ctx: &LogContext) -> Result<(), Error> {
    let global = &cli.global;
    match &cli.command {
        Commands::Diagnose(args) => run_diagnose(global, ctx, args),
        Commands::Explain(args) => run_explain(global, ctx, args),
        Commands::Systems(args) => run_systems(global, ctx, args),
        Commands::Config(args) => match args.command {
            ConfigCommands::Show => run_config_show(global, ctx),
            ConfigCommands::Validate => run_config_validate(global, ctx),
        },
        Commands::Schema(args) => run_schema(global, args),
        Commands::Completions { shell } => {
            clap_complete::generate(*shell, &mut Cli::command(), "ddx", &mut std::io::stdout());
            Ok(())
        }
        Commands::Version => print_version(global),
    }
}

// ============================================================================
// Command implementations
// ============================================================================

fn load(global: &GlobalOpts, ctx: &LogContext) -> Result<ResolvedConfig, Error> {
    match load_config(&global.config_options()) {
        Ok(config) => {
            if config.paths.table.is_none() || config.paths.graph.is_none() {
                log_event!(
                    ctx,
                    DEBUG,
                    event_names::CONFIG_DEFAULT_USED,
                    Stage::Init,
                    "built-in defaults in use",
                    table_default = config.paths.table.is_none(),
                    graph_default = config.paths.graph.is_none()
                );
            }
            log_event!(
                ctx,
                DEBUG,
                event_names::CONFIG_LOADED,
                Stage::Init,
                "configuration ready",
                config_id = config.snapshot.short_id()
            );
            Ok(config)
        }
        Err(e) => {
            log_event!(
                ctx,
                WARN,
                event_names::CONFIG_ERROR,
                Stage::Init,
                "configuration rejected",
                error = tracing::field::display(&e)
            );
            Err(e.into())
        }
    }
}

/// Open a session and apply the answers as one intake.
fn intake(
    config: &ResolvedConfig,
    ctx: &LogContext,
    observations: &ObservationArgs,
) -> Result<DiagnosticSession, Error> {
    let mut session = DiagnosticSession::from_config(config).with_log_context(ctx.clone());
    let batch = observations.batch();
    let outcomes = session.start_intake(&batch);
    if let Some(((symptom, _), _)) = batch
        .iter()
        .zip(&outcomes)
        .find(|(_, o)| **o == ObservationOutcome::Unknown)
    {
        return Err(Error::UnknownSymptom {
            symptom: symptom.to_string(),
        });
    }
    Ok(session)
}

fn run_diagnose(global: &GlobalOpts, ctx: &LogContext, args: &DiagnoseArgs) -> Result<(), Error> {
    let config = load(global, ctx)?;
    let session = intake(&config, ctx, &args.observations)?;
    let report = session.report(args.top, args.questions);

    match global.format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Summary => println!("{}", report.summary_line()),
        OutputFormat::Md => {
            print!("{}", session.diagnostic_summary());
            println!();
            println!("### Next Question");
            println!("{}", report.next_question);
            if !report.affected_systems.is_empty() {
                println!();
                println!("### Body Systems");
                for s in &report.affected_systems {
                    println!("- {}: {:.2}", s.system, s.score);
                }
                println!();
                println!("{}", report.systems_next_question);
            }
        }
    }
    Ok(())
}

fn run_explain(global: &GlobalOpts, ctx: &LogContext, args: &ExplainArgs) -> Result<(), Error> {
    let config = load(global, ctx)?;
    if let Some(disease) = &args.disease {
        if !config.table.has_disease(disease) {
            return Err(Error::UnknownDisease {
                disease: disease.clone(),
            });
        }
    }

    let session = intake(&config, ctx, &args.observations)?;
    let disease = match &args.disease {
        Some(d) => d.clone(),
        None => session
            .engine()
            .get_top_diagnoses(1)
            .into_iter()
            .next()
            .map(|d| d.disease)
            .ok_or_else(|| Error::Inference("no diagnosis available".to_string()))?,
    };
    let record = session.engine().explain_reasoning(&disease);
    log_event!(
        ctx,
        DEBUG,
        event_names::EXPLAIN_BUILT,
        Stage::Explain,
        "reasoning built",
        disease = disease.as_str(),
        factors = record.evidence_factors.len()
    );

    match global.format {
        OutputFormat::Json => print_json(&record)?,
        OutputFormat::Summary => println!(
            "{}: prior {:.3} -> posterior {:.3} ({} factor(s))",
            record.disease,
            record.prior_probability,
            record.posterior_probability,
            record.evidence_factors.len()
        ),
        OutputFormat::Md => print!("{}", render::detailed_diagnosis(&record)),
    }
    Ok(())
}

fn run_systems(global: &GlobalOpts, ctx: &LogContext, args: &SystemsArgs) -> Result<(), Error> {
    let config = load(global, ctx)?;
    let mut session = DiagnosticSession::from_config(&config).with_log_context(ctx.clone());

    for symptom in &args.symptoms {
        if !session.systems().knows_symptom(symptom) {
            return Err(Error::UnknownSymptom {
                symptom: symptom.clone(),
            });
        }
    }
    let batch: Vec<(&str, bool)> = args.symptoms.iter().map(|s| (s.as_str(), true)).collect();
    session.observe_batch(&batch);
    for asked in &args.asked {
        session.mark_asked(asked);
    }
    for (factor, mention) in &args.lifestyle {
        session.record_lifestyle_factor(factor, mention);
    }

    let mut assessment = session.holistic_assessment();
    assessment.suggested_questions = session.systems_suggestions().to_vec();
    log_event!(
        ctx,
        DEBUG,
        event_names::SYSTEMS_ASSESSED,
        Stage::Systems,
        "systems assessed",
        systems = assessment.affected_systems.len(),
        patterns = assessment.potential_patterns.len()
    );

    match global.format {
        OutputFormat::Json => print_json(&assessment)?,
        OutputFormat::Summary => {
            let top: Vec<String> = assessment
                .affected_systems
                .iter()
                .take(3)
                .map(|s| format!("{} {:.2}", s.system, s.score))
                .collect();
            println!(
                "systems: {}; patterns: {}; next: {}",
                top.join(", "),
                assessment.potential_patterns.len(),
                session.systems_next_question()
            );
        }
        OutputFormat::Md => print!("{}", render::holistic_assessment(&assessment)),
    }
    Ok(())
}

fn run_config_show(global: &GlobalOpts, ctx: &LogContext) -> Result<(), Error> {
    let config = load(global, ctx)?;
    let snapshot = &config.snapshot;

    match global.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "schema_version": CONFIG_SCHEMA_VERSION,
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "snapshot": snapshot,
                "diseases": &config.table.diseases,
                "symptoms": config.table.symptoms().collect::<Vec<_>>(),
                "systems": BodySystem::ALL.iter().map(BodySystem::as_str).collect::<Vec<_>>(),
                "patterns": config.graph.patterns.keys().collect::<Vec<_>>(),
            });
            print_json(&response)?;
        }
        OutputFormat::Summary => println!(
            "config {}: table={} graph={} ({} diseases, {} symptoms, {} patterns)",
            snapshot.short_id(),
            source_label(snapshot.table_path.as_deref(), &snapshot.table_source),
            source_label(snapshot.graph_path.as_deref(), &snapshot.graph_source),
            snapshot.summary.disease_count,
            snapshot.summary.symptom_count,
            snapshot.summary.pattern_count
        ),
        OutputFormat::Md => {
            println!("# ddx config show");
            println!();
            println!("## Probability Table");
            println!(
                "Source: {}",
                source_label(snapshot.table_path.as_deref(), &snapshot.table_source)
            );
            if let Some(hash) = &snapshot.table_hash {
                println!("Hash: {}", hash);
            }
            println!("Diseases: {}", config.table.diseases.join(", "));
            println!();
            println!("## Body-System Graph");
            println!(
                "Source: {}",
                source_label(snapshot.graph_path.as_deref(), &snapshot.graph_source)
            );
            if let Some(hash) = &snapshot.graph_hash {
                println!("Hash: {}", hash);
            }
            let patterns: Vec<&str> = config.graph.patterns.keys().map(String::as_str).collect();
            println!("Patterns: {}", patterns.join(", "));
            println!();
            println!("Schema version: {}", snapshot.schema_version);
        }
    }
    Ok(())
}

fn run_config_validate(global: &GlobalOpts, ctx: &LogContext) -> Result<(), Error> {
    let config = load(global, ctx)?;
    let snapshot = &config.snapshot;

    match global.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "schema_version": CONFIG_SCHEMA_VERSION,
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "status": "valid",
                "table": {
                    "path": snapshot.table_path,
                    "using_defaults": snapshot.table_path.is_none(),
                    "hash": snapshot.table_hash,
                },
                "graph": {
                    "path": snapshot.graph_path,
                    "using_defaults": snapshot.graph_path.is_none(),
                    "hash": snapshot.graph_hash,
                },
                "summary": snapshot.summary,
            });
            print_json(&response)?;
        }
        OutputFormat::Summary => println!("config validate: OK ({})", snapshot.short_id()),
        OutputFormat::Md => {
            println!("# Configuration Validation");
            println!();
            println!("Status: ✓ Valid");
            println!(
                "Table: {}",
                source_label(snapshot.table_path.as_deref(), &snapshot.table_source)
            );
            println!(
                "Graph: {}",
                source_label(snapshot.graph_path.as_deref(), &snapshot.graph_source)
            );
        }
    }
    Ok(())
}

fn run_schema(global: &GlobalOpts, args: &SchemaArgs) -> Result<(), Error> {
    if args.list {
        let schemas = schema::available_schemas();
        match global.format {
            OutputFormat::Json => {
                let listing: serde_json::Map<String, serde_json::Value> = schemas
                    .iter()
                    .map(|(name, desc)| (name.to_string(), serde_json::json!(desc)))
                    .collect();
                print_json(&listing)?;
            }
            _ => {
                for (name, desc) in schemas {
                    println!("{:<24} {}", name, desc);
                }
            }
        }
        return Ok(());
    }

    if args.all {
        return print_json(&schema::generate_all_schemas());
    }

    let name = args.name.as_deref().unwrap_or(schema::DEFAULT_SCHEMA);
    let value = schema::generate_schema(name)
        .ok_or_else(|| Error::Config(format!("no schema named '{}'; see 'ddx schema --list'", name)))?;
    print_json(&value)
}

fn print_version(global: &GlobalOpts) -> Result<(), Error> {
    match global.format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "ddx_version": env!("CARGO_PKG_VERSION"),
            "config_schema_version": CONFIG_SCHEMA_VERSION,
            "rust_version": env!("CARGO_PKG_RUST_VERSION"),
        })),
        _ => {
            println!("ddx {}", env!("CARGO_PKG_VERSION"));
            println!("config schema version: {}", CONFIG_SCHEMA_VERSION);
            Ok(())
        }
    }
}

// ============================================================================
// Output helpers
// ============================================================================

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn source_label(path: Option<&str>, source: &str) -> String {
    match path {
        Some(p) => format!("{} ({})", p, source),
        None => "built-in defaults".to_string(),
    }
}

/// Report an error on stderr in the requested format.
fn output_error(global: &GlobalOpts, err: &Error) -> ExitCode {
    match global.format {
        OutputFormat::Json => eprintln!("{}", StructuredError::from(err).to_json()),
        _ => eprintln!("{}", format_error_human(err, std::io::stderr().is_terminal())),
    }
    ExitCode::from(err)
}
