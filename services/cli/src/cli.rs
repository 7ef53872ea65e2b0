use crate::infra::{build_engine, read_note, resolve_scoring, SourceArgs};
use crate::render::{render_check, render_rules, render_score, OutputFormat};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use triage_points::config::AppConfig;
use triage_points::error::AppError;
use triage_points::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "triage-points",
    about = "Score emergency-department encounter notes into acuity levels",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score one note from a file, an argument or stdin
    Score(ScoreArgs),
    /// Inspect, validate or export the scoring rules
    Rules {
        #[command(subcommand)]
        command: RulesCommand,
    },
}

#[derive(Subcommand, Debug)]
enum RulesCommand {
    /// Print the intervention table and level bands
    Show(SourceArgs),
    /// Validate the configured rules and exit non-zero when they are unusable
    Check(SourceArgs),
    /// Print the resolved scoring document as JSON
    Export(SourceArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ScoreArgs {
    /// Read the note from this file
    #[arg(long, conflicts_with = "text")]
    pub(crate) file: Option<PathBuf>,
    /// Score this text instead of reading a file or stdin
    #[arg(long)]
    pub(crate) text: Option<String>,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub(crate) format: OutputFormat,
    #[command(flatten)]
    pub(crate) sources: SourceArgs,
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    match cli.command {
        Command::Score(args) => {
            let ScoreArgs {
                file,
                text,
                format,
                sources,
            } = args;
            let engine = build_engine(resolve_scoring(&config, sources)?)?;
            let note = read_note(file.as_deref(), text)?;
            let result = engine.score(&note);
            println!("{}", render_score(&result, format)?);
        }
        Command::Rules {
            command: RulesCommand::Show(sources),
        } => {
            let engine = build_engine(resolve_scoring(&config, sources)?)?;
            println!("{}", render_rules(&engine));
        }
        Command::Rules {
            command: RulesCommand::Check(sources),
        } => {
            let engine = build_engine(resolve_scoring(&config, sources)?)?;
            info!(?config.environment, "scoring rules validated");
            println!("{}", render_check(&engine));
        }
        Command::Rules {
            command: RulesCommand::Export(sources),
        } => {
            let scoring = resolve_scoring(&config, sources)?;
            build_engine(scoring.clone())?;
            println!("{}", scoring.to_json_pretty()?);
        }
    }

    Ok(())
}
