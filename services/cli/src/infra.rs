use clap::Args;
use std::io::Read;
use std::path::{Path, PathBuf};
use triage_points::config::AppConfig;
use triage_points::error::AppError;
use triage_points::scoring::{ScoringConfig, ScoringEngine, ScoringSources, Segmentation};

/// Scoring rule sources given on the command line. Each flag overrides its environment value.
#[derive(Args, Debug, Default, Clone, PartialEq)]
pub(crate) struct SourceArgs {
    /// JSON scoring document (base points, threshold, interventions, levels)
    #[arg(long)]
    pub(crate) rules: Option<PathBuf>,
    /// CSV intervention table with `Intervention,Points` headers
    #[arg(long)]
    pub(crate) interventions_csv: Option<PathBuf>,
    /// Points every note starts with
    #[arg(long)]
    pub(crate) base_points: Option<u32>,
    /// Largest accepted match distance, between 0 and 1
    #[arg(long, value_parser = parse_threshold)]
    pub(crate) threshold: Option<f64>,
    /// How notes are cut into segments (lines or clauses)
    #[arg(long, value_parser = parse_segmentation)]
    pub(crate) segmentation: Option<Segmentation>,
}

impl SourceArgs {
    pub(crate) fn apply(self, sources: &mut ScoringSources) {
        let SourceArgs {
            rules,
            interventions_csv,
            base_points,
            threshold,
            segmentation,
        } = self;

        if rules.is_some() {
            sources.rules_path = rules;
        }
        if interventions_csv.is_some() {
            sources.interventions_csv = interventions_csv;
        }
        if base_points.is_some() {
            sources.base_points = base_points;
        }
        if threshold.is_some() {
            sources.match_threshold = threshold;
        }
        if segmentation.is_some() {
            sources.segmentation = segmentation;
        }
    }
}

pub(crate) fn parse_threshold(raw: &str) -> Result<f64, String> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("failed to parse '{raw}' as a number ({err})"))?;
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("threshold {value} must be between 0 and 1"))
    }
}

pub(crate) fn parse_segmentation(raw: &str) -> Result<Segmentation, String> {
    raw.parse::<Segmentation>().map_err(|err| err.to_string())
}

pub(crate) fn resolve_scoring(
    config: &AppConfig,
    args: SourceArgs,
) -> Result<ScoringConfig, AppError> {
    let mut sources = config.scoring.clone();
    args.apply(&mut sources);
    Ok(ScoringConfig::resolve(&sources)?)
}

pub(crate) fn build_engine(scoring: ScoringConfig) -> Result<ScoringEngine, AppError> {
    Ok(ScoringEngine::new(scoring)?)
}

/// Note text from `--file`, `--text`, or stdin when neither is given.
pub(crate) fn read_note(file: Option<&Path>, text: Option<String>) -> Result<String, AppError> {
    if let Some(path) = file {
        return Ok(std::fs::read_to_string(path)?);
    }
    if let Some(text) = text {
        return Ok(text);
    }

    let mut note = String::new();
    std::io::stdin().lock().read_to_string(&mut note)?;
    Ok(note)
}
