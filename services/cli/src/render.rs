use clap::ValueEnum;
use triage_points::error::AppError;
use triage_points::scoring::{ScoreResult, ScoringEngine};

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    /// `EDPoint` report as JSON
    #[default]
    Json,
    /// Human-readable breakdown with the segment behind each match
    Pretty,
    /// One line: points, level and code
    Summary,
}

pub(crate) fn render_score(result: &ScoreResult, format: OutputFormat) -> Result<String, AppError> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&result.report())?),
        OutputFormat::Pretty => Ok(render_breakdown(result)),
        OutputFormat::Summary => Ok(render_summary(result)),
    }
}

fn render_summary(result: &ScoreResult) -> String {
    if result.is_classified() {
        format!(
            "{} points | level {} | code {} | {} interventions",
            result.total_points,
            result.level,
            result.code,
            result.matched_sources.len()
        )
    } else {
        format!(
            "{} points | unclassified | {} interventions",
            result.total_points,
            result.matched_sources.len()
        )
    }
}

fn render_breakdown(result: &ScoreResult) -> String {
    let matched = result
        .source_points()
        .fold(0u32, |sum, (_, points)| sum.saturating_add(points));
    let base = result.total_points.saturating_sub(matched);

    let mut lines = vec!["Acuity score".to_string(), format!("- base: {base} points")];
    if result.matched_sources.is_empty() {
        lines.push("- no charted interventions matched".to_string());
    }
    lines.extend(result.matched_sources.iter().map(|source| {
        format!(
            "- +{} {} (from \"{}\", distance {:.3})",
            source.points, source.phrase, source.segment, source.distance
        )
    }));
    lines.push(format!("Total: {}", render_summary(result)));
    lines.join("\n")
}

pub(crate) fn render_rules(engine: &ScoringEngine) -> String {
    let table = engine.table();
    let mut lines = vec![
        format!(
            "Base points: {} | threshold {} | segmentation {}",
            engine.base_points(),
            engine.threshold(),
            engine.segmentation()
        ),
        String::new(),
        format!("Interventions ({})", table.all_entries().len()),
    ];
    lines.extend(
        table
            .all_entries()
            .iter()
            .map(|entry| format!("- {:>3}  {}", entry.points, entry.phrase)),
    );

    lines.push(String::new());
    lines.push("Levels".to_string());
    lines.extend(table.bands().iter().map(|band| {
        let range = match band.max_score {
            Some(max) => format!("{}-{}", band.min_score, max),
            None => format!("{}+", band.min_score),
        };
        format!(
            "- level {}: {} points | code {} | criteria {}",
            band.level, range, band.code, band.criteria_id
        )
    }));
    lines.join("\n")
}

pub(crate) fn render_check(engine: &ScoringEngine) -> String {
    format!(
        "rules ok: {} interventions, {} level bands, base {}, threshold {}, segmentation {}",
        engine.table().all_entries().len(),
        engine.table().bands().len(),
        engine.base_points(),
        engine.threshold(),
        engine.segmentation()
    )
}
