use super::reference::{
    reference_interventions, reference_levels, REFERENCE_BASE_POINTS, REFERENCE_MATCH_THRESHOLD,
};
use super::segment::Segmentation;
use super::table::{LevelBand, RuleEntry};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Scoring policy: base value, match threshold, intervention table and level bands.
///
/// Every field is optional in a loaded document and falls back to the reference deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_base_points")]
    pub base_points: u32,
    #[serde(default = "default_match_threshold")]
    pub match_threshold: f64,
    #[serde(default)]
    pub segmentation: Segmentation,
    #[serde(default = "reference_interventions")]
    pub interventions: Vec<RuleEntry>,
    #[serde(default = "reference_levels")]
    pub levels: Vec<LevelBand>,
}

fn default_base_points() -> u32 {
    REFERENCE_BASE_POINTS
}

fn default_match_threshold() -> f64 {
    REFERENCE_MATCH_THRESHOLD
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self::reference()
    }
}

impl ScoringConfig {
    pub fn reference() -> Self {
        Self {
            base_points: REFERENCE_BASE_POINTS,
            match_threshold: REFERENCE_MATCH_THRESHOLD,
            segmentation: Segmentation::default(),
            interventions: reference_interventions(),
            levels: reference_levels(),
        }
    }

    pub fn from_json_str(document: &str) -> Result<Self, RulesLoadError> {
        Ok(serde_json::from_str(document)?)
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, RulesLoadError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, RulesLoadError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| RulesLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_reader(std::io::BufReader::new(file))
    }

    /// Builds the configuration from the reference values, an optional JSON document, an
    /// optional CSV intervention table and explicit overrides, in that order of precedence.
    pub fn resolve(sources: &ScoringSources) -> Result<Self, RulesLoadError> {
        let mut config = match &sources.rules_path {
            Some(path) => Self::from_path(path)?,
            None => Self::reference(),
        };

        if let Some(path) = &sources.interventions_csv {
            config.interventions = interventions_from_csv_path(path)?;
        }
        if let Some(base_points) = sources.base_points {
            config.base_points = base_points;
        }
        if let Some(threshold) = sources.match_threshold {
            config.match_threshold = threshold;
        }
        if let Some(segmentation) = sources.segmentation {
            config.segmentation = segmentation;
        }

        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub(crate) fn validate_threshold(&self) -> Result<(), ScoringConfigError> {
        if self.match_threshold.is_finite() && (0.0..=1.0).contains(&self.match_threshold) {
            Ok(())
        } else {
            Err(ScoringConfigError::InvalidThreshold(self.match_threshold))
        }
    }
}

/// Where the scoring configuration comes from, as collected from the environment or CLI.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoringSources {
    pub rules_path: Option<PathBuf>,
    pub interventions_csv: Option<PathBuf>,
    pub base_points: Option<u32>,
    pub match_threshold: Option<f64>,
    pub segmentation: Option<Segmentation>,
}

#[derive(Debug, Deserialize)]
struct InterventionRow {
    #[serde(rename = "Intervention", alias = "phrase", alias = "text")]
    intervention: String,
    #[serde(rename = "Points", alias = "points", alias = "point")]
    points: u32,
}

/// Reads an `Intervention,Points` table; rows without an intervention are skipped.
pub fn interventions_from_csv_reader<R: Read>(reader: R) -> Result<Vec<RuleEntry>, RulesLoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut entries = Vec::new();

    for record in csv_reader.deserialize::<InterventionRow>() {
        let row = record?;
        if row.intervention.is_empty() {
            continue;
        }
        entries.push(RuleEntry::new(row.intervention, row.points));
    }

    Ok(entries)
}

pub fn interventions_from_csv_path<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<RuleEntry>, RulesLoadError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|source| RulesLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    interventions_from_csv_reader(file)
}

/// Invalid scoring configuration. Fatal at startup; no note is scored with a bad table.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringConfigError {
    #[error("intervention '{phrase}' at position {duplicate} duplicates position {first}")]
    DuplicatePhrase {
        phrase: String,
        first: usize,
        duplicate: usize,
    },
    #[error("intervention at position {index} ('{phrase}') has no matchable words")]
    UnmatchablePhrase { index: usize, phrase: String },
    #[error("intervention '{phrase}' must be worth at least one point")]
    ZeroPoints { phrase: String },
    #[error("match threshold {0} must be a number between 0 and 1")]
    InvalidThreshold(f64),
    #[error("no level bands configured")]
    NoLevels,
    #[error("first level band starts at {min_score}, leaving lower scores unclassified")]
    BandStart { min_score: u32 },
    #[error("scores between {previous_max} and {next_min} fall in no level band")]
    BandGap { previous_max: u32, next_min: u32 },
    #[error("level band starting at {next_min} overlaps the band ending at {previous_max}")]
    BandOverlap { previous_max: u32, next_min: u32 },
    #[error("level band {min_score}..={max_score} ends before it starts")]
    InvertedBand { min_score: u32, max_score: u32 },
    #[error("level band starting at {min_score} is unbounded but is not the last band")]
    UnboundedBandNotLast { min_score: u32 },
    #[error("scores above {max_score} fall in no level band; the last band must be unbounded")]
    BoundedTail { max_score: u32 },
}

/// Failure to read a scoring document or intervention table.
#[derive(Debug, thiserror::Error)]
pub enum RulesLoadError {
    #[error("failed to read scoring rules from {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid scoring rules document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid intervention CSV: {0}")]
    Csv(#[from] csv::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn empty_document_falls_back_to_reference_values() {
        let config = ScoringConfig::from_json_str("{}").expect("document parses");
        assert_eq!(config, ScoringConfig::reference());
        assert_eq!(config.base_points, 35);
        assert_eq!(config.match_threshold, 0.4);
        assert_eq!(config.segmentation, Segmentation::Clauses);
    }

    #[test]
    fn partial_document_overrides_only_named_fields() {
        let config = ScoringConfig::from_json_str(
            r#"{ "base_points": 20, "segmentation": "lines",
                 "interventions": [{ "text": "Enema", "point": 15 }] }"#,
        )
        .expect("document parses");

        assert_eq!(config.base_points, 20);
        assert_eq!(config.segmentation, Segmentation::Lines);
        assert_eq!(config.interventions, vec![RuleEntry::new("Enema", 15)]);
        assert_eq!(config.levels, reference_levels());
        assert_eq!(config.match_threshold, REFERENCE_MATCH_THRESHOLD);
    }

    #[test]
    fn exported_document_round_trips() {
        let exported = ScoringConfig::reference()
            .to_json_pretty()
            .expect("serializes");
        let parsed = ScoringConfig::from_json_str(&exported).expect("parses");
        assert_eq!(parsed, ScoringConfig::reference());
    }

    #[test]
    fn malformed_document_is_a_json_error() {
        let error = ScoringConfig::from_json_str(r#"{ "base_points": -3 }"#).expect_err("invalid");
        assert!(matches!(error, RulesLoadError::Json(_)));
    }

    #[test]
    fn csv_rows_are_trimmed_and_blank_interventions_skipped() {
        let csv = "Intervention,Points\n  Wound Care , 10\n,5\nEnema,15\n";
        let entries = interventions_from_csv_reader(Cursor::new(csv)).expect("csv parses");
        assert_eq!(
            entries,
            vec![RuleEntry::new("Wound Care", 10), RuleEntry::new("Enema", 15)]
        );
    }

    #[test]
    fn csv_with_bad_points_is_rejected() {
        let csv = "Intervention,Points\nWound Care,ten\n";
        let error = interventions_from_csv_reader(Cursor::new(csv)).expect_err("bad points");
        assert!(matches!(error, RulesLoadError::Csv(_)));
    }

    #[test]
    fn missing_document_reports_its_path() {
        let error = ScoringConfig::from_path("./does-not-exist.json").expect_err("io error");
        match &error {
            RulesLoadError::Io { path, .. } => {
                assert_eq!(path, Path::new("./does-not-exist.json"));
            }
            other => panic!("expected io error, got {other:?}"),
        }
        assert!(error.to_string().contains("does-not-exist.json"));
    }

    #[test]
    fn resolve_applies_overrides_last() {
        let sources = ScoringSources {
            base_points: Some(10),
            match_threshold: Some(0.25),
            segmentation: Some(Segmentation::Lines),
            ..Default::default()
        };
        let config = ScoringConfig::resolve(&sources).expect("resolves");
        assert_eq!(config.base_points, 10);
        assert_eq!(config.match_threshold, 0.25);
        assert_eq!(config.segmentation, Segmentation::Lines);
        assert_eq!(config.interventions.len(), 52);
    }

    #[test]
    fn threshold_must_be_a_unit_fraction() {
        let mut config = ScoringConfig::reference();
        for bad in [-0.1, 1.5, f64::NAN] {
            config.match_threshold = bad;
            assert!(config.validate_threshold().is_err());
        }
        config.match_threshold = 0.0;
        assert!(config.validate_threshold().is_ok());
        config.match_threshold = 1.0;
        assert!(config.validate_threshold().is_ok());
    }
}
