use serde::{Serialize, Serializer};

/// Intervention credited to a note, with the segment that earned it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedSource {
    pub phrase: String,
    pub points: u32,
    pub segment: String,
    pub distance: f64,
}

/// Outcome of scoring one note. Level, code and criteria are 0 when no band applies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    pub total_points: u32,
    pub level: u32,
    pub code: u32,
    pub criteria_id: u32,
    /// Unique phrases in the order they were first matched.
    pub matched_sources: Vec<MatchedSource>,
    pub raw_input: String,
}

impl ScoreResult {
    pub fn is_classified(&self) -> bool {
        self.level != 0
    }

    pub fn source_points(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.matched_sources
            .iter()
            .map(|source| (source.phrase.as_str(), source.points))
    }

    pub fn points_for(&self, phrase: &str) -> Option<u32> {
        self.source_points()
            .find(|(matched, _)| *matched == phrase)
            .map(|(_, points)| points)
    }

    /// View in the `EDPoint` shape expected by existing callers.
    pub fn report(&self) -> ScoreReport<'_> {
        ScoreReport {
            ed_point: EdPoint {
                point: self.total_points,
                level: self.level,
                code: self.code,
                criteria: self.criteria_id,
                source: &self.matched_sources,
            },
            diagnosis: Diagnosis {
                content: &self.raw_input,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreReport<'a> {
    #[serde(rename = "EDPoint")]
    pub ed_point: EdPoint<'a>,
    pub diagnosis: Diagnosis<'a>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EdPoint<'a> {
    pub point: u32,
    #[serde(rename = "Level")]
    pub level: u32,
    pub code: u32,
    pub criteria: u32,
    #[serde(serialize_with = "serialize_sources")]
    pub source: &'a [MatchedSource],
}

#[derive(Debug, Clone, Serialize)]
pub struct Diagnosis<'a> {
    pub content: &'a str,
}

fn serialize_sources<S>(sources: &&[MatchedSource], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_map(
        sources
            .iter()
            .map(|source| (source.phrase.as_str(), source.points)),
    )
}
