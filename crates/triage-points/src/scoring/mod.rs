mod config;
mod matcher;
mod normalize;
mod reference;
mod result;
mod segment;
mod table;

#[cfg(test)]
mod tests;

pub use config::{
    interventions_from_csv_path, interventions_from_csv_reader, RulesLoadError, ScoringConfig,
    ScoringConfigError, ScoringSources,
};
pub use matcher::{Distance, FuzzyMatcher, MatchCandidate};
pub use reference::{REFERENCE_BASE_POINTS, REFERENCE_MATCH_THRESHOLD};
pub use result::{Diagnosis, EdPoint, MatchedSource, ScoreReport, ScoreResult};
pub use segment::{clauses, lines, Lines, Segmentation, UnknownSegmentation};
pub use table::{LevelBand, RuleEntry, RuleTable};

use std::collections::HashSet;
use tracing::{debug, info, trace, warn};

/// Stateless scorer that applies a validated rule table to encounter notes.
///
/// Built once at startup and shared by reference; `score` never fails and never mutates.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    table: RuleTable,
    matcher: FuzzyMatcher,
    base_points: u32,
    segmentation: Segmentation,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Result<Self, ScoringConfigError> {
        config.validate_threshold()?;

        let ScoringConfig {
            base_points,
            match_threshold,
            segmentation,
            interventions,
            levels,
        } = config;

        let table = RuleTable::new(interventions, levels)?;
        let matcher = FuzzyMatcher::new(table.all_entries(), match_threshold);

        info!(
            interventions = table.all_entries().len(),
            bands = table.bands().len(),
            base_points,
            match_threshold,
            %segmentation,
            "scoring engine ready"
        );

        Ok(Self {
            table,
            matcher,
            base_points,
            segmentation,
        })
    }

    pub fn reference() -> Result<Self, ScoringConfigError> {
        Self::new(ScoringConfig::reference())
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    pub fn matcher(&self) -> &FuzzyMatcher {
        &self.matcher
    }

    pub fn base_points(&self) -> u32 {
        self.base_points
    }

    pub fn threshold(&self) -> f64 {
        self.matcher.threshold()
    }

    pub fn segmentation(&self) -> Segmentation {
        self.segmentation
    }

    pub fn score(&self, note: &str) -> ScoreResult {
        let mut tally = Tally::new(self.base_points);

        for line in segment::lines(note) {
            match self.segmentation {
                Segmentation::Lines => {
                    if let Some(candidate) = self.matcher.best_match(line) {
                        tally.record(&self.table, candidate, line);
                    }
                }
                Segmentation::Clauses => self.score_line_by_clause(line, &mut tally),
            }
        }

        self.classify(tally, note)
    }

    /// Scores notes independently, keeping input order.
    pub fn score_batch<I, S>(&self, notes: I) -> Vec<ScoreResult>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        notes
            .into_iter()
            .map(|note| self.score(note.as_ref()))
            .collect()
    }

    fn score_line_by_clause(&self, line: &str, tally: &mut Tally) {
        let whole = self.matcher.best_match(line);
        let parts = segment::clauses(line);

        if let Some(candidate) = whole.filter(|c| c.is_verbatim(self.threshold())) {
            tally.record(&self.table, candidate, line);
            // Clauses outside the charted phrase may still name other interventions.
            for clause in parts
                .into_iter()
                .filter(|clause| !self.matcher.covers(candidate.index, clause))
            {
                if let Some(extra) = self.matcher.best_match(clause) {
                    tally.record(&self.table, extra, clause);
                }
            }
            return;
        }

        if parts.len() <= 1 {
            if let Some(candidate) = whole {
                tally.record(&self.table, candidate, line);
            }
            return;
        }

        for clause in parts {
            if let Some(candidate) = self.matcher.best_match(clause) {
                tally.record(&self.table, candidate, clause);
            }
        }
    }

    fn classify(&self, tally: Tally, note: &str) -> ScoreResult {
        let Tally {
            total_points,
            matched_sources,
            ..
        } = tally;

        let band = self.table.band_for(total_points);
        if band.is_none() {
            warn!(total_points, "score falls outside every level band");
        }

        debug!(
            total_points,
            level = band.map_or(0, |band| band.level),
            matched = matched_sources.len(),
            "note scored"
        );

        ScoreResult {
            total_points,
            level: band.map_or(0, |band| band.level),
            code: band.map_or(0, |band| band.code),
            criteria_id: band.map_or(0, |band| band.criteria_id),
            matched_sources,
            raw_input: note.to_string(),
        }
    }
}

/// Running total for one note; each table entry counts at most once.
struct Tally {
    total_points: u32,
    matched_sources: Vec<MatchedSource>,
    seen: HashSet<usize>,
}

impl Tally {
    fn new(base_points: u32) -> Self {
        Self {
            total_points: base_points,
            matched_sources: Vec::new(),
            seen: HashSet::new(),
        }
    }

    fn record(&mut self, table: &RuleTable, candidate: MatchCandidate, segment: &str) {
        let Some(entry) = table.all_entries().get(candidate.index) else {
            return;
        };

        if !self.seen.insert(candidate.index) {
            trace!(phrase = %entry.phrase, segment, "intervention already counted");
            return;
        }

        let distance = candidate.distance.value();
        debug!(phrase = %entry.phrase, points = entry.points, distance, segment, "intervention matched");

        self.total_points = self.total_points.saturating_add(entry.points);
        self.matched_sources.push(MatchedSource {
            phrase: entry.phrase.clone(),
            points: entry.points,
            segment: segment.to_string(),
            distance,
        });
    }
}
