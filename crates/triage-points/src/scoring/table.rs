use super::config::ScoringConfigError;
use super::normalize::{normalize_phrase, tokenize};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One billable intervention description and the points it adds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleEntry {
    #[serde(alias = "text")]
    pub phrase: String,
    #[serde(alias = "point")]
    pub points: u32,
}

impl RuleEntry {
    pub fn new(phrase: impl Into<String>, points: u32) -> Self {
        Self {
            phrase: phrase.into(),
            points,
        }
    }
}

/// Inclusive score range mapped to an acuity level and billing code.
///
/// `max_score` of `None` means the band is unbounded above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelBand {
    #[serde(alias = "min")]
    pub min_score: u32,
    #[serde(alias = "max", default)]
    pub max_score: Option<u32>,
    pub level: u32,
    pub code: u32,
    #[serde(alias = "criteria")]
    pub criteria_id: u32,
}

impl LevelBand {
    pub fn contains(&self, score: u32) -> bool {
        score >= self.min_score && self.max_score.map_or(true, |max| score <= max)
    }
}

/// Validated, read-only intervention table and level bands.
#[derive(Debug, Clone)]
pub struct RuleTable {
    entries: Vec<RuleEntry>,
    bands: Vec<LevelBand>,
}

impl RuleTable {
    pub fn new(entries: Vec<RuleEntry>, bands: Vec<LevelBand>) -> Result<Self, ScoringConfigError> {
        validate_entries(&entries)?;
        validate_bands(&bands)?;
        Ok(Self { entries, bands })
    }

    /// Entries in table order, which is also the tie-break order for matching.
    pub fn all_entries(&self) -> &[RuleEntry] {
        &self.entries
    }

    pub fn bands(&self) -> &[LevelBand] {
        &self.bands
    }

    pub fn band_for(&self, score: u32) -> Option<&LevelBand> {
        let upper = self.bands.partition_point(|band| band.min_score <= score);
        let band = self.bands.get(upper.checked_sub(1)?)?;
        band.contains(score).then_some(band)
    }
}

fn validate_entries(entries: &[RuleEntry]) -> Result<(), ScoringConfigError> {
    let mut seen: HashMap<String, usize> = HashMap::with_capacity(entries.len());

    for (index, entry) in entries.iter().enumerate() {
        if entry.points == 0 {
            return Err(ScoringConfigError::ZeroPoints {
                phrase: entry.phrase.clone(),
            });
        }

        if tokenize(&entry.phrase).is_empty() {
            return Err(ScoringConfigError::UnmatchablePhrase {
                index,
                phrase: entry.phrase.clone(),
            });
        }

        if let Some(first) = seen.insert(normalize_phrase(&entry.phrase), index) {
            return Err(ScoringConfigError::DuplicatePhrase {
                phrase: entry.phrase.clone(),
                first,
                duplicate: index,
            });
        }
    }

    Ok(())
}

fn validate_bands(bands: &[LevelBand]) -> Result<(), ScoringConfigError> {
    let first = bands.first().ok_or(ScoringConfigError::NoLevels)?;
    if first.min_score != 0 {
        return Err(ScoringConfigError::BandStart {
            min_score: first.min_score,
        });
    }

    for band in bands {
        if let Some(max_score) = band.max_score {
            if max_score < band.min_score {
                return Err(ScoringConfigError::InvertedBand {
                    min_score: band.min_score,
                    max_score,
                });
            }
        }
    }

    for pair in bands.windows(2) {
        let (previous, next) = (&pair[0], &pair[1]);
        let previous_max = previous
            .max_score
            .ok_or(ScoringConfigError::UnboundedBandNotLast {
                min_score: previous.min_score,
            })?;

        match previous_max.checked_add(1) {
            Some(expected) if next.min_score == expected => {}
            Some(expected) if next.min_score > expected => {
                return Err(ScoringConfigError::BandGap {
                    previous_max,
                    next_min: next.min_score,
                });
            }
            _ => {
                return Err(ScoringConfigError::BandOverlap {
                    previous_max,
                    next_min: next.min_score,
                });
            }
        }
    }

    match bands.last().and_then(|band| band.max_score) {
        Some(max_score) if max_score < u32::MAX => {
            Err(ScoringConfigError::BoundedTail { max_score })
        }
        _ => Ok(()),
    }
}
