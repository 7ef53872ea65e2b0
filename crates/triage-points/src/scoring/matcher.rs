use super::normalize::{tokenize, Token};
use super::table::RuleEntry;
use std::cmp::Ordering;

/// Share of the stronger containment direction in the combined distance, out of four.
const CONTAINMENT_WEIGHT: u64 = 3;
const WEIGHT_TOTAL: u64 = 4;
/// A segment reads as the phrase itself when both directions miss less than this share of
/// the match threshold.
const VERBATIM_SHARE: f64 = 0.5;
/// Shorter note words (the "o" of "w/o", a stray initial) are too ambiguous to match on.
const MIN_SEGMENT_TOKEN_LEN: usize = 2;

/// Normalized dissimilarity in `[0, 1]`, held as an exact fraction.
///
/// Keeping the fraction makes ties and the threshold boundary exact instead of depending
/// on floating point accumulation order.
#[derive(Debug, Clone, Copy)]
pub struct Distance {
    numerator: u64,
    denominator: u64,
}

impl Distance {
    pub const ZERO: Distance = Distance {
        numerator: 0,
        denominator: 1,
    };

    pub const MAX: Distance = Distance {
        numerator: 1,
        denominator: 1,
    };

    fn ratio(numerator: u64, denominator: u64) -> Self {
        if denominator == 0 {
            return Self::MAX;
        }
        Self {
            numerator,
            denominator,
        }
    }

    pub fn value(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    pub fn within(self, threshold: f64) -> bool {
        self.value() <= threshold
    }

    fn blend(strong: Distance, weak: Distance) -> Distance {
        Distance::ratio(
            CONTAINMENT_WEIGHT * strong.numerator * weak.denominator
                + weak.numerator * strong.denominator,
            WEIGHT_TOTAL * strong.denominator * weak.denominator,
        )
    }
}

impl PartialEq for Distance {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Distance {}

impl PartialOrd for Distance {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Distance {
    fn cmp(&self, other: &Self) -> Ordering {
        let left = self.numerator as u128 * other.denominator as u128;
        let right = other.numerator as u128 * self.denominator as u128;
        left.cmp(&right)
    }
}

/// Closest table entry for a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchCandidate {
    /// Position of the entry in table order.
    pub index: usize,
    pub distance: Distance,
    /// Worse of the two containment directions; small when segment and phrase read alike.
    pub looser_containment: Distance,
}

impl MatchCandidate {
    pub fn is_verbatim(&self, threshold: f64) -> bool {
        self.looser_containment.within(threshold * VERBATIM_SHARE)
    }
}

/// Token-weighted edit-distance matcher over a fixed intervention table.
///
/// Phrases are tokenized once at construction; the matcher is immutable afterwards and
/// safe to share between threads.
#[derive(Debug, Clone)]
pub struct FuzzyMatcher {
    threshold: f64,
    phrases: Vec<Vec<Token>>,
}

impl FuzzyMatcher {
    pub fn new(entries: &[RuleEntry], threshold: f64) -> Self {
        let phrases = entries.iter().map(|entry| tokenize(&entry.phrase)).collect();
        Self { threshold, phrases }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Lowest-distance entry, if it is within the threshold. Ties go to the earliest entry.
    pub fn best_match(&self, segment: &str) -> Option<MatchCandidate> {
        let tokens = segment_tokens(segment);
        if tokens.is_empty() {
            return None;
        }

        let mut best: Option<MatchCandidate> = None;
        for (index, phrase) in self.phrases.iter().enumerate() {
            let Some(candidate) = compare(index, &tokens, phrase) else {
                continue;
            };
            if best.map_or(true, |current| candidate.distance < current.distance) {
                best = Some(candidate);
            }
        }

        best.filter(|candidate| candidate.distance.within(self.threshold))
    }

    /// Distance between a segment and one table entry, regardless of the threshold.
    pub fn distance_to(&self, segment: &str, index: usize) -> Option<Distance> {
        let phrase = self.phrases.get(index)?;
        compare(index, &segment_tokens(segment), phrase).map(|candidate| candidate.distance)
    }

    /// Whether every word of `segment` already appears in entry `index`, so matching the
    /// segment on its own could only repeat that entry.
    pub fn covers(&self, index: usize, segment: &str) -> bool {
        let Some(phrase) = self.phrases.get(index) else {
            return false;
        };
        let tokens = segment_tokens(segment);
        tokens.is_empty()
            || containment(&tokens, phrase).within(self.threshold * VERBATIM_SHARE)
    }
}

fn segment_tokens(segment: &str) -> Vec<Token> {
    let mut tokens = tokenize(segment);
    tokens.retain(|token| token.len() >= MIN_SEGMENT_TOKEN_LEN);
    tokens
}

fn compare(index: usize, segment: &[Token], phrase: &[Token]) -> Option<MatchCandidate> {
    if segment.is_empty() || phrase.is_empty() {
        return None;
    }

    let phrase_in_segment = containment(phrase, segment);
    let segment_in_phrase = containment(segment, phrase);
    let (strong, weak) = if phrase_in_segment <= segment_in_phrase {
        (phrase_in_segment, segment_in_phrase)
    } else {
        (segment_in_phrase, phrase_in_segment)
    };

    Some(MatchCandidate {
        index,
        distance: Distance::blend(strong, weak),
        looser_containment: weak,
    })
}

/// Share of `from`'s characters that cannot be found in `into`, token by token.
fn containment(from: &[Token], into: &[Token]) -> Distance {
    let mut missing = 0u64;
    let mut total = 0u64;

    for token in from {
        let len = token.len();
        let mut best = len;
        for other in into {
            best = best.min(levenshtein(token.chars(), other.chars()));
            if best == 0 {
                break;
            }
        }
        missing += best as u64;
        total += len as u64;
    }

    Distance::ratio(missing, total)
}

fn levenshtein(a: &[char], b: &[char]) -> usize {
    if a == b {
        return 0;
    }
    if a.is_empty() || b.is_empty() {
        return a.len().max(b.len());
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, left) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, right) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(left != right);
            current[j + 1] = substitution
                .min(previous[j + 1] + 1)
                .min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}
