use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const CONJUNCTIONS: &[&str] = &["and", "then", "plus"];

/// How a note is cut into segments before matching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Segmentation {
    /// Every non-empty line is one segment.
    Lines,
    /// Lines that do not read as a single charted intervention are split into clauses.
    #[default]
    Clauses,
}

impl Segmentation {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Lines => "lines",
            Self::Clauses => "clauses",
        }
    }
}

impl fmt::Display for Segmentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown segmentation '{0}' (expected 'lines' or 'clauses')")]
pub struct UnknownSegmentation(pub String);

impl FromStr for Segmentation {
    type Err = UnknownSegmentation;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "lines" | "line" => Ok(Self::Lines),
            "clauses" | "clause" => Ok(Self::Clauses),
            other => Err(UnknownSegmentation(other.to_string())),
        }
    }
}

/// Trimmed, non-empty lines of a note. Clone the iterator to start over.
#[derive(Debug, Clone)]
pub struct Lines<'a> {
    inner: std::str::Lines<'a>,
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.by_ref().map(str::trim).find(|line| !line.is_empty())
    }
}

pub fn lines(note: &str) -> Lines<'_> {
    Lines {
        inner: note.lines(),
    }
}

/// Splits one line into clauses.
///
/// Boundaries are `,` `;` `!` `?`, a `.` followed by whitespace or the end of the line, and
/// the standalone words in `CONJUNCTIONS`. Nothing inside parentheses or brackets is split.
pub fn clauses(line: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut chars = line.char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            _ if depth > 0 => {}
            ',' | ';' | '!' | '?' => {
                push_clause(&mut pieces, &line[start..offset]);
                start = offset + c.len_utf8();
            }
            '.' if chars.peek().map_or(true, |(_, next)| next.is_whitespace()) => {
                push_clause(&mut pieces, &line[start..offset]);
                start = offset + c.len_utf8();
            }
            c if c.is_whitespace() => {
                let after = offset + c.len_utf8();
                if let Some(len) = conjunction_len(&line[after..]) {
                    push_clause(&mut pieces, &line[start..offset]);
                    start = after + len;
                    while chars.peek().is_some_and(|(next, _)| *next < start) {
                        chars.next();
                    }
                }
            }
            _ => {}
        }
    }

    push_clause(&mut pieces, &line[start..]);
    pieces
}

fn conjunction_len(rest: &str) -> Option<usize> {
    let end = rest.find(char::is_whitespace)?;
    let word = &rest[..end];
    CONJUNCTIONS
        .iter()
        .any(|conjunction| word.eq_ignore_ascii_case(conjunction))
        .then_some(end)
}

fn push_clause<'a>(pieces: &mut Vec<&'a str>, piece: &'a str) {
    let trimmed = piece.trim();
    if !trimmed.is_empty() {
        pieces.push(trimmed);
    }
}
