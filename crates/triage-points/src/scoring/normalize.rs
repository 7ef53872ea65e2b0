/// Words that carry no charting signal. They are dropped from notes and phrases alike.
const STOP_WORDS: &[&str] = &[
    "a", "also", "an", "and", "are", "as", "at", "be", "been", "by", "done", "for", "given",
    "had", "has", "have", "in", "is", "of", "on", "or", "patient", "per", "performed", "pt",
    "received", "such", "the", "then", "to", "was", "were", "w", "with",
];

/// A lowercased word of a note segment or table phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    chars: Vec<char>,
}

impl Token {
    pub(crate) fn len(&self) -> usize {
        self.chars.len()
    }

    pub(crate) fn chars(&self) -> &[char] {
        &self.chars
    }
}

fn strip_invisible(value: &str) -> String {
    value.replace(['\u{feff}', '\u{200b}'], "")
}

/// Canonical form used to decide whether two table phrases are the same intervention.
pub(crate) fn normalize_phrase(value: &str) -> String {
    let cleaned = strip_invisible(value);
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_lowercase()
}

pub(crate) fn tokenize(value: &str) -> Vec<Token> {
    strip_invisible(value)
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty() && !STOP_WORDS.contains(word))
        .map(|word| Token {
            chars: word.chars().collect(),
        })
        .collect()
}

#[cfg(test)]
pub(crate) fn token_texts(value: &str) -> Vec<String> {
    tokenize(value)
        .into_iter()
        .map(|token| token.chars.into_iter().collect())
        .collect()
}
