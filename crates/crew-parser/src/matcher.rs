use crate::lexicon::MatchMode;

/// Keyword search honoring the lexicon's match mode
#[derive(Debug, Clone, Copy)]
pub struct KeywordMatcher {
    mode: MatchMode,
}

impl KeywordMatcher {
    pub fn new(mode: MatchMode) -> Self {
        Self { mode }
    }

    pub fn contains(&self, text: &str, key: &str) -> bool {
        self.occurrences(text, key).next().is_some()
    }

    pub fn contains_any(&self, text: &str, keys: &[String]) -> bool {
        keys.iter().any(|k| self.contains(text, k))
    }

    /// Byte offsets of every non-overlapping occurrence of `key`.
    pub fn occurrences<'a>(&self, text: &'a str, key: &'a str) -> Occurrences<'a> {
        Occurrences {
            text,
            key,
            mode: self.mode,
            start: 0,
        }
    }
}

pub struct Occurrences<'a> {
    text: &'a str,
    key: &'a str,
    mode: MatchMode,
    start: usize,
}

impl Iterator for Occurrences<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.key.is_empty() {
            return None;
        }
        while self.start <= self.text.len() {
            let rel = self.text.get(self.start..)?.find(self.key)?;
            let idx = self.start + rel;
            let end = idx + self.key.len();

            if self.mode == MatchMode::Substring || is_word_bounded(self.text, idx, end) {
                self.start = end;
                return Some(idx);
            }

            // step one character past the rejected hit
            let step = self.text[idx..].chars().next().map_or(1, char::len_utf8);
            self.start = idx + step;
        }
        None
    }
}

fn is_word_bounded(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}
