use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use wordfreq_log::{wf_info, wf_trace};

use crate::ContentHandle;

/// How raw content is fed to the counter. Both modes yield identical counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessMode {
    /// Decode and tokenize one line at a time.
    Line,
    /// Decode the whole document, then tokenize it in one pass.
    #[default]
    All,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown process mode {0:?} (expected \"line\" or \"all\")")]
pub struct UnknownProcessMode(pub String);

impl FromStr for ProcessMode {
    type Err = UnknownProcessMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "line" => Ok(ProcessMode::Line),
            "all" => Ok(ProcessMode::All),
            _ => Err(UnknownProcessMode(s.to_string())),
        }
    }
}

impl fmt::Display for ProcessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessMode::Line => write!(f, "line"),
            ProcessMode::All => write!(f, "all"),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("content is not valid UTF-8 (first invalid byte at offset {offset})")]
    Content { offset: usize },
    #[error("line {line} is not valid UTF-8 (first invalid byte at offset {offset})")]
    Line { line: usize, offset: usize },
}

/// Normalized word -> occurrence count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordCounts {
    counts: HashMap<String, u64>,
}

impl WordCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, word: String) {
        *self.counts.entry(word).or_default() += 1;
    }

    pub fn get(&self, word: &str) -> u64 {
        self.counts.get(word).copied().unwrap_or(0)
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all occurrence counts.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(word, count)| (word.as_str(), *count))
    }

    fn add_text(&mut self, text: &str) {
        for word in normalize(text) {
            self.add(word);
        }
    }
}

impl<const N: usize> From<[(&str, u64); N]> for WordCounts {
    fn from(entries: [(&str, u64); N]) -> Self {
        Self {
            counts: entries
                .into_iter()
                .map(|(word, count)| (word.to_string(), count))
                .collect(),
        }
    }
}

/// Split text into normalized words: ASCII punctuation acts as a separator,
/// words are lowercased, empty tokens are dropped.
pub fn normalize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(is_separator)
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
}

// Unicode whitespace plus the ASCII information separators (FS, GS, RS, US),
// which regex `\s` also matches.
fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c) || c.is_ascii_punctuation()
}

pub fn count_text(text: &str) -> WordCounts {
    let mut counts = WordCounts::new();
    counts.add_text(text);
    counts
}

/// Count words over a sequence of raw lines, decoding each one as UTF-8.
pub fn count_lines<I, L>(lines: I) -> Result<WordCounts, DecodeError>
where
    I: IntoIterator<Item = L>,
    L: AsRef<[u8]>,
{
    let mut counts = WordCounts::new();
    for (index, line) in lines.into_iter().enumerate() {
        let text = std::str::from_utf8(line.as_ref()).map_err(|err| DecodeError::Line {
            line: index + 1,
            offset: err.valid_up_to(),
        })?;
        wf_trace!("Counting line {} ({} bytes)", index + 1, text.len());
        counts.add_text(text);
    }
    Ok(counts)
}

/// Count words in `content` using the given processing strategy.
pub fn count_words<C>(content: &C, mode: ProcessMode) -> Result<WordCounts, DecodeError>
where
    C: ContentHandle + ?Sized,
{
    wf_info!("Starting word count processing.");
    let counts = match mode {
        ProcessMode::Line => {
            wf_info!("Processing line by line...");
            let counts = count_lines(content.lines())?;
            wf_info!("Completed line-by-line processing.");
            counts
        }
        ProcessMode::All => {
            wf_info!("Processing all at once...");
            let text = std::str::from_utf8(content.read_all()).map_err(|err| {
                DecodeError::Content {
                    offset: err.valid_up_to(),
                }
            })?;
            let counts = count_text(text);
            wf_info!("Completed all-at-once processing.");
            counts
        }
    };
    wf_info!(
        "Counted {} words ({} distinct).",
        counts.total(),
        counts.len()
    );
    Ok(counts)
}
