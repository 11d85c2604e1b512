use std::cmp::Reverse;
use std::io::{self, Write};

use wordfreq_log::{wf_debug, wf_info};

use crate::WordCounts;

/// Word/count pairs ordered by count descending, then word ascending.
pub type RankedList = Vec<(String, u64)>;

/// Zero-based `[start, end)` bounds into a [`RankedList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankRange {
    pub start: usize,
    pub end: usize,
}

impl RankRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Header line naming the 1-based ranks covered.
    pub fn header(&self) -> String {
        format!(
            "Words ranked from {}th to {}th by frequency:",
            self.start.saturating_add(1),
            self.end
        )
    }

    /// Sub-slice of `items` covered by this range. Out-of-bounds ends are
    /// truncated; an empty or reversed range yields an empty slice.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let end = self.end.min(items.len());
        let start = self.start.min(end);
        &items[start..end]
    }
}

impl WordCounts {
    pub fn ranked(&self) -> RankedList {
        let mut ranked: RankedList = self
            .iter()
            .map(|(word, count)| (word.to_string(), count))
            .collect();
        ranked.sort_unstable_by(|a, b| (Reverse(a.1), &a.0).cmp(&(Reverse(b.1), &b.0)));
        ranked
    }
}

/// Print the header and one `word: count` line per entry in `range`.
///
/// Returns the entries that were written.
pub fn write_report<W: Write>(
    out: &mut W,
    counts: &WordCounts,
    range: RankRange,
) -> io::Result<RankedList> {
    wf_info!("Sorting {} distinct words by frequency.", counts.len());
    let ranked = counts.ranked();
    wf_info!("Sorting complete. Preparing to print results.");
    wf_debug!("Sorted word counts: {:?}", ranked);

    let selected = range.slice(&ranked).to_vec();
    writeln!(out, "{}", range.header())?;
    for (word, count) in &selected {
        writeln!(out, "{word}: {count}")?;
    }
    out.flush()?;
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_truncates_and_handles_reversed_ranges() {
        let items = [1, 2, 3, 4];
        assert_eq!(RankRange::new(1, 3).slice(&items), &[2, 3]);
        assert_eq!(RankRange::new(2, 10).slice(&items), &[3, 4]);
        assert!(RankRange::new(4, 10).slice(&items).is_empty());
        assert!(RankRange::new(3, 1).slice(&items).is_empty());
        assert!(RankRange::new(0, 0).slice(&items).is_empty());
    }

    #[test]
    fn header_uses_one_based_start() {
        assert_eq!(
            RankRange::new(9, 20).header(),
            "Words ranked from 10th to 20th by frequency:"
        );
    }

    #[test]
    fn ties_break_alphabetically() {
        let counts = WordCounts::from([("pear", 2), ("apple", 2), ("fig", 5), ("kiwi", 1)]);
        let words: Vec<String> = counts.ranked().into_iter().map(|(w, _)| w).collect();
        assert_eq!(words, vec!["fig", "apple", "pear", "kiwi"]);
    }
}
