//! Wordfreq core: pure tokenizing, counting and ranked reporting.
mod content;
mod count;
mod report;

pub use content::{ByteLines, ContentHandle};
pub use count::{
    count_lines, count_text, count_words, normalize, DecodeError, ProcessMode,
    UnknownProcessMode, WordCounts,
};
pub use report::{write_report, RankRange, RankedList};
