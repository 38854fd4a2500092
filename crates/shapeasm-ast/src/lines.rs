//! Global offset to line-local position mapping
//!
//! The parser reports byte offsets into the whole program text. Editors
//! address text one line (block) at a time, so every highlight span has to
//! be rebased onto the line it starts on before it can be drawn.

use serde::{Deserialize, Serialize};

use crate::Span;

/// A range within a single line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocalRange {
    /// Zero-based line index
    pub line: usize,
    /// Column of the first byte
    pub start: usize,
    /// Column one past the last byte
    pub end: usize,
}

/// Start offsets of every line, built once per source text
///
/// `starts[i + 1] == starts[i] + len(line i) + 1`, the `+ 1` being the `\n`
/// separator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self {
            starts,
            len: source.len(),
        }
    }

    /// Number of lines; an empty source still has one (empty) line
    pub fn line_count(&self) -> usize {
        self.starts.len()
    }

    pub fn line_start(&self, line: usize) -> usize {
        self.starts[line]
    }

    /// Length of the line without its trailing separator
    pub fn line_len(&self, line: usize) -> usize {
        let end = match self.starts.get(line + 1) {
            Some(next) => next - 1,
            None => self.len,
        };
        end - self.starts[line]
    }

    pub fn line_span(&self, line: usize) -> Span {
        let start = self.starts[line];
        Span::new(start, start + self.line_len(line))
    }

    /// Iterate `(index, global span, text)` for every line
    pub fn lines<'a>(
        &'a self,
        source: &'a str,
    ) -> impl Iterator<Item = (usize, Span, &'a str)> + 'a {
        (0..self.line_count()).map(move |line| {
            let span = self.line_span(line);
            (line, span, span.slice(source))
        })
    }

    /// Line containing a global offset
    pub fn line_of(&self, offset: usize) -> usize {
        self.starts.partition_point(|&start| start <= offset) - 1
    }

    /// Rebase a global span onto the line it starts on
    ///
    /// Returns `None` for empty spans, spans past the end of the text, and
    /// spans that run past the end of their starting line.
    pub fn to_local(&self, span: Span) -> Option<LocalRange> {
        if span.is_empty() || span.end > self.len {
            return None;
        }
        let line = self.line_of(span.start);
        self.local_on_line(line, span)
    }

    /// All spans that fall entirely inside `line`, in line-local columns
    pub fn ranges_on_line(
        &self,
        line: usize,
        spans: impl IntoIterator<Item = Span>,
    ) -> Vec<LocalRange> {
        if line >= self.line_count() {
            return Vec::new();
        }
        spans
            .into_iter()
            .filter_map(|span| self.local_on_line(line, span))
            .collect()
    }

    fn local_on_line(&self, line: usize, span: Span) -> Option<LocalRange> {
        let base = self.starts[line];
        if span.is_empty() || span.start < base {
            return None;
        }
        let start = span.start - base;
        let end = span.end - base;
        if end > self.line_len(line) {
            return None;
        }
        Some(LocalRange { line, start, end })
    }
}

/// Convert global spans into line-local ranges, dropping any that cross a
/// line boundary
pub fn to_local_ranges(
    spans: impl IntoIterator<Item = Span>,
    index: &LineIndex,
) -> Vec<LocalRange> {
    spans
        .into_iter()
        .filter_map(|span| index.to_local(span))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "def main():\n    a = Cuboid(1, 1, 1)\n\n    reflect(a, X)";

    #[test]
    fn test_line_starts() {
        let index = LineIndex::new(SOURCE);
        assert_eq!(index.line_count(), 4);
        assert_eq!(index.line_start(1), 12);
        assert_eq!(index.line_len(0), 11);
        assert_eq!(index.line_len(2), 0);
        assert_eq!(index.line_of(12), 1);
        assert_eq!(index.line_of(11), 0);
    }

    #[test]
    fn test_empty_source_has_one_line() {
        let index = LineIndex::new("");
        assert_eq!(index.line_count(), 1);
        assert_eq!(index.line_len(0), 0);
        assert!(index.to_local(Span::new(0, 0)).is_none());
    }

    #[test]
    fn test_remaps_to_starting_line() {
        let index = LineIndex::new(SOURCE);
        let start = SOURCE.find("a =").unwrap();
        let local = index.to_local(Span::new(start, start + 1)).unwrap();
        assert_eq!(local, LocalRange { line: 1, start: 4, end: 5 });
    }

    #[test]
    fn test_cross_line_span_is_dropped() {
        let index = LineIndex::new(SOURCE);
        let ranges = to_local_ranges([Span::new(5, 20), Span::new(4, 8)], &index);
        assert_eq!(ranges, vec![LocalRange { line: 0, start: 4, end: 8 }]);
    }

    #[test]
    fn test_ranges_on_line_ignores_other_lines() {
        let index = LineIndex::new(SOURCE);
        let last = index.line_count() - 1;
        let x = SOURCE.rfind('X').unwrap();
        let ranges = index.ranges_on_line(last, [Span::new(0, 3), Span::new(x, x + 1)]);
        assert_eq!(ranges, vec![LocalRange { line: 3, start: 15, end: 16 }]);
    }
}
