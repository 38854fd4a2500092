//! ShapeAssembly Highlighting - token classes in line-local coordinates
//!
//! Parses once per text, pulls each token class out of the parse result as
//! global spans, and rebases them onto the line they start on. Spans that
//! run across a line break are dropped rather than clipped.

use serde::{Deserialize, Serialize};
use shapeasm_ast::{to_local_ranges, LineIndex, LocalRange, Span};
use shapeasm_parser::{parse_program, ParseResult};
use tracing::debug;

/// What a highlighted range represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TokenClass {
    DefinitionName,
    DefinitionParameter,
    VariableReference,
    Error,
}

impl TokenClass {
    pub const ALL: [TokenClass; 4] = [
        TokenClass::DefinitionName,
        TokenClass::DefinitionParameter,
        TokenClass::VariableReference,
        TokenClass::Error,
    ];
}

/// One range to decorate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
    pub class: TokenClass,
    pub range: LocalRange,
}

/// Global spans for one token class
pub fn classify(result: &ParseResult, class: TokenClass) -> Box<dyn Iterator<Item = Span> + '_> {
    match class {
        TokenClass::DefinitionName => Box::new(result.definition_names()),
        TokenClass::DefinitionParameter => Box::new(result.definition_parameters()),
        TokenClass::VariableReference => Box::new(result.variable_references()),
        TokenClass::Error => Box::new(result.error_spans()),
    }
}

/// A parsed text ready to answer per-line highlight queries
pub struct Highlighter {
    result: ParseResult,
    index: LineIndex,
}

impl Highlighter {
    pub fn new(source: &str) -> Self {
        Self {
            result: parse_program(source),
            index: LineIndex::new(source),
        }
    }

    pub fn result(&self) -> &ParseResult {
        &self.result
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.index
    }

    /// Every highlight, sorted by line, then column, then class
    pub fn all(&self) -> Vec<Highlight> {
        let mut highlights: Vec<Highlight> = TokenClass::ALL
            .iter()
            .flat_map(|&class| {
                to_local_ranges(classify(&self.result, class), &self.index)
                    .into_iter()
                    .map(move |range| Highlight { class, range })
            })
            .collect();
        highlights.sort_by_key(|h| (h.range.line, h.range.start, h.class));
        debug!(count = highlights.len(), "computed highlights");
        highlights
    }

    /// Highlights for a single line, the way a per-block decorator asks
    pub fn line(&self, line: usize) -> Vec<Highlight> {
        let mut highlights: Vec<Highlight> = TokenClass::ALL
            .iter()
            .flat_map(|&class| {
                self.index
                    .ranges_on_line(line, classify(&self.result, class))
                    .into_iter()
                    .map(move |range| Highlight { class, range })
            })
            .collect();
        highlights.sort_by_key(|h| (h.range.start, h.class));
        highlights
    }
}

/// Parse `source` and return every highlight in line-local coordinates
pub fn highlight(source: &str) -> Vec<Highlight> {
    Highlighter::new(source).all()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "\
def main():
    bbox = Cuboid(1, 1, 1)
    top = reflect(bbox, Y)
    reflect(nothing, X)
def part(l, w, h, aligned):
";

    fn local(line: usize, start: usize, end: usize) -> LocalRange {
        LocalRange { line, start, end }
    }

    #[test]
    fn test_all_highlights() {
        let highlights = highlight(SOURCE);
        let expected = vec![
            Highlight { class: TokenClass::DefinitionName, range: local(0, 4, 8) },
            Highlight { class: TokenClass::VariableReference, range: local(1, 4, 8) },
            Highlight { class: TokenClass::VariableReference, range: local(2, 4, 7) },
            Highlight { class: TokenClass::VariableReference, range: local(2, 18, 22) },
            Highlight { class: TokenClass::Error, range: local(3, 12, 19) },
            Highlight { class: TokenClass::DefinitionName, range: local(4, 4, 8) },
            Highlight { class: TokenClass::DefinitionParameter, range: local(4, 9, 10) },
            Highlight { class: TokenClass::DefinitionParameter, range: local(4, 12, 13) },
            Highlight { class: TokenClass::DefinitionParameter, range: local(4, 15, 16) },
            Highlight { class: TokenClass::DefinitionParameter, range: local(4, 18, 25) },
        ];
        assert_eq!(highlights, expected);
    }

    #[test]
    fn test_single_line_matches_all() {
        let highlighter = Highlighter::new(SOURCE);
        let all = highlighter.all();
        for line in 0..highlighter.line_index().line_count() {
            let from_all: Vec<_> = all.iter().filter(|h| h.range.line == line).copied().collect();
            assert_eq!(highlighter.line(line), from_all, "line {line}");
        }
    }

    #[test]
    fn test_ranges_stay_inside_text() {
        let source = "def main(\n    x = Cuboid(1,\n";
        let highlighter = Highlighter::new(source);
        assert!(highlighter.result().has_errors());
        for class in TokenClass::ALL {
            for span in classify(highlighter.result(), class) {
                assert!(span.start < span.end && span.end <= source.len());
            }
        }
    }
}
