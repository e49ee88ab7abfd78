//! State description parser
//!
//! The description is a positional stream of whitespace-delimited integers:
//! the process and resource counts, the resource totals, the claim matrix and
//! the allocation matrix, in that order. Any line whose first non-whitespace
//! character is `#` is skipped, and a `#` token later on a line comments out
//! the rest of that line.

use crate::store::Capacity;
use banker_errors::StateLoadError;
use banker_types::Matrix;
use std::str::{Lines, SplitWhitespace};
use tracing::debug;

const COMMENT: char = '#';

const COUNTS: &str = "process and resource counts";
const TOTALS: &str = "resource totals";
const CLAIM: &str = "claim matrix";
const ALLOCATION: &str = "allocation matrix";

/// Raw contents of a description, before anything is derived from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Description {
    pub totals: Vec<i64>,
    pub claim: Matrix,
    pub allocation: Matrix,
}

#[derive(Debug, Clone, Copy)]
struct Token<'a> {
    line: usize,
    text: &'a str,
}

/// Whitespace tokenizer that drops comments
struct Tokens<'a> {
    lines: std::iter::Enumerate<Lines<'a>>,
    current: Option<(usize, SplitWhitespace<'a>)>,
}

impl<'a> Tokens<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            lines: input.lines().enumerate(),
            current: None,
        }
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((line, words)) = self.current.as_mut() {
                match words.next() {
                    Some(text) if !text.starts_with(COMMENT) => {
                        return Some(Token { line: *line, text });
                    }
                    _ => self.current = None,
                }
            }
            let (index, text) = self.lines.next()?;
            self.current = Some((index + 1, text.split_whitespace()));
        }
    }
}

struct Reader<'a> {
    tokens: Tokens<'a>,
}

impl<'a> Reader<'a> {
    fn next_token(&mut self, block: &str, expected: &str) -> Result<Token<'a>, StateLoadError> {
        self.tokens.next().ok_or_else(|| StateLoadError::Truncated {
            block: block.to_string(),
            expected: expected.to_string(),
        })
    }

    fn count(&mut self, block: &str, expected: &str) -> Result<usize, StateLoadError> {
        let token = self.next_token(block, expected)?;
        token
            .text
            .parse()
            .map_err(|_| malformed(block, expected, token))
    }

    fn cell(&mut self, block: &str) -> Result<i64, StateLoadError> {
        let token = self.next_token(block, "integer")?;
        token
            .text
            .parse()
            .map_err(|_| malformed(block, "integer", token))
    }

    fn vector(&mut self, block: &str, len: usize) -> Result<Vec<i64>, StateLoadError> {
        (0..len).map(|_| self.cell(block)).collect()
    }

    fn matrix(&mut self, block: &str, rows: usize, cols: usize) -> Result<Matrix, StateLoadError> {
        let data = self.vector(block, rows * cols)?;
        Matrix::from_flat(rows, cols, data).ok_or_else(|| StateLoadError::ShapeMismatch {
            block: block.to_string(),
            expected: format!("{rows}x{cols}"),
            found: "a different cell count".to_string(),
        })
    }
}

fn malformed(block: &str, expected: &str, token: Token<'_>) -> StateLoadError {
    StateLoadError::Malformed {
        block: block.to_string(),
        line: token.line,
        expected: expected.to_string(),
        found: token.text.to_string(),
    }
}

/// Parse a complete description, checking the counts against `capacity`
/// before any matrix is read
///
/// A passing capacity check guarantees `processes * resources` fits in `usize`.
pub(crate) fn parse(input: &str, capacity: Capacity) -> Result<Description, StateLoadError> {
    let mut reader = Reader {
        tokens: Tokens::new(input),
    };

    let processes = reader.count(COUNTS, "process count")?;
    let resources = reader.count(COUNTS, "resource count")?;
    capacity.check(processes, resources)?;

    let totals = reader.vector(TOTALS, resources)?;
    let claim = reader.matrix(CLAIM, processes, resources)?;
    let allocation = reader.matrix(ALLOCATION, processes, resources)?;

    let trailing = reader.tokens.count();
    if trailing > 0 {
        debug!(trailing, "Ignoring tokens after the allocation matrix");
    }

    Ok(Description {
        totals,
        claim,
        allocation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<(usize, &str)> {
        Tokens::new(input).map(|t| (t.line, t.text)).collect()
    }

    #[test]
    fn test_tokens_skip_comment_lines() {
        let input = "# header\n  # indented comment\n2 3\n\n#between\n4 5 6\n";
        assert_eq!(tokens(input), vec![(3, "2"), (3, "3"), (6, "4"), (6, "5"), (6, "6")]);
    }

    #[test]
    fn test_tokens_trailing_comment() {
        assert_eq!(tokens("1 2 # totals\n3"), vec![(1, "1"), (1, "2"), (2, "3")]);
    }

    #[test]
    fn test_parse_minimal() {
        let desc = parse("1 1\n5\n5\n5\n", Capacity::default()).unwrap();
        assert_eq!(desc.totals, vec![5]);
        assert_eq!(desc.claim.row(0), Some(&[5][..]));
        assert_eq!(desc.allocation.row(0), Some(&[5][..]));
    }

    #[test]
    fn test_parse_zero_resources() {
        let desc = parse("2 0\n", Capacity::default()).unwrap();
        assert!(desc.totals.is_empty());
        assert_eq!(desc.claim.rows(), 2);
        assert_eq!(desc.claim.cols(), 0);
    }

    #[test]
    fn test_parse_ignores_trailing_tokens() {
        let desc = parse("1 1 5 5 5 99 extra", Capacity::default()).unwrap();
        assert_eq!(desc.totals, vec![5]);
    }

    #[test]
    fn test_truncated_allocation() {
        let err = parse("2 1\n4\n1\n1\n0\n", Capacity::default()).unwrap_err();
        match err {
            StateLoadError::Truncated { block, .. } => assert_eq!(block, ALLOCATION),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_numeric_cell() {
        let err = parse("1 2\n4 x\n", Capacity::default()).unwrap_err();
        match err {
            StateLoadError::Malformed {
                block, line, found, ..
            } => {
                assert_eq!(block, TOTALS);
                assert_eq!(line, 2);
                assert_eq!(found, "x");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_negative_count_is_malformed() {
        let err = parse("-1 2\n", Capacity::default()).unwrap_err();
        assert!(matches!(err, StateLoadError::Malformed { .. }));
    }

    #[test]
    fn test_capacity_checked_before_matrices() {
        // Nothing after the counts: capacity must fail first, not truncation
        let err = parse("21 3\n", Capacity::default()).unwrap_err();
        assert!(matches!(
            err,
            StateLoadError::CapacityExceeded {
                processes: 21,
                resources: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_cell_count_overflow_is_capacity_error() {
        let capacity = Capacity::new(usize::MAX, usize::MAX);
        let err = parse(&format!("{} 2\n", usize::MAX), capacity).unwrap_err();
        assert!(matches!(err, StateLoadError::CapacityExceeded { resources: 2, .. }));
    }

    #[test]
    fn test_empty_input_is_truncated() {
        let err = parse("# only a comment\n", Capacity::default()).unwrap_err();
        assert!(matches!(err, StateLoadError::Truncated { .. }));
    }
}
