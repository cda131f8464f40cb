//! Selection expressions for picking entries from a numbered list.
//!
//! An expression is a comma-separated list of tokens:
//! - `N` selects entry N
//! - `N-M` selects N through M inclusive
//! - `!N` (or `!N-M`) excludes those entries even if another token selected them
//!
//! Indices are 1-based. `"1,3-5,!4"` selects `[1, 3, 5]`.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use thiserror::Error;

/// Grammar for a whole expression.
static EXPRESSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^!?\d+(?:-\d+)?(?:,!?\d+(?:-\d+)?)*$").expect("selection grammar is valid")
});

/// Widest range a single token may expand to.
pub const MAX_RANGE_SPAN: usize = 65_536;

/// Reasons an expression is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// The expression does not match the grammar
    #[error("Not a valid range: {0:?}")]
    Syntax(String),

    /// A number is zero or does not fit in an index
    #[error("Not a valid range: {0:?} is not a positive index")]
    BadIndex(String),

    /// A range token expands to too many values
    #[error("Not a valid range: {0:?} spans more than {MAX_RANGE_SPAN} entries")]
    TooWide(String),
}

/// One parsed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Token {
    start: usize,
    end: usize,
    negated: bool,
}

impl Token {
    fn parse(raw: &str) -> Result<Self, SelectionError> {
        let (negated, body) = match raw.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };

        let (start, end) = match body.split_once('-') {
            Some((lo, hi)) => (parse_index(lo)?, parse_index(hi)?),
            None => {
                let n = parse_index(body)?;
                (n, n)
            }
        };

        if end >= start && end - start >= MAX_RANGE_SPAN {
            return Err(SelectionError::TooWide(raw.to_string()));
        }

        Ok(Self {
            start,
            end,
            negated,
        })
    }

    /// Ascending run of values; empty when the range is descending.
    fn values(&self) -> impl Iterator<Item = usize> {
        self.start..=self.end
    }
}

fn parse_index(raw: &str) -> Result<usize, SelectionError> {
    match raw.parse::<usize>() {
        Ok(0) | Err(_) => Err(SelectionError::BadIndex(raw.to_string())),
        Ok(n) => Ok(n),
    }
}

/// Parse an expression, reporting why it is invalid.
pub fn try_parse(expression: &str) -> Result<Vec<usize>, SelectionError> {
    let expression = expression.trim();
    if !EXPRESSION.is_match(expression) {
        return Err(SelectionError::Syntax(expression.to_string()));
    }

    let tokens = expression
        .split(',')
        .map(Token::parse)
        .collect::<Result<Vec<_>, _>>()?;

    let excluded: HashSet<usize> = tokens
        .iter()
        .filter(|t| t.negated)
        .flat_map(Token::values)
        .collect();

    let mut seen = HashSet::new();
    let selected = tokens
        .iter()
        .filter(|t| !t.negated)
        .flat_map(Token::values)
        .filter(|n| !excluded.contains(n))
        .filter(|n| seen.insert(*n))
        .collect();

    Ok(selected)
}

/// Parse an expression into a deduplicated, order-preserving list of indices.
///
/// An invalid expression is logged and yields an empty list; the caller
/// decides whether that aborts anything. Use [`try_parse`] to show the reason
/// to the operator.
pub fn parse(expression: &str) -> Vec<usize> {
    try_parse(expression).unwrap_or_else(|e| {
        tracing::warn!(expression, error = %e, "rejected selection expression");
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_expression() {
        assert_eq!(parse("1,3-5,!4"), vec![1, 3, 5]);
    }

    #[test]
    fn test_single_value_range() {
        assert_eq!(parse("2-2"), vec![2]);
    }

    #[test]
    fn test_duplicates_removed() {
        assert_eq!(parse("1,1,1"), vec![1]);
        assert_eq!(parse("3,1-4,2"), vec![3, 1, 2, 4]);
    }

    #[test]
    fn test_only_negated_is_empty() {
        assert_eq!(parse("!1"), Vec::<usize>::new());
        assert_eq!(parse("!1,!2-3"), Vec::<usize>::new());
    }

    #[test]
    fn test_invalid_expression_is_empty() {
        assert_eq!(parse("abc"), Vec::<usize>::new());
        assert!(matches!(try_parse("abc"), Err(SelectionError::Syntax(_))));
        assert!(matches!(try_parse("1,,2"), Err(SelectionError::Syntax(_))));
        assert!(matches!(try_parse("1-2-3"), Err(SelectionError::Syntax(_))));
        assert!(matches!(try_parse(""), Err(SelectionError::Syntax(_))));
    }

    #[test]
    fn test_exclusion_removes_every_occurrence() {
        assert_eq!(parse("2,1-3,2,!2"), vec![1, 3]);
    }

    #[test]
    fn test_exclusion_order_does_not_matter() {
        assert_eq!(parse("!4,3-5"), vec![3, 5]);
    }

    #[test]
    fn test_negated_range() {
        assert_eq!(parse("1-6,!2-4"), vec![1, 5, 6]);
    }

    #[test]
    fn test_descending_range_is_empty() {
        assert_eq!(parse("5-3"), Vec::<usize>::new());
        assert_eq!(parse("5-3,1"), vec![1]);
    }

    #[test]
    fn test_surrounding_whitespace_ignored() {
        assert_eq!(parse("  1,2\n"), vec![1, 2]);
    }

    #[test]
    fn test_zero_is_rejected() {
        assert!(matches!(try_parse("0"), Err(SelectionError::BadIndex(_))));
        assert!(matches!(try_parse("0-3"), Err(SelectionError::BadIndex(_))));
    }

    #[test]
    fn test_overflow_is_rejected() {
        assert!(matches!(
            try_parse("99999999999999999999999"),
            Err(SelectionError::BadIndex(_))
        ));
    }

    #[test]
    fn test_huge_range_is_rejected() {
        assert!(matches!(
            try_parse("1-1000000"),
            Err(SelectionError::TooWide(_))
        ));
        assert_eq!(try_parse("1-65536").unwrap().len(), 65_536);
    }
}
