//! Parsing of the interactive deletion selection.

use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SelectionError {
    #[error("'{0}' is not a number or range")]
    Invalid(String),

    #[error("{index} is out of range (1-{count})")]
    OutOfRange { index: usize, count: usize },
}

/// Parse a selection over `count` numbered items into zero-based indices.
///
/// Accepts 1-based numbers and inclusive ranges separated by commas or
/// spaces (`1,3-5 8`), or `all`. Blank input selects nothing.
///
/// # Example
/// ```
/// use tidyup::cleaner::parse_selection;
///
/// assert_eq!(parse_selection("1,3-4", 5).unwrap(), vec![0, 2, 3]);
/// assert_eq!(parse_selection("all", 3).unwrap(), vec![0, 1, 2]);
/// assert!(parse_selection("", 3).unwrap().is_empty());
/// ```
pub fn parse_selection(input: &str, count: usize) -> Result<Vec<usize>, SelectionError> {
    let input = input.trim();
    if input.eq_ignore_ascii_case("all") || input == "*" {
        return Ok((0..count).collect());
    }

    let mut selected = BTreeSet::new();
    for token in input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
    {
        let (start, end) = match token.split_once('-') {
            Some((start, end)) => (parse_index(start, token)?, parse_index(end, token)?),
            None => {
                let index = parse_index(token, token)?;
                (index, index)
            }
        };

        for index in [start, end] {
            if index == 0 || index > count {
                return Err(SelectionError::OutOfRange { index, count });
            }
        }
        if start > end {
            return Err(SelectionError::Invalid(token.to_string()));
        }

        selected.extend((start..=end).map(|i| i - 1));
    }

    Ok(selected.into_iter().collect())
}

fn parse_index(text: &str, token: &str) -> Result<usize, SelectionError> {
    text.trim()
        .parse()
        .map_err(|_| SelectionError::Invalid(token.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_numbers() {
        assert_eq!(parse_selection("2", 3).unwrap(), vec![1]);
        assert_eq!(parse_selection("3, 1", 3).unwrap(), vec![0, 2]);
    }

    #[test]
    fn test_ranges_and_duplicates() {
        assert_eq!(parse_selection("1-3,2 5", 5).unwrap(), vec![0, 1, 2, 4]);
    }

    #[test]
    fn test_all_keyword() {
        assert_eq!(parse_selection(" ALL ", 2).unwrap(), vec![0, 1]);
        assert_eq!(parse_selection("*", 2).unwrap(), vec![0, 1]);
        assert!(parse_selection("all", 0).unwrap().is_empty());
    }

    #[test]
    fn test_blank_selects_nothing() {
        assert!(parse_selection("", 4).unwrap().is_empty());
        assert!(parse_selection("  \n", 4).unwrap().is_empty());
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(
            parse_selection("4", 3),
            Err(SelectionError::OutOfRange { index: 4, count: 3 })
        );
        assert_eq!(
            parse_selection("0", 3),
            Err(SelectionError::OutOfRange { index: 0, count: 3 })
        );
    }

    #[test]
    fn test_malformed_input() {
        assert!(matches!(parse_selection("x", 3), Err(SelectionError::Invalid(_))));
        assert!(matches!(parse_selection("1-", 3), Err(SelectionError::Invalid(_))));
        assert!(matches!(parse_selection("3-1", 3), Err(SelectionError::Invalid(_))));
    }
}
