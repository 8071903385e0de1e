//! Source formatters for the supported asset kinds.
//!
//! Each formatter is a conservative scanner over the raw source text.
//! No syntax tree is built; the scanners know just enough about
//! comments, strings and nesting to rewrite whitespace without
//! changing what the code means.

pub mod css;
pub mod html;
pub mod javascript;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("{message} at line {line}, col {col}")]
    Syntax {
        line: usize,
        col: usize,
        message: String,
    },
}

/// Build a syntax error pointing at a byte offset in `src`.
pub(crate) fn syntax_error(src: &str, offset: usize, message: impl Into<String>) -> FormatError {
    let (line, col) = line_col(src, offset);
    FormatError::Syntax {
        line,
        col,
        message: message.into(),
    }
}

/// 1-based line and column of a byte offset
fn line_col(src: &str, offset: usize) -> (usize, usize) {
    let clamped = offset.min(src.len());
    let mut line = 1;
    let mut col = 1;
    for (i, c) in src.char_indices() {
        if i >= clamped {
            break;
        }
        if c == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    (line, col)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col() {
        let src = "ab\ncd\nef";
        assert_eq!(line_col(src, 0), (1, 1));
        assert_eq!(line_col(src, 1), (1, 2));
        assert_eq!(line_col(src, 3), (2, 1));
        assert_eq!(line_col(src, 7), (3, 2));
        assert_eq!(line_col(src, 999), (3, 3));
    }

    #[test]
    fn test_syntax_error_display() {
        let err = syntax_error("a{\n  b", 5, "Unterminated block");
        assert_eq!(err.to_string(), "Unterminated block at line 2, col 3");
    }
}
