#![allow(clippy::module_inception)]

use std::{fmt::Display, path::Path, rc::Rc};

use crate::errors::errors::{Error, ErrorTip};

pub mod ast;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;

extern crate regex;

/// A location in a source file. Lines and columns are 1-based.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub line: u32,
    pub column: u32,
    pub file: Rc<String>,
}

impl Position {
    pub fn new(line: u32, column: u32, file: Rc<String>) -> Self {
        Position { line, column, file }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Returns the text of the 1-based `line` in `source`, without its line ending.
pub fn get_line_at_position(source: &str, line: u32) -> Option<&str> {
    if line == 0 {
        return None;
    }

    source
        .split('\n')
        .nth((line - 1) as usize)
        .map(|text| text.trim_end_matches('\r'))
}

/// Renders a diagnostic with the offending source line:
///
/// ```text
/// Error: UnexpectedToken (expected '=' in assign statement, found `5`)
/// -> main.sage
///    |
/// 20 | x 5
///    | --^
/// ```
pub fn format_error(error: &Error, source: &str, file: &Path) -> String {
    let position = error.get_position();
    let mut out = String::new();

    if let ErrorTip::None = error.get_tip() {
        out.push_str(&format!("Error: {}\n", error.get_error_name()));
    } else {
        out.push_str(&format!(
            "Error: {} ({})\n",
            error.get_error_name(),
            error.get_tip()
        ));
    }
    out.push_str(&format!("-> {}\n", file.as_os_str().to_string_lossy()));

    let Some(line_text) = get_line_at_position(source, position.line) else {
        out.push_str(&format!("   line {}: {}\n", position.line, error.message()));
        return out;
    };

    let line_string = position.line.to_string();
    let padding = line_string.len() + 2;
    out.push_str(&format!("{:>padding$}\n", "|"));

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(line_text);
    out.push_str(&format!("{} | {}\n", line_string, line_text_removed.trim_end()));

    let column = (position.column as usize).max(1);
    let arrows = column.saturating_sub(removed_whitespace).max(1);
    out.push_str(&format!("{:>padding$} {:->arrows$}\n", "|", "^"));

    out
}

pub fn display_error(error: &Error, source: &str, file: &Path) {
    eprint!("{}", format_error(error, source, file));
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' || c == '\t' {
            start += 1;
        } else {
            break;
        }
    }

    (string.chars().skip(start).collect(), start)
}

#[cfg(test)]
mod tests {
    use std::{path::PathBuf, rc::Rc};

    use crate::errors::errors::{Error, ErrorImpl};

    #[test]
    fn test_get_line_at_position() {
        let source = "include \"io\"\n\nx = 5\r\n  y = 6\n";

        assert_eq!(super::get_line_at_position(source, 1), Some("include \"io\""));
        assert_eq!(super::get_line_at_position(source, 2), Some(""));
        assert_eq!(super::get_line_at_position(source, 3), Some("x = 5"));
        assert_eq!(super::get_line_at_position(source, 4), Some("  y = 6"));
        assert_eq!(super::get_line_at_position(source, 0), None);
        assert_eq!(super::get_line_at_position(source, 9), None);
    }

    #[test]
    fn test_format_error_points_at_column() {
        let source = "x = 1\n  y 5\n";
        let error = Error::new(
            ErrorImpl::UnrecognisedToken {
                token: String::from("@"),
            },
            super::Position::new(2, 5, Rc::new(String::from("main.sage"))),
        );

        let rendered = super::format_error(&error, source, &PathBuf::from("main.sage"));
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[0], "Error: UnrecognisedToken");
        assert_eq!(lines[1], "-> main.sage");
        assert_eq!(lines[2], "  |");
        assert_eq!(lines[3], "2 | y 5");
        assert_eq!(lines[4], "  | --^");
    }
}
