//! Path parsing
//!
//! This module splits path strings into segments and validates entry names.
//! It knows nothing about descriptors; walking the segments against the
//! descriptor table is the engine's job.

use thiserror::Error;

/// Path separator
pub const SEPARATOR: char = '/';

/// Errors that can occur while parsing paths or validating names
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    /// Path is empty where a final name is required, or a name is malformed
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// A single segment exceeds the configured limit
    #[error("Name too long: {name} ({len} bytes, limit {max})")]
    NameTooLong {
        /// The offending segment
        name: String,
        /// Its length in bytes
        len: usize,
        /// The configured limit
        max: usize,
    },
}

/// A path split into segments
///
/// Empty segments are dropped, so `a//b/` and `a/b` parse identically.
/// `.` and `..` are kept as ordinary segments: they name real directory
/// entries.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedPath {
    absolute: bool,
    segments: Vec<String>,
}

impl ParsedPath {
    /// Parses a path string
    ///
    /// # Examples
    ///
    /// ```
    /// use fs_view::ParsedPath;
    ///
    /// let path = ParsedPath::parse("/docs//notes/todo.txt");
    /// assert!(path.is_absolute());
    /// assert_eq!(path.segments(), ["docs", "notes", "todo.txt"]);
    /// ```
    pub fn parse(path: &str) -> Self {
        Self {
            absolute: path.starts_with(SEPARATOR),
            segments: path
                .split(SEPARATOR)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// Builds the path that replaces a symlink during resolution: the link
    /// target followed by the segments that were still unresolved
    pub fn splice(target: &ParsedPath, rest: &[String]) -> Self {
        let mut segments = target.segments.clone();
        segments.extend_from_slice(rest);
        Self {
            absolute: target.absolute,
            segments,
        }
    }

    /// Returns true if the path starts at the root
    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    /// Returns the segments in order
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Splits off the final segment
    pub fn split_last(&self) -> Option<(&String, &[String])> {
        self.segments.split_last()
    }
}

/// Name validation rules
pub struct PathParser;

impl PathParser {
    /// Validates a name that is about to become a directory entry
    pub fn validate_name(name: &str, max_len: usize) -> Result<(), PathError> {
        if name.is_empty() {
            return Err(PathError::InvalidPath("Empty name".to_string()));
        }
        if name.contains(SEPARATOR) || name.contains('\0') {
            return Err(PathError::InvalidPath(format!(
                "Name contains a reserved character: {:?}",
                name
            )));
        }
        if name.len() > max_len {
            return Err(PathError::NameTooLong {
                name: name.to_string(),
                len: name.len(),
                max: max_len,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_path() {
        let path = ParsedPath::parse("todo.txt");
        assert!(!path.is_absolute());
        assert_eq!(path.segments(), ["todo.txt"]);
    }

    #[test]
    fn test_parse_nested_path() {
        let path = ParsedPath::parse("docs/notes/todo.txt");
        assert_eq!(path.segments(), ["docs", "notes", "todo.txt"]);
    }

    #[test]
    fn test_parse_path_with_leading_slash() {
        let path = ParsedPath::parse("/docs/notes.txt");
        assert!(path.is_absolute());
        assert_eq!(path.segments(), ["docs", "notes.txt"]);
    }

    #[test]
    fn test_repeated_separators_collapse() {
        let path = ParsedPath::parse("docs//notes.txt/");
        assert_eq!(path.segments(), ["docs", "notes.txt"]);
    }

    #[test]
    fn test_only_slashes() {
        let path = ParsedPath::parse("///");
        assert!(path.is_absolute());
        assert!(path.segments().is_empty());
    }

    #[test]
    fn test_empty_path() {
        let path = ParsedPath::parse("");
        assert!(!path.is_absolute());
        assert!(path.segments().is_empty());
        assert!(path.split_last().is_none());
    }

    #[test]
    fn test_dot_segments_are_kept() {
        let path = ParsedPath::parse("./a/../b");
        assert_eq!(path.segments(), [".", "a", "..", "b"]);
    }

    #[test]
    fn test_split_last() {
        let path = ParsedPath::parse("a/b/c");
        let (last, rest) = path.split_last().unwrap();
        assert_eq!(last, "c");
        assert_eq!(rest, ["a", "b"]);
    }

    #[test]
    fn test_splice_keeps_target_anchor() {
        let target = ParsedPath::parse("/x/y");
        let rest = vec!["z".to_string()];
        let spliced = ParsedPath::splice(&target, &rest);
        assert!(spliced.is_absolute());
        assert_eq!(spliced.segments(), ["x", "y", "z"]);

        let relative = ParsedPath::splice(&ParsedPath::parse("y"), &rest);
        assert!(!relative.is_absolute());
        assert_eq!(relative.segments(), ["y", "z"]);
    }

    #[test]
    fn test_validate_name() {
        assert!(PathParser::validate_name("todo.txt", 32).is_ok());
        assert!(matches!(
            PathParser::validate_name("", 32),
            Err(PathError::InvalidPath(_))
        ));
        assert!(matches!(
            PathParser::validate_name("has\0null", 32),
            Err(PathError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_name_too_long() {
        let result = PathParser::validate_name("abcdef", 5);
        assert_eq!(
            result,
            Err(PathError::NameTooLong {
                name: "abcdef".to_string(),
                len: 6,
                max: 5,
            })
        );
        assert!(PathParser::validate_name("abcde", 5).is_ok());
    }
}
