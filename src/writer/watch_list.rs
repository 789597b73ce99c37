//! # Watch List
//!
//! Parses the user's `SubpackageName,FieldName` list into the ordered registry
//! of canonical keys that drives the custom report.
//!
//! ## Format
//!
//! ```text
//! Robot Mode Data,timestamp
//! Tool Data,tool voltage
//! ```
//!
//! Each line maps to `<subpackage>_<field>` with spaces replaced by
//! underscores, e.g. `Robot_Mode_Data_timestamp`.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{ClientError, Result};

/// Canonical report key for a subpackage field.
///
/// ```
/// use ur_primary_client::writer::watch_list::canonical_key;
///
/// assert_eq!(canonical_key("Tool Data", "tool voltage"), "Tool_Data_tool_voltage");
/// ```
pub fn canonical_key(subpackage: &str, field: &str) -> String {
    format!("{}_{}", subpackage.replace(' ', "_"), field.replace(' ', "_"))
}

/// Ordered, immutable registry of watched field keys
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WatchList {
    keys: Vec<String>,
}

impl WatchList {
    /// Load and parse a watch list file.
    ///
    /// # Errors
    ///
    /// - [`ClientError::MissingWatchList`] if the file does not exist
    /// - [`ClientError::WatchList`] if a line is not exactly two comma-separated tokens
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ClientError::MissingWatchList(path.to_path_buf()));
        }

        let contents = fs::read_to_string(path)?;
        let list = Self::parse(&contents)?;
        info!("Loaded {} watched fields from {}", list.len(), path.display());
        Ok(list)
    }

    /// Parse watch list text.
    ///
    /// Every line, blank ones included, must split on commas into exactly
    /// two tokens. Tokens are used as written; only the CRLF line ending is
    /// dropped.
    pub fn parse(contents: &str) -> Result<Self> {
        let mut keys: Vec<String> = Vec::new();

        for (index, line) in contents.lines().enumerate() {
            let tokens: Vec<&str> = line.split(',').collect();
            let (subpackage, field) = match tokens.as_slice() {
                [subpackage, field] => (*subpackage, *field),
                _ => {
                    return Err(ClientError::WatchList {
                        line: index + 1,
                        reason: format!(
                            "expected `SubpackageName,FieldName`, found {} token(s)",
                            tokens.len()
                        ),
                    });
                }
            };

            let key = canonical_key(subpackage, field);
            if keys.contains(&key) {
                debug!("Watch list line {} repeats {}", index + 1, key);
                continue;
            }
            keys.push(key);
        }

        Ok(Self { keys })
    }

    /// Keys in load order
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_canonical_key_replaces_spaces() {
        assert_eq!(canonical_key("Robot Mode Data", "timestamp"), "Robot_Mode_Data_timestamp");
        assert_eq!(canonical_key("A", "x"), "A_x");
        assert_eq!(canonical_key("Masterboard Data", "analog input 0"), "Masterboard_Data_analog_input_0");
    }

    #[test]
    fn test_parse_preserves_order() {
        let list = WatchList::parse("Tool Data,tool voltage\nRobot Mode Data,timestamp\n").unwrap();
        assert_eq!(list.keys(), &["Tool_Data_tool_voltage", "Robot_Mode_Data_timestamp"]);
    }

    #[test]
    fn test_parse_blank_line_rejected() {
        let err = WatchList::parse("A,x\n\nB,y\n").unwrap_err();
        assert!(matches!(err, ClientError::WatchList { line: 2, .. }));
    }

    #[test]
    fn test_parse_tokens_used_as_written() {
        let list = WatchList::parse("A , x\r\nB,y").unwrap();
        assert_eq!(list.keys(), &["A___x", "B_y"]);
    }

    #[test]
    fn test_parse_repeated_key_registered_once() {
        let list = WatchList::parse("A,x\nB,y\nA,x\n").unwrap();
        assert_eq!(list.keys(), &["A_x", "B_y"]);
    }

    #[test]
    fn test_parse_missing_comma() {
        let err = WatchList::parse("A,x\nno comma here\n").unwrap_err();
        match err {
            ClientError::WatchList { line, .. } => assert_eq!(line, 2),
            other => panic!("Expected WatchList error, got: {:?}", other),
        }
    }

    #[test]
    fn test_parse_too_many_commas() {
        let err = WatchList::parse("A,x,extra\n").unwrap_err();
        assert!(matches!(err, ClientError::WatchList { line: 1, .. }));
    }

    #[test]
    fn test_parse_empty_token_is_two_tokens() {
        let list = WatchList::parse("A,\n,x\n").unwrap();
        assert_eq!(list.keys(), &["A_", "_x"]);
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(WatchList::parse("").unwrap().is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let err = WatchList::load("/nonexistent/watch_list.txt").unwrap_err();
        assert!(matches!(err, ClientError::MissingWatchList(_)));
    }

    #[test]
    fn test_load_is_idempotent() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"Robot Mode Data,timestamp\nTool Data,tool voltage\n").unwrap();
        file.flush().unwrap();

        let first = WatchList::load(file.path()).unwrap();
        let second = WatchList::load(file.path()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_lookup() {
        let list = WatchList::parse("A,x\nB,y\n").unwrap();
        assert!(list.contains("B_y"));
        assert!(!list.contains("C_z"));
    }
}
