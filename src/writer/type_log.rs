//! # Bounded Type Log
//!
//! Fixed-capacity rolling window of rendered packages for one message type,
//! mirrored verbatim to that type's file.
//!
//! Every append rewrites the whole file, so a write costs O(N) in the window
//! capacity. That is fine for the small windows this client keeps; a
//! high-throughput writer would append and compact instead while keeping the
//! file equal to the window.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ClientError, Result};

/// Line written after every entry
pub const ENTRY_SEPARATOR: &str = "################################################################################";

/// Rolling window of rendered packages for a single message type
#[derive(Debug)]
pub struct BoundedTypeLog {
    path: PathBuf,
    capacity: usize,
    window: VecDeque<String>,
    observed_count: u64,
}

impl BoundedTypeLog {
    /// Create the log and truncate its file to empty.
    ///
    /// # Errors
    ///
    /// Returns error if `capacity` is zero or the file cannot be created
    pub fn create<P: AsRef<Path>>(path: P, capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(ClientError::InvalidConfig(
                "log capacity must be greater than 0".to_string(),
            ));
        }

        let path = path.as_ref().to_path_buf();
        File::create(&path)?;

        Ok(Self {
            path,
            capacity,
            window: VecDeque::with_capacity(capacity),
            observed_count: 0,
        })
    }

    /// Push one rendered package and rewrite the file.
    ///
    /// The oldest entry is evicted once the window is full. The observed
    /// count only grows while the window is filling; once full it stays at
    /// `capacity` even though entries keep rotating.
    pub fn append(&mut self, rendered: impl Into<String>) -> Result<()> {
        if self.window.len() < self.capacity {
            self.observed_count += 1;
        } else {
            self.window.pop_front();
        }
        self.window.push_back(rendered.into());

        self.flush_to_disk()
    }

    /// File contents for the current window
    pub fn render(&self) -> String {
        let mut out = String::new();
        for entry in &self.window {
            out.push_str(entry);
            out.push('\n');
            out.push_str(ENTRY_SEPARATOR);
            out.push('\n');
        }
        out
    }

    fn flush_to_disk(&self) -> Result<()> {
        let mut file = BufWriter::new(File::create(&self.path)?);
        file.write_all(self.render().as_bytes())?;
        file.flush()?;

        debug!("Rewrote {} ({} entries)", self.path.display(), self.window.len());
        Ok(())
    }

    pub fn observed_count(&self) -> u64 {
        self.observed_count
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    /// Retained entries, oldest first
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.window.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_separator_is_80_hashes() {
        assert_eq!(ENTRY_SEPARATOR.len(), 80);
        assert!(ENTRY_SEPARATOR.chars().all(|c| c == '#'));
    }

    #[test]
    fn test_create_truncates_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("robot_state.txt");
        fs::write(&path, "stale contents").unwrap();

        let log = BoundedTypeLog::create(&path, 3).unwrap();
        assert!(log.is_empty());
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let dir = tempdir().unwrap();
        let result = BoundedTypeLog::create(dir.path().join("x.txt"), 0);
        assert!(matches!(result, Err(ClientError::InvalidConfig(_))));
    }

    #[test]
    fn test_file_keeps_last_n_entries_oldest_first() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("robot_state.txt");
        let mut log = BoundedTypeLog::create(&path, 4).unwrap();

        for i in 0..9 {
            log.append(format!("package {}", i)).unwrap();
        }

        let expected: String = (5..9)
            .map(|i| format!("package {}\n{}\n", i, ENTRY_SEPARATOR))
            .collect();
        assert_eq!(fs::read_to_string(&path).unwrap(), expected);
        assert_eq!(log.render(), expected);
        assert_eq!(log.len(), 4);
        assert_eq!(
            log.entries().collect::<Vec<_>>(),
            vec!["package 5", "package 6", "package 7", "package 8"]
        );
    }

    #[test]
    fn test_observed_count_freezes_at_capacity() {
        let dir = tempdir().unwrap();
        let mut log = BoundedTypeLog::create(dir.path().join("a.txt"), 3).unwrap();

        log.append("1").unwrap();
        log.append("2").unwrap();
        assert_eq!(log.observed_count(), 2);

        log.append("3").unwrap();
        assert_eq!(log.observed_count(), 3);

        // Window keeps rotating but the count does not move
        log.append("4").unwrap();
        log.append("5").unwrap();
        assert_eq!(log.observed_count(), 3);
        assert_eq!(log.entries().collect::<Vec<_>>(), vec!["3", "4", "5"]);
    }

    #[test]
    fn test_multiline_entry_written_verbatim() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        let mut log = BoundedTypeLog::create(&path, 2).unwrap();

        log.append("line one\n  line two").unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            format!("line one\n  line two\n{}\n", ENTRY_SEPARATOR)
        );
    }

    #[test]
    fn test_append_fails_when_directory_removed() {
        let dir = tempdir().unwrap();
        let sub = dir.path().join("gone");
        fs::create_dir(&sub).unwrap();
        let mut log = BoundedTypeLog::create(sub.join("a.txt"), 2).unwrap();

        fs::remove_dir_all(&sub).unwrap();
        assert!(matches!(log.append("x"), Err(ClientError::Io(_))));
    }
}
