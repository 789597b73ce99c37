//! # Custom Report
//!
//! Folds watch-listed fields from every incoming package into one merged row
//! and keeps a bounded, timestamped history of that row on disk.
//!
//! Fields are matched by canonical key (`<subpackage>_<field>`, spaces as
//! underscores). Two subpackages whose names normalize to the same string
//! produce the same keys; the later one in the package wins.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::{debug, trace};

use super::table::{render_grid, Cell};
use super::watch_list::{canonical_key, WatchList};
use crate::error::{ClientError, Result};
use crate::package::{FieldValue, Package};

/// First column of the report
pub const TIMESTAMP_HEADER: &str = "Timestamp";

/// Format a report timestamp with centisecond precision
/// (`YYYY-MM-DD HH:MM:SS.cc`).
pub fn format_timestamp(ts: &DateTime<Local>) -> String {
    let centis = (ts.timestamp_subsec_millis() / 10).min(99);
    format!("{}.{:02}", ts.format("%Y-%m-%d %H:%M:%S"), centis)
}

/// Current value of every watched field; `None` until first seen
#[derive(Debug, Clone, PartialEq)]
pub struct CustomReportRow {
    keys: Vec<String>,
    values: Vec<Option<FieldValue>>,
}

impl CustomReportRow {
    /// Row with every registry key unset
    pub fn new(watch_list: &WatchList) -> Self {
        Self {
            keys: watch_list.keys().to_vec(),
            values: vec![None; watch_list.len()],
        }
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.keys
            .iter()
            .position(|k| k == key)
            .and_then(|i| self.values[i].as_ref())
    }

    /// Replace the value for `key`. Keys outside the registry are rejected
    /// and leave the row untouched.
    pub fn upsert(&mut self, key: &str, value: FieldValue) -> bool {
        match self.keys.iter().position(|k| k == key) {
            Some(i) => {
                self.values[i] = Some(value);
                true
            }
            None => false,
        }
    }

    /// Values in registry order
    pub fn values(&self) -> &[Option<FieldValue>] {
        &self.values
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&FieldValue>)> {
        self.keys
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(Option::as_ref))
    }
}

/// One retained report line
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub timestamp: String,
    pub values: Vec<Option<FieldValue>>,
}

/// Owns the watch list, the merged row and the report window
#[derive(Debug)]
pub struct CustomReportAggregator {
    watch_list: WatchList,
    row: CustomReportRow,
    snapshots: VecDeque<Snapshot>,
    capacity: usize,
    path: PathBuf,
}

impl CustomReportAggregator {
    /// # Errors
    ///
    /// Returns error if `capacity` is zero
    pub fn new<P: AsRef<Path>>(watch_list: WatchList, capacity: usize, path: P) -> Result<Self> {
        if capacity == 0 {
            return Err(ClientError::InvalidConfig(
                "report capacity must be greater than 0".to_string(),
            ));
        }

        let row = CustomReportRow::new(&watch_list);
        Ok(Self {
            watch_list,
            row,
            snapshots: VecDeque::with_capacity(capacity),
            capacity,
            path: path.as_ref().to_path_buf(),
        })
    }

    /// Fold `package` into the row, stamped with the current local time.
    pub fn update(&mut self, package: &Package) -> Result<()> {
        self.update_at(package, Local::now())
    }

    /// Fold `package` into the row, snapshot it at `timestamp` and rewrite
    /// the report file.
    pub fn update_at(&mut self, package: &Package, timestamp: DateTime<Local>) -> Result<()> {
        for sub in &package.subpackages {
            for (field, value) in &sub.fields {
                let key = canonical_key(&sub.name, field);
                if self.watch_list.contains(&key) {
                    trace!("Report field {} = {}", key, value);
                    self.row.upsert(&key, value.clone());
                }
            }
        }

        if self.snapshots.len() == self.capacity {
            self.snapshots.pop_front();
        }
        self.snapshots.push_back(Snapshot {
            timestamp: format_timestamp(&timestamp),
            values: self.row.values().to_vec(),
        });

        self.flush_to_disk()
    }

    /// Report file contents for the current window
    pub fn render(&self) -> String {
        let headers: Vec<String> = std::iter::once(TIMESTAMP_HEADER.to_string())
            .chain(self.watch_list.keys().iter().cloned())
            .collect();

        let rows: Vec<Vec<Cell>> = self
            .snapshots
            .iter()
            .map(|snapshot| {
                std::iter::once(Cell::left(snapshot.timestamp.as_str()))
                    .chain(snapshot.values.iter().map(|value| match value {
                        Some(v) if v.is_numeric() => Cell::right(v.to_string()),
                        Some(v) => Cell::left(v.to_string()),
                        None => Cell::empty(),
                    }))
                    .collect()
            })
            .collect();

        render_grid(&headers, &rows)
    }

    fn flush_to_disk(&self) -> Result<()> {
        let mut file = BufWriter::new(File::create(&self.path)?);
        file.write_all(self.render().as_bytes())?;
        file.flush()?;

        debug!("Rewrote {} ({} rows)", self.path.display(), self.snapshots.len());
        Ok(())
    }

    pub fn row(&self) -> &CustomReportRow {
        &self.row
    }

    /// Retained snapshots, oldest first
    pub fn snapshots(&self) -> impl Iterator<Item = &Snapshot> {
        self.snapshots.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::Subpackage;
    use chrono::TimeZone;
    use std::fs;
    use tempfile::tempdir;

    fn watch_list(text: &str) -> WatchList {
        WatchList::parse(text).unwrap()
    }

    fn noon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_row_starts_unset() {
        let row = CustomReportRow::new(&watch_list("A,x\nB,y\n"));
        assert_eq!(row.keys(), &["A_x", "B_y"]);
        assert!(row.values().iter().all(Option::is_none));
        assert!(row.get("A_x").is_none());
    }

    #[test]
    fn test_row_rejects_unknown_key() {
        let mut row = CustomReportRow::new(&watch_list("A,x\n"));
        assert!(!row.upsert("C_z", FieldValue::Int(1)));
        assert_eq!(row.keys().len(), 1);
        assert!(row.upsert("A_x", FieldValue::Int(1)));
        assert_eq!(row.get("A_x"), Some(&FieldValue::Int(1)));
    }

    #[test]
    fn test_format_timestamp() {
        let ts = noon() + chrono::Duration::milliseconds(257);
        assert_eq!(format_timestamp(&ts), "2024-01-01 12:00:00.25");
        assert_eq!(format_timestamp(&noon()), "2024-01-01 12:00:00.00");
    }

    #[test]
    fn test_update_sets_fields_regardless_of_subpackage_order() {
        let dir = tempdir().unwrap();
        let mut report =
            CustomReportAggregator::new(watch_list("A,x\nB,y\n"), 5, dir.path().join("r.txt")).unwrap();

        let package = Package::new(
            16,
            vec![
                Subpackage::new("B").with_field("y", 2i64).with_field("ignored", 0i64),
                Subpackage::new("A").with_field("x", 1i64),
            ],
        );
        report.update_at(&package, noon()).unwrap();

        let row: Vec<_> = report.row().iter().collect();
        assert_eq!(
            row,
            vec![("A_x", Some(&FieldValue::Int(1))), ("B_y", Some(&FieldValue::Int(2)))]
        );
    }

    #[test]
    fn test_last_subpackage_wins_on_key_collision() {
        let dir = tempdir().unwrap();
        let mut report =
            CustomReportAggregator::new(watch_list("Tool Data,mode\n"), 5, dir.path().join("r.txt")).unwrap();

        // "Tool Data" and "Tool_Data" both normalize to Tool_Data_mode
        let package = Package::new(
            16,
            vec![
                Subpackage::new("Tool Data").with_field("mode", "first"),
                Subpackage::new("Tool_Data").with_field("mode", "second"),
            ],
        );
        report.update_at(&package, noon()).unwrap();

        assert_eq!(report.row().get("Tool_Data_mode"), Some(&FieldValue::from("second")));
    }

    #[test]
    fn test_values_persist_across_packages() {
        let dir = tempdir().unwrap();
        let mut report =
            CustomReportAggregator::new(watch_list("A,x\nB,y\n"), 5, dir.path().join("r.txt")).unwrap();

        report
            .update_at(&Package::new(16, vec![Subpackage::new("A").with_field("x", 1i64)]), noon())
            .unwrap();
        report
            .update_at(&Package::new(20, vec![Subpackage::new("B").with_field("y", 2.5)]), noon())
            .unwrap();

        let snapshots: Vec<_> = report.snapshots().collect();
        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0].values, vec![Some(FieldValue::Int(1)), None]);
        assert_eq!(
            snapshots[1].values,
            vec![Some(FieldValue::Int(1)), Some(FieldValue::Float(2.5))]
        );
    }

    #[test]
    fn test_report_file_contents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom_report.txt");
        let mut report = CustomReportAggregator::new(watch_list("A,x\nB,y\n"), 5, &path).unwrap();

        let package = Package::new(16, vec![Subpackage::new("A").with_field("x", 42i64)]);
        report.update_at(&package, noon()).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "+------------------------+-----+-----+\n\
             | Timestamp              | A_x | B_y |\n\
             +========================+=====+=====+\n\
             | 2024-01-01 12:00:00.00 |  42 |     |\n\
             +------------------------+-----+-----+\n"
        );
    }

    #[test]
    fn test_window_keeps_last_m_rows_in_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom_report.txt");
        let capacity = 4;
        let mut report = CustomReportAggregator::new(watch_list("A,x\n"), capacity, &path).unwrap();

        for i in 0..(capacity as i64 + 3) {
            let package = Package::new(16, vec![Subpackage::new("A").with_field("x", i)]);
            report.update(&package).unwrap();
        }

        let contents = fs::read_to_string(&path).unwrap();
        let data_rows: Vec<&str> = contents
            .lines()
            .filter(|l| l.starts_with('|') && !l.contains(TIMESTAMP_HEADER))
            .collect();
        assert_eq!(data_rows.len(), capacity);

        let timestamps: Vec<&str> = data_rows
            .iter()
            .map(|l| l.split('|').nth(1).unwrap().trim())
            .collect();
        assert!(timestamps.windows(2).all(|w| w[0] <= w[1]));

        let values: Vec<&str> = data_rows
            .iter()
            .map(|l| l.split('|').nth(2).unwrap().trim())
            .collect();
        assert_eq!(values, vec!["3", "4", "5", "6"]);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let dir = tempdir().unwrap();
        let result = CustomReportAggregator::new(watch_list("A,x\n"), 0, dir.path().join("r.txt"));
        assert!(result.is_err());
    }
}
