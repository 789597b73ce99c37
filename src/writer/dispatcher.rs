//! # Package Dispatcher
//!
//! Single entry point of the writer. Routes each decoded package to the log
//! of its type, feeds the custom report when enabled and redraws the
//! progress line.

use std::fs;
use std::io::{self, Write};

use tracing::{info, warn};

use super::report::CustomReportAggregator;
use super::type_log::BoundedTypeLog;
use super::watch_list::WatchList;
use crate::config::WriterConfig;
use crate::error::Result;
use crate::package::{Package, PackageType};

/// File name of the custom report inside the output directory
pub const CUSTOM_REPORT_FILE: &str = "custom_report.txt";

/// Where a dispatched package ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Appended to the log of this type
    Stored(PackageType),
    /// Type code not in the table; package dropped
    Unknown(i32),
}

/// Routes decoded packages to their per-type logs and the custom report
pub struct Dispatcher {
    logs: Vec<(PackageType, BoundedTypeLog)>,
    report: Option<CustomReportAggregator>,
    unknown_count: u64,
    progress: Box<dyn Write + Send>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("logs", &self.logs)
            .field("report", &self.report)
            .field("unknown_count", &self.unknown_count)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Create a dispatcher drawing its progress line on stdout.
    ///
    /// The custom report is enabled when `watch_list` is given; load it with
    /// [`WriterConfig::load_watch_list`] before touching the filesystem.
    ///
    /// # Errors
    ///
    /// Returns error if the output directory or a log file cannot be created
    pub fn new(config: &WriterConfig, watch_list: Option<WatchList>) -> Result<Self> {
        Self::with_progress_sink(config, watch_list, Box::new(io::stdout()))
    }

    /// Create a dispatcher drawing its progress line on `progress`.
    pub fn with_progress_sink(
        config: &WriterConfig,
        watch_list: Option<WatchList>,
        progress: Box<dyn Write + Send>,
    ) -> Result<Self> {
        fs::create_dir_all(&config.output_dir)?;

        let logs = PackageType::ALL
            .into_iter()
            .map(|kind| {
                let path = config.output_dir.join(kind.file_name());
                BoundedTypeLog::create(path, config.max_reports).map(|log| (kind, log))
            })
            .collect::<Result<Vec<_>>>()?;

        let report = match watch_list {
            Some(list) => Some(CustomReportAggregator::new(
                list,
                config.max_reports,
                config.output_dir.join(CUSTOM_REPORT_FILE),
            )?),
            None => None,
        };

        info!(
            "Writing up to {} packages per type to {} (custom report {})",
            config.max_reports,
            config.output_dir.display(),
            if report.is_some() { "enabled" } else { "disabled" }
        );

        Ok(Self {
            logs,
            report,
            unknown_count: 0,
            progress,
        })
    }

    /// Route one decoded package.
    ///
    /// Unknown type codes are reported and dropped; they are not an error.
    ///
    /// # Errors
    ///
    /// Returns error if a log file, the report file or the progress line
    /// cannot be written
    pub fn dispatch(&mut self, package: &Package) -> Result<DispatchOutcome> {
        let code = package.package_type;
        let outcome = match self.logs.iter_mut().find(|(kind, _)| kind.code() == code) {
            Some((kind, log)) => {
                log.append(package.to_string())?;
                if let Some(report) = self.report.as_mut() {
                    report.update(package)?;
                }
                DispatchOutcome::Stored(*kind)
            }
            None => {
                warn!("Unknown message type: {}", code);
                self.unknown_count += 1;
                DispatchOutcome::Unknown(code)
            }
        };

        self.draw_progress()?;
        Ok(outcome)
    }

    fn draw_progress(&mut self) -> Result<()> {
        let line = self.progress_line();
        write!(self.progress, "\r{}", line)?;
        self.progress.flush()?;
        Ok(())
    }

    /// Progress summary, e.g. `RECEIVED: -1:0, 16:10, 20:2, ...`
    pub fn progress_line(&self) -> String {
        let counts: Vec<String> = self
            .counts()
            .map(|(kind, count)| format!("{}:{}", kind.code(), count))
            .collect();
        format!("RECEIVED: {}", counts.join(", "))
    }

    /// Observed count per type, in declared order
    pub fn counts(&self) -> impl Iterator<Item = (PackageType, u64)> + '_ {
        self.logs.iter().map(|(kind, log)| (*kind, log.observed_count()))
    }

    pub fn log(&self, kind: PackageType) -> Option<&BoundedTypeLog> {
        self.logs.iter().find(|(k, _)| *k == kind).map(|(_, log)| log)
    }

    pub fn report(&self) -> Option<&CustomReportAggregator> {
        self.report.as_ref()
    }

    pub fn custom_reporting_enabled(&self) -> bool {
        self.report.is_some()
    }

    /// Number of packages dropped for an unknown type code
    pub fn unknown_count(&self) -> u64 {
        self.unknown_count
    }
}
