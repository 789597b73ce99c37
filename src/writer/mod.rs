//! # Writer Module
//!
//! Persists the package stream to disk.
//!
//! This module handles:
//! - One bounded rotating log per known message type
//! - Loading the watch list of fields for the custom report
//! - Merging watched fields into a timestamped custom report table
//! - Dispatching each package and drawing the progress line
//!
//! All state is owned by a single [`Dispatcher`] and driven from one task;
//! nothing here locks. If transport and writing are ever split across
//! threads, each type log needs its own mutex and the report row a single
//! global one, since it aggregates across types.

pub mod dispatcher;
pub mod report;
pub mod table;
pub mod type_log;
pub mod watch_list;

pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use report::{CustomReportAggregator, CustomReportRow};
pub use type_log::BoundedTypeLog;
pub use watch_list::WatchList;
