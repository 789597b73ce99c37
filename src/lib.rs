//! # UR Primary Client Library
//!
//! Record the primary-interface status stream of a Universal Robots controller.
//!
//! This library takes already-decoded packages and keeps a bounded recent
//! history per message type on disk, optionally folding user-selected fields
//! into a single timestamped custom report.

pub mod config;
pub mod error;
pub mod package;
pub mod source;
pub mod writer;
