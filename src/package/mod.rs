//! # Package Module
//!
//! Decoded primary-interface messages as handed over by the wire decoder.
//!
//! This module handles:
//! - Package, subpackage and field value types
//! - The fixed table of known controller message types
//! - The text rendering persisted in the per-type logs

pub mod kind;
pub mod types;

pub use kind::PackageType;
pub use types::{FieldValue, Package, Subpackage};
