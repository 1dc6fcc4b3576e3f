//! Issue-trail core library.
//!
//! This crate tracks the identity of static-analysis findings across repeated
//! re-analyses of a file. It marks newly appeared findings as leaks, keeps
//! human-assigned metadata alive when code moves or messages change, and
//! reconciles locally detected findings with an authoritative server baseline.
//!
//! High-level modules:
//! - `models`: The `Trackable` record and its spatial identity fields.
//! - `matcher`: Priority-ordered, one-to-one matching between trackable sets.
//! - `store`: Per-file storage of the current trackables, locked per file key.
//! - `tracker`: Orchestration of new-analysis and baseline reconciliation.
//! - `report`: Summaries and JSON rendering for a presentation layer.
//!
//! Note: All documentation comments are written in English by convention.
pub mod matcher;
pub mod models;
pub mod report;
pub mod store;
pub mod tracker;
