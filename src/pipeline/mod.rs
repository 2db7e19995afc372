// src/pipeline/mod.rs

//! Pipeline entry points for scanner operations.
//!
//! - `run_scan`: one pass over a live item source
//! - `run_double_check`: re-enrichment pass over the persisted table

pub mod double_check;
pub mod scan;

use std::sync::atomic::AtomicBool;

pub use double_check::{run_double_check, CheckMode};
pub use scan::run_scan;

use crate::models::Config;
use crate::report::Reporter;
use crate::services::BookResolver;
use crate::store::RecordStore;

/// Collaborators shared by one pipeline pass.
///
/// The store is assumed to have exclusive single-writer access for the
/// duration of the pass; callers serialize concurrent runs.
pub struct ScanContext<'a> {
    pub config: &'a Config,
    pub resolver: &'a BookResolver,
    pub store: &'a dyn RecordStore,
    pub reporter: &'a dyn Reporter,

    /// Cooperative stop signal, checked between items only.
    pub stop: &'a AtomicBool,
}
