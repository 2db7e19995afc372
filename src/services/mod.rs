// src/services/mod.rs

//! Bibliographic lookup services.
//!
//! - `resolver`: tiered fallback chain over the three catalog sources
//! - `open_library`: primary catalog search API (with retry)
//! - `romance_io`: community catalog result-page scrape (best effort)
//! - `google_books`: secondary catalog API (best effort)

pub mod google_books;
pub mod open_library;
pub mod resolver;
pub mod romance_io;

pub use resolver::{BookResolver, ResolvedBook};
