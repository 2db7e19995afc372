// src/pipeline/double_check.rs

//! Re-enrichment pass over the persisted table.
//!
//! Iterates existing rows instead of a live source, re-fetches each
//! row's original item by permalink, re-runs extraction and resolution,
//! and merges the result into the row. This is how placeholder rows get
//! backfilled once a transient lookup failure clears up.

use std::sync::atomic::Ordering;
use std::time::Duration;

use crate::dedup::SeenSet;
use crate::error::Result;
use crate::extract;
use crate::models::{BookRecord, Convention, RecordPatch, RunSummary};
use crate::pipeline::ScanContext;
use crate::report::Reporter;
use crate::services::ResolvedBook;
use crate::source::ItemFetcher;
use crate::store::RecordStore;

/// Row selection for a double-check pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckMode {
    /// Only rows still missing ISBN, tags, or cover
    #[default]
    Missing,
    /// Every row
    All,
}

/// Run one double-check pass over the persisted table.
pub async fn run_double_check(
    ctx: &ScanContext<'_>,
    fetcher: &dyn ItemFetcher,
    mode: CheckMode,
) -> Result<RunSummary> {
    let rows = ctx.store.load_all()?;
    log::info!("Running double-check over {} rows (mode: {:?})", rows.len(), mode);

    let mut summary = RunSummary::default();
    let mut seen = SeenSet::new();
    let delay = Duration::from_millis(ctx.config.scanner.request_delay_ms);

    for row in rows {
        if ctx.stop.load(Ordering::Relaxed) {
            log::info!("Stop requested; ending double-check at row boundary");
            break;
        }
        if mode == CheckMode::Missing && !row.is_missing_data() {
            continue;
        }
        if row.source_url.is_empty() {
            continue;
        }

        summary.processed += 1;
        if let Err(e) = check_row(ctx, fetcher, &row, &mut seen, &mut summary).await {
            log::warn!("Failed to double-check {}: {}", row.source_url, e);
        }

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    ctx.reporter.summary(&summary);
    Ok(summary)
}

async fn check_row(
    ctx: &ScanContext<'_>,
    fetcher: &dyn ItemFetcher,
    row: &BookRecord,
    seen: &mut SeenSet,
    summary: &mut RunSummary,
) -> Result<()> {
    let Some(item) = fetcher.fetch(&row.source_url).await? else {
        log::debug!("Original item gone: {}", row.source_url);
        return Ok(());
    };

    let mentions = extract::bracketed_mentions(&item.text, Convention::Curly);
    let direct_link = extract::catalog_link(&item.text);

    for mention in mentions {
        summary.found += 1;
        if !seen.should_process(&mention) {
            summary.duplicate += 1;
            continue;
        }

        let Some(book) = ctx.resolver.resolve(&mention.title, &mention.author).await else {
            continue;
        };

        let mut patch = patch_from(&book);
        if let Some(link) = &direct_link {
            patch.romance_io_url = Some(link.clone());
        }
        patch.source_url = Some(item.permalink.clone());

        if ctx.store.merge_record(&mention.key(), &patch)? {
            summary.updated += 1;
            ctx.reporter.activity(&format!(
                "Double-check updated: {} by {} from {}",
                mention.title, mention.author, item.permalink
            ));
        }
    }
    Ok(())
}

/// Enrichment fields a resolved book can contribute to an existing row.
/// Sentinel values are dropped so they cannot clobber known data.
fn patch_from(book: &ResolvedBook) -> RecordPatch {
    RecordPatch {
        isbn13: Some(book.isbn13.clone()),
        tags: Some(book.tags.clone()),
        cover_url: Some(book.cover_url.clone()),
        romance_io_url: Some(book.romance_io_url.clone()),
        google_books_url: Some(book.google_books_url.clone()),
        ..RecordPatch::default()
    }
}
