// src/pipeline/scan.rs

//! Live scan pass.
//!
//! Drives one pass over an item source: convention detection, mention
//! extraction, per-run dedup, tiered resolution, idempotent persistence.
//! A single item's failure never aborts the run; an authentication
//! failure from the source does.

use std::sync::atomic::Ordering;
use std::time::Duration;

use crate::dedup::SeenSet;
use crate::error::Result;
use crate::extract;
use crate::models::{BookRecord, Convention, RecordPatch, RunSummary, SourceItem};
use crate::pipeline::ScanContext;
use crate::report::Reporter;
use crate::services::ResolvedBook;
use crate::source::ItemSource;
use crate::store::RecordStore;

/// Run one scan pass over the given item source.
///
/// Always ends with a summary handed to the reporter, even when nothing
/// was found.
pub async fn run_scan(ctx: &ScanContext<'_>, source: &mut dyn ItemSource) -> Result<RunSummary> {
    let mut summary = RunSummary::default();
    let mut seen = SeenSet::new();
    let delay = Duration::from_millis(ctx.config.scanner.request_delay_ms);

    loop {
        if ctx.stop.load(Ordering::Relaxed) {
            log::info!("Stop requested; ending scan at item boundary");
            break;
        }

        let item = match source.next_item().await {
            Ok(Some(item)) => item,
            Ok(None) => break,
            Err(e) if e.is_fatal() => {
                log::error!("Item source failed, aborting run: {}", e);
                return Err(e);
            }
            Err(e) => {
                log::warn!("Skipping undeliverable item: {}", e);
                continue;
            }
        };

        summary.processed += 1;
        if let Err(e) = process_item(ctx, &item, &mut seen, &mut summary).await {
            log::warn!("Failed to process item {}: {}", item.permalink, e);
        }

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    ctx.reporter.summary(&summary);
    Ok(summary)
}

async fn process_item(
    ctx: &ScanContext<'_>,
    item: &SourceItem,
    seen: &mut SeenSet,
    summary: &mut RunSummary,
) -> Result<()> {
    if ctx.config.scanner.is_contributor(&item.author_handle) {
        process_contributor_item(ctx, item, summary).await
    } else {
        process_bracketed_item(ctx, item, seen, summary).await
    }
}

/// Primary path: bracketed mentions, resolved and appended.
async fn process_bracketed_item(
    ctx: &ScanContext<'_>,
    item: &SourceItem,
    seen: &mut SeenSet,
    summary: &mut RunSummary,
) -> Result<()> {
    let mentions = extract::bracketed_mentions(&item.text, ctx.config.scanner.convention);
    let direct_link = extract::catalog_link(&item.text);

    for mention in mentions {
        summary.found += 1;
        if !seen.should_process(&mention) {
            summary.duplicate += 1;
            continue;
        }

        let mut record = match ctx.resolver.resolve(&mention.title, &mention.author).await {
            Some(book) => record_from(book),
            None => {
                ctx.reporter.activity(&format!(
                    "No data found for {} by {}, adding placeholder",
                    mention.title, mention.author
                ));
                BookRecord::placeholder(&mention.title, &mention.author)
            }
        };

        // An author-supplied link beats any fuzzy search match
        if let Some(link) = &direct_link {
            record.romance_io_url = link.clone();
        }
        stamp_provenance(&mut record, item);

        if ctx.store.write_record(&record)? {
            summary.added += 1;
            ctx.reporter.activity(&format!(
                "Found book mention: {} by {}",
                record.title, record.author
            ));
        } else {
            summary.ignored += 1;
        }
    }
    Ok(())
}

/// Contributor path: structured first-line mentions, merged into
/// existing rows or appended with their topics and steam label.
///
/// No resolver call is made here, so the seen-set is not consulted: a
/// contributor comment arriving after a plain mention in the same run
/// must still enrich the row just written.
async fn process_contributor_item(
    ctx: &ScanContext<'_>,
    item: &SourceItem,
    summary: &mut RunSummary,
) -> Result<()> {
    let mut mentions = extract::bracketed_mentions(&item.text, Convention::Curly);
    if mentions.is_empty() {
        mentions = extract::first_line_mention(&item.text);
    }
    let (topics, steam) = extract::contributor_data(&item.text);
    let body_link = extract::catalog_link(&item.text);

    for mention in mentions {
        summary.found += 1;

        // Prefer the markdown book link over a link elsewhere in the body
        let catalog_url = mention.catalog_url.clone().or_else(|| body_link.clone());

        let patch = RecordPatch {
            romance_io_url: catalog_url.clone(),
            tags: (!topics.is_empty()).then(|| topics.clone()),
            steam: (!steam.is_empty()).then(|| steam.clone()),
            source_url: Some(item.permalink.clone()),
            ..RecordPatch::default()
        };

        if ctx.store.merge_record(&mention.key(), &patch)? {
            summary.updated += 1;
            ctx.reporter.activity(&format!(
                "Updated record from contributor comment: {} by {}",
                mention.title, mention.author
            ));
        } else {
            let mut record = BookRecord::placeholder(&mention.title, &mention.author);
            record.tags = topics.clone();
            record.set_steam(&steam);
            record.romance_io_url = catalog_url.unwrap_or_default();
            stamp_provenance(&mut record, item);

            if ctx.store.write_record(&record)? {
                summary.added += 1;
                ctx.reporter.activity(&format!(
                    "Added contributor book: {} by {}",
                    record.title, record.author
                ));
            } else {
                summary.ignored += 1;
            }
        }
    }
    Ok(())
}

fn record_from(book: ResolvedBook) -> BookRecord {
    BookRecord {
        title: book.title,
        author: book.author,
        isbn13: book.isbn13,
        tags: book.tags,
        cover_url: book.cover_url,
        romance_io_url: book.romance_io_url,
        google_books_url: book.google_books_url,
        ..BookRecord::default()
    }
}

fn stamp_provenance(record: &mut BookRecord, item: &SourceItem) {
    record.source_created_utc = item.created_utc_string();
    record.source_created_date = item.created_date();
    record.source_url = item.permalink.clone();
    record.source_tag = item.platform_tag.clone();
}
