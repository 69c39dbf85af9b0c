//! The `ingest` command: fetch the feed, extract every product node, and
//! upsert the valid ones.
//!
//! Nodes are processed one at a time in document order. A rejected node is
//! logged and skipped; a store failure aborts the run.

use lonca_core::{AppConfig, Clock, EventSink, SystemClock, TracingSink};
use lonca_db::{upsert_product_with_outcome, DbError, PgProductStore, ProductStore};
use lonca_feed::{parse_feed, Extractor, FeedClient, FeedNode, FeedSource};

/// Per-run counters reported at the end of `ingest`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct IngestTotals {
    /// `<Product>` nodes found in the feed.
    pub nodes: usize,
    /// Nodes that produced a valid record.
    pub extracted: usize,
    pub persisted: usize,
    pub inserted: usize,
    pub replaced: usize,
    pub rejected: usize,
}

/// Picks `--source` if given, otherwise `LONCA_FEED_URL`.
pub(crate) fn resolve_source(
    config: &AppConfig,
    source: Option<&str>,
) -> anyhow::Result<FeedSource> {
    let raw = source
        .or(config.feed_url.as_deref())
        .ok_or_else(|| anyhow::anyhow!("no feed source: pass --source or set LONCA_FEED_URL"))?;
    Ok(FeedSource::parse(raw)?)
}

/// Runs extraction over `nodes` and, when `store` is given, upserts each
/// valid record.
///
/// # Errors
///
/// Returns the first [`DbError`] raised by the store; totals gathered so far
/// are discarded.
pub(crate) async fn ingest_nodes(
    nodes: &[FeedNode],
    extractor: &Extractor,
    store: Option<&dyn ProductStore>,
    clock: &dyn Clock,
    sink: &dyn EventSink,
) -> Result<IngestTotals, DbError> {
    let mut totals = IngestTotals {
        nodes: nodes.len(),
        ..IngestTotals::default()
    };

    for node in nodes {
        let Some(record) = extractor.extract_node(node, clock, sink) else {
            totals.rejected += 1;
            continue;
        };
        totals.extracted += 1;

        let Some(store) = store else {
            sink.debug(&format!("dry-run: would upsert {}", record.stock_code));
            continue;
        };

        let outcome = upsert_product_with_outcome(store, record, clock, sink).await?;
        totals.persisted += 1;
        if outcome.is_insert() {
            totals.inserted += 1;
        } else {
            totals.replaced += 1;
        }
    }

    Ok(totals)
}

/// Fetches the feed and ingests it.
///
/// When `dry_run` is `true` records are extracted and counted but the
/// database is never contacted.
///
/// # Errors
///
/// Returns an error if no source is configured, the feed cannot be fetched
/// or parsed, the database is unreachable, or a store write fails.
pub(crate) async fn run_ingest(
    config: &AppConfig,
    source: Option<&str>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let source = resolve_source(config, source)?;
    let client = FeedClient::new(config.feed_request_timeout_secs, &config.feed_user_agent)?;

    let xml = client.fetch(&source).await?;
    let nodes = parse_feed(&xml)?;
    tracing::info!(source = %source, nodes = nodes.len(), "feed loaded");

    let extractor = Extractor::new();
    let clock = SystemClock;
    let sink = TracingSink::new("ingest");

    let totals = if dry_run {
        ingest_nodes(&nodes, &extractor, None, &clock, &sink).await?
    } else {
        let pool = crate::connect(config).await?;
        let store = PgProductStore::new(pool.clone());
        let result = ingest_nodes(&nodes, &extractor, Some(&store), &clock, &sink).await;
        pool.close().await;
        result?
    };

    tracing::info!(
        nodes = totals.nodes,
        extracted = totals.extracted,
        persisted = totals.persisted,
        inserted = totals.inserted,
        replaced = totals.replaced,
        rejected = totals.rejected,
        dry_run,
        "ingest complete"
    );
    if dry_run {
        println!(
            "dry-run: {} nodes, {} valid, {} rejected (nothing written)",
            totals.nodes, totals.extracted, totals.rejected
        );
    } else {
        println!(
            "ingested {} nodes: {} inserted, {} replaced, {} rejected",
            totals.nodes, totals.inserted, totals.replaced, totals.rejected
        );
    }

    Ok(())
}

#[cfg(test)]
#[path = "ingest_test.rs"]
mod tests;
