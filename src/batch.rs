//! Batch driver: read the catalog, enrich rows in order, write it back.
use crate::catalog::{read_catalog, write_catalog, CatalogEntry, CatalogSchema, FIELD_ID};
use crate::enrich::{EnrichmentState, Enricher, PendingReason};
use anyhow::Result;
use serde::Serialize;
use std::path::Path;

/// Knobs for one batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOptions {
    /// Only rows whose `type` matches (case-insensitive) are enriched.
    pub type_filter: Option<String>,
    /// Stop after this many rows. Rows past the limit are not emitted unless
    /// `keep_unprocessed` is set. Zero means no limit.
    pub limit: Option<usize>,
    pub keep_unprocessed: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            type_filter: Some(crate::enrich::COMIC_TYPE.to_string()),
            limit: None,
            keep_unprocessed: false,
        }
    }
}

/// Per-outcome counts for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub rows_read: usize,
    pub rows_emitted: usize,
    pub enriched: usize,
    pub pending_not_marvel: usize,
    pub pending_no_match: usize,
    pub pending_no_client: usize,
    pub passed_through: usize,
    pub filtered: usize,
    pub beyond_limit: usize,
    pub schema_extra_columns: Vec<String>,
    pub schema_mismatched_rows: usize,
}

impl BatchSummary {
    fn record(&mut self, state: &EnrichmentState) {
        match state {
            EnrichmentState::PassThrough => self.passed_through += 1,
            EnrichmentState::Enriched(_) => self.enriched += 1,
            EnrichmentState::Pending(PendingReason::NotMarvel) => self.pending_not_marvel += 1,
            EnrichmentState::Pending(PendingReason::NoMatch) => self.pending_no_match += 1,
            EnrichmentState::Pending(PendingReason::LookupUnavailable) => {
                self.pending_no_client += 1
            }
        }
    }

    fn record_schema(&mut self, schema: &CatalogSchema) {
        self.schema_extra_columns = schema.extra_columns.clone();
        self.schema_mismatched_rows = schema.mismatched_rows.len();
    }
}

/// Output of [`run`].
#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    pub entries: Vec<CatalogEntry>,
    pub summary: BatchSummary,
}

/// Enrich every row of `catalog_in`, optionally writing the result to
/// `catalog_out` as a full replacement.
///
/// A missing input file yields an empty result and writes nothing.
pub fn run(
    enricher: &Enricher<'_>,
    catalog_in: &Path,
    catalog_out: Option<&Path>,
    options: &BatchOptions,
) -> Result<BatchResult> {
    let Some(rows) = read_catalog(catalog_in)? else {
        tracing::warn!(path = %catalog_in.display(), "catalog file not found");
        return Ok(BatchResult::default());
    };
    tracing::info!(rows = rows.len(), "processing catalog entries");

    let mut result = enrich_rows(enricher, rows, options);

    if let Some(out) = catalog_out {
        if result.entries.is_empty() {
            tracing::info!("no rows to write");
        } else {
            if result.summary.beyond_limit > 0 && !options.keep_unprocessed {
                tracing::warn!(
                    dropped = result.summary.beyond_limit,
                    path = %out.display(),
                    "row limit truncates the written catalog"
                );
            }
            let schema = write_catalog(out, &result.entries)?;
            result.summary.record_schema(&schema);
            tracing::info!(path = %out.display(), rows = result.entries.len(), "wrote catalog");
        }
    }
    Ok(result)
}

/// Enrich already-loaded rows, in order.
pub fn enrich_rows(
    enricher: &Enricher<'_>,
    rows: Vec<CatalogEntry>,
    options: &BatchOptions,
) -> BatchResult {
    let total = rows.len();
    let mut summary = BatchSummary {
        rows_read: total,
        ..BatchSummary::default()
    };
    let limit = options.limit.filter(|&limit| limit > 0);
    let mut entries = Vec::with_capacity(total);

    for (idx, row) in rows.into_iter().enumerate() {
        if limit.is_some_and(|limit| idx >= limit) {
            summary.beyond_limit += 1;
            if options.keep_unprocessed {
                entries.push(row);
            }
            continue;
        }

        if let Some(filter) = options.type_filter.as_deref() {
            if !row.kind().eq_ignore_ascii_case(filter) {
                summary.filtered += 1;
                entries.push(row);
                continue;
            }
        }

        tracing::info!(
            row = idx + 1,
            total,
            id = row.get(FIELD_ID),
            title = row.title(),
            "processing"
        );
        let outcome = enricher.process(&row);
        tracing::debug!(row = idx + 1, state = %outcome.state, "row done");
        summary.record(&outcome.state);
        entries.push(outcome.entry);
    }

    summary.rows_emitted = entries.len();
    BatchResult { entries, summary }
}

#[cfg(test)]
#[path = "batch_tests.rs"]
mod tests;
