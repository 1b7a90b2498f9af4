//! Per-entry enrichment.
//!
//! Each entry walks a small state machine:
//!
//! ```text
//! Unclassified -> PassThrough                    (type is not "comic")
//! Unclassified -> MarvelAttempted -> Enriched    (remote match merged)
//! Unclassified -> MarvelAttempted -> Pending     (no match / no client)
//! Unclassified -> Pending                        (not a Marvel title)
//! ```
//!
//! Only descriptive fields are rewritten; `id` and `source_row` always
//! survive untouched.
use crate::catalog::{
    CatalogEntry, FIELD_AUTHOR, FIELD_COVER_URL, FIELD_DESCRIPTION, FIELD_ENRICHMENT_DATE,
    FIELD_ENRICHMENT_SOURCE, FIELD_ENRICHMENT_STATUS, FIELD_GENRE, FIELD_PRICE, FIELD_PUBLISHER,
    FIELD_SEARCH_QUERY, FIELD_SERIES, FIELD_TITLE, FIELD_TYPE, FIELD_VOLUME, FIELD_YEAR,
};
use crate::classify::is_marvel;
use crate::extract::{extract_issue_number, extract_series_name};
use crate::marvel::{ComicLookup, RemoteMatch};
use std::fmt;

pub const COMIC_TYPE: &str = "comic";
pub const MARVEL_PUBLISHER: &str = "Marvel Comics";
pub const STATUS_ENRICHED: &str = "enriched";
pub const STATUS_PENDING: &str = "pending";
pub const MANUAL_ENRICHMENT_SOURCE: &str = "manual_enrichment_needed";

/// `enrichment_source` value for a Marvel match. Downstream tools match on
/// this format, so it must stay stable.
pub fn marvel_source(marvel_id: Option<u64>) -> String {
    match marvel_id {
        Some(id) => format!("Marvel API (ID: {id})"),
        None => "Marvel API (ID: N/A)".to_string(),
    }
}

/// Why an entry ended up pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingReason {
    NotMarvel,
    NoMatch,
    LookupUnavailable,
}

/// Terminal state of one entry.
#[derive(Debug, Clone, PartialEq)]
pub enum EnrichmentState {
    PassThrough,
    Enriched(Box<RemoteMatch>),
    Pending(PendingReason),
}

impl EnrichmentState {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnrichmentState::PassThrough => "pass_through",
            EnrichmentState::Enriched(_) => STATUS_ENRICHED,
            EnrichmentState::Pending(_) => STATUS_PENDING,
        }
    }
}

impl fmt::Display for EnrichmentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of [`Enricher::process`]: the output row and how it got there.
#[derive(Debug, Clone)]
pub struct EnrichmentOutcome {
    pub entry: CatalogEntry,
    pub state: EnrichmentState,
}

/// Classifies entries and merges remote metadata into them.
pub struct Enricher<'a> {
    lookup: Option<&'a dyn ComicLookup>,
    enrichment_date: String,
}

impl<'a> Enricher<'a> {
    /// `lookup` is `None` when Marvel enrichment is unavailable; every entry
    /// then takes the manual path.
    pub fn new(
        lookup: Option<&'a dyn ComicLookup>,
        enrichment_date: impl Into<String>,
    ) -> Self {
        Self {
            lookup,
            enrichment_date: enrichment_date.into(),
        }
    }

    /// Enricher stamped with today's local date.
    pub fn today(lookup: Option<&'a dyn ComicLookup>) -> Self {
        Self::new(lookup, chrono::Local::now().format("%Y-%m-%d").to_string())
    }

    /// The enriched row alone, without the outcome state.
    #[allow(dead_code)]
    pub fn enrich_entry(&self, entry: &CatalogEntry) -> CatalogEntry {
        self.process(entry).entry
    }

    pub fn process(&self, entry: &CatalogEntry) -> EnrichmentOutcome {
        let kind = entry.kind();
        if !kind.is_empty() && !kind.eq_ignore_ascii_case(COMIC_TYPE) {
            tracing::debug!(title = entry.title(), kind, "not a comic; passing through");
            return EnrichmentOutcome {
                entry: entry.clone(),
                state: EnrichmentState::PassThrough,
            };
        }

        let title = entry.title();
        if !is_marvel(title, entry.get(FIELD_AUTHOR), entry.get(FIELD_PUBLISHER)) {
            tracing::debug!(title, "not a Marvel title");
            return pending(entry, PendingReason::NotMarvel);
        }

        let Some(lookup) = self.lookup else {
            tracing::debug!(title, "Marvel title but no lookup client configured");
            return pending(entry, PendingReason::LookupUnavailable);
        };

        let series_name = extract_series_name(title);
        let issue_number = extract_issue_number(title, entry.get(FIELD_VOLUME));
        tracing::info!(
            title,
            series = %series_name,
            issue = ?issue_number,
            "searching Marvel API"
        );

        match lookup.enrich_from_title(title, issue_number, Some(&series_name)) {
            Some(found) => {
                tracing::info!(
                    title,
                    matched = found.title.as_deref().unwrap_or(""),
                    marvel_id = ?found.marvel_id,
                    "Marvel match"
                );
                let entry = merge_remote(entry, &found, &self.enrichment_date);
                EnrichmentOutcome {
                    entry,
                    state: EnrichmentState::Enriched(Box::new(found)),
                }
            }
            None => {
                tracing::info!(title, "no Marvel match; needs manual enrichment");
                pending(entry, PendingReason::NoMatch)
            }
        }
    }
}

/// Copy `entry` and mark it for manual enrichment.
pub fn mark_pending(entry: &CatalogEntry) -> CatalogEntry {
    let mut out = entry.clone();
    out.set(FIELD_ENRICHMENT_SOURCE, MANUAL_ENRICHMENT_SOURCE);
    out.set(FIELD_ENRICHMENT_STATUS, STATUS_PENDING);
    out
}

fn pending(entry: &CatalogEntry, reason: PendingReason) -> EnrichmentOutcome {
    EnrichmentOutcome {
        entry: mark_pending(entry),
        state: EnrichmentState::Pending(reason),
    }
}

/// Overlay a remote match onto a catalog entry.
///
/// Remote values replace catalog values only when present and non-empty;
/// publisher, status and provenance are always rewritten.
pub fn merge_remote(
    entry: &CatalogEntry,
    found: &RemoteMatch,
    enrichment_date: &str,
) -> CatalogEntry {
    let mut out = entry.clone();
    out.set(FIELD_TYPE, COMIC_TYPE);
    overlay(&mut out, FIELD_TITLE, found.title.as_deref());
    overlay(&mut out, FIELD_AUTHOR, Some(found.writers.as_str()));
    overlay(&mut out, FIELD_VOLUME, found.issue_number.as_deref());
    out.set(FIELD_SERIES, found.series_name.clone().unwrap_or_default());
    out.set(FIELD_PUBLISHER, MARVEL_PUBLISHER);
    if let Some(year) = found.on_sale_year() {
        out.set(FIELD_YEAR, year);
    }
    overlay(&mut out, FIELD_GENRE, found.format.as_deref());
    overlay(&mut out, FIELD_DESCRIPTION, found.description.as_deref());
    overlay(&mut out, FIELD_COVER_URL, found.cover_url.as_deref());
    let price = found.print_price.map(crate::marvel::format_price);
    overlay(&mut out, FIELD_PRICE, price.as_deref());
    out.set(FIELD_ENRICHMENT_STATUS, STATUS_ENRICHED);
    out.set(FIELD_ENRICHMENT_DATE, enrichment_date);
    out.set(FIELD_ENRICHMENT_SOURCE, marvel_source(found.marvel_id));
    out.set(FIELD_SEARCH_QUERY, found.title.clone().unwrap_or_default());
    out
}

fn overlay(entry: &mut CatalogEntry, field: &str, value: Option<&str>) {
    if let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) {
        entry.set(field, value);
    }
}
