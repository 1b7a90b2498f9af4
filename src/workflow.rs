//! Command handlers. Each `run_*` loads what its command needs, does the work
//! and prints the result on stdout; diagnostics go through `tracing`.
use crate::batch::{self, BatchOptions, BatchSummary};
use crate::classify::{is_marvel, marvel_indicator, publisher_is_marvel};
use crate::cli::{ClassifyArgs, ComicArgs, EnrichArgs, LookupArgs, SearchArgs, SeriesArgs};
use crate::config::{load_config, CredentialProvider, EnvCredentialProvider};
use crate::enrich::Enricher;
use crate::extract::{extract_issue_number, extract_series_name};
use crate::marvel::{ComicLookup, ComicSearch, MarvelClient, RemoteMatch};
use anyhow::{Context, Result};
use serde::Serialize;
use std::time::Instant;

pub fn run_enrich(args: EnrichArgs) -> Result<()> {
    let client = if args.no_marvel {
        tracing::info!("Marvel lookups disabled; Marvel titles will be marked pending");
        None
    } else {
        match build_client(&args.lookup) {
            Ok(client) => Some(client),
            Err(err) => {
                tracing::warn!(
                    error = %format!("{err:#}"),
                    "Marvel enrichment unavailable; continuing without it"
                );
                None
            }
        }
    };
    let lookup = client.as_ref().map(|client| client as &dyn ComicLookup);
    let enricher = Enricher::today(lookup);
    let options = BatchOptions {
        type_filter: (!args.all_types).then(|| args.kind.clone()),
        limit: args.limit,
        keep_unprocessed: args.keep_unprocessed,
    };

    let started = Instant::now();
    let result = batch::run(&enricher, &args.catalog, args.out.as_deref(), &options)?;
    let elapsed_ms = started.elapsed().as_millis() as u64;
    tracing::info!(elapsed_ms, rows = result.entries.len(), "enrichment finished");

    if args.json {
        print_json(&result.summary)?;
    } else {
        print!("{}", format_summary(&result.summary));
    }
    Ok(())
}

/// Offline classifier and extractor output for one title.
#[derive(Debug, Serialize)]
struct ClassifyReport<'a> {
    title: &'a str,
    is_marvel: bool,
    publisher_is_marvel: bool,
    indicator: Option<&'static str>,
    series_name: String,
    issue_number: Option<u32>,
}

pub fn run_classify(args: ClassifyArgs) -> Result<()> {
    let report = ClassifyReport {
        title: &args.title,
        is_marvel: is_marvel(&args.title, &args.author, &args.publisher),
        publisher_is_marvel: publisher_is_marvel(&args.publisher),
        indicator: marvel_indicator(&args.title).map(|indicator| indicator.token),
        series_name: extract_series_name(&args.title),
        issue_number: extract_issue_number(&args.title, &args.volume),
    };
    if args.json {
        return print_json(&report);
    }
    println!("title: {}", report.title);
    println!("marvel: {}", report.is_marvel);
    println!("marvel publisher: {}", report.publisher_is_marvel);
    println!("indicator: {}", report.indicator.unwrap_or("<none>"));
    println!("series: {}", report.series_name);
    match report.issue_number {
        Some(issue) => println!("issue: {issue}"),
        None => println!("issue: <none>"),
    }
    Ok(())
}

pub fn run_search(args: SearchArgs) -> Result<()> {
    let client = build_client(&args.lookup)?;
    let search = ComicSearch {
        title: args.title,
        issue_number: args.issue,
        series_id: args.series_id,
        format: args.format,
        limit: args.limit,
        offset: args.offset,
    };
    let comics = client.search_comics(&search).context("search comics")?;
    let matches: Vec<RemoteMatch> = comics.iter().map(RemoteMatch::from).collect();
    print_json(&matches)
}

pub fn run_series(args: SeriesArgs) -> Result<()> {
    let client = build_client(&args.lookup)?;
    let series = client
        .search_series(args.title.as_deref(), args.limit, args.offset)
        .context("search series")?;
    print_json(&series)
}

pub fn run_comic(args: ComicArgs) -> Result<()> {
    let client = build_client(&args.lookup)?;
    let found = client.get_comic_by_id(args.id).as_ref().map(RemoteMatch::from);
    print_json(&found)
}

/// Resolve config and credentials, then build the HTTP client.
fn build_client(args: &LookupArgs) -> Result<MarvelClient> {
    let config = load_config(args.config.as_deref())?;
    let credentials = EnvCredentialProvider::with_secret_file(args.secrets_file.clone())
        .credentials()?;
    tracing::debug!(
        base_url = %config.base_url,
        public_key = credentials.public_key(),
        "Marvel client configured"
    );
    Ok(MarvelClient::new(&config, credentials))
}

fn format_summary(summary: &BatchSummary) -> String {
    let pending =
        summary.pending_not_marvel + summary.pending_no_match + summary.pending_no_client;
    let mut out = format!(
        "rows read: {}\nrows emitted: {}\nenriched: {}\npending: {} (not marvel {}, no match {}, no client {})\npassed through: {}\nfiltered by type: {}\n",
        summary.rows_read,
        summary.rows_emitted,
        summary.enriched,
        pending,
        summary.pending_not_marvel,
        summary.pending_no_match,
        summary.pending_no_client,
        summary.passed_through,
        summary.filtered,
    );
    if summary.beyond_limit > 0 {
        out.push_str(&format!("beyond limit: {}\n", summary.beyond_limit));
    }
    if summary.schema_mismatched_rows > 0 {
        out.push_str(&format!(
            "schema: {} rows with differing columns; added {}\n",
            summary.schema_mismatched_rows,
            summary.schema_extra_columns.join(", ")
        ));
    }
    out
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{text}");
    Ok(())
}
