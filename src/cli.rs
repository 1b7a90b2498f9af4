//! CLI argument parsing for the catalog enricher.
//!
//! Commands map one-to-one onto handlers in `workflow`; argument structs carry
//! no behavior of their own.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "comic-enrich",
    version,
    about = "Enrich a comic catalog with Marvel API metadata",
    after_help = "Commands:\n  enrich --catalog <csv> --out <csv>    Enrich comic rows and write the catalog\n  classify --title <title>              Show how a title is classified offline\n  search --title <title>                Search Marvel comics\n  series --title <title>                Search Marvel series\n  comic --id <id>                       Fetch one Marvel comic\n\nExamples:\n  comic-enrich enrich --catalog books.csv --out books.enriched.csv --limit 20\n  comic-enrich classify --title \"Amazing Spider-Man #300\" --json\n  comic-enrich search --title \"Amazing Spider-Man\" --issue 300",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    /// Emit debug logging on stderr (overridden by RUST_LOG)
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    Enrich(EnrichArgs),
    Classify(ClassifyArgs),
    Search(SearchArgs),
    Series(SeriesArgs),
    Comic(ComicArgs),
}

/// Options shared by every command that talks to the Marvel API.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct LookupArgs {
    /// JSON lookup config (base_url, timeout_secs, page_size, user_agent)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// KEY=VALUE file holding MARVEL_PUBLIC_KEY and MARVEL_PRIVATE_KEY
    #[arg(long, value_name = "PATH")]
    pub secrets_file: Option<PathBuf>,
}

/// Batch enrichment of a CSV catalog.
#[derive(Parser, Debug)]
#[command(about = "Enrich catalog rows and write the result")]
pub struct EnrichArgs {
    /// Input catalog CSV with a header row
    #[arg(long, value_name = "CSV")]
    pub catalog: PathBuf,

    /// Output CSV; rewritten in full. Without it nothing is written
    #[arg(long, value_name = "CSV")]
    pub out: Option<PathBuf>,

    /// Only enrich rows whose type matches (case-insensitive)
    #[arg(long = "type", value_name = "TYPE", default_value = "comic")]
    pub kind: String,

    /// Send every row to the enricher regardless of type
    #[arg(long, conflicts_with = "kind")]
    pub all_types: bool,

    /// Process at most N rows (0 means no limit)
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,

    /// Keep rows past --limit in the output, unchanged
    #[arg(long, requires = "limit")]
    pub keep_unprocessed: bool,

    /// Skip the Marvel API; Marvel titles are marked for manual enrichment
    #[arg(long)]
    pub no_marvel: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub lookup: LookupArgs,
}

/// Offline classification of a single title.
#[derive(Parser, Debug)]
#[command(about = "Classify a title and extract its series and issue")]
pub struct ClassifyArgs {
    /// Catalog title
    #[arg(long)]
    pub title: String,

    /// Catalog volume field (e.g. "#45")
    #[arg(long, default_value = "")]
    pub volume: String,

    /// Catalog publisher
    #[arg(long, default_value = "")]
    pub publisher: String,

    /// Catalog author
    #[arg(long, default_value = "")]
    pub author: String,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

/// Raw comic search.
#[derive(Parser, Debug)]
#[command(about = "Search Marvel comics and print mapped matches as JSON")]
pub struct SearchArgs {
    /// Title prefix
    #[arg(long)]
    pub title: Option<String>,

    /// Issue number
    #[arg(long, value_name = "N")]
    pub issue: Option<u32>,

    /// Restrict to one series id
    #[arg(long, value_name = "ID")]
    pub series_id: Option<u64>,

    /// Format filter (comic, trade paperback, ...)
    #[arg(long)]
    pub format: Option<String>,

    /// Page size (capped at 100)
    #[arg(long, value_name = "N", default_value_t = 20)]
    pub limit: u32,

    /// Result offset
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub offset: u32,

    #[command(flatten)]
    pub lookup: LookupArgs,
}

/// Series search.
#[derive(Parser, Debug)]
#[command(about = "Search Marvel series and print them as JSON")]
pub struct SeriesArgs {
    /// Title prefix
    #[arg(long)]
    pub title: Option<String>,

    /// Page size (capped at 100)
    #[arg(long, value_name = "N", default_value_t = 20)]
    pub limit: u32,

    /// Result offset
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub offset: u32,

    #[command(flatten)]
    pub lookup: LookupArgs,
}

/// Single comic fetch.
#[derive(Parser, Debug)]
#[command(about = "Fetch one Marvel comic by id")]
pub struct ComicArgs {
    /// Marvel comic id
    #[arg(long, value_name = "ID")]
    pub id: u64,

    #[command(flatten)]
    pub lookup: LookupArgs,
}
