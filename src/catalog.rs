//! Catalog rows and CSV persistence.
//!
//! A catalog row is an ordered list of `(column, value)` pairs. Order follows
//! the source file so a rewritten catalog keeps the columns where the user
//! left them.
use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::Path;

pub const FIELD_ID: &str = "id";
pub const FIELD_TYPE: &str = "type";
pub const FIELD_TITLE: &str = "title";
pub const FIELD_AUTHOR: &str = "author";
pub const FIELD_VOLUME: &str = "volume";
pub const FIELD_SERIES: &str = "series";
pub const FIELD_PUBLISHER: &str = "publisher";
pub const FIELD_YEAR: &str = "year";
pub const FIELD_GENRE: &str = "genre";
pub const FIELD_DESCRIPTION: &str = "description";
pub const FIELD_COVER_URL: &str = "cover_url";
pub const FIELD_ENRICHMENT_STATUS: &str = "enrichment_status";
pub const FIELD_ENRICHMENT_DATE: &str = "enrichment_date";
pub const FIELD_ENRICHMENT_SOURCE: &str = "enrichment_source";
pub const FIELD_SEARCH_QUERY: &str = "search_query";
pub const FIELD_PRICE: &str = "price";

/// One cataloged item (book, manga, comic).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogEntry {
    fields: Vec<(String, String)>,
}

impl CatalogEntry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of `field`, or the empty string when the column is absent.
    pub fn get(&self, field: &str) -> &str {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value.as_str())
            .unwrap_or("")
    }

    /// Overwrite `field` in place, or append it as a new trailing column.
    pub fn set(&mut self, field: &str, value: impl Into<String>) {
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| name == field) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((field.to_string(), value)),
        }
    }

    /// Builder form of [`CatalogEntry::set`].
    #[cfg(test)]
    pub fn with(mut self, field: &str, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Catalog kind (`comic`, `book`, `manga`, ...) as stored.
    pub fn kind(&self) -> &str {
        self.get(FIELD_TYPE)
    }

    pub fn title(&self) -> &str {
        self.get(FIELD_TITLE)
    }
}

/// Column layout used when writing a catalog back to disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogSchema {
    /// Output columns: the first row's columns, then extras in first-seen order.
    pub columns: Vec<String>,
    /// Columns that appeared after the first row.
    pub extra_columns: Vec<String>,
    /// Zero-based indexes of rows whose column set differs from the first row.
    pub mismatched_rows: Vec<usize>,
}

impl CatalogSchema {
    /// Derive the write schema for `entries`.
    ///
    /// Rows whose column set differs from the first row are recorded rather
    /// than trimmed, and their extra columns are appended to the schema.
    pub fn from_entries(entries: &[CatalogEntry]) -> Self {
        let Some(first) = entries.first() else {
            return Self::default();
        };
        let mut columns: Vec<String> = first.columns().map(str::to_string).collect();
        let base: BTreeSet<&str> = first.columns().collect();
        let mut seen: BTreeSet<String> = columns.iter().cloned().collect();
        let mut extra_columns = Vec::new();
        let mut mismatched_rows = Vec::new();

        for (idx, entry) in entries.iter().enumerate().skip(1) {
            let row: BTreeSet<&str> = entry.columns().collect();
            if row != base {
                mismatched_rows.push(idx);
            }
            for column in entry.columns() {
                if seen.insert(column.to_string()) {
                    columns.push(column.to_string());
                    extra_columns.push(column.to_string());
                }
            }
        }

        Self {
            columns,
            extra_columns,
            mismatched_rows,
        }
    }

    pub fn is_heterogeneous(&self) -> bool {
        !self.mismatched_rows.is_empty()
    }
}

/// Read every row of a CSV catalog with a header row.
///
/// Returns `Ok(None)` when the file does not exist.
pub fn read_catalog(path: &Path) -> Result<Option<Vec<CatalogEntry>>> {
    let file = match fs::File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(err).with_context(|| format!("open catalog {}", path.display()));
        }
    };
    let entries = parse_catalog(file).with_context(|| format!("read catalog {}", path.display()))?;
    Ok(Some(entries))
}

fn parse_catalog<R: io::Read>(reader: R) -> Result<Vec<CatalogEntry>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);
    let headers: Vec<String> = reader
        .byte_headers()
        .context("read catalog header")?
        .iter()
        .map(|name| String::from_utf8_lossy(name).into_owned())
        .collect();
    let mut entries = Vec::new();

    for (idx, record) in reader.byte_records().enumerate() {
        let record = record.with_context(|| format!("parse catalog row {}", idx + 1))?;
        if record.len() > headers.len() {
            tracing::warn!(
                row = idx + 1,
                fields = record.len(),
                columns = headers.len(),
                "catalog row has more fields than header; extras dropped"
            );
        }
        if record.iter().any(|field| std::str::from_utf8(field).is_err()) {
            tracing::warn!(row = idx + 1, "catalog row is not valid UTF-8; decoded lossily");
        }
        let mut entry = CatalogEntry::new();
        for (col, name) in headers.iter().enumerate() {
            let value = record.get(col).map(String::from_utf8_lossy).unwrap_or_default();
            entry.set(name, value);
        }
        entries.push(entry);
    }
    Ok(entries)
}

/// Write `entries` as a complete replacement of the catalog at `path`.
///
/// Returns the schema used, so callers can report heterogeneous rows.
pub fn write_catalog(path: &Path, entries: &[CatalogEntry]) -> Result<CatalogSchema> {
    let schema = CatalogSchema::from_entries(entries);
    if schema.is_heterogeneous() {
        tracing::warn!(
            rows = schema.mismatched_rows.len(),
            extra_columns = ?schema.extra_columns,
            "catalog rows have differing columns; writing the union"
        );
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let file = fs::File::create(path).with_context(|| format!("create {}", path.display()))?;
    render_catalog(file, entries, &schema).with_context(|| format!("write {}", path.display()))?;
    Ok(schema)
}

fn render_catalog<W: io::Write>(
    writer: W,
    entries: &[CatalogEntry],
    schema: &CatalogSchema,
) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer
        .write_record(&schema.columns)
        .context("write catalog header")?;
    for entry in entries {
        writer
            .write_record(schema.columns.iter().map(|column| entry.get(column)))
            .context("write catalog row")?;
    }
    writer.flush().context("flush catalog")?;
    Ok(())
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;
