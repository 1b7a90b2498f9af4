//! Marvel API payload shapes and the normalized [`RemoteMatch`].
//!
//! Only the fields the catalog consumes are modelled. Everything is optional
//! or defaulted so partial records still deserialize.
use serde::{Deserialize, Serialize};

/// `{"code": ..., "data": {"results": [...]}}` response wrapper.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default = "DataContainer::empty")]
    pub data: DataContainer<T>,
}

#[derive(Debug, Deserialize)]
pub struct DataContainer<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

impl<T> DataContainer<T> {
    fn empty() -> Self {
        Self {
            results: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawComic {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub issue_number: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub page_count: Option<u32>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub upc: Option<String>,
    #[serde(default)]
    pub series: Option<RawSummary>,
    #[serde(default)]
    pub creators: Option<RawCreatorList>,
    #[serde(default)]
    pub thumbnail: Option<RawImage>,
    #[serde(default)]
    pub prices: Vec<RawPrice>,
    #[serde(default)]
    pub dates: Vec<RawDate>,
    #[serde(default)]
    pub urls: Vec<RawUrl>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSummary {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCreatorList {
    #[serde(default)]
    pub items: Vec<RawCreator>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCreator {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawImage {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub extension: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPrice {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDate {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawUrl {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// A series record from `/series`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeriesSummary {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub start_year: Option<i32>,
    #[serde(default)]
    pub end_year: Option<i32>,
}

/// Normalized result of one successful lookup.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct RemoteMatch {
    pub marvel_id: Option<u64>,
    pub title: Option<String>,
    pub issue_number: Option<String>,
    pub series_name: Option<String>,
    pub description: Option<String>,
    pub page_count: Option<u32>,
    pub format: Option<String>,
    pub isbn: Option<String>,
    pub upc: Option<String>,
    pub writers: String,
    pub on_sale_date: Option<String>,
    pub cover_url: Option<String>,
    pub print_price: Option<f64>,
    pub detail_url: Option<String>,
}

impl RemoteMatch {
    /// Year portion of the on-sale date (text before the first `-`).
    pub fn on_sale_year(&self) -> Option<&str> {
        self.on_sale_date
            .as_deref()
            .and_then(|date| date.split('-').next())
            .filter(|year| !year.is_empty())
    }
}

impl From<&RawComic> for RemoteMatch {
    fn from(raw: &RawComic) -> Self {
        RemoteMatch {
            marvel_id: raw.id,
            title: raw.title.clone(),
            issue_number: raw.issue_number.map(format_number),
            series_name: raw.series.as_ref().and_then(|series| series.name.clone()),
            description: raw.description.clone(),
            page_count: raw.page_count,
            format: raw.format.clone(),
            isbn: raw.isbn.clone(),
            upc: raw.upc.clone(),
            writers: writers(raw),
            on_sale_date: on_sale_date(raw),
            cover_url: cover_url(raw),
            print_price: raw
                .prices
                .iter()
                .find(|price| price.kind.as_deref() == Some("printPrice"))
                .and_then(|price| price.price),
            detail_url: raw
                .urls
                .iter()
                .find(|url| url.kind.as_deref() == Some("detail"))
                .and_then(|url| url.url.clone()),
        }
    }
}

fn writers(raw: &RawComic) -> String {
    raw.creators
        .iter()
        .flat_map(|list| list.items.iter())
        .filter(|creator| creator.role.as_deref() == Some("writer"))
        .map(|creator| creator.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn cover_url(raw: &RawComic) -> Option<String> {
    let thumbnail = raw.thumbnail.as_ref()?;
    let path = thumbnail.path.as_deref().filter(|p| !p.is_empty())?;
    let extension = thumbnail.extension.as_deref().filter(|e| !e.is_empty())?;
    Some(format!("{path}.{extension}"))
}

fn on_sale_date(raw: &RawComic) -> Option<String> {
    let date = raw
        .dates
        .iter()
        .find(|date| date.kind.as_deref() == Some("onsaleDate"))?;
    let value = date.date.as_deref().unwrap_or_default();
    Some(value.split('T').next().unwrap_or_default().to_string())
}

/// Render a price the way the catalog has always stored it: whole amounts
/// keep one decimal (`2.0` -> `"2.0"`), others print as-is (`3.99`).
pub fn format_price(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// Render whole numbers without a fractional part (`300.0` -> `"300"`).
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
