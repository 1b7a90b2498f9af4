//! Marvel Comics API lookup: signing, transport, selection and mapping.
mod auth;
mod client;
mod types;

pub use auth::MarvelCredentials;
pub use client::{ComicSearch, MarvelClient};
pub use types::{format_price, RemoteMatch};

/// Something that can turn a title into remote metadata.
///
/// Failures are the implementation's to log; callers only see "no match".
pub trait ComicLookup {
    fn enrich_from_title(
        &self,
        title: &str,
        issue_number: Option<u32>,
        series_name: Option<&str>,
    ) -> Option<RemoteMatch>;
}
