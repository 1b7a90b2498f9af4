//! Marvel Comics API client.
//!
//! The client is split at the wire: [`Transport`] performs one signed GET and
//! returns JSON, while [`MarvelClient`] owns query building, result selection
//! and field mapping. Tests swap the transport for canned payloads.
use super::auth::MarvelCredentials;
use super::types::{ApiEnvelope, RawComic, RemoteMatch, SeriesSummary};
use super::ComicLookup;
use crate::config::LookupConfig;
use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::{Duration, Instant};

/// Upper bound the API accepts for `limit`.
pub const MAX_PAGE_SIZE: u32 = 100;

/// One authenticated GET against the API, returning the decoded JSON body.
pub trait Transport {
    fn get_json(&self, endpoint: &str, params: &[(String, String)]) -> Result<Value>;
}

/// HTTP transport backed by a `ureq` agent with a global per-request timeout.
pub struct UreqTransport {
    agent: ureq::Agent,
    base_url: String,
    user_agent: String,
    credentials: MarvelCredentials,
}

impl UreqTransport {
    pub fn new(config: &LookupConfig, credentials: MarvelCredentials) -> Self {
        let agent_config = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
            .build();
        Self {
            agent: ureq::Agent::new_with_config(agent_config),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            user_agent: config.user_agent.clone(),
            credentials,
        }
    }
}

impl Transport for UreqTransport {
    fn get_json(&self, endpoint: &str, params: &[(String, String)]) -> Result<Value> {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut request = self
            .agent
            .get(&url)
            .header("User-Agent", self.user_agent.as_str());
        for (key, value) in params {
            request = request.query(key, value);
        }
        for (key, value) in self.credentials.sign_now().into_pairs() {
            request = request.query(key, value);
        }

        let start = Instant::now();
        let mut response = request
            .call()
            .with_context(|| format!("GET {endpoint}"))?;
        let body: Value = response
            .body_mut()
            .read_json()
            .with_context(|| format!("decode {endpoint} response as JSON"))?;
        tracing::debug!(
            endpoint,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "marvel request complete"
        );
        Ok(body)
    }
}

/// Parameters for `/comics`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComicSearch {
    pub title: Option<String>,
    pub issue_number: Option<u32>,
    pub series_id: Option<u64>,
    pub format: Option<String>,
    pub limit: u32,
    pub offset: u32,
}

impl ComicSearch {
    fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("limit".to_string(), self.limit.min(MAX_PAGE_SIZE).to_string()),
            ("offset".to_string(), self.offset.to_string()),
        ];
        if let Some(title) = self.title.as_deref().filter(|t| !t.is_empty()) {
            params.push(("titleStartsWith".to_string(), title.to_string()));
        }
        if let Some(issue) = self.issue_number {
            params.push(("issueNumber".to_string(), issue.to_string()));
        }
        if let Some(series) = self.series_id {
            params.push(("series".to_string(), series.to_string()));
        }
        if let Some(format) = self.format.as_deref().filter(|f| !f.is_empty()) {
            params.push(("format".to_string(), format.to_string()));
        }
        params
    }
}

/// What a lookup was asked for; passed to selectors for scoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupQuery {
    pub title: String,
    pub issue_number: Option<u32>,
}

/// Chooses the best candidate among search results.
pub trait MatchSelector {
    fn select<'a>(
        &self,
        query: &LookupQuery,
        candidates: &'a [RawComic],
    ) -> Option<&'a RawComic>;
}

/// The API's own ranking decides: the first result wins. No scoring or
/// tie-break is applied between candidates.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstResult;

impl MatchSelector for FirstResult {
    fn select<'a>(
        &self,
        _query: &LookupQuery,
        candidates: &'a [RawComic],
    ) -> Option<&'a RawComic> {
        candidates.first()
    }
}

/// Search, select and map against the Marvel API.
pub struct MarvelClient {
    transport: Box<dyn Transport>,
    selector: Box<dyn MatchSelector>,
    page_size: u32,
}

impl MarvelClient {
    /// Build an HTTP-backed client. Credentials are resolved by the caller,
    /// so a missing key fails before any client exists.
    pub fn new(config: &LookupConfig, credentials: MarvelCredentials) -> Self {
        Self::with_transport(
            Box::new(UreqTransport::new(config, credentials)),
            config.page_size,
        )
    }

    pub fn with_transport(transport: Box<dyn Transport>, page_size: u32) -> Self {
        Self {
            transport,
            selector: Box::new(FirstResult),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Replace the match selection strategy.
    #[allow(dead_code)]
    pub fn with_selector(mut self, selector: Box<dyn MatchSelector>) -> Self {
        self.selector = selector;
        self
    }

    pub fn search_comics(&self, search: &ComicSearch) -> Result<Vec<RawComic>> {
        self.fetch_results("/comics", &search.to_params())
    }

    pub fn search_series(
        &self,
        title: Option<&str>,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<SeriesSummary>> {
        let mut params = vec![
            ("limit".to_string(), limit.min(MAX_PAGE_SIZE).to_string()),
            ("offset".to_string(), offset.to_string()),
        ];
        if let Some(title) = title.filter(|t| !t.is_empty()) {
            params.push(("titleStartsWith".to_string(), title.to_string()));
        }
        self.fetch_results("/series", &params)
    }

    /// Fetch one comic by id. Request failures read as "not found".
    pub fn get_comic_by_id(&self, comic_id: u64) -> Option<RawComic> {
        match self.fetch_results::<RawComic>(&format!("/comics/{comic_id}"), &[]) {
            Ok(results) => results.into_iter().next(),
            Err(err) => {
                tracing::warn!(
                    comic_id,
                    error = %format!("{err:#}"),
                    "marvel comic fetch failed"
                );
                None
            }
        }
    }

    fn fetch_results<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(String, String)],
    ) -> Result<Vec<T>> {
        let body = self.transport.get_json(endpoint, params)?;
        let envelope: ApiEnvelope<T> = serde_json::from_value(body)
            .map_err(|err| anyhow!("unexpected {endpoint} response shape: {err}"))?;
        Ok(envelope.data.results)
    }

    fn lookup(&self, query: &LookupQuery) -> Result<Option<RemoteMatch>> {
        let search = ComicSearch {
            title: Some(query.title.clone()),
            issue_number: query.issue_number,
            limit: self.page_size,
            ..ComicSearch::default()
        };
        let results = self.search_comics(&search)?;
        tracing::debug!(
            query = %query.title,
            issue = ?query.issue_number,
            results = results.len(),
            "marvel search"
        );
        Ok(self
            .selector
            .select(query, &results)
            .map(RemoteMatch::from))
    }
}

impl ComicLookup for MarvelClient {
    fn enrich_from_title(
        &self,
        title: &str,
        issue_number: Option<u32>,
        series_name: Option<&str>,
    ) -> Option<RemoteMatch> {
        let query = LookupQuery {
            title: series_name
                .filter(|name| !name.is_empty())
                .unwrap_or(title)
                .to_string(),
            issue_number,
        };
        if query.title.trim().is_empty() {
            tracing::debug!("empty search title; skipping Marvel lookup");
            return None;
        }
        match self.lookup(&query) {
            Ok(found) => found,
            Err(err) => {
                tracing::warn!(
                    title,
                    query = %query.title,
                    error = %format!("{err:#}"),
                    "marvel lookup failed; treating as no match"
                );
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
