use super::*;
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;

type Calls = Rc<RefCell<Vec<(String, Vec<(String, String)>)>>>;

struct FakeTransport {
    response: Result<Value, String>,
    calls: Calls,
}

impl FakeTransport {
    fn replying(response: Value) -> (Self, Calls) {
        let calls = Calls::default();
        let transport = Self {
            response: Ok(response),
            calls: calls.clone(),
        };
        (transport, calls)
    }

    fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            calls: Calls::default(),
        }
    }
}

impl Transport for FakeTransport {
    fn get_json(&self, endpoint: &str, params: &[(String, String)]) -> Result<Value> {
        self.calls
            .borrow_mut()
            .push((endpoint.to_string(), params.to_vec()));
        self.response.clone().map_err(|message| anyhow!(message))
    }
}

fn param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn spider_man_300() -> Value {
    json!({
        "id": 6482,
        "title": "Amazing Spider-Man (1963) #300",
        "issueNumber": 300,
        "description": "Venom's first full appearance.",
        "pageCount": 36,
        "format": "Comic",
        "isbn": "",
        "upc": "75960608839730011",
        "series": { "name": "Amazing Spider-Man (1963 - 1998)" },
        "creators": { "items": [
            { "name": "David Michelinie", "role": "writer" },
            { "name": "Todd McFarlane", "role": "penciller" },
            { "name": "Stan Lee", "role": "Writer" },
            { "name": "Jim Salicrup", "role": "writer" }
        ]},
        "thumbnail": { "path": "http://i.annihil.us/u/prod/marvel/i/mg/asm300", "extension": "jpg" },
        "prices": [
            { "type": "digitalPurchasePrice", "price": 1.99 },
            { "type": "printPrice", "price": 1.5 },
            { "type": "printPrice", "price": 9.99 }
        ],
        "dates": [
            { "type": "focDate", "date": "1988-01-10T00:00:00-0500" },
            { "type": "onsaleDate", "date": "1988-05-10T00:00:00-0400" }
        ],
        "urls": [
            { "type": "purchase", "url": "http://marvel.com/buy/6482" },
            { "type": "detail", "url": "http://marvel.com/comics/issue/6482" }
        ]
    })
}

fn envelope(results: Vec<Value>) -> Value {
    json!({ "code": 200, "status": "Ok", "data": { "results": results } })
}

#[test]
fn maps_raw_comic_fields() {
    let raw: RawComic = serde_json::from_value(spider_man_300()).expect("raw comic");
    let found = RemoteMatch::from(&raw);
    assert_eq!(found.marvel_id, Some(6482));
    assert_eq!(found.issue_number.as_deref(), Some("300"));
    assert_eq!(
        found.series_name.as_deref(),
        Some("Amazing Spider-Man (1963 - 1998)")
    );
    assert_eq!(found.writers, "David Michelinie, Jim Salicrup");
    assert_eq!(
        found.cover_url.as_deref(),
        Some("http://i.annihil.us/u/prod/marvel/i/mg/asm300.jpg")
    );
    assert_eq!(found.print_price, Some(1.5));
    assert_eq!(found.on_sale_date.as_deref(), Some("1988-05-10"));
    assert_eq!(found.on_sale_year(), Some("1988"));
    assert_eq!(
        found.detail_url.as_deref(),
        Some("http://marvel.com/comics/issue/6482")
    );
}

#[test]
fn sparse_comic_maps_to_absent_fields() {
    let raw: RawComic = serde_json::from_value(json!({
        "id": 1,
        "thumbnail": { "path": "http://x/y" },
        "dates": [{ "type": "focDate", "date": "2001-01-01" }]
    }))
    .expect("raw comic");
    let found = RemoteMatch::from(&raw);
    assert_eq!(found.writers, "");
    assert!(found.cover_url.is_none());
    assert!(found.print_price.is_none());
    assert!(found.on_sale_date.is_none());
    assert!(found.on_sale_year().is_none());
    assert!(found.detail_url.is_none());
}

#[test]
fn lookup_prefers_series_name_and_sends_issue_and_small_page() {
    let (transport, calls) = FakeTransport::replying(envelope(vec![spider_man_300()]));
    let client = MarvelClient::with_transport(Box::new(transport), 5);

    let found = client
        .enrich_from_title("Amazing Spider-Man #300", Some(300), Some("Amazing Spider-Man"))
        .expect("match");
    assert_eq!(found.marvel_id, Some(6482));

    let calls = calls.borrow();
    assert_eq!(calls.len(), 1);
    let (endpoint, params) = &calls[0];
    assert_eq!(endpoint, "/comics");
    assert_eq!(param(params, "titleStartsWith"), Some("Amazing Spider-Man"));
    assert_eq!(param(params, "issueNumber"), Some("300"));
    assert_eq!(param(params, "limit"), Some("5"));
    assert_eq!(param(params, "offset"), Some("0"));
}

#[test]
fn lookup_falls_back_to_title_and_omits_unknown_issue() {
    let (transport, calls) = FakeTransport::replying(envelope(vec![]));
    let client = MarvelClient::with_transport(Box::new(transport), 5);

    assert!(client.enrich_from_title("Hulk", None, None).is_none());
    let calls = calls.borrow();
    let (_, params) = &calls[0];
    assert_eq!(param(params, "titleStartsWith"), Some("Hulk"));
    assert_eq!(param(params, "issueNumber"), None);
}

#[test]
fn first_result_wins() {
    let mut second = spider_man_300();
    second["id"] = json!(9999);
    let mut first = spider_man_300();
    first["id"] = json!(1234);
    let (transport, _) = FakeTransport::replying(envelope(vec![first, second]));
    let client = MarvelClient::with_transport(Box::new(transport), 5);
    let found = client.enrich_from_title("Spider-Man", None, None).expect("match");
    assert_eq!(found.marvel_id, Some(1234));
}

struct LastResult;

impl MatchSelector for LastResult {
    fn select<'a>(
        &self,
        _query: &LookupQuery,
        candidates: &'a [RawComic],
    ) -> Option<&'a RawComic> {
        candidates.last()
    }
}

#[test]
fn selector_is_pluggable() {
    let mut second = spider_man_300();
    second["id"] = json!(9999);
    let (transport, _) = FakeTransport::replying(envelope(vec![spider_man_300(), second]));
    let client =
        MarvelClient::with_transport(Box::new(transport), 5).with_selector(Box::new(LastResult));
    let found = client.enrich_from_title("Spider-Man", None, None).expect("match");
    assert_eq!(found.marvel_id, Some(9999));
}

#[test]
fn transport_failure_is_no_match() {
    let client =
        MarvelClient::with_transport(Box::new(FakeTransport::failing("timed out")), 5);
    assert!(client.enrich_from_title("Thor", Some(1), None).is_none());
}

#[test]
fn malformed_payload_is_no_match() {
    let (transport, _) = FakeTransport::replying(json!({ "data": { "results": "nope" } }));
    let client = MarvelClient::with_transport(Box::new(transport), 5);
    assert!(client.enrich_from_title("Thor", None, None).is_none());
}

#[test]
fn missing_data_reads_as_empty_results() {
    let (transport, _) = FakeTransport::replying(json!({ "code": 200 }));
    let client = MarvelClient::with_transport(Box::new(transport), 5);
    let search = ComicSearch {
        title: Some("Thor".to_string()),
        limit: 20,
        ..ComicSearch::default()
    };
    let results = client.search_comics(&search).expect("search");
    assert!(results.is_empty());
}

#[test]
fn search_comics_clamps_limit_and_passes_filters() {
    let (transport, calls) = FakeTransport::replying(envelope(vec![]));
    let client = MarvelClient::with_transport(Box::new(transport), 5);
    let search = ComicSearch {
        title: Some("X-Men".to_string()),
        issue_number: None,
        series_id: Some(2265),
        format: Some("trade paperback".to_string()),
        limit: 500,
        offset: 40,
    };
    client.search_comics(&search).expect("search");
    let calls = calls.borrow();
    let (_, params) = &calls[0];
    assert_eq!(param(params, "limit"), Some("100"));
    assert_eq!(param(params, "offset"), Some("40"));
    assert_eq!(param(params, "series"), Some("2265"));
    assert_eq!(param(params, "format"), Some("trade paperback"));
}

#[test]
fn search_series_hits_series_endpoint() {
    let (transport, calls) = FakeTransport::replying(envelope(vec![json!({
        "id": 2265, "title": "X-Men (1963 - 1981)", "startYear": 1963, "endYear": 1981
    })]));
    let client = MarvelClient::with_transport(Box::new(transport), 5);
    let series = client.search_series(Some("X-Men"), 3, 0).expect("series");
    assert_eq!(series.len(), 1);
    assert_eq!(series[0].id, Some(2265));
    assert_eq!(series[0].start_year, Some(1963));
    let calls = calls.borrow();
    assert_eq!(calls[0].0, "/series");
    assert_eq!(param(&calls[0].1, "limit"), Some("3"));
}

#[test]
fn comic_by_id_returns_none_on_failure() {
    let client = MarvelClient::with_transport(Box::new(FakeTransport::failing("404")), 5);
    assert!(client.get_comic_by_id(42).is_none());

    let (transport, calls) = FakeTransport::replying(envelope(vec![spider_man_300()]));
    let client = MarvelClient::with_transport(Box::new(transport), 5);
    let comic = client.get_comic_by_id(6482).expect("comic");
    assert_eq!(comic.id, Some(6482));
    assert_eq!(calls.borrow()[0].0, "/comics/6482");
}
