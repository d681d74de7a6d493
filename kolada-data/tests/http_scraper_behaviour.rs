//! Behavioural tests for `KoladaScraper` driven through `HttpGateway`.

mod support;

use std::cell::RefCell;

use kolada_core::{GatewayError, KoladaScraper, Observation, Scraper, ScraperError};
use kolada_data::HttpGateway;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::{Value, json};
use support::CannedServer;

type ServerCell = RefCell<Option<CannedServer>>;
type Pulled = RefCell<Vec<Result<Observation, ScraperError>>>;

const FIRST: &str = "data/kpi/N00001/municipality/0180,0181";
const SECOND: &str = "data/kpi/N00001/municipality/0180,0181?page=2";
const PERIOD_ONLY: &str = "data/kpi/N00001/year/2016";

fn row(area: &str) -> Value {
    json!({
        "kpi": "N00001",
        "municipality": area,
        "period": 2016,
        "values": [
            { "count": 1, "gender": "K", "status": "", "value": 1.0 },
            { "count": 1, "gender": "M", "status": "", "value": null },
        ],
    })
}

fn catalogs(server: &CannedServer) {
    server
        .respond(
            "kpi",
            &json!({ "values": [
                { "id": "N00001", "title": "Invånare", "municipality_type": "K" },
            ]}),
        )
        .respond(
            "municipality",
            &json!({ "values": [
                { "id": "0180", "title": "Stockholm", "type": "K" },
                { "id": "0181", "title": "Södertälje", "type": "K" },
                { "id": "0001", "title": "Region Stockholm", "type": "L" },
            ]}),
        )
        .respond(
            FIRST,
            &json!({ "values": [row("0180")], "next_page": server.url(SECOND) }),
        );
}

fn fetch(server: &ServerCell, pulled: &Pulled, raw: &Value) {
    let borrow = server.borrow();
    let canned = borrow.as_ref().expect("server started");
    let gateway = HttpGateway::new(canned.base_url()).expect("gateway should build");
    let scraper = KoladaScraper::new(gateway);
    let dataset = scraper.dataset("N00001").expect("dataset listed");
    *pulled.borrow_mut() = match scraper.fetch_data(&dataset, raw) {
        Ok(stream) => stream.collect(),
        Err(err) => vec![Err(err)],
    };
}

#[fixture]
fn server() -> ServerCell {
    RefCell::new(None)
}

#[fixture]
fn pulled() -> Pulled {
    RefCell::new(Vec::new())
}

#[given("a Kolada server with two municipalities and two data pages")]
fn two_pages(#[from(server)] server: &ServerCell) {
    let canned = CannedServer::start();
    catalogs(&canned);
    canned
        .respond(SECOND, &json!({ "values": [row("0181")] }))
        .respond(PERIOD_ONLY, &json!({ "values": [row("0180")] }));
    *server.borrow_mut() = Some(canned);
}

#[given("a Kolada server whose second data page fails")]
fn failing_second_page(#[from(server)] server: &ServerCell) {
    let canned = CannedServer::start();
    catalogs(&canned);
    canned.respond_raw(SECOND, 500, "internal error");
    *server.borrow_mut() = Some(canned);
}

#[when("I fetch every observation for the dataset")]
fn fetch_everything(#[from(server)] server: &ServerCell, #[from(pulled)] pulled: &Pulled) {
    fetch(server, pulled, &json!({}));
}

#[when("I fetch observations for period 2016")]
fn fetch_period(#[from(server)] server: &ServerCell, #[from(pulled)] pulled: &Pulled) {
    fetch(server, pulled, &json!({ "period": 2016 }));
}

#[then("four observations are returned in page order")]
fn four_in_order(#[from(pulled)] pulled: &Pulled) {
    let borrow = pulled.borrow();
    let keys: Vec<(String, String, Option<f64>)> = borrow
        .iter()
        .map(|item| {
            let observation = item.as_ref().expect("observation expected");
            (
                observation.attributes.municipality.clone(),
                observation.attributes.gender.clone(),
                observation.value,
            )
        })
        .collect();
    assert_eq!(
        keys,
        [
            ("0180".to_owned(), "K".to_owned(), Some(1.0)),
            ("0180".to_owned(), "M".to_owned(), None),
            ("0181".to_owned(), "K".to_owned(), Some(1.0)),
            ("0181".to_owned(), "M".to_owned(), None),
        ]
    );
}

#[then("the server saw the area catalog once and both data pages")]
fn server_hits(#[from(server)] server: &ServerCell) {
    let borrow = server.borrow();
    let canned = borrow.as_ref().expect("server started");
    assert_eq!(canned.hits(), ["kpi", "municipality", FIRST, SECOND]);
}

#[then("the first page is followed by an HTTP 500 error")]
fn prefix_then_error(#[from(pulled)] pulled: &Pulled) {
    let borrow = pulled.borrow();
    assert_eq!(borrow.len(), 3);
    assert!(borrow.iter().take(2).all(Result::is_ok));
    assert!(matches!(
        borrow.last(),
        Some(Err(ScraperError::Gateway(GatewayError::Http { status: 500, .. })))
    ));
}

#[then("the server saw only the period data path")]
fn period_path_only(#[from(server)] server: &ServerCell) {
    let borrow = server.borrow();
    let canned = borrow.as_ref().expect("server started");
    assert_eq!(canned.hits(), ["kpi", PERIOD_ONLY]);
}

#[scenario(path = "tests/features/http_scraper.feature", index = 0)]
fn streams_two_pages(server: ServerCell, pulled: Pulled) {
    let _ = (server, pulled);
}

#[scenario(path = "tests/features/http_scraper.feature", index = 1)]
fn failing_page_ends_stream(server: ServerCell, pulled: Pulled) {
    let _ = (server, pulled);
}

#[scenario(path = "tests/features/http_scraper.feature", index = 2)]
fn period_only_query(server: ServerCell, pulled: Pulled) {
    let _ = (server, pulled);
}
