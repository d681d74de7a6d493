//! Stub scraper builders and canned catalogs for CLI tests.

use super::*;
use kolada_core::test_support::{STUB_BASE_URL, StubGateway};
use kolada_core::{
    AreaGroupRecord, AreaRecord, AreaType, Cursor, DataPage, DataRow, Dataset, GatewayError,
    RowValue,
};
use std::cell::RefCell;

pub(super) const DATASET_ID: &str = "N00001";

pub(super) fn first_page_url() -> String {
    format!("{STUB_BASE_URL}/data/kpi/{DATASET_ID}/municipality/0180,0181")
}

pub(super) fn second_page_url() -> String {
    format!("{}?page=2", first_page_url())
}

fn page(area: &str, cursor: Cursor) -> DataPage {
    DataPage {
        rows: vec![DataRow {
            area: area.to_owned(),
            period: "2016".to_owned(),
            values: vec![RowValue {
                value: Some(12.5),
                gender: "T".to_owned(),
                status: String::new(),
            }],
        }],
        cursor,
    }
}

/// A catalog with one municipal dataset, two municipalities and one region.
pub(super) fn catalog() -> StubGateway {
    StubGateway::new()
        .with_datasets(vec![Dataset::new(
            DATASET_ID,
            "Invånare totalt",
            AreaType::Municipality,
        )])
        .with_areas(vec![
            AreaRecord::new("0180", "Stockholm", "K"),
            AreaRecord::new("0181", "Södertälje", "K"),
            AreaRecord::new("0001", "Region Stockholm", "L"),
        ])
        .with_area_groups(vec![
            AreaGroupRecord::new("G1", "Storstadskommuner"),
            AreaGroupRecord::new("G2", "Alla regioner"),
        ])
}

/// [`catalog`] with two data pages for the default query.
pub(super) fn two_pages() -> StubGateway {
    catalog()
        .with_page(
            first_page_url(),
            page("0180", Cursor::HasNext(second_page_url())),
        )
        .with_page(second_page_url(), page("0181", Cursor::Done))
}

/// [`catalog`] whose second data page fails.
pub(super) fn failing_second_page() -> StubGateway {
    catalog()
        .with_page(
            first_page_url(),
            page("0180", Cursor::HasNext(second_page_url())),
        )
        .with_page_error(
            second_page_url(),
            GatewayError::Http {
                url: second_page_url(),
                status: 500,
                message: "internal error".to_owned(),
            },
        )
}

/// Builds scrapers over a fresh stub gateway and records the settings used.
pub(super) struct StubScraperBuilder {
    make: fn() -> StubGateway,
    seen: RefCell<Option<GatewaySettings>>,
}

impl StubScraperBuilder {
    pub(super) const fn new(make: fn() -> StubGateway) -> Self {
        Self {
            make,
            seen: RefCell::new(None),
        }
    }

    pub(super) fn seen(&self) -> Option<GatewaySettings> {
        self.seen.borrow().clone()
    }
}

impl ScraperBuilder for StubScraperBuilder {
    fn build(&self, settings: &GatewaySettings) -> Result<Box<dyn Scraper>, CliError> {
        *self.seen.borrow_mut() = Some(settings.clone());
        Ok(Box::new(KoladaScraper::new((self.make)())))
    }
}

/// Decode each output line as JSON.
pub(super) fn json_lines(output: &[u8]) -> Vec<serde_json::Value> {
    std::str::from_utf8(output)
        .expect("output should be UTF-8")
        .lines()
        .map(|line| serde_json::from_str(line).expect("each line should be JSON"))
        .collect()
}
