//! Behaviour-driven step definitions driving the fetch CLI scenarios.

use super::helpers::{StubScraperBuilder, catalog, failing_second_page, json_lines, two_pages};
use super::*;
use kolada_core::GatewayError;
use kolada_core::test_support::StubGateway;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;

struct FetchWorld {
    gateway: RefCell<fn() -> StubGateway>,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl FetchWorld {
    fn new() -> Self {
        Self {
            gateway: RefCell::new(catalog),
            stdout: RefCell::new(Vec::new()),
            result: RefCell::new(None),
        }
    }

    fn error(&self) -> std::cell::Ref<'_, CliError> {
        std::cell::Ref::map(self.result.borrow(), |result| {
            result
                .as_ref()
                .expect("result recorded")
                .as_ref()
                .expect_err("expected error")
        })
    }
}

#[fixture]
fn world() -> FetchWorld {
    FetchWorld::new()
}

#[given("a catalog with two data pages")]
fn catalog_with_two_pages(#[from(world)] world: &FetchWorld) {
    world.gateway.replace(two_pages);
}

#[given("a catalog whose second data page fails")]
fn catalog_with_failing_page(#[from(world)] world: &FetchWorld) {
    world.gateway.replace(failing_second_page);
}

#[when("I run the fetch command for dataset {id:word}")]
fn run_fetch_command(#[from(world)] world: &FetchWorld, id: String) {
    let invocation = ["kolada", "fetch", "--dataset", id.trim_matches('"')];
    let builder = StubScraperBuilder::new(*world.gateway.borrow());
    let outcome = Cli::try_parse_from(invocation)
        .map_err(CliError::from)
        .and_then(|cli| {
            let mut buffer = world.stdout.borrow_mut();
            dispatch(cli.command, &builder, &mut *buffer)
        });
    world.result.replace(Some(outcome));
}

#[then("the command succeeds")]
fn command_succeeds(#[from(world)] world: &FetchWorld) {
    let borrowed = world.result.borrow();
    let result = borrowed.as_ref().expect("result recorded");
    result.as_ref().expect("expected success");
}

#[then("{count} observation lines are written")]
fn observation_lines_written(#[from(world)] world: &FetchWorld, count: usize) {
    let lines = json_lines(&world.stdout.borrow());
    assert_eq!(lines.len(), count);
    assert!(lines.iter().all(|line| line["attributes"]["kpi"] == "N00001"));
}

#[then("the command fails with HTTP status {status}")]
fn command_fails_with_status(#[from(world)] world: &FetchWorld, status: u16) {
    match &*world.error() {
        CliError::Scraper(ScraperError::Gateway(GatewayError::Http { status: seen, .. })) => {
            assert_eq!(*seen, status);
        }
        other => panic!("expected HTTP gateway error, found {other:?}"),
    }
}

#[then("the command fails because the dataset is unknown")]
fn command_fails_unknown_dataset(#[from(world)] world: &FetchWorld) {
    match &*world.error() {
        CliError::Scraper(ScraperError::UnknownDataset { id }) => assert_eq!(id, "X99999"),
        other => panic!("expected UnknownDataset, found {other:?}"),
    }
}

macro_rules! register_fetch_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/fetch_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: FetchWorld) {
            let _ = world;
        }
    };
}

register_fetch_scenario!(fetch_happy_path, "streaming every observation of a dataset");
register_fetch_scenario!(
    fetch_failing_page,
    "keeping output written before a failing page"
);
register_fetch_scenario!(fetch_unknown_dataset, "rejecting an unknown dataset");
