//! Focused unit tests covering fetch configuration and streaming output.

use super::helpers::{DATASET_ID, StubScraperBuilder, json_lines, two_pages};
use super::*;
use crate::fetch::{FetchArgs, FetchConfig, fetch_config_from_layers_for_test, run_fetch_with};
use kolada_core::{QueryDimension, QueryError, ScraperError};
use rstest::rstest;
use serde_json::json;

fn fetch_args(query: Option<&str>) -> FetchArgs {
    FetchArgs {
        dataset: Some(DATASET_ID.to_owned()),
        query: query.map(str::to_owned),
        ..FetchArgs::default()
    }
}

#[rstest]
fn converting_fetch_without_dataset_errors() {
    let err = FetchConfig::try_from(FetchArgs::default()).expect_err("missing dataset");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_DATASET);
            assert_eq!(env, ENV_FETCH_DATASET);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn missing_query_defaults_to_empty_object() {
    let config = FetchConfig::try_from(fetch_args(None)).expect("config should build");
    assert_eq!(config.query, json!({}));
}

#[rstest]
fn query_option_is_parsed_as_json() {
    let config = FetchConfig::try_from(fetch_args(Some(r#"{"municipality": "0180", "period": [2016, 2017]}"#)))
        .expect("config should build");
    assert_eq!(
        config.query,
        json!({ "municipality": "0180", "period": [2016, 2017] })
    );
}

#[rstest]
fn malformed_query_is_rejected() {
    let err = FetchConfig::try_from(fetch_args(Some("{ municipality")))
        .expect_err("malformed query should error");
    assert!(matches!(err, CliError::ParseQuery(_)));
}

#[rstest]
fn fetch_streams_every_page_as_json_lines() {
    let builder = StubScraperBuilder::new(two_pages);
    let mut output = Vec::new();

    run_fetch_with(fetch_args(None), &builder, &mut output).expect("fetch should succeed");

    let lines = json_lines(&output);
    let areas: Vec<&str> = lines
        .iter()
        .map(|line| line["attributes"]["municipality"].as_str().unwrap_or_default())
        .collect();
    assert_eq!(areas, ["0180", "0181"]);
    let first = lines.first().expect("first observation");
    assert_eq!(first["value"], 12.5);
    assert_eq!(first["attributes"]["kpi"], DATASET_ID);
    assert_eq!(first["attributes"]["period"], "2016");
}

#[rstest]
fn disallowed_area_fails_without_output() {
    let builder = StubScraperBuilder::new(two_pages);
    let mut output = Vec::new();

    let err = run_fetch_with(
        fetch_args(Some(r#"{"municipality": "9999"}"#)),
        &builder,
        &mut output,
    )
    .expect_err("unknown area should be rejected");

    assert!(matches!(
        err,
        CliError::Scraper(ScraperError::Query(QueryError::DisallowedValue { .. }))
    ));
    assert!(output.is_empty());
}

#[rstest]
#[case(r#"{"municipality": []}"#, QueryDimension::Municipality)]
#[case(r#"{"period": []}"#, QueryDimension::Period)]
fn empty_value_list_fails_without_output(#[case] raw: &str, #[case] dimension: QueryDimension) {
    let builder = StubScraperBuilder::new(two_pages);
    let mut output = Vec::new();

    let err = run_fetch_with(fetch_args(Some(raw)), &builder, &mut output)
        .expect_err("empty value list should be rejected");

    match err {
        CliError::Scraper(ScraperError::Query(QueryError::EmptyValues { dimension: seen })) => {
            assert_eq!(seen, dimension);
        }
        other => panic!("expected EmptyValues, found {other:?}"),
    }
    assert!(output.is_empty());
}

#[rstest]
fn merge_layers_supply_dataset_and_query() {
    use ortho_config::MergeComposer;

    let mut composer = MergeComposer::new();
    composer.push_file(json!({ "query": r#"{"period": 2016}"# }), None);
    composer.push_environment(json!({ "dataset": DATASET_ID }));

    let config = fetch_config_from_layers_for_test(composer.layers())
        .expect("merged config should build");
    assert_eq!(config.dataset, DATASET_ID);
    assert_eq!(config.query, json!({ "period": 2016 }));
}
