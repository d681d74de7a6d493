//! Shared test harness modules for the Kolada CLI.
#![expect(
    clippy::panic,
    reason = "Tests assert panic branches to surface unexpected CLI outcomes"
)]

use super::*;

mod fetch_steps;
mod fetch_unit;
mod helpers;
