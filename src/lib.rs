#![doc(test(attr(deny(warnings))))]

//! Finance Tracker keeps income and expense transactions organised into
//! categories, and derives the totals and chart data a dashboard shows.
//!
//! State lives in two [`store::EntityStore`]s owned by a
//! [`state::FinanceState`]. Every mutation goes through an asynchronous
//! [`repository::Repository`] and is only applied once that call succeeds.

pub mod cli;
pub mod config;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod repository;
pub mod state;
pub mod store;
pub mod summary;
pub mod utils;
pub mod view;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!(
            version = utils::build_info::current().version,
            "Finance Tracker tracing initialized."
        );
    });
}
