#![doc(test(attr(deny(warnings))))]

//! SiteWork Core offers the milestone lifecycle, BOQ budgeting, expense
//! approval, and payment settlement primitives that power construction
//! project tracking front ends.

pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod gateway;
pub mod ledger;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("SiteWork Core tracing initialized.");
    });
}
