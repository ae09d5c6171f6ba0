//! Aggregate compiler test modules.
//!
//! Organized by shape:
//! - `basic`: plain grouped aggregates, TOP-X placement, validation
//! - `axis`: calendar-spine queries per increment and dialect
//! - `pivot`: value selection, discovery query, pivot and pivot-axis SQL
//! - `dialects`: one request rendered across all five dialects

mod basic;
mod pivot;

use chrono::NaiveDate;

use crate::model::AggregateRequest;

pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// `SELECT COUNT(*), region FROM orders GROUP BY region` as a request.
pub(crate) fn grouped_count() -> AggregateRequest {
    AggregateRequest::new()
        .count("COUNT(*)")
        .from("orders")
        .group_by("region")
}
