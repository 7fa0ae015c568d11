//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Badge modifier for a status wire value.
///
/// Usage in templates: `<span class="badge {{ order.shipping_status|status_badge }}">`
#[askama::filter_fn]
pub fn status_badge(value: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(badge_for(&value.to_string()))
}

fn badge_for(status: &str) -> &'static str {
    match status {
        "pending" | "requested" | "scheduled" => "badge--warning",
        "in_transit" => "badge--info",
        "delivered" | "completed" | "approved" | "active" | "admin" => "badge--success",
        "cancelled" | "failed" | "rejected" | "returned" | "expired" | "exhausted" => {
            "badge--danger"
        }
        _ => "badge--neutral",
    }
}
