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

/// Path of the stylesheet, fingerprinted when the build produced a hash.
///
/// Usage in templates: `<link rel="stylesheet" href="{{ ""|css_href }}">`
#[askama::filter_fn]
pub fn css_href(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(stylesheet_path(env!("CSS_HASH")))
}

fn stylesheet_path(hash: &str) -> String {
    if hash.is_empty() {
        "/static/css/storefront.css".to_owned()
    } else {
        format!("/static/css/derived/storefront.{hash}.css")
    }
}

/// Badge modifier for an order status wire value.
///
/// Usage in templates: `<span class="badge {{ order.shipping_status|status_badge }}">`
#[askama::filter_fn]
pub fn status_badge(value: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(match value.to_string().as_str() {
        "pending" | "requested" => "badge--warning",
        "in_transit" => "badge--info",
        "delivered" | "completed" | "approved" => "badge--success",
        "cancelled" | "failed" | "rejected" | "returned" => "badge--danger",
        _ => "badge--neutral",
    })
}

/// Star string for a 1-5 rating, e.g. `★★★☆☆`.
///
/// Usage in templates: `{{ comment.rating|stars }}`
#[askama::filter_fn]
pub fn stars(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let filled = value.to_string().parse::<usize>().unwrap_or(0).min(5);
    Ok(format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled)))
}
