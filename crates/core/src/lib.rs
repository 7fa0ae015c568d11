//! Zeal Core - shared types and rules.
//!
//! Used by every Zeal component:
//! - `storefront` - public shop
//! - `admin` - back-office dashboard
//! - `cli` - order operations from a terminal
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O and no
//! HTTP. The backend is the source of truth; everything here either
//! describes its documents or decides what may be sent to it.
//!
//! # Modules
//!
//! - [`types`] - IDs, statuses, orders, prices, emails and toasts
//! - [`workflow`] - order shipping/return/cancel transitions
//! - [`coupon`] - coupon model and form validation
//! - [`pagination`] - paging over fetched lists
//! - [`listing`] - search and sort helpers for list pages

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod coupon;
pub mod listing;
pub mod pagination;
pub mod types;
pub mod workflow;

pub use types::*;
pub use workflow::{
    CancelReason, OrderStatusUpdate, StatusOption, TransitionError, TransitionKind,
    TransitionPlan,
};
