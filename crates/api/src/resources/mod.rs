//! Typed endpoints, one module per backend resource family.

pub mod catalog;
mod content;
mod coupons;
mod orders;
pub mod people;
