//! Estimate calculation and issuing.
//!
//! `compute_estimate` is a pure function of a base system and its line items;
//! it uses exact decimal arithmetic throughout. `EstimateDocument` adds the
//! quote number and dates, and an `EstimateRenderer` lays a document out as a
//! downloadable artifact.

mod calculator;
mod document;
mod format;
mod render;

pub use calculator::{compute_estimate, compute_estimate_with, Estimate, EstimateLine, PricingPolicy};
pub use document::EstimateDocument;
pub use format::{format_date, format_price, format_rate};
pub use render::{EstimateRenderer, TextRenderer, DISCLAIMER};
