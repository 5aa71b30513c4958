//! Accessory compatibility rules for configurable base systems.
//!
//! This module provides a TOML-driven rule engine that decides which
//! accessories may be added to a configuration, how far their quantities may
//! go, and which companions are attached or removed alongside them.
//!
//! # Architecture
//!
//! - **Rules**: Loaded from TOML config at startup (or embedded defaults),
//!   one rule set per base system
//! - **Constraints**: exclusive groups, group count caps, per-accessory
//!   quantity pins, prerequisites and auto-attached companions
//! - **Queries**: add/increment/decrement decisions carry the user-facing
//!   reason when refused
//! - **Requirements**: groups of which at least one member must be selected
//!   before an estimate can be requested
//!
//! # Example
//!
//! ```ignore
//! use dvr_configurator::catalog::default_catalog;
//! use dvr_configurator::configuration::Configuration;
//! use dvr_configurator::rules::{RuleEngine, default_rules};
//!
//! let catalog = default_catalog();
//! let engine = RuleEngine::new(default_rules());
//!
//! let system = catalog.get("x3n-ai-premium").unwrap().clone();
//! let configuration = Configuration::new(system)?;
//!
//! let decision = engine.can_add(&configuration, "ca20s-adas-camera");
//! assert_eq!(decision.reason(), Some("Requires DSM Camera Kit"));
//! ```

mod engine;
mod table;
mod types;

pub use engine::{RuleEngine, ADD_LABEL};
pub use table::{default_rules, load_rules, parse_rules};
pub use types::*;
