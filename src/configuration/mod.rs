//! Configuration state for one base system and its selected accessories.
//!
//! A [`Configuration`] is created when a visitor opens the configurator for a
//! system, changed through `add_accessory`, `remove_accessory` and
//! `update_quantity`, and discarded when the visitor leaves. Every mutation is
//! checked against the [`RuleEngine`](crate::rules::RuleEngine) and reports a
//! [`MutationOutcome`] instead of failing; a rejected mutation leaves the
//! configuration untouched.
//!
//! [`ConfiguratorSession`] bundles a configuration with the catalog and rule
//! engine it is evaluated against, and gates estimate requests.

mod session;
mod state;

pub use session::ConfiguratorSession;
pub use state::{Configuration, ConfigurationState, LineItem, MutationOutcome};
