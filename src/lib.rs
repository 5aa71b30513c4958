pub mod catalog;
pub mod configuration;
pub mod contact;
mod error;
pub mod estimate;
pub mod rules;
pub mod settings;

pub use catalog::{Catalog, Product};
pub use configuration::{Configuration, ConfiguratorSession, MutationOutcome};
pub use error::ConfiguratorError;
pub use estimate::{compute_estimate, Estimate, EstimateDocument};
pub use rules::{Decision, RuleEngine};
pub use settings::Settings;

/// Install the global tracing subscriber. Filter comes from `RUST_LOG`,
/// defaulting to `info`. Safe to call more than once.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}
