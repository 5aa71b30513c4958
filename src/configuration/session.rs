use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::error::ConfiguratorError;
use crate::estimate::{compute_estimate_with, Estimate, PricingPolicy};
use crate::rules::{AccessoryControl, RuleEngine};

use super::state::{Configuration, MutationOutcome};

/// One visitor's pass through the configurator for a single base system.
///
/// Owns the configuration exclusively; dropping the session discards it.
pub struct ConfiguratorSession<'a> {
    catalog: &'a Catalog,
    rules: &'a RuleEngine,
    configuration: Configuration,
}

impl<'a> ConfiguratorSession<'a> {
    /// Open the configurator for `system_id` with nothing selected.
    pub fn open(
        catalog: &'a Catalog,
        rules: &'a RuleEngine,
        system_id: &str,
    ) -> Result<Self, ConfiguratorError> {
        let system = catalog
            .get(system_id)
            .ok_or_else(|| ConfiguratorError::UnknownProduct(system_id.to_string()))?;
        let configuration = Configuration::new(system.clone())?;
        info!("Opened configurator for {}", system_id);
        Ok(Self {
            catalog,
            rules,
            configuration,
        })
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    pub fn add_accessory(&mut self, accessory_id: &str) -> MutationOutcome {
        self.configuration
            .add_accessory(self.rules, self.catalog, accessory_id)
    }

    pub fn remove_accessory(&mut self, accessory_id: &str) -> MutationOutcome {
        self.configuration.remove_accessory(self.rules, accessory_id)
    }

    pub fn update_quantity(&mut self, accessory_id: &str, delta: i32) -> MutationOutcome {
        self.configuration
            .update_quantity(self.rules, accessory_id, delta)
    }

    /// Per-accessory control state for the configurator view.
    pub fn controls(&self) -> Vec<AccessoryControl> {
        self.rules.controls(self.catalog, &self.configuration)
    }

    /// One-line summary, e.g. "System + 3 accessory items".
    pub fn summary(&self) -> String {
        match self.configuration.item_count() {
            0 => "System only".to_string(),
            n => format!("System + {} accessory items", n),
        }
    }

    /// Run the pre-submission gate, then price the configuration with default rates.
    pub fn request_estimate(&self) -> Result<Estimate, ConfiguratorError> {
        self.request_estimate_with(&PricingPolicy::default())
    }

    pub fn request_estimate_with(&self, policy: &PricingPolicy) -> Result<Estimate, ConfiguratorError> {
        if let Err(e) = self.rules.check_requirements(&self.configuration) {
            warn!(
                "Estimate for {} blocked: {}",
                self.configuration.system_id(),
                e
            );
            return Err(e);
        }

        let estimate = compute_estimate_with(
            policy,
            self.configuration.system(),
            self.configuration.items(),
        );
        info!(
            "Estimate for {}: {} line items, total {}",
            estimate.system_id,
            estimate.lines.len(),
            estimate.total
        );
        Ok(estimate)
    }
}
