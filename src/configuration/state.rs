use serde::Serialize;
use tracing::{debug, info};

use crate::catalog::{Catalog, Product};
use crate::error::ConfiguratorError;
use crate::rules::{Decision, RuleEngine};

/// An accessory and its selected quantity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItem {
    pub product: Product,
    pub quantity: u32,
}

/// Coarse state of a configuration. Purely a count, not a mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigurationState {
    Empty,
    Populated,
}

/// Result of a configuration mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MutationOutcome {
    /// Line items were inserted and/or deleted.
    Applied {
        added: Vec<String>,
        removed: Vec<String>,
    },
    /// An existing line item's quantity changed.
    QuantityChanged { accessory_id: String, quantity: u32 },
    /// Nothing to do (e.g., removing an accessory that is not selected).
    Unchanged,
    /// A rule blocked the mutation; the configuration is untouched.
    Rejected { reason: String },
}

impl MutationOutcome {
    fn rejected(decision: Decision) -> Self {
        MutationOutcome::Rejected {
            reason: decision
                .reason
                .unwrap_or_else(|| "Not allowed".to_string()),
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, MutationOutcome::Rejected { .. })
    }

    pub fn changed(&self) -> bool {
        matches!(
            self,
            MutationOutcome::Applied { .. } | MutationOutcome::QuantityChanged { .. }
        )
    }
}

/// A base system plus selected accessories in insertion order.
///
/// Invariant: every line item is an accessory the system accepts, with
/// quantity >= 1.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Configuration {
    system: Product,
    items: Vec<LineItem>,
}

impl Configuration {
    /// Start an empty configuration. Fails if `system` is an accessory.
    pub fn new(system: Product) -> Result<Self, ConfiguratorError> {
        if !system.is_system() {
            return Err(ConfiguratorError::NotASystem(system.id));
        }
        Ok(Self {
            system,
            items: Vec::new(),
        })
    }

    pub fn system(&self) -> &Product {
        &self.system
    }

    pub fn system_id(&self) -> &str {
        &self.system.id
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn state(&self) -> ConfigurationState {
        if self.items.is_empty() {
            ConfigurationState::Empty
        } else {
            ConfigurationState::Populated
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, accessory_id: &str) -> bool {
        self.items.iter().any(|item| item.product.id == accessory_id)
    }

    /// Selected quantity, 0 when absent.
    pub fn quantity_of(&self, accessory_id: &str) -> u32 {
        self.items
            .iter()
            .find(|item| item.product.id == accessory_id)
            .map_or(0, |item| item.quantity)
    }

    /// Total selected quantity across a group of accessory ids.
    pub fn total_of(&self, ids: &[String]) -> u32 {
        self.items
            .iter()
            .filter(|item| ids.contains(&item.product.id))
            .map(|item| item.quantity)
            .sum()
    }

    /// Sum of quantities over all line items.
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    pub(crate) fn insert(&mut self, product: Product, quantity: u32) {
        self.items.push(LineItem { product, quantity });
    }

    fn set_quantity(&mut self, accessory_id: &str, quantity: u32) {
        if let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.product.id == accessory_id)
        {
            item.quantity = quantity;
        }
    }

    fn remove_all(&mut self, ids: &[String]) {
        self.items.retain(|item| !ids.contains(&item.product.id));
    }

    // =========================================================================
    // State machine operations
    // =========================================================================

    /// Add one unit of an accessory.
    ///
    /// A selected accessory is incremented instead. A new accessory is inserted
    /// with quantity 1, followed by any auto-attached companions not yet present.
    pub fn add_accessory(
        &mut self,
        rules: &RuleEngine,
        catalog: &Catalog,
        accessory_id: &str,
    ) -> MutationOutcome {
        if self.contains(accessory_id) {
            return self.update_quantity(rules, accessory_id, 1);
        }

        let accessory = match catalog.get(accessory_id) {
            Some(product) if product.is_accessory() => product,
            _ => {
                return MutationOutcome::Rejected {
                    reason: format!("Unknown accessory: {}", accessory_id),
                }
            }
        };

        let decision = rules.can_add(self, accessory_id);
        if !decision.allowed {
            debug!(
                "Add of {} to {} rejected: {:?}",
                accessory_id,
                self.system.id,
                decision.reason()
            );
            return MutationOutcome::rejected(decision);
        }

        self.insert(accessory.clone(), 1);
        let mut added = vec![accessory_id.to_string()];

        for companion_id in rules.side_effects_on_add(self, accessory_id) {
            if self.contains(&companion_id) {
                continue;
            }
            if let Some(companion) = catalog.get(&companion_id) {
                self.insert(companion.clone(), 1);
                added.push(companion_id);
            }
        }

        info!("Added {:?} to {} configuration", added, self.system.id);
        MutationOutcome::Applied {
            added,
            removed: Vec::new(),
        }
    }

    /// Remove an accessory's line item and everything that depends on it.
    /// Removing an accessory that is not selected is a no-op.
    pub fn remove_accessory(&mut self, rules: &RuleEngine, accessory_id: &str) -> MutationOutcome {
        if !self.contains(accessory_id) {
            return MutationOutcome::Unchanged;
        }

        let mut removed = vec![accessory_id.to_string()];
        removed.extend(rules.side_effects_on_remove(self, accessory_id));
        self.remove_all(&removed);

        info!("Removed {:?} from {} configuration", removed, self.system.id);
        MutationOutcome::Applied {
            added: Vec::new(),
            removed,
        }
    }

    /// Step a selected accessory's quantity by `delta` (+1 or -1).
    ///
    /// The floor is 1 and the ceiling comes from the rule table; steps that
    /// would break either are rejected and leave the quantity unchanged.
    pub fn update_quantity(
        &mut self,
        rules: &RuleEngine,
        accessory_id: &str,
        delta: i32,
    ) -> MutationOutcome {
        let current = self.quantity_of(accessory_id);
        if current == 0 {
            return MutationOutcome::Unchanged;
        }

        let decision = match delta {
            1 => rules.can_increment(self, accessory_id),
            -1 => rules.can_decrement(self, accessory_id),
            0 => return MutationOutcome::Unchanged,
            _ => Decision::reject("Quantity changes one unit at a time"),
        };
        if !decision.allowed {
            debug!(
                "Quantity change {:+} of {} rejected: {:?}",
                delta,
                accessory_id,
                decision.reason()
            );
            return MutationOutcome::rejected(decision);
        }

        let quantity = if delta > 0 { current + 1 } else { current - 1 };
        self.set_quantity(accessory_id, quantity);
        MutationOutcome::QuantityChanged {
            accessory_id: accessory_id.to_string(),
            quantity,
        }
    }
}
