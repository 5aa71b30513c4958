//! Rule evaluation engine for accessory compatibility.
//!
//! The `RuleEngine` answers add/increment/decrement queries against a
//! configuration and computes the auto-attach and cascade-remove side effects.
//! It never mutates its inputs; the configuration state machine applies the
//! results.

use std::collections::HashMap;

use tracing::debug;

use crate::catalog::Catalog;
use crate::configuration::Configuration;
use crate::error::ConfiguratorError;

use super::types::*;

/// Label of the add control when adding is allowed.
pub const ADD_LABEL: &str = "Add to Configuration";

/// The rule evaluation engine.
///
/// Holds one rule set per base system. Systems without a rule set only
/// require accessories to be compatible; their quantities are unbounded.
pub struct RuleEngine {
    systems: HashMap<String, SystemRules>,
}

impl RuleEngine {
    /// Create a new rule engine with the given rule table.
    pub fn new(table: RuleTable) -> Self {
        let systems = table
            .systems
            .into_iter()
            .map(|rules| (rules.system.clone(), rules))
            .collect();
        Self { systems }
    }

    /// Rule set for a system, if one is defined.
    pub fn rules_for(&self, system_id: &str) -> Option<&SystemRules> {
        self.systems.get(system_id)
    }

    fn constraints<'a>(&'a self, configuration: &Configuration) -> &'a [Constraint] {
        self.rules_for(configuration.system_id())
            .map(|r| r.constraints.as_slice())
            .unwrap_or(&[])
    }

    /// Check that every rule refers to a catalog system and to accessories
    /// that system accepts.
    pub fn validate_against(&self, catalog: &Catalog) -> Result<(), ConfiguratorError> {
        for rules in self.systems.values() {
            let system = catalog.get(&rules.system).ok_or_else(|| {
                ConfiguratorError::Rules(format!("rules reference unknown system '{}'", rules.system))
            })?;
            if !system.is_system() {
                return Err(ConfiguratorError::Rules(format!(
                    "rules are keyed by '{}', which is not a system",
                    rules.system
                )));
            }

            let referenced = rules
                .constraints
                .iter()
                .flat_map(|c| c.referenced_ids())
                .chain(
                    rules
                        .requirements
                        .iter()
                        .flat_map(|r| r.members.iter().map(String::as_str)),
                );
            for id in referenced {
                if !system.accepts(id) {
                    return Err(ConfiguratorError::Rules(format!(
                        "rules for '{}' reference '{}', which the system does not accept",
                        rules.system, id
                    )));
                }
            }
        }
        Ok(())
    }

    /// Decide whether `accessory_id` may be added to the configuration.
    ///
    /// An accessory that is already selected is treated as an increment.
    pub fn can_add(&self, configuration: &Configuration, accessory_id: &str) -> Decision {
        let system = configuration.system();
        if !system.accepts(accessory_id) {
            return Decision::reject(format!("Not compatible with {}", system.name));
        }
        if configuration.contains(accessory_id) {
            return self.can_increment(configuration, accessory_id);
        }

        if let Some(rules) = self.rules_for(system.id.as_str()) {
            if rules.max_quantity == Some(0) {
                return Decision::reject(ceiling_reason(rules));
            }
        }

        for constraint in self.constraints(configuration) {
            match constraint {
                Constraint::ExclusiveGroup {
                    members, reason, ..
                } => {
                    let other_selected = members
                        .iter()
                        .any(|m| m != accessory_id && configuration.contains(m));
                    if is_member(members, accessory_id) && other_selected {
                        return Decision::reject(reason.as_str());
                    }
                }
                Constraint::CountCap {
                    members,
                    max,
                    reason,
                    ..
                } => {
                    if is_member(members, accessory_id)
                        && configuration.total_of(members) >= *max
                    {
                        return Decision::reject(reason.as_str());
                    }
                }
                Constraint::QuantityPin {
                    accessory,
                    max,
                    reason,
                } => {
                    if accessory == accessory_id && *max == 0 {
                        return Decision::reject(reason.as_str());
                    }
                }
                Constraint::Prerequisite {
                    accessory,
                    requires,
                    reason,
                } => {
                    if accessory == accessory_id && !configuration.contains(requires) {
                        return Decision::reject(reason.as_str());
                    }
                }
                Constraint::AutoAttach { .. } => {}
            }
        }

        Decision::allow()
    }

    /// Decide whether the quantity of a selected accessory may go up by one.
    pub fn can_increment(&self, configuration: &Configuration, accessory_id: &str) -> Decision {
        let quantity = configuration.quantity_of(accessory_id);
        if quantity == 0 {
            return Decision::reject("Not in configuration");
        }

        if let Some(rules) = self.rules_for(configuration.system_id()) {
            if let Some(max) = rules.max_quantity {
                if quantity >= max {
                    return Decision::reject(ceiling_reason(rules));
                }
            }
        }

        for constraint in self.constraints(configuration) {
            match constraint {
                Constraint::CountCap {
                    members,
                    max,
                    reason,
                    ..
                } => {
                    if is_member(members, accessory_id)
                        && configuration.total_of(members) >= *max
                    {
                        return Decision::reject(reason.as_str());
                    }
                }
                Constraint::QuantityPin {
                    accessory,
                    max,
                    reason,
                } => {
                    if accessory == accessory_id && quantity >= *max {
                        return Decision::reject(reason.as_str());
                    }
                }
                Constraint::ExclusiveGroup { .. }
                | Constraint::Prerequisite { .. }
                | Constraint::AutoAttach { .. } => {}
            }
        }

        if quantity == u32::MAX {
            return Decision::reject("Maximum quantity reached");
        }
        Decision::allow()
    }

    /// Decide whether the quantity of a selected accessory may go down by one.
    /// The floor is 1; removing the line item is a separate operation.
    pub fn can_decrement(&self, configuration: &Configuration, accessory_id: &str) -> Decision {
        match configuration.quantity_of(accessory_id) {
            0 => Decision::reject("Not in configuration"),
            1 => Decision::reject("Minimum quantity is 1"),
            _ => Decision::allow(),
        }
    }

    /// Effective quantity ceiling for an accessory on the configured system.
    pub fn max_quantity(&self, configuration: &Configuration, accessory_id: &str) -> Option<u32> {
        let mut ceiling = self
            .rules_for(configuration.system_id())
            .and_then(|r| r.max_quantity);
        for constraint in self.constraints(configuration) {
            let limit = match constraint {
                Constraint::QuantityPin { accessory, max, .. } if accessory == accessory_id => {
                    Some(*max)
                }
                Constraint::CountCap { members, max, .. } if is_member(members, accessory_id) => {
                    Some(*max)
                }
                _ => None,
            };
            if let Some(limit) = limit {
                ceiling = Some(ceiling.map_or(limit, |c| c.min(limit)));
            }
        }
        ceiling
    }

    /// Accessories to attach automatically once `accessory_id` is added.
    ///
    /// Companions already selected, or not accepted by the system, are skipped.
    pub fn side_effects_on_add(&self, configuration: &Configuration, accessory_id: &str) -> Vec<String> {
        let mut attached: Vec<String> = Vec::new();
        for constraint in self.constraints(configuration) {
            if let Constraint::AutoAttach {
                triggers,
                companion,
            } = constraint
            {
                if is_member(triggers, accessory_id)
                    && companion != accessory_id
                    && !configuration.contains(companion)
                    && configuration.system().accepts(companion)
                    && !attached.contains(companion)
                {
                    attached.push(companion.clone());
                }
            }
        }
        if !attached.is_empty() {
            debug!("Adding {} auto-attaches {:?}", accessory_id, attached);
        }
        attached
    }

    /// Accessories that must leave the configuration together with `accessory_id`.
    ///
    /// Follows prerequisites (dependents go with their prerequisite) and
    /// auto-attach pairs (triggers go with their companion; the companion goes
    /// once its last trigger is gone) until nothing else changes. The removed
    /// accessory itself is not part of the result.
    pub fn side_effects_on_remove(&self, configuration: &Configuration, accessory_id: &str) -> Vec<String> {
        if !configuration.contains(accessory_id) {
            return Vec::new();
        }
        let constraints = self.constraints(configuration);
        let mut removed: Vec<String> = vec![accessory_id.to_string()];

        loop {
            let mut next: Vec<String> = Vec::new();
            let mut cascade = |id: &String| {
                if is_kept(configuration, &removed, id) && !next.contains(id) {
                    next.push(id.clone());
                }
            };

            for constraint in constraints {
                match constraint {
                    Constraint::Prerequisite {
                        accessory,
                        requires,
                        ..
                    } => {
                        if removed.contains(requires) {
                            cascade(accessory);
                        }
                    }
                    Constraint::AutoAttach {
                        triggers,
                        companion,
                    } => {
                        if removed.contains(companion) {
                            for trigger in triggers {
                                cascade(trigger);
                            }
                        } else if triggers.iter().any(|t| removed.contains(t))
                            && !triggers.iter().any(|t| is_kept(configuration, &removed, t))
                        {
                            cascade(companion);
                        }
                    }
                    _ => {}
                }
            }

            if next.is_empty() {
                break;
            }
            removed.extend(next);
        }

        removed.remove(0);
        if !removed.is_empty() {
            debug!("Removing {} cascades to {:?}", accessory_id, removed);
        }
        removed
    }

    /// The first requirement with no selected member, if any.
    pub fn unmet_requirement(&self, configuration: &Configuration) -> Option<&Requirement> {
        self.rules_for(configuration.system_id())?
            .requirements
            .iter()
            .find(|r| !r.members.iter().any(|m| configuration.contains(m)))
    }

    /// Pre-submission gate: every requirement must have a selected member.
    pub fn check_requirements(&self, configuration: &Configuration) -> Result<(), ConfiguratorError> {
        match self.unmet_requirement(configuration) {
            Some(requirement) => Err(ConfiguratorError::MissingRequirement(
                requirement.message.clone(),
            )),
            None => Ok(()),
        }
    }

    /// Control state for every accessory the configured system accepts.
    pub fn controls(&self, catalog: &Catalog, configuration: &Configuration) -> Vec<AccessoryControl> {
        catalog
            .compatible_accessories(configuration.system_id())
            .into_iter()
            .map(|accessory| {
                let quantity = configuration.quantity_of(&accessory.id);
                let add = self.can_add(configuration, &accessory.id);
                let label = add.reason().unwrap_or(ADD_LABEL).to_string();
                AccessoryControl {
                    accessory_id: accessory.id.clone(),
                    name: accessory.name.clone(),
                    selected: quantity > 0,
                    quantity,
                    max_quantity: self.max_quantity(configuration, &accessory.id),
                    increment: self.can_increment(configuration, &accessory.id),
                    decrement: self.can_decrement(configuration, &accessory.id),
                    add,
                    label,
                }
            })
            .collect()
    }
}

fn is_member(members: &[String], id: &str) -> bool {
    members.iter().any(|m| m == id)
}

fn is_kept(configuration: &Configuration, removed: &[String], id: &str) -> bool {
    configuration.contains(id) && !is_member(removed, id)
}

fn ceiling_reason(rules: &SystemRules) -> String {
    match (&rules.max_quantity_reason, rules.max_quantity) {
        (Some(reason), _) => reason.clone(),
        (None, Some(max)) => format!("Max {} per accessory", max),
        (None, None) => "Maximum quantity reached".to_string(),
    }
}
