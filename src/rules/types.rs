//! Type definitions for the accessory compatibility rule table.
//!
//! These types support both TOML deserialization (for loading rules)
//! and JSON serialization (for the host UI).

use serde::{Deserialize, Serialize};

// =============================================================================
// CONFIGURATION TYPES (loaded from TOML)
// =============================================================================

/// Root configuration loaded from compatibility_rules.toml.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuleTable {
    /// Rule sets keyed by base system id (at most one per system)
    #[serde(default)]
    pub systems: Vec<SystemRules>,
}

/// All constraints that apply while configuring one base system.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SystemRules {
    /// Base system id these rules apply to
    pub system: String,
    /// Per-accessory quantity ceiling for this system (None = unbounded)
    #[serde(default)]
    pub max_quantity: Option<u32>,
    /// Label shown when `max_quantity` blocks an increment
    #[serde(default)]
    pub max_quantity_reason: Option<String>,
    /// Constraints, evaluated in order; the first failure supplies the reason
    #[serde(default)]
    pub constraints: Vec<Constraint>,
    /// Selections required before an estimate may be requested
    #[serde(default)]
    pub requirements: Vec<Requirement>,
}

fn default_pin() -> u32 {
    1
}

/// A single typed constraint over the accessories of one system.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Constraint {
    /// At most one member of the group may be selected.
    ExclusiveGroup {
        name: String,
        members: Vec<String>,
        reason: String,
    },
    /// Total quantity across the group may not exceed `max`.
    CountCap {
        name: String,
        members: Vec<String>,
        max: u32,
        reason: String,
    },
    /// Quantity of a single accessory may not exceed `max` (usually 1).
    QuantityPin {
        accessory: String,
        #[serde(default = "default_pin")]
        max: u32,
        reason: String,
    },
    /// `accessory` may only be added while `requires` is selected.
    Prerequisite {
        accessory: String,
        requires: String,
        reason: String,
    },
    /// Selecting any trigger brings the companion along.
    AutoAttach {
        triggers: Vec<String>,
        companion: String,
    },
}

impl Constraint {
    /// Every accessory id this constraint mentions.
    pub fn referenced_ids(&self) -> Vec<&str> {
        match self {
            Constraint::ExclusiveGroup { members, .. } | Constraint::CountCap { members, .. } => {
                members.iter().map(String::as_str).collect()
            }
            Constraint::QuantityPin { accessory, .. } => vec![accessory.as_str()],
            Constraint::Prerequisite {
                accessory, requires, ..
            } => vec![accessory.as_str(), requires.as_str()],
            Constraint::AutoAttach {
                triggers,
                companion,
            } => triggers
                .iter()
                .map(String::as_str)
                .chain(std::iter::once(companion.as_str()))
                .collect(),
        }
    }
}

/// At least one member must be selected before requesting an estimate.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Requirement {
    pub name: String,
    pub members: Vec<String>,
    /// Blocking message shown to the visitor
    pub message: String,
}

// =============================================================================
// OUTPUT TYPES (serialized to the host UI)
// =============================================================================

/// Answer to "may this mutation happen?", with a visitor-facing reason when not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Decision {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    pub fn reject(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
        }
    }

    pub fn is_allowed(&self) -> bool {
        self.allowed
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }
}

/// Per-accessory control state for the configurator view.
#[derive(Debug, Clone, Serialize)]
pub struct AccessoryControl {
    pub accessory_id: String,
    pub name: String,
    pub selected: bool,
    pub quantity: u32,
    /// Effective quantity ceiling (None = unbounded)
    pub max_quantity: Option<u32>,
    pub add: Decision,
    pub increment: Decision,
    pub decrement: Decision,
    /// Button label: the add rejection reason, or "Add to Configuration"
    pub label: String,
}
