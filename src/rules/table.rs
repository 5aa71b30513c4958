//! TOML rule loading for the compatibility engine.
//!
//! Provides two loading methods:
//! - `default_rules()` - Loads embedded rules compiled into the binary
//! - `load_rules(path)` - Loads custom rules from a file path

use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Result};

use super::types::RuleTable;

/// Default rules embedded in the binary at compile time.
/// These are loaded from `config/compatibility_rules.toml`.
const DEFAULT_RULES: &str = include_str!("../../config/compatibility_rules.toml");

/// Parse rule TOML, rejecting tables that define the same system twice.
pub fn parse_rules(content: &str) -> Result<RuleTable> {
    let table: RuleTable = toml::from_str(content)?;
    let mut seen = HashSet::new();
    for rules in &table.systems {
        if !seen.insert(rules.system.as_str()) {
            bail!("rules for system '{}' are defined more than once", rules.system);
        }
    }
    Ok(table)
}

/// Load rules from a TOML file at the given path.
///
/// # Arguments
/// * `path` - Path to the TOML file containing rules
///
/// # Returns
/// * `Ok(RuleTable)` - Parsed rule table
/// * `Err` - If file cannot be read or TOML is invalid
pub fn load_rules(path: &Path) -> Result<RuleTable> {
    let content = std::fs::read_to_string(path)?;
    parse_rules(&content)
}

/// Get the default rules embedded in the binary.
///
/// These rules cover the five catalog systems:
/// - C6D AI Dashcam
/// - C6 Lite-S
/// - AD-PLUS 2.0
/// - F6N Mobile DVR
/// - X3N AI Mobile DVR System
///
/// # Panics
/// Panics if the embedded TOML is invalid (this would be a compile-time bug).
pub fn default_rules() -> RuleTable {
    parse_rules(DEFAULT_RULES).expect("embedded compatibility_rules.toml must be valid TOML")
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::rules::types::Constraint;

    fn system<'a>(table: &'a RuleTable, id: &str) -> &'a crate::rules::SystemRules {
        table
            .systems
            .iter()
            .find(|s| s.system == id)
            .unwrap_or_else(|| panic!("no rules for {}", id))
    }

    #[test]
    fn test_default_rules_cover_five_systems() {
        let rules = default_rules();
        assert_eq!(rules.systems.len(), 5, "Should have exactly 5 rule sets");
    }

    #[test]
    fn test_microsd_cap_is_two() {
        let rules = default_rules();
        for id in [
            "c6d-ai-basic",
            "fs-c6-lite-standard",
            "ad-plus-advanced",
            "f6n-mobile-dvr",
        ] {
            let cap = system(&rules, id).constraints.iter().find_map(|c| match c {
                Constraint::CountCap { name, max, .. } if name == "microsd" => Some(*max),
                _ => None,
            });
            assert_eq!(cap, Some(2), "{} should cap MicroSD cards at 2", id);
        }
    }

    #[test]
    fn test_x3n_camera_families_capped_at_four() {
        let rules = default_rules();
        let caps: Vec<_> = system(&rules, "x3n-ai-premium")
            .constraints
            .iter()
            .filter_map(|c| match c {
                Constraint::CountCap { name, max, .. } => Some((name.as_str(), *max)),
                _ => None,
            })
            .collect();
        assert_eq!(caps, vec![("ipc-cameras", 4), ("ahd-cameras", 4)]);
    }

    #[test]
    fn test_exclusive_groups_have_two_members() {
        let rules = default_rules();
        let groups: Vec<_> = rules
            .systems
            .iter()
            .flat_map(|s| s.constraints.iter())
            .filter_map(|c| match c {
                Constraint::ExclusiveGroup { members, .. } => Some(members.len()),
                _ => None,
            })
            .collect();
        assert_eq!(groups, vec![2, 2]);
    }

    #[test]
    fn test_adas_prerequisite() {
        let rules = default_rules();
        let prerequisite = system(&rules, "x3n-ai-premium")
            .constraints
            .iter()
            .find(|c| matches!(c, Constraint::Prerequisite { .. }));
        assert_eq!(
            prerequisite,
            Some(&Constraint::Prerequisite {
                accessory: "ca20s-adas-camera".to_string(),
                requires: "dsm-camera-kit".to_string(),
                reason: "Requires DSM Camera Kit".to_string(),
            })
        );
    }

    #[test]
    fn test_c6d_has_system_ceiling() {
        let rules = default_rules();
        assert_eq!(system(&rules, "c6d-ai-basic").max_quantity, Some(2));
        assert_eq!(system(&rules, "x3n-ai-premium").max_quantity, None);
    }

    #[test]
    fn test_requirements_present() {
        let rules = default_rules();
        for s in &rules.systems {
            assert_eq!(
                s.requirements.len(),
                1,
                "{} should have one storage requirement",
                s.system
            );
        }
    }

    #[test]
    fn test_duplicate_system_rejected() {
        let src = r#"
[[systems]]
system = "a"

[[systems]]
system = "a"
"#;
        assert!(parse_rules(src).is_err());
    }

    #[test]
    fn test_load_rules_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[[systems]]
system = "mini-dvr"

[[systems.constraints]]
kind = "exclusive_group"
name = "drives"
members = ["a", "b"]
reason = "One drive"
"#
        )
        .unwrap();

        let rules = load_rules(file.path()).unwrap();
        assert_eq!(rules.systems.len(), 1);
        assert_eq!(rules.systems[0].constraints.len(), 1);
    }
}
