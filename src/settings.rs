//! User-editable settings, read from `<config_dir>/dvr-configurator/settings.toml`.
//!
//! Every field has a default, so a missing file or a partial file is fine.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::{default_catalog, load_catalog, Catalog};
use crate::estimate::PricingPolicy;
use crate::rules::{default_rules, load_rules, RuleEngine};

const APP_DIR: &str = "dvr-configurator";
const SETTINGS_FILE: &str = "settings.toml";

/// Contact form submission endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactSettings {
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for ContactSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://formspree.io/f/xwpbkayg".to_string(),
            timeout_secs: 15,
        }
    }
}

/// Quote numbering and presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimateSettings {
    pub number_prefix: String,
    pub validity_days: u64,
    pub currency_label: String,
}

impl Default for EstimateSettings {
    fn default() -> Self {
        Self {
            number_prefix: "EST-MobileDVR".to_string(),
            validity_days: 30,
            currency_label: "Rs.".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Replaces the embedded catalog when set
    pub catalog_path: Option<PathBuf>,
    /// Replaces the embedded compatibility rules when set
    pub rules_path: Option<PathBuf>,
    pub contact: ContactSettings,
    pub pricing: PricingPolicy,
    pub estimate: EstimateSettings,
}

impl Settings {
    /// Default settings file location, if the platform has a config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(SETTINGS_FILE))
    }

    /// Load settings from the default location, falling back to defaults.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => {
                debug!("No settings file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load settings from a TOML file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {:?}", path))?;
        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings file: {:?}", path))?;
        info!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// The catalog, from the override file if one is configured.
    pub fn catalog(&self) -> Result<Catalog> {
        match &self.catalog_path {
            Some(path) => load_catalog(path),
            None => Ok(default_catalog()),
        }
    }

    /// The rule engine, from the override file if one is configured,
    /// checked against `catalog`.
    pub fn rule_engine(&self, catalog: &Catalog) -> Result<RuleEngine> {
        let table = match &self.rules_path {
            Some(path) => load_rules(path)?,
            None => default_rules(),
        };
        let engine = RuleEngine::new(table);
        engine.validate_against(catalog)?;
        Ok(engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::io::Write;
    use std::str::FromStr;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.contact.timeout_secs, 15);
        assert_eq!(settings.estimate.validity_days, 30);
        assert_eq!(settings.estimate.number_prefix, "EST-MobileDVR");
        assert_eq!(settings.pricing, PricingPolicy::default());
        assert!(settings.catalog_path.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[contact]
endpoint = "http://127.0.0.1:9000/submit"

[pricing]
tax_rate = "0.15"
"#
        )
        .unwrap();

        let settings = Settings::load_from(file.path()).unwrap();
        assert_eq!(settings.contact.endpoint, "http://127.0.0.1:9000/submit");
        assert_eq!(settings.contact.timeout_secs, 15);
        assert_eq!(settings.pricing.tax_rate, Decimal::from_str("0.15").unwrap());
        assert_eq!(
            settings.pricing.basic_installation_fee,
            Decimal::from_str("4500").unwrap()
        );
        assert_eq!(settings.estimate.currency_label, "Rs.");
    }

    #[test]
    fn test_invalid_file_is_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "contact = 12").unwrap();
        assert!(Settings::load_from(file.path()).is_err());
    }

    #[test]
    fn test_embedded_data_is_consistent() {
        let settings = Settings::default();
        let catalog = settings.catalog().unwrap();
        let engine = settings.rule_engine(&catalog);
        assert!(engine.is_ok(), "embedded rules must validate: {:?}", engine.err());
    }

    #[test]
    fn test_rules_override_checked_against_catalog() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[[systems]]
system = "no-such-system"
"#
        )
        .unwrap();

        let settings = Settings {
            rules_path: Some(file.path().to_path_buf()),
            ..Settings::default()
        };
        let catalog = settings.catalog().unwrap();
        assert!(settings.rule_engine(&catalog).is_err());
    }
}
