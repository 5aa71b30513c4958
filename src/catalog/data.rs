//! Catalog loading.
//!
//! Provides two loading methods:
//! - `default_catalog()` - Loads the catalog compiled into the binary
//! - `load_catalog(path)` - Loads a replacement catalog from a file path

use std::path::Path;

use anyhow::Result;
use serde::Deserialize;

use super::index::Catalog;
use super::types::Product;

/// Default catalog embedded in the binary at compile time.
const DEFAULT_CATALOG: &str = include_str!("../../config/catalog.toml");

#[derive(Debug, Deserialize)]
struct CatalogFile {
    products: Vec<Product>,
}

/// Parse and validate catalog TOML.
pub fn parse_catalog(content: &str) -> Result<Catalog> {
    let file: CatalogFile = toml::from_str(content)?;
    Ok(Catalog::new(file.products)?)
}

/// Load a catalog from a TOML file at the given path.
///
/// # Returns
/// * `Ok(Catalog)` - Parsed and validated catalog
/// * `Err` - If the file cannot be read, the TOML is invalid, or validation fails
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let content = std::fs::read_to_string(path)?;
    parse_catalog(&content)
}

/// Get the default catalog embedded in the binary.
///
/// # Panics
/// Panics if the embedded TOML is invalid (this would be a compile-time bug).
pub fn default_catalog() -> Catalog {
    parse_catalog(DEFAULT_CATALOG).expect("embedded catalog.toml must be a valid catalog")
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rust_decimal::Decimal;

    use super::*;
    use crate::catalog::InstallationTier;

    #[test]
    fn test_default_catalog_loads() {
        let catalog = default_catalog();
        assert_eq!(catalog.systems().count(), 5, "Should have five base systems");
        assert!(catalog.accessories().count() >= 16);
    }

    #[test]
    fn test_default_tiers() {
        let catalog = default_catalog();
        for id in ["c6d-ai-basic", "fs-c6-lite-standard", "ad-plus-advanced"] {
            assert_eq!(
                catalog.get(id).unwrap().installation_tier,
                Some(InstallationTier::Basic),
                "{} should be basic tier",
                id
            );
        }
        for id in ["f6n-mobile-dvr", "x3n-ai-premium"] {
            assert_eq!(
                catalog.get(id).unwrap().installation_tier,
                Some(InstallationTier::Advanced),
                "{} should be advanced tier",
                id
            );
        }
    }

    #[test]
    fn test_prices_are_exact_decimals() {
        let catalog = default_catalog();
        let card = catalog.get("kingston-128gb-microsd").unwrap();
        assert_eq!(card.price_value, Decimal::new(3500, 0));
        for product in catalog.products() {
            assert!(
                product.price_value >= Decimal::ZERO,
                "{} has a negative price",
                product.id
            );
        }
    }

    #[test]
    fn test_x3n_accepts_dsm_kit() {
        let catalog = default_catalog();
        let ids: Vec<_> = catalog
            .compatible_accessories("x3n-ai-premium")
            .into_iter()
            .map(|p| p.id.as_str())
            .collect();
        assert!(ids.contains(&"dsm-camera-kit"));
        assert!(ids.contains(&"ca20s-adas-camera"));
        assert!(!ids.contains(&"kingston-128gb-microsd"));
    }

    #[test]
    fn test_load_catalog_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[[products]]
id = "mini-dvr"
name = "Mini DVR"
category = "Mobile DVR Systems"
kind = "system"
price = "Rs. 10,000.00"
price_value = "10000.00"
installation_tier = "basic"
compatible_with = ["cable"]

[[products]]
id = "cable"
name = "Cable"
category = "Cameras & Accessories"
kind = "accessory"
price = "Rs. 100.00"
price_value = "100.00"
"#
        )
        .unwrap();

        let catalog = load_catalog(file.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.is_configurable("mini-dvr"));
    }

    #[test]
    fn test_load_catalog_missing_file() {
        assert!(load_catalog(Path::new("/nonexistent/catalog.toml")).is_err());
    }
}
