use std::collections::HashSet;

use tracing::debug;

use crate::error::ConfiguratorError;

use super::types::Product;

/// Pseudo-category that matches every product in listing filters.
pub const ALL_CATEGORIES: &str = "All";

/// Immutable, validated list of products in display order.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids and dangling compatibility entries.
    pub fn new(products: Vec<Product>) -> Result<Self, ConfiguratorError> {
        let mut seen = HashSet::new();
        for product in &products {
            if !seen.insert(product.id.as_str()) {
                return Err(ConfiguratorError::Catalog(format!(
                    "duplicate product id '{}'",
                    product.id
                )));
            }
        }

        for product in &products {
            if product.is_accessory() {
                if !product.compatible_with.is_empty() {
                    return Err(ConfiguratorError::Catalog(format!(
                        "accessory '{}' must not declare compatible_with",
                        product.id
                    )));
                }
                if product.installation_tier.is_some() {
                    return Err(ConfiguratorError::Catalog(format!(
                        "accessory '{}' must not declare an installation tier",
                        product.id
                    )));
                }
                continue;
            }

            for accessory_id in &product.compatible_with {
                match products.iter().find(|p| &p.id == accessory_id) {
                    Some(p) if p.is_accessory() => {}
                    Some(_) => {
                        return Err(ConfiguratorError::Catalog(format!(
                            "system '{}' lists '{}', which is not an accessory",
                            product.id, accessory_id
                        )))
                    }
                    None => {
                        return Err(ConfiguratorError::Catalog(format!(
                            "system '{}' lists unknown accessory '{}'",
                            product.id, accessory_id
                        )))
                    }
                }
            }
        }

        debug!("Catalog validated with {} products", products.len());
        Ok(Self { products })
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn systems(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| p.is_system())
    }

    pub fn accessories(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| p.is_accessory())
    }

    /// Category filter options: "All" followed by each distinct category in catalog order.
    pub fn categories(&self) -> Vec<&str> {
        let mut categories = vec![ALL_CATEGORIES];
        for product in &self.products {
            if !categories.contains(&product.category.as_str()) {
                categories.push(&product.category);
            }
        }
        categories
    }

    /// Products in `category`, or every product for "All".
    pub fn by_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Product> + 'a {
        self.products
            .iter()
            .filter(move |p| category == ALL_CATEGORIES || p.category == category)
    }

    /// Accessories the given system accepts, in catalog order.
    /// Returns an empty list for unknown ids and for accessories.
    pub fn compatible_accessories(&self, system_id: &str) -> Vec<&Product> {
        match self.get(system_id) {
            Some(system) if system.is_system() => self
                .products
                .iter()
                .filter(|p| system.accepts(&p.id))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Only base systems open the configurator; accessories are listed for reference.
    pub fn is_configurable(&self, id: &str) -> bool {
        self.get(id).is_some_and(|p| p.is_system())
    }
}
