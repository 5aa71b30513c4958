//! Product records as stored in the catalog file and sent to the host UI.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Whether a product can be configured on its own or only added to a system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductKind {
    System,
    Accessory,
}

/// Installation effort class of a base system, which selects the installation fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallationTier {
    Basic,
    Advanced,
}

/// Channel count of a device. Accessories without video inputs use a label such as "N/A".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Channels {
    Count(u32),
    Label(String),
}

impl Default for Channels {
    fn default() -> Self {
        Channels::Label("N/A".to_string())
    }
}

impl Channels {
    /// True when the device records more than one channel (listing pages only show those).
    ///
    /// Free-text labels count unless they are empty or the "N/A" placeholder
    /// that accessories default to, so accessories never get a channel badge.
    pub fn is_multi_channel(&self) -> bool {
        match self {
            Channels::Count(n) => *n > 1,
            Channels::Label(label) => !label.is_empty() && label != "N/A",
        }
    }
}

/// A purchasable item: either a base system or an accessory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier (e.g., "x3n-ai-premium")
    pub id: String,
    /// Display name
    pub name: String,
    /// Listing category (e.g., "Mobile DVR Systems")
    pub category: String,
    pub kind: ProductKind,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub channels: Channels,
    #[serde(default)]
    pub resolution: String,
    #[serde(default)]
    pub storage: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub specifications: BTreeMap<String, String>,
    /// Price as shown on listing pages (e.g., "Rs. 145,000.00")
    pub price: String,
    /// Exact unit price used for estimates
    pub price_value: Decimal,
    /// Accessory ids this system accepts. Empty for accessories.
    #[serde(default)]
    pub compatible_with: Vec<String>,
    /// Installation tier. Only set on systems; `None` means no installation fee.
    #[serde(default)]
    pub installation_tier: Option<InstallationTier>,
}

impl Product {
    pub fn is_system(&self) -> bool {
        self.kind == ProductKind::System
    }

    pub fn is_accessory(&self) -> bool {
        self.kind == ProductKind::Accessory
    }

    /// Check whether `accessory_id` appears in this system's compatibility list.
    pub fn accepts(&self, accessory_id: &str) -> bool {
        self.compatible_with.iter().any(|id| id == accessory_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channels_deserialize_number_or_label() {
        let count: Channels = serde_json::from_str("8").unwrap();
        assert_eq!(count, Channels::Count(8));

        let label: Channels = serde_json::from_str(r#""N/A""#).unwrap();
        assert_eq!(label, Channels::Label("N/A".to_string()));
    }

    #[test]
    fn test_multi_channel() {
        assert!(Channels::Count(6).is_multi_channel());
        assert!(!Channels::Count(1).is_multi_channel());
        assert!(!Channels::default().is_multi_channel());
        assert!(Channels::Label("4 AHD + 4 IPC".to_string()).is_multi_channel());
        assert!(!Channels::Label("N/A".to_string()).is_multi_channel());
        assert!(!Channels::Label(String::new()).is_multi_channel());
    }

    #[test]
    fn test_installation_tier_deserialize() {
        let tier: InstallationTier = serde_json::from_str(r#""advanced""#).unwrap();
        assert_eq!(tier, InstallationTier::Advanced);
    }

    #[test]
    fn test_product_deserialize_with_defaults() {
        let json = r#"{
            "id": "cp4-display-kit",
            "name": "CP4 Display Kit",
            "category": "Cameras & Accessories",
            "kind": "accessory",
            "price": "Rs. 19,500.00",
            "price_value": "19500.00"
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert!(product.is_accessory());
        assert!(product.compatible_with.is_empty());
        assert!(product.installation_tier.is_none());
        assert_eq!(product.channels, Channels::default());
        assert_eq!(product.price_value, Decimal::new(19500, 0));
    }
}
