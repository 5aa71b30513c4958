use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::catalog::{InstallationTier, Product};
use crate::configuration::LineItem;

// =============================================================================
// CONFIGURATION (loaded from settings)
// =============================================================================

/// Fees and rates applied on top of the product prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingPolicy {
    pub basic_installation_fee: Decimal,
    pub advanced_installation_fee: Decimal,
    /// Service charge levy on the subtotal (0.025 = 2.5%)
    pub service_charge_rate: Decimal,
    /// Tax levied on subtotal plus service charge (0.18 = 18%)
    pub tax_rate: Decimal,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            basic_installation_fee: Decimal::new(4500, 0),
            advanced_installation_fee: Decimal::new(7500, 0),
            service_charge_rate: Decimal::new(25, 3),
            tax_rate: Decimal::new(18, 2),
        }
    }
}

impl PricingPolicy {
    /// Installation fee for a system's tier; systems without a tier pay none.
    pub fn installation_fee(&self, tier: Option<InstallationTier>) -> Decimal {
        match tier {
            Some(InstallationTier::Basic) => self.basic_installation_fee,
            Some(InstallationTier::Advanced) => self.advanced_installation_fee,
            None => Decimal::ZERO,
        }
    }
}

// =============================================================================
// OUTPUT
// =============================================================================

/// One accessory row of an estimate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstimateLine {
    pub product_id: String,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub line_total: Decimal,
}

/// Pricing breakdown for a configuration. Read-only; recompute to refresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Estimate {
    pub system_id: String,
    pub system_name: String,
    pub system_price: Decimal,
    pub lines: Vec<EstimateLine>,
    pub accessories_total: Decimal,
    pub installation_fee: Decimal,
    pub subtotal: Decimal,
    /// Rate `service_charge` was computed with
    pub service_charge_rate: Decimal,
    pub service_charge: Decimal,
    /// Rate `tax` was computed with
    pub tax_rate: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

/// Compute an estimate with the default fees and rates.
pub fn compute_estimate(system: &Product, items: &[LineItem]) -> Estimate {
    compute_estimate_with(&PricingPolicy::default(), system, items)
}

/// Compute an estimate.
///
/// The tax is levied on subtotal plus service charge, not on the subtotal
/// alone. Both levies are rounded to cents before being added to the total.
pub fn compute_estimate_with(
    policy: &PricingPolicy,
    system: &Product,
    items: &[LineItem],
) -> Estimate {
    let lines: Vec<EstimateLine> = items
        .iter()
        .map(|item| EstimateLine {
            product_id: item.product.id.clone(),
            name: item.product.name.clone(),
            unit_price: item.product.price_value,
            quantity: item.quantity,
            line_total: item.product.price_value * Decimal::from(item.quantity),
        })
        .collect();

    let accessories_total: Decimal = lines.iter().map(|line| line.line_total).sum();
    let installation_fee = policy.installation_fee(system.installation_tier);
    let subtotal = system.price_value + accessories_total + installation_fee;
    let service_charge = to_cents(subtotal * policy.service_charge_rate);
    let tax = to_cents((subtotal + service_charge) * policy.tax_rate);

    Estimate {
        system_id: system.id.clone(),
        system_name: system.name.clone(),
        system_price: system.price_value,
        lines,
        accessories_total,
        installation_fee,
        subtotal,
        service_charge_rate: policy.service_charge_rate,
        service_charge,
        tax_rate: policy.tax_rate,
        tax,
        total: subtotal + service_charge + tax,
    }
}

fn to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
