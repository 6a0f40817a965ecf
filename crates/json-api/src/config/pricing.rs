//! Pricing Config

use clap::Args;
use storefront_core::pricing::PricingPolicy;

/// Tax, shipping and stock alert settings. Amounts are in minor units.
#[derive(Debug, Args)]
pub struct PricingConfig {
    /// Tax rate in basis points (1000 = 10%)
    #[arg(long, env = "TAX_RATE_BPS", default_value_t = 1_000_u32)]
    pub tax_rate_bps: u32,

    /// Subtotals strictly above this amount ship for free
    #[arg(long, env = "FREE_SHIPPING_THRESHOLD", default_value_t = 500_000_u64)]
    pub free_shipping_threshold: u64,

    /// Flat shipping fee charged at or below the threshold
    #[arg(long, env = "FLAT_SHIPPING_FEE", default_value_t = 30_000_u64)]
    pub flat_shipping_fee: u64,

    /// Products at or below this stock level are reported as low stock
    #[arg(long, env = "LOW_STOCK_THRESHOLD", default_value_t = 5_u32)]
    pub low_stock_threshold: u32,
}

impl PricingConfig {
    #[must_use]
    pub fn policy(&self) -> PricingPolicy {
        PricingPolicy {
            tax_rate_bps: self.tax_rate_bps,
            free_shipping_threshold: self.free_shipping_threshold,
            flat_shipping_fee: self.flat_shipping_fee,
        }
    }
}
