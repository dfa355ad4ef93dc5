//! Simulation Result
//!
//! The computed outcome of a test run as returned by the discount calculation service. This crate
//! only reads it; no field is validated beyond presence.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Kinds of discount the calculation service reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DiscountKind {
    /// Percentage off, e.g. 15% off.
    Percentage,

    /// Fixed amount off, e.g. $10 off.
    FixedAmount,

    /// Shipping cost waived.
    FreeShipping,

    /// Buy X get Y free.
    BuyXGetY,

    /// A kind this crate doesn't know about, kept verbatim.
    Other(String),
}

impl DiscountKind {
    /// Wire name of the kind, e.g. `buy_x_get_y`.
    pub fn as_str(&self) -> &str {
        match self {
            DiscountKind::Percentage => "percentage",
            DiscountKind::FixedAmount => "fixed_amount",
            DiscountKind::FreeShipping => "free_shipping",
            DiscountKind::BuyXGetY => "buy_x_get_y",
            DiscountKind::Other(kind) => kind,
        }
    }

    /// Human label for badges: the wire name with underscores replaced by spaces.
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl From<String> for DiscountKind {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "percentage" => DiscountKind::Percentage,
            "fixed_amount" => DiscountKind::FixedAmount,
            "free_shipping" => DiscountKind::FreeShipping,
            "buy_x_get_y" => DiscountKind::BuyXGetY,
            _ => DiscountKind::Other(kind),
        }
    }
}

impl From<&str> for DiscountKind {
    fn from(kind: &str) -> Self {
        Self::from(kind.to_string())
    }
}

impl From<DiscountKind> for String {
    fn from(kind: DiscountKind) -> Self {
        match kind {
            DiscountKind::Other(kind) => kind,
            known => known.as_str().to_string(),
        }
    }
}

impl Default for DiscountKind {
    fn default() -> Self {
        DiscountKind::Other(String::new())
    }
}

impl fmt::Display for DiscountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deserialise a field, reading `null` as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Buy-X-get-Y breakdown for a single applied discount.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BogoDetails {
    /// Units that must be bought per set.
    pub buy_quantity: Option<u32>,

    /// Units given free per set.
    pub get_quantity: Option<u32>,

    /// Number of complete buy/get sets in the cart.
    pub complete_sets: Option<u32>,

    /// Free units granted beyond the complete sets.
    pub extra_free_items: Option<u32>,

    /// Whether a usage limit capped the free units.
    #[serde(deserialize_with = "null_as_default")]
    pub limit_applied: bool,
}

/// One discount from the stack as evaluated against the simulated cart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppliedDiscount {
    /// Discount kind.
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: DiscountKind,

    /// Configured value: percent points, amount, or buy quantity depending on kind.
    #[serde(deserialize_with = "null_as_default")]
    pub value: Decimal,

    /// Amount this discount took off the cart.
    #[serde(deserialize_with = "null_as_default")]
    pub applied_amount: Decimal,

    /// Whether the discount actually applied.
    #[serde(deserialize_with = "null_as_default")]
    pub is_active: bool,

    /// Minimum cart amount condition.
    pub minimum_amount: Option<Decimal>,

    /// Minimum item quantity condition.
    pub minimum_quantity: Option<u32>,

    /// Evaluation priority within the stack.
    pub priority: Option<i32>,

    /// Buy quantity configured on the discount itself.
    pub buy_quantity: Option<u32>,

    /// Get quantity configured on the discount itself.
    pub get_quantity: Option<u32>,

    /// Free units granted, for buy-X-get-Y discounts.
    pub free_items: Option<u32>,

    /// Buy-X-get-Y breakdown.
    pub bogo_details: Option<BogoDetails>,
}

/// The computed outcome of a test run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimulationResult {
    /// Value of the items before discounts.
    #[serde(deserialize_with = "null_as_default")]
    pub original_price: Decimal,

    /// Discount taken off products.
    #[serde(deserialize_with = "null_as_default")]
    pub product_discount_amount: Decimal,

    /// Discount taken off the order as a whole.
    #[serde(deserialize_with = "null_as_default")]
    pub order_discount_amount: Decimal,

    /// Discount taken off shipping.
    #[serde(deserialize_with = "null_as_default")]
    pub shipping_discount_amount: Decimal,

    /// Shipping charged after discounts.
    #[serde(deserialize_with = "null_as_default")]
    pub shipping_cost: Decimal,

    /// Shipping before discounts.
    #[serde(deserialize_with = "null_as_default")]
    pub original_shipping_cost: Decimal,

    /// Whether shipping was waived.
    #[serde(deserialize_with = "null_as_default")]
    pub free_shipping_applied: bool,

    /// Total before tax.
    #[serde(deserialize_with = "null_as_default")]
    pub subtotal: Decimal,

    /// Tax charged.
    #[serde(deserialize_with = "null_as_default")]
    pub tax_amount: Decimal,

    /// Tax rate applied, as a fraction.
    #[serde(deserialize_with = "null_as_default")]
    pub tax_rate: Decimal,

    /// Total payable.
    #[serde(deserialize_with = "null_as_default")]
    pub final_total: Decimal,

    /// Sum of every discount.
    #[serde(deserialize_with = "null_as_default")]
    pub total_discount_amount: Decimal,

    /// Savings as percent points of the original price.
    #[serde(deserialize_with = "null_as_default")]
    pub savings_percentage: Decimal,

    /// Discounts in evaluation order. Absent when the service didn't report them.
    pub applied_discounts: Option<Vec<AppliedDiscount>>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn deserializes_camel_case_result() -> TestResult {
        let result: SimulationResult = serde_json::from_value(json!({
            "originalPrice": 100,
            "productDiscountAmount": 15.5,
            "shippingCost": 0,
            "originalShippingCost": 10,
            "freeShippingApplied": true,
            "subtotal": 84.5,
            "taxAmount": 0,
            "finalTotal": 84.5,
            "totalDiscountAmount": 25.5,
            "savingsPercentage": "25.5",
            "appliedDiscounts": [
                {
                    "type": "buy_x_get_y",
                    "value": 2,
                    "appliedAmount": 15.5,
                    "isActive": true,
                    "freeItems": 3,
                    "bogoDetails": { "buyQuantity": 2, "getQuantity": 1, "limitApplied": true }
                }
            ]
        }))?;

        assert_eq!(result.original_price, Decimal::from(100));
        assert_eq!(result.product_discount_amount, Decimal::new(155, 1));
        assert!(result.free_shipping_applied);
        assert_eq!(result.savings_percentage, Decimal::new(255, 1));

        let discounts = result.applied_discounts.unwrap_or_default();
        let bogo = discounts.first().cloned().unwrap_or_default();

        assert_eq!(bogo.kind, DiscountKind::BuyXGetY);
        assert_eq!(bogo.free_items, Some(3));
        assert_eq!(
            bogo.bogo_details,
            Some(BogoDetails {
                buy_quantity: Some(2),
                get_quantity: Some(1),
                complete_sets: None,
                extra_free_items: None,
                limit_applied: true,
            })
        );

        Ok(())
    }

    #[test]
    fn missing_applied_discounts_differs_from_empty() -> TestResult {
        let absent: SimulationResult = serde_json::from_value(json!({ "finalTotal": 10 }))?;
        let empty: SimulationResult = serde_json::from_value(json!({ "appliedDiscounts": [] }))?;

        assert_eq!(absent.applied_discounts, None);
        assert_eq!(empty.applied_discounts, Some(Vec::new()));

        Ok(())
    }

    #[test]
    fn null_fields_read_as_defaults() -> TestResult {
        let result: SimulationResult = serde_json::from_value(json!({
            "originalPrice": 50,
            "taxAmount": null,
            "freeShippingApplied": null,
            "finalTotal": 50,
            "appliedDiscounts": [
                {
                    "type": "free_shipping",
                    "value": null,
                    "appliedAmount": 10,
                    "isActive": null,
                    "bogoDetails": { "limitApplied": null }
                }
            ]
        }))?;

        assert_eq!(result.tax_amount, Decimal::ZERO);
        assert!(!result.free_shipping_applied);

        let discount = result
            .applied_discounts
            .and_then(|discounts| discounts.into_iter().next())
            .unwrap_or_default();

        assert_eq!(discount.kind, DiscountKind::FreeShipping);
        assert_eq!(discount.value, Decimal::ZERO);
        assert_eq!(discount.applied_amount, Decimal::from(10));
        assert!(!discount.is_active);
        assert_eq!(discount.bogo_details, Some(BogoDetails::default()));

        Ok(())
    }

    #[test]
    fn unknown_kinds_are_kept_verbatim() -> TestResult {
        let discount: AppliedDiscount =
            serde_json::from_value(json!({ "type": "tiered_spend", "value": 5 }))?;

        assert_eq!(discount.kind, DiscountKind::Other("tiered_spend".to_string()));
        assert_eq!(discount.kind.label(), "tiered spend");
        assert_eq!(serde_json::to_value(&discount.kind)?, json!("tiered_spend"));

        Ok(())
    }

    #[test]
    fn known_kinds_round_trip_their_wire_names() {
        for name in ["percentage", "fixed_amount", "free_shipping", "buy_x_get_y"] {
            let kind = DiscountKind::from(name);

            assert!(!matches!(kind, DiscountKind::Other(_)), "{name} parsed as Other");
            assert_eq!(String::from(kind), name);
        }
    }

    #[test]
    fn label_replaces_underscores() {
        assert_eq!(DiscountKind::BuyXGetY.label(), "buy x get y");
        assert_eq!(DiscountKind::FixedAmount.label(), "fixed amount");
    }
}
