//! Simulation Request

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

/// A validated, normalised test run sent to the discount calculation service.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRequest {
    /// Cart total in major units, always above zero.
    pub cart_total: Decimal,

    /// Number of items in the cart.
    pub quantity: u32,

    /// Product IDs in the cart.
    pub product_ids: Vec<String>,

    /// Collection IDs the cart items belong to.
    pub collection_ids: Vec<String>,

    /// Customer segment, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_segment: Option<String>,

    /// Shipping cost in major units.
    pub shipping_cost: Decimal,

    /// Tax rate as a fraction, e.g. `0.085` for 8.5%.
    #[serde(serialize_with = "serialize_fraction")]
    pub tax_rate: Percentage,
}

fn serialize_fraction<S>(percentage: &Percentage, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    // decimal_percentage doesn't expose the underlying Decimal; Decimal's inherent `serialize`
    // shadows the serde method
    Serialize::serialize(&(*percentage * Decimal::ONE), serializer)
}
