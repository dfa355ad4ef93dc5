//! Simulation Form
//!
//! Raw, as-typed field values for a discount test run, and their validation into a
//! [`SimulationRequest`].

use std::{fmt, str::FromStr};

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::{Deserialize, Deserializer, Serialize};

use crate::simulation::{
    errors::{FieldErrors, InvalidInput},
    request::SimulationRequest,
};

/// Fields of the simulation form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    /// Cart total (required).
    CartTotal,

    /// Item quantity.
    Quantity,

    /// Comma separated product IDs.
    ProductIds,

    /// Comma separated collection IDs.
    CollectionIds,

    /// Customer segment.
    CustomerSegment,

    /// Shipping cost.
    ShippingCost,

    /// Tax rate, as a percentage.
    TaxRate,
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FormField::CartTotal => "cart total",
            FormField::Quantity => "quantity",
            FormField::ProductIds => "product IDs",
            FormField::CollectionIds => "collection IDs",
            FormField::CustomerSegment => "customer segment",
            FormField::ShippingCost => "shipping cost",
            FormField::TaxRate => "tax rate",
        })
    }
}

/// Transient form state for a test run. Every field holds exactly what was typed.
///
/// Deserialising accepts bare numbers as well as strings, so fixture files can write
/// `cart_total: 100`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationForm {
    /// Cart total in major units.
    #[serde(deserialize_with = "raw_text")]
    pub cart_total: String,

    /// Number of items in the cart.
    #[serde(deserialize_with = "raw_text")]
    pub quantity: String,

    /// Comma separated product IDs.
    #[serde(deserialize_with = "raw_text")]
    pub product_ids: String,

    /// Comma separated collection IDs.
    #[serde(deserialize_with = "raw_text")]
    pub collection_ids: String,

    /// Customer segment, free text.
    #[serde(deserialize_with = "raw_text")]
    pub customer_segment: String,

    /// Shipping cost in major units.
    #[serde(deserialize_with = "raw_text")]
    pub shipping_cost: String,

    /// Tax rate as a percentage, e.g. `8.5`.
    #[serde(deserialize_with = "raw_text")]
    pub tax_rate: String,
}

/// Deserialise a form field from a string or a bare number.
fn raw_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Integer(i64),
        Number(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Integer(value) => value.to_string(),
        Raw::Number(value) => value.to_string(),
    })
}

impl SimulationForm {
    /// Current raw value of a field.
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::CartTotal => &self.cart_total,
            FormField::Quantity => &self.quantity,
            FormField::ProductIds => &self.product_ids,
            FormField::CollectionIds => &self.collection_ids,
            FormField::CustomerSegment => &self.customer_segment,
            FormField::ShippingCost => &self.shipping_cost,
            FormField::TaxRate => &self.tax_rate,
        }
    }

    /// Replace the raw value of a field.
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let slot = match field {
            FormField::CartTotal => &mut self.cart_total,
            FormField::Quantity => &mut self.quantity,
            FormField::ProductIds => &mut self.product_ids,
            FormField::CollectionIds => &mut self.collection_ids,
            FormField::CustomerSegment => &mut self.customer_segment,
            FormField::ShippingCost => &mut self.shipping_cost,
            FormField::TaxRate => &mut self.tax_rate,
        };

        *slot = value.into();
    }

    /// Validate the form and build a normalised request.
    ///
    /// Quantities beyond `u32::MAX` saturate.
    ///
    /// # Errors
    ///
    /// Returns every [`InvalidInput`] found:
    /// - [`InvalidInput::CartTotal`] if the cart total is blank, not a number, or not above zero.
    /// - [`InvalidInput::NegativeQuantity`] if the quantity parses to a negative number.
    pub fn validate(&self) -> Result<SimulationRequest, FieldErrors> {
        let mut errors = FieldErrors::default();

        let cart_total = parse_decimal(&self.cart_total).filter(|total| *total > Decimal::ZERO);

        if cart_total.is_none() {
            errors.push(InvalidInput::CartTotal);
        }

        let quantity = parse_decimal(&self.quantity);

        if quantity.is_some_and(|quantity| quantity.is_sign_negative() && !quantity.is_zero()) {
            errors.push(InvalidInput::NegativeQuantity);
        }

        let Some(cart_total) = cart_total else {
            return Err(errors);
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(SimulationRequest {
            cart_total,
            quantity: quantity.map_or(1, |q| q.trunc().to_u32().unwrap_or(u32::MAX)),
            product_ids: split_ids(&self.product_ids),
            collection_ids: split_ids(&self.collection_ids),
            customer_segment: Some(self.customer_segment.trim())
                .filter(|segment| !segment.is_empty())
                .map(ToString::to_string),
            shipping_cost: parse_decimal(&self.shipping_cost).unwrap_or(Decimal::ZERO),
            tax_rate: parse_decimal(&self.tax_rate)
                .map_or(Percentage::from(Decimal::ZERO), |points| {
                    Percentage::from(points / Decimal::ONE_HUNDRED)
                }),
        })
    }
}

/// Parse a decimal field, treating blank or malformed input as absent.
fn parse_decimal(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();

    if raw.is_empty() {
        return None;
    }

    Decimal::from_str(raw)
        .or_else(|_err| Decimal::from_scientific(raw))
        .ok()
}

/// Split a comma separated ID field, trimming tokens and dropping empty ones.
fn split_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(ToString::to_string)
        .collect()
}
