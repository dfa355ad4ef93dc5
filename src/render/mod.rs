//! Result rendering
//!
//! Maps a [`SimulationResult`] into a display-ready [`ResultSummary`]. Nothing is recomputed; the
//! summary only selects, labels and formats what the calculation service returned.

use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use smallvec::SmallVec;

use crate::{
    money::{format_amount, format_percent_points},
    simulation::{AppliedDiscount, DiscountKind, SimulationResult},
};

mod table;

pub use table::write_summary;

/// Banner shown when the service reported an empty discount list.
pub const NO_DISCOUNTS_APPLIED: &str = "No discounts were applied to this cart.";

/// Shipping line of a summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShippingLine {
    /// Shipping charged at this amount.
    Charged(String),

    /// Shipping waived; the original cost is shown struck through next to a "FREE" label.
    Free {
        /// Original shipping cost.
        original: String,
    },
}

/// Tax line of a summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxLine {
    /// Tax charged.
    pub amount: String,

    /// Rate in percent points, e.g. `8.5`.
    pub rate_points: String,
}

/// "You saved" line of a summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavingsLine {
    /// Total discount amount.
    pub amount: String,

    /// Savings in percent points, e.g. `15`.
    pub percentage_points: String,
}

/// Badge tone, following the discount's active flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTone {
    /// The discount applied.
    Success,

    /// The discount did not apply.
    Critical,
}

/// Status badge for an applied discount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    /// Discount kind with underscores replaced by spaces.
    pub label: String,

    /// Tone of the badge.
    pub tone: BadgeTone,
}

/// Display row for one applied discount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscountRow {
    /// Kind badge.
    pub badge: Badge,

    /// Human-readable description, e.g. `Buy 2 Get 1 Free`.
    pub description: String,

    /// Amount taken off, when above zero.
    pub applied_amount: Option<String>,

    /// Conditions (minimum amount, minimum quantity, priority) that are present.
    pub conditions: Option<String>,

    /// Buy-X-get-Y breakdown.
    pub bogo_detail: Option<String>,
}

/// The discount list part of a summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscountSection {
    /// The service didn't report a discount list.
    NotReported,

    /// The service reported an empty list; show [`NO_DISCOUNTS_APPLIED`] instead of rows.
    NoneApplied,

    /// One row per applied discount, in service order.
    Applied(Vec<DiscountRow>),
}

/// Display-ready breakdown of a simulation result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSummary {
    /// Value of the items before discounts.
    pub items_value: String,

    /// Product discount, when above zero.
    pub product_discount: Option<String>,

    /// Shipping line.
    pub shipping: ShippingLine,

    /// Subtotal.
    pub subtotal: String,

    /// Tax, when above zero.
    pub tax: Option<TaxLine>,

    /// Final total.
    pub final_total: String,

    /// Savings, when the total discount is above zero.
    pub savings: Option<SavingsLine>,

    /// Applied discounts.
    pub discounts: DiscountSection,
}

/// Build the display summary for a result.
pub fn summarize(result: &SimulationResult, currency: &'static Currency) -> ResultSummary {
    let money = |amount: Decimal| format_amount(amount, currency);
    let positive = |amount: Decimal| (amount > Decimal::ZERO).then(|| money(amount));

    let shipping = if result.free_shipping_applied {
        ShippingLine::Free {
            original: money(result.original_shipping_cost),
        }
    } else {
        ShippingLine::Charged(money(result.shipping_cost))
    };

    let tax = (result.tax_amount > Decimal::ZERO).then(|| TaxLine {
        amount: money(result.tax_amount),
        rate_points: format_percent_points(
            result
                .tax_rate
                .checked_mul(Decimal::ONE_HUNDRED)
                .unwrap_or(result.tax_rate),
        ),
    });

    let savings = (result.total_discount_amount > Decimal::ZERO).then(|| SavingsLine {
        amount: money(result.total_discount_amount),
        percentage_points: format_percent_points(result.savings_percentage),
    });

    let discounts = match result.applied_discounts.as_deref() {
        None => DiscountSection::NotReported,
        Some([]) => DiscountSection::NoneApplied,
        Some(applied) => DiscountSection::Applied(
            applied
                .iter()
                .map(|discount| discount_row(discount, currency))
                .collect(),
        ),
    };

    ResultSummary {
        items_value: money(result.original_price),
        product_discount: positive(result.product_discount_amount),
        shipping,
        subtotal: money(result.subtotal),
        tax,
        final_total: money(result.final_total),
        savings,
        discounts,
    }
}

/// Build the display row for one applied discount.
pub fn discount_row(discount: &AppliedDiscount, currency: &'static Currency) -> DiscountRow {
    DiscountRow {
        badge: Badge {
            label: discount.kind.label(),
            tone: if discount.is_active {
                BadgeTone::Success
            } else {
                BadgeTone::Critical
            },
        },
        description: describe(discount, currency),
        applied_amount: (discount.applied_amount > Decimal::ZERO)
            .then(|| format_amount(discount.applied_amount, currency)),
        conditions: conditions_line(discount, currency),
        bogo_detail: bogo_detail_line(discount),
    }
}

/// Describe a discount by kind.
///
/// Unknown kinds are described as `"{value} discount"`.
pub fn describe(discount: &AppliedDiscount, currency: &'static Currency) -> String {
    match &discount.kind {
        DiscountKind::Percentage => format!("{}% off", discount.value.normalize()),
        DiscountKind::FixedAmount => format!("{} off", format_amount(discount.value, currency)),
        DiscountKind::FreeShipping => "Free Shipping".to_string(),
        DiscountKind::BuyXGetY => {
            let (buy, get) = resolve_bogo_quantities(discount);
            let mut description = format!("Buy {buy} Get {get} Free");

            if let Some(free_items) = discount.free_items.filter(|count| *count > 0) {
                description.push_str(&format!(" ({free_items} free items)"));
            }

            description
        }
        DiscountKind::Other(_) => format!("{} discount", discount.value.normalize()),
    }
}

/// Resolve the buy and get quantities of a buy-X-get-Y discount.
///
/// Precedence, first present and non-zero wins:
/// - buy: `bogo_details.buy_quantity`, then the discount's `buy_quantity`, then its `value`.
/// - get: `bogo_details.get_quantity`, then the discount's `get_quantity`, then `1`.
pub fn resolve_bogo_quantities(discount: &AppliedDiscount) -> (Decimal, u32) {
    let details = discount.bogo_details.as_ref();
    let non_zero = |count: Option<u32>| count.filter(|count| *count > 0);

    let buy = non_zero(details.and_then(|details| details.buy_quantity))
        .or_else(|| non_zero(discount.buy_quantity))
        .map_or_else(|| discount.value.normalize(), Decimal::from);

    let get = non_zero(details.and_then(|details| details.get_quantity))
        .or_else(|| non_zero(discount.get_quantity))
        .unwrap_or(1);

    (buy, get)
}

/// Conditions line built from whichever of minimum amount, minimum quantity and priority are
/// present.
pub fn conditions_line(discount: &AppliedDiscount, currency: &'static Currency) -> Option<String> {
    let mut parts: SmallVec<[String; 3]> = SmallVec::new();

    if let Some(minimum) = discount.minimum_amount {
        parts.push(format!("Min. amount {}", format_amount(minimum, currency)));
    }

    if let Some(minimum) = discount.minimum_quantity {
        parts.push(format!("Min. quantity {minimum}"));
    }

    if let Some(priority) = discount.priority {
        parts.push(format!("Priority {priority}"));
    }

    (!parts.is_empty()).then(|| parts.join(" · "))
}

/// Buy-X-get-Y breakdown line. Only buy-X-get-Y discounts with details have one.
pub fn bogo_detail_line(discount: &AppliedDiscount) -> Option<String> {
    if discount.kind != DiscountKind::BuyXGetY {
        return None;
    }

    let details = discount.bogo_details.as_ref()?;
    let (buy, get) = resolve_bogo_quantities(discount);

    let mut parts: SmallVec<[String; 4]> = SmallVec::new();

    parts.push(format!("Buy {buy}, get {get}"));

    if let Some(sets) = details.complete_sets {
        parts.push(format!("{sets} complete sets"));
    }

    if let Some(extra) = details.extra_free_items {
        parts.push(format!("{extra} extra free items"));
    }

    if details.limit_applied {
        parts.push("limit applied".to_string());
    }

    Some(parts.join(" · "))
}
