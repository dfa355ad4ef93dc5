//! Terminal rendering of result summaries.

use std::io;

use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};

use super::{BadgeTone, DiscountSection, NO_DISCOUNTS_APPLIED, ResultSummary, ShippingLine};

const STRIKE_ON: &str = "\u{1b}[9m";
const STRIKE_OFF: &str = "\u{1b}[29m";

/// Write a summary as two terminal tables: totals, then applied discounts.
///
/// # Errors
///
/// Returns an [`io::Error`] if writing to `out` fails.
pub fn write_summary(mut out: impl io::Write, summary: &ResultSummary) -> io::Result<()> {
    writeln!(out, "{}", totals_table(summary))?;

    match &summary.discounts {
        DiscountSection::NotReported => Ok(()),
        DiscountSection::NoneApplied => writeln!(out, "\nℹ {NO_DISCOUNTS_APPLIED}"),
        DiscountSection::Applied(_) => writeln!(out, "\n{}", discounts_table(summary)),
    }
}

fn totals_table(summary: &ResultSummary) -> String {
    let mut builder = Builder::default();
    let mut savings_row = None;
    let mut rows = 0;

    builder.push_record(["Items", summary.items_value.as_str()]);
    rows += 1;

    if let Some(discount) = &summary.product_discount {
        builder.push_record(["Product discount".to_string(), format!("-{discount}")]);
        rows += 1;
    }

    let shipping = match &summary.shipping {
        ShippingLine::Charged(cost) => cost.clone(),
        ShippingLine::Free { original } => format!("{STRIKE_ON}{original}{STRIKE_OFF} FREE"),
    };

    builder.push_record(["Shipping".to_string(), shipping]);
    builder.push_record(["Subtotal", summary.subtotal.as_str()]);
    rows += 2;

    if let Some(tax) = &summary.tax {
        builder.push_record([format!("Tax ({}%)", tax.rate_points), tax.amount.clone()]);
        rows += 1;
    }

    builder.push_record(["Total", summary.final_total.as_str()]);
    rows += 1;

    if let Some(savings) = &summary.savings {
        savings_row = Some(rows);

        builder.push_record([
            "You saved".to_string(),
            format!("{} ({}%)", savings.amount, savings.percentage_points),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::rounded());
    table.modify(Columns::new(1..2), Alignment::right());

    if let Some(row) = savings_row {
        table.modify(Rows::new(row..=row), Color::FG_GREEN);
    }

    table.to_string()
}

fn discounts_table(summary: &ResultSummary) -> String {
    let DiscountSection::Applied(rows) = &summary.discounts else {
        return String::new();
    };

    let mut builder = Builder::default();
    let mut tones = Vec::with_capacity(rows.len());

    builder.push_record(["Discount", "Description", "Applied", "Details"]);

    for row in rows {
        let details = [row.conditions.as_deref(), row.bogo_detail.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join("\n");

        tones.push(row.badge.tone);

        builder.push_record([
            row.badge.label.clone(),
            row.description.clone(),
            row.applied_amount
                .as_ref()
                .map_or_else(String::new, |amount| format!("-{amount}")),
            details,
        ]);
    }

    let mut table = builder.build();

    table.with(Style::rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(2..3), Alignment::right());

    for (i, tone) in tones.into_iter().enumerate() {
        let color = match tone {
            BadgeTone::Success => Color::FG_GREEN,
            BadgeTone::Critical => Color::FG_RED,
        };

        table.modify((i + 1, 0), color);
    }

    table.to_string()
}
