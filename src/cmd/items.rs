//! Items command - per-line VAT view with filtering

use crate::cart::LineItem;
use crate::cmd::read_cart;
use crate::vat::{price_item, PricingPolicy, RateClass};
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::io;
use std::path::PathBuf;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct ItemsCommand {
    /// Cart file (CSV or JSON). Reads from stdin if not specified.
    #[arg(default_value = "-")]
    cart: PathBuf,

    /// Filter by rate class
    #[arg(short, long, value_enum)]
    rate: Option<RateFilter>,

    /// Filter by tag substring (case-insensitive)
    #[arg(short, long)]
    tag: Option<String>,

    /// Override the standard VAT rate (fraction, e.g. 0.20)
    #[arg(long)]
    standard_rate: Option<Decimal>,

    /// Output as CSV instead of formatted table
    #[arg(long)]
    csv: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RateFilter {
    Standard,
    Zero,
}

impl RateFilter {
    fn matches(&self, class: RateClass) -> bool {
        matches!(
            (self, class),
            (RateFilter::Standard, RateClass::StandardRated)
                | (RateFilter::Zero, RateClass::ZeroRated)
        )
    }
}

/// Row for the items table output
#[derive(Debug, Clone, Tabled, serde::Serialize)]
pub struct ItemRow {
    #[tabled(rename = "#")]
    #[serde(rename = "row_num")]
    pub row_num: String,

    #[tabled(rename = "Name")]
    pub name: String,

    #[tabled(rename = "Qty")]
    pub quantity: String,

    #[tabled(rename = "Unit Price")]
    pub unit_price: String,

    #[tabled(rename = "Net")]
    pub net: String,

    #[tabled(rename = "Rate")]
    pub rate: String,

    #[tabled(rename = "VAT")]
    pub vat: String,

    #[tabled(rename = "Gross")]
    pub gross: String,

    #[tabled(rename = "Tags")]
    pub tags: String,
}

impl ItemsCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let policy = match self.standard_rate {
            Some(rate) => PricingPolicy::with_standard_rate(rate),
            None => PricingPolicy::uk(),
        };

        let (items, _) = read_cart(&self.cart)?;
        let rows = build_item_rows(&policy, &items, self.rate, self.tag.as_deref());

        if self.csv {
            self.write_csv(&rows)
        } else {
            self.print_table(&rows);
            Ok(())
        }
    }

    fn print_table(&self, rows: &[ItemRow]) {
        if rows.is_empty() {
            println!("No items found matching filters");
            return;
        }

        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
    }

    fn write_csv(&self, rows: &[ItemRow]) -> anyhow::Result<()> {
        let mut wtr = csv::Writer::from_writer(io::stdout());
        for row in rows {
            wtr.serialize(row)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

/// Build item rows, pricing each line total under the policy
fn build_item_rows(
    policy: &PricingPolicy,
    items: &[LineItem],
    rate_filter: Option<RateFilter>,
    tag_filter: Option<&str>,
) -> Vec<ItemRow> {
    let tag_filter = tag_filter.map(|t| t.to_lowercase());
    let mut rows = Vec::new();
    let mut row_num = 1usize;

    for item in items {
        let price = price_item(policy, item.line_total(), &item.tags);

        if rate_filter.is_some_and(|f| !f.matches(price.rate_class)) {
            continue;
        }
        if let Some(ref needle) = tag_filter {
            if !item
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(needle.as_str()))
            {
                continue;
            }
        }

        rows.push(ItemRow {
            row_num: format!("#{}", row_num),
            name: item.name.clone(),
            quantity: item.quantity.to_string(),
            unit_price: format_gbp_signed(item.unit_price),
            net: format_gbp_signed(price.net_price),
            rate: format_rate(price.rate_class, price.vat_rate),
            vat: format_gbp_signed(price.vat_amount),
            gross: format_gbp_signed(price.gross_price),
            tags: item.tags.join(", "),
        });
        row_num += 1;
    }

    rows
}

fn format_rate(class: RateClass, rate: Decimal) -> String {
    match class {
        RateClass::StandardRated => format!("{:.0}%", rate * dec!(100)),
        RateClass::ZeroRated => "zero".to_string(),
    }
}

fn format_gbp_signed(amount: Decimal) -> String {
    if amount < Decimal::ZERO {
        format!("-£{:.2}", amount.abs())
    } else {
        format!("£{:.2}", amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(name: &str, unit_price: Decimal, quantity: u32, tags: &[&str]) -> LineItem {
        LineItem {
            name: name.to_string(),
            unit_price,
            quantity,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn rows_price_line_totals() {
        let policy = PricingPolicy::uk();
        let items = vec![item("Polo", dec!(8.00), 2, &[])];

        let rows = build_item_rows(&policy, &items, None, None);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].unit_price, "£8.00");
        assert_eq!(rows[0].net, "£16.00");
        assert_eq!(rows[0].rate, "20%");
        assert_eq!(rows[0].vat, "£3.20");
        assert_eq!(rows[0].gross, "£19.20");
    }

    #[test]
    fn zero_rated_rows_show_zero() {
        let policy = PricingPolicy::uk();
        let items = vec![item("Kids Polo", dec!(5.00), 1, &["kids"])];

        let rows = build_item_rows(&policy, &items, None, None);
        assert_eq!(rows[0].rate, "zero");
        assert_eq!(rows[0].vat, "£0.00");
        assert_eq!(rows[0].gross, "£5.00");
    }

    #[test]
    fn rate_filter_selects_class() {
        let policy = PricingPolicy::uk();
        let items = vec![
            item("Polo", dec!(8.00), 1, &[]),
            item("Kids Polo", dec!(5.00), 1, &["kids"]),
        ];

        let standard = build_item_rows(&policy, &items, Some(RateFilter::Standard), None);
        assert_eq!(standard.len(), 1);
        assert_eq!(standard[0].name, "Polo");

        let zero = build_item_rows(&policy, &items, Some(RateFilter::Zero), None);
        assert_eq!(zero.len(), 1);
        assert_eq!(zero[0].name, "Kids Polo");
    }

    #[test]
    fn tag_filter_is_case_insensitive_substring() {
        let policy = PricingPolicy::uk();
        let items = vec![
            item("Jacket", dec!(30.00), 1, &["Hi-Vis", "safety"]),
            item("Polo", dec!(8.00), 1, &["workwear"]),
        ];

        let rows = build_item_rows(&policy, &items, None, Some("hi-vis"));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Jacket");
    }

    #[test]
    fn row_numbers_follow_filtered_rows() {
        let policy = PricingPolicy::uk();
        let items = vec![
            item("Kids Polo", dec!(5.00), 1, &["kids"]),
            item("Polo", dec!(8.00), 1, &[]),
        ];

        let rows = build_item_rows(&policy, &items, Some(RateFilter::Standard), None);
        assert_eq!(rows[0].row_num, "#1");
        assert_eq!(rows[0].name, "Polo");
    }
}
