//! Totals command - whole-cart VAT breakdown

use crate::cart::validate_cart;
use crate::cmd::read_cart;
use crate::vat::{compute_cart_totals, CartTotals, PricingPolicy, RateClass};
use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct TotalsCommand {
    /// Cart file (CSV or JSON). Reads from stdin if not specified.
    #[arg(default_value = "-")]
    cart: PathBuf,

    /// Delivery fee in pounds (overrides any value in a JSON cart)
    #[arg(short, long)]
    delivery_fee: Option<Decimal>,

    /// Override the standard VAT rate (fraction, e.g. 0.20)
    #[arg(long)]
    standard_rate: Option<Decimal>,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

/// Totals data for JSON output
#[derive(Debug, Serialize)]
struct TotalsData {
    line_count: usize,
    standard_rated_count: usize,
    zero_rated_count: usize,
    subtotal: String,
    standard_rated_subtotal: String,
    zero_rated_subtotal: String,
    delivery: String,
    standard_rate_pct: String,
    vat_on_items: String,
    vat_on_delivery: String,
    total_vat: String,
    grand_total: String,
}

impl TotalsCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let policy = match self.standard_rate {
            Some(rate) => PricingPolicy::with_standard_rate(rate),
            None => PricingPolicy::uk(),
        };

        let (items, file_delivery) = read_cart(&self.cart)?;
        let delivery_fee = self
            .delivery_fee
            .or(file_delivery)
            .unwrap_or(Decimal::ZERO);

        // Pricing is permissive; surface data problems without refusing
        for issue in validate_cart(&items, delivery_fee) {
            log::warn!("{}", issue);
        }

        let totals = compute_cart_totals(&policy, &items, delivery_fee);
        let standard_rated_count = items
            .iter()
            .filter(|i| policy.classify(&i.tags) == RateClass::StandardRated)
            .count();
        let zero_rated_count = items.len() - standard_rated_count;

        if self.json {
            self.print_json(&policy, &totals, items.len(), standard_rated_count, zero_rated_count)
        } else {
            self.print_totals(&policy, &totals, items.len(), standard_rated_count, zero_rated_count);
            Ok(())
        }
    }

    fn print_totals(
        &self,
        policy: &PricingPolicy,
        totals: &CartTotals,
        line_count: usize,
        standard_rated_count: usize,
        zero_rated_count: usize,
    ) {
        println!();
        println!("CART TOTALS");
        println!();

        println!("ITEMS");
        println!(
            "  Lines: {} ({} standard-rated, {} zero-rated)",
            line_count, standard_rated_count, zero_rated_count
        );
        println!(
            "  Subtotal: {} (standard {} | zero-rated {})",
            format_gbp_signed(totals.subtotal),
            format_gbp_signed(totals.standard_rated_subtotal),
            format_gbp_signed(totals.zero_rated_subtotal)
        );
        println!("  Delivery: {}", format_gbp(totals.delivery));
        println!();

        println!("VAT @ {:.0}%", policy.standard_rate() * dec!(100));
        println!(
            "  On items: {}",
            format_gbp_signed(totals.vat_on_standard_items)
        );
        println!("  On delivery: {}", format_gbp(totals.vat_on_delivery));
        println!("  Total VAT: {}", format_gbp_signed(totals.total_vat));
        println!();

        println!("GRAND TOTAL: {}", format_gbp_signed(totals.grand_total));
        println!();
    }

    fn print_json(
        &self,
        policy: &PricingPolicy,
        totals: &CartTotals,
        line_count: usize,
        standard_rated_count: usize,
        zero_rated_count: usize,
    ) -> anyhow::Result<()> {
        let data = TotalsData {
            line_count,
            standard_rated_count,
            zero_rated_count,
            subtotal: format!("{:.2}", totals.subtotal),
            standard_rated_subtotal: format!("{:.2}", totals.standard_rated_subtotal),
            zero_rated_subtotal: format!("{:.2}", totals.zero_rated_subtotal),
            delivery: format!("{:.2}", totals.delivery),
            standard_rate_pct: format!("{:.0}", policy.standard_rate() * dec!(100)),
            vat_on_items: format!("{:.2}", totals.vat_on_standard_items),
            vat_on_delivery: format!("{:.2}", totals.vat_on_delivery),
            total_vat: format!("{:.2}", totals.total_vat),
            grand_total: format!("{:.2}", totals.grand_total),
        };

        println!("{}", serde_json::to_string_pretty(&data)?);
        Ok(())
    }
}

fn format_gbp(amount: Decimal) -> String {
    format!("£{:.2}", amount)
}

fn format_gbp_signed(amount: Decimal) -> String {
    if amount < Decimal::ZERO {
        format!("-£{:.2}", amount.abs())
    } else {
        format!("£{:.2}", amount)
    }
}
