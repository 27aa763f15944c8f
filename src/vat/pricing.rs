use crate::cart::LineItem;
use crate::vat::policy::{PricingPolicy, RateClass};
use rust_decimal::Decimal;
use serde::Serialize;

/// Pricing breakdown for a single amount
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemPrice {
    pub net_price: Decimal,
    pub rate_class: RateClass,
    pub vat_rate: Decimal,
    pub vat_amount: Decimal,
    pub gross_price: Decimal,
}

/// Price a net amount from its catalog tags.
///
/// Pure arithmetic: the gross price is exactly net + VAT, and the VAT
/// amount is zero whenever the line is zero-rated. Input constraints
/// (non-negative price) are the caller's responsibility; negative amounts
/// propagate rather than raise.
pub fn price_item(policy: &PricingPolicy, unit_price: Decimal, tags: &[String]) -> ItemPrice {
    let rate_class = policy.classify(tags);
    let vat_rate = policy.rate(rate_class);
    let vat_amount = unit_price * vat_rate;
    ItemPrice {
        net_price: unit_price,
        rate_class,
        vat_rate,
        vat_amount,
        gross_price: unit_price + vat_amount,
    }
}

/// Totals breakdown for a whole cart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartTotals {
    pub subtotal: Decimal,
    pub delivery: Decimal,
    pub standard_rated_subtotal: Decimal,
    pub zero_rated_subtotal: Decimal,
    pub vat_on_standard_items: Decimal,
    pub vat_on_delivery: Decimal,
    pub total_vat: Decimal,
    pub grand_total: Decimal,
}

/// Compute VAT-aware totals for a cart.
///
/// Line totals are partitioned by rate class; VAT is charged on the
/// standard-rated portion and on delivery. Delivery is never zero-rated,
/// even when every item in the cart is. The fold is commutative, so item
/// order does not affect any field of the result, and no rounding happens
/// here: `standard_rated_subtotal + zero_rated_subtotal == subtotal` and
/// `grand_total == subtotal + delivery + total_vat` hold exactly.
pub fn compute_cart_totals(
    policy: &PricingPolicy,
    items: &[LineItem],
    delivery_fee: Decimal,
) -> CartTotals {
    let mut standard_rated_subtotal = Decimal::ZERO;
    let mut zero_rated_subtotal = Decimal::ZERO;

    for item in items {
        let line_total = item.line_total();
        let rate_class = policy.classify(&item.tags);
        match rate_class {
            RateClass::StandardRated => standard_rated_subtotal += line_total,
            RateClass::ZeroRated => zero_rated_subtotal += line_total,
        }
        log::debug!(
            "{}: line_total={} class={}",
            item.name,
            line_total,
            rate_class
        );
    }

    let subtotal = standard_rated_subtotal + zero_rated_subtotal;
    let vat_on_standard_items = standard_rated_subtotal * policy.standard_rate();
    let vat_on_delivery = delivery_fee * policy.standard_rate();
    let total_vat = vat_on_standard_items + vat_on_delivery;
    let grand_total = subtotal + delivery_fee + total_vat;

    CartTotals {
        subtotal,
        delivery: delivery_fee,
        standard_rated_subtotal,
        zero_rated_subtotal,
        vat_on_standard_items,
        vat_on_delivery,
        total_vat,
        grand_total,
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
    fn standard_item_gets_20_percent() {
        let policy = PricingPolicy::uk();
        let price = price_item(&policy, dec!(10.00), &[]);

        assert_eq!(price.rate_class, RateClass::StandardRated);
        assert_eq!(price.vat_rate, dec!(0.20));
        assert_eq!(price.net_price, dec!(10.00));
        assert_eq!(price.vat_amount, dec!(2.0000));
        assert_eq!(price.gross_price, dec!(12.0000));
    }

    #[test]
    fn zero_rated_item_has_no_vat() {
        let policy = PricingPolicy::uk();
        let tags = vec!["Kids".to_string()];
        let price = price_item(&policy, dec!(5.00), &tags);

        assert_eq!(price.rate_class, RateClass::ZeroRated);
        assert_eq!(price.vat_rate, dec!(0));
        assert_eq!(price.vat_amount, dec!(0));
        assert_eq!(price.gross_price, price.net_price);
    }

    #[test]
    fn gross_is_exactly_net_plus_vat() {
        let policy = PricingPolicy::uk();
        let price = price_item(&policy, dec!(7.37), &[]);
        assert_eq!(price.gross_price, price.net_price + price.vat_amount);
    }

    #[test]
    fn empty_cart_with_delivery() {
        let policy = PricingPolicy::uk();
        let totals = compute_cart_totals(&policy, &[], dec!(10));

        assert_eq!(totals.subtotal, dec!(0));
        assert_eq!(totals.vat_on_standard_items, dec!(0));
        assert_eq!(totals.vat_on_delivery, dec!(2.00));
        assert_eq!(totals.total_vat, dec!(2.00));
        assert_eq!(totals.grand_total, dec!(12.00));
    }

    #[test]
    fn mixed_cart() {
        // Worked example: two standard lines at 10.00 plus one zero-rated
        // line at 5.00, no delivery
        let policy = PricingPolicy::uk();
        let items = vec![
            item("Work Trousers", dec!(10), 2, &[]),
            item("Kids Polo", dec!(5), 1, &["kids"]),
        ];
        let totals = compute_cart_totals(&policy, &items, dec!(0));

        assert_eq!(totals.subtotal, dec!(25));
        assert_eq!(totals.standard_rated_subtotal, dec!(20));
        assert_eq!(totals.zero_rated_subtotal, dec!(5));
        assert_eq!(totals.vat_on_standard_items, dec!(4.00));
        assert_eq!(totals.vat_on_delivery, dec!(0));
        assert_eq!(totals.total_vat, dec!(4.00));
        assert_eq!(totals.grand_total, dec!(29.00));
    }

    #[test]
    fn delivery_is_never_zero_rated() {
        // Even an all-children cart pays VAT on delivery
        let policy = PricingPolicy::uk();
        let items = vec![
            item("Children Hoodie", dec!(12.50), 1, &["children"]),
            item("Kids Cap", dec!(6.00), 2, &["kids no vat"]),
        ];
        let totals = compute_cart_totals(&policy, &items, dec!(10));

        assert_eq!(totals.standard_rated_subtotal, dec!(0));
        assert_eq!(totals.zero_rated_subtotal, dec!(24.50));
        assert_eq!(totals.vat_on_standard_items, dec!(0));
        assert_eq!(totals.vat_on_delivery, dec!(2.00));
        assert_eq!(totals.total_vat, dec!(2.00));
        assert_eq!(totals.grand_total, dec!(36.50));
    }

    #[test]
    fn subtotal_partition_is_exact() {
        let policy = PricingPolicy::uk();
        let items = vec![
            item("A", dec!(3.33), 3, &[]),
            item("B", dec!(7.77), 1, &["kids"]),
            item("C", dec!(0.01), 7, &[]),
        ];
        let totals = compute_cart_totals(&policy, &items, dec!(1.99));

        assert_eq!(
            totals.standard_rated_subtotal + totals.zero_rated_subtotal,
            totals.subtotal
        );
        assert_eq!(
            totals.grand_total,
            totals.subtotal + totals.delivery + totals.total_vat
        );
    }

    #[test]
    fn totals_are_order_independent() {
        let policy = PricingPolicy::uk();
        let items = vec![
            item("A", dec!(10), 2, &[]),
            item("B", dec!(5), 1, &["kids"]),
            item("C", dec!(2.50), 4, &["workwear"]),
        ];
        let reversed: Vec<_> = items.iter().rev().cloned().collect();

        let forward = compute_cart_totals(&policy, &items, dec!(4.95));
        let backward = compute_cart_totals(&policy, &reversed, dec!(4.95));
        assert_eq!(forward, backward);
    }

    #[test]
    fn totals_are_idempotent() {
        let policy = PricingPolicy::uk();
        let items = vec![item("A", dec!(19.99), 3, &["safety"])];

        let first = compute_cart_totals(&policy, &items, dec!(4.95));
        let second = compute_cart_totals(&policy, &items, dec!(4.95));
        assert_eq!(first, second);
    }

    #[test]
    fn zero_quantity_line_contributes_nothing() {
        let policy = PricingPolicy::uk();
        let items = vec![
            item("Ghost Line", dec!(99.99), 0, &[]),
            item("Polo", dec!(8), 1, &[]),
        ];
        let totals = compute_cart_totals(&policy, &items, dec!(0));

        assert_eq!(totals.subtotal, dec!(8));
        assert_eq!(totals.grand_total, dec!(9.60));
    }

    #[test]
    fn negative_price_propagates() {
        // Permissive by design: a refund-style line reduces the totals
        // rather than raising an error
        let policy = PricingPolicy::uk();
        let items = vec![
            item("Jacket", dec!(30), 1, &[]),
            item("Refund", dec!(-10), 1, &[]),
        ];
        let totals = compute_cart_totals(&policy, &items, dec!(0));

        assert_eq!(totals.subtotal, dec!(20));
        assert_eq!(totals.total_vat, dec!(4.00));
        assert_eq!(totals.grand_total, dec!(24.00));
    }

    #[test]
    fn custom_standard_rate_applies_to_items_and_delivery() {
        let policy = PricingPolicy::with_standard_rate(dec!(0.10));
        let items = vec![item("Polo", dec!(10), 1, &[])];
        let totals = compute_cart_totals(&policy, &items, dec!(10));

        assert_eq!(totals.vat_on_standard_items, dec!(1.00));
        assert_eq!(totals.vat_on_delivery, dec!(1.00));
        assert_eq!(totals.grand_total, dec!(22.00));
    }
}
