//! HTML breakdown for a priced cart
//!
//! Generates a self-contained HTML file with an embedded JSON payload and a
//! small renderer for filtering lines by rate class.

use crate::cart::LineItem;
use crate::cmd::read_cart;
use crate::vat::{compute_cart_totals, price_item, CartTotals, PricingPolicy, RateClass};
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct HtmlCommand {
    /// Cart file (CSV or JSON). Reads from stdin if not specified.
    #[arg(default_value = "-")]
    cart: PathBuf,

    /// Delivery fee in pounds (overrides any value in a JSON cart)
    #[arg(short, long)]
    delivery_fee: Option<Decimal>,

    /// Output file path (default: opens in browser)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl HtmlCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let policy = PricingPolicy::uk();
        let (items, file_delivery) = read_cart(&self.cart)?;
        let delivery_fee = self
            .delivery_fee
            .or(file_delivery)
            .unwrap_or(Decimal::ZERO);

        let totals = compute_cart_totals(&policy, &items, delivery_fee);
        let html = generate(&policy, &items, &totals);

        if let Some(ref output_path) = self.output {
            std::fs::write(output_path, &html)?;
            println!("HTML breakdown written to: {}", output_path.display());
        } else {
            // Write to temp file and open in browser
            let temp_path = std::env::temp_dir().join("vatc-breakdown.html");
            std::fs::write(&temp_path, &html)?;
            opener::open(&temp_path)?;
            println!("Opened HTML breakdown in browser: {}", temp_path.display());
        }

        Ok(())
    }
}

/// Data structure for embedding in HTML as JSON
#[derive(Serialize)]
struct HtmlReportData {
    items: Vec<ItemView>,
    totals: TotalsView,
}

#[derive(Serialize)]
struct ItemView {
    name: String,
    quantity: u32,
    unit_price: String,
    net: String,
    rate_class: String,
    vat: String,
    gross: String,
    tags: String,
}

#[derive(Serialize)]
struct TotalsView {
    line_count: usize,
    zero_rated_count: usize,
    subtotal: String,
    standard_rated_subtotal: String,
    zero_rated_subtotal: String,
    delivery: String,
    vat_on_items: String,
    vat_on_delivery: String,
    total_vat: String,
    grand_total: String,
}

fn build_report_data(
    policy: &PricingPolicy,
    items: &[LineItem],
    totals: &CartTotals,
) -> HtmlReportData {
    let item_views: Vec<ItemView> = items
        .iter()
        .map(|item| {
            let price = price_item(policy, item.line_total(), &item.tags);
            ItemView {
                name: item.name.clone(),
                quantity: item.quantity,
                unit_price: format!("{:.2}", item.unit_price),
                net: format!("{:.2}", price.net_price),
                rate_class: match price.rate_class {
                    RateClass::StandardRated => "standard".to_string(),
                    RateClass::ZeroRated => "zero".to_string(),
                },
                vat: format!("{:.2}", price.vat_amount),
                gross: format!("{:.2}", price.gross_price),
                tags: item.tags.join(", "),
            }
        })
        .collect();

    let zero_rated_count = item_views
        .iter()
        .filter(|v| v.rate_class == "zero")
        .count();

    HtmlReportData {
        totals: TotalsView {
            line_count: item_views.len(),
            zero_rated_count,
            subtotal: format!("{:.2}", totals.subtotal),
            standard_rated_subtotal: format!("{:.2}", totals.standard_rated_subtotal),
            zero_rated_subtotal: format!("{:.2}", totals.zero_rated_subtotal),
            delivery: format!("{:.2}", totals.delivery),
            vat_on_items: format!("{:.2}", totals.vat_on_standard_items),
            vat_on_delivery: format!("{:.2}", totals.vat_on_delivery),
            total_vat: format!("{:.2}", totals.total_vat),
            grand_total: format!("{:.2}", totals.grand_total),
        },
        items: item_views,
    }
}

const CSS: &str = r#"
body { font-family: -apple-system, "Segoe UI", Roboto, sans-serif; margin: 0; background: #f5f6f8; color: #1c1e21; }
header { background: #223; color: #fff; padding: 16px 24px; }
header h1 { margin: 0 0 8px; font-size: 20px; }
.filters label { margin-right: 16px; font-size: 14px; }
main { padding: 24px; max-width: 960px; margin: 0 auto; }
.summary-cards { display: flex; flex-wrap: wrap; gap: 12px; margin-bottom: 24px; }
.card { background: #fff; border-radius: 8px; padding: 12px 16px; flex: 1 1 140px; box-shadow: 0 1px 2px rgba(0,0,0,0.08); }
.card h3 { margin: 0; font-size: 12px; color: #667; text-transform: uppercase; }
.card .value { margin: 4px 0 0; font-size: 20px; font-weight: 600; }
table { width: 100%; border-collapse: collapse; background: #fff; border-radius: 8px; overflow: hidden; }
th, td { padding: 8px 12px; text-align: right; border-bottom: 1px solid #e4e6eb; font-size: 14px; }
th:first-child, td:first-child { text-align: left; }
th { background: #eef0f4; }
tr.zero td { color: #1a7f37; }
.count { color: #667; font-size: 14px; }
"#;

/// Generate the self-contained HTML breakdown
fn generate(policy: &PricingPolicy, items: &[LineItem], totals: &CartTotals) -> String {
    let data = build_report_data(policy, items, totals);
    let json_data = serde_json::to_string(&data).unwrap_or_else(|_| "{}".to_string());

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Cart VAT Breakdown</title>
    <style>
{css}
    </style>
</head>
<body>
    <header>
        <h1>Cart VAT Breakdown</h1>
        <div class="filters">
            <label><input type="checkbox" id="show-standard" checked onchange="render()"> Standard-rated</label>
            <label><input type="checkbox" id="show-zero" checked onchange="render()"> Zero-rated</label>
        </div>
    </header>

    <main>
        <section class="summary-cards">
            <div class="card">
                <h3>Subtotal</h3>
                <p class="value" id="summary-subtotal">-</p>
            </div>
            <div class="card">
                <h3>Delivery</h3>
                <p class="value" id="summary-delivery">-</p>
            </div>
            <div class="card">
                <h3>Total VAT</h3>
                <p class="value" id="summary-vat">-</p>
            </div>
            <div class="card">
                <h3>Grand Total</h3>
                <p class="value" id="summary-grand">-</p>
            </div>
        </section>

        <section>
            <h2>Lines <span class="count" id="items-count"></span></h2>
            <table>
                <thead>
                    <tr>
                        <th>Name</th>
                        <th>Qty</th>
                        <th>Unit Price</th>
                        <th>Net</th>
                        <th>Rate</th>
                        <th>VAT</th>
                        <th>Gross</th>
                        <th>Tags</th>
                    </tr>
                </thead>
                <tbody id="items-body"></tbody>
            </table>
        </section>
    </main>

    <script>
const DATA = {json_data};

function gbp(v) {{
    return '£' + v;
}}

function render() {{
    const showStandard = document.getElementById('show-standard').checked;
    const showZero = document.getElementById('show-zero').checked;

    const rows = DATA.items.filter(item =>
        (item.rate_class === 'standard' && showStandard) ||
        (item.rate_class === 'zero' && showZero));

    const body = document.getElementById('items-body');
    body.innerHTML = '';
    for (const item of rows) {{
        const tr = document.createElement('tr');
        tr.className = item.rate_class;
        for (const value of [item.name, item.quantity, gbp(item.unit_price),
                             gbp(item.net), item.rate_class, gbp(item.vat),
                             gbp(item.gross), item.tags]) {{
            const td = document.createElement('td');
            td.textContent = value;
            tr.appendChild(td);
        }}
        body.appendChild(tr);
    }}

    document.getElementById('items-count').textContent =
        '(' + rows.length + ' of ' + DATA.totals.line_count + ')';
}}

function init() {{
    document.getElementById('summary-subtotal').textContent = gbp(DATA.totals.subtotal);
    document.getElementById('summary-delivery').textContent = gbp(DATA.totals.delivery);
    document.getElementById('summary-vat').textContent = gbp(DATA.totals.total_vat);
    document.getElementById('summary-grand').textContent = gbp(DATA.totals.grand_total);
    render();
}}

init();
    </script>
</body>
</html>
"##,
        css = CSS,
        json_data = json_data
    )
}
