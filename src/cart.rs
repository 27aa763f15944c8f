use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::io::Read;
use vatc_derive::CsvSchema;

/// Unified JSON input format
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CartInput {
    /// Delivery fee in pounds (defaults to 0; always standard-rated)
    #[schemars(with = "Option<f64>")]
    pub delivery_fee: Option<Decimal>,
    pub items: Vec<LineItemRecord>,
}

/// One entry in a cart: a catalog item's price and tags plus a requested quantity
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub tags: Vec<String>,
}

impl LineItem {
    /// Total for this line before VAT
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Schema information for a CSV column, filled in by the CsvSchema derive
#[derive(Debug, Clone, Copy)]
pub struct CsvField {
    pub name: &'static str,
    pub required: bool,
    pub description: &'static str,
}

/// CSV/JSON record format for cart line items
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, CsvSchema)]
pub struct LineItemRecord {
    /// Product name as shown in the cart
    pub name: String,
    /// Unit price in pounds, before VAT
    #[schemars(with = "f64")]
    pub unit_price: Decimal,
    /// Number of units (defaults to 1)
    pub quantity: Option<u32>,
    /// Catalog tags: a JSON list, or one comma-separated value in CSV
    #[serde(default, deserialize_with = "deserialize_tags")]
    #[schemars(with = "Option<Vec<String>>")]
    pub tags: Option<Vec<String>>,
}

impl From<LineItemRecord> for LineItem {
    fn from(record: LineItemRecord) -> Self {
        LineItem {
            name: record.name,
            unit_price: record.unit_price,
            quantity: record.quantity.unwrap_or(1),
            tags: record.tags.unwrap_or_default(),
        }
    }
}

/// Accept tags as either a sequence of strings or a single comma-separated
/// string, normalizing to trimmed, non-empty entries.
///
/// Upstream catalog data is loose about this: exports carry tags as a list
/// in JSON and as one joined cell in CSV. Normalizing here means the
/// pricing code never special-cases input shape.
fn deserialize_tags<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    struct TagsVisitor;

    impl<'de> serde::de::Visitor<'de> for TagsVisitor {
        type Value = Option<Vec<String>>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a list of tags or a comma-separated string")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(Some(split_tags(value)))
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: serde::de::SeqAccess<'de>,
        {
            let mut tags = Vec::new();
            while let Some(tag) = seq.next_element::<String>()? {
                let tag = tag.trim().to_string();
                if !tag.is_empty() {
                    tags.push(tag);
                }
            }
            Ok(Some(tags))
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(None)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(None)
        }
    }

    deserializer.deserialize_any(TagsVisitor)
}

fn split_tags(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// A data-quality problem in a cart
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CartIssue {
    #[error("negative unit price for '{name}': {unit_price}")]
    NegativeUnitPrice { name: String, unit_price: Decimal },
    #[error("zero quantity for '{name}'")]
    ZeroQuantity { name: String },
    #[error("negative delivery fee: {0}")]
    NegativeDeliveryFee(Decimal),
}

impl CartIssue {
    pub fn kind(&self) -> &'static str {
        match self {
            CartIssue::NegativeUnitPrice { .. } => "NegativeUnitPrice",
            CartIssue::ZeroQuantity { .. } => "ZeroQuantity",
            CartIssue::NegativeDeliveryFee(_) => "NegativeDeliveryFee",
        }
    }
}

/// Check a cart for data-quality issues.
///
/// The pricing functions themselves stay permissive (negative amounts
/// propagate arithmetically and a zero quantity contributes nothing), so
/// callers decide how hard to react to what this returns: `validate` exits
/// non-zero, `totals` warns and carries on.
pub fn validate_cart(items: &[LineItem], delivery_fee: Decimal) -> Vec<CartIssue> {
    let mut issues = Vec::new();

    for item in items {
        if item.unit_price < Decimal::ZERO {
            issues.push(CartIssue::NegativeUnitPrice {
                name: item.name.clone(),
                unit_price: item.unit_price,
            });
        }
        if item.quantity == 0 {
            issues.push(CartIssue::ZeroQuantity {
                name: item.name.clone(),
            });
        }
    }

    if delivery_fee < Decimal::ZERO {
        issues.push(CartIssue::NegativeDeliveryFee(delivery_fee));
    }

    issues
}

/// Read cart line items from CSV
pub fn read_csv<R: Read>(reader: R) -> anyhow::Result<Vec<LineItem>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let records: Result<Vec<LineItemRecord>, _> = rdr.deserialize::<LineItemRecord>().collect();
    Ok(records?.into_iter().map(Into::into).collect())
}

/// Read a cart from JSON, returning the items and any file-level delivery fee
pub fn read_json<R: Read>(reader: R) -> anyhow::Result<(Vec<LineItem>, Option<Decimal>)> {
    let input: CartInput = serde_json::from_reader(reader)?;
    let items = input.items.into_iter().map(Into::into).collect();
    Ok((items, input.delivery_fee))
}
