use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// VAT treatment of a cart line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RateClass {
    StandardRated,
    ZeroRated,
}

impl RateClass {
    pub fn display(&self) -> &'static str {
        match self {
            RateClass::StandardRated => "Standard",
            RateClass::ZeroRated => "Zero-Rated",
        }
    }
}

impl std::fmt::Display for RateClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Keywords that mark a catalog tag as zero-rated under the UK policy.
/// Children's clothing carries 0% VAT.
const ZERO_RATED_KEYWORDS: &[&str] = &["kids", "children", "child", "kids no vat"];

/// VAT rates plus the tag keywords that zero-rate a line.
///
/// Keywords are stored lowercased and matched case-insensitively as
/// substrings of the catalog tags, so "Kids Collection" and "CHILDRENSWEAR"
/// both zero-rate a line.
#[derive(Debug, Clone)]
pub struct PricingPolicy {
    standard_rate: Decimal,
    zero_rate: Decimal,
    zero_rated_keywords: Vec<String>,
}

impl PricingPolicy {
    /// UK policy: 20% standard rate, children's products zero-rated
    pub fn uk() -> Self {
        Self::with_standard_rate(dec!(0.20))
    }

    /// UK keyword policy with a non-default standard rate
    pub fn with_standard_rate(standard_rate: Decimal) -> Self {
        Self::new(standard_rate, ZERO_RATED_KEYWORDS)
    }

    /// Policy with custom zero-rating keywords
    pub fn new(standard_rate: Decimal, zero_rated_keywords: &[&str]) -> Self {
        PricingPolicy {
            standard_rate,
            zero_rate: Decimal::ZERO,
            zero_rated_keywords: zero_rated_keywords
                .iter()
                .map(|keyword| keyword.to_lowercase())
                .collect(),
        }
    }

    pub fn standard_rate(&self) -> Decimal {
        self.standard_rate
    }

    /// Rate fraction for a class (e.g. 0.20)
    pub fn rate(&self, class: RateClass) -> Decimal {
        match class {
            RateClass::StandardRated => self.standard_rate,
            RateClass::ZeroRated => self.zero_rate,
        }
    }

    /// Classify a line from its catalog tags.
    ///
    /// A line is zero-rated iff any tag contains any zero-rating keyword,
    /// case-insensitively. No tags means standard-rated.
    pub fn classify(&self, tags: &[String]) -> RateClass {
        for tag in tags {
            let tag = tag.to_lowercase();
            if self
                .zero_rated_keywords
                .iter()
                .any(|keyword| tag.contains(keyword.as_str()))
            {
                return RateClass::ZeroRated;
            }
        }
        RateClass::StandardRated
    }
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self::uk()
    }
}
