use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Currency every feed price is quoted in.
pub const PRICE_UNIT: &str = "USD";

/// Stock status derived from on-hand quantity.
///
/// Zero quantity maps to `Active`; anything else is `Passive`. Downstream
/// consumers of the collection read the flag this way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductStatus {
    Active,
    Passive,
}

impl ProductStatus {
    #[must_use]
    pub fn from_quantity(quantity: u32) -> Self {
        if quantity == 0 {
            Self::Active
        } else {
            Self::Passive
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Passive => "Passive",
        }
    }
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A product extracted from one feed node, normalized for the document store.
///
/// Field names on the wire follow the stored document schema (`_id`,
/// `createdAt`, `updatedAt`), which is shared with other consumers of the
/// collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Persistence identifier. Extraction stamps a placeholder; the upserter
    /// replaces it with the stored document's id or a freshly issued one.
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Business key: `{ProductId prefix}-{first color}`.
    pub stock_code: String,
    pub name: String,
    pub images: Vec<String>,
    pub price: Decimal,
    /// `0` means the product is not discounted.
    pub discounted_price: Decimal,
    pub is_discounted: bool,
    pub product_type: Option<String>,
    pub quantity: u32,
    pub color: Vec<String>,
    pub status: ProductStatus,
    pub price_unit: String,
    pub fabric: Option<String>,
    pub model_measurements: Option<String>,
    pub product_measurements: Option<String>,
    pub sample_size: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Returns `true` when `discounted_price` is a real markdown of `price`.
///
/// A zero discounted price means "no discount", and a discounted price at or
/// above the list price is not treated as a discount.
#[must_use]
pub fn is_discounted(price: Decimal, discounted_price: Decimal) -> bool {
    discounted_price > Decimal::ZERO && discounted_price < price
}
