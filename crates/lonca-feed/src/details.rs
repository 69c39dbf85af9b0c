//! Typed view over a node's `ProductDetail` pairs.

use std::collections::HashMap;

/// Detail names extraction understands. Anything else in the feed is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetailName {
    Price,
    DiscountedPrice,
    ProductType,
    Quantity,
    Color,
}

impl DetailName {
    pub const ALL: [DetailName; 5] = [
        DetailName::Price,
        DetailName::DiscountedPrice,
        DetailName::ProductType,
        DetailName::Quantity,
        DetailName::Color,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DetailName::Price => "Price",
            DetailName::DiscountedPrice => "DiscountedPrice",
            DetailName::ProductType => "ProductType",
            DetailName::Quantity => "Quantity",
            DetailName::Color => "Color",
        }
    }

    #[must_use]
    pub fn from_feed_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_str() == name)
    }
}

impl std::fmt::Display for DetailName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw detail values keyed by [`DetailName`].
///
/// Values stay as the feed supplied them; typed parsing happens in the
/// extractor after an explicit presence check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductDetails {
    values: HashMap<DetailName, String>,
}

impl ProductDetails {
    /// Builds the mapping from feed pairs. A repeated name keeps its last
    /// value. Returns the mapping and the names that were not recognized.
    #[must_use]
    pub fn from_pairs(pairs: &[(String, String)]) -> (Self, Vec<String>) {
        let mut values = HashMap::new();
        let mut unknown = Vec::new();
        for (name, value) in pairs {
            match DetailName::from_feed_name(name) {
                Some(detail) => {
                    values.insert(detail, value.clone());
                }
                None => unknown.push(name.clone()),
            }
        }
        (Self { values }, unknown)
    }

    #[must_use]
    pub fn get(&self, name: DetailName) -> Option<&str> {
        self.values.get(&name).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, name: DetailName) -> bool {
        self.values.contains_key(&name)
    }
}
