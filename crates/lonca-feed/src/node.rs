/// One `<Product>` element from the feed, reduced to the parts extraction
/// reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedNode {
    /// `ProductId` attribute, e.g. `"12345-XL"`.
    pub product_id: Option<String>,
    /// `Name` attribute, as supplied (not yet title-cased).
    pub name: Option<String>,
    /// `Images/Image/@Path` values in document order.
    pub images: Vec<String>,
    /// `ProductDetails/ProductDetail` `(Name, Value)` pairs in document order.
    /// A detail without a `Value` attribute carries an empty string.
    pub details: Vec<(String, String)>,
    /// Raw markup from the `Description` element.
    pub description: Option<String>,
}

impl FeedNode {
    /// Adds a `(name, value)` detail pair.
    #[must_use]
    pub fn with_detail(mut self, name: &str, value: &str) -> Self {
        self.details.push((name.to_string(), value.to_string()));
        self
    }
}
