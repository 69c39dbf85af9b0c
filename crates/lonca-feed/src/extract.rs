//! Feed node → [`ProductRecord`] extraction.
//!
//! Numeric field parsing is delegated to [`crate::parse`] and description
//! sub-fields to [`crate::description`]; this module sequences the steps and
//! reports each decision point to the injected [`EventSink`].

use lonca_core::{
    is_discounted, is_valid_product, missing_fields, normalized_now, Clock, EventSink,
    ProductRecord, ProductStatus, PRICE_UNIT,
};
use uuid::Uuid;

use crate::description::{default_rules, strip_markup, CompiledRule, DescriptionField, ExtractionRule};
use crate::details::{DetailName, ProductDetails};
use crate::error::ExtractError;
use crate::node::FeedNode;
use crate::parse::{build_stock_code, parse_colors, parse_decimal, parse_quantity, title_case};

/// Turns feed nodes into validated product records.
///
/// Holds the compiled description rules; build once per run and reuse for
/// every node.
#[derive(Debug, Clone)]
pub struct Extractor {
    rules: Vec<CompiledRule>,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Default)]
struct DescriptionValues {
    fabric: Option<String>,
    model_measurements: Option<String>,
    product_measurements: Option<String>,
    sample_size: Option<String>,
}

impl DescriptionValues {
    fn set(&mut self, field: DescriptionField, value: String) {
        let slot = match field {
            DescriptionField::Fabric => &mut self.fabric,
            DescriptionField::ModelMeasurements => &mut self.model_measurements,
            DescriptionField::ProductMeasurements => &mut self.product_measurements,
            DescriptionField::SampleSize => &mut self.sample_size,
        };
        *slot = Some(value);
    }
}

impl Extractor {
    /// Extractor using the feed's standard description labels.
    ///
    /// # Panics
    ///
    /// Never in practice: the default rules are escaped literals.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rules(&default_rules()).expect("default description rules are valid regexes")
    }

    /// Extractor using custom description rules.
    ///
    /// # Errors
    ///
    /// Returns [`regex::Error`] if a rule fails to compile.
    pub fn with_rules(rules: &[ExtractionRule]) -> Result<Self, regex::Error> {
        let rules = rules
            .iter()
            .map(ExtractionRule::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// Extracts a record from `node`, or `None` if the node is rejected.
    ///
    /// Rejections are reported to `sink` at error level; the caller only
    /// needs to skip the node.
    pub fn extract_node(
        &self,
        node: &FeedNode,
        clock: &dyn Clock,
        sink: &dyn EventSink,
    ) -> Option<ProductRecord> {
        match self.extract_product(node, clock, sink) {
            Ok(record) => Some(record),
            Err(err) => {
                sink.error(&format!("dropping product node: {err}"));
                None
            }
        }
    }

    /// Extracts and validates a record from `node`.
    ///
    /// Missing name, images, product type, and description fields are soft
    /// conditions reported to `sink`; they never reject the node.
    ///
    /// # Errors
    ///
    /// - [`ExtractError::MalformedNumericField`] if `Price`, `DiscountedPrice`,
    ///   or `Quantity` is missing or unparseable.
    /// - [`ExtractError::MissingKeyComponent`] if the stock code cannot be
    ///   built (no `ProductId` or no color).
    /// - [`ExtractError::ValidationFailure`] if a required field is empty.
    pub fn extract_product(
        &self,
        node: &FeedNode,
        clock: &dyn Clock,
        sink: &dyn EventSink,
    ) -> Result<ProductRecord, ExtractError> {
        sink.info("starting to parse product node");
        let id = Uuid::new_v4();
        sink.debug(&format!("assigned placeholder id {id}"));

        let product_id = node.product_id.as_deref();
        let label = product_id.unwrap_or("<unknown>");
        if product_id.is_none() {
            sink.error("product node has no ProductId attribute");
        }

        let name = node.name.as_deref().map(title_case).unwrap_or_default();
        if name.is_empty() {
            sink.error(&format!("product name not found for product ID: {label}"));
        }

        let images = node.images.clone();
        if images.is_empty() {
            sink.info(&format!("no images found for product ID: {label}"));
        }

        sink.info("parsing product details");
        let (details, unknown) = ProductDetails::from_pairs(&node.details);
        for detail in &unknown {
            sink.debug(&format!("ignoring unrecognized product detail {detail:?}"));
        }

        let price = parse_decimal(DetailName::Price, details.get(DetailName::Price))?;
        let discounted_price = parse_decimal(
            DetailName::DiscountedPrice,
            details.get(DetailName::DiscountedPrice),
        )?;
        sink.debug(&format!(
            "parsed prices - regular: {price}, discounted: {discounted_price}"
        ));

        let product_type = details
            .get(DetailName::ProductType)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        if product_type.is_none() {
            sink.debug(&format!("no product type for product ID: {label}"));
        }

        let quantity = parse_quantity(details.get(DetailName::Quantity))?;

        let color = parse_colors(details.get(DetailName::Color));
        if color.is_empty() {
            sink.info("no color information found");
        } else {
            sink.debug(&format!("found colors: {color:?}"));
        }

        let stock_code = build_stock_code(product_id, &color)?;
        sink.info(&format!("generated stock code: {stock_code}"));

        let description = self.read_description(node.description.as_deref(), &stock_code, sink);

        let now = normalized_now(clock);
        let record = ProductRecord {
            id,
            stock_code,
            name,
            images,
            price,
            discounted_price,
            is_discounted: is_discounted(price, discounted_price),
            product_type,
            quantity,
            color,
            status: ProductStatus::from_quantity(quantity),
            price_unit: PRICE_UNIT.to_string(),
            fabric: description.fabric,
            model_measurements: description.model_measurements,
            product_measurements: description.product_measurements,
            sample_size: description.sample_size,
            created_at: now,
            updated_at: now,
        };

        if !is_valid_product(&record) {
            return Err(ExtractError::ValidationFailure {
                stock_code: record.stock_code.clone(),
                missing: missing_fields(&record),
            });
        }

        Ok(record)
    }

    fn read_description(
        &self,
        raw: Option<&str>,
        stock_code: &str,
        sink: &dyn EventSink,
    ) -> DescriptionValues {
        let mut values = DescriptionValues::default();
        sink.info("parsing product description");
        let Some(raw) = raw.filter(|s| !s.trim().is_empty()) else {
            sink.info(&format!("no description for product with stock code {stock_code}"));
            return values;
        };

        let clean = strip_markup(raw);
        sink.debug(&format!("clean description is {} characters", clean.chars().count()));

        for rule in &self.rules {
            let field = rule.field();
            match rule.capture(raw) {
                Some(value) => {
                    sink.debug(&format!("found {field}: {value}"));
                    values.set(field, value);
                }
                None => sink.info(&format!(
                    "no {field} data for product with stock code {stock_code}"
                )),
            }
        }
        values
    }
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
