//! Sub-field extraction from a product's raw description markup.
//!
//! The feed embeds fabric and measurement notes in an HTML list inside the
//! description, introduced by fixed Turkish labels. Each [`ExtractionRule`]
//! captures the text between its label and the next boundary tag. Rules run
//! against the raw markup: the boundaries are tags, so stripped text would
//! never match.

use regex::Regex;

/// Record fields populated from the description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptionField {
    Fabric,
    ModelMeasurements,
    ProductMeasurements,
    SampleSize,
}

impl DescriptionField {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DescriptionField::Fabric => "fabric",
            DescriptionField::ModelMeasurements => "model_measurements",
            DescriptionField::ProductMeasurements => "product_measurements",
            DescriptionField::SampleSize => "sample_size",
        }
    }
}

impl std::fmt::Display for DescriptionField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `(label, boundary) -> captured text` for one description field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRule {
    pub field: DescriptionField,
    /// Literal text (markup included) that precedes the value.
    pub label: String,
    /// Literal text that ends the value. The shortest match wins.
    pub boundary: String,
    /// Literal fragments removed from the captured value, e.g. `&nbsp;`.
    pub remove: Vec<String>,
}

impl ExtractionRule {
    #[must_use]
    pub fn new(field: DescriptionField, label: &str, boundary: &str) -> Self {
        Self {
            field,
            label: label.to_string(),
            boundary: boundary.to_string(),
            remove: Vec::new(),
        }
    }

    #[must_use]
    pub fn removing(mut self, fragment: &str) -> Self {
        self.remove.push(fragment.to_string());
        self
    }

    /// Compiles the rule into a dot-matches-newline, non-greedy pattern.
    ///
    /// # Errors
    ///
    /// Returns [`regex::Error`] if the escaped pattern exceeds the regex size
    /// limit (only possible with pathological labels).
    pub fn compile(&self) -> Result<CompiledRule, regex::Error> {
        let pattern = format!(
            r"(?s){}\s*(.*?){}",
            regex::escape(&self.label),
            regex::escape(&self.boundary)
        );
        Ok(CompiledRule {
            rule: self.clone(),
            pattern: Regex::new(&pattern)?,
        })
    }
}

/// An [`ExtractionRule`] with its pattern built.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    rule: ExtractionRule,
    pattern: Regex,
}

impl CompiledRule {
    #[must_use]
    pub fn field(&self) -> DescriptionField {
        self.rule.field
    }

    /// Text between the first label occurrence and the next boundary,
    /// trimmed. Returns `None` when the label is absent, the boundary never
    /// follows it, or the captured value is blank.
    #[must_use]
    pub fn capture(&self, raw_markup: &str) -> Option<String> {
        let captured = self.pattern.captures(raw_markup)?.get(1)?.as_str();
        let mut value = captured.to_string();
        for fragment in &self.rule.remove {
            value = value.replace(fragment.as_str(), "");
        }
        let value = value.trim();
        (!value.is_empty()).then(|| value.to_string())
    }
}

/// Labels used by the product feed's description template.
#[must_use]
pub fn default_rules() -> Vec<ExtractionRule> {
    vec![
        ExtractionRule::new(DescriptionField::Fabric, "Kumaş Bilgisi:</strong>", "</li>"),
        ExtractionRule::new(
            DescriptionField::ModelMeasurements,
            "Model Ölçüleri:</strong>",
            "</li>",
        )
        .removing("&nbsp;"),
        ExtractionRule::new(
            DescriptionField::ProductMeasurements,
            "Ürün Ölçüleri:</strong>",
            "</li>",
        ),
        ExtractionRule::new(
            DescriptionField::SampleSize,
            "Modelin üzerindeki ürün <strong>",
            "</strong>",
        ),
    ]
}

/// Removes markup tags and collapses runs of whitespace to single spaces.
#[must_use]
pub fn strip_markup(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}
