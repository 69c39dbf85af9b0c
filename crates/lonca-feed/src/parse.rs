//! Field-level parsers used by [`crate::extract`].

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::details::DetailName;
use crate::error::ExtractError;

/// Parses a non-negative decimal, accepting `,` as the decimal separator.
///
/// `"10,50"` and `"10.50"` both yield `10.50`. A missing value, anything
/// that is not a plain decimal, or a negative amount is rejected.
pub(crate) fn parse_decimal(field: DetailName, raw: Option<&str>) -> Result<Decimal, ExtractError> {
    let raw = raw.ok_or_else(|| malformed(field, None, "value is missing"))?;
    let normalized = raw.trim().replace(',', ".");
    let value = Decimal::from_str(&normalized)
        .map_err(|e| malformed(field, Some(raw), &e.to_string()))?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(malformed(field, Some(raw), "value is negative"));
    }
    Ok(value)
}

/// Parses a non-negative integer quantity.
pub(crate) fn parse_quantity(raw: Option<&str>) -> Result<u32, ExtractError> {
    let field = DetailName::Quantity;
    let raw = raw.ok_or_else(|| malformed(field, None, "value is missing"))?;
    raw.trim()
        .parse::<u32>()
        .map_err(|e| malformed(field, Some(raw), &e.to_string()))
}

/// Splits a comma-separated color list, trimming tokens and dropping empties.
pub(crate) fn parse_colors(raw: Option<&str>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Upper-cases the first letter of every alphabetic run and lower-cases the
/// rest: `"LINEN shirt-dress"` → `"Linen Shirt-Dress"`.
pub(crate) fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut in_word = false;
    for ch in value.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }
    out
}

/// Builds `{ProductId prefix}-{first color}`, where the prefix is everything
/// before the first `-` in the product id.
pub(crate) fn build_stock_code(
    product_id: Option<&str>,
    colors: &[String],
) -> Result<String, ExtractError> {
    let Some(id) = product_id else {
        return Err(ExtractError::MissingKeyComponent {
            product_id: None,
            component: "ProductId",
        });
    };
    let Some(first_color) = colors.first() else {
        return Err(ExtractError::MissingKeyComponent {
            product_id: Some(id.to_string()),
            component: "Color",
        });
    };
    let prefix = id.split('-').next().unwrap_or(id);
    Ok(format!("{prefix}-{first_color}"))
}

fn malformed(field: DetailName, raw: Option<&str>, reason: &str) -> ExtractError {
    ExtractError::MalformedNumericField {
        field,
        value: raw.map(str::to_string),
        reason: reason.to_string(),
    }
}
