//! Presence check applied to every record before it is persisted.
//!
//! "Present" is deliberately loose: an empty string, a zero price, and a nil
//! id all count as missing. A legitimately free product (price `0`) therefore
//! fails validation.

use crate::products::ProductRecord;

/// Fields a record must carry to be persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Id,
    StockCode,
    Name,
    Price,
    Status,
}

impl RequiredField {
    pub const ALL: [RequiredField; 5] = [
        RequiredField::Id,
        RequiredField::StockCode,
        RequiredField::Name,
        RequiredField::Price,
        RequiredField::Status,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RequiredField::Id => "_id",
            RequiredField::StockCode => "stock_code",
            RequiredField::Name => "name",
            RequiredField::Price => "price",
            RequiredField::Status => "status",
        }
    }

    fn is_present(self, record: &ProductRecord) -> bool {
        match self {
            RequiredField::Id => !record.id.is_nil(),
            RequiredField::StockCode => !record.stock_code.is_empty(),
            RequiredField::Name => !record.name.is_empty(),
            RequiredField::Price => !record.price.is_zero(),
            // A typed status is always set.
            RequiredField::Status => true,
        }
    }
}

impl std::fmt::Display for RequiredField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Required fields that are missing from `record`, in declaration order.
#[must_use]
pub fn missing_fields(record: &ProductRecord) -> Vec<RequiredField> {
    RequiredField::ALL
        .into_iter()
        .filter(|field| !field.is_present(record))
        .collect()
}

/// Returns `true` when every required field is present.
#[must_use]
pub fn is_valid_product(record: &ProductRecord) -> bool {
    RequiredField::ALL
        .iter()
        .all(|field| field.is_present(record))
}
