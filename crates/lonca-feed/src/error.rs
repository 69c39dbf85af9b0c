use std::path::PathBuf;

use lonca_core::RequiredField;
use thiserror::Error;

use crate::details::DetailName;

/// Failures acquiring or reading the feed document as a whole.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to read feed file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed feed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("feed not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid feed source \"{source_ref}\": {reason}")]
    InvalidSource { source_ref: String, reason: String },
}

/// Why a single feed node produced no record.
///
/// Every variant is a per-node rejection: the node is dropped and the run
/// moves on to the next one.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("malformed {field} value {value:?}: {reason}")]
    MalformedNumericField {
        field: DetailName,
        value: Option<String>,
        reason: String,
    },

    #[error("cannot build stock code for product {product_id:?}: missing {component}")]
    MissingKeyComponent {
        product_id: Option<String>,
        component: &'static str,
    },

    #[error("validation failed for {stock_code}: missing [{}]", join_fields(.missing))]
    ValidationFailure {
        stock_code: String,
        missing: Vec<RequiredField>,
    },
}

fn join_fields(fields: &[RequiredField]) -> String {
    fields
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
