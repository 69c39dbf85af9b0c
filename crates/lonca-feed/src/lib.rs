pub mod description;
pub mod details;
pub mod error;
pub mod extract;
pub mod node;
pub(crate) mod parse;
pub mod reader;
pub mod source;

pub use description::{default_rules, strip_markup, CompiledRule, DescriptionField, ExtractionRule};
pub use details::{DetailName, ProductDetails};
pub use error::{ExtractError, FeedError};
pub use extract::Extractor;
pub use node::FeedNode;
pub use reader::parse_feed;
pub use source::{FeedClient, FeedSource};
