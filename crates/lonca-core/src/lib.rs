pub mod app_config;
pub mod clock;
pub mod config;
pub mod events;
pub mod products;
pub mod validation;

pub use app_config::{AppConfig, Environment};
pub use clock::{normalized_now, Clock, FixedClock, SteppingClock, SystemClock};
pub use config::{load_app_config, load_app_config_from_env};
pub use events::{EventLevel, EventSink, RecordingSink, TracingSink};
pub use products::{is_discounted, ProductRecord, ProductStatus, PRICE_UNIT};
pub use validation::{is_valid_product, missing_fields, RequiredField};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
