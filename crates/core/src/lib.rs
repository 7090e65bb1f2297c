pub mod catalog;
pub mod compose;
pub mod config;
pub mod errors;
pub mod intent;
pub mod matcher;

pub use catalog::{Catalog, CatalogError, ProductRecord, FIELD_PLACEHOLDER};
pub use compose::{
    augmented_reply, compose_direct, llm_context, no_match_reply, product_card,
    CLOSING_CALL_TO_ACTION,
};
pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, MatchScope, ReplyMode};
pub use errors::HandlerError;
pub use intent::{active_categories, select_details, DetailCategory};
pub use matcher::Matcher;
