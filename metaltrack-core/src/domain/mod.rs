//! Domain types for metaltrack

pub mod data_file;
pub mod record;
pub mod signal;

pub use data_file::{
    CotInsight, DataFile, MarketInsights, MomentumInsight, PriceRange, RatioInsight,
    TechnicalInsight, DEFAULT_SOURCE,
};
pub use record::{CotChange, Record, RecordId, StoredRecord};
pub use signal::{Signal, Summary};
