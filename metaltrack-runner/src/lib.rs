//! metaltrack runner: everything around the pure core that touches the outside.
//!
//! - TOML configuration (thresholds, delivery calendar, storage dir)
//! - Data file loading from a path or URL
//! - In-memory record store with stable ids
//! - Local JSON persistence
//! - CSV export and re-import
//! - Whole-collection assessment and status reporting
//! - Dataset fingerprinting

pub mod config;
pub mod export;
pub mod fingerprint;
pub mod persistence;
pub mod report;
pub mod source;
pub mod store;

pub use config::{ConfigError, DeliveryConfig, StorageConfig, TrackerConfig};
pub use export::{export_csv, export_file_name, import_csv, write_export, ExportError, CSV_HEADER};
pub use fingerprint::dataset_hash;
pub use persistence::{LocalStore, PersistError, STORAGE_KEY};
pub use report::{assess_records, status_report, AssessedRecord, StatusReport};
pub use source::{parse_data_file, DataFileProvider, DataSource, HttpFileProvider, SourceError};
pub use store::{DatasetMeta, RecordStore, StoreError};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    /// Compile-time check: runner types can cross threads.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<TrackerConfig>();
        require_sync::<TrackerConfig>();
        require_send::<RecordStore>();
        require_sync::<RecordStore>();
        require_send::<LocalStore>();
        require_sync::<LocalStore>();
        require_send::<HttpFileProvider>();
        require_sync::<HttpFileProvider>();
        require_send::<AssessedRecord>();
        require_sync::<AssessedRecord>();
        require_send::<StoreError>();
        require_send::<ExportError>();
        require_send::<PersistError>();
    }
}
