//! In-memory record store.
//!
//! Records are held most-recent-first. Ids are assigned in insertion order and
//! never reused, even after deletion. Loading a data file replaces the whole
//! collection, and only once the file has been fetched and parsed in full.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{info, warn};

use metaltrack_core::domain::{MarketInsights, PriceRange, DEFAULT_SOURCE};
use metaltrack_core::{
    price_change, DataFile, DeliveryEvent, Evaluator, PriceChange, Record, RecordId, StoredRecord,
};

use crate::source::{DataFileProvider, DataSource, SourceError};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to load records: {0}")]
    Load(#[from] SourceError),

    #[error("no record with id {0}")]
    NotFound(RecordId),
}

/// Everything a data file carries besides its records.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetMeta {
    pub last_updated: String,
    pub source: String,
    pub market_insights: Option<MarketInsights>,
    pub price_range: Option<PriceRange>,
    pub delivery_calendar: Option<Vec<DeliveryEvent>>,
}

impl Default for DatasetMeta {
    fn default() -> Self {
        Self {
            last_updated: String::new(),
            source: DEFAULT_SOURCE.to_string(),
            market_insights: None,
            price_range: None,
            delivery_calendar: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<StoredRecord>,
    next_id: u64,
    meta: DatasetMeta,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a parsed data file. Ids follow file order starting at 0.
    pub fn from_data_file(file: DataFile) -> Self {
        let records: Vec<StoredRecord> = file
            .records
            .into_iter()
            .enumerate()
            .map(|(i, record)| StoredRecord {
                id: RecordId(i as u64),
                record,
            })
            .collect();
        Self {
            next_id: records.len() as u64,
            records,
            meta: DatasetMeta {
                last_updated: file.last_updated,
                source: file.source,
                market_insights: file.market_insights,
                price_range: file.price_range_52_week,
                delivery_calendar: file.delivery_calendar,
            },
        }
    }

    /// Rebuild from persisted records, keeping their ids and order.
    ///
    /// The id sequence saturates at `u64::MAX` rather than wrapping.
    pub fn from_stored(records: Vec<StoredRecord>) -> Self {
        let next_id = records
            .iter()
            .map(|r| r.id.0.saturating_add(1))
            .max()
            .unwrap_or(0);
        Self {
            records,
            next_id,
            meta: DatasetMeta {
                source: "local".to_string(),
                ..DatasetMeta::default()
            },
        }
    }

    /// Replace the collection with the file at `source`.
    ///
    /// On any error the current records are left untouched.
    pub fn load(
        &mut self,
        provider: &dyn DataFileProvider,
        source: &DataSource,
    ) -> Result<usize, StoreError> {
        let file = provider.fetch(source).map_err(|e| {
            warn!(%source, error = %e, "data load failed, keeping current records");
            e
        })?;
        *self = Self::from_data_file(file);
        info!(%source, records = self.records.len(), "loaded data file");
        Ok(self.records.len())
    }

    /// Insert a manually entered record, keeping most-recent-first order.
    ///
    /// A record dated the same day as existing ones goes in front of them.
    pub fn add(&mut self, record: Record) -> RecordId {
        let id = RecordId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        let pos = self
            .records
            .iter()
            .position(|r| r.record.date <= record.date)
            .unwrap_or(self.records.len());
        self.records.insert(pos, StoredRecord { id, record });
        id
    }

    pub fn delete(&mut self, id: RecordId) -> Result<StoredRecord, StoreError> {
        let pos = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or(StoreError::NotFound(id))?;
        Ok(self.records.remove(pos))
    }

    pub fn get(&self, id: RecordId) -> Option<&StoredRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn records(&self) -> &[StoredRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn meta(&self) -> &DatasetMeta {
        &self.meta
    }

    pub fn latest(&self) -> Option<&StoredRecord> {
        self.records.first()
    }

    /// Records dated within `[from, to]`, inclusive.
    pub fn between(&self, from: NaiveDate, to: NaiveDate) -> impl Iterator<Item = &StoredRecord> {
        self.records
            .iter()
            .filter(move |r| r.record.date >= from && r.record.date <= to)
    }

    /// Silver price change between the two most recent records.
    pub fn price_change(&self) -> Option<PriceChange> {
        let latest: Vec<Record> = self
            .records
            .iter()
            .take(2)
            .map(|r| r.record.clone())
            .collect();
        price_change(&latest)
    }

    /// `base`, with the dataset's own delivery calendar swapped in if it shipped one.
    pub fn evaluator(&self, base: &Evaluator) -> Evaluator {
        match &self.meta.delivery_calendar {
            Some(events) => base.with_calendar(base.calendar().with_events(events.clone())),
            None => base.clone(),
        }
    }

    pub fn into_records(self) -> Vec<StoredRecord> {
        self.records
    }
}
