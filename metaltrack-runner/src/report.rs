//! Assessment of a whole record collection.
//!
//! Pairs each stored record with its evaluation and advice so callers
//! (CLI listing, export) do not re-run the evaluator per field.

use chrono::NaiveDate;
use serde::Serialize;

use metaltrack_core::{
    assess, report_day, Advice, DeliveryProximity, Evaluation, Evaluator, PriceChange, RecordId,
    ReportDay,
};

use crate::store::RecordStore;

#[derive(Debug, Clone, Serialize)]
pub struct AssessedRecord {
    pub id: RecordId,
    pub date: NaiveDate,
    pub evaluation: Evaluation,
    pub advice: Advice,
}

/// Snapshot of the collection as of `today`.
#[derive(Debug, Clone)]
pub struct StatusReport {
    pub latest: Option<AssessedRecord>,
    pub price_change: Option<PriceChange>,
    pub upcoming_delivery: Option<DeliveryProximity>,
    pub report_day: Option<ReportDay>,
    pub record_count: usize,
}

pub fn assess_records(store: &RecordStore, base: &Evaluator) -> Vec<AssessedRecord> {
    let evaluator = store.evaluator(base);
    store
        .records()
        .iter()
        .map(|stored| {
            let (evaluation, advice) = assess(&evaluator, &stored.record);
            AssessedRecord {
                id: stored.id,
                date: stored.record.date,
                evaluation,
                advice,
            }
        })
        .collect()
}

pub fn status_report(store: &RecordStore, base: &Evaluator, today: NaiveDate) -> StatusReport {
    let evaluator = store.evaluator(base);
    let latest = store.latest().map(|stored| {
        let (evaluation, advice) = assess(&evaluator, &stored.record);
        AssessedRecord {
            id: stored.id,
            date: stored.record.date,
            evaluation,
            advice,
        }
    });
    StatusReport {
        latest,
        price_change: store.price_change(),
        upcoming_delivery: evaluator.calendar().check_window(today),
        report_day: report_day(today),
        record_count: store.len(),
    }
}
