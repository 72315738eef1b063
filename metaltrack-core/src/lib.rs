//! metaltrack core: record types, thresholds, signal evaluation, advice.
//!
//! This crate is the pure part of the tracker:
//! - Domain types (records, data file shape, signals, summaries)
//! - Threshold table and single-metric classification
//! - Delivery calendar window check and report-day reminders
//! - Two-phase record evaluation (single-metric signals, then cross-metric rules)
//! - Advice selection with bearish-first priority
//! - Day-over-day price change
//!
//! Nothing here performs I/O; loading, persistence and export live in
//! `metaltrack-runner`.

pub mod advice;
pub mod calendar;
pub mod domain;
pub mod evaluate;
pub mod price;
pub mod thresholds;

pub use advice::{advise, Advice, AdviceLevel, Severity};
pub use calendar::{
    report_day, DeliveryCalendar, DeliveryEvent, DeliveryProximity, ReportDay, RiskLevel,
    DEFAULT_LOOKAHEAD_DAYS,
};
pub use domain::{CotChange, DataFile, Record, RecordId, Signal, StoredRecord, Summary};
pub use evaluate::{Evaluation, Evaluator, RiskSignal, SignalSource};
pub use price::{price_change, PriceChange};
pub use thresholds::{classify, parse_numeric, Metric, MetricThreshold, ThresholdTable};

/// Evaluate a record and pick its advice in one step.
pub fn assess(evaluator: &Evaluator, record: &Record) -> (Evaluation, Advice) {
    let evaluation = evaluator.evaluate(record);
    let advice = advise(&evaluation.summary);
    (evaluation, advice)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: all core types are Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<Record>();
        require_sync::<Record>();
        require_send::<StoredRecord>();
        require_sync::<StoredRecord>();
        require_send::<DataFile>();
        require_sync::<DataFile>();
        require_send::<ThresholdTable>();
        require_sync::<ThresholdTable>();
        require_send::<DeliveryCalendar>();
        require_sync::<DeliveryCalendar>();
        require_send::<Evaluator>();
        require_sync::<Evaluator>();
        require_send::<Evaluation>();
        require_sync::<Evaluation>();
        require_send::<Advice>();
        require_sync::<Advice>();
    }

    #[test]
    fn assess_pairs_summary_with_advice() {
        let record = Record {
            gold_silver_ratio: "40".into(),
            comex_inventory: "100M".into(),
            momentum: "20".into(),
            cot_commercial: "-5000".into(),
            ..Record::new(chrono::NaiveDate::from_ymd_opt(2026, 1, 5).unwrap())
        };
        let (evaluation, advice) = assess(&Evaluator::default(), &record);
        assert_eq!(evaluation.summary, Summary::new(0, 4));
        assert_eq!(advice.level, AdviceLevel::Reduce50);
    }
}
