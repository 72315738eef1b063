//! End-to-end checks of the evaluation pipeline on realistic records.
//!
//! Covers:
//! 1. COT direction tag overriding the numeric position
//! 2. Delivery window edges (5 days in, 6 days out)
//! 3. Overheat cascade from monthly change into momentum
//! 4. Bearish priority at equal counts
//! 5. Price change between the two latest records

use chrono::NaiveDate;
use metaltrack_core::{
    advise, assess, price_change, AdviceLevel, CotChange, DeliveryCalendar, DeliveryEvent,
    Evaluator, Metric, Record, RiskLevel, Signal, SignalSource, Summary, ThresholdTable,
};

// ── Helpers ──────────────────────────────────────────────────────────

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn fnd_calendar() -> DeliveryCalendar {
    DeliveryCalendar::new(
        vec![
            DeliveryEvent::new(d(2026, 4, 29), "SIK26 first notice day", RiskLevel::High),
            DeliveryEvent::new(d(2026, 5, 27), "SIK26 last trading day", RiskLevel::High),
        ],
        5,
    )
}

fn record(date: NaiveDate) -> Record {
    Record {
        silver_price: "32.50".into(),
        gold_price: "2650.00".into(),
        gold_silver_ratio: "81.5".into(),
        momentum: "64".into(),
        comex_inventory: "152.3M".into(),
        cot_commercial: "-41000".into(),
        cot_speculator: "38000".into(),
        slv_holdings: "14500".into(),
        ..Record::new(date)
    }
}

fn signal_of(evaluator: &Evaluator, record: &Record, source: SignalSource) -> Option<Signal> {
    evaluator
        .evaluate(record)
        .signal_for(source)
        .map(|s| s.signal)
}

// ── 1. COT direction ─────────────────────────────────────────────────

#[test]
fn reduced_short_is_bullish_for_any_position() {
    let evaluator = Evaluator::default();
    for raw in ["-90000", "-41000", "0", "25000", "", "garbage"] {
        let r = Record {
            cot_commercial: raw.into(),
            cot_change: Some(CotChange::ReducedShort),
            ..record(d(2026, 1, 7))
        };
        assert_eq!(
            signal_of(&evaluator, &r, SignalSource::Metric(Metric::CotCommercial)),
            Some(Signal::Bullish),
            "cotCommercial = {raw:?}"
        );
    }
}

#[test]
fn tag_from_json_drives_override() {
    let r: Record = serde_json::from_str(
        r#"{"date": "2026-01-07", "cotCommercial": "-10000", "cotChange": "REDUCED SHORT"}"#,
    )
    .unwrap();
    assert_eq!(
        signal_of(&Evaluator::default(), &r, SignalSource::Metric(Metric::CotCommercial)),
        Some(Signal::Bullish)
    );
}

// ── 2. Delivery window ───────────────────────────────────────────────

#[test]
fn record_five_days_before_event_is_flagged() {
    let evaluator = Evaluator::new(ThresholdTable::default(), fnd_calendar());
    let eval = evaluator.evaluate(&record(d(2026, 4, 24)));
    let hit = eval.signal_for(SignalSource::DeliveryWindow).unwrap();
    assert_eq!(hit.signal, Signal::Bearish);

    let prox = evaluator.calendar().check_window(d(2026, 4, 24)).unwrap();
    assert_eq!(prox.days_to, 5);
}

#[test]
fn record_six_days_before_event_is_not_flagged() {
    let evaluator = Evaluator::new(ThresholdTable::default(), fnd_calendar());
    assert!(evaluator.calendar().check_window(d(2026, 4, 23)).is_none());
    assert_eq!(
        signal_of(&evaluator, &record(d(2026, 4, 23)), SignalSource::DeliveryWindow),
        None
    );
}

// ── 3. Overheat cascade ──────────────────────────────────────────────

#[test]
fn overheated_month_turns_momentum_bearish() {
    let r = Record {
        momentum: "82".into(),
        monthly_change: Some("28.4%".into()),
        ..record(d(2026, 1, 7))
    };
    let eval = Evaluator::default().evaluate(&r);
    assert_eq!(
        eval.signal_for(SignalSource::Metric(Metric::MonthlyChange)).unwrap().signal,
        Signal::Bearish
    );
    assert_eq!(
        eval.signal_for(SignalSource::Metric(Metric::Momentum)).unwrap().signal,
        Signal::Bearish
    );
}

// ── 4. Advice priority ───────────────────────────────────────────────

#[test]
fn four_and_four_resolves_bearish() {
    assert_eq!(advise(&Summary::new(4, 4)).level, AdviceLevel::Reduce50);
    assert_eq!(advise(&Summary::new(4, 4)).label, "reduce 50%");
}

#[test]
fn strongly_bearish_record_reduces_eighty() {
    let evaluator = Evaluator::new(ThresholdTable::default(), fnd_calendar());
    let r = Record {
        gold_silver_ratio: "45".into(),
        comex_inventory: "110M".into(),
        momentum: "85".into(),
        monthly_change: Some("35%".into()),
        cot_change: Some(CotChange::AddedShort),
        ..record(d(2026, 4, 27))
    };
    let (evaluation, advice) = assess(&evaluator, &r);
    // ratio, inventory, monthly, momentum (overheat), COT tag, delivery window
    assert_eq!(evaluation.summary, Summary::new(0, 6));
    assert_eq!(advice.level, AdviceLevel::Reduce80);
}

#[test]
fn strongly_bullish_record_accumulates() {
    let r = Record {
        gold_silver_ratio: "88".into(),
        comex_inventory: "160M".into(),
        momentum: "75".into(),
        cot_commercial: "-62,000".into(),
        monthly_change: Some("6%".into()),
        ..record(d(2026, 1, 7))
    };
    let (evaluation, advice) = assess(&Evaluator::default(), &r);
    assert_eq!(evaluation.summary, Summary::new(5, 0));
    assert_eq!(advice.level, AdviceLevel::Accumulate);
}

// ── 5. Price change ──────────────────────────────────────────────────

#[test]
fn price_change_between_latest_two() {
    let latest = record(d(2026, 1, 7));
    let prior = Record {
        silver_price: "31.00".into(),
        ..record(d(2026, 1, 6))
    };
    let pc = price_change(&[latest, prior]).unwrap();
    assert!((pc.change - 1.5).abs() < 1e-9);
    assert!((pc.percent - 4.84).abs() < 0.01);
}
