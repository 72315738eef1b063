//! Per-record evaluation: classify every metric, then tally.
//!
//! Evaluation runs in two phases. Phase one classifies each metric from its
//! own field (plus the COT direction tag and the delivery calendar). Phase two
//! applies cross-metric rules over the phase-one result; currently only the
//! overheat rule, which turns bullish momentum bearish when the monthly change
//! is already overheated.

use serde::Serialize;
use std::fmt;

use crate::calendar::DeliveryCalendar;
use crate::domain::{CotChange, Record, Signal, Summary};
use crate::thresholds::{classify, parse_numeric, Metric, ThresholdTable};

/// What a risk signal was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SignalSource {
    Metric(Metric),
    DeliveryWindow,
}

impl SignalSource {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Metric(m) => m.label(),
            Self::DeliveryWindow => "Delivery window",
        }
    }
}

impl fmt::Display for SignalSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One classified signal with the text that explains it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskSignal {
    pub source: SignalSource,
    pub display_value: String,
    pub signal: Signal,
    pub reason: String,
}

/// Signals for one record plus their tally.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub signals: Vec<RiskSignal>,
    pub summary: Summary,
}

impl Evaluation {
    pub fn signal_for(&self, source: SignalSource) -> Option<&RiskSignal> {
        self.signals.iter().find(|s| s.source == source)
    }
}

/// Evaluates records against an injected threshold table and delivery calendar.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    thresholds: ThresholdTable,
    calendar: DeliveryCalendar,
}

impl Evaluator {
    pub fn new(thresholds: ThresholdTable, calendar: DeliveryCalendar) -> Self {
        Self {
            thresholds,
            calendar,
        }
    }

    pub fn thresholds(&self) -> &ThresholdTable {
        &self.thresholds
    }

    pub fn calendar(&self) -> &DeliveryCalendar {
        &self.calendar
    }

    /// Same thresholds, different calendar (for datasets that ship their own).
    pub fn with_calendar(&self, calendar: DeliveryCalendar) -> Self {
        Self {
            thresholds: self.thresholds,
            calendar,
        }
    }

    pub fn evaluate(&self, record: &Record) -> Evaluation {
        let mut signals = self.single_metric_signals(record);
        apply_overheat(&mut signals);
        let summary = Summary::tally(signals.iter().map(|s| s.signal));
        Evaluation { signals, summary }
    }

    /// Phase one. Order matters for display only; phase two looks signals up by source.
    fn single_metric_signals(&self, record: &Record) -> Vec<RiskSignal> {
        let mut signals = Vec::with_capacity(7);

        signals.push(self.metric_signal(Metric::GoldSilverRatio, &record.gold_silver_ratio));
        signals.push(self.metric_signal(Metric::ComexInventory, &record.comex_inventory));
        if let Some(raw) = &record.monthly_change {
            signals.push(self.metric_signal(Metric::MonthlyChange, raw));
        }
        if let Some(raw) = &record.weekly_change {
            signals.push(self.metric_signal(Metric::WeeklyChange, raw));
        }
        signals.push(self.metric_signal(Metric::Momentum, &record.momentum));
        signals.push(match record.cot_change {
            Some(tag) => cot_direction_signal(tag, &record.cot_commercial),
            None => self.metric_signal(Metric::CotCommercial, &record.cot_commercial),
        });

        if let Some(hit) = self.calendar.check_window(record.date) {
            signals.push(RiskSignal {
                source: SignalSource::DeliveryWindow,
                display_value: format!("{} ({}d)", hit.event.date, hit.days_to),
                signal: Signal::Bearish,
                reason: format!(
                    "{} in {} day(s), {} risk: delivery pressure on spot",
                    hit.event.description, hit.days_to, hit.event.risk
                ),
            });
        }

        signals
    }

    fn metric_signal(&self, metric: Metric, raw: &str) -> RiskSignal {
        let signal = classify(metric, raw, &self.thresholds);
        RiskSignal {
            source: SignalSource::Metric(metric),
            display_value: display(raw),
            signal,
            reason: metric_reason(metric, signal, raw, &self.thresholds),
        }
    }
}

fn display(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        "-".to_string()
    } else {
        trimmed.to_string()
    }
}

fn cot_direction_signal(tag: CotChange, raw: &str) -> RiskSignal {
    let (signal, reason) = match tag {
        CotChange::ReducedShort => (
            Signal::Bullish,
            "commercials reduced shorts: de-risking ahead of a rally or delivery",
        ),
        CotChange::AddedShort => (
            Signal::Bearish,
            "commercials added shorts: positioning for a pullback",
        ),
    };
    RiskSignal {
        source: SignalSource::Metric(Metric::CotCommercial),
        display_value: format!("{} ({tag})", display(raw)),
        signal,
        reason: reason.to_string(),
    }
}

fn metric_reason(metric: Metric, signal: Signal, raw: &str, table: &ThresholdTable) -> String {
    if parse_numeric(raw).is_none() {
        return "no data".to_string();
    }
    let t = table.get(metric);
    match (metric, signal) {
        (Metric::GoldSilverRatio, Signal::Bullish) => {
            format!("ratio above {}: silver cheap relative to gold", t.bullish)
        }
        (Metric::GoldSilverRatio, Signal::Bearish) => {
            format!("ratio below {}: silver rich relative to gold", t.bearish)
        }
        (Metric::ComexInventory, Signal::Bullish) => {
            format!("inventory above {}M oz: ample supply", t.bullish)
        }
        (Metric::ComexInventory, Signal::Bearish) => {
            format!("inventory below {}M oz: scarcity risk", t.bearish)
        }
        (Metric::Momentum, Signal::Bullish) => format!("momentum above {}: trend intact", t.bullish),
        (Metric::Momentum, Signal::Bearish) => format!("momentum below {}: trend fading", t.bearish),
        (Metric::CotCommercial, Signal::Bullish) => {
            format!("commercial net below {}: short interest normalizing", t.bullish)
        }
        (Metric::CotCommercial, Signal::Bearish) => {
            format!("commercial net above {}: commercials leaning short", t.bearish)
        }
        (Metric::MonthlyChange | Metric::WeeklyChange, Signal::Bullish) => {
            format!("gain below {}%: healthy advance", t.bullish)
        }
        (Metric::MonthlyChange | Metric::WeeklyChange, Signal::Bearish) => {
            format!("gain above {}%: overheated rally", t.bearish)
        }
        (_, Signal::Neutral) => format!("between {} and {}", t.bearish.min(t.bullish), t.bearish.max(t.bullish)),
    }
}

/// Phase two: bullish momentum under an overheated monthly change is chasing the rally.
fn apply_overheat(signals: &mut [RiskSignal]) {
    let overheated = signals.iter().any(|s| {
        s.source == SignalSource::Metric(Metric::MonthlyChange) && s.signal == Signal::Bearish
    });
    if !overheated {
        return;
    }
    if let Some(momentum) = signals
        .iter_mut()
        .find(|s| s.source == SignalSource::Metric(Metric::Momentum))
    {
        if momentum.signal == Signal::Bullish {
            momentum.signal = Signal::Bearish;
            momentum.reason =
                "high momentum while monthly change is overheated: chasing the rally".to_string();
        }
    }
}
