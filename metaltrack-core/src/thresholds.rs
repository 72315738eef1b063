//! Threshold table and single-metric signal classification.
//!
//! Each metric compares against a bullish/bearish bound pair, but the
//! direction of comparison is fixed per metric:
//!
//! | Metric            | Bullish when      | Bearish when      |
//! |-------------------|-------------------|-------------------|
//! | gold/silver ratio | above `bullish`   | below `bearish`   |
//! | COMEX inventory   | above `bullish`   | below `bearish`   |
//! | momentum          | above `bullish`   | below `bearish`   |
//! | COT commercial    | below `bullish`   | above `bearish`   |
//! | monthly change    | below `bullish`   | above `bearish`   |
//! | weekly change     | below `bullish`   | above `bearish`   |
//!
//! Values sitting exactly on a bound are neutral.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::Signal;

/// A metric the classifier knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    GoldSilverRatio,
    ComexInventory,
    Momentum,
    CotCommercial,
    MonthlyChange,
    WeeklyChange,
}

/// Which side of the bound pair is the bullish one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    HigherIsBullish,
    LowerIsBullish,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::GoldSilverRatio,
        Metric::ComexInventory,
        Metric::Momentum,
        Metric::CotCommercial,
        Metric::MonthlyChange,
        Metric::WeeklyChange,
    ];

    /// Field name as it appears in the data file.
    pub fn key(&self) -> &'static str {
        match self {
            Self::GoldSilverRatio => "goldSilverRatio",
            Self::ComexInventory => "comexInventory",
            Self::Momentum => "momentum",
            Self::CotCommercial => "cotCommercial",
            Self::MonthlyChange => "monthlyChange",
            Self::WeeklyChange => "weeklyChange",
        }
    }

    /// Human-readable name.
    pub fn label(&self) -> &'static str {
        match self {
            Self::GoldSilverRatio => "Gold/Silver ratio",
            Self::ComexInventory => "COMEX inventory",
            Self::Momentum => "Momentum",
            Self::CotCommercial => "COT commercial",
            Self::MonthlyChange => "Monthly change",
            Self::WeeklyChange => "Weekly change",
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            Self::GoldSilverRatio | Self::ComexInventory | Self::Momentum => {
                Direction::HigherIsBullish
            }
            Self::CotCommercial | Self::MonthlyChange | Self::WeeklyChange => {
                Direction::LowerIsBullish
            }
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.key().eq_ignore_ascii_case(key))
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Bullish/bearish bound pair for one metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricThreshold {
    pub bullish: f64,
    pub bearish: f64,
}

impl MetricThreshold {
    pub const fn new(bullish: f64, bearish: f64) -> Self {
        Self { bullish, bearish }
    }
}

/// Per-metric thresholds. Any entry missing from a config file keeps its default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdTable {
    #[serde(alias = "goldSilverRatio")]
    pub gold_silver_ratio: MetricThreshold,
    #[serde(alias = "comexInventory")]
    pub comex_inventory: MetricThreshold,
    pub momentum: MetricThreshold,
    #[serde(alias = "cotCommercial")]
    pub cot_commercial: MetricThreshold,
    #[serde(alias = "monthlyChange")]
    pub monthly_change: MetricThreshold,
    #[serde(alias = "weeklyChange")]
    pub weekly_change: MetricThreshold,
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self {
            // High ratio = silver cheap relative to gold.
            gold_silver_ratio: MetricThreshold::new(80.0, 50.0),
            // Million troy ounces, registered.
            comex_inventory: MetricThreshold::new(150.0, 120.0),
            momentum: MetricThreshold::new(70.0, 30.0),
            // Net commercial contracts.
            cot_commercial: MetricThreshold::new(-50_000.0, -20_000.0),
            // Percent.
            monthly_change: MetricThreshold::new(10.0, 25.0),
            weekly_change: MetricThreshold::new(5.0, 10.0),
        }
    }
}

impl ThresholdTable {
    pub fn get(&self, metric: Metric) -> MetricThreshold {
        match metric {
            Metric::GoldSilverRatio => self.gold_silver_ratio,
            Metric::ComexInventory => self.comex_inventory,
            Metric::Momentum => self.momentum,
            Metric::CotCommercial => self.cot_commercial,
            Metric::MonthlyChange => self.monthly_change,
            Metric::WeeklyChange => self.weekly_change,
        }
    }

    /// Copy of the table with one entry replaced.
    pub fn with(mut self, metric: Metric, threshold: MetricThreshold) -> Self {
        let slot = match metric {
            Metric::GoldSilverRatio => &mut self.gold_silver_ratio,
            Metric::ComexInventory => &mut self.comex_inventory,
            Metric::Momentum => &mut self.momentum,
            Metric::CotCommercial => &mut self.cot_commercial,
            Metric::MonthlyChange => &mut self.monthly_change,
            Metric::WeeklyChange => &mut self.weekly_change,
        };
        *slot = threshold;
        self
    }

    /// Entries whose bounds are ordered backwards for the metric's direction.
    ///
    /// A backwards pair lets a single value be both above the bullish bound
    /// and below the bearish one; classification still works (bullish is
    /// checked first) but the neutral band disappears.
    pub fn inverted(&self) -> Vec<Metric> {
        Metric::ALL
            .into_iter()
            .filter(|m| {
                let t = self.get(*m);
                match m.direction() {
                    Direction::HigherIsBullish => t.bullish < t.bearish,
                    Direction::LowerIsBullish => t.bullish > t.bearish,
                }
            })
            .collect()
    }
}

/// Parse a numeric-as-text field.
///
/// Strips surrounding whitespace, a leading `+`, thousands separators and a
/// trailing unit suffix (`M`, `oz`, `%`). Returns `None` for anything that
/// does not leave a finite number behind.
pub fn parse_numeric(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let without_unit = trimmed
        .trim_end_matches(|c: char| c.is_ascii_alphabetic() || c == '%')
        .trim_end();
    let unsigned = without_unit.strip_prefix('+').unwrap_or(without_unit);
    let cleaned: String = unsigned.chars().filter(|c| *c != ',').collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Classify a raw field value for `metric`.
///
/// Empty or unparseable input is neutral: missing data carries no opinion.
pub fn classify(metric: Metric, raw: &str, table: &ThresholdTable) -> Signal {
    match parse_numeric(raw) {
        Some(value) => classify_value(metric, value, table),
        None => Signal::Neutral,
    }
}

/// Classify an already-parsed value.
pub fn classify_value(metric: Metric, value: f64, table: &ThresholdTable) -> Signal {
    let t = table.get(metric);
    match metric.direction() {
        Direction::HigherIsBullish => {
            if value > t.bullish {
                Signal::Bullish
            } else if value < t.bearish {
                Signal::Bearish
            } else {
                Signal::Neutral
            }
        }
        Direction::LowerIsBullish => {
            if value < t.bullish {
                Signal::Bullish
            } else if value > t.bearish {
                Signal::Bearish
            } else {
                Signal::Neutral
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_strips_units_and_separators() {
        assert_eq!(parse_numeric("152.3M"), Some(152.3));
        assert_eq!(parse_numeric(" -48,210 "), Some(-48_210.0));
        assert_eq!(parse_numeric("+12.5%"), Some(12.5));
        assert_eq!(parse_numeric("31.00"), Some(31.0));
        assert_eq!(parse_numeric("14500 oz"), Some(14_500.0));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(parse_numeric(""), None);
        assert_eq!(parse_numeric("   "), None);
        assert_eq!(parse_numeric("n/a"), None);
        assert_eq!(parse_numeric("NaN"), None);
        assert_eq!(parse_numeric("M"), None);
        assert_eq!(parse_numeric("-"), None);
    }

    #[test]
    fn comex_inventory_bounds() {
        let t = ThresholdTable::default();
        assert_eq!(classify(Metric::ComexInventory, "150.1M", &t), Signal::Bullish);
        assert_eq!(classify(Metric::ComexInventory, "150M", &t), Signal::Neutral);
        assert_eq!(classify(Metric::ComexInventory, "135", &t), Signal::Neutral);
        assert_eq!(classify(Metric::ComexInventory, "120", &t), Signal::Neutral);
        assert_eq!(classify(Metric::ComexInventory, "119.9M", &t), Signal::Bearish);
    }

    #[test]
    fn high_ratio_is_bullish() {
        let t = ThresholdTable::default();
        assert_eq!(classify(Metric::GoldSilverRatio, "85.2", &t), Signal::Bullish);
        assert_eq!(classify(Metric::GoldSilverRatio, "65", &t), Signal::Neutral);
        assert_eq!(classify(Metric::GoldSilverRatio, "45", &t), Signal::Bearish);
    }

    #[test]
    fn momentum_trend_following() {
        let t = ThresholdTable::default();
        assert_eq!(classify(Metric::Momentum, "75", &t), Signal::Bullish);
        assert_eq!(classify(Metric::Momentum, "50", &t), Signal::Neutral);
        assert_eq!(classify(Metric::Momentum, "25", &t), Signal::Bearish);
    }

    #[test]
    fn cot_commercial_more_negative_is_bullish() {
        let t = ThresholdTable::default();
        assert_eq!(classify(Metric::CotCommercial, "-60000", &t), Signal::Bullish);
        assert_eq!(classify(Metric::CotCommercial, "-35,000", &t), Signal::Neutral);
        assert_eq!(classify(Metric::CotCommercial, "-10000", &t), Signal::Bearish);
        assert_eq!(classify(Metric::CotCommercial, "5000", &t), Signal::Bearish);
    }

    #[test]
    fn change_metrics_have_three_bands() {
        let t = ThresholdTable::default();
        assert_eq!(classify(Metric::MonthlyChange, "6%", &t), Signal::Bullish);
        assert_eq!(classify(Metric::MonthlyChange, "18%", &t), Signal::Neutral);
        assert_eq!(classify(Metric::MonthlyChange, "31.5%", &t), Signal::Bearish);
        assert_eq!(classify(Metric::WeeklyChange, "2", &t), Signal::Bullish);
        assert_eq!(classify(Metric::WeeklyChange, "7", &t), Signal::Neutral);
        assert_eq!(classify(Metric::WeeklyChange, "12", &t), Signal::Bearish);
    }

    #[test]
    fn empty_is_neutral_for_every_metric() {
        let t = ThresholdTable::default();
        for metric in Metric::ALL {
            assert_eq!(classify(metric, "", &t), Signal::Neutral, "{metric}");
            assert_eq!(classify(metric, "--", &t), Signal::Neutral, "{metric}");
        }
    }

    #[test]
    fn with_replaces_single_entry() {
        let t = ThresholdTable::default().with(Metric::Momentum, MetricThreshold::new(60.0, 40.0));
        assert_eq!(t.momentum, MetricThreshold::new(60.0, 40.0));
        assert_eq!(t.comex_inventory, ThresholdTable::default().comex_inventory);
        assert_eq!(classify(Metric::Momentum, "65", &t), Signal::Bullish);
    }

    #[test]
    fn default_table_is_not_inverted() {
        assert!(ThresholdTable::default().inverted().is_empty());
        let bad = ThresholdTable::default().with(Metric::CotCommercial, MetricThreshold::new(0.0, -1.0));
        assert_eq!(bad.inverted(), vec![Metric::CotCommercial]);
    }

    #[test]
    fn metric_keys_round_trip() {
        for metric in Metric::ALL {
            assert_eq!(Metric::from_key(metric.key()), Some(metric));
        }
        assert_eq!(Metric::from_key("slvHoldings"), None);
    }
}
