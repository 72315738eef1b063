//! Shape of the published JSON data file.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use super::record::{empty_as_none, Record};
use crate::calendar::DeliveryEvent;

pub const DEFAULT_SOURCE: &str = "silverdata.io";

fn default_source() -> String {
    DEFAULT_SOURCE.to_string()
}

/// A dataset as published: records are ordered most-recent-first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataFile {
    #[serde(default)]
    pub last_updated: String,
    #[serde(default = "default_source")]
    pub source: String,
    pub records: Vec<Record>,
    #[serde(default, deserialize_with = "display_block", skip_serializing_if = "Option::is_none")]
    pub market_insights: Option<MarketInsights>,
    #[serde(
        rename = "priceRange52Week",
        default,
        deserialize_with = "display_block",
        skip_serializing_if = "Option::is_none"
    )]
    pub price_range_52_week: Option<PriceRange>,
    /// Replaces the configured calendar for this dataset when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_calendar: Option<Vec<DeliveryEvent>>,
}

/// Display-only block: anything that does not fit the expected shape is
/// dropped instead of failing the records it ships with.
#[derive(Deserialize)]
#[serde(untagged)]
enum Block<T> {
    Parsed(T),
    Skipped(IgnoredAny),
}

fn display_block<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let block: Option<Block<T>> = Option::deserialize(deserializer)?;
    Ok(match block {
        Some(Block::Parsed(value)) => Some(value),
        Some(Block::Skipped(_)) | None => None,
    })
}

/// Editorial commentary shipped with the data file. Display only; each
/// sub-block is independent and may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketInsights {
    #[serde(default, deserialize_with = "display_block", skip_serializing_if = "Option::is_none")]
    pub gold_silver_ratio: Option<RatioInsight>,
    #[serde(default, deserialize_with = "display_block", skip_serializing_if = "Option::is_none")]
    pub cot_positioning: Option<CotInsight>,
    #[serde(default, deserialize_with = "display_block", skip_serializing_if = "Option::is_none")]
    pub momentum: Option<MomentumInsight>,
    #[serde(default, deserialize_with = "display_block", skip_serializing_if = "Option::is_none")]
    pub technical: Option<TechnicalInsight>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RatioInsight {
    pub value: f64,
    pub percentile: f64,
    pub signal: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CotInsight {
    pub commercial: f64,
    pub managed_money: f64,
    pub signal: String,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub change: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MomentumInsight {
    pub score: f64,
    pub signal: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TechnicalInsight {
    pub rsi: f64,
    pub sma50: f64,
    pub sma200: f64,
    pub price_vs_sma50: String,
    pub signal: String,
}

/// 52-week silver price range.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PriceRange {
    pub low: f64,
    pub high: f64,
    pub current_from_low: String,
    pub current_from_high: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_file_defaults_source() {
        let file: DataFile = serde_json::from_str(
            r#"{"lastUpdated": "2025-01-15", "records": [{"date": "2025-01-15"}]}"#,
        )
        .unwrap();
        assert_eq!(file.source, DEFAULT_SOURCE);
        assert_eq!(file.records.len(), 1);
        assert!(file.market_insights.is_none());
        assert!(file.delivery_calendar.is_none());
    }

    #[test]
    fn parses_insights_and_range() {
        let json = r#"{
            "lastUpdated": "2025-01-15T08:00:00Z",
            "source": "manual",
            "records": [],
            "marketInsights": {
                "goldSilverRatio": {"value": 81.5, "percentile": 88, "signal": "bullish", "description": "silver cheap"},
                "cotPositioning": {"commercial": -52000, "managedMoney": 41000, "signal": "neutral", "change": "REDUCED SHORT", "description": "covering"},
                "momentum": {"score": 64, "signal": "neutral", "description": "flat"},
                "technical": {"rsi": 55.2, "sma50": 31.1, "sma200": 29.4, "priceVsSma50": "+4.5%", "signal": "bullish"}
            },
            "priceRange52Week": {"low": 22.1, "high": 34.9, "currentFromLow": "+47%", "currentFromHigh": "-7%"},
            "deliveryCalendar": [{"date": "2025-02-26", "description": "SIH25 first notice day", "risk": "high"}]
        }"#;
        let file: DataFile = serde_json::from_str(json).unwrap();
        let insights = file.market_insights.unwrap();
        assert_eq!(
            insights.cot_positioning.unwrap().change.as_deref(),
            Some("REDUCED SHORT")
        );
        assert_eq!(insights.technical.unwrap().price_vs_sma50, "+4.5%");
        assert_eq!(file.price_range_52_week.unwrap().high, 34.9);
        assert_eq!(file.delivery_calendar.unwrap().len(), 1);
    }

    #[test]
    fn partial_insights_keep_records() {
        let json = r#"{
            "records": [{"date": "2026-01-07", "silverPrice": "32.50"}],
            "marketInsights": {
                "goldSilverRatio": {"value": 81.5, "signal": "bullish"}
            }
        }"#;
        let file: DataFile = serde_json::from_str(json).unwrap();
        assert_eq!(file.records.len(), 1);
        let insights = file.market_insights.unwrap();
        let ratio = insights.gold_silver_ratio.unwrap();
        assert_eq!(ratio.value, 81.5);
        assert_eq!(ratio.description, "");
        assert!(insights.cot_positioning.is_none());
        assert!(insights.technical.is_none());
    }

    #[test]
    fn malformed_display_blocks_are_dropped() {
        let json = r#"{
            "records": [{"date": "2026-01-07", "silverPrice": "32.50"}],
            "marketInsights": {
                "momentum": {"score": "strong"},
                "technical": "n/a"
            },
            "priceRange52Week": "n/a"
        }"#;
        let file: DataFile = serde_json::from_str(json).unwrap();
        assert_eq!(file.records.len(), 1);
        let insights = file.market_insights.unwrap();
        assert!(insights.momentum.is_none());
        assert!(insights.technical.is_none());
        assert!(file.price_range_52_week.is_none());

        let file: DataFile =
            serde_json::from_str(r#"{"records": [], "marketInsights": 7}"#).unwrap();
        assert!(file.market_insights.is_none());
    }
}
