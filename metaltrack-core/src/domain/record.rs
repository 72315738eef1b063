//! Market observation records.
//!
//! Numeric fields are kept as the text they were entered or downloaded as
//! (`"152.3M"`, `"-48,210"`, `"12.5%"`). Parsing happens at classification
//! time so a malformed value degrades to a neutral signal instead of failing
//! the whole dataset load.

use chrono::NaiveDate;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Store-assigned record identifier (insertion sequence).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Qualitative change in commercial short interest from the weekly COT report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CotChange {
    /// Commercials covered shorts.
    ReducedShort,
    /// Commercials added to their shorts.
    AddedShort,
}

impl CotChange {
    /// Parse a direction tag. Accepts `REDUCED SHORT`, `reduced_short`,
    /// `Reduced-Short` and the like; anything else is `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized: String = raw
            .trim()
            .chars()
            .map(|c| if c == '_' || c == '-' { ' ' } else { c.to_ascii_uppercase() })
            .collect();
        match normalized.split_whitespace().collect::<Vec<_>>().as_slice() {
            ["REDUCED", "SHORT"] | ["REDUCED", "SHORTS"] => Some(Self::ReducedShort),
            ["ADDED", "SHORT"] | ["ADDED", "SHORTS"] => Some(Self::AddedShort),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReducedShort => "REDUCED SHORT",
            Self::AddedShort => "ADDED SHORT",
        }
    }
}

impl fmt::Display for CotChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CotChange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One observation point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "loose_text")]
    pub silver_price: String,
    #[serde(default, deserialize_with = "loose_text")]
    pub gold_price: String,
    #[serde(default, deserialize_with = "loose_text")]
    pub gold_silver_ratio: String,
    #[serde(default, deserialize_with = "loose_text")]
    pub momentum: String,
    #[serde(default, deserialize_with = "loose_text")]
    pub comex_inventory: String,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub comex_eligible: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub comex_total: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub cot_commercial: String,
    #[serde(default, deserialize_with = "cot_change_tag", skip_serializing_if = "Option::is_none")]
    pub cot_change: Option<CotChange>,
    #[serde(default, deserialize_with = "loose_text")]
    pub cot_speculator: String,
    #[serde(default, deserialize_with = "loose_text")]
    pub slv_holdings: String,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub pslv_holdings: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub monthly_change: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub weekly_change: Option<String>,
    /// Free-text delivery window note as entered; not used for evaluation.
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub delivery_window: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub note: String,
}

impl Record {
    /// Blank record for a date. Every numeric field is empty.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            silver_price: String::new(),
            gold_price: String::new(),
            gold_silver_ratio: String::new(),
            momentum: String::new(),
            comex_inventory: String::new(),
            comex_eligible: None,
            comex_total: None,
            cot_commercial: String::new(),
            cot_change: None,
            cot_speculator: String::new(),
            slv_holdings: String::new(),
            pslv_holdings: None,
            monthly_change: None,
            weekly_change: None,
            delivery_window: None,
            note: String::new(),
        }
    }
}

/// A record together with the id the store assigned to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: RecordId,
    #[serde(flatten)]
    pub record: Record,
}

/// Any JSON scalar a hand-maintained data file might put in a text field.
#[derive(Deserialize)]
#[serde(untagged)]
enum LooseText {
    Text(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Flag(bool),
    Other(IgnoredAny),
}

impl LooseText {
    fn into_text(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Int(n) => n.to_string(),
            Self::Uint(n) => n.to_string(),
            Self::Float(n) => n.to_string(),
            Self::Flag(b) => b.to_string(),
            Self::Other(_) => String::new(),
        }
    }
}

fn loose_option<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<LooseText> = Option::deserialize(deserializer)?;
    Ok(raw.map(LooseText::into_text))
}

/// Numeric-as-text field: strings pass through, numbers become their text,
/// `null` and arrays/objects become `""` (classified neutral later).
pub fn loose_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(loose_option(deserializer)?.unwrap_or_default())
}

/// Treat missing, null, empty and whitespace-only values as absent.
pub fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = loose_option(deserializer)?;
    Ok(raw.and_then(|s| if s.trim().is_empty() { None } else { Some(s) }))
}

/// Unknown COT tags are dropped rather than failing the load.
fn cot_change_tag<'de, D>(deserializer: D) -> Result<Option<CotChange>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = loose_option(deserializer)?;
    Ok(raw.as_deref().and_then(CotChange::parse))
}
