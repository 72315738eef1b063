//! Day-over-day silver price change.

use serde::Serialize;

use crate::domain::Record;
use crate::thresholds::parse_numeric;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceChange {
    pub change: f64,
    pub percent: f64,
}

/// Change between the two most recent records (index 0 is the latest).
///
/// `None` with fewer than two records, or when either price is missing,
/// unparseable, or zero.
pub fn price_change(records: &[Record]) -> Option<PriceChange> {
    let [latest, prior, ..] = records else {
        return None;
    };
    let today = parse_numeric(&latest.silver_price).filter(|v| *v != 0.0)?;
    let previous = parse_numeric(&prior.silver_price).filter(|v| *v != 0.0)?;
    let change = today - previous;
    Some(PriceChange {
        change,
        percent: change / previous * 100.0,
    })
}
