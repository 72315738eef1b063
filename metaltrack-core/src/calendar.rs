//! Futures delivery calendar and report-day reminders.
//!
//! Physically-settled silver futures put pressure on spot positioning around
//! first notice day and last trading day. A record dated within the lookahead
//! window of one of those events picks up a bearish delivery signal.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Days ahead of a record's date that still count as "in window".
pub const DEFAULT_LOOKAHEAD_DAYS: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        })
    }
}

/// A single calendar entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryEvent {
    pub date: NaiveDate,
    #[serde(alias = "event")]
    pub description: String,
    #[serde(default = "default_risk")]
    pub risk: RiskLevel,
}

fn default_risk() -> RiskLevel {
    RiskLevel::High
}

impl DeliveryEvent {
    pub fn new(date: NaiveDate, description: impl Into<String>, risk: RiskLevel) -> Self {
        Self {
            date,
            description: description.into(),
            risk,
        }
    }
}

/// The event matched by a window check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryProximity {
    pub event: DeliveryEvent,
    /// Whole days from the record date to the event (0 = same day).
    pub days_to: i64,
}

/// Ordered event list plus the lookahead window used to match records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryCalendar {
    events: Vec<DeliveryEvent>,
    lookahead_days: i64,
}

impl Default for DeliveryCalendar {
    fn default() -> Self {
        Self::new(default_events(), DEFAULT_LOOKAHEAD_DAYS)
    }
}

impl DeliveryCalendar {
    /// Negative lookahead is clamped to zero (same-day events only).
    pub fn new(events: Vec<DeliveryEvent>, lookahead_days: i64) -> Self {
        Self {
            events,
            lookahead_days: lookahead_days.max(0),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), DEFAULT_LOOKAHEAD_DAYS)
    }

    pub fn events(&self) -> &[DeliveryEvent] {
        &self.events
    }

    pub fn lookahead_days(&self) -> i64 {
        self.lookahead_days
    }

    /// Same lookahead, different events.
    pub fn with_events(&self, events: Vec<DeliveryEvent>) -> Self {
        Self::new(events, self.lookahead_days)
    }

    /// Find the nearest event in `[date, date + lookahead]`, both ends inclusive.
    ///
    /// The smallest `days_to` wins; on a tie the event listed first wins.
    pub fn check_window(&self, date: NaiveDate) -> Option<DeliveryProximity> {
        let mut best: Option<(i64, &DeliveryEvent)> = None;
        for event in &self.events {
            let days_to = (event.date - date).num_days();
            if !(0..=self.lookahead_days).contains(&days_to) {
                continue;
            }
            if best.map_or(true, |(d, _)| days_to < d) {
                best = Some((days_to, event));
            }
        }
        best.map(|(days_to, event)| DeliveryProximity {
            event: event.clone(),
            days_to,
        })
    }

    /// Events on or after `date`, in calendar order.
    pub fn upcoming(&self, date: NaiveDate) -> impl Iterator<Item = &DeliveryEvent> {
        self.events.iter().filter(move |e| e.date >= date)
    }
}

/// COMEX silver (SI) first notice / last trading days for the active months.
pub fn default_events() -> Vec<DeliveryEvent> {
    const EVENTS: [(i32, u32, u32, &str); 12] = [
        (2025, 11, 28, "SIZ25 first notice day"),
        (2025, 12, 29, "SIZ25 last trading day"),
        (2026, 2, 26, "SIH26 first notice day"),
        (2026, 3, 27, "SIH26 last trading day"),
        (2026, 4, 29, "SIK26 first notice day"),
        (2026, 5, 27, "SIK26 last trading day"),
        (2026, 6, 29, "SIN26 first notice day"),
        (2026, 7, 29, "SIN26 last trading day"),
        (2026, 8, 28, "SIU26 first notice day"),
        (2026, 9, 28, "SIU26 last trading day"),
        (2026, 11, 27, "SIZ26 first notice day"),
        (2026, 12, 29, "SIZ26 last trading day"),
    ];
    EVENTS
        .iter()
        .filter_map(|(y, m, d, desc)| {
            NaiveDate::from_ymd_opt(*y, *m, *d).map(|date| DeliveryEvent::new(date, *desc, RiskLevel::High))
        })
        .collect()
}

/// Weekly publication days worth checking data on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportDay {
    /// Mid-week COMEX warehouse stock review.
    ComexInventory,
    /// CFTC Commitments of Traders release.
    CotRelease,
}

impl ReportDay {
    pub fn reminder(&self) -> &'static str {
        match self {
            Self::ComexInventory => "Wednesday: review COMEX registered/eligible inventory",
            Self::CotRelease => "Friday: CFTC COT report released, update commercial positioning",
        }
    }
}

pub fn report_day(date: NaiveDate) -> Option<ReportDay> {
    match date.weekday() {
        Weekday::Wed => Some(ReportDay::ComexInventory),
        Weekday::Fri => Some(ReportDay::CotRelease),
        _ => None,
    }
}
