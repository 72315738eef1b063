//! Advice selection from a signal summary.
//!
//! Tiers are checked in order and the first match wins. Every bearish tier is
//! checked before any bullish one, so equal counts always resolve risk-off.

use serde::Serialize;
use std::fmt;

use crate::domain::Summary;

/// Discrete recommendation, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdviceLevel {
    Reduce80,
    Reduce50,
    Reduce30,
    Accumulate,
    Hold,
    Watch,
}

/// Display band for an advice level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    High,
    Elevated,
    Opportunity,
    Positive,
    Neutral,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Elevated => "elevated",
            Self::Opportunity => "opportunity",
            Self::Positive => "positive",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AdviceLevel {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Reduce80 => "reduce 80%",
            Self::Reduce50 => "reduce 50%",
            Self::Reduce30 => "reduce 30%",
            Self::Accumulate => "accumulate",
            Self::Hold => "hold",
            Self::Watch => "neutral/watch",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::Reduce80 => Severity::Critical,
            Self::Reduce50 => Severity::High,
            Self::Reduce30 => Severity::Elevated,
            Self::Accumulate => Severity::Opportunity,
            Self::Hold => Severity::Positive,
            Self::Watch => Severity::Neutral,
        }
    }

    pub fn action_hint(&self) -> &'static str {
        match self {
            Self::Reduce80 => "act now: cut exposure to a core position",
            Self::Reduce50 => "trim half the position into strength",
            Self::Reduce30 => "take partial profits and tighten stops",
            Self::Accumulate => "buy the dip in tranches",
            Self::Hold => "hold and watch for confirmation",
            Self::Watch => "no edge: wait for clearer signals",
        }
    }

    /// Reverse lookup from a label, used when re-reading exported CSV.
    pub fn from_label(label: &str) -> Option<Self> {
        [
            Self::Reduce80,
            Self::Reduce50,
            Self::Reduce30,
            Self::Accumulate,
            Self::Hold,
            Self::Watch,
        ]
        .into_iter()
        .find(|level| level.label() == label.trim())
    }
}

/// Recommendation derived from a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Advice {
    pub level: AdviceLevel,
    pub label: &'static str,
    pub severity: Severity,
    pub action_hint: &'static str,
}

impl From<AdviceLevel> for Advice {
    fn from(level: AdviceLevel) -> Self {
        Self {
            level,
            label: level.label(),
            severity: level.severity(),
            action_hint: level.action_hint(),
        }
    }
}

impl fmt::Display for Advice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label)
    }
}

pub fn advise(summary: &Summary) -> Advice {
    let level = if summary.bearish >= 5 {
        AdviceLevel::Reduce80
    } else if summary.bearish >= 4 {
        AdviceLevel::Reduce50
    } else if summary.bearish >= 3 {
        AdviceLevel::Reduce30
    } else if summary.bullish >= 4 {
        AdviceLevel::Accumulate
    } else if summary.bullish >= 3 {
        AdviceLevel::Hold
    } else {
        AdviceLevel::Watch
    };
    level.into()
}
