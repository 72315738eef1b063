use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of one metric on one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Bullish,
    Bearish,
    Neutral,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bullish => "bullish",
            Self::Bearish => "bearish",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bullish/bearish tally over a record's signals. Neutral entries count toward neither.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub bullish: usize,
    pub bearish: usize,
}

impl Summary {
    pub fn new(bullish: usize, bearish: usize) -> Self {
        Self { bullish, bearish }
    }

    pub fn tally<I: IntoIterator<Item = Signal>>(signals: I) -> Self {
        signals.into_iter().fold(Self::default(), |mut acc, s| {
            match s {
                Signal::Bullish => acc.bullish += 1,
                Signal::Bearish => acc.bearish += 1,
                Signal::Neutral => {}
            }
            acc
        })
    }
}
