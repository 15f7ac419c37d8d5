//! Core data types for contribtrack

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Discrete activity bucket assigned by GitHub to each day
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContributionLevel {
    None,
    FirstQuartile,
    SecondQuartile,
    ThirdQuartile,
    FourthQuartile,
}

impl ContributionLevel {
    /// All levels in ascending intensity order
    pub const ALL: [ContributionLevel; 5] = [
        Self::None,
        Self::FirstQuartile,
        Self::SecondQuartile,
        Self::ThirdQuartile,
        Self::FourthQuartile,
    ];

    /// Position in the intensity ramp (0 = none, 4 = busiest quartile)
    pub fn index(self) -> usize {
        match self {
            Self::None => 0,
            Self::FirstQuartile => 1,
            Self::SecondQuartile => 2,
            Self::ThirdQuartile => 3,
            Self::FourthQuartile => 4,
        }
    }

    /// Glyph used for plain-text output
    pub fn glyph(self) -> char {
        match self {
            Self::None => '·',
            Self::FirstQuartile => '░',
            Self::SecondQuartile => '▒',
            Self::ThirdQuartile => '▓',
            Self::FourthQuartile => '█',
        }
    }
}

/// A single day of the calendar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionDay {
    pub date: NaiveDate,
    pub count: u64,
    /// Rendering is driven by this, never by `count`
    pub level: ContributionLevel,
}

/// One calendar week (1..=7 days, ascending)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionWeek {
    pub start_date: NaiveDate,
    pub days: Vec<ContributionDay>,
}

/// A year of contribution data as returned by GitHub
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionCalendar {
    pub weeks: Vec<ContributionWeek>,
    /// Server-aggregated total; not recomputed from days
    pub total: u64,
}

/// Why a fetch failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("authentication rejected (HTTP {status})")]
    Auth { status: u16 },

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl FetchError {
    /// Stable tag for log fields
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network(_) => "network",
            Self::Auth { .. } => "auth",
            Self::MalformedResponse(_) => "malformed_response",
        }
    }
}

/// Outcome of the single contribution fetch owned by a view
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchState {
    #[default]
    Loading,
    Loaded(ContributionCalendar),
    Failed(FetchError),
}

impl FetchState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Apply the fetch result. Only the first resolution from `Loading`
    /// takes effect; returns whether the state changed.
    pub fn resolve(&mut self, result: std::result::Result<ContributionCalendar, FetchError>) -> bool {
        if !self.is_loading() {
            tracing::warn!("ignoring second resolution of contribution fetch");
            return false;
        }

        *self = match result {
            Ok(calendar) => Self::Loaded(calendar),
            Err(err) => Self::Failed(err),
        };
        true
    }
}

/// Color scheme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = ContribtrackError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(ContribtrackError::Config(format!(
                "unknown theme '{}' (expected light or dark)",
                other
            ))),
        }
    }
}

/// Crate-level error
#[derive(Debug, Error)]
pub enum ContribtrackError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("preferences error: {0}")]
    Preferences(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ContribtrackError>;
