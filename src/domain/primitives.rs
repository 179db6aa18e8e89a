//! Domain primitives: EntityId, RoundType and calendar helpers.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Opaque identifier for founders, rounds, grants and scenarios.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub String);

impl EntityId {
    /// Create an EntityId from a string.
    pub fn new(id: impl Into<String>) -> Self {
        EntityId(id.into())
    }

    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        EntityId(uuid::Uuid::new_v4().to_string())
    }

    /// Get the id as a string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Financing stage of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoundType {
    PreSeed,
    Seed,
    SeriesA,
    SeriesB,
    SeriesC,
    SeriesD,
}

impl RoundType {
    /// Human-readable label ("Series A").
    pub fn label(&self) -> &'static str {
        match self {
            RoundType::PreSeed => "Pre-Seed",
            RoundType::Seed => "Seed",
            RoundType::SeriesA => "Series A",
            RoundType::SeriesB => "Series B",
            RoundType::SeriesC => "Series C",
            RoundType::SeriesD => "Series D",
        }
    }
}

impl std::fmt::Display for RoundType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RoundType::PreSeed => "pre-seed",
            RoundType::Seed => "seed",
            RoundType::SeriesA => "series-a",
            RoundType::SeriesB => "series-b",
            RoundType::SeriesC => "series-c",
            RoundType::SeriesD => "series-d",
        };
        write!(f, "{}", s)
    }
}

/// Whole calendar months from `earlier` to `later`, truncated toward zero.
///
/// Negative when `later` precedes `earlier`. Adding one month to Jan 31 lands
/// on the last day of February, so Jan 31 -> Feb 28 counts as a full month.
pub fn months_between(later: NaiveDate, earlier: NaiveDate) -> i64 {
    if later < earlier {
        return -months_between(earlier, later);
    }
    let raw = i64::from(later.year() - earlier.year()) * 12 + i64::from(later.month0())
        - i64::from(earlier.month0());
    match add_months(earlier, raw) {
        Some(anniversary) if anniversary > later => raw - 1,
        _ => raw,
    }
}

/// Signed whole days from `earlier` to `later`.
pub fn days_between(later: NaiveDate, earlier: NaiveDate) -> i64 {
    (later - earlier).num_days()
}

/// `date` shifted forward by `months` calendar months, clamped to month end.
pub fn add_months(date: NaiveDate, months: i64) -> Option<NaiveDate> {
    let months = u32::try_from(months).ok()?;
    date.checked_add_months(Months::new(months))
}
