//! Domain Value Objects
//!
//! Immutable value types for the cards domain.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// What an identifier passed to the access guard refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Username,
    Gist,
    WakatimeUsername,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Username => "username",
            ResourceKind::Gist => "gist",
            ResourceKind::WakatimeUsername => "wakatime",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid resource kind: {0}")]
pub struct InvalidResourceKind(pub String);

impl FromStr for ResourceKind {
    type Err = InvalidResourceKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "username" => Ok(ResourceKind::Username),
            "gist" => Ok(ResourceKind::Gist),
            "wakatime" => Ok(ResourceKind::WakatimeUsername),
            other => Err(InvalidResourceKind(other.to_string())),
        }
    }
}

/// Number of languages shown on the top-languages card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LangsCount(usize);

impl LangsCount {
    pub const DEFAULT: LangsCount = LangsCount(5);
    pub const MIN: usize = 1;
    pub const MAX: usize = 20;

    /// Out-of-range requests are clamped rather than rejected
    pub fn clamped(count: i64) -> Self {
        Self(count.clamp(Self::MIN as i64, Self::MAX as i64) as usize)
    }

    pub fn get(&self) -> usize {
        self.0
    }
}

impl Default for LangsCount {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Window of the activity card, in days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityDays(usize);

impl ActivityDays {
    pub const DEFAULT: ActivityDays = ActivityDays(31);
    pub const MIN: usize = 1;
    pub const MAX: usize = 365;

    pub fn clamped(days: i64) -> Self {
        Self(days.clamp(Self::MIN as i64, Self::MAX as i64) as usize)
    }

    pub fn get(&self) -> usize {
        self.0
    }
}

impl Default for ActivityDays {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Exponents applied to a language's byte size and repository count
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LanguageWeights {
    pub size: f64,
    pub count: f64,
}

impl Default for LanguageWeights {
    fn default() -> Self {
        Self {
            size: 1.0,
            count: 0.0,
        }
    }
}

/// Optional stats rows that cost extra upstream fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsExtras {
    pub merged_prs: bool,
    pub discussions_started: bool,
    pub discussions_answered: bool,
}

impl StatsExtras {
    /// Parse the `show` list (`prs_merged`, `prs_merged_percentage`, ...)
    pub fn from_show<S: AsRef<str>>(show: &[S]) -> Self {
        let has = |name: &str| show.iter().any(|item| item.as_ref() == name);
        Self {
            merged_prs: has("prs_merged") || has("prs_merged_percentage"),
            discussions_started: has("discussions_started"),
            discussions_answered: has("discussions_answered"),
        }
    }
}
