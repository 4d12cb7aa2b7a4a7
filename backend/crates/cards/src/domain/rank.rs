//! Rank scoring
//!
//! Turns raw GitHub activity counts into a lower-is-better percentile and a
//! letter level. Every metric is normalized by a reference median and fed
//! through a CDF curve; the weighted mean is inverted into the percentile.
//!
//! The medians, weights and thresholds below are user-visible: changing any
//! of them changes every rank that has ever been shown.

use std::fmt;

use serde::{Serialize, Serializer};

/// Commit median when all-time commits are counted
pub const ALL_COMMITS_MEDIAN: f64 = 1000.0;
/// Commit median for the one-year window
pub const COMMITS_MEDIAN: f64 = 250.0;
pub const PRS_MEDIAN: f64 = 50.0;
pub const ISSUES_MEDIAN: f64 = 25.0;
pub const REVIEWS_MEDIAN: f64 = 2.0;
pub const STARS_MEDIAN: f64 = 50.0;
pub const FOLLOWERS_MEDIAN: f64 = 10.0;

pub const COMMITS_WEIGHT: f64 = 2.0;
pub const PRS_WEIGHT: f64 = 3.0;
pub const ISSUES_WEIGHT: f64 = 1.0;
pub const REVIEWS_WEIGHT: f64 = 1.0;
pub const STARS_WEIGHT: f64 = 4.0;
pub const FOLLOWERS_WEIGHT: f64 = 1.0;

const TOTAL_WEIGHT: f64 =
    COMMITS_WEIGHT + PRS_WEIGHT + ISSUES_WEIGHT + REVIEWS_WEIGHT + STARS_WEIGHT + FOLLOWERS_WEIGHT;

/// Letter level of a rank, best first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RankLevel {
    S,
    APlus,
    A,
    AMinus,
    BPlus,
    B,
    BMinus,
    CPlus,
    C,
}

impl RankLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RankLevel::S => "S",
            RankLevel::APlus => "A+",
            RankLevel::A => "A",
            RankLevel::AMinus => "A-",
            RankLevel::BPlus => "B+",
            RankLevel::B => "B",
            RankLevel::BMinus => "B-",
            RankLevel::CPlus => "C+",
            RankLevel::C => "C",
        }
    }
}

impl fmt::Display for RankLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RankLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Upper percentile bound of each level, ascending
const LEVEL_THRESHOLDS: [(f64, RankLevel); 9] = [
    (1.0, RankLevel::S),
    (12.5, RankLevel::APlus),
    (25.0, RankLevel::A),
    (37.5, RankLevel::AMinus),
    (50.0, RankLevel::BPlus),
    (62.5, RankLevel::B),
    (75.0, RankLevel::BMinus),
    (87.5, RankLevel::CPlus),
    (100.0, RankLevel::C),
];

/// Activity counts a rank is computed from
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RankInput {
    /// `commits` spans the whole history instead of one year
    pub all_commits: bool,
    pub commits: u64,
    pub prs: u64,
    pub issues: u64,
    pub reviews: u64,
    /// Accepted for completeness, not scored
    pub repos: u64,
    pub stars: u64,
    pub followers: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankResult {
    pub level: RankLevel,
    /// Lower is better, within `[0, 100]`
    pub percentile: f64,
}

fn exponential_cdf(x: f64) -> f64 {
    1.0 - 2f64.powf(-x)
}

fn log_normal_cdf(x: f64) -> f64 {
    // approximation
    x / (1.0 + x)
}

/// Compute the rank for a set of activity counts
///
/// Total over its input domain; all-zero input yields level C at 100.
pub fn calculate_rank(input: &RankInput) -> RankResult {
    let commits_median = if input.all_commits {
        ALL_COMMITS_MEDIAN
    } else {
        COMMITS_MEDIAN
    };

    let score = COMMITS_WEIGHT * exponential_cdf(input.commits as f64 / commits_median)
        + PRS_WEIGHT * exponential_cdf(input.prs as f64 / PRS_MEDIAN)
        + ISSUES_WEIGHT * exponential_cdf(input.issues as f64 / ISSUES_MEDIAN)
        + REVIEWS_WEIGHT * exponential_cdf(input.reviews as f64 / REVIEWS_MEDIAN)
        + STARS_WEIGHT * log_normal_cdf(input.stars as f64 / STARS_MEDIAN)
        + FOLLOWERS_WEIGHT * log_normal_cdf(input.followers as f64 / FOLLOWERS_MEDIAN);

    let percentile = (1.0 - score / TOTAL_WEIGHT) * 100.0;

    let level = LEVEL_THRESHOLDS
        .iter()
        .find(|(threshold, _)| percentile <= *threshold)
        .map_or(RankLevel::C, |(_, level)| *level);

    RankResult { level, percentile }
}
