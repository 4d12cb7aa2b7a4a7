//! Cache-Control policy for card responses
//!
//! Each card has its own default lifetime and an allowed range for the
//! `cache_seconds` query parameter. A deployment-wide override replaces
//! whatever the request asked for.

pub const MINUTE: i64 = 60;
pub const HOUR: i64 = 60 * MINUTE;
pub const DAY: i64 = 24 * HOUR;

/// Lifetime for error responses
pub const ERROR_TTL: i64 = 10 * MINUTE;

const STALE_WHILE_REVALIDATE: i64 = DAY;
const NO_CACHE: &str = "no-cache, no-store, must-revalidate";

/// Default and allowed range of a card's cache lifetime, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtl {
    pub default: i64,
    pub min: i64,
    pub max: i64,
}

impl CacheTtl {
    pub const STATS: Self = Self::new(DAY, 12 * HOUR, 2 * DAY);
    pub const TOP_LANGS: Self = Self::new(6 * DAY, 2 * DAY, 10 * DAY);
    pub const PIN: Self = Self::new(10 * DAY, DAY, 10 * DAY);
    pub const GIST: Self = Self::new(2 * DAY, DAY, 10 * DAY);
    pub const WAKATIME: Self = Self::new(DAY, 12 * HOUR, 2 * DAY);
    pub const STREAK: Self = Self::new(DAY, 12 * HOUR, 2 * DAY);
    pub const ACTIVITY: Self = Self::STREAK;

    pub const fn new(default: i64, min: i64, max: i64) -> Self {
        Self { default, min, max }
    }
}

/// Value of the `CACHE_SECONDS` deployment override
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOverride {
    Seconds(i64),
    /// Set but not a number: cards fall back to their default lifetime
    Unparseable,
}

impl CacheOverride {
    pub fn parse(raw: &str) -> Self {
        parse_int(raw).map_or(Self::Unparseable, Self::Seconds)
    }
}

/// Deployment-wide caching behaviour
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CachePolicy {
    pub override_seconds: Option<CacheOverride>,
    /// Development mode: never cache
    pub disabled: bool,
}

impl CachePolicy {
    /// Effective lifetime for one card response
    pub fn resolve(&self, ttl: CacheTtl, requested: Option<i64>) -> i64 {
        let seconds = requested.unwrap_or(ttl.default).clamp(ttl.min, ttl.max);
        match self.override_seconds {
            Some(CacheOverride::Seconds(seconds)) => seconds,
            Some(CacheOverride::Unparseable) => ttl.default,
            None => seconds,
        }
    }

    /// `Cache-Control` value for a successful card response
    pub fn header_value(&self, seconds: i64) -> String {
        if seconds < 1 || self.disabled {
            return NO_CACHE.to_string();
        }
        format!("max-age={seconds}, s-maxage={seconds}, stale-while-revalidate={STALE_WHILE_REVALIDATE}")
    }

    /// `Cache-Control` value for an error response
    pub fn error_header_value(&self) -> String {
        let override_disables =
            matches!(self.override_seconds, Some(CacheOverride::Seconds(seconds)) if seconds < 1);
        if override_disables || self.disabled {
            return NO_CACHE.to_string();
        }
        format!("max-age={ERROR_TTL}, s-maxage={ERROR_TTL}, stale-while-revalidate={STALE_WHILE_REVALIDATE}")
    }
}

/// Lenient integer parsing: leading sign and digits, trailing junk ignored
///
/// `"3600"`, `" 3600s"` and `"-1"` parse; `""` and `"abc"` do not.
pub fn parse_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (sign, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|value| sign * value)
}
