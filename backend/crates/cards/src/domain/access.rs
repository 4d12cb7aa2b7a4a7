//! Access control for card requests
//!
//! A deployment either curates who may use it (allow-lists) or stays open
//! to everyone except a fixed set of abusive usernames (deny-list). Once an
//! allow-list is configured for a resource kind the deny-list no longer
//! applies to it.

use serde::Serialize;

use crate::domain::value_objects::ResourceKind;

/// Usernames refused by open deployments
pub const DEFAULT_BLACKLIST: [&str; 2] = ["renovate-bot", "technical-writer-bot"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DenyReason {
    NotWhitelisted,
    Blacklisted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessDecision {
    pub allowed: bool,
    pub reason: Option<DenyReason>,
}

impl AccessDecision {
    pub const fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    pub const fn deny(reason: DenyReason) -> Self {
        Self {
            allowed: false,
            reason: Some(reason),
        }
    }
}

/// Allow/deny lists loaded at startup
///
/// `None` means the list is not enforced; `Some(vec![])` is enforced and
/// admits nobody.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessLists {
    pub whitelist: Option<Vec<String>>,
    pub gist_whitelist: Option<Vec<String>>,
    pub blacklist: Vec<String>,
}

impl Default for AccessLists {
    fn default() -> Self {
        Self {
            whitelist: None,
            gist_whitelist: None,
            blacklist: DEFAULT_BLACKLIST.iter().map(|name| name.to_string()).collect(),
        }
    }
}

impl AccessLists {
    fn allow_list(&self, kind: ResourceKind) -> Option<&[String]> {
        match kind {
            ResourceKind::Gist => self.gist_whitelist.as_deref(),
            ResourceKind::Username | ResourceKind::WakatimeUsername => self.whitelist.as_deref(),
        }
    }
}

/// Decide whether `identifier` may be served
///
/// Matching is exact and case-sensitive.
pub fn check_access(identifier: &str, kind: ResourceKind, lists: &AccessLists) -> AccessDecision {
    if let Some(allowed) = lists.allow_list(kind) {
        return if allowed.iter().any(|entry| entry == identifier) {
            AccessDecision::allow()
        } else {
            AccessDecision::deny(DenyReason::NotWhitelisted)
        };
    }

    if kind == ResourceKind::Username && lists.blacklist.iter().any(|entry| entry == identifier) {
        return AccessDecision::deny(DenyReason::Blacklisted);
    }

    AccessDecision::allow()
}

/// Shared, read-only access guard
#[derive(Debug, Clone, Default)]
pub struct AccessGuard {
    lists: AccessLists,
}

impl AccessGuard {
    pub fn new(lists: AccessLists) -> Self {
        Self { lists }
    }

    pub fn check(&self, identifier: &str, kind: ResourceKind) -> AccessDecision {
        let decision = check_access(identifier, kind, &self.lists);
        if let Some(reason) = decision.reason {
            tracing::info!(%identifier, %kind, ?reason, "Access denied");
        }
        decision
    }

    pub fn lists(&self) -> &AccessLists {
        &self.lists
    }
}
