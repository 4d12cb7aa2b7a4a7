//! Upstream Credential Pool
//!
//! GitHub personal access tokens discovered from `PAT_<n>` configuration
//! keys. The pool is built once at startup and shared read-only.

use std::fmt;
use std::sync::Arc;

/// Prefix of the configuration keys holding GitHub tokens
pub const CREDENTIAL_KEY_PREFIX: &str = "PAT_";

/// Pool size used by fixture pools in tests
pub const TEST_POOL_SIZE: usize = 7;

/// A single opaque upstream access token
///
/// Cloning is cheap. `Debug` and `Display` never print the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(Arc<str>);

impl Credential {
    pub fn new(secret: impl Into<Arc<str>>) -> Self {
        Self(secret.into())
    }

    /// The raw token, for building the `Authorization` header only
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Ordered, fixed-size collection of credentials, indexed 1..=N
#[derive(Debug, Clone, Default)]
pub struct CredentialPool {
    credentials: Vec<Credential>,
}

impl CredentialPool {
    pub fn new(credentials: Vec<Credential>) -> Self {
        Self { credentials }
    }

    /// Build the pool from the process environment
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Build the pool from arbitrary key/value pairs
    ///
    /// Keys matching `PAT_<n>` are ordered by `n`. Numbering gaps are
    /// logged and the remaining tokens are packed contiguously.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut indexed: Vec<(usize, Credential)> = vars
            .into_iter()
            .filter_map(|(key, value)| {
                let index = parse_credential_index(key.as_ref())?;
                let value = value.as_ref().trim();
                if value.is_empty() {
                    tracing::warn!(key = %key.as_ref(), "Ignoring empty GitHub token");
                    return None;
                }
                Some((index, Credential::new(value)))
            })
            .collect();
        indexed.sort_by_key(|(index, _)| *index);

        let contiguous = indexed
            .iter()
            .enumerate()
            .all(|(position, (index, _))| *index == position + 1);
        if !contiguous {
            tracing::warn!(
                indices = ?indexed.iter().map(|(index, _)| *index).collect::<Vec<_>>(),
                "GitHub token numbering has gaps, tokens will be used in ascending order"
            );
        }

        let pool = Self::new(indexed.into_iter().map(|(_, credential)| credential).collect());
        tracing::info!(tokens = pool.len(), "Loaded GitHub token pool");
        pool
    }

    /// A pool of [`TEST_POOL_SIZE`] dummy tokens
    #[cfg(any(test, feature = "testing"))]
    pub fn fixture() -> Self {
        Self::new(
            (1..=TEST_POOL_SIZE)
                .map(|index| Credential::new(format!("test-token-{index}")))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    /// Credential for a 0-based attempt (`PAT_{attempt + 1}`)
    pub fn get(&self, attempt: usize) -> Option<&Credential> {
        self.credentials.get(attempt)
    }

    /// Configuration key naming the credential used on `attempt`
    pub fn label(attempt: usize) -> String {
        format!("{CREDENTIAL_KEY_PREFIX}{}", attempt + 1)
    }
}

fn parse_credential_index(key: &str) -> Option<usize> {
    key.strip_prefix(CREDENTIAL_KEY_PREFIX)?
        .parse::<usize>()
        .ok()
        .filter(|index| *index > 0)
}
