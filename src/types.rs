//! NewType wrappers for identifiers
//!
//! Prevents template/session id confusion at the type level and keeps
//! validation in one place.

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

// ============================================================================
// TEMPLATE ID
// ============================================================================

static TEMPLATE_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9_]*$").unwrap());

/// Strongly-typed analysis template identifier
///
/// Guarantees:
/// - Non-empty
/// - Lowercase snake form (`^[a-z][a-z0-9_]*$`)
/// - Maximum 64 characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TemplateId(String);

impl TemplateId {
    /// Maximum allowed length
    pub const MAX_LENGTH: usize = 64;

    /// Create a new TemplateId with validation
    pub fn new(id: impl AsRef<str>) -> Result<Self, TemplateIdError> {
        let id = id.as_ref();

        if id.is_empty() {
            return Err(TemplateIdError::Empty);
        }
        if id.len() > Self::MAX_LENGTH {
            return Err(TemplateIdError::TooLong(id.len()));
        }
        if !TEMPLATE_ID_RE.is_match(id) {
            return Err(TemplateIdError::InvalidCharacters(id.to_string()));
        }

        Ok(TemplateId(id.to_string()))
    }

    /// Get as string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for TemplateId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TemplateId {
    type Err = TemplateIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TemplateId::new(s)
    }
}

impl TryFrom<String> for TemplateId {
    type Error = TemplateIdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        TemplateId::new(s)
    }
}

impl From<TemplateId> for String {
    fn from(id: TemplateId) -> Self {
        id.0
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TemplateIdError {
    #[error("Template ID cannot be empty")]
    Empty,
    #[error("Template ID too long ({0} > {})", TemplateId::MAX_LENGTH)]
    TooLong(usize),
    #[error("Template ID must be lowercase snake form, got: {0}")]
    InvalidCharacters(String),
}

// ============================================================================
// SESSION ID
// ============================================================================

/// Process-local counter so sessions minted within the same millisecond
/// still get distinct ids.
static SESSION_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Opaque per-execution session identifier
///
/// Minted on `execute`, used only for client-side bookkeeping — never
/// parsed, only displayed and compared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    /// Mint a fresh id: `<prefix>-<unix_millis>-<counter>`.
    pub fn mint(prefix: &str) -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        let seq = SESSION_COUNTER.fetch_add(1, Ordering::Relaxed);
        SessionId(format!("{}-{}-{}", prefix, millis, seq))
    }

    /// Get as string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
