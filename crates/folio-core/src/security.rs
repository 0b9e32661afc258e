//! Security type vocabulary.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of security being charted (`STOCK`, `ETF`, `FUND`, `CASH`, ...).
///
/// Stored upper-cased. Unknown kinds are kept verbatim so panel rules can
/// still be evaluated against them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct SecurityType(String);

impl SecurityType {
    pub const STOCK: &'static str = "STOCK";
    pub const ETF: &'static str = "ETF";
    pub const FUND: &'static str = "FUND";
    pub const CASH: &'static str = "CASH";

    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison against a type name.
    pub fn is(&self, name: &str) -> bool {
        self.0.eq_ignore_ascii_case(name.trim())
    }
}

impl Default for SecurityType {
    fn default() -> Self {
        Self::new(Self::STOCK)
    }
}

impl From<String> for SecurityType {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

impl From<&str> for SecurityType {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<SecurityType> for String {
    fn from(value: SecurityType) -> Self {
        value.0
    }
}

impl fmt::Display for SecurityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
