use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder spellings that mean "no region selected".
const NO_CHOICE: [&str; 3] = ["", "0", "none"];

/// Region code, e.g. a two-letter state abbreviation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionCode(String);

impl RegionCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses a picker value, mapping the empty-state spellings to `None`.
    ///
    /// ```rust
    /// use eco_domain::RegionCode;
    ///
    /// assert_eq!(RegionCode::parse_choice(" CE "), Some(RegionCode::new("CE")));
    /// assert_eq!(RegionCode::parse_choice("0"), None);
    /// ```
    #[must_use]
    pub fn parse_choice(raw: &str) -> Option<Self> {
        if is_no_choice(raw) { None } else { Some(Self(raw.trim().to_owned())) }
    }
}

/// Whether a picker value is one of the empty-state spellings (`""`, `"0"`, `"none"`).
#[must_use]
pub fn is_no_choice(raw: &str) -> bool {
    let trimmed = raw.trim();
    NO_CHOICE.iter().any(|none| trimmed.eq_ignore_ascii_case(none))
}

impl fmt::Display for RegionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RegionCode {
    fn from(code: &str) -> Self {
        Self(code.to_owned())
    }
}

/// Top-level administrative area used to scope locality lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    #[serde(alias = "sigla")]
    pub code: RegionCode,
    #[serde(alias = "nome")]
    pub name: String,
}

impl Region {
    /// Picker label, `"CE - Ceará"`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} - {}", self.code, self.name)
    }
}

/// Named sub-area of exactly one region.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locality {
    pub region: RegionCode,
    pub name: String,
}
