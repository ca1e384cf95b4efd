//! Enum types for tdvt.
//!
//! [`DataType`] has:
//! - Custom Serialize (as the lowercase tag string)
//! - Custom Deserialize (known variants + catch-all `Other(String)`)
//! - `as_str()`, `is_builtin()`, `Display`, infallible `FromStr`

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

// ===========================================================================
// DataType
// ===========================================================================

/// Logical type of a literal embedded in generated expression text.
///
/// Tags are matched exactly; anything unrecognised lands in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DataType {
    String,
    Date,
    Time,
    DateTime,
    Integer,
    Real,
    Bool,
    /// Catch-all for tags without a named variant.
    Other(String),
}

impl DataType {
    /// Every named variant, in declaration order.
    pub const BUILTIN: &'static [DataType] = &[
        Self::String,
        Self::Date,
        Self::Time,
        Self::DateTime,
        Self::Integer,
        Self::Real,
        Self::Bool,
    ];

    /// Returns the string representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Date => "date",
            Self::Time => "time",
            Self::DateTime => "datetime",
            Self::Integer => "integer",
            Self::Real => "real",
            Self::Bool => "bool",
            Self::Other(s) => s.as_str(),
        }
    }

    /// Returns `true` if this is a named (non-`Other`) variant.
    pub fn is_builtin(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    /// Returns `true` for date, time and datetime.
    pub fn is_temporal(&self) -> bool {
        matches!(self, Self::Date | Self::Time | Self::DateTime)
    }

    fn from_known(s: &str) -> Option<Self> {
        match s {
            "string" => Some(Self::String),
            "date" => Some(Self::Date),
            "time" => Some(Self::Time),
            "datetime" => Some(Self::DateTime),
            "integer" => Some(Self::Integer),
            "real" => Some(Self::Real),
            "bool" => Some(Self::Bool),
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DataType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DataType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s))
    }
}

impl From<&str> for DataType {
    fn from(s: &str) -> Self {
        Self::from_known(s).unwrap_or_else(|| Self::Other(s.to_owned()))
    }
}

impl From<String> for DataType {
    fn from(s: String) -> Self {
        // Check known variants first to avoid allocation in common case.
        Self::from_known(&s).unwrap_or(Self::Other(s))
    }
}

impl FromStr for DataType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}
