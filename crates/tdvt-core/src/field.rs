//! Bracket-delimited field identifiers.
//!
//! A field identifier such as `[Order ID]` marks a column reference in
//! expression text, as opposed to a literal or keyword.

use std::fmt;

/// Opening delimiter of a field identifier.
pub const FIELD_OPEN: char = '[';

/// Closing delimiter of a field identifier.
pub const FIELD_CLOSE: char = ']';

/// A borrowed, validated field identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldRef<'a> {
    ident: &'a str,
}

impl<'a> FieldRef<'a> {
    /// Parses `ident`, returning `None` unless it is `[name]` with a
    /// non-empty name.
    pub fn parse(ident: &'a str) -> Option<Self> {
        let name = ident
            .strip_prefix(FIELD_OPEN)
            .and_then(|rest| rest.strip_suffix(FIELD_CLOSE))?;
        if name.is_empty() {
            return None;
        }
        Some(Self { ident })
    }

    /// The full identifier including brackets.
    pub fn as_str(&self) -> &'a str {
        self.ident
    }

    /// The bare field name without brackets.
    pub fn name(&self) -> &'a str {
        &self.ident[1..self.ident.len() - 1]
    }
}

impl fmt::Display for FieldRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ident)
    }
}

/// Wraps a bare name in field delimiters: `Order ID` -> `[Order ID]`.
pub fn field_ident(name: &str) -> String {
    let mut ident = String::with_capacity(name.len() + 2);
    ident.push(FIELD_OPEN);
    ident.push_str(name);
    ident.push(FIELD_CLOSE);
    ident
}

/// The bracketed form of a malformed identifier, if it has a usable name:
/// `Order ID` and `[Order ID` both become `[Order ID]`.
pub fn suggest_ident(raw: &str) -> Option<String> {
    let name = raw
        .trim()
        .trim_start_matches(FIELD_OPEN)
        .trim_end_matches(FIELD_CLOSE)
        .trim();
    if name.is_empty() {
        return None;
    }
    Some(field_ident(name))
}
