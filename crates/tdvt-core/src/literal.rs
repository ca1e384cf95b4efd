//! Type-aware literal formatting.
//!
//! Generated expressions embed literal values as text. Each [`DataType`] maps
//! to a [`LiteralRule`] telling how that text is marked:
//!
//! | type                         | rule            | `abc` becomes      |
//! |------------------------------|-----------------|--------------------|
//! | `string`                     | wrap `&quot;`   | `&quot;abc&quot;`  |
//! | `date`, `time`, `datetime`   | prefix `#`      | `#abc`             |
//! | anything else                | none            | `abc`              |
//!
//! The string marker is the HTML entity because the expressions end up inside
//! XML attributes. Embedded markers are not escaped.

use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::enums::DataType;

/// Marker wrapped around string literals.
pub const STRING_MARKER: &str = "&quot;";

/// Marker placed before date, time and datetime literals.
pub const TEMPORAL_MARKER: &str = "#";

/// Value text layout for [`Literal::Date`].
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Value text layout for [`Literal::Time`].
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Value text layout for [`Literal::DateTime`].
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

static BUILTIN_FORMATTER: LazyLock<LiteralFormatter> = LazyLock::new(LiteralFormatter::builtin);

// ---------------------------------------------------------------------------
// LiteralRule
// ---------------------------------------------------------------------------

/// Where a marker goes relative to the literal text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    /// Marker on both sides.
    #[default]
    Wrap,
    /// Marker before the text only.
    Prefix,
}

/// How a literal of one type is marked in expression text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LiteralRule {
    /// Text placed around or before the literal.
    pub marker: String,
    /// Where the marker goes; defaults to [`Placement::Wrap`].
    #[serde(default)]
    pub placement: Placement,
}

impl LiteralRule {
    /// Marker on both sides of the text.
    pub fn wrap(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            placement: Placement::Wrap,
        }
    }

    /// Marker before the text only.
    pub fn prefix(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            placement: Placement::Prefix,
        }
    }

    /// Applies the marker to `text`.
    pub fn apply(&self, text: &str) -> String {
        let markers = match self.placement {
            Placement::Wrap => 2,
            Placement::Prefix => 1,
        };
        let mut out = String::with_capacity(text.len() + markers * self.marker.len());
        out.push_str(&self.marker);
        out.push_str(text);
        if self.placement == Placement::Wrap {
            out.push_str(&self.marker);
        }
        out
    }

    /// Removes the markers added by [`apply`](Self::apply), or `None` if
    /// `text` does not carry them.
    pub fn strip<'a>(&self, text: &'a str) -> Option<&'a str> {
        let rest = text.strip_prefix(self.marker.as_str())?;
        match self.placement {
            Placement::Prefix => Some(rest),
            Placement::Wrap => rest.strip_suffix(self.marker.as_str()),
        }
    }
}

// ---------------------------------------------------------------------------
// LiteralFormatter
// ---------------------------------------------------------------------------

/// Lookup table from [`DataType`] to [`LiteralRule`].
///
/// Types without a rule pass through unchanged; formatting never fails.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiteralFormatter {
    rules: HashMap<DataType, LiteralRule>,
}

impl LiteralFormatter {
    /// A formatter with no rules; every literal passes through.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in rules: `string` wrapped in `&quot;`, temporal types
    /// prefixed with `#`.
    pub fn builtin() -> Self {
        Self::new()
            .with_rule(DataType::String, LiteralRule::wrap(STRING_MARKER))
            .with_rule(DataType::DateTime, LiteralRule::prefix(TEMPORAL_MARKER))
            .with_rule(DataType::Date, LiteralRule::prefix(TEMPORAL_MARKER))
            .with_rule(DataType::Time, LiteralRule::prefix(TEMPORAL_MARKER))
    }

    /// Adds or replaces the rule for `data_type`.
    pub fn with_rule(mut self, data_type: impl Into<DataType>, rule: LiteralRule) -> Self {
        self.set_rule(data_type, rule);
        self
    }

    /// Adds or replaces the rule for `data_type` in place.
    pub fn set_rule(&mut self, data_type: impl Into<DataType>, rule: LiteralRule) {
        let data_type = data_type.into();
        debug!(%data_type, marker = %rule.marker, placement = ?rule.placement, "setting literal rule");
        self.rules.insert(data_type, rule);
    }

    /// The rule for `data_type`, if it has one.
    pub fn rule_for(&self, data_type: &DataType) -> Option<&LiteralRule> {
        self.rules.get(data_type)
    }

    /// Types with a rule, sorted by tag.
    pub fn data_types(&self) -> Vec<&DataType> {
        let mut types: Vec<&DataType> = self.rules.keys().collect();
        types.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        types
    }

    /// Formats `text` as a literal of `data_type`.
    pub fn format(&self, data_type: &DataType, text: &str) -> String {
        match self.rule_for(data_type) {
            Some(rule) => rule.apply(text),
            None => text.to_string(),
        }
    }

    /// Formats a typed literal.
    pub fn render(&self, literal: &Literal) -> String {
        self.format(&literal.data_type(), &literal.value_text())
    }
}

/// The process-wide formatter with the built-in rules.
pub fn builtin_formatter() -> &'static LiteralFormatter {
    &BUILTIN_FORMATTER
}

/// Formats `value_text` as a literal of the type named by `type_tag`, using
/// the built-in rules. Unrecognised tags pass through unchanged.
pub fn format_literal(type_tag: &str, value_text: &str) -> String {
    builtin_formatter().format(&DataType::from(type_tag), value_text)
}

// ---------------------------------------------------------------------------
// Literal
// ---------------------------------------------------------------------------

/// A typed literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    Integer(i64),
    Real(f64),
    Bool(bool),
}

impl Literal {
    /// The logical type of this literal.
    pub fn data_type(&self) -> DataType {
        match self {
            Self::String(_) => DataType::String,
            Self::Date(_) => DataType::Date,
            Self::Time(_) => DataType::Time,
            Self::DateTime(_) => DataType::DateTime,
            Self::Integer(_) => DataType::Integer,
            Self::Real(_) => DataType::Real,
            Self::Bool(_) => DataType::Bool,
        }
    }

    /// The unmarked value text.
    pub fn value_text(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            Self::Date(d) => d.format(DATE_FORMAT).to_string(),
            Self::Time(t) => t.format(TIME_FORMAT).to_string(),
            Self::DateTime(dt) => dt.format(DATETIME_FORMAT).to_string(),
            Self::Integer(i) => i.to_string(),
            Self::Real(r) => r.to_string(),
            Self::Bool(b) => b.to_string(),
        }
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<NaiveDate> for Literal {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

impl From<NaiveTime> for Literal {
    fn from(t: NaiveTime) -> Self {
        Self::Time(t)
    }
}

impl From<NaiveDateTime> for Literal {
    fn from(dt: NaiveDateTime) -> Self {
        Self::DateTime(dt)
    }
}

impl From<i64> for Literal {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<f64> for Literal {
    fn from(r: f64) -> Self {
        Self::Real(r)
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn string_is_wrapped() {
        assert_eq!(format_literal("string", "O'Brien"), "&quot;O'Brien&quot;");
        assert_eq!(format_literal("string", ""), "&quot;&quot;");
    }

    #[test]
    fn temporal_types_are_prefixed() {
        assert_eq!(format_literal("date", "2020-01-01"), "#2020-01-01");
        assert_eq!(format_literal("time", "10:00:00"), "#10:00:00");
        assert_eq!(
            format_literal("datetime", "2020-01-01 10:00"),
            "#2020-01-01 10:00"
        );
    }

    #[test]
    fn other_types_pass_through() {
        assert_eq!(format_literal("integer", "42"), "42");
        assert_eq!(format_literal("bool", "true"), "true");
        assert_eq!(format_literal("real", "-1.5"), "-1.5");
        assert_eq!(format_literal("no such type", "x"), "x");
        assert_eq!(format_literal("", "x"), "x");
    }

    #[test]
    fn wrapping_is_not_idempotent() {
        let once = format_literal("string", "abc");
        let twice = format_literal("string", &once);
        assert_eq!(twice, "&quot;&quot;abc&quot;&quot;");
    }

    #[test]
    fn strip_recovers_value() {
        let wrap = LiteralRule::wrap(STRING_MARKER);
        assert_eq!(wrap.strip(&wrap.apply("Ship Mode")), Some("Ship Mode"));
        let prefix = LiteralRule::prefix(TEMPORAL_MARKER);
        assert_eq!(prefix.strip(&prefix.apply("2020-01-01")), Some("2020-01-01"));
    }

    #[test]
    fn strip_rejects_unmarked_text() {
        let wrap = LiteralRule::wrap(STRING_MARKER);
        assert_eq!(wrap.strip("abc"), None);
        assert_eq!(wrap.strip("&quot;abc"), None);
        assert_eq!(LiteralRule::prefix("#").strip("2020"), None);
    }

    #[test]
    fn builtin_rules_snapshot() {
        let formatter = LiteralFormatter::builtin();
        let rules: Vec<(String, String, Placement)> = formatter
            .data_types()
            .into_iter()
            .map(|t| {
                let rule = formatter.rule_for(t).unwrap();
                (t.to_string(), rule.marker.clone(), rule.placement)
            })
            .collect();
        insta::assert_debug_snapshot!(rules, @r###"
        [
            (
                "date",
                "#",
                Prefix,
            ),
            (
                "datetime",
                "#",
                Prefix,
            ),
            (
                "string",
                "&quot;",
                Wrap,
            ),
            (
                "time",
                "#",
                Prefix,
            ),
        ]
        "###);
    }

    #[test]
    fn rule_override_and_addition() {
        let formatter = LiteralFormatter::builtin()
            .with_rule("string", LiteralRule::wrap("'"))
            .with_rule("timestamp", LiteralRule::prefix("#"));
        assert_eq!(formatter.format(&DataType::String, "a"), "'a'");
        assert_eq!(
            formatter.format(&DataType::Other("timestamp".into()), "2020-01-01"),
            "#2020-01-01"
        );
        // The built-in formatter is unaffected.
        assert_eq!(format_literal("string", "a"), "&quot;a&quot;");
    }

    #[test]
    fn empty_formatter_passes_everything_through() {
        let formatter = LiteralFormatter::new();
        assert_eq!(formatter.format(&DataType::String, "abc"), "abc");
        assert!(formatter.rule_for(&DataType::Date).is_none());
    }

    #[test]
    fn typed_literals_render() {
        let f = builtin_formatter();
        let date = NaiveDate::from_ymd_opt(2004, 7, 31).unwrap();
        let time = NaiveTime::from_hms_opt(19, 36, 22).unwrap();
        assert_eq!(f.render(&Literal::from(date)), "#2004-07-31");
        assert_eq!(f.render(&Literal::from(time)), "#19:36:22");
        assert_eq!(
            f.render(&Literal::from(date.and_time(time))),
            "#2004-07-31 19:36:22"
        );
        assert_eq!(f.render(&Literal::from("CLOCKS")), "&quot;CLOCKS&quot;");
        assert_eq!(f.render(&Literal::from(-3_i64)), "-3");
        assert_eq!(f.render(&Literal::from(12.3_f64)), "12.3");
        assert_eq!(f.render(&Literal::from(false)), "false");
    }

    #[test]
    fn literal_data_types() {
        assert_eq!(Literal::from(1_i64).data_type(), DataType::Integer);
        assert_eq!(Literal::from(true).data_type(), DataType::Bool);
        assert_eq!(Literal::from("x").data_type(), DataType::String);
    }

    #[test]
    fn placement_serde() {
        let rule: LiteralRule =
            serde_json::from_str(r##"{"marker":"#","placement":"prefix"}"##).unwrap();
        assert_eq!(rule, LiteralRule::prefix("#"));
        let rule: LiteralRule = serde_json::from_str(r#"{"marker":"'"}"#).unwrap();
        assert_eq!(rule, LiteralRule::wrap("'"));
    }
}
