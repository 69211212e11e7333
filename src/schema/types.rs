//! Core type definitions shared by rules, schemas and the validation engine.
//!
//! This module contains the closed set of property kinds and the structured
//! [`Violation`] record produced by both definition checks and value checks.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The kind of value a property holds.
///
/// Dispatch over kinds is always an explicit `match`; supporting a new kind
/// means adding a variant here.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    /// No type restriction
    #[default]
    Any,
    /// JSON boolean
    Boolean,
    /// JSON integer
    Integer,
    /// Any JSON number
    Float,
    /// JSON string
    String,
    /// Ordered JSON array
    List,
    /// JSON array whose members are unique
    Set,
    /// JSON object, optionally shaped by a nested schema
    Object,
    /// Calendar date string, `YYYY-MM-DD`
    Date,
    /// Wall clock time string, `HH:MM:SS` with optional fraction
    Time,
    /// RFC 3339 timestamp string
    DateTime,
}

impl PropertyKind {
    /// Every kind, in declaration order.
    pub const ALL: [PropertyKind; 11] = [
        Self::Any,
        Self::Boolean,
        Self::Integer,
        Self::Float,
        Self::String,
        Self::List,
        Self::Set,
        Self::Object,
        Self::Date,
        Self::Time,
        Self::DateTime,
    ];

    /// Resolve a description tag, accepting the short aliases.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let kind = match tag {
            "any" => Self::Any,
            "boolean" | "bool" => Self::Boolean,
            "integer" | "int" => Self::Integer,
            "float" => Self::Float,
            "string" | "str" => Self::String,
            "list" => Self::List,
            "set" => Self::Set,
            "object" | "dict" => Self::Object,
            "date" => Self::Date,
            "time" => Self::Time,
            "datetime" => Self::DateTime,
            _ => return None,
        };
        Some(kind)
    }

    /// Canonical tag for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::String => "string",
            Self::List => "list",
            Self::Set => "set",
            Self::Object => "object",
            Self::Date => "date",
            Self::Time => "time",
            Self::DateTime => "datetime",
        }
    }

    /// Kinds whose values are JSON arrays.
    pub fn is_collection(&self) -> bool {
        matches!(self, Self::List | Self::Set)
    }

    /// Kinds that may carry a nested schema.
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Object | Self::List)
    }

    /// Kinds bounded by numeric comparison.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }

    /// Kinds bounded by length.
    pub fn is_length_bounded(&self) -> bool {
        matches!(self, Self::String | Self::List | Self::Set | Self::Object)
    }

    /// Whether `value` has this kind at runtime.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Self::Any => true,
            Self::Boolean => value.is_boolean(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Float => value.is_number(),
            Self::String => value.is_string(),
            Self::List | Self::Set => value.is_array(),
            Self::Object => value.is_object(),
            Self::Date | Self::Time | Self::DateTime => value
                .as_str()
                .is_some_and(|text| self.parse_temporal(text).is_some()),
        }
    }

    /// Kinds whose values are ordered points in time.
    pub fn is_temporal(&self) -> bool {
        matches!(self, Self::Date | Self::Time | Self::DateTime)
    }

    /// Parse `text` as a value of this temporal kind.
    ///
    /// Returns `None` for non-temporal kinds and for text in the wrong format.
    pub fn parse_temporal(&self, text: &str) -> Option<Temporal> {
        match self {
            Self::Date => NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .map(Temporal::Date),
            Self::Time => NaiveTime::parse_from_str(text, "%H:%M:%S%.f")
                .ok()
                .map(Temporal::Time),
            Self::DateTime => DateTime::<FixedOffset>::parse_from_rfc3339(text)
                .ok()
                .map(Temporal::DateTime),
            _ => None,
        }
    }
}

/// A parsed `date`, `time` or `datetime` value.
///
/// Values of the same variant are ordered chronologically; datetimes compare
/// by instant regardless of offset.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub enum Temporal {
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(DateTime<FixedOffset>),
}

impl fmt::Display for Temporal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Self::Time(time) => write!(f, "{}", time),
            Self::DateTime(at) => f.write_str(&at.to_rfc3339()),
        }
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category of a [`Violation`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    // Value findings
    /// A required value is absent
    Required,
    /// The value has the wrong kind
    Type,
    /// The value is not in the enumeration
    Enum,
    /// The value or its length is below `min`
    Min,
    /// The value or its length is above `max`
    Max,
    /// A string does not match `regex`
    Regex,
    /// A set contains the same member twice
    Duplicate,
    /// A collection member has the wrong kind
    MemberType,
    /// A collection member is not in the enumeration
    MemberEnum,
    /// A collection member does not match `regex`
    MemberRegex,
    /// A collection member or its length is below `member_min`
    MemberMin,
    /// A collection member or its length is above `member_max`
    MemberMax,

    // Definition findings
    /// A rule description uses a key that is not a rule setting
    UnknownSetting,
    /// A rule setting has an unusable value
    InvalidSetting,
    /// Rule settings contradict each other
    InconsistentSetting,
    /// A property name is empty
    EmptyName,
    /// A property name is declared twice
    DuplicateName,
}

impl ViolationKind {
    /// Whether this kind describes a malformed definition rather than bad data.
    pub fn is_definition(&self) -> bool {
        matches!(
            self,
            Self::UnknownSetting
                | Self::InvalidSetting
                | Self::InconsistentSetting
                | Self::EmptyName
                | Self::DuplicateName
        )
    }
}

/// One structured diagnostic.
///
/// `path` addresses the offending value through every level of nesting, for
/// example `address.zip` or `orders[1].quantity`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Violation {
    pub path: String,
    pub kind: ViolationKind,
    pub message: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Append a named segment to a dotted path.
pub(crate) fn child_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

/// Append an index segment to a path.
pub(crate) fn index_path(prefix: &str, index: usize) -> String {
    format!("{}[{}]", prefix, index)
}

/// Prefix an already relative path, which may be empty or start with an index.
pub(crate) fn nest_path(prefix: &str, path: &str) -> String {
    if path.is_empty() {
        prefix.to_string()
    } else if prefix.is_empty() || path.starts_with('[') {
        format!("{}{}", prefix, path)
    } else {
        format!("{}.{}", prefix, path)
    }
}

/// Short description of a JSON value's runtime kind for messages.
pub(crate) fn value_kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "float",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
