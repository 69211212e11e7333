//! Property rules: the constraint set for one named property.
//!
//! A [`PropertyRule`] is built either from a plain description mapping
//! (`{"type": "integer", "required": true, "min": 0}`) or with
//! [`PropertyRuleBuilder`]. Both paths run the same definition check and
//! refuse to produce a rule that is internally inconsistent.

use super::definition::{Schema, decode_schema};
use super::types::{PropertyKind, Temporal, Violation, ViolationKind, nest_path, value_kind_name};
use super::validation::check_value;
use crate::error::{Error, Result};

use log::warn;
use regex::Regex;
use serde_json::Value;
use std::sync::Arc;

/// Setting names recognized in a rule description.
pub const RULE_SETTINGS: [&str; 11] = [
    "type",
    "required",
    "default",
    "enum",
    "min",
    "max",
    "regex",
    "member_type",
    "member_min",
    "member_max",
    "schema",
];

/// The validation rules for a single property.
///
/// Rules are immutable once built. Every accessor returns the declared
/// setting, or `None` when the setting is absent.
#[derive(Debug, Clone, Default)]
pub struct PropertyRule {
    kind: PropertyKind,
    required: bool,
    default: Option<Value>,
    enumeration: Option<Vec<Value>>,
    min: Option<f64>,
    max: Option<f64>,
    temporal_min: Option<Temporal>,
    temporal_max: Option<Temporal>,
    regex: Option<Regex>,
    member_type: Option<PropertyKind>,
    member_min: Option<f64>,
    member_max: Option<f64>,
    nested_schema: Option<Arc<Schema>>,
}

impl PropertyRule {
    /// Start building a rule for values of `kind`.
    pub fn builder(kind: PropertyKind) -> PropertyRuleBuilder {
        PropertyRuleBuilder::new(kind)
    }

    /// A rule with no restrictions at all.
    pub fn unrestricted() -> Self {
        Self::default()
    }

    /// Build a rule from a description mapping.
    ///
    /// Fails with [`Error::InvalidSchemaDefinition`] listing every malformed
    /// setting.
    pub fn from_description(description: &Value) -> Result<Self> {
        decode_rule(description).map_err(|violations| {
            warn!(
                "Rejected property rule description with {} violation(s)",
                violations.len()
            );
            Error::invalid_definition(violations)
        })
    }

    pub fn kind(&self) -> PropertyKind {
        self.kind
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn enumeration(&self) -> Option<&[Value]> {
        self.enumeration.as_deref()
    }

    pub fn min(&self) -> Option<f64> {
        self.min
    }

    pub fn max(&self) -> Option<f64> {
        self.max
    }

    /// Earliest allowed value of a `date`, `time` or `datetime` property.
    pub fn temporal_min(&self) -> Option<Temporal> {
        self.temporal_min
    }

    /// Latest allowed value of a `date`, `time` or `datetime` property.
    pub fn temporal_max(&self) -> Option<Temporal> {
        self.temporal_max
    }

    pub fn regex(&self) -> Option<&Regex> {
        self.regex.as_ref()
    }

    pub fn member_type(&self) -> Option<PropertyKind> {
        self.member_type
    }

    pub fn member_min(&self) -> Option<f64> {
        self.member_min
    }

    pub fn member_max(&self) -> Option<f64> {
        self.member_max
    }

    pub fn nested_schema(&self) -> Option<&Arc<Schema>> {
        self.nested_schema.as_ref()
    }

    /// Check that the rule's settings are consistent with each other.
    ///
    /// Returns one violation per offending setting; the path of each
    /// violation is the setting name.
    pub fn validate_definition(&self) -> Vec<Violation> {
        let mut violations = Vec::new();
        self.check_enumeration(&mut violations);
        self.check_bounds(&mut violations);
        self.check_members(&mut violations);
        self.check_regex(&mut violations);
        self.check_nested_schema(&mut violations);
        self.check_default(&mut violations);
        violations
    }

    fn check_enumeration(&self, violations: &mut Vec<Violation>) {
        let Some(allowed) = &self.enumeration else {
            return;
        };
        if allowed.is_empty() {
            violations.push(invalid("enum", "The enumeration must not be empty."));
            return;
        }
        let target = if self.kind.is_collection() {
            self.member_type.unwrap_or(PropertyKind::Any)
        } else {
            self.kind
        };
        if target == PropertyKind::Object {
            violations.push(inconsistent(
                "enum",
                "An enumeration cannot be declared for object values.",
            ));
            return;
        }
        for member in allowed {
            if member.is_null() || member.is_array() || member.is_object() {
                violations.push(invalid(
                    "enum",
                    format!(
                        "Enumeration members must be literals, got {}.",
                        value_kind_name(member)
                    ),
                ));
            } else if !target.matches(member) {
                violations.push(inconsistent(
                    "enum",
                    format!(
                        "Enumeration member {} is not of type \"{}\".",
                        member, target
                    ),
                ));
            }
        }
    }

    fn check_bounds(&self, violations: &mut Vec<Violation>) {
        let bounded = self.kind.is_numeric() || self.kind.is_length_bounded();
        for (setting, bound) in [("min", self.min), ("max", self.max)] {
            let Some(bound) = bound else { continue };
            if !bounded {
                violations.push(inconsistent(
                    setting,
                    format!(
                        "The \"{}\" setting does not apply to type \"{}\".",
                        setting, self.kind
                    ),
                ));
            } else if self.kind.is_length_bounded() && bound < 0.0 {
                violations.push(invalid(
                    setting,
                    format!("A length bound cannot be negative, got {}.", bound),
                ));
            }
        }
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                violations.push(inconsistent(
                    "min",
                    format!("The min of {} exceeds the max of {}.", min, max),
                ));
            }
        }
        if let (Some(min), Some(max)) = (self.temporal_min, self.temporal_max) {
            if min > max {
                violations.push(inconsistent(
                    "min",
                    format!("The min of {} exceeds the max of {}.", min, max),
                ));
            }
        }
    }

    fn check_members(&self, violations: &mut Vec<Violation>) {
        if let Some(member_type) = self.member_type {
            if !self.kind.is_collection() {
                violations.push(inconsistent(
                    "member_type",
                    format!(
                        "A member type requires a list or set, not \"{}\".",
                        self.kind
                    ),
                ));
            } else if member_type.is_collection() {
                violations.push(inconsistent(
                    "member_type",
                    "Collections of collections are not supported.",
                ));
            }
        }

        let member_bounded = self
            .member_type
            .is_some_and(|t| t.is_numeric() || t == PropertyKind::String);
        for (setting, bound) in [
            ("member_min", self.member_min),
            ("member_max", self.member_max),
        ] {
            let Some(bound) = bound else { continue };
            if !member_bounded {
                violations.push(inconsistent(
                    setting,
                    format!(
                        "The \"{}\" setting requires a numeric or string member type.",
                        setting
                    ),
                ));
            } else if self.member_type == Some(PropertyKind::String) && bound < 0.0 {
                violations.push(invalid(
                    setting,
                    format!("A length bound cannot be negative, got {}.", bound),
                ));
            }
        }
        if let (Some(min), Some(max)) = (self.member_min, self.member_max) {
            if min > max {
                violations.push(inconsistent(
                    "member_min",
                    format!("The member_min of {} exceeds the member_max of {}.", min, max),
                ));
            }
        }
    }

    fn check_regex(&self, violations: &mut Vec<Violation>) {
        if self.regex.is_none() {
            return;
        }
        let applies = self.kind == PropertyKind::String
            || (self.kind.is_collection() && self.member_type == Some(PropertyKind::String));
        if !applies {
            violations.push(inconsistent(
                "regex",
                "A regex applies only to strings or to collections of strings.",
            ));
        }
    }

    fn check_nested_schema(&self, violations: &mut Vec<Violation>) {
        if self.nested_schema.is_none() {
            return;
        }
        if !self.kind.is_composite() {
            violations.push(inconsistent(
                "schema",
                format!(
                    "A nested schema requires an object or list, not \"{}\".",
                    self.kind
                ),
            ));
        } else if self.kind == PropertyKind::List
            && self
                .member_type
                .is_some_and(|t| t != PropertyKind::Object)
        {
            violations.push(inconsistent(
                "member_type",
                "A list with a nested schema can only hold objects.",
            ));
        }
    }

    fn check_default(&self, violations: &mut Vec<Violation>) {
        let Some(default) = &self.default else {
            return;
        };
        let mut findings = Vec::new();
        check_value("default", self, Some(default), &mut findings);
        violations.extend(findings.into_iter().map(|finding| {
            invalid(
                "default",
                format!("The default value does not satisfy the rule: {}", finding.message),
            )
        }));
    }
}

/// Fluent construction of a [`PropertyRule`].
///
/// ```rust
/// use record_shape::schema::{PropertyKind, PropertyRule};
///
/// let rule = PropertyRule::builder(PropertyKind::String)
///     .required(true)
///     .enumeration(["draft", "published"])
///     .build()
///     .unwrap();
/// assert!(rule.is_required());
/// ```
#[derive(Debug, Clone, Default)]
pub struct PropertyRuleBuilder {
    kind: PropertyKind,
    required: bool,
    default: Option<Value>,
    enumeration: Option<Vec<Value>>,
    min: Option<f64>,
    max: Option<f64>,
    temporal_min: Option<String>,
    temporal_max: Option<String>,
    regex: Option<String>,
    member_type: Option<PropertyKind>,
    member_min: Option<f64>,
    member_max: Option<f64>,
    nested_schema: Option<Arc<Schema>>,
}

impl PropertyRuleBuilder {
    pub fn new(kind: PropertyKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn enumeration<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.enumeration = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Lower bound for a temporal kind, written in that kind's format.
    pub fn temporal_min(mut self, bound: impl Into<String>) -> Self {
        self.temporal_min = Some(bound.into());
        self
    }

    /// Upper bound for a temporal kind, written in that kind's format.
    pub fn temporal_max(mut self, bound: impl Into<String>) -> Self {
        self.temporal_max = Some(bound.into());
        self
    }

    pub fn regex(mut self, pattern: impl Into<String>) -> Self {
        self.regex = Some(pattern.into());
        self
    }

    pub fn member_type(mut self, kind: PropertyKind) -> Self {
        self.member_type = Some(kind);
        self
    }

    pub fn member_min(mut self, min: f64) -> Self {
        self.member_min = Some(min);
        self
    }

    pub fn member_max(mut self, max: f64) -> Self {
        self.member_max = Some(max);
        self
    }

    /// Attach a nested schema, shared with any other rule holding it.
    pub fn nested_schema(mut self, schema: impl Into<Arc<Schema>>) -> Self {
        self.nested_schema = Some(schema.into());
        self
    }

    /// Finish the rule, failing with [`Error::InvalidSchemaDefinition`] when
    /// the settings are inconsistent.
    pub fn build(self) -> Result<PropertyRule> {
        self.assemble().map_err(Error::invalid_definition)
    }

    fn assemble(self) -> std::result::Result<PropertyRule, Vec<Violation>> {
        let mut violations = Vec::new();
        let regex = match self.regex.as_deref().map(Regex::new).transpose() {
            Ok(regex) => regex,
            Err(e) => {
                violations.push(invalid("regex", format!("Invalid regex: {}", e)));
                None
            }
        };
        let temporal_min =
            temporal_bound(self.kind, "min", self.temporal_min.as_deref(), &mut violations);
        let temporal_max =
            temporal_bound(self.kind, "max", self.temporal_max.as_deref(), &mut violations);
        if !violations.is_empty() {
            return Err(violations);
        }

        let rule = PropertyRule {
            kind: self.kind,
            required: self.required,
            default: self.default,
            enumeration: self.enumeration,
            min: self.min,
            max: self.max,
            temporal_min,
            temporal_max,
            regex,
            member_type: self.member_type,
            member_min: self.member_min,
            member_max: self.member_max,
            nested_schema: self.nested_schema,
        };

        let violations = rule.validate_definition();
        if violations.is_empty() {
            Ok(rule)
        } else {
            Err(violations)
        }
    }
}

/// Report every violation in a rule description without building the rule.
pub fn validate_rule_description(description: &Value) -> Vec<Violation> {
    decode_rule(description).err().unwrap_or_default()
}

/// Decode a rule description; shape errors are reported before consistency.
pub(crate) fn decode_rule(
    description: &Value,
) -> std::result::Result<PropertyRule, Vec<Violation>> {
    let Some(settings) = description.as_object() else {
        return Err(vec![invalid(
            "",
            format!(
                "A rule description must be a mapping of settings, got {}.",
                value_kind_name(description)
            ),
        )]);
    };

    let mut violations = Vec::new();
    let mut builder = PropertyRuleBuilder::default();

    for (setting, value) in settings {
        match setting.as_str() {
            "type" => match decode_kind(setting, value) {
                Ok(kind) => builder.kind = kind.unwrap_or_default(),
                Err(v) => violations.push(v),
            },
            "required" => match value {
                Value::Null => {}
                Value::Bool(required) => builder.required = *required,
                other => violations.push(wrong_json_type(setting, "boolean", other)),
            },
            "default" => builder.default = (!value.is_null()).then(|| value.clone()),
            "enum" => match value {
                Value::Null => {}
                Value::Array(members) => builder.enumeration = Some(members.clone()),
                other => violations.push(wrong_json_type(setting, "array", other)),
            },
            "min" | "max" => match value {
                Value::Null => {}
                Value::Number(n) if setting == "min" => builder.min = n.as_f64(),
                Value::Number(n) => builder.max = n.as_f64(),
                Value::String(text) if setting == "min" => {
                    builder.temporal_min = Some(text.clone())
                }
                Value::String(text) => builder.temporal_max = Some(text.clone()),
                other => violations.push(wrong_json_type(setting, "number or string", other)),
            },
            "member_min" | "member_max" => match decode_bound(setting, value) {
                Ok(bound) if setting == "member_min" => builder.member_min = bound,
                Ok(bound) => builder.member_max = bound,
                Err(v) => violations.push(v),
            },
            "regex" => match value {
                Value::Null => {}
                Value::String(pattern) => builder.regex = Some(pattern.clone()),
                other => violations.push(wrong_json_type(setting, "string", other)),
            },
            "member_type" => match decode_kind(setting, value) {
                Ok(kind) => builder.member_type = kind,
                Err(v) => violations.push(v),
            },
            "schema" => match value {
                Value::Null => {}
                Value::Object(_) => match decode_schema(value) {
                    Ok(schema) => builder.nested_schema = Some(Arc::new(schema)),
                    Err(nested) => violations.extend(nested.into_iter().map(|v| Violation {
                        path: nest_path("schema", &v.path),
                        ..v
                    })),
                },
                other => violations.push(wrong_json_type(setting, "mapping", other)),
            },
            unknown => violations.push(Violation::new(
                unknown,
                ViolationKind::UnknownSetting,
                format!(
                    "The setting \"{}\" is not recognized; expected one of {:?}.",
                    unknown, RULE_SETTINGS
                ),
            )),
        }
    }

    if !violations.is_empty() {
        return Err(violations);
    }
    builder.assemble()
}

fn decode_kind(
    setting: &str,
    value: &Value,
) -> std::result::Result<Option<PropertyKind>, Violation> {
    match value {
        Value::Null => Ok(None),
        Value::String(tag) => PropertyKind::from_tag(tag)
            .map(Some)
            .ok_or_else(|| invalid(setting, format!("Illegal type declaration: {}", tag))),
        other => Err(wrong_json_type(setting, "string", other)),
    }
}

fn decode_bound(setting: &str, value: &Value) -> std::result::Result<Option<f64>, Violation> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(n.as_f64()),
        other => Err(wrong_json_type(setting, "number", other)),
    }
}

/// Parse a string bound, which only a temporal kind accepts.
fn temporal_bound(
    kind: PropertyKind,
    setting: &str,
    text: Option<&str>,
    violations: &mut Vec<Violation>,
) -> Option<Temporal> {
    let text = text?;
    if !kind.is_temporal() {
        violations.push(invalid(
            setting,
            format!(
                "The \"{}\" setting must be a number for type \"{}\", got string.",
                setting, kind
            ),
        ));
        return None;
    }
    let bound = kind.parse_temporal(text);
    if bound.is_none() {
        violations.push(invalid(
            setting,
            format!("The bound \"{}\" is not a valid {} value.", text, kind),
        ));
    }
    bound
}

fn wrong_json_type(setting: &str, expected: &str, actual: &Value) -> Violation {
    invalid(
        setting,
        format!(
            "The \"{}\" setting must be a {}, got {}.",
            setting,
            expected,
            value_kind_name(actual)
        ),
    )
}

fn invalid(setting: &str, message: impl Into<String>) -> Violation {
    Violation::new(setting, ViolationKind::InvalidSetting, message)
}

fn inconsistent(setting: &str, message: impl Into<String>) -> Violation {
    Violation::new(setting, ViolationKind::InconsistentSetting, message)
}
