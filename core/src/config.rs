//! Config types for declarative pattern construction.
//!
//! These types mirror the runtime pattern types but are serde-deserializable,
//! enabling config-driven match construction via
//! [`Registry::load_match()`](crate::Registry::load_match).
//!
//! # Relationship to runtime types
//!
//! | Config type | Runtime type | Loader method |
//! |-------------|-------------|---------------|
//! | [`MatchConfig`] | [`Match`](crate::Match) | `Registry::load_match()` |
//! | [`ArmConfig`] | [`Arm`](crate::Arm) | via `load_match()` |
//! | [`PatternConfig`] | [`Pattern`](crate::Pattern) | `Registry::load_pattern()` |
//! | [`StringMatchConfig`] | [`StringMatcher`](crate::StringMatcher) | [`StringMatchConfig::to_matcher()`] |
//! | [`ValueConfig`] | [`Value`](crate::Value) | [`ValueConfig::to_value()`] |
//!
//! Closures cannot be written in config. Custom predicates and projections
//! are registered by name on a [`RegistryBuilder`](crate::RegistryBuilder)
//! and referenced from config with `predicate` / `transform` nodes.

use crate::{CompareOp, MatchError, StringMatcher, Value, MAX_REGEX_PATTERN_LENGTH};
use serde::Deserialize;

/// Configuration for a [`Match`](crate::Match).
///
/// ```yaml
/// arms:
///   - pattern: { type: literal, value: 0 }
///     action: zero
///   - pattern: { type: wildcard }
///     action: other
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "A: Deserialize<'de>"))]
pub struct MatchConfig<A> {
    /// Arms to try in order (first-match-wins).
    pub arms: Vec<ArmConfig<A>>,
}

/// Configuration for one arm: a pattern and the action it returns.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "A: Deserialize<'de>"))]
pub struct ArmConfig<A> {
    /// The pattern that selects this arm.
    pub pattern: PatternConfig,

    /// The value the match evaluates to when this arm is selected.
    pub action: A,
}

/// Configuration for a [`Pattern`](crate::Pattern).
///
/// Uses `#[serde(tag = "type")]` for discriminated union deserialization:
///
/// ```json
/// { "type": "destructure", "patterns": [
///     { "type": "literal", "value": { "char": "*" } },
///     { "type": "capture", "name": "i" },
///     { "type": "segment" }
/// ] }
/// ```
///
/// Captures are scoped to one arm: the same `name` twice in an arm is the
/// same capture, so `(x, (_, x))` requires both positions to be equal.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PatternConfig {
    /// Matches anything.
    #[default]
    Wildcard,

    /// Equality against a value.
    Literal {
        /// The value to compare with.
        value: ValueConfig,
    },

    /// Bind to (or compare with) a named capture.
    Capture {
        /// Capture name, scoped to the arm.
        name: String,
        /// Alias the subject instead of copying it.
        #[serde(default)]
        borrowed: bool,
    },

    /// Any of the alternatives, first match wins.
    Or {
        /// Alternatives.
        patterns: Vec<PatternConfig>,
    },

    /// All of the conjuncts, in order.
    And {
        /// Conjuncts.
        patterns: Vec<PatternConfig>,
    },

    /// Negation. Never binds.
    Not {
        /// The pattern to negate.
        pattern: Box<PatternConfig>,
    },

    /// Positional match over a tuple.
    Destructure {
        /// One pattern per position; `segment` entries absorb runs.
        patterns: Vec<PatternConfig>,
    },

    /// A run of tuple positions each matching `pattern` (wildcard if omitted).
    Segment {
        /// Pattern every consumed position must match.
        #[serde(default)]
        pattern: Box<PatternConfig>,
    },

    /// The `index`-th position of a tuple.
    Field {
        /// Zero-based position.
        index: usize,
        /// Pattern for that position.
        pattern: Box<PatternConfig>,
    },

    /// A present nullable whose content matches `pattern` (wildcard if omitted).
    Some {
        /// Pattern for the content.
        #[serde(default)]
        pattern: Box<PatternConfig>,
    },

    /// An empty nullable.
    None,

    /// Built-in string matching.
    String(StringMatchConfig),

    /// `subject op value`.
    Compare {
        /// Comparison operator (`eq`, `ne`, `lt`, `le`, `gt`, `ge`).
        op: CompareOp,
        /// Right-hand operand.
        value: ValueConfig,
    },

    /// A predicate registered by name.
    Predicate {
        /// Registered predicate name.
        name: String,
    },

    /// Match `pattern` against the view a registered projection computes.
    Transform {
        /// Registered projection name.
        projection: String,
        /// Pattern for the projected value.
        pattern: Box<PatternConfig>,
    },

    /// `pattern`, then a comparison over its captures.
    Guard {
        /// The guarded pattern.
        pattern: Box<PatternConfig>,
        /// The condition checked after `pattern` matched.
        condition: GuardConfig,
    },
}

/// A guard condition: `capture op operand`.
///
/// ```yaml
/// condition: { capture: i, op: lt, operand: { capture: j } }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct GuardConfig {
    /// Left-hand capture. Must be bound by the guarded pattern.
    pub capture: String,
    /// Comparison operator.
    pub op: CompareOp,
    /// Right-hand side.
    pub operand: OperandConfig,
}

/// Right-hand side of a [`GuardConfig`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperandConfig {
    /// Another capture of the same pattern.
    Capture(String),
    /// A literal value.
    Value(ValueConfig),
}

/// Built-in string match strategies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StringMatchType {
    /// String equality.
    #[default]
    Exact,
    /// String starts with the value.
    Prefix,
    /// String ends with the value.
    Suffix,
    /// String contains the value.
    Contains,
    /// Regular expression (Rust `regex` syntax, linear time).
    Regex,
}

/// Config-level string matcher.
///
/// Compiles to a runtime [`StringMatcher`] via [`to_matcher()`](Self::to_matcher).
#[derive(Debug, Clone, Deserialize)]
pub struct StringMatchConfig {
    /// The string or regex to match with.
    pub value: String,
    /// Matching strategy (`exact` if omitted).
    #[serde(default)]
    pub match_type: StringMatchType,
    /// Case-insensitive matching.
    #[serde(default)]
    pub ignore_case: bool,
}

impl StringMatchConfig {
    /// Compile this config into a runtime [`StringMatcher`].
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::InvalidPattern`] if the regex is invalid or longer
    /// than [`MAX_REGEX_PATTERN_LENGTH`].
    pub fn to_matcher(&self) -> Result<StringMatcher, MatchError> {
        let value = self.value.as_str();
        match self.match_type {
            StringMatchType::Exact => Ok(StringMatcher::exact(value, self.ignore_case)),
            StringMatchType::Prefix => Ok(StringMatcher::prefix(value, self.ignore_case)),
            StringMatchType::Suffix => Ok(StringMatcher::suffix(value, self.ignore_case)),
            StringMatchType::Contains => Ok(StringMatcher::contains(value, self.ignore_case)),
            StringMatchType::Regex => {
                if value.len() > MAX_REGEX_PATTERN_LENGTH {
                    return Err(MatchError::InvalidPattern {
                        pattern: truncated(value),
                        reason: format!(
                            "regex is {} bytes, but maximum allowed is {MAX_REGEX_PATTERN_LENGTH}",
                            value.len()
                        ),
                    });
                }
                let compiled = if self.ignore_case {
                    StringMatcher::regex_ignore_case(value)
                } else {
                    StringMatcher::regex(value)
                };
                compiled.map_err(|e| MatchError::InvalidPattern {
                    pattern: value.to_owned(),
                    reason: e.to_string(),
                })
            }
        }
    }
}

fn truncated(pattern: &str) -> String {
    let end = pattern
        .char_indices()
        .nth(32)
        .map_or(pattern.len(), |(i, _)| i);
    format!("{}...", &pattern[..end])
}

/// A literal value written in JSON/YAML.
///
/// | Config | Value |
/// |--------|-------|
/// | `null` | `Maybe(None)` |
/// | `true` / `false` | `Bool` |
/// | integer | `Int` |
/// | `"text"` | `String` |
/// | `[a, b]` | `Tuple` |
/// | `{ char: "c" }` | `Char` |
/// | `{ some: v }` | `Maybe(Some(v))` |
/// | `{ bytes: "raw" }` | `Bytes` |
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct ValueConfig(pub serde_json::Value);

impl ValueConfig {
    /// Convert to a runtime [`Value`].
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::InvalidConfig`] for floats, integers outside
    /// `i64`, and objects other than the tagged forms above.
    pub fn to_value(&self) -> Result<Value, MatchError> {
        json_to_value(&self.0)
    }
}

impl From<serde_json::Value> for ValueConfig {
    fn from(json: serde_json::Value) -> Self {
        Self(json)
    }
}

fn json_to_value(json: &serde_json::Value) -> Result<Value, MatchError> {
    use serde_json::Value as Json;
    match json {
        Json::Null => Ok(Value::null()),
        Json::Bool(b) => Ok(Value::Bool(*b)),
        Json::Number(n) => n.as_i64().map(Value::Int).ok_or_else(|| MatchError::InvalidConfig {
            reason: format!("number {n} is not a 64-bit signed integer"),
        }),
        Json::String(s) => Ok(Value::String(s.clone())),
        Json::Array(items) => items
            .iter()
            .map(json_to_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Tuple),
        Json::Object(map) => {
            let mut entries = map.iter();
            match (entries.next(), entries.next()) {
                (Some((tag, inner)), None) => tagged_value(tag, inner),
                _ => Err(MatchError::InvalidConfig {
                    reason: format!(
                        "object values must have exactly one key (char, some, bytes), got {json}"
                    ),
                }),
            }
        }
    }
}

fn tagged_value(tag: &str, inner: &serde_json::Value) -> Result<Value, MatchError> {
    match (tag, inner) {
        ("some", inner) => json_to_value(inner).map(Value::some),
        ("char", serde_json::Value::String(s)) => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(Value::Char(c)),
                _ => Err(MatchError::InvalidConfig {
                    reason: format!("char must be exactly one character, got \"{s}\""),
                }),
            }
        }
        ("bytes", serde_json::Value::String(s)) => Ok(Value::Bytes(s.as_bytes().to_vec())),
        (tag, inner) => Err(MatchError::InvalidConfig {
            reason: format!("unsupported value {{\"{tag}\": {inner}}} (expected char, some or bytes)"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(json: serde_json::Value) -> Result<Value, MatchError> {
        ValueConfig::from(json).to_value()
    }

    #[test]
    fn deserialize_simple_config() {
        let json = serde_json::json!({
            "arms": [
                {
                    "pattern": { "type": "literal", "value": 0 },
                    "action": "zero"
                },
                {
                    "pattern": { "type": "wildcard" },
                    "action": "other"
                }
            ]
        });

        let config: MatchConfig<String> = serde_json::from_value(json).unwrap();
        assert_eq!(config.arms.len(), 2);
        assert_eq!(config.arms[1].action, "other");
        assert!(matches!(config.arms[1].pattern, PatternConfig::Wildcard));
    }

    #[test]
    fn deserialize_destructure_with_segment() {
        let json = serde_json::json!({
            "type": "destructure",
            "patterns": [
                { "type": "segment" },
                { "type": "literal", "value": 3 }
            ]
        });

        let config: PatternConfig = serde_json::from_value(json).unwrap();
        match config {
            PatternConfig::Destructure { patterns } => {
                assert_eq!(patterns.len(), 2);
                match &patterns[0] {
                    PatternConfig::Segment { pattern } => {
                        assert!(matches!(**pattern, PatternConfig::Wildcard));
                    }
                    other => panic!("expected segment, got {other:?}"),
                }
            }
            other => panic!("expected destructure, got {other:?}"),
        }
    }

    #[test]
    fn deserialize_string_and_compare() {
        let string: PatternConfig = serde_json::from_value(serde_json::json!({
            "type": "string", "value": "/api", "match_type": "prefix"
        }))
        .unwrap();
        match string {
            PatternConfig::String(spec) => {
                assert_eq!(spec.match_type, StringMatchType::Prefix);
                assert!(!spec.ignore_case);
            }
            other => panic!("expected string, got {other:?}"),
        }

        let compare: PatternConfig = serde_json::from_value(serde_json::json!({
            "type": "compare", "op": "lt", "value": 5
        }))
        .unwrap();
        assert!(matches!(compare, PatternConfig::Compare { op: CompareOp::Lt, .. }));
    }

    #[test]
    fn deserialize_guard_from_yaml() {
        let yaml = r"
type: guard
pattern:
  type: destructure
  patterns:
    - { type: capture, name: i }
    - { type: capture, name: j }
condition: { capture: i, op: lt, operand: { capture: j } }
";
        let config: PatternConfig = serde_yaml::from_str(yaml).unwrap();
        match config {
            PatternConfig::Guard { condition, .. } => {
                assert_eq!(condition.capture, "i");
                assert_eq!(condition.op, CompareOp::Lt);
                assert!(matches!(condition.operand, OperandConfig::Capture(ref j) if j == "j"));
            }
            other => panic!("expected guard, got {other:?}"),
        }
    }

    #[test]
    fn unknown_type_is_rejected() {
        let result: Result<PatternConfig, _> =
            serde_json::from_value(serde_json::json!({ "type": "regex", "value": "a+" }));
        assert!(result.is_err());
    }

    #[test]
    fn value_config_scalars_and_tuples() {
        assert_eq!(value(serde_json::json!(null)).unwrap(), Value::null());
        assert_eq!(value(serde_json::json!(true)).unwrap(), Value::Bool(true));
        assert_eq!(value(serde_json::json!(-3)).unwrap(), Value::Int(-3));
        assert_eq!(value(serde_json::json!("123")).unwrap(), Value::from("123"));
        assert_eq!(
            value(serde_json::json!([{ "char": "*" }, "123", 3])).unwrap(),
            Value::from(('*', "123", 3))
        );
    }

    #[test]
    fn value_config_tagged_objects() {
        assert_eq!(
            value(serde_json::json!({ "some": { "some": null } })).unwrap(),
            Value::some(Value::some(Value::null()))
        );
        assert_eq!(
            value(serde_json::json!({ "bytes": "ab" })).unwrap(),
            Value::Bytes(b"ab".to_vec())
        );
    }

    #[test]
    fn value_config_rejects_what_has_no_value() {
        assert!(matches!(
            value(serde_json::json!(1.5)),
            Err(MatchError::InvalidConfig { .. })
        ));
        assert!(value(serde_json::json!({ "char": "ab" })).is_err());
        assert!(value(serde_json::json!({ "a": 1, "b": 2 })).is_err());
        assert!(value(serde_json::json!({ "float": 1 })).is_err());
    }

    #[test]
    fn string_match_config_compiles() {
        let spec = StringMatchConfig {
            value: "^ab+$".into(),
            match_type: StringMatchType::Regex,
            ignore_case: true,
        };
        let matcher = spec.to_matcher().unwrap();
        assert!(crate::ValueMatcher::matches(&matcher, &Value::from("ABB")));

        let bad = StringMatchConfig {
            value: "(".into(),
            match_type: StringMatchType::Regex,
            ignore_case: false,
        };
        assert!(matches!(
            bad.to_matcher(),
            Err(MatchError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn string_match_config_rejects_long_regex() {
        let spec = StringMatchConfig {
            value: "a".repeat(MAX_REGEX_PATTERN_LENGTH + 1),
            match_type: StringMatchType::Regex,
            ignore_case: false,
        };
        match spec.to_matcher() {
            Err(MatchError::InvalidPattern { pattern, reason }) => {
                assert!(pattern.ends_with("..."));
                assert!(reason.contains("maximum allowed"));
            }
            other => panic!("expected InvalidPattern, got {other:?}"),
        }
    }
}
