//! Pack settings schema.
//!
//! Packs may declare render settings using a small JSON-Schema subset:
//! `type` (string, number, integer, boolean) plus optional `enum`, `default`,
//! `pattern`, `minLength` and `maxLength`.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Value type of a setting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingType {
    String,
    Number,
    Integer,
    Boolean,
}

impl SettingType {
    fn accepts(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Boolean => value.is_boolean(),
        }
    }
}

impl fmt::Display for SettingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
        };
        f.write_str(name)
    }
}

/// Schema of one setting.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingSchema {
    #[serde(rename = "type")]
    pub kind: SettingType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, rename = "enum", skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
}

/// A value that does not satisfy its schema.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettingViolation {
    /// Setting name.
    pub setting: String,
    /// What is wrong with the value.
    pub message: String,
}

impl fmt::Display for SettingViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.setting, self.message)
    }
}

impl SettingSchema {
    /// Check `value` against this schema, returning every violation.
    #[must_use]
    pub fn validate(&self, name: &str, value: &Value) -> Vec<SettingViolation> {
        let violation = |message: String| SettingViolation {
            setting: name.to_owned(),
            message,
        };

        if !self.kind.accepts(value) {
            return vec![violation(format!("expected type {}", self.kind))];
        }

        let mut violations = Vec::new();
        if let Some(allowed) = &self.allowed
            && !allowed.contains(value)
        {
            violations.push(violation("value is not one of the allowed options".to_owned()));
        }

        if let Some(text) = value.as_str() {
            let length = text.chars().count();
            if let Some(min) = self.min_length
                && length < min
            {
                violations.push(violation(format!("must be at least {min} characters")));
            }
            if let Some(max) = self.max_length
                && length > max
            {
                violations.push(violation(format!("must be at most {max} characters")));
            }
            if let Some(pattern) = &self.pattern {
                match Regex::new(pattern) {
                    Ok(re) if re.is_match(text) => {}
                    Ok(_) => violations.push(violation(format!("must match `{pattern}`"))),
                    Err(e) => violations.push(violation(format!("invalid pattern: {e}"))),
                }
            }
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema(yaml: &str) -> SettingSchema {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_parse_schema() {
        let s = schema("type: string\ntitle: Color\ndefault: '#000'\npattern: '^#[0-9a-f]{3,6}$'\nmaxLength: 7\n");
        assert_eq!(s.kind, SettingType::String);
        assert_eq!(s.title.as_deref(), Some("Color"));
        assert_eq!(s.default, Some(json!("#000")));
        assert_eq!(s.max_length, Some(7));
    }

    #[test]
    fn test_type_mismatch() {
        let s = schema("type: integer");
        assert!(s.validate("size", &json!(12)).is_empty());
        let v = s.validate("size", &json!(1.5));
        assert_eq!(v[0].to_string(), "size: expected type integer");
        assert_eq!(s.validate("size", &json!("12")).len(), 1);
    }

    #[test]
    fn test_enum() {
        let s = schema("type: string\nenum: [small, large]");
        assert!(s.validate("size", &json!("small")).is_empty());
        assert_eq!(s.validate("size", &json!("huge")).len(), 1);
    }

    #[test]
    fn test_string_constraints_all_reported() {
        let s = schema("type: string\nminLength: 4\npattern: '^[0-9]+$'");
        let v = s.validate("code", &json!("ab"));
        assert_eq!(v.len(), 2);
        assert!(s.validate("code", &json!("1234")).is_empty());
    }

    #[test]
    fn test_boolean_and_number() {
        assert!(schema("type: boolean").validate("b", &json!(true)).is_empty());
        assert!(schema("type: number").validate("n", &json!(1.5)).is_empty());
        assert!(schema("type: number").validate("n", &json!(2)).is_empty());
    }
}
