//! Declarative form validation
//!
//! Each endpoint declares its input schema as a slice of [`FieldRule`]s;
//! [`check`] evaluates the schema uniformly over the raw form map and either
//! returns the parsed values or a structured per-field error list
//! ([`FieldError`]) that the client renders next to the relevant form field.

use std::collections::HashMap;

use serde_json::{Value, json};

use crate::utils::error::{AppError, FieldError};

// ── Text length limits ──────────────────────────────────────────────

/// Alt text for uploaded photos
pub const MAX_ALT_TEXT_LEN: usize = 500;

/// Tag names (person to find)
pub const MAX_TAG_NAME_LEN: usize = 50;

/// Leaderboard names are arcade-style: exactly 3 characters, and the
/// schema further restricts them to letters and digits (a product choice,
/// matching the three-initials convention)
pub const SCORE_NAME_LEN: usize = 3;

/// Admin password input (before comparison)
pub const MAX_PASSWORD_LEN: usize = 128;

// ── Schema types ────────────────────────────────────────────────────

/// What a field must parse as
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// Non-empty free text within a length range
    Text { min: usize, max: usize },
    /// Letters and digits only, within a length range
    Alphanumeric { min: usize, max: usize },
    /// Numeric, coerced from its string form, within an inclusive range
    Float { min: f64, max: f64 },
    /// Integer identifier, coerced from its string form
    Integer,
}

/// One field of an input schema
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub required: bool,
    pub kind: FieldKind,
}

impl FieldRule {
    pub const fn text(name: &'static str, min: usize, max: usize) -> Self {
        Self {
            name,
            required: true,
            kind: FieldKind::Text { min, max },
        }
    }

    pub const fn alphanumeric(name: &'static str, min: usize, max: usize) -> Self {
        Self {
            name,
            required: true,
            kind: FieldKind::Alphanumeric { min, max },
        }
    }

    pub const fn float(name: &'static str, min: f64, max: f64) -> Self {
        Self {
            name,
            required: true,
            kind: FieldKind::Float { min, max },
        }
    }

    pub const fn integer(name: &'static str) -> Self {
        Self {
            name,
            required: true,
            kind: FieldKind::Integer,
        }
    }

    pub const fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

/// A parsed field value
#[derive(Debug, Clone)]
enum FieldValue {
    Text(String),
    Float(f64),
    Integer(i64),
}

/// Parsed output of a successful [`check`]
#[derive(Debug, Default)]
pub struct Validated {
    values: HashMap<&'static str, FieldValue>,
}

impl Validated {
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(FieldValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn float(&self, name: &str) -> Option<f64> {
        match self.values.get(name) {
            Some(FieldValue::Float(f)) => Some(*f),
            _ => None,
        }
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        match self.values.get(name) {
            Some(FieldValue::Integer(i)) => Some(*i),
            _ => None,
        }
    }

    // Required-field accessors. A miss here means the schema and the
    // handler disagree, which is a server bug, not client input.

    pub fn require_text(&self, name: &str) -> Result<&str, AppError> {
        self.text(name)
            .ok_or_else(|| AppError::internal(format!("field '{name}' not captured by schema")))
    }

    pub fn require_float(&self, name: &str) -> Result<f64, AppError> {
        self.float(name)
            .ok_or_else(|| AppError::internal(format!("field '{name}' not captured by schema")))
    }

    pub fn require_int(&self, name: &str) -> Result<i64, AppError> {
        self.int(name)
            .ok_or_else(|| AppError::internal(format!("field '{name}' not captured by schema")))
    }
}

/// Evaluate a schema over a raw form map.
///
/// All rules are checked; every failing field shows up in the error list
/// so the client can mark each offending input at once.
pub fn check(rules: &[FieldRule], form: &HashMap<String, String>) -> Result<Validated, AppError> {
    let mut validated = Validated::default();
    let mut errors: Vec<FieldError> = Vec::new();

    for rule in rules {
        let raw = form.get(rule.name).map(|s| s.trim());
        match raw {
            None | Some("") => {
                if rule.required {
                    errors.push(FieldError::new(
                        rule.name,
                        format!("{} is required", rule.name),
                        Value::Null,
                    ));
                }
            }
            Some(value) => match parse_field(rule, value) {
                Ok(parsed) => {
                    validated.values.insert(rule.name, parsed);
                }
                Err(msg) => errors.push(FieldError::new(rule.name, msg, json!(value))),
            },
        }
    }

    if errors.is_empty() {
        Ok(validated)
    } else {
        Err(AppError::validation(errors))
    }
}

fn parse_field(rule: &FieldRule, value: &str) -> Result<FieldValue, String> {
    match rule.kind {
        FieldKind::Text { min, max } => {
            check_len(rule.name, value, min, max)?;
            Ok(FieldValue::Text(value.to_string()))
        }
        FieldKind::Alphanumeric { min, max } => {
            check_len(rule.name, value, min, max)?;
            if !value.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(format!(
                    "{} must contain only letters and numbers",
                    rule.name
                ));
            }
            Ok(FieldValue::Text(value.to_string()))
        }
        FieldKind::Float { min, max } => {
            let parsed: f64 = value
                .parse()
                .map_err(|_| format!("{} must be a number", rule.name))?;
            if !parsed.is_finite() || parsed < min || parsed > max {
                return Err(format!("{} must be between {} and {}", rule.name, min, max));
            }
            Ok(FieldValue::Float(parsed))
        }
        FieldKind::Integer => {
            let parsed: i64 = value
                .parse()
                .map_err(|_| format!("{} must be an integer", rule.name))?;
            Ok(FieldValue::Integer(parsed))
        }
    }
}

fn check_len(name: &str, value: &str, min: usize, max: usize) -> Result<(), String> {
    let len = value.chars().count();
    if len < min || len > max {
        if min == max {
            return Err(format!("{name} must be exactly {min} characters"));
        }
        return Err(format!("{name} must be between {min} and {max} characters"));
    }
    Ok(())
}
