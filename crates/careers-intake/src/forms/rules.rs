use std::collections::BTreeMap;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;

use super::value::{FieldValue, FormValues};

const DATE_FORMAT: &str = "%Y-%m-%d";

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles"))
}

/// Derived mapping of field name to a human-readable validation message.
///
/// Invariant: always produced by [`RuleSet::evaluate`] from the current value
/// bag; never mutated independently.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorMap(BTreeMap<String, String>);

impl ErrorMap {
    pub(crate) fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Predicate on another field's current value.
///
/// Conditions are evaluated against the value bag at validation time, so a
/// dependent rule always tracks the controlling field's latest selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub field: String,
    pub equals: String,
}

impl Condition {
    pub fn field_equals(field: impl Into<String>, equals: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            equals: equals.into(),
        }
    }

    pub fn holds(&self, values: &FormValues) -> bool {
        values
            .text(&self.field)
            .map(|value| value == self.equals)
            .unwrap_or(false)
    }
}

/// Numeric parsing, precision, and range checks for one field.
#[derive(Debug, Clone)]
pub struct NumericRule {
    pub label: String,
    /// Round half-up to this many decimal digits before range checks.
    pub round_to: Option<u32>,
    /// Reject inputs carrying more than this many decimal digits.
    pub max_decimals: Option<u32>,
    pub decimals_message: Option<String>,
    pub max: Option<f64>,
    pub max_message: Option<String>,
}

impl NumericRule {
    pub fn positive(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            round_to: None,
            max_decimals: None,
            decimals_message: None,
            max: None,
            max_message: None,
        }
    }

    pub fn round_to(mut self, places: u32) -> Self {
        self.round_to = Some(places);
        self
    }

    pub fn max_decimals(mut self, places: u32, message: impl Into<String>) -> Self {
        self.max_decimals = Some(places);
        self.decimals_message = Some(message.into());
        self
    }

    pub fn max(mut self, ceiling: f64, message: impl Into<String>) -> Self {
        self.max = Some(ceiling);
        self.max_message = Some(message.into());
        self
    }

    /// Check a raw textual value. Returns the first violation message.
    fn check(&self, raw: &str) -> Option<String> {
        let trimmed = raw.trim();
        let Ok(parsed) = trimmed.parse::<f64>() else {
            return Some(format!("{} must be a number", self.label));
        };
        if !parsed.is_finite() {
            return Some(format!("{} must be a number", self.label));
        }

        if let (Some(limit), Some(message)) = (self.max_decimals, self.decimals_message.as_ref()) {
            if decimal_digits(trimmed) > limit as usize {
                return Some(message.clone());
            }
        }

        let value = match self.round_to {
            Some(places) => round_half_up(trimmed, places).unwrap_or(parsed),
            None => parsed,
        };

        if value <= 0.0 {
            return Some(format!("{} must be a positive number", self.label));
        }

        if let (Some(ceiling), Some(message)) = (self.max, self.max_message.as_ref()) {
            if value > ceiling {
                return Some(message.clone());
            }
        }

        None
    }
}

/// Composite character-class requirements (passwords).
#[derive(Debug, Clone)]
pub struct CharacterClassRule {
    pub require_lowercase: bool,
    pub require_uppercase: bool,
    pub require_digit: bool,
    /// Special characters that are both permitted and (one of them) required.
    pub specials: String,
    pub message: String,
}

impl CharacterClassRule {
    fn check(&self, text: &str) -> Option<String> {
        let permitted = |c: char| c.is_ascii_alphanumeric() || self.specials.contains(c);
        if !text.chars().all(permitted) {
            return Some(self.message.clone());
        }
        if self.require_lowercase && !text.chars().any(|c| c.is_ascii_lowercase()) {
            return Some(self.message.clone());
        }
        if self.require_uppercase && !text.chars().any(|c| c.is_ascii_uppercase()) {
            return Some(self.message.clone());
        }
        if self.require_digit && !text.chars().any(|c| c.is_ascii_digit()) {
            return Some(self.message.clone());
        }
        if !self.specials.is_empty() && !text.chars().any(|c| self.specials.contains(c)) {
            return Some(self.message.clone());
        }
        None
    }
}

/// A single declarative constraint attached to a field.
///
/// `Required`, `MinTags`, and `AttachmentRequired` fire on missing or blank
/// values; the remaining constraints are skipped while the field is blank so
/// the required message wins for empty fields.
#[derive(Debug, Clone)]
pub enum Constraint {
    Required { message: String },
    /// Value must parse as a calendar date (YYYY-MM-DD).
    Date { message: String },
    Numeric(NumericRule),
    MinLength { min: usize, message: String },
    Email { message: String },
    CharacterClasses(CharacterClassRule),
    /// Tag lists must carry at least `min` entries.
    MinTags { min: usize, message: String },
    /// A file reference must have been attached.
    AttachmentRequired { message: String },
    /// Constraints applied only while `when` holds against the current values.
    Conditional {
        when: Condition,
        then: Vec<Constraint>,
    },
}

/// The ordered constraints declared for one field.
#[derive(Debug, Clone)]
pub struct FieldRules {
    pub field: String,
    pub constraints: Vec<Constraint>,
}

impl FieldRules {
    pub fn new(field: impl Into<String>, constraints: Vec<Constraint>) -> Self {
        Self {
            field: field.into(),
            constraints,
        }
    }
}

/// Declarative validation schema: plain data mapping fields to constraints.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<FieldRules>,
}

impl RuleSet {
    pub fn new(rules: Vec<FieldRules>) -> Self {
        Self { rules }
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldRules> {
        self.rules.iter()
    }

    /// Derive the error map for the current value bag.
    ///
    /// Pure: the output depends only on the rule set and `values`. The first
    /// violated constraint for a field supplies its message.
    pub fn evaluate(&self, values: &FormValues) -> ErrorMap {
        let mut errors = ErrorMap::default();
        for rules in &self.rules {
            if let Some(message) = first_violation(&rules.constraints, &rules.field, values) {
                errors.insert(rules.field.as_str(), message);
            }
        }
        errors
    }
}

fn first_violation(constraints: &[Constraint], field: &str, values: &FormValues) -> Option<String> {
    for constraint in constraints {
        match constraint {
            Constraint::Conditional { when, then } => {
                if when.holds(values) {
                    if let Some(message) = first_violation(then, field, values) {
                        return Some(message);
                    }
                }
            }
            other => {
                if let Some(message) = check_constraint(other, field, values) {
                    return Some(message);
                }
            }
        }
    }
    None
}

fn check_constraint(constraint: &Constraint, field: &str, values: &FormValues) -> Option<String> {
    let blank = values.is_blank(field);
    match constraint {
        Constraint::Required { message } => blank.then(|| message.clone()),
        Constraint::MinTags { min, message } => {
            let count = values.tags(field).map(<[String]>::len).unwrap_or(0);
            (count < *min).then(|| message.clone())
        }
        Constraint::AttachmentRequired { message } => {
            let attached = values.file(field).map(|f| !f.is_empty()).unwrap_or(false);
            (!attached).then(|| message.clone())
        }
        _ if blank => None,
        Constraint::Date { message } => {
            let raw = values.get(field).and_then(FieldValue::raw_text)?;
            NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
                .is_err()
                .then(|| message.clone())
        }
        Constraint::Numeric(rule) => {
            let raw = values.get(field).and_then(FieldValue::raw_text)?;
            rule.check(&raw)
        }
        Constraint::MinLength { min, message } => {
            let text = values.text(field)?;
            (text.chars().count() < *min).then(|| message.clone())
        }
        Constraint::Email { message } => {
            let text = values.text(field)?;
            (!email_regex().is_match(text.trim())).then(|| message.clone())
        }
        Constraint::CharacterClasses(rule) => {
            let text = values.text(field)?;
            rule.check(text)
        }
        Constraint::Conditional { .. } => None,
    }
}

/// Count the decimal digits the input was typed with.
fn decimal_digits(raw: &str) -> usize {
    raw.split_once('.')
        .map(|(_, fraction)| fraction.chars().take_while(char::is_ascii_digit).count())
        .unwrap_or(0)
}

/// Round a plain decimal literal half-up at `places` digits.
///
/// Works on the decimal text rather than the parsed float so "50.05" rounds
/// to 50.1 instead of the 50.0 its nearest binary double would produce.
/// Returns `None` for inputs that are not plain decimal literals (exponents,
/// stray characters); callers fall back to the parsed value.
fn round_half_up(raw: &str, places: u32) -> Option<f64> {
    let trimmed = raw.trim();
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (unsigned, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !int_part.chars().all(|c| c.is_ascii_digit())
        || !frac_part.chars().all(|c| c.is_ascii_digit())
    {
        return None;
    }

    let places = places as usize;
    let mut scaled: i64 = 0;
    for c in int_part.chars() {
        scaled = scaled.checked_mul(10)?.checked_add((c as u8 - b'0') as i64)?;
    }
    let mut kept = 0usize;
    for c in frac_part.chars() {
        if kept == places {
            if c as u8 - b'0' >= 5 {
                scaled = scaled.checked_add(1)?;
            }
            break;
        }
        scaled = scaled.checked_mul(10)?.checked_add((c as u8 - b'0') as i64)?;
        kept += 1;
    }
    while kept < places {
        scaled = scaled.checked_mul(10)?;
        kept += 1;
    }

    let mut value = scaled as f64 / 10f64.powi(places as i32);
    if negative {
        value = -value;
    }
    Some(value)
}
