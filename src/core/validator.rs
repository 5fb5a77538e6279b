//! Declarative record validation.
//!
//! Each validatable type registers a table of `(field, accessor, rules)` entries once.
//! `Validator::validate` walks that table and collects one message per failing
//! field/rule pair. It never returns an error: an entity may live in memory while
//! violating its own rules until somebody asks.

use crate::core::manager::Registry;
use crate::domain::model::{Course, Professor, Student};
use crate::domain::ports::Identifiable;
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

/// A field value as seen by the rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Missing,
    Text(&'a str),
    Number(f64),
    Date(NaiveDate),
}

impl FieldValue<'_> {
    /// Numbers, and text that parses as a number. Anything else has no numeric view.
    fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => s.trim().parse::<f64>().ok(),
            FieldValue::Missing | FieldValue::Date(_) => None,
        }
    }
}

impl<'a> From<&'a str> for FieldValue<'a> {
    fn from(value: &'a str) -> Self {
        FieldValue::Text(value)
    }
}

impl<'a> From<&'a String> for FieldValue<'a> {
    fn from(value: &'a String) -> Self {
        FieldValue::Text(value)
    }
}

impl<'a, T> From<&'a Option<T>> for FieldValue<'a>
where
    &'a T: Into<FieldValue<'a>>,
{
    fn from(value: &'a Option<T>) -> Self {
        value.as_ref().map(Into::into).unwrap_or(FieldValue::Missing)
    }
}

impl From<f64> for FieldValue<'_> {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<u32> for FieldValue<'_> {
    fn from(value: u32) -> Self {
        FieldValue::Number(f64::from(value))
    }
}

#[derive(Debug, Clone)]
pub enum Rule {
    Required,
    /// Inclusive on both ends.
    Range { min: f64, max: f64 },
    /// Unanchored search: the pattern must carry its own `^`/`$` to require a full match.
    Pattern(Regex),
}

impl Rule {
    pub fn range(min: f64, max: f64) -> Self {
        Rule::Range { min, max }
    }

    /// Panics on an invalid pattern. Rule tables are built from literals.
    pub fn pattern(pattern: &str) -> Self {
        match Regex::new(pattern) {
            Ok(regex) => Rule::Pattern(regex),
            Err(e) => panic!("invalid validation pattern '{}': {}", pattern, e),
        }
    }

    pub fn try_pattern(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(Rule::Pattern)
    }

    fn check(&self, field: &str, value: FieldValue<'_>) -> Option<String> {
        match self {
            Rule::Required => {
                let missing = match value {
                    FieldValue::Missing => true,
                    FieldValue::Text(s) => s.trim().is_empty(),
                    FieldValue::Number(_) | FieldValue::Date(_) => false,
                };
                missing.then(|| format!("[Required] '{}' cannot be missing or empty.", field))
            }
            Rule::Range { min, max } => {
                let number = value.as_number()?;
                (number < *min || number > *max).then(|| {
                    format!(
                        "[Range] '{}' ({}) is out of range ({}-{}).",
                        field, number, min, max
                    )
                })
            }
            Rule::Pattern(regex) => match value {
                FieldValue::Text(s) if !s.is_empty() && !regex.is_match(s) => Some(format!(
                    "[Pattern] '{}' ('{}') does not match the format '{}'.",
                    field,
                    s,
                    regex.as_str()
                )),
                _ => None,
            },
        }
    }
}

type Accessor<T> = for<'a> fn(&'a T) -> FieldValue<'a>;

struct FieldRules<T> {
    name: &'static str,
    accessor: Accessor<T>,
    rules: Vec<Rule>,
}

/// Ordered rule table for one type.
pub struct RuleSet<T> {
    fields: Vec<FieldRules<T>>,
}

impl<T> Default for RuleSet<T> {
    fn default() -> Self {
        Self { fields: Vec::new() }
    }
}

impl<T> RuleSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: &'static str, accessor: Accessor<T>, rules: Vec<Rule>) -> Self {
        self.fields.push(FieldRules {
            name,
            accessor,
            rules,
        });
        self
    }

    pub fn check(&self, instance: &T) -> Vec<String> {
        self.fields
            .iter()
            .flat_map(|field| {
                let value = (field.accessor)(instance);
                field
                    .rules
                    .iter()
                    .filter_map(move |rule| rule.check(field.name, value))
            })
            .collect()
    }
}

pub trait Validatable: Sized + 'static {
    fn rule_set() -> &'static RuleSet<Self>;
}

impl Validatable for Student {
    fn rule_set() -> &'static RuleSet<Self> {
        static RULES: OnceLock<RuleSet<Student>> = OnceLock::new();
        RULES.get_or_init(|| {
            RuleSet::<Student>::new()
                .field("id", |s| s.person.id().into(), vec![Rule::Required])
                .field("first_name", |s| (&s.person.first_name).into(), vec![Rule::Required])
                .field("last_name", |s| (&s.person.last_name).into(), vec![Rule::Required])
                .field("birth_date", |s| FieldValue::Date(s.person.birth_date), vec![])
                .field("program", |s| (&s.program).into(), vec![Rule::Required])
                .field(
                    "enrollment_number",
                    |s| (&s.enrollment_number).into(),
                    vec![Rule::pattern(r"^\d{4}-\d{4}$")],
                )
        })
    }
}

impl Validatable for Professor {
    fn rule_set() -> &'static RuleSet<Self> {
        static RULES: OnceLock<RuleSet<Professor>> = OnceLock::new();
        RULES.get_or_init(|| {
            RuleSet::<Professor>::new()
                .field("id", |p| p.person.id().into(), vec![Rule::Required])
                .field("first_name", |p| (&p.person.first_name).into(), vec![Rule::Required])
                .field("last_name", |p| (&p.person.last_name).into(), vec![Rule::Required])
                .field("birth_date", |p| FieldValue::Date(p.person.birth_date), vec![])
                .field("department", |p| (&p.department).into(), vec![])
                .field("salary", |p| p.salary.into(), vec![Rule::range(30000.0, 150000.0)])
        })
    }
}

impl Validatable for Course {
    fn rule_set() -> &'static RuleSet<Self> {
        static RULES: OnceLock<RuleSet<Course>> = OnceLock::new();
        RULES.get_or_init(|| {
            RuleSet::<Course>::new()
                .field(
                    "code",
                    |c| (&c.code).into(),
                    vec![Rule::Required, Rule::pattern(r"^[A-Z]{2,3}-\d{3}$")],
                )
                .field("name", |c| (&c.name).into(), vec![Rule::Required])
                .field("credits", |c| c.credits.into(), vec![Rule::range(1.0, 6.0)])
                .field("professor_id", |c| (&c.professor_id).into(), vec![])
        })
    }
}

/// Outcome of checking one stored record.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordViolations {
    pub kind: &'static str,
    pub id: String,
    pub errors: Vec<String>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Validator;

impl Validator {
    pub fn new() -> Self {
        Self
    }

    /// Checks `instance` against its type's registered table.
    pub fn validate<T: Validatable>(&self, instance: &T) -> Vec<String> {
        self.validate_with(T::rule_set(), instance)
    }

    pub fn validate_with<T>(&self, rules: &RuleSet<T>, instance: &T) -> Vec<String> {
        let errors = rules.check(instance);
        if !errors.is_empty() {
            tracing::debug!("Validation found {} violation(s)", errors.len());
        }
        errors
    }

    /// Checks every student, professor and course, in that order.
    pub fn validate_registry(&self, registry: &Registry) -> Vec<RecordViolations> {
        let mut results = Vec::new();
        for s in registry.students.all_values() {
            results.push(self.record::<Student>(s));
        }
        for p in registry.professors.all_values() {
            results.push(self.record::<Professor>(p));
        }
        for c in registry.courses.all_values() {
            results.push(self.record::<Course>(c));
        }
        results
    }

    fn record<T: Validatable + Identifiable>(&self, instance: &T) -> RecordViolations {
        RecordViolations {
            kind: T::KIND,
            id: instance.identifier().to_string(),
            errors: self.validate(instance),
        }
    }
}
