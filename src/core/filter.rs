//! Filter predicates built from query-string fields
//!
//! A [`Filter`] is a conjunction of [`Condition`]s. Each condition names a
//! document field (dot paths reach into nested objects), an operator and one
//! or more raw string values straight from the URL.
//!
//! # Format
//! - Exact match: `?housing=true`
//! - Any of: `?careers=Web&careers=UI` or `?careers[in]=Web,UI`
//! - Comparison: `?averageCost[lte]=10000`, `?tuition[gt]=5000`
//! - Negation: `?minimumSkill[ne]=advanced`
//!
//! Raw values are coerced to the type of the stored value when a document is
//! tested, so `?tuition[gt]=5000` compares numerically against numeric fields.

use crate::core::query::QueryValue;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;
use std::sync::OnceLock;

/// Comparison operator of a filter condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
}

impl FilterOp {
    /// Parse the bracketed operator suffix (`gt`, `lte`, ...)
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "gt" => Some(FilterOp::Gt),
            "gte" => Some(FilterOp::Gte),
            "lt" => Some(FilterOp::Lt),
            "lte" => Some(FilterOp::Lte),
            "in" => Some(FilterOp::In),
            "ne" => Some(FilterOp::Ne),
            _ => None,
        }
    }

    /// Native operator name used by MongoDB-like stores
    pub fn mongo_operator(&self) -> &'static str {
        match self {
            FilterOp::Eq => "$eq",
            FilterOp::Ne => "$ne",
            FilterOp::Gt => "$gt",
            FilterOp::Gte => "$gte",
            FilterOp::Lt => "$lt",
            FilterOp::Lte => "$lte",
            FilterOp::In => "$in",
        }
    }
}

/// A single predicate on one field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Condition {
    /// Field path (`name`, `location.city`)
    pub field: String,
    pub op: FilterOp,
    /// Raw values; exactly one for every operator except `In`
    pub values: Vec<String>,
}

impl Condition {
    pub fn new(field: impl Into<String>, op: FilterOp, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            op,
            values: vec![value.into()],
        }
    }

    /// Test this condition against a JSON document
    pub fn matches(&self, document: &Value) -> bool {
        let stored = lookup(document, &self.field);

        match self.op {
            FilterOp::Ne => !self.values.iter().any(|raw| value_eq(stored, raw)),
            FilterOp::Eq | FilterOp::In => self.values.iter().any(|raw| value_eq(stored, raw)),
            FilterOp::Gt | FilterOp::Gte | FilterOp::Lt | FilterOp::Lte => {
                let Some(raw) = self.values.first() else {
                    return false;
                };
                any_element(stored, |v| match compare_raw(v, raw) {
                    Some(ord) => match self.op {
                        FilterOp::Gt => ord == Ordering::Greater,
                        FilterOp::Gte => ord != Ordering::Less,
                        FilterOp::Lt => ord == Ordering::Less,
                        FilterOp::Lte => ord != Ordering::Greater,
                        _ => false,
                    },
                    None => false,
                })
            }
        }
    }
}

/// Conjunction of conditions
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Filter {
    conditions: Vec<Condition>,
}

fn operator_key_regex() -> &'static Regex {
    static OPERATOR_KEY: OnceLock<Regex> = OnceLock::new();
    OPERATOR_KEY.get_or_init(|| {
        Regex::new(r"^([A-Za-z0-9_.]+)\[([a-z]+)\]$").expect("operator key regex is valid")
    })
}

impl Filter {
    /// A filter that matches every document
    pub fn new() -> Self {
        Self::default()
    }

    /// Single equality condition
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            conditions: vec![Condition::new(field, FilterOp::Eq, value)],
        }
    }

    /// Add a condition (builder style)
    pub fn and(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Build a filter from query-string fields
    ///
    /// Keys of the form `field[op]` become operator conditions; any other key
    /// is an equality condition (or `In` when repeated).
    pub fn from_fields<'a, I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a QueryValue)>,
    {
        let mut conditions = Vec::new();

        for (key, value) in fields {
            let parsed = operator_key_regex().captures(key).and_then(|caps| {
                let op = FilterOp::from_suffix(caps.get(2)?.as_str())?;
                Some((caps.get(1)?.as_str().to_string(), op))
            });

            match parsed {
                Some((field, FilterOp::In)) => {
                    let values = value
                        .values()
                        .iter()
                        .flat_map(|v| v.split(','))
                        .map(|v| v.trim().to_string())
                        .filter(|v| !v.is_empty())
                        .collect();
                    conditions.push(Condition {
                        field,
                        op: FilterOp::In,
                        values,
                    });
                }
                Some((field, op)) => {
                    for raw in value.values() {
                        conditions.push(Condition::new(field.clone(), op, raw.clone()));
                    }
                }
                None => match value {
                    QueryValue::Single(raw) => {
                        conditions.push(Condition::new(key, FilterOp::Eq, raw.clone()));
                    }
                    QueryValue::Many(raws) => conditions.push(Condition {
                        field: key.to_string(),
                        op: FilterOp::In,
                        values: raws.clone(),
                    }),
                },
            }
        }

        Self { conditions }
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Names of all filtered fields
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.conditions.iter().map(|c| c.field.as_str())
    }

    /// Test all conditions against a JSON document
    pub fn matches(&self, document: &Value) -> bool {
        self.conditions.iter().all(|c| c.matches(document))
    }
}

/// Resolve a dot path inside a JSON document
pub fn lookup<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(document, |current, segment| current.get(segment))
}

/// Apply a predicate to a value, or to each element when the value is an array
fn any_element(stored: Option<&Value>, pred: impl Fn(&Value) -> bool) -> bool {
    match stored {
        Some(Value::Array(items)) => items.iter().any(&pred),
        Some(value) => pred(value),
        None => false,
    }
}

fn value_eq(stored: Option<&Value>, raw: &str) -> bool {
    any_element(stored, |v| compare_raw(v, raw) == Some(Ordering::Equal))
}

/// Compare a stored value with a raw query string coerced to the stored type
fn compare_raw(stored: &Value, raw: &str) -> Option<Ordering> {
    match stored {
        Value::Number(n) => {
            let lhs = n.as_f64()?;
            let rhs = raw.trim().parse::<f64>().ok()?;
            lhs.partial_cmp(&rhs)
        }
        Value::Bool(b) => {
            let rhs = raw.trim().parse::<bool>().ok()?;
            Some(b.cmp(&rhs))
        }
        Value::String(s) => Some(s.as_str().cmp(raw)),
        _ => None,
    }
}

/// Total ordering over optional JSON values used for sorting
///
/// Missing and null values order first, then booleans, numbers and strings.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(v: Option<&Value>) -> u8 {
        match v {
            None | Some(Value::Null) => 0,
            Some(Value::Bool(_)) => 1,
            Some(Value::Number(_)) => 2,
            Some(Value::String(_)) => 3,
            Some(Value::Array(_)) => 4,
            Some(Value::Object(_)) => 5,
        }
    }

    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .unwrap_or(f64::NAN)
            .partial_cmp(&y.as_f64().unwrap_or(f64::NAN))
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}
