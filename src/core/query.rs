//! List query pipeline: filtering, projection, sorting and pagination
//!
//! This module turns a raw URL query map into a [`ListQuery`], a pure value
//! describing one paginated fetch. Executing it against a store is the job of
//! [`Repository::list`](crate::core::repository::Repository::list).
//!
//! # Example
//! ```rust,ignore
//! // GET /api/v1/bootcamps?select=name,description&sort=-averageCost&page=2&limit=10&housing=true
//! let map = QueryMap::from_pairs(pairs);
//! let query = ListQuery::from_query_map(&map, &config.listing, SortSpec::ascending("name"));
//! assert_eq!(query.window.start_index(), 10);
//! ```

use crate::config::{CountScope, ListingConfig};
use crate::core::filter::{Filter, compare_values, lookup};
use crate::core::store::Populate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Query keys that control the listing and are never used as filters
pub const RESERVED_KEYS: [&str; 4] = ["select", "sort", "page", "limit"];

/// Identifier field every projection keeps
pub const ID_FIELD: &str = "id";

/// Default page number
pub const DEFAULT_PAGE: usize = 1;

/// A query-string value: one string, or several for repeated keys
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    Single(String),
    Many(Vec<String>),
}

impl QueryValue {
    /// All raw values
    pub fn values(&self) -> &[String] {
        match self {
            QueryValue::Single(s) => std::slice::from_ref(s),
            QueryValue::Many(v) => v,
        }
    }

    /// First raw value
    pub fn first(&self) -> Option<&str> {
        self.values().first().map(String::as_str)
    }

    /// All values joined with commas (for list-style parameters)
    pub fn joined(&self) -> String {
        self.values().join(",")
    }
}

/// URL query parameters keyed by name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryMap(BTreeMap<String, QueryValue>);

impl QueryMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the map from decoded `(key, value)` pairs
    ///
    /// Repeated keys are merged into a [`QueryValue::Many`] in arrival order.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut map = Self::new();
        for (key, value) in pairs {
            map.push(key, value);
        }
        map
    }

    /// Append a value, turning the entry into a list on repetition
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        let merged = match self.0.remove(&key) {
            Some(QueryValue::Single(existing)) => QueryValue::Many(vec![existing, value]),
            Some(QueryValue::Many(mut existing)) => {
                existing.push(value);
                QueryValue::Many(existing)
            }
            None => QueryValue::Single(value),
        };
        self.0.insert(key, merged);
    }

    pub fn insert(&mut self, key: impl Into<String>, value: QueryValue) {
        self.0.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Entries that are not reserved control keys
    pub fn filter_fields(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.iter().filter(|(k, _)| !RESERVED_KEYS.contains(k))
    }
}

impl FromIterator<(String, String)> for QueryMap {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self::from_pairs(iter)
    }
}

/// Split a delimited field list (`"name,description"` or `"name description"`)
fn split_field_list(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect()
}

/// Field projection derived from `select`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Projection {
    fields: Vec<String>,
}

impl Projection {
    /// Parse a comma/space separated field list; `None` when it names no field
    pub fn parse(raw: &str) -> Option<Self> {
        let fields = split_field_list(raw);
        if fields.is_empty() {
            None
        } else {
            Some(Self { fields })
        }
    }

    pub fn from_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Requested fields (without the implicit identifier)
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Keep only the requested fields and the identifier
    pub fn apply(&self, document: &Value) -> Value {
        let mut projected = Map::new();

        if let Some(id) = document.get(ID_FIELD) {
            projected.insert(ID_FIELD.to_string(), id.clone());
        }

        for field in &self.fields {
            if let Some(value) = lookup(document, field) {
                insert_path(&mut projected, field, value.clone());
            }
        }

        Value::Object(projected)
    }
}

/// Insert a value at a dot path, creating intermediate objects
fn insert_path(target: &mut Map<String, Value>, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            target.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let child = target
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(child) = child {
                insert_path(child, rest, value);
            }
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// One sort key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
}

impl SortKey {
    /// Parse `field`, `-field`, `field:asc` or `field:desc`
    pub fn parse(raw: &str) -> Option<Self> {
        let (field, direction) = if let Some(field) = raw.strip_prefix('-') {
            (field, SortDirection::Desc)
        } else if let Some(field) = raw.strip_suffix(":desc") {
            (field, SortDirection::Desc)
        } else if let Some(field) = raw.strip_suffix(":asc") {
            (field, SortDirection::Asc)
        } else {
            (raw, SortDirection::Asc)
        };

        if field.is_empty() {
            None
        } else {
            Some(Self {
                field: field.to_string(),
                direction,
            })
        }
    }
}

/// Ordered list of sort keys
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortSpec {
    keys: Vec<SortKey>,
}

impl SortSpec {
    /// Single ascending key
    pub fn ascending(field: &str) -> Self {
        Self {
            keys: vec![SortKey {
                field: field.to_string(),
                direction: SortDirection::Asc,
            }],
        }
    }

    /// Parse a delimited list of sort keys; `None` when it names no field
    pub fn parse(raw: &str) -> Option<Self> {
        let keys: Vec<SortKey> = split_field_list(raw)
            .iter()
            .filter_map(|k| SortKey::parse(k))
            .collect();
        if keys.is_empty() {
            None
        } else {
            Some(Self { keys })
        }
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    /// Compare two documents by every key in order
    pub fn compare(&self, a: &Value, b: &Value) -> Ordering {
        for key in &self.keys {
            let ord = compare_values(lookup(a, &key.field), lookup(b, &key.field));
            let ord = match key.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

/// Parse a positive integer the forgiving way URL parameters expect
///
/// Leading whitespace is skipped and the leading run of digits is used
/// (`"10abc"` is 10). Zero, negatives and garbage yield `None`.
pub fn parse_positive(raw: &str) -> Option<usize> {
    let digits: String = raw
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse::<usize>().ok().filter(|n| *n >= 1)
}

/// Page number and size for one listing request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    /// Page number (starts at 1)
    pub page: usize,
    /// Number of items per page
    pub limit: usize,
}

impl PageWindow {
    /// Window with explicit values, clamped to at least 1
    pub fn new(page: usize, limit: usize) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    /// Derive the window from raw `page`/`limit` parameters
    ///
    /// Missing or malformed values fall back to the defaults; `limit` is
    /// capped at `config.max_limit`.
    pub fn from_params(page: Option<&str>, limit: Option<&str>, config: &ListingConfig) -> Self {
        let page = page.and_then(parse_positive).unwrap_or(DEFAULT_PAGE);
        let limit = limit
            .and_then(parse_positive)
            .unwrap_or(config.default_limit)
            .min(config.max_limit.max(1));
        Self::new(page, limit)
    }

    /// Index of the first document on this page
    pub fn start_index(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Index one past the last document on this page
    pub fn end_index(&self) -> usize {
        self.page.saturating_mul(self.limit)
    }
}

impl Default for PageWindow {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, crate::config::DEFAULT_LIMIT)
    }
}

/// Reference to an adjacent page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLink {
    pub page: usize,
    pub limit: usize,
}

/// Pagination metadata returned with a listing
///
/// Serializes to `{}` when there is neither a next nor a previous page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageLink>,
}

impl Pagination {
    /// Compute adjacent pages for a window over `total` documents
    pub fn new(window: PageWindow, total: usize) -> Self {
        let next = (window.end_index() < total).then(|| PageLink {
            page: window.page.saturating_add(1),
            limit: window.limit,
        });
        let prev = (window.start_index() > 0).then(|| PageLink {
            page: window.page - 1,
            limit: window.limit,
        });
        Self { next, prev }
    }
}

/// A fully derived listing request
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub filter: Filter,
    pub projection: Option<Projection>,
    pub sort: SortSpec,
    pub window: PageWindow,
    pub count_scope: CountScope,
    pub populate: Vec<Populate>,
}

impl ListQuery {
    /// Derive a listing request from URL parameters
    ///
    /// Reserved keys drive projection, sort and pagination; every other key
    /// becomes a filter condition. `default_sort` applies when `sort` is
    /// absent or names no field.
    pub fn from_query_map(map: &QueryMap, config: &ListingConfig, default_sort: SortSpec) -> Self {
        let filter = Filter::from_fields(map.filter_fields());

        let projection = map
            .get("select")
            .and_then(|v| Projection::parse(&v.joined()));

        let sort = map
            .get("sort")
            .and_then(|v| SortSpec::parse(&v.joined()))
            .unwrap_or(default_sort);

        let window = PageWindow::from_params(
            map.get("page").and_then(QueryValue::first),
            map.get("limit").and_then(QueryValue::first),
            config,
        );

        tracing::debug!(
            conditions = filter.conditions().len(),
            page = window.page,
            limit = window.limit,
            "built list query"
        );

        Self {
            filter,
            projection,
            sort,
            window,
            count_scope: config.count_scope,
            populate: Vec::new(),
        }
    }

    /// Eagerly resolve a related collection as part of the fetch
    pub fn with_populate(mut self, populate: Populate) -> Self {
        self.populate.push(populate);
        self
    }

    /// Filter the total count is computed over
    pub fn count_filter(&self) -> Filter {
        match self.count_scope {
            CountScope::Filtered => self.filter.clone(),
            CountScope::Collection => Filter::new(),
        }
    }
}
