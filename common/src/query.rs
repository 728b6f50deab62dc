//! Project query model and its URL query-string codec.
//!
//! The query string is the only persisted filter state of the project
//! browser.  Recognized keys are decoded into typed values; anything else is
//! carried through verbatim so that links produced by other pages survive a
//! round trip through the browser.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::form_urlencoded;

/// How a recognized key is encoded in the query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Str,
    /// `1` / `0`.
    Bool,
    Number,
    /// Comma separated, no empty elements.
    List,
}

/// Every key the project browser understands, with its codec.
pub const RECOGNIZED_KEYS: &[(&str, ParamKind)] = &[
    ("action", ParamKind::Str),
    ("basedOnMyInterests", ParamKind::Bool),
    ("campaign", ParamKind::Str),
    ("createdByMe", ParamKind::Bool),
    ("createdFrom", ParamKind::Str),
    ("difficulty", ParamKind::Str),
    ("downloadAsCSV", ParamKind::Bool),
    ("exactTypes", ParamKind::Bool),
    ("favoritedByMe", ParamKind::Bool),
    ("interests", ParamKind::List),
    ("location", ParamKind::Str),
    ("managedByMe", ParamKind::Bool),
    ("mappedByMe", ParamKind::Bool),
    ("omitMapResults", ParamKind::Bool),
    ("orderBy", ParamKind::Str),
    ("orderByType", ParamKind::Str),
    ("organisation", ParamKind::Str),
    ("page", ParamKind::Number),
    ("partnerId", ParamKind::Str),
    ("partnershipFrom", ParamKind::Str),
    ("partnershipTo", ParamKind::Str),
    ("stale", ParamKind::Bool),
    ("status", ParamKind::Str),
    ("text", ParamKind::Str),
    ("types", ParamKind::List),
];

/// Filters that scope a listing to the logged-in user.
pub const USER_SCOPE_KEYS: [&str; 5] = [
    "createdByMe",
    "managedByMe",
    "mappedByMe",
    "favoritedByMe",
    "status",
];

/// Codec of a recognized key, `None` for pass-through keys.
pub fn param_kind(key: &str) -> Option<ParamKind> {
    RECOGNIZED_KEYS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, kind)| *kind)
}

// ─── Values ──────────────────────────────────────────────────────────────────

/// A decoded value of a recognized key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Number(i64),
    List(Vec<String>),
    Str(String),
}

impl ParamValue {
    /// Query-string form of the value.
    pub fn encode(&self) -> String {
        match self {
            ParamValue::Bool(true) => "1".to_string(),
            ParamValue::Bool(false) => "0".to_string(),
            ParamValue::Number(n) => n.to_string(),
            ParamValue::List(items) => items.join(","),
            ParamValue::Str(s) => s.clone(),
        }
    }

    /// Decode a raw query-string value.  `None` when the value does not fit
    /// the key's codec.
    pub fn decode(kind: ParamKind, raw: &str) -> Option<Self> {
        match kind {
            ParamKind::Str => Some(ParamValue::Str(raw.to_string())),
            ParamKind::Bool => match raw {
                "1" | "true" => Some(ParamValue::Bool(true)),
                "0" | "false" => Some(ParamValue::Bool(false)),
                _ => None,
            },
            ParamKind::Number => raw.trim().parse().ok().map(ParamValue::Number),
            ParamKind::List => {
                let items: Vec<String> = raw
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect();
                (!items.is_empty()).then_some(ParamValue::List(items))
            }
        }
    }

    /// Bring a value into the shape `kind` expects, re-decoding it from its
    /// encoded form when the variants differ.
    fn coerce(self, kind: ParamKind) -> Option<Self> {
        match (kind, self) {
            (ParamKind::Str, v @ ParamValue::Str(_)) => Some(v),
            (ParamKind::Bool, v @ ParamValue::Bool(_)) => Some(v),
            (ParamKind::Number, v @ ParamValue::Number(_)) => Some(v),
            (kind, other) => ParamValue::decode(kind, &other.encode()),
        }
    }

    /// Whether the value counts as "set" for filtering purposes.
    pub fn is_truthy(&self) -> bool {
        match self {
            ParamValue::Bool(b) => *b,
            ParamValue::Number(n) => *n != 0,
            ParamValue::List(items) => !items.is_empty(),
            ParamValue::Str(s) => !s.is_empty(),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Number(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Number(i64::from(value))
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Str(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(value: Vec<String>) -> Self {
        ParamValue::List(value)
    }
}

// ─── Partial updates ─────────────────────────────────────────────────────────

/// A partial update of a [`ProjectQuery`]: only the named keys change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryUpdate {
    assignments: Vec<(String, Option<ParamValue>)>,
}

impl QueryUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `value` to `key`.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.assignments.push((key.into(), Some(value.into())));
        self
    }

    /// Remove `key` from the query.
    pub fn clear(mut self, key: impl Into<String>) -> Self {
        self.assignments.push((key.into(), None));
        self
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.assignments.iter().map(|(k, _)| k.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

// ─── Query ───────────────────────────────────────────────────────────────────

/// The effective filter/search/sort/pagination state of a project listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectQuery {
    params: BTreeMap<String, ParamValue>,
    passthrough: Vec<(String, String)>,
}

impl ProjectQuery {
    /// Parse a URL query string, with or without the leading `?`.
    ///
    /// Undecodable values of recognized keys are dropped; when a recognized
    /// key repeats, the last occurrence wins.
    pub fn parse(search: &str) -> Self {
        let search = search.strip_prefix('?').unwrap_or(search);
        let mut query = ProjectQuery::default();

        for (key, raw) in form_urlencoded::parse(search.as_bytes()) {
            match param_kind(&key) {
                Some(kind) => match ParamValue::decode(kind, &raw) {
                    Some(value) => {
                        query.params.insert(key.into_owned(), value);
                    }
                    None => {
                        debug!(key = %key, value = %raw, "Dropping undecodable query parameter");
                        query.params.remove(&*key);
                    }
                },
                None => query.passthrough.push((key.into_owned(), raw.into_owned())),
            }
        }
        query
    }

    /// Canonical query string (no leading `?`): recognized keys in
    /// alphabetical order, then pass-through keys in their original order.
    pub fn to_query_string(&self) -> String {
        let mut out = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.params {
            out.append_pair(key, &value.encode());
        }
        for (key, value) in &self.passthrough {
            out.append_pair(key, value);
        }
        out.finish()
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.params.get(key)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.params.get(key) {
            Some(ParamValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.params.get(key) {
            Some(ParamValue::Str(s)) => Some(s),
            _ => None,
        }
    }

    pub fn get_list(&self, key: &str) -> &[String] {
        match self.params.get(key) {
            Some(ParamValue::List(items)) => items,
            _ => &[],
        }
    }

    /// Current page, 1 when absent.
    pub fn page(&self) -> i64 {
        match self.params.get("page") {
            Some(ParamValue::Number(n)) if *n > 0 => *n,
            _ => 1,
        }
    }

    /// Whether `key` holds a truthy value.
    pub fn is_set(&self, key: &str) -> bool {
        self.params.get(key).is_some_and(ParamValue::is_truthy)
    }

    /// Recognized keys with their values, in serialization order.
    pub fn params(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Unrecognized keys, verbatim.
    pub fn passthrough(&self) -> &[(String, String)] {
        &self.passthrough
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty() && self.passthrough.is_empty()
    }

    /// Assign or remove a single key.  Values are coerced to the key's codec;
    /// a value that does not fit removes the key.
    pub fn set(&mut self, key: &str, value: Option<ParamValue>) {
        match param_kind(key) {
            Some(kind) => match value.and_then(|v| v.coerce(kind)) {
                Some(v) => {
                    self.params.insert(key.to_string(), v);
                }
                None => {
                    self.params.remove(key);
                }
            },
            None => {
                self.passthrough.retain(|(k, _)| k != key);
                if let Some(v) = value {
                    self.passthrough.push((key.to_string(), v.encode()));
                }
            }
        }
    }

    /// Apply a partial update.  Returns `true` when the query changed.
    pub fn apply(&mut self, update: &QueryUpdate) -> bool {
        let before = self.clone();
        for (key, value) in &update.assignments {
            self.set(key, value.clone());
        }
        *self != before
    }

    /// Copy of the query with `update` applied.
    pub fn with(&self, update: &QueryUpdate) -> Self {
        let mut next = self.clone();
        next.apply(update);
        next
    }
}

impl fmt::Display for ProjectQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}
