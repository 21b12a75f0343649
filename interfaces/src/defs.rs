use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Lower-cased, trimmed course identifier, e.g. `cs304`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct CourseKey(String);

impl CourseKey {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_lowercase())
    }

    /// Split a comma-separated path segment such as `CS304,cs311`.
    /// Empty segments are dropped, duplicates are kept.
    pub fn parse_list(segment: &str) -> Vec<CourseKey> {
        segment
            .split(',')
            .map(CourseKey::new)
            .filter(|key| !key.is_empty())
            .collect()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CourseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for CourseKey {
    fn from(raw: String) -> Self {
        CourseKey::new(raw)
    }
}

impl From<&str> for CourseKey {
    fn from(raw: &str) -> Self {
        CourseKey::new(raw)
    }
}

impl From<CourseKey> for String {
    fn from(key: CourseKey) -> Self {
        key.0
    }
}

/// One deadline row from the shared assignment feed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Assignment {
    pub name: String,
    pub comment: String,
    pub due: String,
    pub late: String,
}

impl Assignment {
    pub fn new(
        name: impl Into<String>,
        comment: impl Into<String>,
        due: impl Into<String>,
        late: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            comment: comment.into(),
            due: due.into(),
            late: late.into(),
        }
    }
}

/// Assignments keyed by course, fetched once per aggregation request.
///
/// Keys are normalized on the way in, so a feed that says `CS304` is found
/// by a request for `cs304`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FeedSnapshot {
    courses: HashMap<CourseKey, Vec<Assignment>>,
}

impl FeedSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds assignments for a course. Two raw keys that normalize to the same
    /// course are concatenated in insertion order.
    pub fn insert(&mut self, key: impl Into<CourseKey>, assignments: Vec<Assignment>) {
        self.courses
            .entry(key.into())
            .or_default()
            .extend(assignments);
    }

    pub fn get(&self, key: &CourseKey) -> Option<&[Assignment]> {
        self.courses.get(key).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}

impl<K: Into<CourseKey>> FromIterator<(K, Vec<Assignment>)> for FeedSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, Vec<Assignment>)>>(iter: I) -> Self {
        let mut snapshot = FeedSnapshot::new();
        for (key, assignments) in iter {
            snapshot.insert(key, assignments);
        }
        snapshot
    }
}

/// Why a single course record is degraded. None of these abort a request.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CourseError {
    #[error("fetching course page failed: {0}")]
    AdapterFetch(String),

    #[error("course page did not have the expected structure: {0}")]
    AdapterProtocol(String),

    #[error("assignment feed unavailable: {0}")]
    FeedFetch(String),

    #[error("no assignment feed entry for {0}")]
    MissingFeedEntry(CourseKey),

    #[error("course task did not complete: {0}")]
    TaskFailed(String),
}

impl CourseError {
    pub fn is_adapter_error(&self) -> bool {
        matches!(self, CourseError::AdapterFetch(_) | CourseError::AdapterProtocol(_))
    }

    pub fn is_feed_error(&self) -> bool {
        matches!(self, CourseError::FeedFetch(_))
    }
}

/// Raw output of one adapter invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceResult {
    pub key: CourseKey,
    pub content: String,
    pub error: Option<CourseError>,
}

impl SourceResult {
    pub fn success(key: CourseKey, content: String) -> Self {
        Self { key, content, error: None }
    }

    pub fn failure(key: CourseKey, error: CourseError) -> Self {
        Self {
            key,
            content: String::new(),
            error: Some(error),
        }
    }
}

/// The merged, render-ready view of one requested course.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CourseRecord {
    pub key: CourseKey,
    pub source_url: String,
    pub content: String,
    pub assignments: Vec<Assignment>,
    pub errors: Vec<CourseError>,
}

impl CourseRecord {
    pub fn new(key: CourseKey) -> Self {
        Self {
            key,
            source_url: String::new(),
            content: String::new(),
            assignments: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

// Object style note:
// Every value in this module lives for exactly one aggregation request.
// Nothing here is cached or shared across requests; build fresh values per
// request and drop them once the response has been rendered.

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_keys_are_normalized() {
        assert_eq!(CourseKey::new("  CS304 ").as_str(), "cs304");
        assert_eq!(CourseKey::from("Cs311"), CourseKey::from("cS311"));
    }

    #[test]
    fn parse_list_keeps_duplicates_and_drops_blanks() {
        let keys = CourseKey::parse_list("CS1,,cs2, cs1 ,");
        let keys: Vec<&str> = keys.iter().map(CourseKey::as_str).collect();
        assert_eq!(keys, vec!["cs1", "cs2", "cs1"]);
    }

    #[test]
    fn feed_json_keys_are_normalized() {
        let raw = r#"{"CS1": [{"name": "A1", "due": "2020-01-01"}], "cs2": []}"#;
        let parsed: HashMap<String, Vec<Assignment>> = serde_json::from_str(raw).unwrap();
        let snapshot: FeedSnapshot = parsed.into_iter().collect();

        let cs1 = snapshot.get(&CourseKey::new("cs1")).unwrap();
        assert_eq!(cs1, &[Assignment::new("A1", "", "2020-01-01", "")]);
        assert_eq!(snapshot.get(&CourseKey::new("cs2")), Some(&[][..]));
        assert!(snapshot.get(&CourseKey::new("cs3")).is_none());
    }
}
