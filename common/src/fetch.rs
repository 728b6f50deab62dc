//! Fetch results, API payloads, and the tracker that keeps only the most
//! recent fetch authoritative.

use std::fmt::Debug;
use std::future::Future;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ErrorClass, FetchError};
use crate::query::ProjectQuery;
use crate::routes::Page;
use crate::session::SessionState;

// ─── Payloads ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pagination {
    pub has_next: bool,
    pub has_prev: bool,
    pub next_num: Option<u32>,
    pub page: u32,
    pub pages: u32,
    pub prev_num: Option<u32>,
    pub per_page: u32,
    pub total: u32,
}

/// One card in a project listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectSummary {
    pub project_id: u64,
    pub name: String,
    pub short_description: Option<String>,
    pub organisation_name: Option<String>,
    pub priority: Option<String>,
    pub difficulty: Option<String>,
    pub status: Option<String>,
    pub percent_mapped: u8,
    pub percent_validated: u8,
    pub last_updated: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListPayload {
    pub results: Vec<ProjectSummary>,
    pub pagination: Option<Pagination>,
    /// GeoJSON feature collection of project centroids.
    pub map_results: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectInfo {
    pub name: String,
    pub short_description: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectPayload {
    pub project_id: u64,
    pub status: Option<String>,
    pub project_info: ProjectInfo,
    pub difficulty: Option<String>,
    pub organisation_name: Option<String>,
    pub percent_mapped: u8,
    pub percent_validated: u8,
    /// GeoJSON feature collection of the project's tasks.
    pub tasks: Option<serde_json::Value>,
}

// ─── Result ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStatus {
    Pending,
    Error,
    Success,
}

/// State of one fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchResult<T> {
    Pending,
    Error(FetchError),
    Success(T),
}

impl<T> Default for FetchResult<T> {
    fn default() -> Self {
        FetchResult::Pending
    }
}

impl<T> FetchResult<T> {
    pub fn status(&self) -> FetchStatus {
        match self {
            FetchResult::Pending => FetchStatus::Pending,
            FetchResult::Error(_) => FetchStatus::Error,
            FetchResult::Success(_) => FetchStatus::Success,
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            FetchResult::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            FetchResult::Error(e) => Some(e),
            _ => None,
        }
    }

    /// `None` on success.
    pub fn error_class(&self) -> Option<ErrorClass> {
        match self {
            FetchResult::Pending => Some(ErrorClass::Pending),
            FetchResult::Error(e) => Some(e.class()),
            FetchResult::Success(_) => None,
        }
    }
}

impl<T> From<Result<T, FetchError>> for FetchResult<T> {
    fn from(result: Result<T, FetchError>) -> Self {
        match result {
            Ok(data) => FetchResult::Success(data),
            Err(e) => FetchResult::Error(e),
        }
    }
}

// ─── Fetcher ─────────────────────────────────────────────────────────────────

/// Everything a list fetch depends on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListRequest {
    pub query: ProjectQuery,
    pub action: Option<String>,
    pub token: Option<String>,
}

impl ListRequest {
    /// The request for the listing at `path`.  Only the explore listing is
    /// filtered by the action preference; user-scoped listings never are.
    pub fn new(path: &str, query: &ProjectQuery, session: &SessionState) -> Self {
        let action = if Page::from_path(path).is_user_scoped() {
            None
        } else {
            session.action_param().map(String::from)
        };
        Self {
            query: query.clone(),
            action,
            token: session.auth.token().map(String::from),
        }
    }

    pub fn key(&self) -> FetchKey {
        FetchKey {
            query: self.query.to_query_string(),
            action: self.action.clone(),
            authenticated: self.token.is_some(),
        }
    }
}

/// Identity of a fetch: one result exists per distinct key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FetchKey {
    /// Canonical serialization of the query.
    pub query: String,
    pub action: Option<String>,
    pub authenticated: bool,
}

/// The remote project API.
pub trait ProjectFetcher {
    fn list_projects(
        &self,
        request: &ListRequest,
    ) -> impl Future<Output = Result<ListPayload, FetchError>> + Send;

    fn get_project(
        &self,
        id: &str,
        token: Option<&str>,
    ) -> impl Future<Output = Result<ProjectPayload, FetchError>> + Send;
}

// ─── Tracker ─────────────────────────────────────────────────────────────────

/// Handle for one issued fetch.  Only the latest ticket may resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// Tracks the fetch for the current key.  A result is accepted only from the
/// most recently issued ticket, so a slow response for a superseded query
/// never overwrites what is on screen.
#[derive(Debug)]
pub struct FetchTracker<K, T> {
    key: Option<K>,
    issued: u64,
    current: Option<FetchTicket>,
    result: FetchResult<T>,
}

impl<K, T> Default for FetchTracker<K, T> {
    fn default() -> Self {
        Self {
            key: None,
            issued: 0,
            current: None,
            result: FetchResult::Pending,
        }
    }
}

impl<K: Clone + PartialEq + Debug, T> FetchTracker<K, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the tracker at `key`.  Returns a ticket when a fetch should
    /// start: the key changed (or was never fetched) and fetching is enabled.
    pub fn issue(&mut self, key: K, enabled: bool) -> Option<FetchTicket> {
        let same_key = self.key.as_ref() == Some(&key);
        if same_key && self.current.is_some() {
            return None;
        }
        if !same_key {
            self.key = Some(key);
            self.current = None;
            self.result = FetchResult::Pending;
        }
        if !enabled {
            debug!(key = ?self.key, "Fetch disabled");
            return None;
        }
        Some(self.start())
    }

    /// Re-issue the fetch for the current key.
    pub fn refetch(&mut self) -> Option<FetchTicket> {
        self.key.as_ref()?;
        Some(self.start())
    }

    /// Deliver the outcome of `ticket`.  Returns `false` (and drops the
    /// outcome) when a newer fetch has been issued since.
    pub fn resolve(&mut self, ticket: FetchTicket, outcome: Result<T, FetchError>) -> bool {
        if self.current != Some(ticket) {
            debug!(ticket = ticket.0, "Discarding stale fetch result");
            return false;
        }
        self.result = outcome.into();
        true
    }

    pub fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    pub fn result(&self) -> &FetchResult<T> {
        &self.result
    }

    pub fn status(&self) -> FetchStatus {
        self.result.status()
    }

    fn start(&mut self) -> FetchTicket {
        self.issued += 1;
        let ticket = FetchTicket(self.issued);
        self.current = Some(ticket);
        self.result = FetchResult::Pending;
        ticket
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_payload_from_api_json() {
        let json = r#"{
            "mapResults": {"type": "FeatureCollection", "features": []},
            "results": [{"projectId": 7, "name": "Flood response", "percentMapped": 40,
                         "percentValidated": 10, "organisationName": "HOT"}],
            "pagination": {"hasNext": true, "hasPrev": false, "nextNum": 2, "page": 1,
                           "pages": 3, "prevNum": null, "perPage": 14, "total": 40}
        }"#;
        let payload: ListPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.results[0].project_id, 7);
        assert_eq!(payload.results[0].organisation_name.as_deref(), Some("HOT"));
        let pagination = payload.pagination.unwrap();
        assert!(pagination.has_next);
        assert_eq!(pagination.next_num, Some(2));
        assert!(payload.map_results.is_some());
    }

    #[test]
    fn test_project_payload_from_api_json() {
        let json = r#"{"projectId": 42, "status": "PUBLISHED",
                       "projectInfo": {"name": "Roads", "shortDescription": "Map roads"},
                       "tasks": {"type": "FeatureCollection", "features": []}}"#;
        let payload: ProjectPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.project_id, 42);
        assert_eq!(payload.project_info.name, "Roads");
        assert!(payload.tasks.is_some());
    }

    #[test]
    fn test_issue_once_per_key() {
        let mut tracker: FetchTracker<&str, u32> = FetchTracker::new();
        let ticket = tracker.issue("page=1", true).unwrap();
        assert_eq!(tracker.status(), FetchStatus::Pending);
        assert!(tracker.issue("page=1", true).is_none());
        assert!(tracker.resolve(ticket, Ok(1)));
        assert_eq!(tracker.result().data(), Some(&1));
        assert!(tracker.issue("page=1", true).is_none());
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let mut tracker: FetchTracker<&str, u32> = FetchTracker::new();
        let first = tracker.issue("page=1", true).unwrap();
        let second = tracker.issue("page=2", true).unwrap();

        assert!(tracker.resolve(second, Ok(2)));
        assert!(!tracker.resolve(first, Ok(1)));
        assert_eq!(tracker.result().data(), Some(&2));
    }

    #[test]
    fn test_disabled_fetch_waits_for_enable() {
        let mut tracker: FetchTracker<&str, u32> = FetchTracker::new();
        assert!(tracker.issue("q", false).is_none());
        assert_eq!(tracker.status(), FetchStatus::Pending);
        assert!(tracker.issue("q", true).is_some());
    }

    #[test]
    fn test_refetch_after_error() {
        let mut tracker: FetchTracker<&str, u32> = FetchTracker::new();
        assert!(tracker.refetch().is_none());

        let ticket = tracker.issue("q", true).unwrap();
        tracker.resolve(ticket, Err(FetchError::Network("down".into())));
        assert_eq!(tracker.status(), FetchStatus::Error);

        let retry = tracker.refetch().unwrap();
        assert_eq!(tracker.status(), FetchStatus::Pending);
        assert!(!tracker.resolve(ticket, Ok(0)));
        assert!(tracker.resolve(retry, Ok(3)));
        assert_eq!(tracker.result().data(), Some(&3));
    }

    #[test]
    fn test_request_key_tracks_auth_context() {
        let query = ProjectQuery::parse("page=2");
        let mut session = SessionState::default();
        let anonymous = ListRequest::new("/explore", &query, &session).key();
        session.log_in("token", "mapper");
        let logged_in = ListRequest::new("/explore", &query, &session).key();
        assert_ne!(anonymous, logged_in);
        assert_eq!(logged_in.query, "page=2");
    }

    #[test]
    fn test_action_only_sent_for_explore() {
        let query = ProjectQuery::parse("managedByMe=1");
        let mut session = SessionState::default();
        session.preferences.action = "map".into();

        let explore = ListRequest::new("/explore", &query, &session);
        assert_eq!(explore.action.as_deref(), Some("map"));
        for path in ["/manage/projects", "/contributions/projects"] {
            let request = ListRequest::new(path, &query, &session);
            assert_eq!(request.action, None);
            assert_ne!(request.key(), explore.key());
        }
    }
}
