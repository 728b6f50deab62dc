//! Query state of the current location and the view-state controller that
//! ties the listing and detail pages together.

use tracing::{debug, info};

use crate::auth::{AuthGate, GateOutcome};
use crate::config::Config;
use crate::error::FetchError;
use crate::fetch::{
    FetchKey, FetchResult, FetchStatus, FetchTicket, FetchTracker, ListPayload, ListRequest,
    Pagination, ProjectPayload, ProjectSummary,
};
use crate::layout::ResultsLayout;
use crate::navigation::{NavigateOptions, Navigator};
use crate::policy::MyProjectsDefault;
use crate::query::{ProjectQuery, QueryUpdate};
use crate::routes::{self, Page};
use crate::session::SessionState;
use crate::view_mode::{self, DetailView, ScrollReset, Scroller, ViewInputs, ViewMode};

/// How a query change lands in history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HistoryMode {
    #[default]
    Push,
    Replace,
}

impl HistoryMode {
    pub fn options(self) -> NavigateOptions {
        match self {
            HistoryMode::Push => NavigateOptions::push(),
            HistoryMode::Replace => NavigateOptions::replace(),
        }
    }
}

/// `path` with the query string of `query` appended, if any.
pub fn href_for(path: &str, query: &ProjectQuery) -> String {
    let search = query.to_query_string();
    if search.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{search}")
    }
}

// ─── Query controller ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
struct StagedUpdate {
    seq: u64,
    update: QueryUpdate,
    mode: HistoryMode,
}

/// The query of the current location and the single mutation path into it.
///
/// At most one update is staged at a time; staging again replaces an
/// unsettled update outright (last write wins, no field merging).
#[derive(Debug, Clone, PartialEq)]
pub struct QueryController {
    path: String,
    search: String,
    query: ProjectQuery,
    staged: Option<StagedUpdate>,
    seq: u64,
}

impl QueryController {
    pub fn from_location(path: &str, search: &str) -> Self {
        let search = search.strip_prefix('?').unwrap_or(search);
        Self {
            path: path.to_string(),
            search: search.to_string(),
            query: ProjectQuery::parse(search),
            staged: None,
            seq: 0,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &ProjectQuery {
        &self.query
    }

    pub fn href(&self) -> String {
        href_for(&self.path, &self.query)
    }

    /// The location changed from outside (link, back button).  Any staged
    /// update is superseded.  Returns `true` when the query changed.
    pub fn sync_location(&mut self, path: &str, search: &str) -> bool {
        let next = Self::from_location(path, search);
        let changed = next.query != self.query;
        if self.staged.take().is_some() {
            debug!("Location change superseded a staged query update");
        }
        self.path = next.path;
        self.search = next.search;
        self.query = next.query;
        changed
    }

    /// Stage `update`, replacing any unsettled one.  Returns its sequence
    /// number.
    pub fn stage(&mut self, update: QueryUpdate, mode: HistoryMode) -> u64 {
        self.seq += 1;
        if let Some(previous) = self.staged.replace(StagedUpdate {
            seq: self.seq,
            update,
            mode,
        }) {
            debug!(superseded = previous.seq, by = self.seq, "Query update superseded");
        }
        self.seq
    }

    pub fn has_staged(&self) -> bool {
        self.staged.is_some()
    }

    /// Apply the staged update and navigate to the resulting location.
    /// Returns the new href, or `None` when nothing was staged.
    pub fn settle<N: Navigator + ?Sized>(&mut self, navigator: &N) -> Option<String> {
        let staged = self.staged.take()?;
        self.query.apply(&staged.update);
        self.search = self.query.to_query_string();
        let href = self.href();
        navigator.navigate(&href, staged.mode.options());
        Some(href)
    }

    /// The setter handed to the presentation layer: partial updates only.
    pub fn set_query_param<N: Navigator + ?Sized>(
        &mut self,
        update: QueryUpdate,
        mode: HistoryMode,
        navigator: &N,
    ) -> Option<String> {
        self.stage(update, mode);
        self.settle(navigator)
    }

    /// Rewrite the address bar (replace) when it does not show the canonical
    /// serialization of the effective query.
    pub fn canonicalize<N: Navigator + ?Sized>(&mut self, navigator: &N) -> bool {
        let canonical = self.query.to_query_string();
        if canonical == self.search {
            return false;
        }
        debug!(from = %self.search, to = %canonical, "Canonicalizing query string");
        self.search = canonical;
        navigator.navigate(&self.href(), NavigateOptions::replace());
        true
    }
}

// ─── List view ───────────────────────────────────────────────────────────────

/// Everything the listing presentation needs for one render.
#[derive(Debug, Clone, PartialEq)]
pub struct ListView {
    pub title: &'static str,
    pub layout: ResultsLayout,
    pub status: FetchStatus,
    pub projects: Vec<ProjectSummary>,
    pub pagination: Option<Pagination>,
    pub map_results: Option<serde_json::Value>,
    pub error: Option<FetchError>,
    pub show_bottom_buttons: bool,
    pub management: bool,
}

impl ListView {
    pub fn build(path: &str, session: &SessionState, result: &FetchResult<ListPayload>) -> Self {
        let page = Page::from_path(path);
        let data = result.data();
        Self {
            title: page.title().unwrap_or("Explore projects"),
            layout: ResultsLayout::from_map_shown(session.preferences.map_shown),
            status: result.status(),
            projects: data.map(|d| d.results.clone()).unwrap_or_default(),
            pagination: data.and_then(|d| d.pagination.clone()),
            map_results: data.and_then(|d| d.map_results.clone()),
            error: result.error().cloned(),
            show_bottom_buttons: routes::shows_bottom_buttons(path),
            management: matches!(page, Page::UserProjects { management: true }),
        }
    }
}

/// Side effects issued while entering or re-rendering a page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EntryEffects {
    pub gate: Option<GateOutcome>,
    /// Href navigated to when the default filter was applied.
    pub defaulted_to: Option<String>,
}

// ─── View-state controller ───────────────────────────────────────────────────

/// Headless driver of the project browser pages.
///
/// It owns the query of the current location, runs the auth gate and the
/// "my projects" default on user-scoped listings, keeps one authoritative
/// fetch per list key and per project id, and derives what each page shows.
#[derive(Debug)]
pub struct QueryViewStateController {
    explore_path: String,
    query: QueryController,
    gate: AuthGate,
    default_filter: MyProjectsDefault,
    list: FetchTracker<FetchKey, ListPayload>,
    detail: FetchTracker<String, ProjectPayload>,
    scroll: ScrollReset,
}

impl QueryViewStateController {
    pub fn new(config: &Config, path: &str, search: &str) -> Self {
        Self {
            explore_path: config.explore_path.clone(),
            query: QueryController::from_location(path, search),
            gate: AuthGate::new(config.login_path.clone()),
            default_filter: MyProjectsDefault::new(),
            list: FetchTracker::new(),
            detail: FetchTracker::new(),
            scroll: ScrollReset::new(),
        }
    }

    pub fn page(&self) -> Page {
        Page::from_path(self.query.path())
    }

    pub fn query(&self) -> &QueryController {
        &self.query
    }

    pub fn location_changed(&mut self, path: &str, search: &str) -> bool {
        self.query.sync_location(path, search)
    }

    pub fn set_query_param<N: Navigator + ?Sized>(
        &mut self,
        update: QueryUpdate,
        navigator: &N,
    ) -> Option<String> {
        self.query.set_query_param(update, HistoryMode::Push, navigator)
    }

    /// Run the effects of the current page: on user-scoped listings the auth
    /// gate, then the default filter (one settle cycle).  An anonymous
    /// visitor only gets the login redirect; the default waits until a token
    /// is present.
    pub fn run_effects<N: Navigator + ?Sized>(
        &mut self,
        session: &SessionState,
        navigator: &N,
        navigator_epoch: u64,
    ) -> EntryEffects {
        let mut effects = EntryEffects::default();
        if !self.page().is_user_scoped() {
            return effects;
        }

        effects.gate = Some(self.gate.check(
            session.auth.token(),
            navigator,
            navigator_epoch,
        ));
        if !session.auth.is_logged_in() {
            return effects;
        }

        if let Some(update) = self.default_filter.check(self.query.query()) {
            self.query.stage(update, HistoryMode::Push);
            effects.defaulted_to = self.query.settle(navigator);
        }
        effects
    }

    // ── listing ──────────────────────────────────────────────────────

    /// Point the list fetch at the current query; a ticket means "start
    /// fetching `request`".
    pub fn list_fetch(&mut self, session: &SessionState) -> Option<(FetchTicket, ListRequest)> {
        let request = ListRequest::new(self.query.path(), self.query.query(), session);
        let enabled = routes::fetch_enabled(self.query.path());
        self.list
            .issue(request.key(), enabled)
            .map(|ticket| (ticket, request))
    }

    pub fn resolve_list(
        &mut self,
        ticket: FetchTicket,
        outcome: Result<ListPayload, FetchError>,
    ) -> bool {
        self.list.resolve(ticket, outcome)
    }

    /// User-initiated retry of the list fetch.
    pub fn retry_list(&mut self, session: &SessionState) -> Option<(FetchTicket, ListRequest)> {
        let ticket = self.list.refetch()?;
        info!("Retrying project list fetch");
        Some((
            ticket,
            ListRequest::new(self.query.path(), self.query.query(), session),
        ))
    }

    pub fn list_view(&self, session: &SessionState) -> ListView {
        ListView::build(self.query.path(), session, self.list.result())
    }

    /// Backdrop link of the filters panel.
    pub fn filters_close_href(&self) -> String {
        crate::filters_panel::close_href(&self.explore_path, self.query.query())
    }

    // ── detail ───────────────────────────────────────────────────────

    /// Start (once per id) the fetch of the project on the current path, and
    /// reset scrolling when the id changed.
    pub fn detail_fetch<S: Scroller + ?Sized>(
        &mut self,
        scroller: &S,
    ) -> Option<(FetchTicket, String)> {
        let Page::ProjectDetail { id } = self.page() else {
            return None;
        };
        self.scroll.on_id(&id, scroller);
        self.detail
            .issue(id.clone(), true)
            .map(|ticket| (ticket, id))
    }

    pub fn resolve_detail(
        &mut self,
        ticket: FetchTicket,
        outcome: Result<ProjectPayload, FetchError>,
    ) -> bool {
        self.detail.resolve(ticket, outcome)
    }

    pub fn detail_view<N: Clone>(&self, navigate: &N) -> Option<DetailView<N>> {
        let Page::ProjectDetail { id } = self.page() else {
            return None;
        };
        Some(view_mode::resolve_detail(&id, self.detail.result(), navigate))
    }

    // ── view mode ────────────────────────────────────────────────────

    pub fn view_mode(&self, session: &SessionState) -> ViewMode {
        let result_status;
        let error;
        if matches!(self.page(), Page::ProjectDetail { .. }) {
            result_status = self.detail.status();
            error = self.detail.result().error();
        } else {
            result_status = self.list.status();
            error = self.list.result().error();
        }
        view_mode::resolve_view_mode(ViewInputs {
            path: self.query.path(),
            status: result_status,
            error,
            authenticated: session.auth.is_logged_in(),
            map_shown: session.preferences.map_shown,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::navigation::testing::RecordingNavigator;

    struct CountingScroller(Cell<u32>);

    impl Scroller for CountingScroller {
        fn scroll_to_top(&self) {
            self.0.set(self.0.get() + 1);
        }
    }

    fn logged_in() -> SessionState {
        let mut session = SessionState::default();
        session.log_in("token", "mapper");
        session
    }

    #[test]
    fn test_set_query_param_pushes_partial_update() {
        let nav = RecordingNavigator::default();
        let mut qc = QueryController::from_location("/explore", "?text=roads&page=3");
        let href = qc
            .set_query_param(QueryUpdate::new().set("page", 4u32), HistoryMode::Push, &nav)
            .unwrap();

        assert_eq!(href, "/explore?page=4&text=roads");
        assert_eq!(nav.last(), Some((href, NavigateOptions::push())));
    }

    #[test]
    fn test_last_staged_update_wins() {
        let nav = RecordingNavigator::default();
        let mut qc = QueryController::from_location("/explore", "");
        qc.stage(QueryUpdate::new().set("difficulty", "EASY"), HistoryMode::Push);
        qc.stage(QueryUpdate::new().set("page", 2u32), HistoryMode::Push);
        qc.settle(&nav);

        assert!(qc.query().get("difficulty").is_none());
        assert_eq!(qc.query().page(), 2);
        assert_eq!(nav.count(), 1);
        assert!(qc.settle(&nav).is_none());
    }

    #[test]
    fn test_location_change_drops_staged_update() {
        let nav = RecordingNavigator::default();
        let mut qc = QueryController::from_location("/explore", "page=2");
        qc.stage(QueryUpdate::new().set("page", 3u32), HistoryMode::Push);
        assert!(qc.sync_location("/explore", "page=5"));
        assert!(!qc.has_staged());
        assert!(qc.settle(&nav).is_none());
        assert_eq!(qc.query().page(), 5);
    }

    #[test]
    fn test_canonicalize_replaces_non_canonical_url() {
        let nav = RecordingNavigator::default();
        let mut qc = QueryController::from_location("/explore", "text=a&difficulty=HARD&page=x");
        assert!(qc.canonicalize(&nav));
        assert_eq!(
            nav.last(),
            Some((
                "/explore?difficulty=HARD&text=a".to_string(),
                NavigateOptions::replace()
            ))
        );
        assert!(!qc.canonicalize(&nav));
        assert_eq!(nav.count(), 1);
    }

    #[test]
    fn test_user_listing_defaults_to_managed_by_me() {
        let nav = RecordingNavigator::default();
        let mut c = QueryViewStateController::new(
            &Config::default(),
            "/manage/projects",
            "text=roads&page=2",
        );

        let effects = c.run_effects(&logged_in(), &nav, 0);
        assert_eq!(effects.gate, Some(GateOutcome::Allowed));
        assert_eq!(
            effects.defaulted_to.as_deref(),
            Some("/manage/projects?managedByMe=1&page=2&text=roads")
        );

        let query = c.query().query();
        assert_eq!(query.get_bool("managedByMe"), Some(true));
        assert_eq!(query.page(), 2);
        assert_eq!(query.get_str("text"), Some("roads"));
        assert_eq!(
            query,
            &ProjectQuery::parse("text=roads&page=2")
                .with(&QueryUpdate::new().set("managedByMe", true))
        );

        // Later renders with the same query do nothing.
        let again = c.run_effects(&logged_in(), &nav, 0);
        assert_eq!(again.defaulted_to, None);
        assert_eq!(nav.count(), 1);
    }

    #[test]
    fn test_scoped_user_listing_keeps_query() {
        let nav = RecordingNavigator::default();
        let mut c = QueryViewStateController::new(
            &Config::default(),
            "/contributions/projects",
            "mappedByMe=1",
        );
        let effects = c.run_effects(&logged_in(), &nav, 0);
        assert_eq!(effects.defaulted_to, None);
        assert_eq!(nav.count(), 0);
    }

    #[test]
    fn test_anonymous_user_listing_redirects_once() {
        let nav = RecordingNavigator::default();
        let mut c = QueryViewStateController::new(
            &Config::default(),
            "/manage/projects",
            "managedByMe=1",
        );
        let anonymous = SessionState::default();

        c.run_effects(&anonymous, &nav, 0);
        c.run_effects(&anonymous, &nav, 0);

        assert_eq!(
            nav.calls.borrow().as_slice(),
            &[("/login".to_string(), NavigateOptions::replace())]
        );
    }

    #[test]
    fn test_anonymous_unscoped_listing_only_redirects() {
        let nav = RecordingNavigator::default();
        let mut c = QueryViewStateController::new(&Config::default(), "/manage/projects", "");
        let anonymous = SessionState::default();

        let effects = c.run_effects(&anonymous, &nav, 0);
        assert_eq!(effects.gate, Some(GateOutcome::Redirected));
        assert_eq!(effects.defaulted_to, None);
        c.run_effects(&anonymous, &nav, 0);

        assert_eq!(
            nav.calls.borrow().as_slice(),
            &[("/login".to_string(), NavigateOptions::replace())]
        );
        assert!(!c.query().query().is_set("managedByMe"));

        // Once logged in, the default applies to the same query.
        let effects = c.run_effects(&logged_in(), &nav, 0);
        assert_eq!(
            effects.defaulted_to.as_deref(),
            Some("/manage/projects?managedByMe=1")
        );
    }

    #[test]
    fn test_user_listing_fetch_ignores_action_preference() {
        let mut session = logged_in();
        session.preferences.action = "validate".into();

        let mut c = QueryViewStateController::new(
            &Config::default(),
            "/contributions/projects",
            "mappedByMe=1",
        );
        let (_, request) = c.list_fetch(&session).unwrap();
        assert_eq!(request.action, None);

        let mut c = QueryViewStateController::new(&Config::default(), "/explore", "");
        let (_, request) = c.list_fetch(&session).unwrap();
        assert_eq!(request.action.as_deref(), Some("validate"));
    }

    #[test]
    fn test_explore_runs_no_gate() {
        let nav = RecordingNavigator::default();
        let mut c = QueryViewStateController::new(&Config::default(), "/explore", "");
        let effects = c.run_effects(&SessionState::default(), &nav, 0);
        assert_eq!(effects, EntryEffects::default());
        assert_eq!(nav.count(), 0);
    }

    #[test]
    fn test_list_fetch_held_back_under_filters() {
        let session = SessionState::default();
        let mut c = QueryViewStateController::new(&Config::default(), "/explore/filters/", "");
        assert!(c.list_fetch(&session).is_none());
        assert_eq!(c.view_mode(&session), ViewMode::FilterPanel);

        c.location_changed("/explore", "difficulty=EASY");
        let (_, request) = c.list_fetch(&session).unwrap();
        assert_eq!(request.query.get_str("difficulty"), Some("EASY"));
        assert_eq!(c.filters_close_href(), "/explore?difficulty=EASY");
    }

    #[test]
    fn test_stale_list_result_does_not_overwrite() {
        let session = SessionState::default();
        let mut c = QueryViewStateController::new(&Config::default(), "/explore", "page=1");
        let (first, _) = c.list_fetch(&session).unwrap();

        c.location_changed("/explore", "page=2");
        let (second, _) = c.list_fetch(&session).unwrap();

        let page_two = ListPayload {
            results: vec![ProjectSummary {
                project_id: 2,
                ..Default::default()
            }],
            ..Default::default()
        };
        assert!(c.resolve_list(second, Ok(page_two)));
        assert!(!c.resolve_list(first, Ok(ListPayload::default())));

        let view = c.list_view(&session);
        assert_eq!(view.status, FetchStatus::Success);
        assert_eq!(view.projects[0].project_id, 2);
    }

    #[test]
    fn test_list_view_layout_and_retry() {
        let mut session = logged_in();
        session.preferences.map_shown = true;
        let mut c = QueryViewStateController::new(
            &Config::default(),
            "/manage/projects",
            "managedByMe=1",
        );
        let (ticket, _) = c.list_fetch(&session).unwrap();
        c.resolve_list(ticket, Err(FetchError::Network("offline".into())));

        let view = c.list_view(&session);
        assert_eq!(view.title, "Manage projects");
        assert_eq!(view.layout, ResultsLayout::TwoColumn);
        assert_eq!(view.status, FetchStatus::Error);
        assert!(view.show_bottom_buttons);
        assert!(view.management);

        assert!(c.retry_list(&session).is_some());
        assert_eq!(c.list_view(&session).status, FetchStatus::Pending);
    }

    #[test]
    fn test_detail_flow() {
        let scroller = CountingScroller(Cell::new(0));
        let session = SessionState::default();
        let mut c = QueryViewStateController::new(&Config::default(), "/projects/1", "");

        let (ticket, id) = c.detail_fetch(&scroller).unwrap();
        assert_eq!(id, "1");
        assert_eq!(c.detail_view(&()), Some(DetailView::Placeholder));

        c.resolve_detail(
            ticket,
            Err(FetchError::from_response(
                403,
                r#"{"Error": "private", "SubCode": "PrivateProject"}"#,
            )),
        );
        assert_eq!(c.view_mode(&session), ViewMode::PrivateError);

        c.location_changed("/projects/2", "");
        let (ticket, _) = c.detail_fetch(&scroller).unwrap();
        assert!(c.detail_fetch(&scroller).is_none());
        assert_eq!(scroller.0.get(), 2);

        c.resolve_detail(ticket, Err(FetchError::from_response(404, "")));
        assert_eq!(
            c.detail_view(&()),
            Some(DetailView::NotFound {
                project_id: "2".into()
            })
        );
    }
}
