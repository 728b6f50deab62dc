//! Which view a page renders, derived from path, fetch state and session.

use serde_json::Value;
use tracing::debug;

use crate::error::FetchError;
use crate::fetch::{FetchResult, FetchStatus, ProjectPayload};
use crate::navigation::DepTracker;
use crate::routes::Page;

/// Derived view variant; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    List,
    /// Listing with the map column next to it.
    MapOverlay,
    FilterPanel,
    Detail,
    PrivateError,
    NotFound,
}

/// Inputs of [`resolve_view_mode`].
#[derive(Debug, Clone, Copy)]
pub struct ViewInputs<'a> {
    pub path: &'a str,
    pub status: FetchStatus,
    pub error: Option<&'a FetchError>,
    pub authenticated: bool,
    pub map_shown: bool,
}

pub fn resolve_view_mode(inputs: ViewInputs<'_>) -> ViewMode {
    let listing = if inputs.map_shown {
        ViewMode::MapOverlay
    } else {
        ViewMode::List
    };

    match Page::from_path(inputs.path) {
        Page::ProjectDetail { .. } => match (inputs.status, inputs.error) {
            (FetchStatus::Error, Some(e)) if e.is_private_project() => ViewMode::PrivateError,
            (FetchStatus::Error, _) => ViewMode::NotFound,
            _ => ViewMode::Detail,
        },
        Page::MoreFilters => ViewMode::FilterPanel,
        // The auth gate redirects; until then the listing shell stays up.
        Page::UserProjects { .. } if !inputs.authenticated => ViewMode::List,
        Page::Explore | Page::UserProjects { .. } => listing,
        Page::Other => ViewMode::NotFound,
    }
}

// ─── Detail page ─────────────────────────────────────────────────────────────

/// Props handed to the full detail view.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailProps<N> {
    pub project: ProjectPayload,
    /// Always `false`: success implies the load finished.
    pub project_loading: bool,
    pub tasks_error: bool,
    pub tasks: Option<Value>,
    /// Navigation capability for in-page links.
    pub navigate: N,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailView<N> {
    /// Skeleton while the project loads; no data is touched.
    Placeholder,
    PrivateProject,
    NotFound { project_id: String },
    Detail(Box<DetailProps<N>>),
}

impl<N> DetailView<N> {
    pub fn mode(&self) -> ViewMode {
        match self {
            DetailView::Placeholder | DetailView::Detail(_) => ViewMode::Detail,
            DetailView::PrivateProject => ViewMode::PrivateError,
            DetailView::NotFound { .. } => ViewMode::NotFound,
        }
    }
}

/// Map the fetch state of project `id` to the view to render.
pub fn resolve_detail<N: Clone>(
    id: &str,
    result: &FetchResult<ProjectPayload>,
    navigate: &N,
) -> DetailView<N> {
    match result {
        FetchResult::Pending => DetailView::Placeholder,
        FetchResult::Error(e) if e.is_private_project() => DetailView::PrivateProject,
        FetchResult::Error(e) => {
            debug!(project_id = id, error = %e, "Project fetch failed");
            DetailView::NotFound {
                project_id: id.to_string(),
            }
        }
        FetchResult::Success(project) => DetailView::Detail(Box::new(DetailProps {
            project: project.clone(),
            project_loading: false,
            tasks_error: false,
            tasks: project.tasks.clone(),
            navigate: navigate.clone(),
        })),
    }
}

/// Window scrolling, as far as the detail page needs it.
pub trait Scroller {
    fn scroll_to_top(&self);
}

/// Scrolls to the top once per change of the requested project id.
#[derive(Debug, Clone, Default)]
pub struct ScrollReset {
    id: DepTracker<String>,
}

impl ScrollReset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when it scrolled.
    pub fn on_id<S: Scroller + ?Sized>(&mut self, id: &str, scroller: &S) -> bool {
        if !self.id.changed(id.to_string()) {
            return false;
        }
        scroller.scroll_to_top();
        true
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[derive(Default)]
    struct CountingScroller(Cell<u32>);

    impl Scroller for CountingScroller {
        fn scroll_to_top(&self) {
            self.0.set(self.0.get() + 1);
        }
    }

    fn api_error(subcode: Option<&str>) -> FetchError {
        FetchError::Api {
            status: 403,
            subcode: subcode.map(String::from),
            message: "nope".into(),
        }
    }

    #[test]
    fn test_pending_renders_placeholder() {
        let view = resolve_detail("42", &FetchResult::Pending, &());
        assert_eq!(view, DetailView::Placeholder);
    }

    #[test]
    fn test_private_subcode_renders_private_view() {
        let result = FetchResult::Error(api_error(Some("PrivateProject")));
        assert_eq!(resolve_detail("42", &result, &()), DetailView::PrivateProject);
    }

    #[test]
    fn test_other_errors_render_not_found_with_id() {
        for err in [
            api_error(Some("NotFound")),
            api_error(None),
            FetchError::Network("timeout".into()),
        ] {
            let view = resolve_detail("42", &FetchResult::Error(err), &());
            assert_eq!(
                view,
                DetailView::NotFound {
                    project_id: "42".into()
                }
            );
        }
    }

    #[test]
    fn test_success_forces_loading_flags_off() {
        let project = ProjectPayload {
            project_id: 42,
            tasks: Some(serde_json::json!({"type": "FeatureCollection", "features": []})),
            ..Default::default()
        };
        let view = resolve_detail("42", &FetchResult::Success(project.clone()), &"nav");
        let DetailView::Detail(props) = view else {
            panic!("expected detail view");
        };
        assert!(!props.project_loading);
        assert!(!props.tasks_error);
        assert_eq!(props.tasks, project.tasks);
        assert_eq!(props.navigate, "nav");
    }

    #[test]
    fn test_scroll_once_per_id_change() {
        let scroller = CountingScroller::default();
        let mut reset = ScrollReset::new();

        assert!(reset.on_id("1", &scroller));
        assert!(reset.on_id("2", &scroller));
        assert_eq!(scroller.0.get(), 2);

        assert!(!reset.on_id("2", &scroller));
        assert!(!reset.on_id("2", &scroller));
        assert_eq!(scroller.0.get(), 2);
    }

    #[test]
    fn test_view_mode_resolution() {
        fn inputs<'a>(
            path: &'a str,
            status: FetchStatus,
            error: Option<&'a FetchError>,
            map_shown: bool,
        ) -> ViewInputs<'a> {
            ViewInputs {
                path,
                status,
                error,
                authenticated: true,
                map_shown,
            }
        }

        let private = api_error(Some("PrivateProject"));

        assert_eq!(
            resolve_view_mode(inputs("/explore", FetchStatus::Success, None, false)),
            ViewMode::List
        );
        assert_eq!(
            resolve_view_mode(inputs("/explore", FetchStatus::Pending, None, true)),
            ViewMode::MapOverlay
        );
        assert_eq!(
            resolve_view_mode(inputs("/explore/filters/", FetchStatus::Pending, None, true)),
            ViewMode::FilterPanel
        );
        assert_eq!(
            resolve_view_mode(inputs("/projects/42", FetchStatus::Pending, None, false)),
            ViewMode::Detail
        );
        assert_eq!(
            resolve_view_mode(inputs("/projects/42", FetchStatus::Error, Some(&private), false)),
            ViewMode::PrivateError
        );
        assert_eq!(
            resolve_view_mode(inputs("/projects/42", FetchStatus::Error, None, false)),
            ViewMode::NotFound
        );
        assert_eq!(
            resolve_view_mode(inputs("/nowhere", FetchStatus::Success, None, false)),
            ViewMode::NotFound
        );
    }

    #[test]
    fn test_anonymous_user_listing_stays_list() {
        let mode = resolve_view_mode(ViewInputs {
            path: "/manage/projects",
            status: FetchStatus::Pending,
            error: None,
            authenticated: false,
            map_shown: true,
        });
        assert_eq!(mode, ViewMode::List);
    }
}
