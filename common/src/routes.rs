//! Paths of the project browser and the page each one maps to.

pub const EXPLORE: &str = "/explore";
pub const EXPLORE_FILTERS: &str = "/explore/filters";
pub const MY_PROJECTS: &str = "/contributions/projects";
pub const MANAGE_PROJECTS: &str = "/manage/projects";
pub const MANAGE_PREFIX: &str = "/manage/";
pub const PROJECT_DETAIL_PREFIX: &str = "/projects/";
pub const DEFAULT_LOGIN: &str = "/login";

/// A page of the project browser, derived from the current path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    /// Public project listing.
    Explore,
    /// Filter panel opened on top of the public listing.
    MoreFilters,
    /// Listing scoped to the logged-in user.
    UserProjects { management: bool },
    ProjectDetail { id: String },
    Other,
}

/// `path` is `route` itself or lies below it (`route/...`).
fn is_under(path: &str, route: &str) -> bool {
    path.strip_prefix(route)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

impl Page {
    pub fn from_path(path: &str) -> Self {
        if is_under(path, EXPLORE_FILTERS) {
            return Page::MoreFilters;
        }
        if is_under(path, EXPLORE) {
            return Page::Explore;
        }
        if is_under(path, MANAGE_PROJECTS) {
            return Page::UserProjects { management: true };
        }
        if is_under(path, MY_PROJECTS) {
            return Page::UserProjects { management: false };
        }
        if let Some(rest) = path.strip_prefix(PROJECT_DETAIL_PREFIX) {
            let id = rest.trim_end_matches('/');
            if !id.is_empty() && !id.contains('/') {
                return Page::ProjectDetail { id: id.to_string() };
            }
        }
        Page::Other
    }

    /// Document title for the page.
    pub fn title(&self) -> Option<&'static str> {
        match self {
            Page::Explore | Page::MoreFilters => Some("Explore projects"),
            Page::UserProjects { management: true } => Some("Manage projects"),
            Page::UserProjects { management: false } => Some("My projects"),
            Page::ProjectDetail { .. } | Page::Other => None,
        }
    }

    /// Listings that require a logged-in user.
    pub fn is_user_scoped(&self) -> bool {
        matches!(self, Page::UserProjects { .. })
    }
}

/// The list fetch is held back while the filter panel is open, so the API
/// is only called once filters are applied.
pub fn fetch_enabled(path: &str) -> bool {
    Page::from_path(path) != Page::MoreFilters
}

/// Management listings show per-project action buttons.
pub fn shows_bottom_buttons(path: &str) -> bool {
    path.starts_with(MANAGE_PREFIX)
}

pub fn project_href(id: &str) -> String {
    format!("{PROJECT_DETAIL_PREFIX}{id}")
}
