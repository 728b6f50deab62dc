//! Default filter for the "my projects" listings.

use tracing::info;

use crate::navigation::DepTracker;
use crate::query::{ProjectQuery, QueryUpdate, USER_SCOPE_KEYS};

/// `true` when none of the user-scope filters is set.
pub fn lacks_user_scope(query: &ProjectQuery) -> bool {
    USER_SCOPE_KEYS.iter().all(|key| !query.is_set(key))
}

/// The filter applied when a user-scoped listing has none.
pub fn my_projects_default() -> QueryUpdate {
    QueryUpdate::new().set("managedByMe", true)
}

/// Decides when the default filter must be applied.
///
/// The check runs at most once per distinct query value, and only when the
/// query genuinely lacks every user-scope filter.  The returned update goes
/// through the regular query setter, so it lands in history like a manual
/// filter change.
#[derive(Debug, Clone, Default)]
pub struct MyProjectsDefault {
    seen: DepTracker<ProjectQuery>,
}

impl MyProjectsDefault {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&mut self, query: &ProjectQuery) -> Option<QueryUpdate> {
        if !self.seen.changed(query.clone()) {
            return None;
        }
        if !lacks_user_scope(query) {
            return None;
        }
        info!("No user-scope filter set, defaulting to managedByMe");
        Some(my_projects_default())
    }
}
