//! Routed pages and the server functions they fetch through.

pub mod explore;
pub mod login;
pub mod more_filters;
pub mod project_detail;
pub mod user_projects;

use leptos::prelude::*;
use leptos_router::hooks::use_location;
use taskmap_common::fetch::{ListPayload, ListRequest};
use taskmap_common::{
    FetchError, FetchResult, HistoryMode, ProjectQuery, QueryController, QueryUpdate,
};

use crate::app::use_session;
use crate::navigation::RouterNavigator;

/// Resource value of a list fetch; `None` while fetching is held back.
pub(crate) type ListResource = Resource<Option<Result<Result<ListPayload, FetchError>, ServerFnError>>>;

/// The effective query of the current location.
pub(crate) fn use_project_query() -> Memo<ProjectQuery> {
    let location = use_location();
    Memo::new(move |_| ProjectQuery::parse(&location.search.get()))
}

/// The query setter handed to listing components: partial updates, pushed
/// onto history.
pub(crate) fn use_query_setter(navigator: RouterNavigator) -> Callback<QueryUpdate> {
    let location = use_location();
    Callback::new(move |update: QueryUpdate| {
        let mut controller = QueryController::from_location(
            &location.pathname.get_untracked(),
            &location.search.get_untracked(),
        );
        controller.set_query_param(update, HistoryMode::Push, &navigator);
    })
}

/// Keep the address bar on the canonical serialization of the query.
pub(crate) fn canonicalize_location(navigator: RouterNavigator) {
    let location = use_location();
    Effect::new(move |_| {
        let mut controller =
            QueryController::from_location(&location.pathname.get(), &location.search.get());
        controller.canonicalize(&navigator);
    });
}

/// List fetch keyed on path, query, action preference and auth token.  While
/// `enabled` is false the fetch is not issued.
pub(crate) fn use_list_resource(
    query: Memo<ProjectQuery>,
    enabled: impl Fn() -> bool + Send + Sync + 'static,
) -> ListResource {
    let session = use_session();
    let location = use_location();
    Resource::new(
        move || {
            enabled().then(|| {
                let path = location.pathname.get();
                let query = query.get();
                session.with(|s| ListRequest::new(&path, &query, s))
            })
        },
        |request| async move {
            match request {
                Some(request) => Some(
                    explore::list_projects(
                        request.query.to_query_string(),
                        request.action,
                        request.token,
                    )
                    .await,
                ),
                None => None,
            }
        },
    )
}

/// Collapse a server-function resource value into a fetch result.
///
/// `None` (still loading, or not fetched yet) is pending; a transport
/// failure counts as a network error.
pub(crate) fn fetch_result<T>(
    value: Option<Option<Result<Result<T, FetchError>, ServerFnError>>>,
) -> FetchResult<T> {
    match value.flatten() {
        None => FetchResult::Pending,
        Some(Ok(outcome)) => outcome.into(),
        Some(Err(e)) => FetchResult::Error(FetchError::Network(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_result_mapping() {
        let pending: FetchResult<u32> = fetch_result(None);
        assert_eq!(pending, FetchResult::Pending);

        let disabled: FetchResult<u32> = fetch_result(Some(None));
        assert_eq!(disabled, FetchResult::Pending);

        let ok = fetch_result(Some(Some(Ok(Ok(7u32)))));
        assert_eq!(ok, FetchResult::Success(7));

        let api = fetch_result::<u32>(Some(Some(Ok(Err(FetchError::Network("x".into()))))));
        assert_eq!(api, FetchResult::Error(FetchError::Network("x".into())));

        let transport = fetch_result::<u32>(Some(Some(Err(ServerFnError::new("boom")))));
        assert!(matches!(transport, FetchResult::Error(FetchError::Network(_))));
    }
}
