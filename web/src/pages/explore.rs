//! Explore page – public project listing with optional map and filters overlay.

use leptos::prelude::*;
use leptos_meta::Title;
use leptos_router::{components::Outlet, hooks::use_location};
use taskmap_common::fetch::ListPayload;
use taskmap_common::routes;
use taskmap_common::{FetchError, ListView};

use crate::app::use_session;
use crate::components::nav::ProjectNav;
use crate::components::placeholders::ResultsPlaceholder;
use crate::components::search_results::ProjectListing;
use crate::navigation::RouterNavigator;
use crate::pages::{
    canonicalize_location, fetch_result, use_list_resource, use_project_query, use_query_setter,
};

// ─── Server functions ────────────────────────────────────────────────────────

/// Project search, shared by every listing page.  `query` is the canonical
/// query string of the page.
#[server(name = ListProjects, prefix = "/api")]
pub async fn list_projects(
    query: String,
    action: Option<String>,
    token: Option<String>,
) -> Result<Result<ListPayload, FetchError>, ServerFnError> {
    use taskmap_common::fetch::{ListRequest, ProjectFetcher};
    use taskmap_common::ProjectQuery;

    let state = use_context::<crate::app::AppState>()
        .ok_or_else(|| ServerFnError::new("Missing AppState"))?;
    let request = ListRequest {
        query: ProjectQuery::parse(&query),
        action,
        token,
    };
    let outcome = state.api.list_projects(&request).await;
    if let Err(e) = &outcome {
        tracing::warn!("Project search failed: {e}");
    }
    Ok(outcome)
}

// ─── Page components ─────────────────────────────────────────────────────────

/// `/explore` and its nested routes.  The more-filters panel renders into
/// the outlet on top of the listing.
#[component]
pub fn ProjectsPage() -> impl IntoView {
    let location = use_location();
    let session = use_session();
    let navigator = RouterNavigator::new();

    let query = use_project_query();
    let set_query = use_query_setter(navigator);
    canonicalize_location(navigator);

    // Nothing is fetched while the filters panel is open.
    let projects = use_list_resource(query, move || {
        routes::fetch_enabled(&location.pathname.get())
    });
    let retry = Callback::new(move |_: ()| projects.refetch());

    view! {
        <Title text="Explore projects"/>
        <div class="pull-center">
            <ProjectNav query=query set_query=set_query/>
            <Outlet/>
            <Transition fallback=move || view! { <ResultsPlaceholder/> }>
                {move || {
                    let list = session.with(|s| {
                        ListView::build(&location.pathname.get(), s, &fetch_result(projects.get()))
                    });
                    view! {
                        <ProjectListing list=list query=query.get() set_query=set_query retry=retry/>
                    }
                }}
            </Transition>
        </div>
    }
}

/// Bare `/explore`: the listing alone.
#[component]
pub fn ExploreIndex() -> impl IntoView {}
