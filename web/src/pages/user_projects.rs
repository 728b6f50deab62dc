//! "My projects" and "Manage projects" – listings scoped to the logged-in user.

use leptos::prelude::*;
use leptos_meta::Title;
use leptos_router::hooks::use_location;
use taskmap_common::auth::AuthGate;
use taskmap_common::policy::MyProjectsDefault;
use taskmap_common::ListView;

use crate::app::{use_config, use_session};
use crate::components::nav::MyProjectsNav;
use crate::components::placeholders::ResultsPlaceholder;
use crate::components::search_results::ProjectListing;
use crate::navigation::RouterNavigator;
use crate::pages::{
    canonicalize_location, fetch_result, use_list_resource, use_project_query, use_query_setter,
};

#[component]
pub fn MyProjectsPage() -> impl IntoView {
    view! { <UserProjectsPage management=false/> }
}

#[component]
pub fn ManageProjectsPage() -> impl IntoView {
    view! { <UserProjectsPage management=true/> }
}

/// Listing of the user's own projects.  Anonymous visitors are sent to the
/// login page; a query without any user scope falls back to projects the
/// user manages.
#[component]
pub fn UserProjectsPage(management: bool) -> impl IntoView {
    let location = use_location();
    let session = use_session();
    let navigator = RouterNavigator::new();

    let query = use_project_query();
    let set_query = use_query_setter(navigator);
    canonicalize_location(navigator);

    let mut gate = AuthGate::new(use_config().login_path);
    Effect::new(move |_| {
        let token = session.with(|s| s.auth.token().map(String::from));
        gate.check(token.as_deref(), &navigator, 0);
    });

    // Anonymous visitors are on their way to the login page.
    let mut default_scope = MyProjectsDefault::new();
    Effect::new(move |_| {
        if !session.with(|s| s.auth.is_logged_in()) {
            return;
        }
        if let Some(update) = default_scope.check(&query.get()) {
            set_query.run(update);
        }
    });

    let projects = use_list_resource(query, || true);
    let retry = Callback::new(move |_: ()| projects.refetch());

    let title = if management {
        "Manage projects"
    } else {
        "My projects"
    };

    view! {
        <Title text=title/>
        <div class="pull-center">
            <MyProjectsNav query=query management=management/>
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
