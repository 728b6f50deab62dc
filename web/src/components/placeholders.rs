//! Loading skeletons and error pages.

use leptos::prelude::*;
use leptos_router::components::A;
use taskmap_common::routes;

/// Skeleton of a results list.
#[component]
pub fn ResultsPlaceholder() -> impl IntoView {
    view! {
        <div class="results-placeholder" aria-busy="true">
            {(0..6).map(|_| view! { <div class="card-placeholder"></div> }).collect_view()}
        </div>
    }
}

/// Skeleton of the detail page while the project loads.
#[component]
pub fn ProjectDetailPlaceholder() -> impl IntoView {
    view! {
        <div class="project-detail-placeholder" aria-busy="true">
            <div class="title-placeholder"></div>
            <div class="text-placeholder"></div>
            <div class="map-placeholder"></div>
        </div>
    }
}

/// Shown when the project exists but the user may not see it.
#[component]
pub fn PrivateProjectError() -> impl IntoView {
    view! {
        <div class="error-page private-project">
            <h3>"This project is private"</h3>
            <p>"Only members of the teams allowed on this project can see it."</p>
            <A href=routes::EXPLORE attr:class="btn btn-primary">"Explore other projects"</A>
        </div>
    }
}

/// Unknown page, or a project that could not be loaded.
#[component]
pub fn NotFound(project_id: Option<String>) -> impl IntoView {
    let message = match project_id {
        Some(id) => format!("Project #{id} not found"),
        None => "Page not found".to_string(),
    };

    view! {
        <div class="error-page not-found">
            <h3>{message}</h3>
            <A href=routes::EXPLORE attr:class="btn btn-primary">"Back to projects"</A>
        </div>
    }
}
