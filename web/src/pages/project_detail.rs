//! Project detail page – one project with its task map.

use leptos::prelude::*;
use leptos_router::hooks::use_params_map;
use taskmap_common::fetch::ProjectPayload;
use taskmap_common::view_mode::{resolve_detail, DetailView};
use taskmap_common::FetchError;

use crate::app::use_session;
use crate::components::detail::ProjectDetail;
use crate::components::placeholders::{NotFound, PrivateProjectError, ProjectDetailPlaceholder};
use crate::navigation::RouterNavigator;
use crate::pages::fetch_result;

// ─── Server functions ────────────────────────────────────────────────────────

#[server(name = GetProject, prefix = "/api")]
pub async fn get_project(
    id: String,
    token: Option<String>,
) -> Result<Result<ProjectPayload, FetchError>, ServerFnError> {
    use taskmap_common::fetch::ProjectFetcher;

    let state = use_context::<crate::app::AppState>()
        .ok_or_else(|| ServerFnError::new("Missing AppState"))?;
    let outcome = state.api.get_project(&id, token.as_deref()).await;
    if let Err(e) = &outcome {
        tracing::info!(project_id = %id, "Project fetch failed: {e}");
    }
    Ok(outcome)
}

// ─── Page component ──────────────────────────────────────────────────────────

/// Detail page for a single project.
#[component]
pub fn ProjectDetailPage() -> impl IntoView {
    let params = use_params_map();
    let session = use_session();
    let navigator = RouterNavigator::new();

    let id = Memo::new(move |_| params.with(|p| p.get("id").unwrap_or_default()));

    let project = Resource::new(
        move || (id.get(), session.with(|s| s.auth.token().map(String::from))),
        |(id, token)| async move { get_project(id, token).await },
    );

    // Each newly requested project starts at the top of the page.
    #[cfg(feature = "hydrate")]
    {
        use taskmap_common::view_mode::ScrollReset;

        let mut scroll = ScrollReset::new();
        Effect::new(move |_| {
            scroll.on_id(&id.get(), &crate::browser::WindowScroller);
        });
    }

    view! {
        <Suspense fallback=move || view! { <ProjectDetailPlaceholder/> }>
            {move || {
                let result = fetch_result(project.get().map(Some));
                match resolve_detail(&id.get(), &result, &navigator) {
                    DetailView::Placeholder => view! { <ProjectDetailPlaceholder/> }.into_any(),
                    DetailView::PrivateProject => view! { <PrivateProjectError/> }.into_any(),
                    DetailView::NotFound { project_id } => {
                        view! { <NotFound project_id=Some(project_id)/> }.into_any()
                    }
                    DetailView::Detail(props) => view! { <ProjectDetail props=*props/> }.into_any(),
                }
            }}
        </Suspense>
    }
}
