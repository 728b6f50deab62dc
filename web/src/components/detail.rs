//! Full view of one project.

use leptos::prelude::*;
use serde_json::Value;
use taskmap_common::navigation::{NavigateOptions, Navigator};
use taskmap_common::routes;
use taskmap_common::view_mode::DetailProps;

use crate::navigation::RouterNavigator;

/// Number of features in a GeoJSON feature collection.
fn task_count(tasks: Option<&Value>) -> usize {
    tasks
        .and_then(|t| t.get("features"))
        .and_then(Value::as_array)
        .map_or(0, Vec::len)
}

#[component]
pub fn ProjectDetail(props: DetailProps<RouterNavigator>) -> impl IntoView {
    let DetailProps {
        project,
        project_loading,
        tasks_error,
        tasks,
        navigate,
    } = props;

    let id = project.project_id.to_string();
    let tasks_href = format!("{}/tasks", routes::project_href(&id));
    let tasks_summary = if tasks_error {
        "Tasks could not be loaded".to_string()
    } else {
        format!("{} tasks", task_count(tasks.as_ref()))
    };

    view! {
        <div class="project-detail" aria-busy=project_loading.to_string()>
            <header class="project-detail-head">
                <span class="project-id">"#" {id}</span>
                <h2>{project.project_info.name}</h2>
                <p class="project-org">{project.organisation_name.unwrap_or_default()}</p>
            </header>
            <p class="project-short">{project.project_info.short_description.unwrap_or_default()}</p>
            <div class="project-description" inner_html=project.project_info.description.unwrap_or_default()></div>
            <dl class="project-stats">
                <dt>"Status"</dt>
                <dd>{project.status.unwrap_or_default()}</dd>
                <dt>"Difficulty"</dt>
                <dd>{project.difficulty.unwrap_or_default()}</dd>
                <dt>"Mapped"</dt>
                <dd>{format!("{}%", project.percent_mapped)}</dd>
                <dt>"Validated"</dt>
                <dd>{format!("{}%", project.percent_validated)}</dd>
                <dt>"Tasks"</dt>
                <dd>{tasks_summary}</dd>
            </dl>
            <button
                class="btn btn-primary"
                on:click=move |_| navigate.navigate(&tasks_href, NavigateOptions::push())
            >
                "Contribute"
            </button>
        </div>
    }
}
