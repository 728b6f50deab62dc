//! Card of one project in a listing.

use leptos::prelude::*;
use taskmap_common::fetch::ProjectSummary;
use taskmap_common::routes;

/// Compact card: name, organisation, difficulty and progress.
#[component]
pub fn ProjectCard(
    project: ProjectSummary,
    #[prop(default = false)] management: bool,
    #[prop(default = false)] show_bottom_buttons: bool,
) -> impl IntoView {
    let id = project.project_id.to_string();
    let href = routes::project_href(&id);
    let mapped = project.percent_mapped.min(100);
    let validated = project.percent_validated.min(100);

    let bottom_buttons = show_bottom_buttons.then(|| {
        let tasks_href = format!("{href}/tasks");
        let edit_href = format!("{}/{id}", routes::MANAGE_PROJECTS);
        view! {
            <div class="card-buttons">
                <a href=tasks_href class="btn btn-link">"Tasks"</a>
                {management.then(|| view! { <a href=edit_href class="btn btn-link">"Edit"</a> })}
            </div>
        }
    });

    view! {
        <article class="project-card">
            <a href=href.clone() class="project-card-link">
                <div class="project-card-head">
                    <span class="project-id">"#" {id.clone()}</span>
                    {project.priority.clone().map(|p| view! { <span class="priority-badge">{p}</span> })}
                </div>
                <h3 class="project-name">{project.name.clone()}</h3>
                <p class="project-org">{project.organisation_name.clone().unwrap_or_default()}</p>
                <p class="project-description">{project.short_description.clone().unwrap_or_default()}</p>
                <div class="progress-bar" title=format!("{mapped}% mapped, {validated}% validated")>
                    <div class="progress-mapped" style=format!("width: {mapped}%")></div>
                    <div class="progress-validated" style=format!("width: {validated}%")></div>
                </div>
                <div class="project-card-foot">
                    <span class="difficulty">{project.difficulty.clone().unwrap_or_default()}</span>
                    <span class="last-updated">{project.last_updated.clone().unwrap_or_default()}</span>
                </div>
            </a>
            {bottom_buttons}
        </article>
    }
}
