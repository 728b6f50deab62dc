//! Results column of the listing pages, and the map next to it.

use leptos::prelude::*;
use taskmap_common::fetch::{FetchStatus, ProjectSummary};
use taskmap_common::{ListView, ProjectQuery, QueryUpdate};

use crate::components::paginator::ProjectCardPaginator;
use crate::components::placeholders::ResultsPlaceholder;
use crate::components::project_card::ProjectCard;
use crate::components::projects_map::ProjectsMap;

/// Results plus, when the map is shown, the map column.
#[component]
pub fn ProjectListing(
    list: ListView,
    query: ProjectQuery,
    set_query: Callback<QueryUpdate>,
    retry: Callback<()>,
) -> impl IntoView {
    let layout = list.layout;
    let map = layout.shows_map().then(|| {
        view! {
            <ProjectsMap map_results=list.map_results.clone() query=query.clone() set_query=set_query/>
        }
    });
    let total = list.pagination.as_ref().map(|p| p.total);
    let paginator = list.pagination.map(|pagination| {
        view! { <ProjectCardPaginator pagination=pagination set_query=set_query/> }
    });

    view! {
        <section class=layout.container_class()>
            <div class=layout.results_class()>
                <ProjectSearchResults
                    status=list.status
                    projects=list.projects
                    total=total
                    management=list.management
                    show_bottom_buttons=list.show_bottom_buttons
                    retry=retry
                />
                {paginator}
            </div>
            {map}
        </section>
    }
}

/// The cards of one results page, or its loading/error state.
#[component]
pub fn ProjectSearchResults(
    status: FetchStatus,
    projects: Vec<ProjectSummary>,
    total: Option<u32>,
    management: bool,
    show_bottom_buttons: bool,
    retry: Callback<()>,
) -> impl IntoView {
    match status {
        FetchStatus::Pending => view! { <ResultsPlaceholder/> }.into_any(),
        FetchStatus::Error => view! {
            <div class="results-error">
                <p>"An error occurred while loading projects."</p>
                <button class="btn btn-primary" on:click=move |_| retry.run(())>"Retry"</button>
            </div>
        }
        .into_any(),
        FetchStatus::Success if projects.is_empty() => view! {
            <p class="results-empty">"No projects were found."</p>
        }
        .into_any(),
        FetchStatus::Success => {
            let count = total.unwrap_or(projects.len() as u32);
            view! {
                <p class="results-count">{format!("Showing {count} projects")}</p>
                <div class="cards-container">
                    {projects
                        .into_iter()
                        .map(|project| view! {
                            <ProjectCard
                                project=project
                                management=management
                                show_bottom_buttons=show_bottom_buttons
                            />
                        })
                        .collect_view()}
                </div>
            }
            .into_any()
        }
    }
}
