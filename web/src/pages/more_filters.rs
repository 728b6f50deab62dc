//! More-filters panel – overlay on the explore listing.
//!
//! While open, page scrolling is locked and the panel fills the viewport
//! below the site header and the explore nav bar.

use leptos::prelude::*;
use taskmap_common::filters_panel::close_href;
use taskmap_common::{ProjectQuery, QueryUpdate};

use crate::app::use_config;
use crate::navigation::RouterNavigator;
use crate::pages::{use_project_query, use_query_setter};

const DIFFICULTIES: [(&str, &str); 3] = [
    ("EASY", "Easy"),
    ("MODERATE", "Moderate"),
    ("CHALLENGING", "Challenging"),
];

const STATUSES: [(&str, &str); 3] = [
    ("PUBLISHED", "Published"),
    ("DRAFT", "Draft"),
    ("ARCHIVED", "Archived"),
];

#[component]
pub fn MoreFilters() -> impl IntoView {
    let explore_path = use_config().explore_path;
    let navigator = RouterNavigator::new();
    let query = use_project_query();
    let set_query = use_query_setter(navigator);

    #[allow(unused_variables)] // written only in the hydrate (WASM) build
    let (height, set_height) = signal(None::<f64>);

    #[cfg(feature = "hydrate")]
    {
        use taskmap_common::filters_panel::FiltersPanel;

        use crate::browser::{BodyScroll, BrowserViewport};

        // Dropped with the component: cancels the resize listener, then
        // restores page scrolling.
        let panel = StoredValue::new_local(FiltersPanel::open(BodyScroll, &BrowserViewport));
        set_height.set(Some(panel.with_value(|p| p.height())));

        let handle = window_event_listener(leptos::ev::resize, move |_| {
            if let Some(h) = panel.try_update_value(|p| p.on_resize(&BrowserViewport)) {
                set_height.set(Some(h));
            }
        });
        panel.update_value(|p| p.on_close(move || handle.remove()));
    }

    let close = Memo::new(move |_| close_href(&explore_path, &query.get()));
    let style = move || {
        height
            .get()
            .map(|h| format!("height: {h}px"))
            .unwrap_or_default()
    };

    view! {
        <div class="more-filters">
            <div class="more-filters-panel" style=style>
                <FilterGroup
                    title="Difficulty"
                    key="difficulty"
                    options=&DIFFICULTIES
                    query=query
                    set_query=set_query
                />
                <FilterGroup
                    title="Project status"
                    key="status"
                    options=&STATUSES
                    query=query
                    set_query=set_query
                />
                <div class="more-filters-actions">
                    <a href=move || close.get() class="btn btn-primary">"Apply"</a>
                    <button
                        class="btn btn-link"
                        on:click=move |_| set_query.run(clear_filters(&query.get_untracked()))
                    >
                        "Clear filters"
                    </button>
                </div>
            </div>
            <a href=move || close.get() class="more-filters-backdrop" aria-label="Close filters"></a>
        </div>
    }
}

/// One radio-style group of filter values; choosing the active value again
/// clears it.
#[component]
fn FilterGroup(
    title: &'static str,
    key: &'static str,
    options: &'static [(&'static str, &'static str)],
    query: Memo<ProjectQuery>,
    set_query: Callback<QueryUpdate>,
) -> impl IntoView {
    let buttons = options
        .iter()
        .map(|&(value, label)| {
            let active = move || query.with(|q| q.get_str(key) == Some(value));
            view! {
                <button
                    class="filter-option"
                    class:active=active
                    on:click=move |_| set_query.run(toggle_filter(&query.get_untracked(), key, value))
                >
                    {label}
                </button>
            }
        })
        .collect_view();

    view! {
        <fieldset class="filter-group">
            <legend>{title}</legend>
            {buttons}
        </fieldset>
    }
}

/// Set `key` to `value`, or clear it when it already holds `value`.  The
/// page always resets.
fn toggle_filter(query: &ProjectQuery, key: &str, value: &str) -> QueryUpdate {
    let update = QueryUpdate::new().clear("page");
    if query.get_str(key) == Some(value) {
        update.clear(key)
    } else {
        update.set(key, value)
    }
}

/// Clear every panel filter that is currently set.
fn clear_filters(query: &ProjectQuery) -> QueryUpdate {
    ["difficulty", "status", "page"]
        .into_iter()
        .filter(|key| query.is_set(key))
        .fold(QueryUpdate::new(), |update, key| update.clear(key))
}
