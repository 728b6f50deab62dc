//! Site header and the listing nav bars.
//!
//! The header and the listing nav bars carry the element ids the filters
//! panel measures to size itself.

use leptos::prelude::*;
use leptos_router::components::A;
use taskmap_common::controller::href_for;
use taskmap_common::filters_panel::{HEADER_REGION_ID, NAV_REGION_ID};
use taskmap_common::query::USER_SCOPE_KEYS;
use taskmap_common::routes;
use taskmap_common::{ProjectQuery, QueryUpdate};

use crate::app::use_session;

/// Site-wide header.
#[component]
pub fn Header() -> impl IntoView {
    let session = use_session();
    let logged_in = move || session.with(|s| s.auth.is_logged_in());

    view! {
        <header id=HEADER_REGION_ID class="nav-bar">
            <div class="nav-brand">
                <A href="/" attr:class="nav-logo">"Taskmap"</A>
            </div>
            <div class="nav-links">
                <A href=routes::EXPLORE attr:class="nav-link">"Explore projects"</A>
                <A href=routes::MY_PROJECTS attr:class="nav-link">"My projects"</A>
                <A href=routes::MANAGE_PROJECTS attr:class="nav-link">"Manage"</A>
                <Show
                    when=logged_in
                    fallback=|| view! { <A href=routes::DEFAULT_LOGIN attr:class="nav-link">"Log in"</A> }
                >
                    <button class="nav-link btn btn-link" on:click=move |_| session.update(|s| s.log_out())>
                        "Log out"
                    </button>
                </Show>
            </div>
        </header>
    }
}

/// Nav bar of the explore listing: search, action, map toggle and the
/// entry to the filters panel.
#[component]
pub fn ProjectNav(query: Memo<ProjectQuery>, set_query: Callback<QueryUpdate>) -> impl IntoView {
    let text = move || query.with(|q| q.get_str("text").unwrap_or_default().to_string());
    let filters_href = move || query.with(|q| href_for(&format!("{}/", routes::EXPLORE_FILTERS), q));

    view! {
        <nav id=NAV_REGION_ID class="explore-nav">
            <input
                type="search"
                class="explore-search"
                placeholder="Search projects"
                prop:value=text
                on:change=move |ev| set_query.run(text_update(&event_target_value(&ev)))
            />
            <ActionSelect/>
            <A href=filters_href attr:class="btn btn-link">"More filters"</A>
            <MapToggle/>
        </nav>
    }
}

/// Nav bar of the user-scoped listings: one tab per scope filter.
#[component]
pub fn MyProjectsNav(query: Memo<ProjectQuery>, management: bool) -> impl IntoView {
    let path = if management {
        routes::MANAGE_PROJECTS
    } else {
        routes::MY_PROJECTS
    };

    let tabs = SCOPE_TABS
        .iter()
        .map(|&(key, value, label)| {
            let href = move || query.with(|q| href_for(path, &q.with(&scope_update(key, value))));
            let class = move || {
                if query.with(|q| scope_matches(q, key, value)) {
                    "scope-tab active"
                } else {
                    "scope-tab"
                }
            };
            view! {
                <A href=href attr:class=class>
                    {label}
                </A>
            }
        })
        .collect_view();

    view! {
        <nav id=NAV_REGION_ID class="explore-nav my-projects-nav">
            <div class="scope-tabs">{tabs}</div>
            <MapToggle/>
        </nav>
    }
}

#[component]
fn MapToggle() -> impl IntoView {
    let session = use_session();
    let label = move || {
        if session.with(|s| s.preferences.map_shown) {
            "Hide map"
        } else {
            "Show map"
        }
    };

    view! {
        <button class="btn btn-link map-toggle" on:click=move |_| session.update(|s| s.toggle_map())>
            {label}
        </button>
    }
}

/// Task action the listing is filtered for, kept in the session.
#[component]
fn ActionSelect() -> impl IntoView {
    let session = use_session();
    let action = move || session.with(|s| s.preferences.action.clone());

    view! {
        <select
            class="action-select"
            prop:value=action
            on:change=move |ev| {
                let value = event_target_value(&ev);
                session.update(|s| s.preferences.action = value);
            }
        >
            <option value="any">"Any action"</option>
            <option value="map">"Mapping"</option>
            <option value="validate">"Validation"</option>
        </select>
    }
}

/// Scope tabs: query key, value, label.
const SCOPE_TABS: [(&str, &str, &str); 5] = [
    ("managedByMe", "true", "Managed by me"),
    ("createdByMe", "true", "Created by me"),
    ("mappedByMe", "true", "Contributed"),
    ("favoritedByMe", "true", "Favorites"),
    ("status", "ARCHIVED", "Archived"),
];

/// Select one scope filter: every other scope key is cleared, as is the page.
fn scope_update(key: &str, value: &str) -> QueryUpdate {
    let update = USER_SCOPE_KEYS
        .iter()
        .filter(|&&other| other != key)
        .fold(QueryUpdate::new().clear("page"), |update, &other| update.clear(other));
    if value == "true" {
        update.set(key, true)
    } else {
        update.set(key, value)
    }
}

fn scope_matches(query: &ProjectQuery, key: &str, value: &str) -> bool {
    if value == "true" {
        query.get_bool(key) == Some(true)
    } else {
        query.get_str(key) == Some(value)
    }
}

/// Free-text search; an empty box clears the search.
fn text_update(text: &str) -> QueryUpdate {
    let text = text.trim();
    let update = QueryUpdate::new().clear("page");
    if text.is_empty() {
        update.clear("text")
    } else {
        update.set("text", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_update_is_exclusive() {
        let query = ProjectQuery::parse("managedByMe=1&page=4&text=roads");
        let next = query.with(&scope_update("favoritedByMe", "true"));
        assert!(!next.is_set("managedByMe"));
        assert_eq!(next.get_bool("favoritedByMe"), Some(true));
        assert_eq!(next.page(), 1);
        assert_eq!(next.get_str("text"), Some("roads"));
        assert!(scope_matches(&next, "favoritedByMe", "true"));
    }

    #[test]
    fn test_archived_tab_uses_status() {
        let next = ProjectQuery::default().with(&scope_update("status", "ARCHIVED"));
        assert!(scope_matches(&next, "status", "ARCHIVED"));
        assert!(!scope_matches(&next, "managedByMe", "true"));
    }

    #[test]
    fn test_text_update() {
        let query = ProjectQuery::parse("text=old&page=2");
        assert_eq!(query.with(&text_update("  roads ")).get_str("text"), Some("roads"));
        assert!(!query.with(&text_update("  ")).is_set("text"));
    }
}
