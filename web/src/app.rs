//! Root Leptos application component with routing.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::{
    components::{ParentRoute, Redirect, Route, Router, Routes},
    path,
};
use taskmap_common::config::Config;
use taskmap_common::SessionState;

use crate::components::nav::Header;
use crate::components::placeholders::NotFound;
use crate::pages::{
    explore::{ExploreIndex, ProjectsPage},
    login::LoginPage,
    more_filters::MoreFilters,
    project_detail::ProjectDetailPage,
    user_projects::{ManageProjectsPage, MyProjectsPage},
};

/// Server-side application state, provided as Leptos context for server functions.
#[derive(Clone, Debug)]
#[cfg(feature = "ssr")]
pub struct AppState {
    pub config: Config,
    pub api: crate::server::api::ApiClient,
    pub leptos_options: LeptosOptions,
}

/// HTML document wrapping `<App/>` for server rendering.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// The session store shared by every page.
pub fn use_session() -> RwSignal<SessionState> {
    expect_context::<RwSignal<SessionState>>()
}

/// Settings visible to components.  The browser bundle has no config file
/// and falls back to the defaults.
pub fn use_config() -> Config {
    use_context::<Config>().unwrap_or_default()
}

/// The root `<App/>` component.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = use_config();
    let session = RwSignal::new(SessionState::from_config(&config));
    provide_context(config);
    provide_context(session);

    // Stored auth and preferences load after hydration, so the first client
    // render matches the server's.
    #[cfg(feature = "hydrate")]
    Effect::new(move |restored: Option<()>| {
        if restored.is_none() {
            session.update(crate::browser::restore_session);
        }
        session.with(crate::browser::save_session);
    });

    view! {
        <Stylesheet id="leptos" href="/pkg/taskmap-web.css"/>
        <Title text="Taskmap – Projects"/>
        <Meta name="description" content="Browse, filter and manage mapping projects"/>

        <Router>
            <Header/>
            <main class="main-content">
                <Routes fallback=|| view! { <NotFound project_id=None/> }>
                    <Route path=path!("/") view=|| view! { <Redirect path="/explore"/> }/>
                    <ParentRoute path=path!("/explore") view=ProjectsPage>
                        <Route path=path!("") view=ExploreIndex/>
                        <Route path=path!("filters") view=MoreFilters/>
                    </ParentRoute>
                    <Route path=path!("/contributions/projects") view=MyProjectsPage/>
                    <Route path=path!("/manage/projects") view=ManageProjectsPage/>
                    <Route path=path!("/projects/:id") view=ProjectDetailPage/>
                    <Route path=path!("/login") view=LoginPage/>
                </Routes>
            </main>
        </Router>
    }
}
