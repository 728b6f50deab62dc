//! Login page – stores an API access token in the session.

use leptos::prelude::*;
use leptos_meta::Title;
use leptos_router::hooks::use_navigate;
use leptos_router::NavigateOptions;
use taskmap_common::routes;

use crate::app::use_session;

#[component]
pub fn LoginPage() -> impl IntoView {
    let session = use_session();
    let navigate = use_navigate();
    let (username, set_username) = signal(String::new());
    let (token, set_token) = signal(String::new());

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let token = token.get_untracked();
        if token.trim().is_empty() {
            return;
        }
        session.update(|s| s.log_in(token.trim(), username.get_untracked()));
        navigate(routes::MANAGE_PROJECTS, NavigateOptions::default());
    };

    view! {
        <Title text="Log in"/>
        <div class="login-page">
            {move || session.with(|s| s.auth.username.clone()).map(|name| view! {
                <p class="login-current">
                    "Logged in as " {name} " "
                    <button class="btn btn-link" on:click=move |_| session.update(|s| s.log_out())>
                        "Log out"
                    </button>
                </p>
            })}
            <form class="login-form" on:submit=on_submit>
                <label>
                    "Username"
                    <input type="text" prop:value=username on:input=move |ev| set_username.set(event_target_value(&ev))/>
                </label>
                <label>
                    "Access token"
                    <input type="password" prop:value=token on:input=move |ev| set_token.set(event_target_value(&ev))/>
                </label>
                <button type="submit" class="btn btn-primary">"Log in"</button>
            </form>
        </div>
    }
}
