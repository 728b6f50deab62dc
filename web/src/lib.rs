//! Taskmap Web – Leptos front end for browsing and managing mapping projects.

pub mod app;
pub mod components;
pub mod navigation;
pub mod pages;

#[cfg(feature = "hydrate")]
pub mod browser;

cfg_if::cfg_if! {
    if #[cfg(feature = "ssr")] {
        pub mod server;
    }
}

/// Entry-point called from the WASM bundle to hydrate the server-rendered HTML.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    leptos::mount::hydrate_body(app::App);
}
