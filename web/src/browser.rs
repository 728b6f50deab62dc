//! Browser bindings of the view-state seams (hydrate builds only).

use leptos::prelude::*;
use taskmap_common::filters_panel::{Overflow, PageScroll, Viewport};
use taskmap_common::session::{Preferences, SessionState, PREFERENCES_STORAGE_KEY};
use taskmap_common::view_mode::Scroller;
use tracing::warn;
use wasm_bindgen::JsCast;

const TOKEN_STORAGE_KEY: &str = "taskmap.token";
const USERNAME_STORAGE_KEY: &str = "taskmap.username";

/// Overflow style of `document.body`.
pub struct BodyScroll;

impl PageScroll for BodyScroll {
    fn set_overflow(&self, overflow: Overflow) {
        if let Some(body) = document().body() {
            if body.style().set_property("overflow", overflow.as_css()).is_err() {
                warn!("Cannot set body overflow");
            }
        }
    }
}

/// Window and element measurements.
pub struct BrowserViewport;

impl Viewport for BrowserViewport {
    fn inner_height(&self) -> f64 {
        window()
            .inner_height()
            .ok()
            .and_then(|h| h.as_f64())
            .unwrap_or(0.0)
    }

    fn region_height(&self, id: &str) -> Option<f64> {
        let element = document()
            .get_element_by_id(id)?
            .dyn_into::<web_sys::HtmlElement>()
            .ok()?;
        Some(f64::from(element.offset_height()))
    }
}

pub struct WindowScroller;

impl Scroller for WindowScroller {
    fn scroll_to_top(&self) {
        window().scroll_to_with_x_and_y(0.0, 0.0);
    }
}

fn storage() -> Option<web_sys::Storage> {
    window().local_storage().ok().flatten()
}

/// Load persisted auth and preferences into `session`.
pub fn restore_session(session: &mut SessionState) {
    let Some(storage) = storage() else {
        return;
    };
    if let Ok(Some(json)) = storage.get_item(PREFERENCES_STORAGE_KEY) {
        match serde_json::from_str::<Preferences>(&json) {
            Ok(preferences) => session.preferences = preferences,
            Err(e) => warn!("Ignoring stored preferences: {e}"),
        }
    }
    if let Ok(Some(token)) = storage.get_item(TOKEN_STORAGE_KEY) {
        let username = storage
            .get_item(USERNAME_STORAGE_KEY)
            .ok()
            .flatten()
            .unwrap_or_default();
        session.log_in(token, username);
    }
}

/// Persist the session: preferences always, the token while logged in.
pub fn save_session(session: &SessionState) {
    let Some(storage) = storage() else {
        return;
    };
    match serde_json::to_string(&session.preferences) {
        Ok(json) => {
            let _ = storage.set_item(PREFERENCES_STORAGE_KEY, &json);
        }
        Err(e) => warn!("Cannot serialize preferences: {e}"),
    }
    match (session.auth.token(), session.auth.username.as_deref()) {
        (Some(token), username) => {
            let _ = storage.set_item(TOKEN_STORAGE_KEY, token);
            let _ = storage.set_item(USERNAME_STORAGE_KEY, username.unwrap_or_default());
        }
        (None, _) => {
            let _ = storage.remove_item(TOKEN_STORAGE_KEY);
            let _ = storage.remove_item(USERNAME_STORAGE_KEY);
        }
    }
}
