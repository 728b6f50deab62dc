//! Router-backed implementation of the common `Navigator` seam.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use taskmap_common::navigation::{NavigateOptions, Navigator};

type NavigateFn = Box<dyn Fn(&str, leptos_router::NavigateOptions)>;

/// Copyable handle to the router's navigate function.
///
/// Must be created inside a `<Router>`; the function itself stays on the
/// thread that created it.
#[derive(Clone, Copy)]
pub struct RouterNavigator {
    navigate: StoredValue<NavigateFn, LocalStorage>,
}

impl RouterNavigator {
    pub fn new() -> Self {
        let navigate = use_navigate();
        Self {
            navigate: StoredValue::new_local(Box::new(navigate) as NavigateFn),
        }
    }
}

impl Default for RouterNavigator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RouterNavigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("RouterNavigator")
    }
}

impl Navigator for RouterNavigator {
    fn navigate(&self, path: &str, options: NavigateOptions) {
        let options = leptos_router::NavigateOptions {
            replace: options.replace,
            ..Default::default()
        };
        self.navigate.with_value(|navigate| navigate(path, options));
    }
}
