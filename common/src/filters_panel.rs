//! The "more filters" panel: sizing against the page chrome and the page
//! scroll lock it holds while open.

use tracing::{debug, warn};

use crate::query::ProjectQuery;

/// Element id of the explore navigation bar.
pub const NAV_REGION_ID: &str = "explore-nav";
/// Element id of the site header.
pub const HEADER_REGION_ID: &str = "top-header";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overflow {
    Hidden,
    Auto,
}

impl Overflow {
    pub fn as_css(self) -> &'static str {
        match self {
            Overflow::Hidden => "hidden",
            Overflow::Auto => "auto",
        }
    }
}

/// Page-level scrolling.
pub trait PageScroll {
    fn set_overflow(&self, overflow: Overflow);
}

/// Viewport measurements.
pub trait Viewport {
    fn inner_height(&self) -> f64;
    /// Rendered height of the element with `id`, if present.
    fn region_height(&self, id: &str) -> Option<f64>;
}

/// Height left for the panel below the navigation bar and header.
pub fn panel_height(viewport_height: f64, chrome_height: f64) -> f64 {
    (viewport_height - chrome_height).max(0.0)
}

/// Combined height of the navigation bar and the header.
pub fn chrome_height<V: Viewport + ?Sized>(viewport: &V) -> f64 {
    [NAV_REGION_ID, HEADER_REGION_ID]
        .iter()
        .map(|id| {
            viewport.region_height(id).unwrap_or_else(|| {
                warn!("Layout region #{id} not found, assuming zero height");
                0.0
            })
        })
        .sum()
}

/// Where the panel's backdrop leads: the listing with the current query.
pub fn close_href(explore_path: &str, query: &ProjectQuery) -> String {
    let search = query.to_query_string();
    if search.is_empty() {
        explore_path.to_string()
    } else {
        format!("{explore_path}?{search}")
    }
}

/// Hides page overflow for as long as it lives.
#[derive(Debug)]
pub struct ScrollLock<S: PageScroll> {
    page: S,
}

impl<S: PageScroll> ScrollLock<S> {
    pub fn engage(page: S) -> Self {
        page.set_overflow(Overflow::Hidden);
        Self { page }
    }
}

impl<S: PageScroll> Drop for ScrollLock<S> {
    fn drop(&mut self) {
        self.page.set_overflow(Overflow::Auto);
    }
}

/// State of an open filters panel.
///
/// Whatever removes the panel (close click, navigation, unmount) drops this
/// value, which cancels every registration attached with [`Self::on_close`]
/// and then restores page scrolling.
pub struct FiltersPanel<S: PageScroll> {
    cleanups: Vec<Box<dyn FnOnce()>>,
    chrome_height: f64,
    height: f64,
    // Declared last so it drops after the registrations are cancelled.
    _lock: ScrollLock<S>,
}

impl<S: PageScroll> FiltersPanel<S> {
    /// Open the panel: lock page scrolling and size it to `viewport`.
    pub fn open<V: Viewport + ?Sized>(page: S, viewport: &V) -> Self {
        let lock = ScrollLock::engage(page);
        let chrome_height = chrome_height(viewport);
        let height = panel_height(viewport.inner_height(), chrome_height);
        debug!(height, chrome_height, "Filters panel opened");
        Self {
            cleanups: Vec::new(),
            chrome_height,
            height,
            _lock: lock,
        }
    }

    /// Recompute the height after a viewport resize.
    pub fn on_resize<V: Viewport + ?Sized>(&mut self, viewport: &V) -> f64 {
        self.height = panel_height(viewport.inner_height(), self.chrome_height);
        self.height
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Run `cleanup` when the panel goes away (e.g. remove a listener).
    pub fn on_close(&mut self, cleanup: impl FnOnce() + 'static) {
        self.cleanups.push(Box::new(cleanup));
    }
}

impl<S: PageScroll> Drop for FiltersPanel<S> {
    fn drop(&mut self) {
        for cleanup in self.cleanups.drain(..).rev() {
            cleanup();
        }
    }
}
