//! Navigation seam between the controller and whatever router hosts it.

/// Options for a single navigation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigateOptions {
    /// Replace the current history entry instead of pushing a new one.
    /// Redirects that must not be reachable via "back" use this.
    pub replace: bool,
}

impl NavigateOptions {
    pub fn push() -> Self {
        Self { replace: false }
    }

    pub fn replace() -> Self {
        Self { replace: true }
    }
}

/// Something that can move the application to another path.
pub trait Navigator {
    fn navigate(&self, path: &str, options: NavigateOptions);
}

impl<N: Navigator + ?Sized> Navigator for &N {
    fn navigate(&self, path: &str, options: NavigateOptions) {
        (**self).navigate(path, options)
    }
}

/// Remembers the last dependency value and reports when it changes, the
/// way an effect's dependency list gates re-runs.
#[derive(Debug, Clone)]
pub struct DepTracker<T> {
    last: Option<T>,
}

impl<T> Default for DepTracker<T> {
    fn default() -> Self {
        Self { last: None }
    }
}

impl<T: PartialEq> DepTracker<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `next`; `true` when it differs from the previous value
    /// (always `true` the first time).
    pub fn changed(&mut self, next: T) -> bool {
        if self.last.as_ref() == Some(&next) {
            return false;
        }
        self.last = Some(next);
        true
    }

    pub fn last(&self) -> Option<&T> {
        self.last.as_ref()
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}
