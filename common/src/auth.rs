//! Login gate for user-scoped listings.

use tracing::info;

use crate::navigation::{DepTracker, NavigateOptions, Navigator};

/// Result of one gate check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// Dependencies unchanged since the last check; nothing ran.
    Unchanged,
    Allowed,
    /// A replace-navigation to the login path was issued.
    Redirected,
}

/// Sends anonymous users to the login page.
///
/// The check re-runs only when the token or the navigator's identity
/// changes, so a reactive navigator cannot drive it into a redirect loop.
/// The redirect replaces the history entry: "back" from the login page must
/// not land on the gated page again.
#[derive(Debug, Clone)]
pub struct AuthGate {
    login_path: String,
    deps: DepTracker<(Option<String>, u64)>,
}

impl AuthGate {
    pub fn new(login_path: impl Into<String>) -> Self {
        Self {
            login_path: login_path.into(),
            deps: DepTracker::new(),
        }
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// `navigator_epoch` identifies the navigator instance; bump it when the
    /// host hands out a new navigate function.
    pub fn check<N: Navigator + ?Sized>(
        &mut self,
        token: Option<&str>,
        navigator: &N,
        navigator_epoch: u64,
    ) -> GateOutcome {
        let token = token.filter(|t| !t.is_empty());
        if !self.deps.changed((token.map(String::from), navigator_epoch)) {
            return GateOutcome::Unchanged;
        }
        if token.is_some() {
            return GateOutcome::Allowed;
        }
        info!("No auth token, redirecting to {}", self.login_path);
        navigator.navigate(&self.login_path, NavigateOptions::replace());
        GateOutcome::Redirected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::testing::RecordingNavigator;

    #[test]
    fn test_anonymous_user_redirected_once() {
        let nav = RecordingNavigator::default();
        let mut gate = AuthGate::new("/login");

        assert_eq!(gate.check(None, &nav, 0), GateOutcome::Redirected);
        assert_eq!(gate.check(None, &nav, 0), GateOutcome::Unchanged);
        assert_eq!(gate.check(None, &nav, 0), GateOutcome::Unchanged);

        assert_eq!(nav.count(), 1);
        assert_eq!(
            nav.last(),
            Some(("/login".to_string(), NavigateOptions::replace()))
        );
    }

    #[test]
    fn test_logged_in_user_not_redirected() {
        let nav = RecordingNavigator::default();
        let mut gate = AuthGate::new("/login");
        assert_eq!(gate.check(Some("abc"), &nav, 0), GateOutcome::Allowed);
        assert_eq!(gate.check(Some("abc"), &nav, 0), GateOutcome::Unchanged);
        assert_eq!(nav.count(), 0);
    }

    #[test]
    fn test_logout_triggers_redirect() {
        let nav = RecordingNavigator::default();
        let mut gate = AuthGate::new("/login");
        gate.check(Some("abc"), &nav, 0);
        assert_eq!(gate.check(None, &nav, 0), GateOutcome::Redirected);
        assert_eq!(nav.count(), 1);
    }

    #[test]
    fn test_empty_token_counts_as_anonymous() {
        let nav = RecordingNavigator::default();
        let mut gate = AuthGate::new("/signin");
        assert_eq!(gate.check(Some(""), &nav, 0), GateOutcome::Redirected);
        assert_eq!(nav.paths(), vec!["/signin".to_string()]);
    }

    #[test]
    fn test_new_navigator_reruns_check() {
        let nav = RecordingNavigator::default();
        let mut gate = AuthGate::new("/login");
        gate.check(None, &nav, 0);
        assert_eq!(gate.check(None, &nav, 1), GateOutcome::Redirected);
        assert_eq!(nav.count(), 2);
    }
}
