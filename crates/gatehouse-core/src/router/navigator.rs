use std::sync::{Mutex, PoisonError};

use thiserror::Error;
use tracing::{debug, warn};

use super::guard::{decide, Decision};
use super::routes::{Route, RouteTable};
use super::Redirect;
use crate::auth::AuthStore;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("No route matches: {0}")]
    NotFound(String),

    #[error("Redirect loop while navigating to: {0}")]
    RedirectLoop(String),
}

/// Holds the current location and runs the guard on every navigation.
pub struct Navigator {
    routes: RouteTable,
    auth: AuthStore,
    current: Mutex<Option<Route>>,
}

impl Navigator {
    pub fn new(routes: RouteTable, auth: AuthStore) -> Self {
        Self {
            routes,
            auth,
            current: Mutex::new(None),
        }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Route of the last committed navigation
    pub fn current(&self) -> Option<Route> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Navigate to a path, following guard redirects. Returns the committed route.
    pub fn push(&self, path: &str) -> Result<Route, NavigationError> {
        let target = self
            .routes
            .by_path(path)
            .ok_or_else(|| NavigationError::NotFound(path.to_string()))?;
        self.navigate(target, path)
    }

    /// Navigate to a named route, following guard redirects.
    pub fn push_named(&self, name: &str) -> Result<Route, NavigationError> {
        let target = self
            .routes
            .by_name(name)
            .ok_or_else(|| NavigationError::NotFound(name.to_string()))?;
        self.navigate(target, name)
    }

    fn navigate<'a>(
        &'a self,
        mut target: &'a Route,
        requested: &str,
    ) -> Result<Route, NavigationError> {
        // Each redirect is a fresh navigation and gets guarded again; a chain
        // longer than the table must revisit a route.
        for _ in 0..=self.routes.len() {
            match decide(target, self.auth.is_authenticated()) {
                Decision::Proceed => {
                    debug!(from = requested, to = %target.path, "Navigation committed");
                    let committed = target.clone();
                    *self.current.lock().unwrap_or_else(PoisonError::into_inner) =
                        Some(committed.clone());
                    return Ok(committed);
                }
                Decision::Redirect(name) => {
                    debug!(from = %target.name, to = name, "Guard redirect");
                    target = self
                        .routes
                        .by_name(name)
                        .ok_or_else(|| NavigationError::NotFound(name.to_string()))?;
                }
            }
        }
        Err(NavigationError::RedirectLoop(requested.to_string()))
    }
}

impl Redirect for Navigator {
    fn redirect(&self, path: &str) {
        if let Err(e) = self.push(path) {
            warn!(path, error = %e, "Redirect failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::router::routes::{ABOUT, LOGIN, QUERY};
    use crate::storage::MemoryStore;

    fn navigator() -> (AuthStore, Navigator) {
        let auth = AuthStore::new(Arc::new(MemoryStore::new()));
        let nav = Navigator::new(RouteTable::default(), auth.clone());
        (auth, nav)
    }

    #[test]
    fn test_anonymous_protected_redirects_to_login() {
        let (_, nav) = navigator();
        let route = nav.push("/query").unwrap();
        assert_eq!(route.name, LOGIN);
        assert_eq!(nav.current().unwrap().path, "/");
    }

    #[test]
    fn test_authenticated_login_redirects_to_query() {
        let (auth, nav) = navigator();
        auth.login("tok-1", "alice");
        assert_eq!(nav.push("/").unwrap().name, QUERY);
        assert_eq!(nav.push_named(LOGIN).unwrap().name, QUERY);
    }

    #[test]
    fn test_public_route_commits() {
        let (auth, nav) = navigator();
        assert_eq!(nav.push("/about").unwrap().name, ABOUT);
        auth.login("tok-1", "alice");
        assert_eq!(nav.push("/about").unwrap().name, ABOUT);
    }

    #[test]
    fn test_unknown_path_is_not_found() {
        let (_, nav) = navigator();
        assert_eq!(
            nav.push("/nowhere"),
            Err(NavigationError::NotFound("/nowhere".to_string()))
        );
        assert!(nav.current().is_none());
    }

    #[test]
    fn test_redirect_loop_is_detected() {
        // Login route that requires auth: anonymous users bounce to itself forever
        let auth = AuthStore::new(Arc::new(MemoryStore::new()));
        let table = RouteTable::new(vec![Route::protected("/", LOGIN)]);
        let nav = Navigator::new(table, auth);
        assert!(matches!(nav.push("/"), Err(NavigationError::RedirectLoop(_))));
    }

    #[test]
    fn test_redirect_capability_navigates() {
        let (auth, nav) = navigator();
        auth.login("tok-1", "alice");
        nav.push("/query").unwrap();

        auth.logout();
        nav.redirect("/");
        assert_eq!(nav.current().unwrap().name, LOGIN);

        // Failed redirects leave the location alone
        nav.redirect("/nowhere");
        assert_eq!(nav.current().unwrap().name, LOGIN);
    }
}
