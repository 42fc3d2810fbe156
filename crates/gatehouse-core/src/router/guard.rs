use super::routes::{Route, LOGIN, QUERY};

/// Outcome of a guard check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Proceed,
    /// Abandon this navigation and start one to the named route
    Redirect(&'static str),
}

/// Decide whether a navigation to `target` may commit.
///
/// Protected routes send anonymous users to the login route; the login route
/// sends authenticated users on to the query route. Everything else proceeds.
pub fn decide(target: &Route, authenticated: bool) -> Decision {
    if target.requires_auth() && !authenticated {
        Decision::Redirect(LOGIN)
    } else if target.name == LOGIN && authenticated {
        Decision::Redirect(QUERY)
    } else {
        Decision::Proceed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::routes::RouteTable;

    fn route(name: &str) -> Route {
        RouteTable::default().by_name(name).unwrap().clone()
    }

    #[test]
    fn test_protected_route_anonymous_redirects_to_login() {
        assert_eq!(decide(&route(QUERY), false), Decision::Redirect(LOGIN));
    }

    #[test]
    fn test_protected_route_authenticated_proceeds() {
        assert_eq!(decide(&route(QUERY), true), Decision::Proceed);
    }

    #[test]
    fn test_login_route_authenticated_redirects_to_query() {
        assert_eq!(decide(&route(LOGIN), true), Decision::Redirect(QUERY));
    }

    #[test]
    fn test_login_route_anonymous_proceeds() {
        assert_eq!(decide(&route(LOGIN), false), Decision::Proceed);
    }

    #[test]
    fn test_public_routes_proceed_regardless_of_auth() {
        let about = route("about");
        assert_eq!(decide(&about, false), Decision::Proceed);
        assert_eq!(decide(&about, true), Decision::Proceed);

        // No declared access requirement
        let unset = Route::new("/help", "help");
        assert_eq!(decide(&unset, false), Decision::Proceed);
        assert_eq!(decide(&unset, true), Decision::Proceed);
    }
}
