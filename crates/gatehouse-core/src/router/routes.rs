use serde::{Deserialize, Serialize};

/// Name of the login route (also the entry route)
pub const LOGIN: &str = "login";

/// Name of the default post-login route
pub const QUERY: &str = "query";

/// Name of the about route
pub const ABOUT: &str = "about";

/// Path of the entry route
pub const ROOT_PATH: &str = "/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    #[default]
    Public,
    RequiresAuth,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub path: String,
    pub name: String,
    #[serde(default)]
    pub access: Access,
}

impl Route {
    /// Public route
    pub fn new(path: &str, name: &str) -> Self {
        Self {
            path: path.to_string(),
            name: name.to_string(),
            access: Access::Public,
        }
    }

    /// Route that requires an authenticated session
    pub fn protected(path: &str, name: &str) -> Self {
        Self {
            access: Access::RequiresAuth,
            ..Self::new(path, name)
        }
    }

    pub fn requires_auth(&self) -> bool {
        self.access == Access::RequiresAuth
    }
}

/// Static set of routes, built once at startup.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    pub fn by_path(&self, path: &str) -> Option<&Route> {
        let path = normalize_path(path);
        self.routes.iter().find(|r| r.path == path)
    }

    pub fn by_name(&self, name: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.name == name)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new(vec![
            Route::new(ROOT_PATH, LOGIN),
            Route::protected("/query", QUERY),
            Route::new("/about", ABOUT),
        ])
    }
}

/// Strip query string, fragment and trailing slash (except for the root).
fn normalize_path(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        ROOT_PATH
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let table = RouteTable::default();
        assert_eq!(table.len(), 3);

        let login = table.by_name(LOGIN).unwrap();
        assert_eq!(login.path, "/");
        assert!(!login.requires_auth());

        let query = table.by_path("/query").unwrap();
        assert_eq!(query.name, QUERY);
        assert!(query.requires_auth());

        assert!(!table.by_name(ABOUT).unwrap().requires_auth());
    }

    #[test]
    fn test_by_path_normalizes() {
        let table = RouteTable::default();
        assert_eq!(table.by_path("/query/").unwrap().name, QUERY);
        assert_eq!(table.by_path("/query?q=1").unwrap().name, QUERY);
        assert_eq!(table.by_path("/about#top").unwrap().name, ABOUT);
        assert_eq!(table.by_path("").unwrap().name, LOGIN);
        assert!(table.by_path("/missing").is_none());
    }

    #[test]
    fn test_access_defaults_to_public() {
        let route: Route = serde_json::from_str(r#"{"path": "/help", "name": "help"}"#)
            .expect("Failed to parse route test JSON");
        assert_eq!(route.access, Access::Public);

        let route: Route =
            serde_json::from_str(r#"{"path": "/q", "name": "q", "access": "requires_auth"}"#)
                .expect("Failed to parse route test JSON");
        assert!(route.requires_auth());
    }
}
