//! Route table, navigation guard and navigator.
//!
//! The guard is a pure function over the target route and the current
//! authentication flag. The `Navigator` owns the current location, runs the
//! guard on every navigation and follows its redirects.

pub mod guard;
pub mod navigator;
pub mod routes;

pub use guard::{decide, Decision};
pub use navigator::{NavigationError, Navigator};
pub use routes::{Access, Route, RouteTable, ABOUT, LOGIN, QUERY, ROOT_PATH};

/// Capability to force a navigation from outside the router, e.g. when the
/// API client finds the session has expired.
pub trait Redirect: Send + Sync {
    fn redirect(&self, path: &str);
}
