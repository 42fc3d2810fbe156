//! Gatehouse core library.
//!
//! A session-aware API client:
//! - `auth`: the session holder, written through to durable storage
//! - `storage`: durable key-value backends (file, OS keychain, memory)
//! - `router`: route table, navigation guard and navigator
//! - `api`: HTTP client that injects the bearer token and handles `401`
//! - `config`: build mode, API base URL and storage selection

pub mod api;
pub mod auth;
pub mod config;
pub mod router;
pub mod storage;

pub use api::{ApiClient, ApiError, RequestOptions};
pub use auth::{AuthStore, SessionData};
pub use config::{BuildMode, Config, StorageBackend};
pub use router::{Decision, NavigationError, Navigator, Redirect, Route, RouteTable};
pub use storage::KeyValueStore;
