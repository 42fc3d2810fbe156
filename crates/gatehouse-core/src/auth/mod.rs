//! Authentication module for managing the user session.
//!
//! This module provides:
//! - `SessionData`: the token/username pair, present or absent together
//! - `AuthStore`: shared session holder that writes through to durable storage
//!
//! Only `AuthStore::login` and `AuthStore::logout` touch storage.

pub mod session;

pub use session::{AuthStore, SessionData, TOKEN_KEY, USERNAME_KEY};
