//! Session credential handling.
//!
//! # Responsibility
//! - Own the stored session token lifecycle (login, probe, purge).
//! - Keep password hashing in one place.
//!
//! # Invariants
//! - The raw password never leaves this layer; only its digest goes on the
//!   wire.
//! - Any credential purge is logged before control returns to the caller.

use crate::repo::cache_repo::{CacheResult, CacheStore};
use crate::repo::keys::SESSION_TOKEN_KEY;
use log::info;

pub mod session_service;

pub use session_service::{hash_password, AuthError, AuthResult, SessionService};

/// Reads the stored session token, if any.
pub fn session_token<C: CacheStore + ?Sized>(cache: &C) -> CacheResult<Option<String>> {
    cache.get(SESSION_TOKEN_KEY)
}

/// Stores a fresh session token.
pub fn store_session_token<C: CacheStore + ?Sized>(cache: &C, token: &str) -> CacheResult<()> {
    cache.set(SESSION_TOKEN_KEY, token)
}

/// Removes the stored session token, forcing re-authentication at the login
/// boundary.
pub fn clear_session_token<C: CacheStore + ?Sized>(cache: &C) -> CacheResult<()> {
    info!("event=session_purge module=auth status=ok");
    cache.remove(SESSION_TOKEN_KEY)
}
