//! Login, token probe and logout use-cases.
//!
//! # Responsibility
//! - Exchange credentials for a session token and persist it.
//! - Validate the stored token against the dashboard probe route.
//!
//! # Invariants
//! - A failed probe always purges the stored token.
//! - Passwords are hashed with SHA-256 and hex-encoded before transport.

use crate::auth::{clear_session_token, session_token, store_session_token};
use crate::remote::{RemoteDataService, RemoteError};
use crate::repo::cache_repo::{CacheError, CacheStore};
use log::{info, warn};
use sha2::{Digest, Sha256};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type AuthResult<T> = Result<T, AuthError>;

/// Authentication use-case error.
#[derive(Debug)]
pub enum AuthError {
    Cache(CacheError),
    Remote(RemoteError),
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cache(err) => write!(f, "{err}"),
            Self::Remote(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AuthError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Cache(err) => Some(err),
            Self::Remote(err) => Some(err),
        }
    }
}

impl From<CacheError> for AuthError {
    fn from(value: CacheError) -> Self {
        Self::Cache(value)
    }
}

impl From<RemoteError> for AuthError {
    fn from(value: RemoteError) -> Self {
        Self::Remote(value)
    }
}

/// Returns the hex-encoded SHA-256 digest the login route expects.
pub fn hash_password(raw_password: &str) -> String {
    let digest = Sha256::digest(raw_password.as_bytes());
    hex::encode(digest)
}

/// Session use-cases over one cache and one remote service.
pub struct SessionService<C: CacheStore, R: RemoteDataService> {
    cache: C,
    remote: R,
}

impl<C: CacheStore, R: RemoteDataService> SessionService<C, R> {
    pub fn new(cache: C, remote: R) -> Self {
        Self { cache, remote }
    }

    /// Logs in with raw credentials and persists the returned token.
    ///
    /// # Errors
    /// - `AuthError::Remote` when the login route rejects the credentials or
    ///   the transport fails; nothing is stored in that case.
    pub fn login(&self, email: &str, raw_password: &str) -> AuthResult<()> {
        let hashed = hash_password(raw_password);
        let token = self.remote.login(email, &hashed)?;
        store_session_token(&self.cache, &token)?;
        info!("event=login module=auth status=ok");
        Ok(())
    }

    /// Validates the stored token against the dashboard probe.
    ///
    /// Returns `false` (after purging the token) when the token is missing or
    /// the probe fails for any reason; transport errors also count as an
    /// invalid session here, matching the strict probe behavior of the UI
    /// boot path.
    pub fn probe(&self) -> AuthResult<bool> {
        let Some(token) = session_token(&self.cache)? else {
            return Ok(false);
        };

        match self.remote.probe_session(&token) {
            Ok(()) => Ok(true),
            Err(err) => {
                warn!("event=session_probe module=auth status=invalid error={err}");
                clear_session_token(&self.cache)?;
                Ok(false)
            }
        }
    }

    /// Purges the stored token.
    pub fn logout(&self) -> AuthResult<()> {
        clear_session_token(&self.cache)?;
        Ok(())
    }

    /// Returns the stored token, if any.
    pub fn token(&self) -> AuthResult<Option<String>> {
        Ok(session_token(&self.cache)?)
    }
}
