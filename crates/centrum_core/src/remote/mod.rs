//! Remote data service contracts and HTTP implementation.
//!
//! # Responsibility
//! - Define the wire-level API of the hosted data service.
//! - Keep HTTP transport details behind one trait seam.
//!
//! # Invariants
//! - This layer reports raw outcomes; soft-fail vs auth-failure policy
//!   belongs to the sync coordinator.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod data_service;
mod http;

pub use data_service::RemoteDataService;
pub use http::{HttpDataService, DEFAULT_BASE_URL};

pub type RemoteResult<T> = Result<T, RemoteError>;

/// Transport-level error for remote service calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// Non-success HTTP status.
    Status(u16),
    /// Network or connection failure before a status was received.
    Transport(String),
    /// Response body did not match the expected shape.
    Decode(String),
}

impl RemoteError {
    /// Returns the HTTP status when the error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status(status) => Some(*status),
            _ => None,
        }
    }
}

impl Display for RemoteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Status(status) => write!(f, "remote service returned status {status}"),
            Self::Transport(message) => write!(f, "remote transport failure: {message}"),
            Self::Decode(message) => write!(f, "remote response decode failure: {message}"),
        }
    }
}

impl Error for RemoteError {}
