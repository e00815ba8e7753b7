//! Remote data service trait and wire payload shapes.
//!
//! # Responsibility
//! - Name the four operations the hosted data service exposes.
//! - Pin the JSON payload field names used on the wire.

use crate::model::module::ModuleId;
use crate::model::record::Record;
use crate::remote::RemoteResult;
use serde::{Deserialize, Serialize};

/// Bearer-authenticated remote data endpoint.
///
/// The sync coordinator only sees this trait, so tests drive it with
/// in-process fakes instead of a live server.
pub trait RemoteDataService {
    /// `GET /module-data/{moduleId}` — full snapshot for one module.
    fn fetch_records(&self, token: &str, module: ModuleId) -> RemoteResult<Vec<Record>>;

    /// `POST /module-data` — pushes locally-dirty records for one module.
    fn push_records(&self, token: &str, module: ModuleId, records: &[Record]) -> RemoteResult<()>;

    /// `GET /dashboard` — token-validity probe, body ignored.
    fn probe_session(&self, token: &str) -> RemoteResult<()>;

    /// `POST /login` — exchanges hashed credentials for a session token.
    fn login(&self, email: &str, hashed_password: &str) -> RemoteResult<String>;
}

impl<R: RemoteDataService + ?Sized> RemoteDataService for &R {
    fn fetch_records(&self, token: &str, module: ModuleId) -> RemoteResult<Vec<Record>> {
        (**self).fetch_records(token, module)
    }

    fn push_records(&self, token: &str, module: ModuleId, records: &[Record]) -> RemoteResult<()> {
        (**self).push_records(token, module, records)
    }

    fn probe_session(&self, token: &str) -> RemoteResult<()> {
        (**self).probe_session(token)
    }

    fn login(&self, email: &str, hashed_password: &str) -> RemoteResult<String> {
        (**self).login(email, hashed_password)
    }
}

/// `GET /module-data/{moduleId}` response body.
#[derive(Debug, Deserialize)]
pub struct ModuleDataResponse {
    /// Missing `data` is treated as an empty snapshot.
    #[serde(default)]
    pub data: Vec<Record>,
}

/// `POST /module-data` request body.
#[derive(Debug, Serialize)]
pub struct PushRequest<'a> {
    #[serde(rename = "moduleId")]
    pub module_id: ModuleId,
    pub data: &'a [Record],
}

/// `POST /login` request body.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    #[serde(rename = "hashedPassword")]
    pub hashed_password: &'a str,
}

/// `POST /login` success response body.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}
