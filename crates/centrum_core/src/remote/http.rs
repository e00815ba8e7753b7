//! Blocking HTTP implementation of the remote data service.
//!
//! # Responsibility
//! - Map trait operations onto the hosted endpoint's routes.
//! - Attach bearer authentication and decode wire payloads.
//!
//! # Invariants
//! - No explicit request timeout; the transport default applies.
//! - Non-success statuses are reported as `RemoteError::Status`, never
//!   interpreted here.

use crate::model::module::ModuleId;
use crate::model::record::Record;
use crate::remote::data_service::{
    LoginRequest, LoginResponse, ModuleDataResponse, PushRequest, RemoteDataService,
};
use crate::remote::{RemoteError, RemoteResult};
use log::debug;
use reqwest::blocking::{Client, Response};

/// Hosted data service endpoint used by the production build.
pub const DEFAULT_BASE_URL: &str = "https://data-server-892925846021.europe-central2.run.app";

/// Remote data service over blocking HTTP.
pub struct HttpDataService {
    client: Client,
    base_url: String,
}

impl HttpDataService {
    /// Creates a client against the given base URL (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Creates a client against the production endpoint.
    pub fn production() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl RemoteDataService for HttpDataService {
    fn fetch_records(&self, token: &str, module: ModuleId) -> RemoteResult<Vec<Record>> {
        let response = self
            .client
            .get(self.url(&format!("/module-data/{module}")))
            .bearer_auth(token)
            .send()
            .map_err(transport)?;
        let response = require_success(response)?;

        let body: ModuleDataResponse = response
            .json()
            .map_err(|err| RemoteError::Decode(err.to_string()))?;
        debug!(
            "event=remote_fetch module=remote status=ok module_id={module} record_count={}",
            body.data.len()
        );
        Ok(body.data)
    }

    fn push_records(&self, token: &str, module: ModuleId, records: &[Record]) -> RemoteResult<()> {
        let response = self
            .client
            .post(self.url("/module-data"))
            .bearer_auth(token)
            .json(&PushRequest {
                module_id: module,
                data: records,
            })
            .send()
            .map_err(transport)?;
        require_success(response)?;

        debug!(
            "event=remote_push module=remote status=ok module_id={module} record_count={}",
            records.len()
        );
        Ok(())
    }

    fn probe_session(&self, token: &str) -> RemoteResult<()> {
        let response = self
            .client
            .get(self.url("/dashboard"))
            .bearer_auth(token)
            .send()
            .map_err(transport)?;
        require_success(response)?;
        Ok(())
    }

    fn login(&self, email: &str, hashed_password: &str) -> RemoteResult<String> {
        let response = self
            .client
            .post(self.url("/login"))
            .json(&LoginRequest {
                email,
                hashed_password,
            })
            .send()
            .map_err(transport)?;
        let response = require_success(response)?;

        let body: LoginResponse = response
            .json()
            .map_err(|err| RemoteError::Decode(err.to_string()))?;
        Ok(body.token)
    }
}

fn transport(err: reqwest::Error) -> RemoteError {
    RemoteError::Transport(err.to_string())
}

fn require_success(response: Response) -> RemoteResult<Response> {
    let status = response.status();
    if !status.is_success() {
        return Err(RemoteError::Status(status.as_u16()));
    }
    Ok(response)
}
