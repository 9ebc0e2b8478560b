//! Blocking HTTP client for the subject API.
//!
//! # Responsibility
//! - Implement [`SubjectStore`] over `/api/subjects` so a tree editor can
//!   run against a remote server instead of the database file.
//! - Map response statuses back into the store error taxonomy.
//!
//! # Invariants
//! - One request per store call; nothing is cached client-side.
//! - 400 → `Validation`, 404 on an id route → `NotFound`, anything else
//!   that is not a success → `Remote`.

use log::warn;
use notebook_core::{
    StoreError, StoreResult, Subject, SubjectId, SubjectInput, SubjectStore,
    SubjectValidationError,
};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    error: Option<String>,
}

/// Subject store backed by a running notebook server.
pub struct HttpSubjectStore {
    client: Client,
    subjects_url: String,
}

impl HttpSubjectStore {
    /// Creates a client for the server at `base_url` (e.g. `http://localhost:5000`).
    pub fn new(base_url: &str) -> StoreResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(remote)?;
        Ok(Self {
            client,
            subjects_url: format!("{}/api/subjects", base_url.trim_end_matches('/')),
        })
    }

    fn subject_url(&self, id: SubjectId) -> String {
        format!("{}/{id}", self.subjects_url)
    }

    fn send<T: DeserializeOwned>(
        &self,
        action: &str,
        request: RequestBuilder,
        id: Option<SubjectId>,
    ) -> StoreResult<T> {
        let response = request.send().map_err(|err| {
            warn!("event=remote_call module=client status=error action={action} error={err}");
            remote(err)
        })?;

        let status = response.status();
        if status.is_success() {
            return response.json::<T>().map_err(remote);
        }

        let body: ErrorBody = response.json().unwrap_or_default();
        warn!(
            "event=remote_call module=client status=error action={action} http_status={}",
            status.as_u16()
        );
        Err(status_error(status, body, id))
    }
}

impl SubjectStore for HttpSubjectStore {
    fn list_subjects(&self) -> StoreResult<Vec<Subject>> {
        self.send("list", self.client.get(&self.subjects_url), None)
    }

    fn create_subject(&self, input: SubjectInput) -> StoreResult<Subject> {
        self.send("create", self.client.post(&self.subjects_url).json(&input), None)
    }

    fn replace_subject(&self, id: SubjectId, input: SubjectInput) -> StoreResult<Subject> {
        let request = self.client.put(self.subject_url(id)).json(&input);
        self.send("replace", request, Some(id))
    }

    fn delete_subject(&self, id: SubjectId) -> StoreResult<()> {
        let request = self.client.delete(self.subject_url(id));
        self.send::<serde_json::Value>("delete", request, Some(id))?;
        Ok(())
    }
}

fn status_error(status: StatusCode, body: ErrorBody, id: Option<SubjectId>) -> StoreError {
    match (status, id) {
        (StatusCode::BAD_REQUEST, _) => {
            let detail = body.error.unwrap_or(body.message);
            StoreError::Validation(SubjectValidationError::Malformed(detail))
        }
        (StatusCode::NOT_FOUND, Some(id)) => StoreError::NotFound(id),
        _ if body.message.is_empty() => StoreError::Remote(format!("server answered {status}")),
        _ => StoreError::Remote(format!("server answered {status}: {}", body.message)),
    }
}

fn remote(err: reqwest::Error) -> StoreError {
    StoreError::Remote(err.to_string())
}
