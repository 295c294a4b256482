//! Import API HTTP client (reqwest-based).
//!
//! Drives the push sequence against the remote service: authenticate on
//! `/auth/login`, upload the CSV payload to `/intgs/import/files`, then
//! register the import job on `/intgs/import/jobs`. The stages run strictly
//! in order; any failure aborts the push and the session is discarded.

use std::time::Duration;

use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::{multipart, Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info};

use dirx_export::{apply_overrides, OverrideOptions};

use crate::error::{PushError, PushResult};
use crate::session::PushSession;

/// Fixed filename for the uploaded CSV payload.
const IMPORT_FILE_NAME: &str = "import.csv";

/// Options for one push operation.
#[derive(Debug, Clone)]
pub struct PushOptions {
    /// Import API account email.
    pub email: String,
    /// Import API account password.
    pub password: String,
    /// Server-side resource the import job targets.
    pub resource: String,
    /// Column names announced to the import job.
    pub columns: Vec<String>,
    /// Attribute update mode for the import job.
    pub attributes_update_mode: String,
    /// Unmatched-record handling for the import job.
    pub remove_unmatched_mode: String,
    /// Field overrides applied to the payload before upload.
    pub override_map: Option<serde_json::Map<String, Value>>,
    /// Attributes the override map is allowed to touch.
    pub attributes: Vec<String>,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    /// Server-assigned identifier of the uploaded file, echoed back verbatim
    /// when the job is created.
    id: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImportJobRequest<'a> {
    file_id: &'a Value,
    resource: &'a str,
    columns: &'a [String],
    options: ImportJobOptions<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImportJobOptions<'a> {
    attributes_update_mode: &'a str,
    remove_unmatched_mode: &'a str,
}

/// HTTP client for the import API.
///
/// Wraps `reqwest::Client` with the three push endpoints and the
/// status-driven error classification each stage requires.
#[derive(Debug, Clone)]
pub struct PushClient {
    /// Base URL of the import service (e.g. "<https://acme.example.com>").
    base_url: String,
    /// Underlying HTTP client.
    http_client: Client,
}

impl PushClient {
    /// Create a new push client with the given request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> PushResult<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("dirx/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_http_client(base_url, http_client))
    }

    /// Create a client with a pre-built `reqwest::Client` (for testing).
    #[must_use]
    pub fn with_http_client(base_url: impl Into<String>, http_client: Client) -> Self {
        // Normalize base URL: strip trailing slash.
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http_client,
        }
    }

    /// Get the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Push CSV `data` to the import service.
    ///
    /// Runs authenticate → override → upload → create-job, strictly in
    /// order, with no retries. Resolves only once the import job exists.
    pub async fn push(&self, data: &str, options: &PushOptions) -> PushResult<()> {
        info!("Starting data push");

        let session = self.authenticate(options).await?;
        info!("Authentication completed");

        let payload = apply_overrides(
            data,
            &OverrideOptions {
                override_map: options.override_map.clone(),
                attributes: options.attributes.clone(),
            },
        )?;

        info!("Uploading file");
        let file_id = self.upload(&session, payload).await?;
        info!("File uploaded");

        info!("Creating import job");
        self.create_job(&session, &file_id, options).await?;
        info!("Import job created");

        info!("Data push completed");
        Ok(())
    }

    /// Authenticate and extract the session token from the login response.
    async fn authenticate(&self, options: &PushOptions) -> PushResult<PushSession> {
        debug!("Authenticating on API");

        let url = format!("{}/auth/login", self.base_url);
        let response = self
            .http_client
            .post(&url)
            .json(&LoginRequest {
                email: &options.email,
                password: &options.password,
            })
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::UNPROCESSABLE_ENTITY {
            return Err(PushError::Authentication(
                "incorrect email/password".to_string(),
            ));
        }
        if !status.is_success() {
            return Err(api_error(response).await);
        }

        let Some(header) = response.headers().get(SET_COOKIE) else {
            return Err(PushError::Authentication(
                "missing session cookie in response headers".to_string(),
            ));
        };
        let header = header.to_str().map_err(|_| {
            PushError::Authentication("missing session cookie in response headers".to_string())
        })?;

        PushSession::from_set_cookie(header)
    }

    /// Upload the CSV payload as multipart form data; returns the file id.
    async fn upload(&self, session: &PushSession, payload: String) -> PushResult<Value> {
        let url = format!("{}/intgs/import/files", self.base_url);
        let part = multipart::Part::text(payload)
            .file_name(IMPORT_FILE_NAME)
            .mime_str("text/csv")?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .http_client
            .post(&url)
            .header(COOKIE, session.cookie_header())
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let body: UploadResponse = response.json().await?;
        Ok(body.id)
    }

    /// Register the import job for a previously uploaded file.
    async fn create_job(
        &self,
        session: &PushSession,
        file_id: &Value,
        options: &PushOptions,
    ) -> PushResult<()> {
        let url = format!("{}/intgs/import/jobs", self.base_url);
        let request = ImportJobRequest {
            file_id,
            resource: &options.resource,
            columns: &options.columns,
            options: ImportJobOptions {
                attributes_update_mode: &options.attributes_update_mode,
                remove_unmatched_mode: &options.remove_unmatched_mode,
            },
        };

        let response = self
            .http_client
            .post(&url)
            .header(COOKIE, session.cookie_header())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<no body>".to_string());

        // A structured server body is surfaced to the log before the error
        // is wrapped; anything else propagates unwrapped.
        if let Ok(err_body) = serde_json::from_str::<Value>(&body) {
            error!(err = %err_body, "Error creating import job");
            return Err(PushError::JobCreation(Box::new(PushError::Api {
                status: status.as_u16(),
                body,
            })));
        }

        Err(PushError::Api {
            status: status.as_u16(),
            body,
        })
    }
}

/// Turn a non-success HTTP response into the pass-through API error.
async fn api_error(response: reqwest::Response) -> PushError {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<no body>".to_string());
    PushError::Api {
        status: status.as_u16(),
        body,
    }
}
