//! HTTP client for the SysAid REST API.
//!
//! This module provides the `SysaidClient` struct, which owns the
//! credentials, the cached session cookies, and the HTTP transport.
//!
//! # Session Lifecycle
//!
//! SysAid permits only two logins per five-minute window per account, so
//! the session cookies returned by the login endpoint are persisted to a
//! per-username file and reused across constructions. Construction logs
//! in only when no usable cookie file exists. When the remote rejects the
//! session mid-flight (HTTP 401), the client re-logs-in once, persists the
//! fresh cookies, and retries the original request once; a second failure
//! surfaces to the caller.
//!
//! # Security
//!
//! The password is never logged. Error messages built from response
//! bodies are sanitized before being surfaced.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{header, Client, Method, Response, StatusCode};
use tokio::sync::Mutex;

use crate::config::Config;
use crate::endpoints::Endpoint;
use crate::error::SysaidError;
use crate::models::{
    CreateSrOptions, ListParams, MessageOptions, ServiceRequest, SrActivity, SrField, SrMessage,
};
use crate::session::SessionStore;

/// Client for an authenticated SysAid session.
///
/// Cloning is cheap: clones share the HTTP connection pool and the
/// session state, so a re-login performed through one clone is visible
/// to all of them.
///
/// # Example
///
/// ```ignore
/// let config = Config::from_env()?;
/// let client = SysaidClient::connect(config).await?;
///
/// let sr = client.get_sr(42).await?;
/// ```
#[derive(Clone, Debug)]
pub struct SysaidClient {
    /// The underlying HTTP client.
    http: Client,

    /// Environment-scoped base URL, always ending in `/api/v1/`.
    base_url: String,

    /// Account username.
    username: String,

    /// Account password, kept for the single transparent re-login.
    /// SECURITY: Never log this value!
    password: String,

    /// Configured request timeout, used to classify transport errors.
    timeout: Duration,

    /// Session cookies plus their on-disk cache. The mutex serializes
    /// re-logins and cookie-file writes across clones and tasks.
    session: Arc<Mutex<SessionStore>>,
}

impl SysaidClient {
    /// Connects to SysAid, reusing a persisted session when possible.
    ///
    /// If the per-username cookie file exists and parses, no login call
    /// is made. Otherwise exactly one login is attempted and its cookies
    /// are written through to disk.
    ///
    /// # Errors
    ///
    /// - `SysaidError::Authentication` if the login is rejected (bad
    ///   credentials, unknown environment, or the login rate limit).
    ///   This is terminal: the client never retries a login on its own,
    ///   since blind retries risk locking the account out.
    /// - `SysaidError::Transport` / `SysaidError::Timeout` for network
    ///   failures.
    /// - `SysaidError::SessionStore` if the cookie file cannot be read
    ///   or written.
    pub async fn connect(config: Config) -> Result<Self, SysaidError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(SysaidError::HttpClient)?;

        let mut store = SessionStore::open(config.cookie_path())?;

        if store.has_session() {
            tracing::debug!(
                path = %store.path().display(),
                "Reusing persisted session cookies"
            );
        } else {
            Self::login_with(
                &http,
                &config.base_url,
                &config.username,
                config.password(),
                config.timeout,
                &mut store,
            )
            .await?;
        }

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            username: config.username.clone(),
            password: config.password().to_string(),
            timeout: config.timeout,
            session: Arc::new(Mutex::new(store)),
        })
    }

    /// Performs the login call and writes the returned cookies through.
    async fn login_with(
        http: &Client,
        base_url: &str,
        username: &str,
        password: &str,
        timeout: Duration,
        store: &mut SessionStore,
    ) -> Result<(), SysaidError> {
        let url = format!("{}{}", base_url, Endpoint::Login.path());
        // The password travels URL-encoded inside the JSON payload; the
        // server decodes it after parsing.
        let payload = serde_json::json!({
            "user_name": username,
            "password": urlencoding::encode(password).into_owned(),
        });

        tracing::info!(username, "Logging in to SysAid");

        let response = http
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(payload.to_string())
            .send()
            .await
            .map_err(|e| Self::classify_send_error(e, timeout, "POST login"))?;

        let status = response.status();
        if status.is_success() {
            let cookies = parse_set_cookie(
                response
                    .headers()
                    .get_all(header::SET_COOKIE)
                    .iter()
                    .filter_map(|v| v.to_str().ok()),
            );
            if cookies.is_empty() {
                return Err(SysaidError::authentication(
                    "login succeeded but the response carried no session cookies",
                ));
            }
            store.replace(cookies)?;
            tracing::debug!(path = %store.path().display(), "Session cookies persisted");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        let body = SysaidError::truncate_body(&SysaidError::sanitize_message(&body, password));

        match status {
            StatusCode::TOO_MANY_REQUESTS => Err(SysaidError::authentication(
                "login rate limit exceeded (two attempts per five minutes per account); \
                 wait before retrying",
            )),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(SysaidError::authentication(
                format!("login rejected (HTTP {}): check username and password", status),
            )),
            _ => Err(SysaidError::authentication(format!(
                "login failed (HTTP {}): {}",
                status, body
            ))),
        }
    }

    /// Re-logs-in under the session lock.
    async fn relogin(&self, store: &mut SessionStore) -> Result<(), SysaidError> {
        Self::login_with(
            &self.http,
            &self.base_url,
            &self.username,
            &self.password,
            self.timeout,
            store,
        )
        .await
    }

    /// Issues a request with a caller-chosen verb against any endpoint.
    ///
    /// This is the generic escape hatch for endpoints without a
    /// convenience wrapper. The session cookies and a JSON content type
    /// are the only headers added.
    ///
    /// If the remote rejects the session (HTTP 401), one transparent
    /// re-login is performed and the request is retried once. Any failure
    /// of the retried request surfaces as `SysaidError::Remote`; a failed
    /// re-login surfaces as `SysaidError::Authentication`.
    ///
    /// # Arguments
    ///
    /// * `method` - HTTP verb
    /// * `endpoint` - Path relative to the `/api/v1/` base (e.g., `sr/1`)
    /// * `query` - Optional query pairs
    /// * `body` - Optional JSON body
    ///
    /// # Returns
    ///
    /// The decoded JSON response body on 2xx. A success body that is not
    /// valid JSON is returned as a JSON string.
    pub async fn make_request(
        &self,
        method: Method,
        endpoint: &str,
        query: Option<&[(String, String)]>,
        body: Option<&serde_json::Value>,
    ) -> Result<serde_json::Value, SysaidError> {
        let mut session = self.session.lock().await;

        let response = self
            .send(&session, method.clone(), endpoint, query, body)
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::info!(endpoint, "Session rejected by server, re-authenticating");
            self.relogin(&mut session).await?;
            let response = self.send(&session, method, endpoint, query, body).await?;
            return self.read_body(response).await;
        }

        self.read_body(response).await
    }

    /// Dispatches a table endpoint with its fixed verb and path.
    async fn dispatch(
        &self,
        endpoint: &Endpoint,
        query: Option<&[(String, String)]>,
        body: Option<&serde_json::Value>,
    ) -> Result<serde_json::Value, SysaidError> {
        self.make_request(endpoint.method(), &endpoint.path(), query, body)
            .await
    }

    /// Sends a single request with the current session attached.
    async fn send(
        &self,
        session: &SessionStore,
        method: Method,
        endpoint: &str,
        query: Option<&[(String, String)]>,
        body: Option<&serde_json::Value>,
    ) -> Result<Response, SysaidError> {
        let url = format!("{}{}", self.base_url, endpoint);

        tracing::debug!(method = %method, endpoint, "Dispatching SysAid API request");

        let mut req = self
            .http
            .request(method.clone(), &url)
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(cookie) = session.cookie_header() {
            req = req.header(header::COOKIE, cookie);
        }
        if let Some(query) = query {
            if !query.is_empty() {
                req = req.query(query);
            }
        }
        if let Some(body) = body {
            req = req.body(body.to_string());
        }

        req.send()
            .await
            .map_err(|e| Self::classify_send_error(e, self.timeout, format!("{} {}", method, endpoint)))
    }

    /// Decodes a response body, mapping non-success statuses to `Remote`.
    async fn read_body(&self, response: Response) -> Result<serde_json::Value, SysaidError> {
        let status = response.status();
        let body = response.text().await.map_err(SysaidError::Transport)?;

        if status.is_success() {
            // Some endpoints answer with plain text; surface it unchanged.
            match serde_json::from_str(&body) {
                Ok(value) => Ok(value),
                Err(_) => Ok(serde_json::Value::String(body)),
            }
        } else {
            let body = SysaidError::sanitize_message(&body, &self.password);
            Err(SysaidError::remote(status, &body))
        }
    }

    /// Classifies a reqwest send error into the crate taxonomy.
    fn classify_send_error(
        error: reqwest::Error,
        timeout: Duration,
        operation: impl Into<String>,
    ) -> SysaidError {
        if error.is_timeout() {
            SysaidError::timeout(timeout, operation)
        } else {
            SysaidError::Transport(error)
        }
    }

    // ========================================================================
    // Service request operations
    // ========================================================================

    /// Fetches a single service request by id.
    ///
    /// The remote answers with a one-element list; `None` is returned if
    /// the list is empty.
    pub async fn get_sr(&self, id: u64) -> Result<Option<ServiceRequest>, SysaidError> {
        let value = self.dispatch(&Endpoint::GetSr(id), None, None).await?;
        let mut list = decode_sr_list(value)?;
        if list.is_empty() {
            Ok(None)
        } else {
            Ok(Some(list.remove(0)))
        }
    }

    /// Lists service requests.
    pub async fn get_sr_list(&self, params: &ListParams) -> Result<Vec<ServiceRequest>, SysaidError> {
        let query = params.to_query();
        let value = self.dispatch(&Endpoint::ListSrs, Some(&query), None).await?;
        decode_sr_list(value)
    }

    /// Searches service requests by free text.
    pub async fn search_srs(
        &self,
        query_text: &str,
        params: &ListParams,
    ) -> Result<Vec<ServiceRequest>, SysaidError> {
        let mut query = vec![("query".to_string(), query_text.to_string())];
        query.extend(params.to_query());
        let value = self
            .dispatch(&Endpoint::SearchSrs, Some(&query), None)
            .await?;
        decode_sr_list(value)
    }

    /// Counts service requests matching the given parameters.
    pub async fn count_srs(&self, params: &ListParams) -> Result<serde_json::Value, SysaidError> {
        let query = params.to_query();
        self.dispatch(&Endpoint::CountSrs, Some(&query), None).await
    }

    /// Updates fields of a service request.
    ///
    /// The field map is sent verbatim as the request body, e.g.
    /// `{"sr_status": "Open"}`, and the decoded response body is returned
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns `SysaidError::Validation` if `fields` is not a JSON object.
    pub async fn update_sr(
        &self,
        id: u64,
        fields: serde_json::Value,
    ) -> Result<serde_json::Value, SysaidError> {
        if !fields.is_object() {
            return Err(SysaidError::validation(
                "fields must be a JSON object mapping field keys to values",
            ));
        }
        self.dispatch(&Endpoint::UpdateSr(id), None, Some(&fields))
            .await
    }

    /// Closes a service request with a solution text.
    pub async fn close_sr(&self, id: u64, solution: &str) -> Result<serde_json::Value, SysaidError> {
        if solution.trim().is_empty() {
            return Err(SysaidError::validation("solution must not be empty"));
        }
        let body = serde_json::json!({ "solution": solution });
        self.dispatch(&Endpoint::CloseSr(id), None, Some(&body)).await
    }

    /// Creates a service request from a list of field entries.
    ///
    /// # Errors
    ///
    /// Returns `SysaidError::Validation` if `info` is empty, a field key
    /// is empty, a `due_date` value is not an epoch-milliseconds number,
    /// or a `notes` value is not an object carrying an integer
    /// `createDate`.
    pub async fn create_sr(
        &self,
        info: &[SrField],
        options: &CreateSrOptions,
    ) -> Result<ServiceRequest, SysaidError> {
        validate_create_info(info)?;

        let query = options.to_query();
        let body = serde_json::to_value(info)?;
        let value = self
            .dispatch(&Endpoint::CreateSr, Some(&query), Some(&body))
            .await?;
        serde_json::from_value(value).map_err(SysaidError::from)
    }

    /// Deletes the service requests with the given ids.
    pub async fn delete_srs(&self, ids: &[u64]) -> Result<serde_json::Value, SysaidError> {
        if ids.is_empty() {
            return Err(SysaidError::validation("ids must not be empty"));
        }
        let joined = ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let query = vec![("ids".to_string(), joined)];
        self.dispatch(&Endpoint::DeleteSrs, Some(&query), None).await
    }

    /// Fetches a service request template.
    pub async fn get_sr_template(
        &self,
        options: &CreateSrOptions,
    ) -> Result<serde_json::Value, SysaidError> {
        let query = options.to_query();
        self.dispatch(&Endpoint::SrTemplate, Some(&query), None).await
    }

    /// Attaches a named link to a service request.
    pub async fn add_sr_link(
        &self,
        id: u64,
        name: &str,
        link: &str,
    ) -> Result<serde_json::Value, SysaidError> {
        let body = serde_json::json!({ "name": name, "link": link });
        self.dispatch(&Endpoint::AddSrLink(id), None, Some(&body))
            .await
    }

    /// Removes a named link from a service request.
    pub async fn delete_sr_link(
        &self,
        id: u64,
        name: &str,
    ) -> Result<serde_json::Value, SysaidError> {
        let body = serde_json::json!({ "name": name });
        self.dispatch(&Endpoint::DeleteSrLink(id), None, Some(&body))
            .await
    }

    /// Uploads a file attachment to a service request.
    ///
    /// Attachments travel as a multipart form with a single `file` part,
    /// unlike every other endpoint's JSON body.
    pub async fn add_sr_attachment(
        &self,
        id: u64,
        file_name: &str,
        data: Vec<u8>,
    ) -> Result<serde_json::Value, SysaidError> {
        let endpoint = Endpoint::AddSrAttachment(id);
        let mut session = self.session.lock().await;

        let response = self
            .send_multipart(&session, &endpoint, file_name, data.clone())
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::info!("Session rejected by server, re-authenticating");
            self.relogin(&mut session).await?;
            let response = self
                .send_multipart(&session, &endpoint, file_name, data)
                .await?;
            return self.read_body(response).await;
        }

        self.read_body(response).await
    }

    /// Sends a multipart upload with the current session attached.
    async fn send_multipart(
        &self,
        session: &SessionStore,
        endpoint: &Endpoint,
        file_name: &str,
        data: Vec<u8>,
    ) -> Result<Response, SysaidError> {
        let url = format!("{}{}", self.base_url, endpoint.path());
        let part = reqwest::multipart::Part::bytes(data).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);

        tracing::debug!(endpoint = %endpoint.path(), file_name, "Uploading attachment");

        let mut req = self.http.request(endpoint.method(), &url).multipart(form);
        if let Some(cookie) = session.cookie_header() {
            req = req.header(header::COOKIE, cookie);
        }

        req.send().await.map_err(|e| {
            Self::classify_send_error(e, self.timeout, format!("POST {}", endpoint.path()))
        })
    }

    /// Removes a file attachment from a service request.
    pub async fn delete_sr_attachment(
        &self,
        id: u64,
        file_id: &str,
    ) -> Result<serde_json::Value, SysaidError> {
        let body = serde_json::json!({ "fileId": file_id });
        self.dispatch(&Endpoint::DeleteSrAttachment(id), None, Some(&body))
            .await
    }

    /// Records an activity entry on a service request.
    pub async fn add_sr_activity(
        &self,
        id: u64,
        activity: &SrActivity,
    ) -> Result<serde_json::Value, SysaidError> {
        let body = serde_json::to_value(activity)?;
        self.dispatch(&Endpoint::AddSrActivity(id), None, Some(&body))
            .await
    }

    /// Removes an activity entry from a service request.
    pub async fn delete_sr_activity(
        &self,
        id: u64,
        activity_id: u64,
    ) -> Result<serde_json::Value, SysaidError> {
        let body = serde_json::json!({ "id": activity_id });
        self.dispatch(&Endpoint::DeleteSrActivity(id), None, Some(&body))
            .await
    }

    /// Sends a message from a service request.
    pub async fn send_sr_message(
        &self,
        id: u64,
        message: &SrMessage,
        options: &MessageOptions,
    ) -> Result<serde_json::Value, SysaidError> {
        let query = options.to_query();
        let body = serde_json::json!({ "message": serde_json::to_value(message)? });
        self.dispatch(&Endpoint::SendSrMessage(id), Some(&query), Some(&body))
            .await
    }

    // ========================================================================
    // User operations
    // ========================================================================

    /// Lists users.
    ///
    /// The user payload is not typed; the decoded body is returned as-is.
    pub async fn list_users(&self, params: &ListParams) -> Result<serde_json::Value, SysaidError> {
        let query = params.to_query();
        self.dispatch(&Endpoint::ListUsers, Some(&query), None).await
    }

    /// Fetches a single user by id.
    pub async fn get_user(
        &self,
        id: u64,
        params: &ListParams,
    ) -> Result<serde_json::Value, SysaidError> {
        let query = params.to_query();
        self.dispatch(&Endpoint::GetUser(id), Some(&query), None)
            .await
    }
}

/// Parses `Set-Cookie` header values into a name→value map.
///
/// Only the leading `name=value` pair of each header is kept; attributes
/// like `Path` and `HttpOnly` are request-irrelevant.
fn parse_set_cookie<'a>(values: impl Iterator<Item = &'a str>) -> BTreeMap<String, String> {
    let mut cookies = BTreeMap::new();
    for raw in values {
        let pair = raw.split(';').next().unwrap_or("");
        if let Some((name, value)) = pair.split_once('=') {
            let name = name.trim();
            if !name.is_empty() {
                cookies.insert(name.to_string(), value.trim().to_string());
            }
        }
    }
    cookies
}

/// Decodes a response that should be a list of service requests.
///
/// A non-list success body decodes to an empty list, mirroring the
/// remote's behavior for empty result sets.
fn decode_sr_list(value: serde_json::Value) -> Result<Vec<ServiceRequest>, SysaidError> {
    match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(SysaidError::from))
            .collect(),
        _ => Ok(Vec::new()),
    }
}

/// Validates a `create_sr` info payload.
fn validate_create_info(info: &[SrField]) -> Result<(), SysaidError> {
    if info.is_empty() {
        return Err(SysaidError::validation(
            "info must contain at least one field",
        ));
    }
    for (i, field) in info.iter().enumerate() {
        if field.key.is_empty() {
            return Err(SysaidError::validation(format!(
                "info element {} has an empty key",
                i
            )));
        }
        match field.key.as_str() {
            "due_date" => {
                if !field.value.is_u64() && !field.value.is_i64() {
                    return Err(SysaidError::validation(
                        "due_date must be an integer of UTC epoch milliseconds",
                    ));
                }
            }
            "notes" => {
                let create_date = field.value.as_object().and_then(|o| o.get("createDate"));
                if !create_date.is_some_and(|v| v.is_u64() || v.is_i64()) {
                    return Err(SysaidError::validation(
                        "notes must be an object with userName, text, and an integer createDate",
                    ));
                }
            }
            _ => {}
        }
    }
    Ok(())
}
