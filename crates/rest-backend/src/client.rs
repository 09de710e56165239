use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use ureq::{Agent, RequestBuilder};
use useradmin_core::toggle::{try_in_order, HttpMethod, StatusAttempt, StatusValue};
use useradmin_core::{CreateUser, ListQuery, UpdateUser, UserId, UserPage, UserRecord, UserStatus};

use crate::convert::{list_response_to_page, single_user_response};
use crate::error::{RestError, Result};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// REST client for the `/users` resource
pub struct RestClient {
    agent: Agent,
    base_url: String,
    token: Option<String>,
}

impl RestClient {
    /// Create a new client.
    ///
    /// `base_url` is the API root the `/users` paths hang off, e.g.
    /// `https://admin.example.com/api`. `token` is sent as a bearer token.
    pub fn new(base_url: &str, token: Option<&str>) -> Self {
        Self::with_timeout(base_url, token, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, token: Option<&str>, timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(|s| s.to_string()),
        }
    }

    fn user_url(&self, id: &UserId) -> String {
        format!(
            "{}/users/{}",
            self.base_url,
            urlencoding::encode(&id.to_string())
        )
    }

    /// Add the headers every request carries
    fn authorize<B>(&self, request: RequestBuilder<B>) -> RequestBuilder<B> {
        let request = request.header("Accept", "application/json");
        match &self.token {
            Some(token) => request.header("Authorization", format!("Bearer {}", token)),
            None => request,
        }
    }

    /// Check response status and return error if not successful
    fn check_response(
        &self,
        mut response: ureq::http::Response<ureq::Body>,
    ) -> Result<ureq::http::Response<ureq::Body>> {
        let status = response.status().as_u16();

        if (200..300).contains(&status) {
            return Ok(response);
        }

        let body = response
            .body_mut()
            .read_to_string()
            .unwrap_or_else(|_| String::new());
        let parsed = serde_json::from_str::<Value>(&body).ok();

        let message = parsed
            .as_ref()
            .and_then(|v| {
                v.get("message")
                    .or_else(|| v.get("error"))
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or_else(|| {
                if body.is_empty() {
                    format!("HTTP {}", status)
                } else {
                    body.clone()
                }
            });

        match status {
            401 => Err(RestError::Unauthorized),
            404 => Err(RestError::NotFound(message)),
            400 | 422 => match parsed.as_ref().and_then(field_errors) {
                Some(fields) => Err(RestError::Validation { message, fields }),
                None => Err(RestError::Api { status, message }),
            },
            _ => Err(RestError::Api { status, message }),
        }
    }

    /// Handle transport-level errors
    fn handle_error(&self, err: ureq::Error) -> RestError {
        RestError::Http(err)
    }

    /// Read an optional JSON body, tolerating empty responses
    fn read_optional_json(mut response: ureq::http::Response<ureq::Body>) -> Result<Option<Value>> {
        let body = response.body_mut().read_to_string()?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        Ok(serde_json::from_str(&body).ok())
    }

    // ==================== User Operations ====================

    /// Build the list URL for a query. The backend counts pages from one.
    pub fn list_url(&self, query: &ListQuery) -> String {
        let mut url = format!(
            "{}/users?page={}&limit={}&search={}",
            self.base_url,
            query.pagination.backend_page(),
            query.pagination.page_size,
            urlencoding::encode(&query.filter.search)
        );

        // Send both conventions; backends ignore the one they don't know
        if let Some(status) = query.filter.status.status() {
            url.push_str(&format!(
                "&status={}&active={}",
                status.as_str(),
                status.is_active()
            ));
        }

        if let Some(sort) = query.sort.0 {
            url.push_str(&format!(
                "&orderBy={}&orderDir={}",
                sort.field.as_str(),
                sort.direction.as_str()
            ));
        }

        url
    }

    /// Fetch one page of users
    pub fn list_users(&self, query: &ListQuery) -> Result<UserPage> {
        let url = self.list_url(query);
        tracing::debug!(%url, "GET users");

        let response = self
            .authorize(self.agent.get(&url))
            .call()
            .map_err(|e| self.handle_error(e))?;

        let mut response = self.check_response(response)?;
        let body: Value = response.body_mut().read_json()?;
        Ok(list_response_to_page(&body))
    }

    /// Create a user; returns the created record when the backend echoes it
    pub fn create_user(&self, user: &CreateUser) -> Result<Option<UserRecord>> {
        let url = format!("{}/users", self.base_url);
        tracing::debug!(%url, username = %user.username, "POST user");

        let response = self
            .authorize(self.agent.post(&url))
            .header("Content-Type", "application/json")
            .send_json(user)
            .map_err(|e| self.handle_error(e))?;

        let response = self.check_response(response)?;
        Ok(Self::read_optional_json(response)?
            .as_ref()
            .and_then(single_user_response))
    }

    /// Update a user's username
    pub fn update_user(&self, id: &UserId, update: &UpdateUser) -> Result<Option<UserRecord>> {
        let url = self.user_url(id);
        tracing::debug!(%url, "PUT user");

        let response = self
            .authorize(self.agent.put(&url))
            .header("Content-Type", "application/json")
            .send_json(update)
            .map_err(|e| self.handle_error(e))?;

        let response = self.check_response(response)?;
        Ok(Self::read_optional_json(response)?
            .as_ref()
            .and_then(single_user_response))
    }

    /// Delete a user
    pub fn delete_user(&self, id: &UserId) -> Result<()> {
        let url = self.user_url(id);
        tracing::debug!(%url, "DELETE user");

        let response = self
            .authorize(self.agent.delete(&url))
            .call()
            .map_err(|e| self.handle_error(e))?;

        self.check_response(response)?;
        Ok(())
    }

    // ==================== Status Operations ====================

    /// Send a single status request shape
    pub fn send_status_attempt(
        &self,
        id: &UserId,
        attempt: &StatusAttempt,
        next: UserStatus,
    ) -> Result<()> {
        let url = format!("{}{}", self.base_url, attempt.path(id));
        let (key, value) = attempt.field(next);
        let value = match value {
            StatusValue::Text(s) => Value::from(s),
            StatusValue::Flag(b) => Value::from(b),
        };
        let mut body = serde_json::Map::new();
        body.insert(key.to_string(), value);
        tracing::debug!(%url, method = attempt.method.as_str(), "status attempt");

        let request = match attempt.method {
            HttpMethod::Patch => self.agent.patch(&url),
            HttpMethod::Put => self.agent.put(&url),
        };
        let response = self
            .authorize(request)
            .header("Content-Type", "application/json")
            .send_json(&Value::Object(body))
            .map_err(|e| self.handle_error(e))?;

        self.check_response(response)?;
        Ok(())
    }

    /// Set a user's status, probing each known request shape until one is
    /// accepted. Returns the shape that worked.
    pub fn set_status(&self, id: &UserId, next: UserStatus) -> Result<StatusAttempt> {
        try_in_order(|attempt| self.send_status_attempt(id, attempt, next))
    }
}

/// Field errors from a validation-shaped error body.
///
/// Accepts `{"errors": {"field": "msg"}}`, `{"errors": {"field": ["msg"]}}`
/// and `{"errors": [{"field"|"path"|"param": "..", "message"|"msg": ".."}]}`.
fn field_errors(body: &Value) -> Option<BTreeMap<String, String>> {
    let mut fields = BTreeMap::new();

    match body.get("errors")? {
        Value::Object(map) => {
            for (key, value) in map {
                let message = match value {
                    Value::String(s) => Some(s.clone()),
                    Value::Array(items) => items.iter().find_map(Value::as_str).map(str::to_string),
                    _ => None,
                };
                if let Some(message) = message {
                    fields.insert(key.clone(), message);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                let key = ["field", "path", "param"]
                    .iter()
                    .find_map(|k| item.get(k).and_then(Value::as_str));
                let message = ["message", "msg"]
                    .iter()
                    .find_map(|k| item.get(k).and_then(Value::as_str));
                if let (Some(key), Some(message)) = (key, message) {
                    fields.insert(key.to_string(), message.to_string());
                }
            }
        }
        _ => return None,
    }

    if fields.is_empty() {
        None
    } else {
        Some(fields)
    }
}
