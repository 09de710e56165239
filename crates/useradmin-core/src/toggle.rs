//! Ordered request shapes for flipping a user's status.
//!
//! Deployments disagree on how status is written (a `status` string or an
//! `active` flag, on the resource or on a sub-resource, via PATCH or PUT),
//! so the toggle tries each shape in a fixed order until one is accepted.

use std::fmt;

use crate::models::{UserId, UserStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Patch,
    Put,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Patch => "PATCH",
            HttpMethod::Put => "PUT",
        }
    }
}

/// Endpoint a status attempt targets, relative to `/users/:id`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusRoute {
    /// `/users/:id`
    Resource,
    /// `/users/:id/status`
    StatusField,
    /// `/users/:id/active`
    ActiveField,
}

/// Payload convention of an attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusBody {
    /// `{"status": "active" | "inactive"}`
    Status,
    /// `{"active": true | false}`
    Active,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusAttempt {
    pub method: HttpMethod,
    pub route: StatusRoute,
    pub body: StatusBody,
}

/// Probe order. The string form is tried on every endpoint before the
/// boolean form.
pub const STATUS_ATTEMPTS: [StatusAttempt; 6] = [
    StatusAttempt {
        method: HttpMethod::Patch,
        route: StatusRoute::Resource,
        body: StatusBody::Status,
    },
    StatusAttempt {
        method: HttpMethod::Patch,
        route: StatusRoute::StatusField,
        body: StatusBody::Status,
    },
    StatusAttempt {
        method: HttpMethod::Put,
        route: StatusRoute::Resource,
        body: StatusBody::Status,
    },
    StatusAttempt {
        method: HttpMethod::Patch,
        route: StatusRoute::Resource,
        body: StatusBody::Active,
    },
    StatusAttempt {
        method: HttpMethod::Patch,
        route: StatusRoute::ActiveField,
        body: StatusBody::Active,
    },
    StatusAttempt {
        method: HttpMethod::Put,
        route: StatusRoute::Resource,
        body: StatusBody::Active,
    },
];

impl StatusAttempt {
    /// Path of the request, e.g. `/users/42/status`
    pub fn path(&self, id: &UserId) -> String {
        let base = format!("/users/{}", urlencoding::encode(&id.to_string()));
        match self.route {
            StatusRoute::Resource => base,
            StatusRoute::StatusField => format!("{}/status", base),
            StatusRoute::ActiveField => format!("{}/active", base),
        }
    }

    /// JSON key and value written by this attempt
    pub fn field(&self, next: UserStatus) -> (&'static str, StatusValue) {
        match self.body {
            StatusBody::Status => ("status", StatusValue::Text(next.as_str())),
            StatusBody::Active => ("active", StatusValue::Flag(next.is_active())),
        }
    }
}

impl fmt::Display for StatusAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let route = match self.route {
            StatusRoute::Resource => "/users/:id",
            StatusRoute::StatusField => "/users/:id/status",
            StatusRoute::ActiveField => "/users/:id/active",
        };
        let body = match self.body {
            StatusBody::Status => "{status}",
            StatusBody::Active => "{active}",
        };
        write!(f, "{} {} {}", self.method.as_str(), route, body)
    }
}

/// Value written into the status payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusValue {
    Text(&'static str),
    Flag(bool),
}

/// Run `send` for each entry of [`STATUS_ATTEMPTS`], stopping at the first
/// success.
///
/// Returns the attempt that succeeded, or the error of the last attempt
/// when every attempt failed.
pub fn try_in_order<E, F>(mut send: F) -> Result<StatusAttempt, E>
where
    E: fmt::Display,
    F: FnMut(&StatusAttempt) -> Result<(), E>,
{
    let [earlier @ .., last] = &STATUS_ATTEMPTS;

    for attempt in earlier {
        match send(attempt) {
            Ok(()) => {
                tracing::info!(attempt = %attempt, "status update accepted");
                return Ok(*attempt);
            }
            Err(e) => {
                tracing::debug!(attempt = %attempt, error = %e, "status attempt rejected");
            }
        }
    }

    match send(last) {
        Ok(()) => {
            tracing::info!(attempt = %last, "status update accepted");
            Ok(*last)
        }
        Err(e) => {
            tracing::debug!(attempt = %last, error = %e, "last status attempt rejected");
            Err(e)
        }
    }
}
