//! Minimal HTTP/1.1 framing for the API server

use crate::error::RosterError;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: String,
    pub path: String,
}

impl Request {
    /// Parse the request line; query string and trailing slash are dropped.
    pub fn parse(raw: &str) -> Option<Self> {
        let request_line = raw.lines().next()?;
        let mut parts = request_line.split_whitespace();
        let method = parts.next()?.to_string();
        let target = parts.next()?;

        let path = target.split('?').next().unwrap_or_default();
        let path = path.trim_end_matches('/');
        let path = if path.is_empty() { "/" } else { path };

        Some(Self { method, path: path.to_string() })
    }

    /// Non-empty path segments.
    pub fn segments(&self) -> Vec<&str> {
        self.path.split('/').filter(|s| !s.is_empty()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
}

impl Response {
    pub fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Self { status, body },
            Err(e) => Self::from_error(&RosterError::Json(e), "Failed to serialize response"),
        }
    }

    /// `{"message": ...}` with the error's status code. The message is the
    /// caller-facing one; the error detail stays in the logs.
    pub fn from_error(err: &RosterError, message: &str) -> Self {
        let status = err.status_code();
        let message = match err {
            RosterError::BadRequest(detail) | RosterError::NotFound(detail) => detail.as_str(),
            _ => message,
        };
        Self {
            status,
            body: serde_json::to_string(&ErrorBody { message })
                .unwrap_or_else(|_| r#"{"message":"Internal Server Error"}"#.to_string()),
        }
    }

    pub fn empty(status: u16) -> Self {
        Self { status, body: String::new() }
    }

    pub fn to_http(&self) -> String {
        format!(
            "HTTP/1.1 {} {}\r\n\
             Content-Type: application/json\r\n\
             Access-Control-Allow-Origin: *\r\n\
             Access-Control-Allow-Methods: GET, POST, OPTIONS\r\n\
             Access-Control-Allow-Headers: Content-Type\r\n\
             Content-Length: {}\r\n\
             \r\n\
             {}",
            self.status,
            reason_phrase(self.status),
            self.body.len(),
            self.body
        )
    }
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}
