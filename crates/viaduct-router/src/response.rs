//! HTTP response type.

use std::collections::HashMap;

/// An HTTP response. The dispatcher populates one in place per request.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: Vec<u8>,
}

impl Response {
    /// Creates a new response with the given status and no headers or body.
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// Creates a 200 OK response.
    pub fn ok() -> Self {
        Self::new(200)
    }

    /// Creates a response with plain text content.
    pub fn text(body: impl Into<String>) -> Self {
        Self::ok()
            .header("Content-Type", "text/plain; charset=utf-8")
            .body(body.into())
    }

    /// Creates a response with HTML content.
    pub fn html(body: impl Into<String>) -> Self {
        Self::ok()
            .header("Content-Type", "text/html; charset=utf-8")
            .body(body.into())
    }

    /// Creates a response with JSON content.
    ///
    /// Serialization failures produce a 500 response.
    pub fn json<T: serde::Serialize>(data: &T) -> Self {
        serde_json::to_vec(data).map_or_else(
            |_| Self::internal_server_error(),
            |body| {
                Self::ok()
                    .header("Content-Type", "application/json")
                    .body(body)
            },
        )
    }

    /// Creates a temporary (302) redirect.
    pub fn redirect(target: impl Into<String>) -> Self {
        Self::new(302).header("Location", target)
    }

    /// Creates a permanent (301) redirect.
    pub fn redirect_permanent(target: impl Into<String>) -> Self {
        Self::new(301).header("Location", target)
    }

    /// Creates a 404 Not Found response.
    pub fn not_found() -> Self {
        Self::new(404).body(&b"Not Found"[..])
    }

    /// Creates a 405 Method Not Allowed response.
    pub fn method_not_allowed() -> Self {
        Self::new(405).body(&b"Method Not Allowed"[..])
    }

    /// Creates a 500 Internal Server Error response.
    pub fn internal_server_error() -> Self {
        Self::new(500).body(&b"Internal Server Error"[..])
    }

    /// Sets a header, consuming the response.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Sets the status code, consuming the response.
    #[must_use]
    pub fn status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Sets the body, consuming the response.
    #[must_use]
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets a header in place.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name.into(), value.into());
    }

    /// Sets the status code in place.
    pub fn set_status(&mut self, status: u16) {
        self.status = status;
    }

    /// Sets the body in place.
    pub fn set_body(&mut self, body: impl Into<Vec<u8>>) {
        self.body = body.into();
    }

    /// Gets a header value. Lookup is case-insensitive.
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns the body as a string, if it is valid UTF-8.
    pub fn body_string(&self) -> Option<String> {
        std::str::from_utf8(&self.body).ok().map(str::to_string)
    }

    /// Returns the reason phrase for the current status code.
    pub const fn status_text(&self) -> &'static str {
        match self.status {
            200 => "OK",
            201 => "Created",
            204 => "No Content",
            301 => "Moved Permanently",
            302 => "Found",
            304 => "Not Modified",
            400 => "Bad Request",
            401 => "Unauthorized",
            403 => "Forbidden",
            404 => "Not Found",
            405 => "Method Not Allowed",
            409 => "Conflict",
            422 => "Unprocessable Entity",
            500 => "Internal Server Error",
            502 => "Bad Gateway",
            503 => "Service Unavailable",
            _ => "Unknown",
        }
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_response() {
        let res = Response::text("hello");
        assert_eq!(res.status, 200);
        assert_eq!(
            res.get_header("content-type"),
            Some("text/plain; charset=utf-8")
        );
        assert_eq!(res.body_string().as_deref(), Some("hello"));
    }

    #[test]
    fn json_response() {
        let res = Response::json(&serde_json::json!({"ok": true}));
        assert_eq!(res.status, 200);
        assert_eq!(res.get_header("Content-Type"), Some("application/json"));
    }

    #[test]
    fn redirect_response() {
        let res = Response::redirect_permanent("/users/");
        assert_eq!(res.status, 301);
        assert_eq!(res.get_header("Location"), Some("/users/"));
    }

    #[test]
    fn in_place_mutators() {
        let mut res = Response::ok();
        res.set_status(201);
        res.set_header("X-Trace", "abc");
        res.set_body("created");

        assert_eq!(res.status, 201);
        assert_eq!(res.get_header("x-trace"), Some("abc"));
        assert_eq!(res.body_string().as_deref(), Some("created"));
        assert_eq!(res.status_text(), "Created");
    }
}
