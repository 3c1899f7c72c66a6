//! HTTP response type. Grounded on `oxide-router::response::Response`.

use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl Response {
    #[must_use]
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// A response whose body is already-rendered JSON text (the templated
    /// `QueryOK`/`ExecOK`/`Error` bodies are built by hand in `dispatch`,
    /// not via `serde_json::to_vec`, so this just sets status + header).
    #[must_use]
    pub fn json_text(status: u16, body: String) -> Self {
        Self {
            status,
            headers: [("Content-Type".to_string(), "application/json".to_string())]
                .into_iter()
                .collect(),
            body: body.into_bytes(),
        }
    }

    #[must_use]
    pub fn bad_request(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 400,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    #[must_use]
    pub fn not_found() -> Self {
        Self {
            status: 404,
            headers: HashMap::new(),
            body: b"Not Found".to_vec(),
        }
    }

    #[must_use]
    pub fn method_not_allowed() -> Self {
        Self {
            status: 405,
            headers: HashMap::new(),
            body: b"Method Not Allowed".to_vec(),
        }
    }

    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn status_text(&self) -> &'static str {
        match self.status {
            200 => "OK",
            204 => "No Content",
            400 => "Bad Request",
            404 => "Not Found",
            405 => "Method Not Allowed",
            500 => "Internal Server Error",
            _ => "Unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_text_sets_content_type() {
        let res = Response::json_text(200, "{\"result\":[]}".to_string());
        assert_eq!(res.status, 200);
        assert_eq!(
            res.headers.get("Content-Type"),
            Some(&"application/json".to_string())
        );
    }

    #[test]
    fn status_text_covers_known_codes() {
        assert_eq!(Response::new(200).status_text(), "OK");
        assert_eq!(Response::not_found().status_text(), "Not Found");
        assert_eq!(Response::method_not_allowed().status_text(), "Method Not Allowed");
    }
}
