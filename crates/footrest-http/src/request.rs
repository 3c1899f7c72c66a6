//! HTTP request type. Grounded on `oxide-router::request::Request`, trimmed
//! to what dispatch actually needs (no path-parameter map: FootREST's only
//! path shape is a single table-name segment, pulled straight off the
//! path string by dispatch).

use std::collections::HashMap;

/// HTTP request methods FootREST routes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Options,
}

/// Returned by `Method`'s `FromStr` impl for anything other than
/// GET/POST/PUT/DELETE/OPTIONS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized HTTP method")]
pub struct ParseMethodError;

impl std::str::FromStr for Method {
    type Err = ParseMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            "OPTIONS" => Ok(Self::Options),
            _ => Err(ParseMethodError),
        }
    }
}

impl Method {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A parsed HTTP request: method, path, query string, headers, and a raw
/// body (JSON parsing happens in dispatch, once the handler knows which
/// shape to expect).
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub query: HashMap<String, String>,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl Request {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: HashMap::new(),
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    #[must_use]
    pub fn get_header(&self, key: &str) -> Option<&str> {
        let key_lower = key.to_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| k.to_lowercase() == key_lower)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn get_query(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Splits a raw `path?query` target into its path and parsed query map.
    #[must_use]
    pub fn split_target(target: &str) -> (&str, HashMap<String, String>) {
        match target.split_once('?') {
            Some((path, query)) => (path, parse_query_string(query)),
            None => (target, HashMap::new()),
        }
    }
}

/// Parses a `k=v&k2=v2` query string with `%XX`/`+` decoding.
#[must_use]
pub fn parse_query_string(query: &str) -> HashMap<String, String> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let mut parts = pair.splitn(2, '=');
            let key = parts.next()?;
            let value = parts.next().unwrap_or("");
            Some((urlencoding_decode(key), urlencoding_decode(value)))
        })
        .collect()
}

fn urlencoding_decode(s: &str) -> String {
    let mut result = String::new();
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '%' {
            let hex: String = chars.by_ref().take(2).collect();
            if hex.len() == 2 {
                if let Ok(byte) = u8::from_str_radix(&hex, 16) {
                    result.push(byte as char);
                    continue;
                }
            }
            result.push('%');
            result.push_str(&hex);
        } else if c == '+' {
            result.push(' ');
        } else {
            result.push(c);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_parses_case_insensitively() {
        assert_eq!("get".parse(), Ok(Method::Get));
        assert_eq!("DELETE".parse(), Ok(Method::Delete));
        assert_eq!("PATCH".parse::<Method>(), Err(ParseMethodError));
    }

    #[test]
    fn query_string_parsing_decodes_percent_and_plus() {
        let q = parse_query_string("name=John+Doe&age=30&tag=a%2Bb");
        assert_eq!(q.get("name"), Some(&"John Doe".to_string()));
        assert_eq!(q.get("age"), Some(&"30".to_string()));
        assert_eq!(q.get("tag"), Some(&"a+b".to_string()));
    }

    #[test]
    fn split_target_separates_path_and_query() {
        let (path, query) = Request::split_target("/root/users?select=a,b&rows=10");
        assert_eq!(path, "/root/users");
        assert_eq!(query.get("select"), Some(&"a,b".to_string()));
        assert_eq!(query.get("rows"), Some(&"10".to_string()));
    }

    #[test]
    fn split_target_with_no_query() {
        let (path, query) = Request::split_target("/root/users");
        assert_eq!(path, "/root/users");
        assert!(query.is_empty());
    }
}
