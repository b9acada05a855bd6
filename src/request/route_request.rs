//! The request view handed to mapping strategies and handlers.

use std::collections::HashMap;

use axum::body::Bytes;
use axum::http::request::Parts;
use axum::http::{HeaderMap, Method, Uri};

/// A buffered, owned snapshot of one HTTP request.
///
/// Built once per request before resolution starts. Conditions read from it,
/// the matched mapping writes path variables back into it, and the handler
/// finally consumes it.
#[derive(Debug, Clone)]
pub struct RouteRequest {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    query: Vec<(String, String)>,
    body: Bytes,
    path_vars: HashMap<String, String>,
}

impl RouteRequest {
    pub fn new(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Self {
        let query = uri.query().map(parse_query).unwrap_or_default();
        Self {
            method,
            uri,
            headers,
            query,
            body,
            path_vars: HashMap::new(),
        }
    }

    /// Builds a request from decomposed hyper parts plus the buffered body.
    pub fn from_parts(parts: &Parts, body: Bytes) -> Self {
        Self::new(
            parts.method.clone(),
            parts.uri.clone(),
            parts.headers.clone(),
            body,
        )
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Raw request path, before any lookup-path normalization.
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// First value of the named header, if present and valid UTF-8.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Decoded query pairs in request order.
    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    /// First value of the named query parameter. Names are case-sensitive.
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_query(&self, name: &str) -> bool {
        self.query.iter().any(|(k, _)| k == name)
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Template variables extracted by the matched mapping, empty until then.
    pub fn path_vars(&self) -> &HashMap<String, String> {
        &self.path_vars
    }

    pub fn path_var(&self, name: &str) -> Option<&str> {
        self.path_vars.get(name).map(String::as_str)
    }

    pub fn set_path_vars(&mut self, vars: HashMap<String, String>) {
        self.path_vars = vars;
    }
}

fn parse_query(query: &str) -> Vec<(String, String)> {
    url::form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}
