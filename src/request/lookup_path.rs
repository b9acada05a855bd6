//! Lookup path derivation.
//!
//! Patterns are matched against a normalized form of the request path, not
//! the raw URI. Normalization is configurable because proxies and legacy
//! clients differ in what they send.

use crate::config::PathMatchConfig;

/// Derives the path used for mapping lookup from a raw request path.
#[derive(Debug, Clone)]
pub struct LookupPathHelper {
    url_decode: bool,
    remove_semicolon_content: bool,
}

impl Default for LookupPathHelper {
    fn default() -> Self {
        Self {
            url_decode: true,
            remove_semicolon_content: true,
        }
    }
}

impl LookupPathHelper {
    pub fn new(url_decode: bool, remove_semicolon_content: bool) -> Self {
        Self {
            url_decode,
            remove_semicolon_content,
        }
    }

    pub fn from_config(config: &PathMatchConfig) -> Self {
        Self::new(config.url_decode, config.remove_semicolon_content)
    }

    /// Normalizes a raw request path for lookup.
    ///
    /// Semicolon content (matrix parameters) is stripped before decoding so
    /// an encoded semicolon cannot smuggle parameters past the strip. An
    /// empty result becomes `/`.
    pub fn lookup_path(&self, raw_path: &str) -> String {
        let mut path = if self.remove_semicolon_content {
            strip_semicolon_content(raw_path)
        } else {
            raw_path.to_string()
        };
        if self.url_decode {
            if let Ok(decoded) = urlencoding::decode(&path) {
                path = decoded.into_owned();
            }
        }
        if path.is_empty() {
            path.push('/');
        }
        path
    }
}

/// Removes `;name=value` runs from every segment, keeping the slashes.
fn strip_semicolon_content(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut rest = path;
    while let Some(semi) = rest.find(';') {
        out.push_str(&rest[..semi]);
        match rest[semi..].find('/') {
            Some(slash) => rest = &rest[semi + slash..],
            None => rest = "",
        }
    }
    out.push_str(rest);
    out
}
