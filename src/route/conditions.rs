//! Request conditions making up a route mapping.
//!
//! Each condition answers two questions: does it accept this request, and
//! which of two accepting conditions is more specific. A condition narrows
//! on match, keeping only the content relevant to the request, and combines
//! when a component-level declaration meets a method-level one.

use std::cmp::Ordering;
use std::fmt;

use axum::http::Method;

use crate::config::PathMatchConfig;
use crate::pattern;
use crate::request::RouteRequest;

/// A single `name`, `!name`, `name=value` or `name!=value` expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NameValueExpression {
    pub name: String,
    pub value: Option<String>,
    pub negated: bool,
}

impl NameValueExpression {
    pub fn parse(expression: &str) -> Self {
        match expression.find('=') {
            None => {
                let (negated, name) = match expression.strip_prefix('!') {
                    Some(rest) => (true, rest),
                    None => (false, expression),
                };
                Self {
                    name: name.to_string(),
                    value: None,
                    negated,
                }
            }
            Some(pos) => {
                let negated = pos > 0 && expression.as_bytes()[pos - 1] == b'!';
                let name = if negated {
                    &expression[..pos - 1]
                } else {
                    &expression[..pos]
                };
                Self {
                    name: name.to_string(),
                    value: Some(expression[pos + 1..].to_string()),
                    negated,
                }
            }
        }
    }

    fn matches_param(&self, request: &RouteRequest) -> bool {
        let result = match &self.value {
            Some(value) => request.query_value(&self.name) == Some(value.as_str()),
            None => request.has_query(&self.name),
        };
        result != self.negated
    }

    fn matches_header(&self, request: &RouteRequest) -> bool {
        let result = match &self.value {
            Some(value) => request.header_value(&self.name) == Some(value.as_str()),
            None => request.headers().contains_key(self.name.as_str()),
        };
        result != self.negated
    }
}

impl fmt::Display for NameValueExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => {
                let op = if self.negated { "!=" } else { "=" };
                write!(f, "{}{}{}", self.name, op, value)
            }
            None => {
                let bang = if self.negated { "!" } else { "" };
                write!(f, "{}{}", bang, self.name)
            }
        }
    }
}

/// URL pattern condition. Empty matches every path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PatternsCondition {
    patterns: Vec<String>,
}

impl PatternsCondition {
    /// Normalizes declared patterns: a leading slash is added where missing,
    /// and the list is sorted and deduplicated so equal declarations compare
    /// equal regardless of order.
    pub fn new(patterns: Vec<String>) -> Self {
        let mut normalized: Vec<String> = patterns
            .into_iter()
            .map(|p| {
                if !p.is_empty() && !p.starts_with('/') {
                    format!("/{}", p)
                } else {
                    p
                }
            })
            .collect();
        normalized.sort();
        normalized.dedup();
        Self {
            patterns: normalized,
        }
    }

    /// Wraps already specificity-sorted patterns from a match, keeping their
    /// order.
    fn from_matched(patterns: Vec<String>) -> Self {
        Self { patterns }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Best pattern of a narrowed condition; declaration head otherwise.
    pub fn first(&self) -> Option<&str> {
        self.patterns.first().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Literal patterns usable as direct lookup keys.
    pub fn direct_paths(&self) -> Vec<String> {
        self.patterns
            .iter()
            .filter(|p| !pattern::is_pattern(p))
            .cloned()
            .collect()
    }

    /// Pairwise cross-product combine. One empty side yields the other; two
    /// empty sides yield the single empty pattern, which matches only the
    /// root path.
    pub fn combine(&self, other: &PatternsCondition) -> PatternsCondition {
        let mut result = Vec::new();
        if !self.patterns.is_empty() && !other.patterns.is_empty() {
            for p1 in &self.patterns {
                for p2 in &other.patterns {
                    result.push(pattern::combine(p1, p2));
                }
            }
        } else if !self.patterns.is_empty() {
            result.extend(self.patterns.iter().cloned());
        } else if !other.patterns.is_empty() {
            result.extend(other.patterns.iter().cloned());
        } else {
            result.push(String::new());
        }
        PatternsCondition::new(result)
    }

    /// Returns the matching patterns, most specific first, or `None` when
    /// nothing matches. Trailing-slash and suffix matching append their
    /// variant to the pattern so the narrowed condition records what really
    /// matched.
    pub fn matching(
        &self,
        lookup_path: &str,
        config: &PathMatchConfig,
    ) -> Option<PatternsCondition> {
        if self.patterns.is_empty() {
            return Some(self.clone());
        }
        let mut matched: Vec<String> = self
            .patterns
            .iter()
            .filter_map(|p| Self::matching_pattern(p, lookup_path, config))
            .collect();
        if matched.is_empty() {
            return None;
        }
        matched.sort_by(|a, b| pattern::compare_specificity(a, b, lookup_path));
        Some(PatternsCondition::from_matched(matched))
    }

    fn matching_pattern(pat: &str, lookup_path: &str, config: &PathMatchConfig) -> Option<String> {
        if pat == lookup_path {
            return Some(pat.to_string());
        }
        if config.use_suffix_pattern_match && !pat.contains('.') {
            let suffixed = format!("{}.*", pat);
            if pattern::matches(&suffixed, lookup_path) {
                return Some(suffixed);
            }
        }
        if pattern::matches(pat, lookup_path) {
            return Some(pat.to_string());
        }
        if config.use_trailing_slash_match && !pat.ends_with('/') {
            let slashed = format!("{}/", pat);
            if pattern::matches(&slashed, lookup_path) {
                return Some(slashed);
            }
        }
        None
    }

    /// Pairwise comparison over both sorted lists; the side with patterns
    /// left over is more specific.
    pub fn compare(&self, other: &PatternsCondition, lookup_path: &str) -> Ordering {
        for (a, b) in self.patterns.iter().zip(&other.patterns) {
            let result = pattern::compare_specificity(a, b, lookup_path);
            if result != Ordering::Equal {
                return result;
            }
        }
        other.patterns.len().cmp(&self.patterns.len())
    }
}

impl fmt::Display for PatternsCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.patterns.join(" || "))
    }
}

/// HTTP method condition. Empty matches every method.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodsCondition {
    methods: Vec<Method>,
}

impl MethodsCondition {
    pub fn new(methods: Vec<Method>) -> Self {
        let mut methods = methods;
        methods.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        methods.dedup();
        Self { methods }
    }

    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Union of both sides.
    pub fn combine(&self, other: &MethodsCondition) -> MethodsCondition {
        let mut all = self.methods.clone();
        all.extend(other.methods.iter().cloned());
        MethodsCondition::new(all)
    }

    /// Empty matches any method; otherwise narrows to exactly the matched
    /// one.
    pub fn matching(&self, request: &RouteRequest) -> Option<MethodsCondition> {
        if self.methods.is_empty() {
            return Some(self.clone());
        }
        self.methods
            .iter()
            .find(|m| *m == request.method())
            .map(|m| MethodsCondition {
                methods: vec![m.clone()],
            })
    }

    /// After narrowing, a declared-method match beats the match-any empty
    /// condition.
    pub fn compare(&self, other: &MethodsCondition) -> Ordering {
        other.methods.len().cmp(&self.methods.len())
    }
}

impl fmt::Display for MethodsCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.methods.iter().map(|m| m.as_str()).collect();
        write!(f, "[{}]", names.join(" || "))
    }
}

/// Query parameter condition: a conjunction of expressions, all must hold.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParamsCondition {
    expressions: Vec<NameValueExpression>,
}

impl ParamsCondition {
    pub fn new(expressions: Vec<String>) -> Self {
        let mut expressions: Vec<NameValueExpression> = expressions
            .iter()
            .map(|e| NameValueExpression::parse(e))
            .collect();
        expressions.sort();
        expressions.dedup();
        Self { expressions }
    }

    pub fn expressions(&self) -> &[NameValueExpression] {
        &self.expressions
    }

    pub fn is_empty(&self) -> bool {
        self.expressions.is_empty()
    }

    /// Union of both sides.
    pub fn combine(&self, other: &ParamsCondition) -> ParamsCondition {
        let mut all = self.expressions.clone();
        all.extend(other.expressions.iter().cloned());
        all.sort();
        all.dedup();
        ParamsCondition { expressions: all }
    }

    pub fn matching(&self, request: &RouteRequest) -> Option<ParamsCondition> {
        self.expressions
            .iter()
            .all(|e| e.matches_param(request))
            .then(|| self.clone())
    }

    /// More expressions means more specific.
    pub fn compare(&self, other: &ParamsCondition) -> Ordering {
        other.expressions.len().cmp(&self.expressions.len())
    }
}

impl fmt::Display for ParamsCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", join_expressions(&self.expressions))
    }
}

/// Header condition: a conjunction of expressions, all must hold. Header
/// names are case-insensitive and stored lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HeadersCondition {
    expressions: Vec<NameValueExpression>,
}

impl HeadersCondition {
    pub fn new(expressions: Vec<String>) -> Self {
        let mut expressions: Vec<NameValueExpression> = expressions
            .iter()
            .map(|e| {
                let mut parsed = NameValueExpression::parse(e);
                parsed.name = parsed.name.to_ascii_lowercase();
                parsed
            })
            .collect();
        expressions.sort();
        expressions.dedup();
        Self { expressions }
    }

    pub fn expressions(&self) -> &[NameValueExpression] {
        &self.expressions
    }

    pub fn is_empty(&self) -> bool {
        self.expressions.is_empty()
    }

    /// Union of both sides.
    pub fn combine(&self, other: &HeadersCondition) -> HeadersCondition {
        let mut all = self.expressions.clone();
        all.extend(other.expressions.iter().cloned());
        all.sort();
        all.dedup();
        HeadersCondition { expressions: all }
    }

    pub fn matching(&self, request: &RouteRequest) -> Option<HeadersCondition> {
        self.expressions
            .iter()
            .all(|e| e.matches_header(request))
            .then(|| self.clone())
    }

    /// More expressions means more specific.
    pub fn compare(&self, other: &HeadersCondition) -> Ordering {
        other.expressions.len().cmp(&self.expressions.len())
    }
}

impl fmt::Display for HeadersCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", join_expressions(&self.expressions))
    }
}

fn join_expressions(expressions: &[NameValueExpression]) -> String {
    expressions
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(" && ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;
    use axum::http::HeaderMap;

    fn get(uri: &str) -> RouteRequest {
        RouteRequest::new(Method::GET, uri.parse().unwrap(), HeaderMap::new(), Bytes::new())
    }

    fn get_with_header(uri: &str, name: &str, value: &str) -> RouteRequest {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::HeaderName::from_bytes(name.as_bytes()).unwrap(),
            value.parse().unwrap(),
        );
        RouteRequest::new(Method::GET, uri.parse().unwrap(), headers, Bytes::new())
    }

    mod expressions {
        use super::*;

        #[test]
        fn test_parse_forms() {
            let e = NameValueExpression::parse("debug");
            assert_eq!((e.name.as_str(), e.value.as_deref(), e.negated), ("debug", None, false));

            let e = NameValueExpression::parse("!debug");
            assert_eq!((e.name.as_str(), e.value.as_deref(), e.negated), ("debug", None, true));

            let e = NameValueExpression::parse("format=json");
            assert_eq!(
                (e.name.as_str(), e.value.as_deref(), e.negated),
                ("format", Some("json"), false)
            );

            let e = NameValueExpression::parse("format!=xml");
            assert_eq!(
                (e.name.as_str(), e.value.as_deref(), e.negated),
                ("format", Some("xml"), true)
            );
        }

        #[test]
        fn test_display_round_trip() {
            for raw in ["debug", "!debug", "format=json", "format!=xml"] {
                assert_eq!(NameValueExpression::parse(raw).to_string(), raw);
            }
        }
    }

    mod patterns {
        use super::*;

        #[test]
        fn test_normalization() {
            let c = PatternsCondition::new(vec!["users".to_string(), "/users".to_string()]);
            assert_eq!(c.patterns(), ["/users"]);
        }

        #[test]
        fn test_empty_matches_everything() {
            let c = PatternsCondition::new(Vec::new());
            let config = PathMatchConfig::default();
            assert!(c.matching("/anything/at/all", &config).is_some());
        }

        #[test]
        fn test_matching_sorted_best_first() {
            let c = PatternsCondition::new(vec![
                "/users/**".to_string(),
                "/users/{id}".to_string(),
            ]);
            let config = PathMatchConfig::default();
            let matched = c.matching("/users/42", &config).unwrap();
            assert_eq!(matched.first(), Some("/users/{id}"));
            assert_eq!(matched.patterns().len(), 2);
        }

        #[test]
        fn test_trailing_slash_variant_recorded() {
            let c = PatternsCondition::new(vec!["/users".to_string()]);
            let config = PathMatchConfig::default();
            let matched = c.matching("/users/", &config).unwrap();
            assert_eq!(matched.first(), Some("/users/"));
        }

        #[test]
        fn test_trailing_slash_match_disabled() {
            let c = PatternsCondition::new(vec!["/users".to_string()]);
            let config = PathMatchConfig {
                use_trailing_slash_match: false,
                ..PathMatchConfig::default()
            };
            assert!(c.matching("/users/", &config).is_none());
        }

        #[test]
        fn test_suffix_pattern_match() {
            let c = PatternsCondition::new(vec!["/users/{id}".to_string()]);
            let config = PathMatchConfig {
                use_suffix_pattern_match: true,
                ..PathMatchConfig::default()
            };
            let matched = c.matching("/users/42.json", &config).unwrap();
            assert_eq!(matched.first(), Some("/users/{id}.*"));
        }

        #[test]
        fn test_combine_cross_product() {
            let base = PatternsCondition::new(vec!["/api".to_string()]);
            let method = PatternsCondition::new(vec!["/users".to_string(), "/groups".to_string()]);
            let combined = base.combine(&method);
            assert_eq!(combined.patterns(), ["/api/groups", "/api/users"]);
        }

        #[test]
        fn test_combine_empty_sides() {
            let empty = PatternsCondition::new(Vec::new());
            let users = PatternsCondition::new(vec!["/users".to_string()]);
            assert_eq!(empty.combine(&users).patterns(), ["/users"]);
            assert_eq!(users.combine(&empty).patterns(), ["/users"]);
            assert_eq!(empty.combine(&empty).patterns(), [""]);
        }

        #[test]
        fn test_direct_paths_excludes_patterns() {
            let c = PatternsCondition::new(vec![
                "/users".to_string(),
                "/users/{id}".to_string(),
                "/files/*".to_string(),
            ]);
            assert_eq!(c.direct_paths(), ["/users"]);
        }
    }

    mod methods {
        use super::*;

        #[test]
        fn test_empty_matches_any_method() {
            let c = MethodsCondition::new(Vec::new());
            assert!(c.matching(&get("/x")).is_some());
        }

        #[test]
        fn test_narrows_to_matched_method() {
            let c = MethodsCondition::new(vec![Method::GET, Method::POST]);
            let narrowed = c.matching(&get("/x")).unwrap();
            assert_eq!(narrowed.methods(), [Method::GET]);
        }

        #[test]
        fn test_rejects_other_methods() {
            let c = MethodsCondition::new(vec![Method::POST]);
            assert!(c.matching(&get("/x")).is_none());
        }

        #[test]
        fn test_narrowed_beats_empty() {
            let narrowed = MethodsCondition::new(vec![Method::GET]);
            let any = MethodsCondition::new(Vec::new());
            assert_eq!(narrowed.compare(&any), Ordering::Less);
            assert_eq!(any.compare(&narrowed), Ordering::Greater);
        }
    }

    mod params {
        use super::*;

        #[test]
        fn test_all_expressions_must_hold() {
            let c = ParamsCondition::new(vec!["q".to_string(), "format=json".to_string()]);
            assert!(c.matching(&get("/s?q=x&format=json")).is_some());
            assert!(c.matching(&get("/s?q=x&format=xml")).is_none());
            assert!(c.matching(&get("/s?format=json")).is_none());
        }

        #[test]
        fn test_negated_presence() {
            let c = ParamsCondition::new(vec!["!debug".to_string()]);
            assert!(c.matching(&get("/s")).is_some());
            assert!(c.matching(&get("/s?debug")).is_none());
        }

        #[test]
        fn test_negated_value() {
            let c = ParamsCondition::new(vec!["format!=xml".to_string()]);
            assert!(c.matching(&get("/s?format=json")).is_some());
            assert!(c.matching(&get("/s")).is_some());
            assert!(c.matching(&get("/s?format=xml")).is_none());
        }

        #[test]
        fn test_param_names_case_sensitive() {
            let c = ParamsCondition::new(vec!["Format=json".to_string()]);
            assert!(c.matching(&get("/s?format=json")).is_none());
        }
    }

    mod headers {
        use super::*;

        #[test]
        fn test_header_names_case_insensitive() {
            let c = HeadersCondition::new(vec!["X-Tenant=acme".to_string()]);
            assert!(c.matching(&get_with_header("/s", "x-tenant", "acme")).is_some());
            assert!(c.matching(&get_with_header("/s", "x-tenant", "other")).is_none());
            assert!(c.matching(&get("/s")).is_none());
        }

        #[test]
        fn test_header_values_case_sensitive() {
            let c = HeadersCondition::new(vec!["x-tenant=Acme".to_string()]);
            assert!(c.matching(&get_with_header("/s", "x-tenant", "acme")).is_none());
        }

        #[test]
        fn test_negated_header_presence() {
            let c = HeadersCondition::new(vec!["!x-internal".to_string()]);
            assert!(c.matching(&get("/s")).is_some());
            assert!(c.matching(&get_with_header("/s", "x-internal", "1")).is_none());
        }

        #[test]
        fn test_equal_declarations_compare_equal() {
            let a = HeadersCondition::new(vec!["X-A=1".to_string(), "x-b".to_string()]);
            let b = HeadersCondition::new(vec!["x-b".to_string(), "x-a=1".to_string()]);
            assert_eq!(a, b);
        }
    }
}
