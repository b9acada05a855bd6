//! The pluggable mapping strategy seam.

use std::cmp::Ordering;
use std::fmt::{Debug, Display};
use std::hash::Hash;

use super::component::{HandlerComponent, HandlerMethodDef};
use super::error::ResolveError;
use super::handler::HandlerMethod;
use crate::request::RouteRequest;

/// Defines what a mapping is and how it behaves against requests.
///
/// The registry owns the bookkeeping: indexes, duplicate detection, the
/// freeze. The semantics live here instead, from deriving a mapping off a
/// component method to matching and ranking it against a request, so the
/// same registry machinery can serve different mapping schemes.
pub trait MappingStrategy: Send + Sync + 'static {
    /// The mapping key. Equality of keys defines duplicate registration.
    type Mapping: Clone + Eq + Hash + Debug + Display + Send + Sync + 'static;

    /// Attribute type that components annotate their methods with.
    type Attributes;

    /// Whether the component contributes handler methods at all.
    fn is_handler(&self, component: &dyn HandlerComponent<Self::Attributes>) -> bool;

    /// Derives the mapping key for one declared method, `None` to skip it.
    fn mapping_for_method(
        &self,
        component: &dyn HandlerComponent<Self::Attributes>,
        def: &HandlerMethodDef<Self::Attributes>,
    ) -> Option<Self::Mapping>;

    /// Literal request paths under which the mapping is directly indexed.
    /// Must not contain pattern syntax; pattern-only mappings return none.
    fn direct_paths(&self, mapping: &Self::Mapping) -> Vec<String>;

    /// Checks one candidate against the request. On a match, returns a
    /// mapping narrowed to exactly the conditions that matched, so the
    /// comparator sees what was actually relevant; `None` on mismatch.
    fn matching_mapping(
        &self,
        mapping: &Self::Mapping,
        lookup_path: &str,
        request: &RouteRequest,
    ) -> Option<Self::Mapping>;

    /// Orders two narrowed mappings for the given request, best first.
    fn compare_mappings(
        &self,
        left: &Self::Mapping,
        right: &Self::Mapping,
        lookup_path: &str,
        request: &RouteRequest,
    ) -> Ordering;

    /// Invoked with the winning narrowed mapping before the handler is
    /// returned. Strategies use it to deposit extracted request state, such
    /// as path variables.
    fn on_match(&self, _mapping: &Self::Mapping, _lookup_path: &str, _request: &mut RouteRequest) {}

    /// Invoked with every registered mapping when nothing matched. May
    /// return a typed rejection describing the near miss, a substitute
    /// handler, or `Ok(None)` to fall through to plain not-found.
    fn on_no_match(
        &self,
        _mappings: &[&Self::Mapping],
        _lookup_path: &str,
        _request: &RouteRequest,
    ) -> Result<Option<HandlerMethod>, ResolveError> {
        Ok(None)
    }
}
