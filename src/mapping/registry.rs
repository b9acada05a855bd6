//! Registration bookkeeping and best-match lookup.

use std::cmp::Ordering;
use std::collections::HashMap;

use indexmap::IndexMap;

use super::component::HandlerComponent;
use super::error::{RegistrationError, ResolveError};
use super::handler::HandlerMethod;
use super::strategy::MappingStrategy;
use crate::request::{LookupPathHelper, RouteRequest};

/// Mutable registration phase of the registry.
///
/// Collects mappings from components, rejects conflicts, then freezes into
/// an immutable [`MappingRegistry`].
pub struct MappingRegistryBuilder<S: MappingStrategy> {
    strategy: S,
    path_helper: LookupPathHelper,
    /// Primary index, kept in registration order.
    handlers: IndexMap<S::Mapping, HandlerMethod>,
    /// Slots in `handlers`, keyed by literal request path. One path can
    /// serve several mappings that differ in other conditions.
    url_index: HashMap<String, Vec<usize>>,
}

impl<S: MappingStrategy> MappingRegistryBuilder<S> {
    pub fn new(strategy: S) -> Self {
        Self::with_path_helper(strategy, LookupPathHelper::default())
    }

    pub fn with_path_helper(strategy: S, path_helper: LookupPathHelper) -> Self {
        Self {
            strategy,
            path_helper,
            handlers: IndexMap::new(),
            url_index: HashMap::new(),
        }
    }

    /// Detects and registers every handler method of one component.
    /// Returns how many methods were registered.
    pub fn detect(
        &mut self,
        component: &dyn HandlerComponent<S::Attributes>,
    ) -> Result<usize, RegistrationError> {
        if !self.strategy.is_handler(component) {
            return Ok(0);
        }
        let mut registered = 0;
        for def in component.handler_methods() {
            let Some(mapping) = self.strategy.mapping_for_method(component, &def) else {
                continue;
            };
            let handler = HandlerMethod::new(component.name(), def.method_name(), def.callable());
            self.register(mapping, handler)?;
            registered += 1;
        }
        tracing::debug!(component = component.name(), registered, "detected handler methods");
        Ok(registered)
    }

    /// Registers one mapping, indexed under the literal lookup paths the
    /// strategy derives from it.
    pub fn register(
        &mut self,
        mapping: S::Mapping,
        handler: HandlerMethod,
    ) -> Result<(), RegistrationError> {
        let paths = self.strategy.direct_paths(&mapping);
        self.register_with_paths(paths, mapping, handler)
    }

    /// Registers one mapping under explicitly given literal lookup paths.
    /// Re-registering the same handler under the same mapping is a no-op; a
    /// different handler under an equal mapping is a fatal conflict.
    ///
    /// Paths must be literal: anything pushed here is looked up by exact
    /// string comparison, never pattern-matched.
    pub fn register_with_paths(
        &mut self,
        paths: Vec<String>,
        mapping: S::Mapping,
        handler: HandlerMethod,
    ) -> Result<(), RegistrationError> {
        if let Some(existing) = self.handlers.get(&mapping) {
            if *existing == handler {
                tracing::debug!(mapping = %mapping, handler = %handler, "already registered");
                return Ok(());
            }
            return Err(RegistrationError::DuplicateMapping {
                mapping: mapping.to_string(),
                existing: existing.to_string(),
                incoming: handler.to_string(),
            });
        }

        tracing::info!(mapping = %mapping, handler = %handler, "mapped handler method");
        let (slot, _) = self.handlers.insert_full(mapping, handler);
        for path in paths {
            self.url_index.entry(path).or_default().push(slot);
        }
        Ok(())
    }

    /// Freezes the registry. No registration is possible afterwards, and
    /// lookups need no synchronization.
    pub fn freeze(self) -> MappingRegistry<S> {
        tracing::info!(mappings = self.handlers.len(), "mapping registry frozen");
        MappingRegistry {
            strategy: self.strategy,
            path_helper: self.path_helper,
            handlers: self.handlers,
            url_index: self.url_index,
        }
    }
}

/// Immutable resolution phase. Lookups take `&self`, so a frozen registry
/// can be shared across tasks without locking.
pub struct MappingRegistry<S: MappingStrategy> {
    strategy: S,
    path_helper: LookupPathHelper,
    handlers: IndexMap<S::Mapping, HandlerMethod>,
    url_index: HashMap<String, Vec<usize>>,
}

/// One candidate that survived narrowing, paired with its handler.
struct Match<'a, M> {
    mapping: M,
    handler: &'a HandlerMethod,
}

impl<S: MappingStrategy> MappingRegistry<S> {
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// All registered mappings with their handler methods, in registration
    /// order.
    pub fn handler_methods(&self) -> impl Iterator<Item = (&S::Mapping, &HandlerMethod)> {
        self.handlers.iter()
    }

    /// Resolves a request to its best-matching handler method.
    ///
    /// `Ok(None)` means nothing matched and the strategy raised no
    /// objection; the errors carry ambiguity and typed near-miss rejections.
    pub fn resolve(
        &self,
        request: &mut RouteRequest,
    ) -> Result<Option<HandlerMethod>, ResolveError> {
        let lookup_path = self.path_helper.lookup_path(request.path());
        tracing::debug!(path = %lookup_path, method = %request.method(), "looking up handler method");
        self.lookup_handler_method(&lookup_path, request)
    }

    /// Resolves against an already-normalized lookup path, bypassing the
    /// path helper. [`resolve`](Self::resolve) is this plus normalization.
    pub fn lookup_handler_method(
        &self,
        lookup_path: &str,
        request: &mut RouteRequest,
    ) -> Result<Option<HandlerMethod>, ResolveError> {
        let mut matches: Vec<Match<'_, S::Mapping>> = Vec::new();

        // Direct candidates first; the full scan only runs when the path has
        // no literal index entry at all.
        if let Some(slots) = self.url_index.get(lookup_path) {
            for &slot in slots {
                if let Some((mapping, handler)) = self.handlers.get_index(slot) {
                    self.add_matching(mapping, handler, lookup_path, request, &mut matches);
                }
            }
        } else {
            for (mapping, handler) in &self.handlers {
                self.add_matching(mapping, handler, lookup_path, request, &mut matches);
            }
        }

        if matches.is_empty() {
            let all: Vec<&S::Mapping> = self.handlers.keys().collect();
            return self.strategy.on_no_match(&all, lookup_path, request);
        }

        // Stable sort: equal candidates keep registration order, which makes
        // the ambiguity check below deterministic.
        matches.sort_by(|a, b| {
            self.strategy
                .compare_mappings(&a.mapping, &b.mapping, lookup_path, request)
        });
        tracing::trace!(path = %lookup_path, count = matches.len(), "matching mappings");

        if matches.len() > 1 {
            let (best, second) = (&matches[0], &matches[1]);
            let order =
                self.strategy
                    .compare_mappings(&best.mapping, &second.mapping, lookup_path, request);
            if order == Ordering::Equal {
                return Err(ResolveError::Ambiguous {
                    path: lookup_path.to_string(),
                    first: best.handler.to_string(),
                    second: second.handler.to_string(),
                });
            }
        }

        let best = matches.swap_remove(0);
        self.strategy.on_match(&best.mapping, lookup_path, request);
        tracing::debug!(path = %lookup_path, handler = %best.handler, "resolved handler method");
        Ok(Some(best.handler.clone()))
    }

    fn add_matching<'a>(
        &self,
        mapping: &S::Mapping,
        handler: &'a HandlerMethod,
        lookup_path: &str,
        request: &RouteRequest,
        matches: &mut Vec<Match<'a, S::Mapping>>,
    ) {
        if let Some(narrowed) = self.strategy.matching_mapping(mapping, lookup_path, request) {
            matches.push(Match {
                mapping: narrowed,
                handler,
            });
        }
    }
}
