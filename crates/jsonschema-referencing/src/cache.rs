//! The mutable, per-URI schema cache.
//!
//! Every registered or retrieved schema gets one [`SchemaHandle`], keyed by
//! its normalised URI. Handles are never removed by invalidation, only
//! reset, so a reader holding a borrowed resolved schema keeps seeing the
//! old content until it re-resolves (see the crate-level docs for the
//! concurrency rationale).
use std::cell::RefCell;

use ahash::{AHashMap, AHashSet};
use serde_json::Value;

use crate::anchors::{self, AnchorIndex};
use crate::error::Error;
use crate::glob::PatternSet;
use crate::retriever::Retrieve;
use crate::uri;

/// Per-URI cache entry: lazily-populated unresolved and resolved content,
/// the set of external `$ref` targets this schema depends on, and a lazily
/// built anchor index.
#[derive(Default)]
pub struct SchemaHandle {
    unresolved: RefCell<Option<Value>>,
    resolved: RefCell<Option<Value>>,
    anchors: RefCell<Option<AnchorIndex>>,
    dependencies: RefCell<AHashSet<String>>,
    load_error: RefCell<Option<String>>,
}

impl SchemaHandle {
    #[must_use]
    pub fn unresolved(&self) -> Option<Value> {
        self.unresolved.borrow().clone()
    }

    #[must_use]
    pub fn resolved(&self) -> Option<Value> {
        self.resolved.borrow().clone()
    }

    /// The error message recorded the last time loading this resource failed,
    /// if the current unresolved content is a placeholder.
    #[must_use]
    pub fn load_error(&self) -> Option<String> {
        self.load_error.borrow().clone()
    }

    pub fn set_resolved(&self, value: Value) {
        *self.resolved.borrow_mut() = Some(value);
    }

    pub fn dependencies(&self) -> Vec<String> {
        self.dependencies.borrow().iter().cloned().collect()
    }

    pub fn add_dependency(&self, uri: String) {
        self.dependencies.borrow_mut().insert(uri);
    }

    fn invalidate(&self) {
        *self.unresolved.borrow_mut() = None;
        *self.resolved.borrow_mut() = None;
        *self.anchors.borrow_mut() = None;
        self.dependencies.borrow_mut().clear();
    }

    pub fn anchor_index(&self, build_duplicate_sink: &mut dyn FnMut(&str)) -> AnchorIndex {
        if let Some(index) = self.anchors.borrow().as_ref() {
            return index.clone();
        }
        let root = self.unresolved.borrow().clone().unwrap_or(Value::Null);
        let index = anchors::build(&root, build_duplicate_sink);
        *self.anchors.borrow_mut() = Some(index.clone());
        index
    }
}

struct Association {
    patterns: PatternSet,
    uri: String,
}

/// The schema registry: registered/retrieved schema content, file-pattern
/// associations, and the per-resource memoisation table.
pub struct Registry {
    retriever: Box<dyn Retrieve>,
    handles: RefCell<AHashMap<String, SchemaHandle>>,
    contributed: RefCell<AHashMap<String, Value>>,
    external: RefCell<AHashMap<String, Value>>,
    contributed_associations: RefCell<Vec<Association>>,
    external_associations: RefCell<Vec<Association>>,
    dependents: RefCell<AHashMap<String, AHashSet<String>>>,
    resource_cache: RefCell<AHashMap<String, Value>>,
}

impl Registry {
    #[must_use]
    pub fn new(retriever: Box<dyn Retrieve>) -> Self {
        Registry {
            retriever,
            handles: RefCell::new(AHashMap::default()),
            contributed: RefCell::new(AHashMap::default()),
            external: RefCell::new(AHashMap::default()),
            contributed_associations: RefCell::new(Vec::new()),
            external_associations: RefCell::new(Vec::new()),
            dependents: RefCell::new(AHashMap::default()),
            resource_cache: RefCell::new(AHashMap::default()),
        }
    }

    /// Registers an externally supplied schema, optionally with file-match globs.
    pub fn register_external(&self, raw_uri: &str, schema: Value, file_match: &[String]) {
        let uri = uri::normalize(raw_uri);
        self.external.borrow_mut().insert(uri.clone(), schema);
        if !file_match.is_empty() {
            self.external_associations.borrow_mut().push(Association {
                patterns: PatternSet::new(file_match),
                uri: uri.clone(),
            });
        }
        self.invalidate_resource_cache();
    }

    /// Registers a contributed schema set entry: inline schema content plus
    /// the resource-pattern associations that route to it.
    pub fn register_contributed(&self, raw_uri: &str, schema: Value, file_match: &[String]) {
        let uri = uri::normalize(raw_uri);
        self.contributed.borrow_mut().insert(uri.clone(), schema);
        if !file_match.is_empty() {
            self.contributed_associations.borrow_mut().push(Association {
                patterns: PatternSet::new(file_match),
                uri,
            });
        }
        self.invalidate_resource_cache();
    }

    /// Clears all externally registered schemas and associations, restoring
    /// only the contributed set.
    pub fn clear_external(&self) {
        self.external.borrow_mut().clear();
        self.external_associations.borrow_mut().clear();
        self.invalidate_resource_cache();
    }

    fn invalidate_resource_cache(&self) {
        self.resource_cache.borrow_mut().clear();
    }

    /// Returns the unresolved (not-yet-`$ref`-followed) content for `uri`,
    /// fetching it via the retriever if it isn't already registered or cached.
    /// On fetch failure, caches and returns an empty placeholder schema.
    pub fn get_unresolved_schema(&self, raw_uri: &str) -> Value {
        let uri = uri::normalize(raw_uri);
        if let Some(value) = self.handles.borrow().get(&uri).and_then(SchemaHandle::unresolved) {
            return value;
        }
        let loaded = self
            .external
            .borrow()
            .get(&uri)
            .or_else(|| self.contributed.borrow().get(&uri))
            .cloned();
        let (value, error) = match loaded {
            Some(value) => (value, None),
            None => match self.retriever.retrieve(&uri) {
                Ok(value) => (value, None),
                Err(err) => (Value::Object(serde_json::Map::new()), Some(err.to_string())),
            },
        };
        let mut handles = self.handles.borrow_mut();
        let handle = handles.entry(uri).or_default();
        *handle.unresolved.borrow_mut() = Some(value.clone());
        *handle.load_error.borrow_mut() = error;
        value
    }

    pub fn handle(&self, raw_uri: &str) -> Option<()> {
        let uri = uri::normalize(raw_uri);
        self.handles.borrow().get(&uri).map(|_| ())
    }

    pub fn with_handle<R>(&self, raw_uri: &str, f: impl FnOnce(&SchemaHandle) -> R) -> R {
        let uri = uri::normalize(raw_uri);
        self.get_unresolved_schema(&uri);
        let handles = self.handles.borrow();
        f(handles.get(&uri).expect("just populated above"))
    }

    pub fn record_dependency(&self, declaring_uri: &str, dependency_uri: &str) {
        let declaring = uri::normalize(declaring_uri);
        let dependency = uri::normalize(dependency_uri);
        self.with_handle(&declaring, |h| h.add_dependency(dependency.clone()));
        self.dependents.borrow_mut().entry(dependency).or_default().insert(declaring);
    }

    /// Walks the dependency graph transitively from `uri`, resetting every
    /// affected handle and dropping the per-resource memoisation table.
    pub fn on_resource_change(&self, raw_uri: &str) {
        let root = uri::normalize(raw_uri);
        let mut stack = vec![root];
        let mut seen = AHashSet::default();
        while let Some(current) = stack.pop() {
            if !seen.insert(current.clone()) {
                continue;
            }
            if let Some(handle) = self.handles.borrow().get(&current) {
                handle.invalidate();
            }
            if let Some(dependents) = self.dependents.borrow().get(&current) {
                stack.extend(dependents.iter().cloned());
            }
        }
        self.invalidate_resource_cache();
    }

    /// Resolves the schema that should be used to validate `resource_uri`,
    /// per the priority rule: the document's own `$schema` wins, otherwise
    /// file-pattern associations are combined. Memoised until invalidation.
    pub fn schema_for_resource(&self, resource_uri: &str, document_schema_ref: Option<&str>) -> Option<Value> {
        if let Some(cached) = self.resource_cache.borrow().get(resource_uri) {
            return Some(cached.clone());
        }
        let result = if let Some(schema_ref) = document_schema_ref {
            let resolved = uri::resolve(resource_uri, schema_ref, None).ok()?;
            Some(serde_json::json!({ "$ref": resolved }))
        } else {
            let matches = self.matching_associations(resource_uri);
            match matches.len() {
                0 => None,
                1 => Some(serde_json::json!({ "$ref": matches[0] })),
                _ => {
                    let combined_uri = Self::combined_schema_uri(resource_uri);
                    let combined = serde_json::json!({
                        "allOf": matches.iter().map(|u| serde_json::json!({ "$ref": u })).collect::<Vec<_>>()
                    });
                    self.external.borrow_mut().insert(combined_uri.clone(), combined);
                    Some(serde_json::json!({ "$ref": combined_uri }))
                }
            }
        };
        if let Some(value) = &result {
            self.resource_cache.borrow_mut().insert(resource_uri.to_string(), value.clone());
        }
        result
    }

    fn matching_associations(&self, resource_uri: &str) -> Vec<String> {
        let mut matches = Vec::new();
        for assoc in self.contributed_associations.borrow().iter().chain(self.external_associations.borrow().iter()) {
            if assoc.patterns.matches(resource_uri) {
                matches.push(assoc.uri.clone());
            }
        }
        matches
    }

    /// A synthetic URI identifying the combined schema for a resource with
    /// more than one file-pattern match.
    #[must_use]
    pub fn combined_schema_uri(resource_uri: &str) -> String {
        format!("schemaservice://combinedSchema/{}", percent_encoding::utf8_percent_encode(resource_uri, percent_encoding::NON_ALPHANUMERIC))
    }
}
