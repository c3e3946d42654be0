use crate::error::RenderResult;
use crate::handlers;
use crate::renderer::Scope;
use crate::vdom::RenderNode;
use std::collections::HashMap;
use survey_dash_schema::ComponentDescriptor;

/// Component handler.
///
/// Receives the enriched descriptor and a scope giving access to the data
/// context, the presentation layer and child rendering. `Ok(None)` renders
/// nothing without a diagnostic; `Err` renders nothing and is reported.
pub type Handler = fn(&ComponentDescriptor, &Scope<'_>) -> RenderResult<Option<RenderNode>>;

/// Whether `pattern` covers `tag`. `family:*` covers every `family:<variant>`.
pub fn tag_matches(pattern: &str, tag: &str) -> bool {
    if pattern == tag {
        return true;
    }
    match pattern.strip_suffix('*') {
        Some(prefix) if prefix.ends_with(':') => tag.starts_with(prefix) && tag.len() > prefix.len(),
        _ => false,
    }
}

/// Family wildcard for a `family:variant` tag
fn family_pattern(tag: &str) -> Option<String> {
    tag.split_once(':').map(|(family, _)| format!("{}:*", family))
}

/// Mapping from component type tag to handler.
///
/// New component kinds are added by registering a handler, never by editing
/// the renderer.
#[derive(Clone)]
pub struct Registry {
    handlers: HashMap<String, Handler>,
}

impl Registry {
    /// Registry with every built-in handler
    pub fn new() -> Self {
        let mut registry = Self::empty();
        handlers::register_builtins(&mut registry);
        registry
    }

    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register `handler` for `tag`, returning the handler it replaces
    pub fn register(&mut self, tag: impl Into<String>, handler: Handler) -> Option<Handler> {
        self.handlers.insert(tag.into(), handler)
    }

    pub fn unregister(&mut self, tag: &str) -> Option<Handler> {
        self.handlers.remove(tag)
    }

    /// Handler for `tag`: an exact registration first, then its family wildcard
    pub fn get(&self, tag: &str) -> Option<Handler> {
        if let Some(handler) = self.handlers.get(tag) {
            return Some(*handler);
        }
        family_pattern(tag).and_then(|pattern| self.handlers.get(&pattern).copied())
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.get(tag).is_some()
    }

    /// Registered tags, sorted
    pub fn type_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self.handlers.keys().cloned().collect();
        tags.sort();
        tags
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("types", &self.type_tags())
            .finish()
    }
}
