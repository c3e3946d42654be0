use crate::channel::SharedChannel;
use crate::path;
use serde_json::Value;
use std::borrow::Cow;
use std::cell::{Cell, OnceCell};
use std::collections::BTreeMap;
use std::rc::Rc;
use tracing::debug;

/// Reserved key under which the shared channel is visible to paths and templates
pub const SHARED_KEY: &str = "$shared";

/// Runtime data a schema is resolved against.
///
/// Built fresh for each render pass. Data is read-only once rendering starts;
/// the only mutable part is the shared channel, which is created on first
/// access and keeps its identity for the lifetime of the context.
///
/// Derived values sit in a small overlay of top-level keys that shadows the
/// root data. Child scopes share the root data and the overlay entries.
#[derive(Debug, Default)]
pub struct DataContext {
    data: Rc<Value>,
    derived: BTreeMap<String, Rc<Value>>,
    channel: OnceCell<SharedChannel>,
    lookups: Cell<usize>,
}

impl DataContext {
    pub fn new(data: Value) -> Self {
        Self {
            data: Rc::new(data),
            derived: BTreeMap::new(),
            channel: OnceCell::new(),
            lookups: Cell::new(0),
        }
    }

    /// Inject a derived value under a top-level key
    pub fn with_derived(mut self, key: &str, value: Value) -> Self {
        self.derived.insert(key.to_string(), Rc::new(value));
        self
    }

    /// Share an existing channel instead of creating one lazily
    pub fn with_channel(self, channel: SharedChannel) -> Self {
        // A fresh context has no channel yet, so this cannot fail
        let _ = self.channel.set(channel);
        self
    }

    /// Child context for rendering one item of a collection.
    ///
    /// The item is visible under `key`. Parent and child share one channel,
    /// initializing it here if nothing has touched it yet.
    pub fn scoped(&self, key: &str, item: Value) -> DataContext {
        let mut derived = self.derived.clone();
        derived.insert(key.to_string(), Rc::new(item));
        DataContext {
            data: Rc::clone(&self.data),
            derived,
            channel: OnceCell::new(),
            lookups: Cell::new(0),
        }
        .with_channel(self.channel().clone())
    }

    /// Root data, without derived values
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Resolve a dot path. Paths under `$shared` read the live channel.
    pub fn resolve(&self, path: &str) -> Option<Cow<'_, Value>> {
        self.lookups.set(self.lookups.get() + 1);
        let path = path.trim();
        let (head, rest) = path::split_first(path);
        if head == SHARED_KEY {
            let shared = self.channel().snapshot().to_value();
            return path::resolve(&shared, rest).cloned().map(Cow::Owned);
        }
        if let Some(value) = self.derived.get(head) {
            return path::resolve(value, rest).map(Cow::Borrowed);
        }
        path::resolve(&self.data, path).map(Cow::Borrowed)
    }

    /// Resolve a path and check it holds present data
    pub fn has_data(&self, path: &str) -> bool {
        self.resolve(path)
            .map(|v| path::is_present(&v))
            .unwrap_or(false)
    }

    /// The shared channel, created with defaults on first access
    pub fn channel(&self) -> &SharedChannel {
        self.channel.get_or_init(|| {
            debug!("Initializing shared channel with defaults");
            SharedChannel::new()
        })
    }

    /// The shared channel, only if something has already created it
    pub fn existing_channel(&self) -> Option<&SharedChannel> {
        self.channel.get()
    }

    /// Number of path lookups performed through this context
    pub fn lookup_count(&self) -> usize {
        self.lookups.get()
    }
}
