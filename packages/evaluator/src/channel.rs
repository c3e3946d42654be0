//! Cross-component state shared through the data context.
//!
//! Filter pills and word-cloud toggles write here; tables, lists and word
//! clouds rendered elsewhere in the tree read from here. Which producers and
//! consumers exist depends on the schema, so the channel is created by
//! whichever side touches it first.
//!
//! Readers can either subscribe for push notifications or hold a
//! [`ChannelPoller`] and check for changes on their own schedule. A poller
//! observes a write at its next poll, which bounds staleness to one polling
//! interval.
//!
//! Everything here is single-threaded (`Rc`/`RefCell`). Each writer owns one
//! field and never touches the other.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::{debug, trace};

/// Filter value meaning "no filtering"
pub const FILTER_ALL: &str = "all";

/// Field values of the channel at one point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSnapshot {
    pub filter_value: String,
    pub toggle_value: bool,
}

impl Default for ChannelSnapshot {
    fn default() -> Self {
        Self {
            filter_value: String::new(),
            toggle_value: true,
        }
    }
}

impl ChannelSnapshot {
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "filterValue": self.filter_value,
            "toggleValue": self.toggle_value,
        })
    }

    /// The active filter, if any. Empty and `all` mean no filtering.
    pub fn active_filter(&self) -> Option<&str> {
        let value = self.filter_value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case(FILTER_ALL) {
            None
        } else {
            Some(value)
        }
    }
}

type Setter<T> = Rc<dyn Fn(T)>;
type Listener = Rc<dyn Fn(&ChannelSnapshot)>;

struct ChannelInner {
    state: RefCell<ChannelSnapshot>,
    filter_setter: RefCell<Option<Setter<String>>>,
    toggle_setter: RefCell<Option<Setter<bool>>>,
    listeners: RefCell<Vec<(u64, Listener)>>,
    next_listener: Cell<u64>,
}

/// Handle to the shared channel. Clones share one underlying state.
#[derive(Clone)]
pub struct SharedChannel {
    inner: Rc<ChannelInner>,
}

impl fmt::Debug for SharedChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedChannel")
            .field("state", &*self.inner.state.borrow())
            .field("listeners", &self.inner.listeners.borrow().len())
            .finish()
    }
}

impl Default for SharedChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedChannel {
    pub fn new() -> Self {
        Self::with_state(ChannelSnapshot::default())
    }

    pub fn with_state(state: ChannelSnapshot) -> Self {
        Self {
            inner: Rc::new(ChannelInner {
                state: RefCell::new(state),
                filter_setter: RefCell::new(None),
                toggle_setter: RefCell::new(None),
                listeners: RefCell::new(Vec::new()),
                next_listener: Cell::new(0),
            }),
        }
    }

    /// Whether two handles point at the same channel
    pub fn ptr_eq(a: &SharedChannel, b: &SharedChannel) -> bool {
        Rc::ptr_eq(&a.inner, &b.inner)
    }

    pub fn downgrade(&self) -> WeakChannel {
        WeakChannel {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn snapshot(&self) -> ChannelSnapshot {
        self.inner.state.borrow().clone()
    }

    pub fn filter_value(&self) -> String {
        self.inner.state.borrow().filter_value.clone()
    }

    pub fn toggle_value(&self) -> bool {
        self.inner.state.borrow().toggle_value
    }

    /// Set the filter through the currently bound setter.
    ///
    /// When a writer is attached this reaches the writer first, so its local
    /// state stays in step with the channel.
    pub fn set_filter_value(&self, value: impl Into<String>) {
        let value = value.into();
        let setter = self.inner.filter_setter.borrow().clone();
        match setter {
            Some(setter) => setter(value),
            None => self.write_filter(value),
        }
    }

    /// Set the toggle through the currently bound setter
    pub fn set_toggle_value(&self, value: bool) {
        let setter = self.inner.toggle_setter.borrow().clone();
        match setter {
            Some(setter) => setter(value),
            None => self.write_toggle(value),
        }
    }

    pub fn bind_filter_setter(&self, setter: Setter<String>) {
        *self.inner.filter_setter.borrow_mut() = Some(setter);
    }

    pub fn bind_toggle_setter(&self, setter: Setter<bool>) {
        *self.inner.toggle_setter.borrow_mut() = Some(setter);
    }

    /// Write the filter field directly, bypassing bound setters
    pub fn write_filter(&self, value: String) {
        let changed = {
            let mut state = self.inner.state.borrow_mut();
            if state.filter_value == value {
                false
            } else {
                state.filter_value = value;
                true
            }
        };
        if changed {
            trace!(filter = %self.filter_value(), "Shared filter updated");
            self.notify();
        }
    }

    /// Write the toggle field directly, bypassing bound setters
    pub fn write_toggle(&self, value: bool) {
        let changed = {
            let mut state = self.inner.state.borrow_mut();
            let changed = state.toggle_value != value;
            state.toggle_value = value;
            changed
        };
        if changed {
            trace!(toggle = value, "Shared toggle updated");
            self.notify();
        }
    }

    /// Register a change listener. The listener stays registered until the
    /// returned [`Subscription`] is dropped.
    pub fn subscribe(&self, listener: impl Fn(&ChannelSnapshot) + 'static) -> Subscription {
        let id = self.inner.next_listener.get();
        self.inner.next_listener.set(id + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));
        debug!(subscription = id, "Shared channel listener added");
        Subscription {
            channel: self.downgrade(),
            id,
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    fn unsubscribe(&self, id: u64) {
        self.inner.listeners.borrow_mut().retain(|(l, _)| *l != id);
    }

    fn notify(&self) {
        let snapshot = self.snapshot();
        // Listeners may read or write the channel, so release the borrow first
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in listeners {
            listener(&snapshot);
        }
    }
}

/// Non-owning channel handle, held by setters bound into the channel itself
#[derive(Clone)]
pub struct WeakChannel {
    inner: Weak<ChannelInner>,
}

impl WeakChannel {
    pub fn upgrade(&self) -> Option<SharedChannel> {
        self.inner.upgrade().map(|inner| SharedChannel { inner })
    }
}

/// Listener registration; dropping it removes the listener
pub struct Subscription {
    channel: WeakChannel,
    id: u64,
}

impl Subscription {
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(channel) = self.channel.upgrade() {
            channel.unsubscribe(self.id);
            debug!(subscription = self.id, "Shared channel listener removed");
        }
    }
}

/// Pull-based change detection over a channel.
///
/// `poll` reports a snapshot only when it differs from the one seen at the
/// previous poll (or at construction).
pub struct ChannelPoller {
    channel: SharedChannel,
    last: ChannelSnapshot,
}

impl ChannelPoller {
    pub fn new(channel: SharedChannel) -> Self {
        let last = channel.snapshot();
        Self { channel, last }
    }

    pub fn poll(&mut self) -> Option<ChannelSnapshot> {
        let current = self.channel.snapshot();
        if current == self.last {
            return None;
        }
        self.last = current.clone();
        Some(current)
    }

    pub fn last_seen(&self) -> &ChannelSnapshot {
        &self.last
    }
}

/// Writer owning the filter field (a row of filter pills)
pub struct FilterControl {
    selected: Rc<RefCell<String>>,
    channel: SharedChannel,
}

impl FilterControl {
    /// Attach to the channel and take over its filter setter
    pub fn attach(channel: &SharedChannel) -> Self {
        let control = Self {
            selected: Rc::new(RefCell::new(channel.filter_value())),
            channel: channel.clone(),
        };
        control.bind();
        control
    }

    /// Change the selection, updating local state and the channel
    pub fn select(&self, value: impl Into<String>) {
        let value = value.into();
        *self.selected.borrow_mut() = value.clone();
        self.channel.write_filter(value);
        self.bind();
    }

    pub fn selected(&self) -> String {
        self.selected.borrow().clone()
    }

    fn bind(&self) {
        let local = Rc::downgrade(&self.selected);
        let channel = self.channel.downgrade();
        self.channel.bind_filter_setter(Rc::new(move |value: String| {
            if let Some(local) = local.upgrade() {
                *local.borrow_mut() = value.clone();
            }
            if let Some(channel) = channel.upgrade() {
                channel.write_filter(value);
            }
        }));
    }
}

/// Writer owning the toggle field (word cloud show/hide)
pub struct ToggleControl {
    on: Rc<Cell<bool>>,
    channel: SharedChannel,
}

impl ToggleControl {
    pub fn attach(channel: &SharedChannel) -> Self {
        let control = Self {
            on: Rc::new(Cell::new(channel.toggle_value())),
            channel: channel.clone(),
        };
        control.bind();
        control
    }

    pub fn set(&self, on: bool) {
        self.on.set(on);
        self.channel.write_toggle(on);
        self.bind();
    }

    pub fn toggle(&self) {
        self.set(!self.on.get());
    }

    pub fn is_on(&self) -> bool {
        self.on.get()
    }

    fn bind(&self) {
        let local = Rc::downgrade(&self.on);
        let channel = self.channel.downgrade();
        self.channel.bind_toggle_setter(Rc::new(move |value: bool| {
            if let Some(local) = local.upgrade() {
                local.set(value);
            }
            if let Some(channel) = channel.upgrade() {
                channel.write_toggle(value);
            }
        }));
    }
}
