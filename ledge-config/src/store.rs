//! The settings-store contract the engine consumes.
//!
//! Hosts back this with whatever their platform provides (GSettings, dconf,
//! flat files); [`MemoryStore`] backs tests and embedders without a native
//! store. The engine itself only ever reads; all writes are user-initiated
//! through a preferences surface.

use std::collections::HashMap;

use crate::keys;

/// Handle returned by [`SettingsStore::connect_changed`].
pub type SignalId = u64;

/// Callback invoked with the key that changed.
pub type ChangedCallback = Box<dyn FnMut(&str)>;

/// Key/value store with change notification, namespaced string keys.
pub trait SettingsStore {
    fn get_int(&self, key: &str) -> Option<i64>;
    fn get_bool(&self, key: &str) -> Option<bool>;
    fn get_string(&self, key: &str) -> Option<String>;

    /// Setters validate at this boundary; invalid writes are logged and
    /// skipped so readers never observe an invalid value.
    fn set_int(&mut self, key: &str, value: i64);
    fn set_bool(&mut self, key: &str, value: bool);
    fn set_string(&mut self, key: &str, value: &str);

    fn connect_changed(&mut self, key: &str, callback: ChangedCallback) -> SignalId;
    fn disconnect(&mut self, id: SignalId);
}

#[derive(Debug, Clone, PartialEq)]
enum Value {
    Int(i64),
    Bool(bool),
    Str(String),
}

/// In-memory [`SettingsStore`] with change fan-out.
#[derive(Default)]
pub struct MemoryStore {
    values: HashMap<String, Value>,
    subscribers: Vec<Subscriber>,
    next_signal: SignalId,
}

struct Subscriber {
    id: SignalId,
    key: String,
    callback: ChangedCallback,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn set(&mut self, key: &str, value: Value) {
        if self.values.get(key) == Some(&value) {
            return;
        }
        self.values.insert(key.to_owned(), value);
        self.notify(key);
    }

    fn notify(&mut self, key: &str) {
        for sub in &mut self.subscribers {
            if sub.key == key {
                (sub.callback)(key);
            }
        }
    }
}

impl SettingsStore for MemoryStore {
    fn get_int(&self, key: &str) -> Option<i64> {
        match self.values.get(key) {
            Some(Value::Int(v)) => Some(*v),
            _ => None,
        }
    }

    fn get_bool(&self, key: &str) -> Option<bool> {
        match self.values.get(key) {
            Some(Value::Bool(v)) => Some(*v),
            _ => None,
        }
    }

    fn get_string(&self, key: &str) -> Option<String> {
        match self.values.get(key) {
            Some(Value::Str(v)) => Some(v.clone()),
            _ => None,
        }
    }

    fn set_int(&mut self, key: &str, value: i64) {
        if !keys::validate_int(key, value) {
            warn!("rejecting out-of-range write {value} for {key:?}");
            return;
        }
        self.set(key, Value::Int(value));
    }

    fn set_bool(&mut self, key: &str, value: bool) {
        self.set(key, Value::Bool(value));
    }

    fn set_string(&mut self, key: &str, value: &str) {
        if !keys::validate_string(key, value) {
            warn!("rejecting invalid write for {key:?}");
            return;
        }
        self.set(key, Value::Str(value.to_owned()));
    }

    fn connect_changed(&mut self, key: &str, callback: ChangedCallback) -> SignalId {
        let id = self.next_signal;
        self.next_signal += 1;
        self.subscribers.push(Subscriber {
            id,
            key: key.to_owned(),
            callback,
        });
        id
    }

    fn disconnect(&mut self, id: SignalId) {
        self.subscribers.retain(|sub| sub.id != id);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn change_notification_fires_per_key() {
        let mut store = MemoryStore::new();
        let hits = Rc::new(Cell::new(0));

        let hits2 = hits.clone();
        store.connect_changed(keys::INTELLIHIDE, Box::new(move |_| hits2.set(hits2.get() + 1)));

        store.set_bool(keys::INTELLIHIDE, true);
        store.set_bool("some-other-key", true);
        assert_eq!(hits.get(), 1);

        // Same value, no notification.
        store.set_bool(keys::INTELLIHIDE, true);
        assert_eq!(hits.get(), 1);

        store.set_bool(keys::INTELLIHIDE, false);
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn invalid_write_is_skipped_silently() {
        let mut store = MemoryStore::new();
        store.set_string(keys::PANEL_SIZES, r#"{"0": 48}"#);
        store.set_string(keys::PANEL_SIZES, "{broken");
        assert_eq!(
            store.get_string(keys::PANEL_SIZES).as_deref(),
            Some(r#"{"0": 48}"#)
        );
    }

    #[test]
    fn disconnect_stops_delivery() {
        let mut store = MemoryStore::new();
        let hits = Rc::new(Cell::new(0));

        let hits2 = hits.clone();
        let id = store.connect_changed(
            keys::INTELLIHIDE,
            Box::new(move |_| hits2.set(hits2.get() + 1)),
        );
        store.disconnect(id);

        store.set_bool(keys::INTELLIHIDE, true);
        assert_eq!(hits.get(), 0);
    }
}
