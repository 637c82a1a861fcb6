//! Navigation parameters.
//!
//! A navigation carries a string-keyed map of opaque values. Keys are chosen
//! by the caller, with a few reserved ones:
//!
//! - [`RESPONSE_KEY`] (the empty string) holds the response payload of a
//!   back-navigation. The adapter hands it to the result completion of the
//!   entry being popped.
//! - The `__md__*` keys encode the construction arguments of a message
//!   dialog (see [`MessageDialog`](crate::MessageDialog)).
//!
//! # Example
//!
//! ```
//! use region_navigator::NavigationData;
//!
//! let mut data = NavigationData::new();
//! data.insert("id", 42_u32);
//! assert_eq!(data.get_as::<u32>("id"), Some(&42));
//! assert!(data.get_as::<String>("id").is_none());
//! assert!(data.response().is_none());
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Opaque navigation value.
///
/// Values are reference counted so a context can be copied cheaply while it
/// moves through the pipeline.
pub type Value = Rc<dyn Any>;

/// Key under which a back-navigation carries its response payload.
pub const RESPONSE_KEY: &str = "";

/// Message dialog body text (`String`).
pub const MESSAGE_DIALOG_PARAMETER_CONTENT: &str = "__md__content";
/// Message dialog title (`String`).
pub const MESSAGE_DIALOG_PARAMETER_TITLE: &str = "__md__title";
/// Message dialog options ([`MessageDialogOptions`](crate::MessageDialogOptions)).
pub const MESSAGE_DIALOG_PARAMETER_OPTIONS: &str = "__md__options";
/// Index of the default command (`u32`).
pub const MESSAGE_DIALOG_PARAMETER_DEFAULT_COMMAND: &str = "__md__default";
/// Index of the cancel command (`u32`).
pub const MESSAGE_DIALOG_PARAMETER_CANCEL_COMMAND: &str = "__md__cancel";
/// Command list (`Vec<UiCommand>`).
pub const MESSAGE_DIALOG_PARAMETER_COMMANDS: &str = "__md__commands";

/// Wrap any `'static` value as a [`Value`].
pub fn value<T: Any>(v: T) -> Value {
    Rc::new(v)
}

/// String-keyed map of navigation parameters.
#[derive(Clone, Default)]
pub struct NavigationData {
    entries: HashMap<String, Value>,
}

impl NavigationData {
    /// Create an empty parameter map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a parameter, wrapping it as a [`Value`].
    pub fn insert<T: Any>(&mut self, key: impl Into<String>, v: T) {
        self.entries.insert(key.into(), value(v));
    }

    /// Insert or overwrite an already wrapped value.
    pub fn insert_value(&mut self, key: impl Into<String>, v: Value) {
        self.entries.insert(key.into(), v);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with<T: Any>(mut self, key: impl Into<String>, v: T) -> Self {
        self.insert(key, v);
        self
    }

    /// Get a parameter by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Get a parameter and downcast it to `T`.
    ///
    /// Returns `None` if the key is absent or holds a different type.
    pub fn get_as<T: Any>(&self, key: &str) -> Option<&T> {
        self.entries.get(key)?.downcast_ref::<T>()
    }

    /// Remove a parameter, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    /// Return `true` if the given key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Response payload stored under [`RESPONSE_KEY`].
    pub fn response(&self) -> Option<Value> {
        self.entries.get(RESPONSE_KEY).cloned()
    }

    /// Store (or clear) the response payload.
    pub fn set_response(&mut self, response: Option<Value>) {
        match response {
            Some(v) => self.insert_value(RESPONSE_KEY, v),
            None => {
                self.entries.remove(RESPONSE_KEY);
            }
        }
    }

    /// Iterate over all `(key, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    /// Return `true` if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return the number of parameters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Overlay `other` on top of `self`; keys in `other` win.
    pub fn merge(&self, other: &NavigationData) -> NavigationData {
        let mut merged = self.clone();
        for (key, v) in other.iter() {
            merged.insert_value(key.clone(), v.clone());
        }
        merged
    }
}

impl fmt::Debug for NavigationData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.entries.keys().collect();
        keys.sort();
        f.debug_struct("NavigationData").field("keys", &keys).finish()
    }
}
