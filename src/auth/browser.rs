//! Browser primitives behind traits
//!
//! The session logic only ever talks to these traits, so the same code runs
//! against `localStorage`/`history` in a browser build and against the
//! in-memory versions below everywhere else.

use std::cell::RefCell;
use std::collections::HashMap;

/// Key/value persistent storage (`window.localStorage`)
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// Address bar access (`window.location.href` + `history.replaceState`)
pub trait History {
    fn href(&self) -> String;
    /// Replace the current entry; back-navigation must not restore the old URL
    fn replace_state(&self, url: &str);
}

/// Whole-document navigation (`window.location.assign`)
pub trait Navigator {
    fn assign(&self, url: &str);
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

impl<T: Storage + ?Sized> Storage for &T {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) {
        (**self).remove(key)
    }
}

/// Single-tab history: only the current entry is kept
#[derive(Debug)]
pub struct MemoryHistory {
    current: RefCell<String>,
}

impl MemoryHistory {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            current: RefCell::new(href.into()),
        }
    }

    /// Simulate a full page load at `href`
    pub fn load(&self, href: impl Into<String>) {
        *self.current.borrow_mut() = href.into();
    }
}

impl History for MemoryHistory {
    fn href(&self) -> String {
        self.current.borrow().clone()
    }

    fn replace_state(&self, url: &str) {
        *self.current.borrow_mut() = url.to_string();
    }
}

impl<T: History + ?Sized> History for &T {
    fn href(&self) -> String {
        (**self).href()
    }

    fn replace_state(&self, url: &str) {
        (**self).replace_state(url)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Navigator;
    use std::cell::RefCell;

    /// Records every navigation instead of leaving the page
    #[derive(Debug, Default)]
    pub(crate) struct RecordingNavigator {
        pub(crate) visited: RefCell<Vec<String>>,
    }

    impl Navigator for RecordingNavigator {
        fn assign(&self, url: &str) {
            self.visited.borrow_mut().push(url.to_string());
        }
    }
}
