//! Logical back-stack of an adapter.

use crate::NavigationContext;

/// Ordered `(path, context)` entries; the tail is what is currently shown.
///
/// Push and pop happen at the tail only. The stack is owned by a single
/// adapter and is only touched between awaited pipeline steps.
#[derive(Debug, Default)]
pub struct NavigationContextStack {
    entries: Vec<(String, NavigationContext)>,
}

impl NavigationContextStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a new current entry.
    pub fn push(&mut self, path: impl Into<String>, context: NavigationContext) {
        self.entries.push((path.into(), context));
    }

    /// Remove and return the current entry.
    pub fn pop(&mut self) -> Option<(String, NavigationContext)> {
        self.entries.pop()
    }

    /// The current entry, without removing it.
    pub fn peek(&self) -> Option<&(String, NavigationContext)> {
        self.entries.last()
    }

    /// Path of the current entry.
    pub fn current_path(&self) -> Option<&str> {
        self.peek().map(|(path, _)| path.as_str())
    }

    /// Paths from the bottom of the stack to the top.
    pub fn paths(&self) -> Vec<String> {
        self.entries.iter().map(|(path, _)| path.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
