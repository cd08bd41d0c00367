//! Column name collision tracking.

use std::collections::HashSet;

/// Names already emitted for one table.
///
/// A tracker is created for every table the compiler emits and dropped when
/// that table is done, so independent compiles never see each other's names.
/// Flattened records share the tracker of the table they are folded into.
#[derive(Debug, Default)]
pub struct NameTracker {
    seen: HashSet<String>,
}

impl NameTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves `name` for a field owned by the type `owner`.
    ///
    /// The first use of a name keeps it; later uses become `<owner>_<name>`.
    /// The prefixed name is registered too, but never prefixed again.
    pub fn resolve(&mut self, name: &str, owner: &str) -> String {
        if self.seen.insert(name.to_string()) {
            return name.to_string();
        }
        let prefixed = format!("{owner}_{name}");
        self.seen.insert(prefixed.clone());
        prefixed
    }

    /// Records `name` without renaming it.
    pub fn register(&mut self, name: &str) {
        self.seen.insert(name.to_string());
    }

    /// Returns whether `name` was already used.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.seen.contains(name)
    }
}
