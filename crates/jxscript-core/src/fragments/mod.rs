//! Named, reusable code bodies with declared dependencies.
//!
//! A generated script usually needs several small helpers that call each
//! other: look up a record, run an AI request, parse the reply, assemble a
//! result. Each lives here as a [`Fragment`] so it can be authored and tested
//! on its own, and the builder splices them in dependency order.
//!
//! The library is a closed catalog. [`FragmentLibrary::standard`] holds the
//! shipped helpers; callers may build their own with [`FragmentLibrary::insert`].

mod catalog;
mod resolve;

use std::collections::{BTreeMap, HashSet};

use crate::error::{ScriptError, ScriptResult};

pub(crate) use resolve::topo_order;

/// One reusable code body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub code: String,
    /// Fragments or built-ins that must be defined before this code runs.
    pub dependencies: Vec<String>,
}

impl Fragment {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            dependencies: Vec::new(),
        }
    }

    /// Add dependencies, keeping declaration order and dropping repeats.
    pub fn depends_on<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for dep in deps {
            let dep = dep.into();
            if !self.dependencies.contains(&dep) {
                self.dependencies.push(dep);
            }
        }
        self
    }
}

/// A catalog of named fragments.
#[derive(Debug, Clone, Default)]
pub struct FragmentLibrary {
    fragments: BTreeMap<String, Fragment>,
}

impl FragmentLibrary {
    /// An empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// The shipped helpers.
    pub fn standard() -> Self {
        let mut library = Self::new();
        for (name, fragment) in catalog::standard_fragments() {
            library.insert(name, fragment);
        }
        library
    }

    /// Add or replace a fragment.
    pub fn insert(&mut self, name: impl Into<String>, fragment: Fragment) {
        self.fragments.insert(name.into(), fragment);
    }

    pub fn get(&self, name: &str) -> Option<&Fragment> {
        self.fragments.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fragments.contains_key(name)
    }

    /// All fragment names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.fragments.keys().map(|s| s.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Order `selected` so each fragment follows its dependencies.
    ///
    /// The sort is restricted to the selected subset: a dependency that was not
    /// selected is not pulled in. Use [`FragmentLibrary::with_dependencies`]
    /// first when the closure is wanted. Unknown names and cycles are errors.
    pub fn resolve_order(&self, selected: &[&str]) -> ScriptResult<Vec<(&str, &Fragment)>> {
        let mut seen = HashSet::new();
        let mut entries: Vec<(&str, &Fragment)> = Vec::with_capacity(selected.len());
        for name in selected {
            let (key, fragment) = self
                .fragments
                .get_key_value(*name)
                .ok_or_else(|| ScriptError::UnknownFragment {
                    name: name.to_string(),
                })?;
            if seen.insert(key.as_str()) {
                entries.push((key.as_str(), fragment));
            }
        }

        let nodes: Vec<(&str, &[String])> = entries
            .iter()
            .map(|(name, fragment)| (*name, fragment.dependencies.as_slice()))
            .collect();
        let order = topo_order(&nodes)?;

        Ok(order.into_iter().map(|i| entries[i]).collect())
    }

    /// Expand `selected` with every fragment it transitively depends on.
    ///
    /// Dependencies the library does not know are left out; they are expected
    /// to be built-ins. Selected names come first, in order, then discovered
    /// dependencies.
    pub fn with_dependencies(&self, selected: &[&str]) -> ScriptResult<Vec<String>> {
        let mut out: Vec<String> = Vec::new();
        let mut queue: Vec<String> = Vec::new();

        for name in selected {
            if !self.contains(name) {
                return Err(ScriptError::UnknownFragment {
                    name: name.to_string(),
                });
            }
            if !out.iter().any(|n| n == name) {
                out.push(name.to_string());
                queue.push(name.to_string());
            }
        }

        while let Some(name) = queue.pop() {
            let Some(fragment) = self.get(&name) else {
                continue;
            };
            for dep in &fragment.dependencies {
                if self.contains(dep) && !out.contains(dep) {
                    out.push(dep.clone());
                    queue.push(dep.clone());
                }
            }
        }

        Ok(out)
    }

    /// Resolve the closure of `selected` and render the code bodies in order.
    pub fn render(&self, selected: &[&str]) -> ScriptResult<String> {
        let names = self.with_dependencies(selected)?;
        let refs: Vec<&str> = names.iter().map(|s| s.as_str()).collect();
        let ordered = self.resolve_order(&refs)?;
        let bodies: Vec<&str> = ordered.iter().map(|(_, f)| f.code.as_str()).collect();
        Ok(bodies.join("\n\n"))
    }
}
