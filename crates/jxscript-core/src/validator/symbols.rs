//! Known symbols for function-dependency analysis.
//!
//! Tracks which names a script may call without defining them: host
//! built-ins, the automation bridge, and anything a caller injects. The set
//! is plain data so a different host can supply its own.

use std::collections::HashSet;

/// Host and bridge globals that are always callable.
const HOST_BUILTINS: &[&str] = &[
    // Language globals
    "Array", "Boolean", "Date", "Error", "Function", "JSON", "Math", "Number", "Object",
    "RangeError", "RegExp", "String", "SyntaxError", "TypeError", "decodeURI",
    "decodeURIComponent", "encodeURI", "encodeURIComponent", "isFinite", "isNaN",
    "parseFloat", "parseInt",
    // Automation bridge
    "Application", "Automation", "ObjC", "Path", "Progress", "Ref", "delay", "$",
    // Standard additions reached through the application handle
    "app",
];

/// Names that look like calls but are syntax.
const KEYWORDS: &[&str] = &[
    "if", "for", "while", "switch", "catch", "function", "return", "typeof", "new", "do",
    "else", "in", "of", "instanceof", "void", "delete", "throw", "with", "var", "let", "const",
    "case", "try", "finally", "yield", "await",
];

/// A set of names considered defined before the script runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownSymbols {
    names: HashSet<String>,
}

impl Default for KnownSymbols {
    fn default() -> Self {
        Self::host()
    }
}

impl KnownSymbols {
    /// No built-ins at all.
    pub fn empty() -> Self {
        Self {
            names: HashSet::new(),
        }
    }

    /// The automation host's globals.
    pub fn host() -> Self {
        let mut symbols = Self::empty();
        symbols.bind_builtins();
        symbols
    }

    fn bind_builtins(&mut self) {
        for name in HOST_BUILTINS {
            self.bind(*name);
        }
    }

    /// Mark a name as known.
    pub fn bind(&mut self, name: impl Into<String>) {
        self.names.insert(name.into());
    }

    /// Builder-style [`KnownSymbols::bind`] for several names.
    pub fn with<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.bind(name);
        }
        self
    }

    pub fn is_bound(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Keywords that take a parenthesis are never calls.
    pub fn is_keyword(name: &str) -> bool {
        KEYWORDS.contains(&name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// All known names, sorted.
    pub fn all_bound(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.names.iter().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}
