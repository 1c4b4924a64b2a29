//! Named regex patterns used by higher-level scripts.
//!
//! Just data. Patterns are written as the target regex engine should see
//! them; the builder takes care of escaping them into a string literal
//! (see [`crate::builder::ScriptBuilder::add_catalog_pattern`]).

/// A named regex pattern with its flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegexPattern {
    pub name: &'static str,
    pub pattern: &'static str,
    pub flags: &'static str,
    pub description: &'static str,
}

const PATTERNS: &[RegexPattern] = &[
    RegexPattern {
        name: "themeHeader",
        pattern: r"^#{1,3}\s+Theme\s*\d*\s*[:\-]\s*(.+)$",
        flags: "gm",
        description: "Markdown heading introducing a theme, capturing its title",
    },
    RegexPattern {
        name: "quotedText",
        pattern: r#""([^"\\]*(?:\\.[^"\\]*)*)""#,
        flags: "g",
        description: "Double-quoted passage, capturing the text between the quotes",
    },
    RegexPattern {
        name: "bracketedReference",
        pattern: r"\[(\d+)\]",
        flags: "g",
        description: "Numbered citation such as [12]",
    },
    RegexPattern {
        name: "wikiLink",
        pattern: r"\[\[([^\]|]+)(?:\|([^\]]+))?\]\]",
        flags: "g",
        description: "Wiki link [[Target]] or [[Target|Label]]",
    },
    RegexPattern {
        name: "hashtag",
        pattern: r"(^|\s)#([A-Za-z][\w-]*)",
        flags: "g",
        description: "Inline hashtag, capturing the tag name",
    },
    RegexPattern {
        name: "markdownHeading",
        pattern: r"^(#{1,6})\s+(.+)$",
        flags: "gm",
        description: "Any markdown heading, capturing level and text",
    },
    RegexPattern {
        name: "email",
        pattern: r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}",
        flags: "g",
        description: "Email address",
    },
    RegexPattern {
        name: "url",
        pattern: r"https?://[^\s<>()]+",
        flags: "gi",
        description: "http or https URL",
    },
];

/// Every catalog entry, in declaration order.
pub fn all() -> &'static [RegexPattern] {
    PATTERNS
}

/// Find an entry by name.
pub fn lookup(name: &str) -> Option<&'static RegexPattern> {
    PATTERNS.iter().find(|p| p.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique() {
        let names: HashSet<_> = all().iter().map(|p| p.name).collect();
        assert_eq!(names.len(), all().len());
    }

    #[test]
    fn lookup_finds_entries() {
        assert_eq!(lookup("quotedText").map(|p| p.flags), Some("g"));
        assert!(lookup("missing").is_none());
    }

    #[test]
    fn patterns_compile() {
        // The Rust engine has no lookaround either, so this catches typos.
        for entry in all() {
            assert!(
                regex::Regex::new(entry.pattern).is_ok(),
                "pattern {} does not compile",
                entry.name
            );
        }
    }

    #[test]
    fn flags_are_known() {
        for entry in all() {
            assert!(entry.flags.chars().all(|c| "dgimsuy".contains(c)));
        }
    }
}
