//! Name/import resolution for generated code
//!
//! The resolver owns the alias table for exactly one generation run. Every
//! import path referenced by generated code goes through [`ImportResolver`],
//! which hands out collision-free local aliases and remembers the order in
//! which paths were first requested — that order is the order of the emitted
//! import block. Identical request sequences produce identical aliasing
//! decisions; the table is not meant to be shared between concurrent runs.

use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::Regex;

use crate::model::SourceImport;

/// Per-run alias table
#[derive(Debug, Default)]
pub struct ImportResolver {
    /// path -> assigned alias, in first-request order
    aliases: IndexMap<String, String>,
    /// every alias handed out so far, including bare reservations
    taken: HashSet<String>,
}

impl ImportResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the local alias for `path`, assigning one on first request.
    ///
    /// The same path always resolves to the same alias within a run.
    pub fn qualify(&mut self, path: &str) -> String {
        let natural = natural_alias(path);
        self.qualify_as(path, &natural)
    }

    /// Like [`Self::qualify`], but tries `preferred` as the alias first.
    ///
    /// Used to keep the aliases the source package already chose for its
    /// own imports.
    pub fn qualify_as(&mut self, path: &str, preferred: &str) -> String {
        if let Some(alias) = self.aliases.get(path) {
            return alias.clone();
        }
        let alias = self.reserve(preferred);
        self.aliases.insert(path.to_string(), alias.clone());
        alias
    }

    /// Claims `alias`, or a deterministically suffixed variant if taken.
    ///
    /// The first collision yields `alias2`, the next `alias3`, and so on.
    pub fn reserve(&mut self, alias: &str) -> String {
        let mut candidate = alias.to_string();
        let mut n = 1;
        while self.taken.contains(&candidate) {
            n += 1;
            candidate = format!("{alias}{n}");
        }
        self.taken.insert(candidate.clone());
        candidate
    }

    /// Alias previously assigned to `path`, if any
    pub fn alias_of(&self, path: &str) -> Option<&str> {
        self.aliases.get(path).map(String::as_str)
    }

    /// (path, alias) pairs in first-request order
    pub fn imports(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases.iter().map(|(p, a)| (p.as_str(), a.as_str()))
    }
}

/// Alias an import path would get with no collisions in play
///
/// Last path segment, with a `go-`/`-go` affix stripped and anything that
/// is not a Go identifier character replaced by `_`:
/// `github.com/opentracing/opentracing-go` -> `opentracing`.
pub fn natural_alias(path: &str) -> String {
    let segment = path.rsplit('/').next().unwrap_or(path);
    let trimmed = segment
        .strip_suffix("-go")
        .or_else(|| segment.strip_prefix("go-"))
        .filter(|s| !s.is_empty())
        .unwrap_or(segment);

    let mut alias: String = trimmed
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if alias.chars().next().is_none_or(|c| c.is_ascii_digit()) {
        alias.insert(0, '_');
    }
    alias
}

/// Name a source import is referenced by inside the package
pub fn effective_name(import: &SourceImport) -> String {
    match &import.alias {
        Some(alias) => alias.clone(),
        None => natural_alias(&import.path),
    }
}

// A package qualifier is an identifier directly followed by a dot, not
// preceded by an identifier character or another dot (rules out float
// literals in array lengths and chained selectors, which Go type syntax
// does not have anyway).
fn qualifier_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(^|[^A-Za-z0-9_.])([A-Za-z_][A-Za-z0-9_]*)\.").expect("valid qualifier regex")
    })
}

/// Package qualifiers appearing in a piece of Go type text, in order
pub fn scan_qualifiers(typ: &str) -> Vec<String> {
    qualifier_re()
        .captures_iter(typ)
        .map(|c| c[2].to_string())
        .collect()
}

/// Rewrites package qualifiers in type text to their resolved aliases
///
/// Qualifiers without a mapping are left untouched.
pub fn requalify(typ: &str, mapping: &HashMap<String, String>) -> String {
    qualifier_re()
        .replace_all(typ, |caps: &regex::Captures<'_>| {
            match mapping.get(&caps[2]) {
                Some(alias) => format!("{}{}.", &caps[1], alias),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}
