//! Signature extraction — raw declarations to normalized [`MethodSpec`]s
//!
//! The source adapter hands over methods the way the grammar sees them:
//! grouped names (`key, value []byte`), anonymous slots, blank identifiers.
//! [`normalize`] flattens that into one named entry per slot so every later
//! stage can treat signatures uniformly.

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::model::{MethodSpec, ParamSpec, ResultSpec, ERROR_TYPE};

/// Prefix for synthesized parameter names
const PARAM_PREFIX: &str = "in";
/// Prefix for synthesized result names
const RESULT_PREFIX: &str = "out";

/// A method as declared in source, before normalization
#[derive(Debug, Clone, Default)]
pub struct RawMethod {
    pub name: String,
    pub params: Vec<RawParam>,
    pub results: Vec<RawParam>,
}

/// One declaration group: zero or more names sharing a type
#[derive(Debug, Clone, Default)]
pub struct RawParam {
    /// Declared names; empty for an anonymous slot
    pub names: Vec<String>,
    /// Type text; for variadics the element type
    pub typ: String,
    pub variadic: bool,
}

impl RawParam {
    pub fn anonymous(typ: impl Into<String>) -> Self {
        RawParam {
            names: vec![],
            typ: typ.into(),
            variadic: false,
        }
    }
}

/// Normalizes one raw method into a [`MethodSpec`]
///
/// Guarantees: synthesized names are unique within the method, positional
/// (`in`, `in1`, … / `out`, `out1`, …), and stable — the same name lands in
/// the re-emitted declaration and the forwarding call. Declared names are
/// kept; the blank identifier counts as anonymous since `_` cannot be
/// forwarded.
pub fn normalize(raw: &RawMethod) -> Result<MethodSpec> {
    let mut used = declared_names(raw);

    let mut params = Vec::new();
    for group in &raw.params {
        if group.typ.is_empty() {
            return Err(Error::Extraction(format!(
                "method '{}': parameter type could not be serialized",
                raw.name
            )));
        }
        for name in slot_names(group) {
            let name = match name {
                Some(declared) => declared,
                None => synthesize(PARAM_PREFIX, params.len(), &mut used),
            };
            params.push(ParamSpec {
                name,
                typ: group.typ.clone(),
                variadic: group.variadic,
            });
        }
    }

    let mut results = Vec::new();
    for group in &raw.results {
        if group.typ.is_empty() {
            return Err(Error::Extraction(format!(
                "method '{}': result type could not be serialized",
                raw.name
            )));
        }
        for name in slot_names(group) {
            let name = match name {
                Some(declared) => declared,
                None => synthesize(RESULT_PREFIX, results.len(), &mut used),
            };
            results.push(ResultSpec {
                name,
                typ: group.typ.clone(),
                is_error_slot: false,
            });
        }
    }

    // Only the last result of the canonical error type carries the flag;
    // earlier matches stay plain pass-through slots.
    if let Some(last) = results.iter_mut().rev().find(|r| r.typ == ERROR_TYPE) {
        last.is_error_slot = true;
    }

    Ok(MethodSpec {
        name: raw.name.clone(),
        params,
        results,
    })
}

fn declared_names(raw: &RawMethod) -> HashSet<String> {
    raw.params
        .iter()
        .chain(&raw.results)
        .flat_map(|g| &g.names)
        .filter(|n| *n != "_")
        .cloned()
        .collect()
}

/// Expands a group into per-slot names; `None` marks a slot to synthesize
fn slot_names(group: &RawParam) -> Vec<Option<String>> {
    if group.names.is_empty() {
        vec![None]
    } else {
        group
            .names
            .iter()
            .map(|n| if n == "_" { None } else { Some(n.clone()) })
            .collect()
    }
}

/// `<prefix>` for index 0, `<prefix><index>` after that, bumping the index
/// until the candidate is free of both declared and earlier synthesized
/// names.
fn synthesize(prefix: &str, index: usize, used: &mut HashSet<String>) -> String {
    let mut n = index;
    loop {
        let candidate = if n == 0 {
            prefix.to_string()
        } else {
            format!("{prefix}{n}")
        };
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn named(names: &[&str], typ: &str) -> RawParam {
        RawParam {
            names: names.iter().map(|s| s.to_string()).collect(),
            typ: typ.into(),
            variadic: false,
        }
    }

    #[test]
    fn grouped_names_flatten_to_one_slot_each() {
        let raw = RawMethod {
            name: "Set".into(),
            params: vec![named(&["ctx"], "context.Context"), named(&["key", "value"], "[]byte")],
            results: vec![RawParam::anonymous("error")],
        };
        let method = normalize(&raw).unwrap();
        let names: Vec<_> = method.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["ctx", "key", "value"]);
        assert_eq!(method.params[1].typ, "[]byte");
        assert_eq!(method.params[2].typ, "[]byte");
    }

    #[test]
    fn anonymous_slots_get_positional_names() {
        let raw = RawMethod {
            name: "Get".into(),
            params: vec![
                RawParam::anonymous("context.Context"),
                RawParam::anonymous("[]byte"),
            ],
            results: vec![RawParam::anonymous("[]byte"), RawParam::anonymous("error")],
        };
        let method = normalize(&raw).unwrap();
        let params: Vec<_> = method.params.iter().map(|p| p.name.as_str()).collect();
        let results: Vec<_> = method.results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(params, ["in", "in1"]);
        assert_eq!(results, ["out", "out1"]);
    }

    #[test]
    fn blank_identifier_counts_as_anonymous() {
        let raw = RawMethod {
            name: "Drop".into(),
            params: vec![named(&["ctx"], "context.Context"), named(&["_"], "string")],
            results: vec![],
        };
        let method = normalize(&raw).unwrap();
        assert_eq!(method.params[1].name, "in1");
    }

    #[test]
    fn synthesized_names_dodge_declared_ones() {
        // A later declared `in1` occupies the natural name of the second
        // slot; synthesis bumps past it instead of colliding.
        let raw = RawMethod {
            name: "Odd".into(),
            params: vec![
                RawParam::anonymous("context.Context"),
                RawParam::anonymous("int"),
                named(&["in1"], "string"),
            ],
            results: vec![],
        };
        let method = normalize(&raw).unwrap();
        let names: Vec<_> = method.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["in", "in2", "in1"]);
    }

    #[test]
    fn last_error_result_wins_the_slot() {
        let raw = RawMethod {
            name: "Twice".into(),
            params: vec![],
            results: vec![
                RawParam::anonymous("error"),
                RawParam::anonymous("int"),
                RawParam::anonymous("error"),
            ],
        };
        let method = normalize(&raw).unwrap();
        let flags: Vec<_> = method.results.iter().map(|r| r.is_error_slot).collect();
        assert_eq!(flags, [false, false, true]);
    }

    #[test]
    fn empty_type_text_is_an_extraction_error() {
        let raw = RawMethod {
            name: "Broken".into(),
            params: vec![RawParam::anonymous("")],
            results: vec![],
        };
        let err = normalize(&raw).unwrap_err();
        assert!(err.to_string().contains("Broken"));
    }
}
