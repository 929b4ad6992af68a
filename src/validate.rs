//! Precondition validation — pluggable rules over method signatures
//!
//! Rules are pure predicates; they never look at anything but the one
//! [`MethodSpec`] in front of them. Validation is fail-fast: the first
//! failing (rule, method) pair aborts the run before anything is rendered.

use crate::error::{Error, Result};
use crate::model::MethodSpec;

/// The conventional context-carrying parameter type
pub const CONTEXT_TYPE: &str = "context.Context";

/// A named precondition a method must satisfy before generation proceeds
pub struct ValidationRule {
    name: String,
    check: Box<dyn Fn(&MethodSpec) -> std::result::Result<(), String>>,
}

impl ValidationRule {
    pub fn new(
        name: impl Into<String>,
        check: impl Fn(&MethodSpec) -> std::result::Result<(), String> + 'static,
    ) -> Self {
        ValidationRule {
            name: name.into(),
            check: Box::new(check),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `Ok(())` on pass, the failure reason otherwise
    pub fn check(&self, method: &MethodSpec) -> std::result::Result<(), String> {
        (self.check)(method)
    }
}

impl std::fmt::Debug for ValidationRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationRule")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Bundled rule: the first parameter must carry the request context
///
/// The span-opening fragment anchors on the first parameter, so every
/// method needs one of the conventional type.
pub fn context_first() -> ValidationRule {
    ValidationRule::new("context-first", |method| match method.params.first() {
        Some(p) if p.typ == CONTEXT_TYPE && !p.variadic => Ok(()),
        Some(p) => Err(format!(
            "first parameter must be {CONTEXT_TYPE}, got {}",
            p.typ
        )),
        None => Err(format!("method takes no parameters, first must be {CONTEXT_TYPE}")),
    })
}

/// Runs every rule against every method, in rule order then method order
///
/// Stops at the first violation and reports the offending method, rule and
/// reason; no partial results are collected.
pub fn validate(methods: &[MethodSpec], rules: &[ValidationRule]) -> Result<()> {
    for rule in rules {
        for method in methods {
            if let Err(reason) = rule.check(method) {
                return Err(Error::Validation {
                    method: method.name.clone(),
                    rule: rule.name().to_string(),
                    reason,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ParamSpec;

    fn method(name: &str, first_param_typ: Option<&str>) -> MethodSpec {
        MethodSpec {
            name: name.into(),
            params: first_param_typ
                .map(|typ| {
                    vec![ParamSpec {
                        name: "ctx".into(),
                        typ: typ.into(),
                        variadic: false,
                    }]
                })
                .unwrap_or_default(),
            results: vec![],
        }
    }

    #[test]
    fn context_first_accepts_conventional_signature() {
        let methods = [method("Get", Some(CONTEXT_TYPE))];
        assert!(validate(&methods, &[context_first()]).is_ok());
    }

    #[test]
    fn violation_names_method_rule_and_reason() {
        let methods = [method("Get", Some(CONTEXT_TYPE)), method("Close", None)];
        let err = validate(&methods, &[context_first()]).unwrap_err();
        match err {
            Error::Validation { method, rule, reason } => {
                assert_eq!(method, "Close");
                assert_eq!(rule, "context-first");
                assert!(reason.contains(CONTEXT_TYPE));
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn first_failing_pair_wins() {
        let methods = [method("A", Some("string")), method("B", None)];
        let strict = ValidationRule::new("no-methods-at-all", |_| Err("nope".into()));
        // rule order decides: context-first runs to completion over all
        // methods before the second rule would even start
        let err = validate(&methods, &[context_first(), strict]).unwrap_err();
        match err {
            Error::Validation { method, rule, .. } => {
                assert_eq!(method, "A");
                assert_eq!(rule, "context-first");
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn no_rules_means_everything_passes() {
        let methods = [method("Close", None)];
        assert!(validate(&methods, &[]).is_ok());
    }
}
