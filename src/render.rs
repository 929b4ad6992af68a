//! Decorator rendering — [`RenderContext`] to Go source text
//!
//! One embedded MiniJinja template holds the struct-level boilerplate; the
//! per-method fragments arrive pre-computed in the context, so the template
//! stays free of code-shape decisions.

use std::sync::OnceLock;

use minijinja::Environment;

use crate::error::{Error, Result};
use crate::model::RenderContext;

const DECORATOR_TEMPLATE: &str = include_str!("../templates/decorator.jinja");

/// Template engine singleton
static ENGINE: OnceLock<Environment<'static>> = OnceLock::new();

fn engine() -> &'static Environment<'static> {
    ENGINE.get_or_init(|| {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        env.add_template("decorator.jinja", DECORATOR_TEMPLATE)
            .expect("failed to load decorator template");
        env
    })
}

/// Renders the full generated file
pub fn render(ctx: &RenderContext) -> Result<String> {
    let template = engine()
        .get_template("decorator.jinja")
        .map_err(|e| Error::Template(e.to_string()))?;
    template.render(ctx).map_err(|e| Error::Template(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MethodRender, RenderImport};
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_struct_constructor_and_methods() {
        let ctx = RenderContext {
            package: "example".into(),
            interface_name: "Cache".into(),
            struct_name: "CacheTracer".into(),
            label: "Cache".into(),
            imports: vec![RenderImport {
                alias: "context".into(),
                path: "context".into(),
            }],
            methods: vec![MethodRender {
                name: "Ping".into(),
                declaration: "Ping(ctx context.Context)".into(),
                start_span: "START".into(),
                finish_span: "FINISH".into(),
                forward: "FORWARD".into(),
            }],
        };

        let out = render(&ctx).unwrap();
        let expected = r#"/*
This code was automatically generated by tracewrap.
Please DO NOT modify.
*/
package example

import (
	context "context"
)

// CacheTracer decorates a Cache, bracketing every call
// with a tracing span.
type CacheTracer struct {
	next   Cache
	prefix string
}

// NewCacheTracer wraps next; prefix starts every span name.
func NewCacheTracer(next Cache, prefix string) *CacheTracer {
	return &CacheTracer{
		next:   next,
		prefix: prefix,
	}
}

// Ping is a tracing decorator for Ping.
func (t *CacheTracer) Ping(ctx context.Context) {
	START
	defer FINISH

	FORWARD
}
"#;
        assert_eq!(out, expected);
    }

    #[test]
    fn method_order_in_context_is_output_order() {
        let entry = |name: &str| MethodRender {
            name: name.into(),
            declaration: format!("{name}()"),
            start_span: "s".into(),
            finish_span: "f".into(),
            forward: "c".into(),
        };
        let ctx = RenderContext {
            package: "p".into(),
            interface_name: "I".into(),
            struct_name: "ITracer".into(),
            label: "I".into(),
            imports: vec![],
            methods: vec![entry("Get"), entry("Set")],
        };
        let out = render(&ctx).unwrap();
        let get = out.find("func (t *ITracer) Get()").unwrap();
        let set = out.find("func (t *ITracer) Set()").unwrap();
        assert!(get < set);
    }
}
