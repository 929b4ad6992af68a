//! Code fragment engine — per-method hook and forwarding text
//!
//! Every fragment is a pure function of the method's normalized signature;
//! the shape decision lives here and nowhere else. Two post-call shapes
//! exist and are never interchanged: a conditional failure branch when the
//! method has an error slot, a bare `span.Finish()` when it does not.
//!
//! Fragments are emitted with the indentation they need inside a method
//! body (one tab base, continuation lines deeper), so the renderer can
//! splice them in verbatim.

use crate::error::{Error, Result};
use crate::model::MethodSpec;

/// Import path of the OpenTracing API package
pub const OPENTRACING_PKG: &str = "github.com/opentracing/opentracing-go";
/// Import path of the span tag helpers
pub const EXT_PKG: &str = "github.com/opentracing/opentracing-go/ext";
/// Import path of the structured log field helpers
pub const LOG_PKG: &str = "github.com/opentracing/opentracing-go/log";

/// Resolved local aliases for the tracing packages
#[derive(Debug, Clone, Default)]
pub struct SpanAliases {
    pub opentracing: String,
    pub ext: String,
    pub log: String,
}

/// The kinds of fragment a method body is assembled from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fragment {
    /// Pre-call: open the span on the context parameter
    StartSpan,
    /// Post-call: finish the span, marking failure when signalled
    FinishSpan,
    /// The delegate call with pass-through arguments
    ForwardCall,
}

/// Strategy table: fragment kind to fragment text
pub fn fragment(
    kind: Fragment,
    method: &MethodSpec,
    label: &str,
    aliases: &SpanAliases,
) -> Result<String> {
    match kind {
        Fragment::StartSpan => start_span(method, label, aliases),
        Fragment::FinishSpan => Ok(finish_span(method, aliases)),
        Fragment::ForwardCall => Ok(forward_call(method)),
    }
}

/// `span, <ctx> := opentracing.StartSpanFromContext(<ctx>, t.prefix+".<label>.<name>")`
///
/// The span label completes to `<prefix>.<label>.<method>` at runtime; the
/// prefix stays a field of the generated struct, never baked in here.
fn start_span(method: &MethodSpec, label: &str, aliases: &SpanAliases) -> Result<String> {
    let ctx = method.context_param().ok_or_else(|| {
        Error::Template(format!(
            "method '{}' has no parameter to anchor the span on",
            method.name
        ))
    })?;
    Ok(format!(
        "span, {ctx} := {ot}.StartSpanFromContext({ctx}, t.prefix+\".{label}.{name}\")",
        ctx = ctx.name,
        ot = aliases.opentracing,
        name = method.name,
    ))
}

/// The deferred span-closing expression, in one of two shapes
fn finish_span(method: &MethodSpec, aliases: &SpanAliases) -> String {
    match method.error_slot() {
        Some(slot) => format!(
            "func() {{\n\
             \t\tif {err} != nil {{\n\
             \t\t\t{ext}.Error.Set(span, true)\n\
             \t\t\tspan.LogFields(\n\
             \t\t\t\t{log}.String(\"event\", \"error\"),\n\
             \t\t\t\t{log}.String(\"message\", {err}.Error()),\n\
             \t\t\t)\n\
             \t\t}}\n\
             \t\tspan.Finish()\n\
             \t}}()",
            err = slot.name,
            ext = aliases.ext,
            log = aliases.log,
        ),
        None => "span.Finish()".to_string(),
    }
}

/// `t.next.<name>(<args>)`, spread-expanding a trailing variadic, prefixed
/// with `return` only when the method has results to return
fn forward_call(method: &MethodSpec) -> String {
    let args = method
        .params
        .iter()
        .map(|p| {
            if p.variadic {
                format!("{}...", p.name)
            } else {
                p.name.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(", ");
    let call = format!("t.next.{}({})", method.name, args);
    if method.results.is_empty() {
        call
    } else {
        format!("return {call}")
    }
}

/// Re-serializes a declaration: `Name(params) (results)`
///
/// Results are always parenthesized and named (normalization guarantees
/// names); a method without results gets none.
pub fn declaration(method: &MethodSpec) -> String {
    let params = method
        .params
        .iter()
        .map(|p| {
            let dots = if p.variadic { "..." } else { "" };
            format!("{} {}{}", p.name, dots, p.typ)
        })
        .collect::<Vec<_>>()
        .join(", ");

    if method.results.is_empty() {
        format!("{}({})", method.name, params)
    } else {
        let results = method
            .results
            .iter()
            .map(|r| format!("{} {}", r.name, r.typ))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}({}) ({})", method.name, params, results)
    }
}
