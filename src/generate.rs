//! Generation pipeline — resolve, validate, qualify, render, write
//!
//! One [`Generator`] invocation is one run: it owns a fresh
//! [`ImportResolver`], walks the stages in order and stops at the first
//! failure. The run is synchronous and deterministic end to end; identical
//! input produces byte-identical output.

use std::collections::HashMap;
use std::path::Path;

use crate::error::Result;
use crate::hooks::{self, Fragment, SpanAliases};
use crate::imports::{self, ImportResolver};
use crate::model::{InterfaceSpec, MethodRender, MethodSpec, RenderContext, RenderImport};
use crate::output;
use crate::render;
use crate::source::SourceModel;
use crate::validate::{self, ValidationRule};

/// Appended to the interface name when no struct name is given
pub const DEFAULT_STRUCT_SUFFIX: &str = "Tracer";

/// Decorator generator, configured once and reusable across interfaces
pub struct Generator {
    rules: Vec<ValidationRule>,
    label: Option<String>,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator {
    /// Generator with the bundled precondition set
    pub fn new() -> Self {
        Generator {
            rules: vec![validate::context_first()],
            label: None,
        }
    }

    /// Generator with a caller-supplied rule list, evaluated in order
    pub fn with_rules(rules: Vec<ValidationRule>) -> Self {
        Generator { rules, label: None }
    }

    /// Overrides the span label (defaults to the interface name)
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Runs the full pipeline and persists the result at `out_path`
    ///
    /// Nothing is written unless every stage succeeded.
    pub fn generate(
        &self,
        model: &dyn SourceModel,
        interface: &str,
        struct_name: Option<&str>,
        out_path: &Path,
    ) -> Result<()> {
        let text = self.generate_source(model, interface, struct_name)?;
        output::write(out_path, &text)
    }

    /// Runs the pipeline up to and including rendering
    pub fn generate_source(
        &self,
        model: &dyn SourceModel,
        interface: &str,
        struct_name: Option<&str>,
    ) -> Result<String> {
        let spec = model.resolve_interface(interface)?;
        validate::validate(&spec.methods, &self.rules)?;

        let struct_name = match struct_name {
            Some(name) => name.to_string(),
            None => format!("{}{DEFAULT_STRUCT_SUFFIX}", spec.name),
        };
        let label = self.label.clone().unwrap_or_else(|| spec.name.clone());

        let mut resolver = ImportResolver::new();
        let mapping = qualify_signature_imports(&spec, &mut resolver);
        let aliases = span_aliases(&spec, &mut resolver);

        let methods: Vec<MethodSpec> = spec
            .methods
            .iter()
            .map(|m| requalify_method(m, &mapping))
            .collect();

        let mut renders = Vec::with_capacity(methods.len());
        for method in &methods {
            renders.push(MethodRender {
                name: method.name.clone(),
                declaration: hooks::declaration(method),
                start_span: hooks::fragment(Fragment::StartSpan, method, &label, &aliases)?,
                finish_span: hooks::fragment(Fragment::FinishSpan, method, &label, &aliases)?,
                forward: hooks::fragment(Fragment::ForwardCall, method, &label, &aliases)?,
            });
        }

        let ctx = RenderContext {
            package: spec.package.clone(),
            interface_name: spec.name.clone(),
            struct_name,
            label,
            imports: resolver
                .imports()
                .map(|(path, alias)| RenderImport {
                    alias: alias.to_string(),
                    path: path.to_string(),
                })
                .collect(),
            methods: renders,
        };
        render::render(&ctx)
    }
}

/// Routes every package qualifier in the signatures through the resolver
///
/// Qualifiers are visited in method order, then slot order — the fixed
/// visit order is what makes aliasing decisions reproducible. Returns
/// qualifier -> resolved alias.
fn qualify_signature_imports(
    spec: &InterfaceSpec,
    resolver: &mut ImportResolver,
) -> HashMap<String, String> {
    let mut mapping = HashMap::new();
    for method in &spec.methods {
        let types = method
            .params
            .iter()
            .map(|p| &p.typ)
            .chain(method.results.iter().map(|r| &r.typ));
        for typ in types {
            for qualifier in imports::scan_qualifiers(typ) {
                if mapping.contains_key(&qualifier) {
                    continue;
                }
                let import = spec
                    .imports
                    .iter()
                    .find(|i| imports::effective_name(i) == qualifier);
                if let Some(import) = import {
                    let alias = resolver.qualify_as(&import.path, &qualifier);
                    mapping.insert(qualifier, alias);
                }
            }
        }
    }
    mapping
}

/// Qualifies the tracing packages the emitted bodies will reference
///
/// Only what is actually used gets an import: `ext`/`log` appear only when
/// some method has an error slot, and a method-less interface needs no
/// tracing imports at all — an unused import would not compile.
fn span_aliases(spec: &InterfaceSpec, resolver: &mut ImportResolver) -> SpanAliases {
    if spec.methods.is_empty() {
        return SpanAliases::default();
    }
    let opentracing = resolver.qualify(hooks::OPENTRACING_PKG);
    let (ext, log) = if spec.methods.iter().any(|m| m.error_slot().is_some()) {
        (
            resolver.qualify(hooks::EXT_PKG),
            resolver.qualify(hooks::LOG_PKG),
        )
    } else {
        (String::new(), String::new())
    };
    SpanAliases {
        opentracing,
        ext,
        log,
    }
}

fn requalify_method(method: &MethodSpec, mapping: &HashMap<String, String>) -> MethodSpec {
    let mut method = method.clone();
    for param in &mut method.params {
        param.typ = imports::requalify(&param.typ, mapping);
    }
    for result in &mut method.results {
        result.typ = imports::requalify(&result.typ, mapping);
    }
    method
}
