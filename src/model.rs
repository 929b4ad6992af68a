//! Interface model — the core intermediate representation
//!
//! An [`InterfaceSpec`] is a normalized snapshot of one Go interface: its
//! method set in a deterministic order, plus the package facts generation
//! needs (package name, import table, source hash). It is built once per
//! run by a [`crate::source::SourceModel`], never mutated afterwards, and
//! can be cached read-only across runs in the same process.
//!
//! All types derive serde so tests can drive the pipeline from hand-built
//! fixtures instead of a real Go package.

use serde::{Deserialize, Serialize};

/// The Go type that signals failure from a call
pub const ERROR_TYPE: &str = "error";

/// A resolved interface and everything generation needs to know about it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterfaceSpec {
    /// Interface name as declared
    pub name: String,

    /// Name of the package that declares the interface
    pub package: String,

    /// Methods, ordered lexicographically by name
    ///
    /// The order is an invariant, not a convenience: it drives emitted
    /// code order and the determinism guarantee.
    pub methods: Vec<MethodSpec>,

    /// Import table of the declaring package, deduplicated by path
    ///
    /// Needed to re-qualify cross-package type references that appear in
    /// method signatures.
    #[serde(default)]
    pub imports: Vec<SourceImport>,

    /// Hash over the package sources, usable as a cache key
    #[serde(default)]
    pub source_hash: String,
}

/// One import declaration from the source package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceImport {
    /// Explicit alias, if the declaration had one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    /// Import path without quotes
    pub path: String,
}

/// One interface method in normalized form
///
/// Grouped parameter declarations (`key, value []byte`) arrive here already
/// flattened to one entry per name, and every slot carries a name — either
/// the declared one or a synthesized `in<n>`/`out<n>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodSpec {
    /// Method name, unique within the interface
    pub name: String,

    /// Parameters in declaration order
    pub params: Vec<ParamSpec>,

    /// Results in declaration order
    pub results: Vec<ResultSpec>,
}

impl MethodSpec {
    /// The result that carries the call's failure signal, if any
    ///
    /// At most one result is flagged; when several results have the
    /// canonical `error` type only the last one counts.
    pub fn error_slot(&self) -> Option<&ResultSpec> {
        self.results.iter().find(|r| r.is_error_slot)
    }

    /// First parameter — by validated convention the context carrier
    pub fn context_param(&self) -> Option<&ParamSpec> {
        self.params.first()
    }
}

/// One parameter slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSpec {
    /// Declared or synthesized name
    pub name: String,

    /// Go type text, opaque but sufficient for re-emission
    ///
    /// For variadic parameters this is the element type; the `...` marker
    /// is re-added at render time.
    pub typ: String,

    /// Whether this is the trailing `...` parameter
    #[serde(default)]
    pub variadic: bool,
}

/// One result slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSpec {
    /// Declared or synthesized name
    pub name: String,

    /// Go type text, opaque but sufficient for re-emission
    pub typ: String,

    /// True iff this result is the method's failure signal
    #[serde(default)]
    pub is_error_slot: bool,
}

/// Everything the template sees — built once, passed read-only
#[derive(Debug, Clone, Serialize)]
pub struct RenderContext {
    /// Package clause of the generated file
    pub package: String,

    /// Interface the decorator implements
    pub interface_name: String,

    /// Name of the generated struct
    pub struct_name: String,

    /// Free-text label interpolated into span names
    /// (`<prefix>.<label>.<method>`; prefix stays a runtime field)
    pub label: String,

    /// Import block, in resolver order
    pub imports: Vec<RenderImport>,

    /// Per-method render entries, in method order
    pub methods: Vec<MethodRender>,
}

/// One line of the generated import block
#[derive(Debug, Clone, Serialize)]
pub struct RenderImport {
    pub alias: String,
    pub path: String,
}

/// Pre-computed fragments for one generated method
#[derive(Debug, Clone, Serialize)]
pub struct MethodRender {
    pub name: String,

    /// Re-serialized declaration: `Name(params) (results)`
    pub declaration: String,

    /// Span-opening statement
    pub start_span: String,

    /// Deferred span-closing expression (shape depends on the error slot)
    pub finish_span: String,

    /// Call-forwarding statement
    pub forward: String,
}
