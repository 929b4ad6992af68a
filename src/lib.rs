// Production-quality lints
#![warn(
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
// Deny truly dangerous patterns
#![deny(clippy::mem_forget)]
// Allow common patterns in library code
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! # tracewrap — tracing decorators for Go interfaces
//!
//! Given a Go package and an interface declared in it, tracewrap generates
//! a decorator struct that implements the interface, forwards every call to
//! a wrapped delegate, and brackets each call with an OpenTracing span —
//! marking the span failed when the call returns a non-nil error.
//!
//! ## Pipeline
//!
//! ```text
//! GoPackage (tree-sitter)          source model
//!     │
//!     ▼
//! InterfaceSpec                    normalized, ordered method set
//!     │
//!     ▼
//! validate(rules)                  fail-fast preconditions
//!     │
//!     ├──► hooks                   per-method code fragments
//!     ├──► ImportResolver          collision-free aliases
//!     ▼
//! render ──► output               template to file, written once
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tracewrap::{Generator, GoPackage};
//!
//! let package = GoPackage::load("./cache".as_ref())?;
//! Generator::new().generate(&package, "Cache", None, "./cache/cache_trace.go".as_ref())?;
//! ```
//!
//! Every method of the interface must take `context.Context` first (the
//! bundled precondition); the generated span is the child of whatever span
//! the context carries. The run is deterministic: the same package and
//! flags produce byte-identical output.

pub mod error;
pub mod extract;
pub mod generate;
pub mod hooks;
pub mod imports;
pub mod model;
pub mod output;
pub mod render;
pub mod source;
pub mod validate;

// Re-exports
pub use error::{Error, Result};
pub use extract::{normalize, RawMethod, RawParam};
pub use generate::{Generator, DEFAULT_STRUCT_SUFFIX};
pub use hooks::{declaration, fragment, Fragment, SpanAliases};
pub use imports::{natural_alias, ImportResolver};
pub use model::{
    InterfaceSpec, MethodRender, MethodSpec, ParamSpec, RenderContext, RenderImport, ResultSpec,
    SourceImport, ERROR_TYPE,
};
pub use render::render;
pub use source::{GoPackage, SourceModel};
pub use validate::{context_first, validate, ValidationRule, CONTEXT_TYPE};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
