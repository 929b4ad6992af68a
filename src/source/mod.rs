//! Source model — the capability seam to semantic analysis
//!
//! The pipeline never talks to a parser directly; it asks a [`SourceModel`]
//! for a finished [`InterfaceSpec`]. That keeps the generator testable
//! against hand-built fixtures and keeps the (expensive) analysis behind a
//! seam that embedders can cache or replace.

mod go;

pub use go::GoPackage;

use crate::error::Result;
use crate::model::InterfaceSpec;

/// Resolves interfaces out of an already-analyzed source unit
///
/// Contract:
/// - every declared method is reported, in lexicographic order by name —
///   deterministic ordering is a correctness requirement, since it drives
///   emitted code order;
/// - resolution is side-effect free with respect to generator state;
/// - the returned spec is immutable; callers may cache it read-only across
///   runs in the same process but must not mutate it.
pub trait SourceModel {
    /// Resolve `interface` into its normalized method set
    ///
    /// Fails with `NotFound` when no such type is declared and
    /// `NotAnInterface` when the name resolves to something else.
    fn resolve_interface(&self, interface: &str) -> Result<InterfaceSpec>;
}
