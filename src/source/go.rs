//! Go package adapter — tree-sitter backed [`SourceModel`]
//!
//! Loads every `.go` file of one package directory, collects interface
//! declarations, the package clause and the import table, and resolves
//! interfaces into normalized [`InterfaceSpec`]s. Embedded interfaces are
//! flattened into the method set when the embedded type is declared in the
//! same package; anything else is reported, not guessed at.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};
use tree_sitter::{Node, Parser};

use super::SourceModel;
use crate::error::{Error, Result};
use crate::extract::{self, RawMethod, RawParam};
use crate::model::{InterfaceSpec, SourceImport};

/// One parsed Go package, reusable across any number of resolutions
#[derive(Debug, Clone)]
pub struct GoPackage {
    package: String,
    interfaces: BTreeMap<String, RawInterface>,
    other_types: BTreeSet<String>,
    imports: Vec<SourceImport>,
    source_hash: String,
}

#[derive(Debug, Clone, Default)]
struct RawInterface {
    methods: Vec<RawMethod>,
    embedded: Vec<String>,
}

impl GoPackage {
    /// Loads the package in `dir` (non-recursive, `_test.go` excluded)
    pub fn load(dir: &Path) -> Result<Self> {
        let entries = fs::read_dir(dir)
            .map_err(|e| Error::Load(format!("{}: {}", dir.display(), e)))?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::Load(format!("{}: {}", dir.display(), e)))?;
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();
            if path.is_file() && name.ends_with(".go") && !name.ends_with("_test.go") {
                paths.push((name, path));
            }
        }
        paths.sort();

        if paths.is_empty() {
            return Err(Error::Load(format!("no Go files in {}", dir.display())));
        }

        let mut files = Vec::with_capacity(paths.len());
        for (name, path) in paths {
            let source = fs::read_to_string(&path)
                .map_err(|e| Error::Load(format!("{}: {}", path.display(), e)))?;
            files.push((name, source));
        }
        Self::from_sources(&files)
    }

    /// Builds the package model from in-memory `(file name, source)` pairs
    ///
    /// File order is the caller's; [`Self::load`] passes files sorted by
    /// name so the model (and its hash) is reproducible.
    pub fn from_sources(files: &[(String, String)]) -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_go::LANGUAGE.into())
            .map_err(|e| Error::Load(format!("failed to set language: {e}")))?;

        let mut package: Option<String> = None;
        let mut interfaces = BTreeMap::new();
        let mut other_types = BTreeSet::new();
        let mut imports = Vec::new();
        let mut seen_paths = BTreeSet::new();
        let mut hasher = Sha256::new();

        for (name, source) in files {
            hasher.update(name.as_bytes());
            hasher.update(source.as_bytes());

            let tree = parser
                .parse(source, None)
                .ok_or_else(|| Error::Load(format!("{name}: failed to parse source")))?;
            let root = tree.root_node();
            if root.has_error() {
                return Err(Error::Load(format!("{name}: syntax error")));
            }

            let mut cursor = root.walk();
            for child in root.children(&mut cursor) {
                match child.kind() {
                    "package_clause" => {
                        let clause = package_name(child, source);
                        match &package {
                            None => package = Some(clause),
                            Some(existing) if *existing != clause => {
                                return Err(Error::Load(format!(
                                    "multiple packages in directory: '{existing}' and '{clause}'"
                                )));
                            }
                            Some(_) => {}
                        }
                    }
                    "import_declaration" => {
                        collect_imports(child, source, &mut imports, &mut seen_paths);
                    }
                    "type_declaration" => {
                        collect_types(child, source, &mut interfaces, &mut other_types);
                    }
                    _ => {}
                }
            }
        }

        let package = package
            .ok_or_else(|| Error::Load("no package clause found".to_string()))?;
        let source_hash = format!("sha256:{}", hex::encode(&hasher.finalize()[..8]));

        Ok(GoPackage {
            package,
            interfaces,
            other_types,
            imports,
            source_hash,
        })
    }

    /// Name from the package clause
    pub fn package_name(&self) -> &str {
        &self.package
    }

    /// Depth-first method collection across same-package embeddings
    ///
    /// Explicitly declared methods win over embedded ones of the same
    /// name; the BTreeMap imposes the lexicographic method order.
    fn flatten(
        &self,
        name: &str,
        raw: &RawInterface,
        out: &mut BTreeMap<String, RawMethod>,
        visited: &mut BTreeSet<String>,
    ) -> Result<()> {
        if !visited.insert(name.to_string()) {
            return Ok(());
        }
        for method in &raw.methods {
            out.entry(method.name.clone()).or_insert_with(|| method.clone());
        }
        for embedded in &raw.embedded {
            let inner = self.interfaces.get(embedded).ok_or_else(|| {
                Error::Extraction(format!(
                    "interface '{name}' embeds '{embedded}', which is not an interface declared in package '{}'",
                    self.package
                ))
            })?;
            self.flatten(embedded, inner, out, visited)?;
        }
        Ok(())
    }
}

impl SourceModel for GoPackage {
    fn resolve_interface(&self, interface: &str) -> Result<InterfaceSpec> {
        let raw = match self.interfaces.get(interface) {
            Some(raw) => raw,
            None if self.other_types.contains(interface) => {
                return Err(Error::NotAnInterface(interface.to_string()));
            }
            None => {
                return Err(Error::NotFound {
                    package: self.package.clone(),
                    interface: interface.to_string(),
                });
            }
        };

        let mut collected = BTreeMap::new();
        let mut visited = BTreeSet::new();
        self.flatten(interface, raw, &mut collected, &mut visited)?;

        let methods = collected
            .values()
            .map(extract::normalize)
            .collect::<Result<Vec<_>>>()?;

        Ok(InterfaceSpec {
            name: interface.to_string(),
            package: self.package.clone(),
            methods,
            imports: self.imports.clone(),
            source_hash: self.source_hash.clone(),
        })
    }
}

fn text(node: Node, source: &str) -> String {
    node.utf8_text(source.as_bytes()).unwrap_or("").to_string()
}

fn package_name(node: Node, source: &str) -> String {
    let mut cursor = node.walk();
    let name = node
        .children(&mut cursor)
        .find(|c| c.kind() == "package_identifier")
        .map(|c| text(c, source))
        .unwrap_or_default();
    name
}

fn collect_imports(
    node: Node,
    source: &str,
    out: &mut Vec<SourceImport>,
    seen: &mut BTreeSet<String>,
) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "import_spec" => import_spec(child, source, out, seen),
            "import_spec_list" => {
                let mut inner = child.walk();
                for spec in child.children(&mut inner) {
                    if spec.kind() == "import_spec" {
                        import_spec(spec, source, out, seen);
                    }
                }
            }
            _ => {}
        }
    }
}

fn import_spec(node: Node, source: &str, out: &mut Vec<SourceImport>, seen: &mut BTreeSet<String>) {
    let alias = match node.child_by_field_name("name") {
        // blank and dot imports contribute no referenceable qualifier
        Some(name) if matches!(name.kind(), "blank_identifier" | "dot") => return,
        Some(name) => Some(text(name, source)),
        None => None,
    };
    let Some(path_node) = node.child_by_field_name("path") else {
        return;
    };
    let raw = text(path_node, source);
    let path = raw.trim_matches(|c| c == '"' || c == '`').to_string();
    if path.is_empty() || !seen.insert(path.clone()) {
        return;
    }
    out.push(SourceImport { alias, path });
}

fn collect_types(
    node: Node,
    source: &str,
    interfaces: &mut BTreeMap<String, RawInterface>,
    other_types: &mut BTreeSet<String>,
) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "type_spec" => {
                let Some(name_node) = child.child_by_field_name("name") else {
                    continue;
                };
                let name = text(name_node, source);
                match child.child_by_field_name("type") {
                    Some(typ) if typ.kind() == "interface_type" => {
                        interfaces
                            .entry(name)
                            .or_insert_with(|| parse_interface(typ, source));
                    }
                    Some(_) => {
                        other_types.insert(name);
                    }
                    None => {}
                }
            }
            "type_alias" => {
                if let Some(name_node) = child.child_by_field_name("name") {
                    other_types.insert(text(name_node, source));
                }
            }
            _ => {}
        }
    }
}

fn parse_interface(node: Node, source: &str) -> RawInterface {
    let mut raw = RawInterface::default();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "method_spec" | "method_elem" => {
                if let Some(method) = parse_method(child, source) {
                    raw.methods.push(method);
                }
            }
            // embedded interface, current and older grammar spellings
            "type_elem" | "type_identifier" | "qualified_type" => {
                raw.embedded.push(text(child, source).trim().to_string());
            }
            _ => {}
        }
    }
    raw
}

fn parse_method(node: Node, source: &str) -> Option<RawMethod> {
    let name = text(node.child_by_field_name("name")?, source);
    let params = node
        .child_by_field_name("parameters")
        .map(|n| parse_parameter_list(n, source))
        .unwrap_or_default();
    let results = match node.child_by_field_name("result") {
        Some(n) if n.kind() == "parameter_list" => parse_parameter_list(n, source),
        Some(n) => vec![RawParam::anonymous(text(n, source))],
        None => vec![],
    };
    Some(RawMethod {
        name,
        params,
        results,
    })
}

fn parse_parameter_list(node: Node, source: &str) -> Vec<RawParam> {
    let mut out = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "parameter_declaration" => {
                let mut names = Vec::new();
                let mut name_cursor = child.walk();
                for name in child.children_by_field_name("name", &mut name_cursor) {
                    names.push(text(name, source));
                }
                let typ = child
                    .child_by_field_name("type")
                    .map(|t| text(t, source))
                    .unwrap_or_default();
                out.push(RawParam {
                    names,
                    typ,
                    variadic: false,
                });
            }
            "variadic_parameter_declaration" => {
                let names = child
                    .child_by_field_name("name")
                    .map(|n| vec![text(n, source)])
                    .unwrap_or_default();
                let typ = child
                    .child_by_field_name("type")
                    .map(|t| text(t, source))
                    .unwrap_or_default();
                out.push(RawParam {
                    names,
                    typ,
                    variadic: true,
                });
            }
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn package(sources: &[(&str, &str)]) -> GoPackage {
        let files: Vec<(String, String)> = sources
            .iter()
            .map(|(n, s)| (n.to_string(), s.to_string()))
            .collect();
        GoPackage::from_sources(&files).unwrap()
    }

    const CACHE_GO: &str = r#"package example

import "context"

type Cache interface {
	Set(ctx context.Context, key, value []byte) error
	Get(ctx context.Context, key []byte) (value []byte, err error)
}
"#;

    #[test]
    fn resolves_interface_with_lexicographic_method_order() {
        let pkg = package(&[("cache.go", CACHE_GO)]);
        let spec = pkg.resolve_interface("Cache").unwrap();
        assert_eq!(spec.package, "example");
        let names: Vec<_> = spec.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["Get", "Set"]);
    }

    #[test]
    fn grouped_and_named_slots_survive_normalization() {
        let pkg = package(&[("cache.go", CACHE_GO)]);
        let spec = pkg.resolve_interface("Cache").unwrap();
        let set = &spec.methods[1];
        let params: Vec<_> = set.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(params, ["ctx", "key", "value"]);
        // anonymous error result gets a synthesized name and the slot flag
        assert_eq!(set.results[0].name, "out");
        assert!(set.results[0].is_error_slot);
    }

    #[test]
    fn import_table_keeps_declared_aliases() {
        let src = r#"package example

import (
	"context"
	stdlog "log"
	_ "embed"
)

type Noop interface{}
"#;
        let pkg = package(&[("a.go", src)]);
        let spec = pkg.resolve_interface("Noop").unwrap();
        assert_eq!(
            spec.imports,
            vec![
                SourceImport { alias: None, path: "context".into() },
                SourceImport { alias: Some("stdlog".into()), path: "log".into() },
            ]
        );
        assert!(spec.methods.is_empty());
    }

    #[test]
    fn embedded_interfaces_flatten_into_the_method_set() {
        let src = r#"package example

import "context"

type Reader interface {
	Get(ctx context.Context, key []byte) ([]byte, error)
}

type Store interface {
	Reader
	Put(ctx context.Context, key []byte) error
}
"#;
        let pkg = package(&[("store.go", src)]);
        let spec = pkg.resolve_interface("Store").unwrap();
        let names: Vec<_> = spec.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["Get", "Put"]);
    }

    #[test]
    fn foreign_embedding_is_reported() {
        let src = r#"package example

import "io"

type Wrapped interface {
	io.Reader
}
"#;
        let pkg = package(&[("w.go", src)]);
        let err = pkg.resolve_interface("Wrapped").unwrap_err();
        assert!(matches!(err, Error::Extraction(_)), "got {err:?}");
        assert!(err.to_string().contains("io.Reader"));
    }

    #[test]
    fn missing_and_non_interface_names_are_distinguished() {
        let src = r#"package example

type Config struct {
	Addr string
}
"#;
        let pkg = package(&[("c.go", src)]);
        assert!(matches!(
            pkg.resolve_interface("Nope").unwrap_err(),
            Error::NotFound { .. }
        ));
        assert!(matches!(
            pkg.resolve_interface("Config").unwrap_err(),
            Error::NotAnInterface(_)
        ));
    }

    #[test]
    fn variadic_method_keeps_element_type() {
        let src = r#"package example

import "context"

type Runner interface {
	Exec(ctx context.Context, args ...string) error
}
"#;
        let pkg = package(&[("r.go", src)]);
        let spec = pkg.resolve_interface("Runner").unwrap();
        let exec = &spec.methods[0];
        let last = exec.params.last().unwrap();
        assert!(last.variadic);
        assert_eq!(last.typ, "string");
        assert_eq!(last.name, "args");
    }

    #[test]
    fn conflicting_package_clauses_fail_to_load() {
        let files = vec![
            ("a.go".to_string(), "package one\n".to_string()),
            ("b.go".to_string(), "package two\n".to_string()),
        ];
        let err = GoPackage::from_sources(&files).unwrap_err();
        assert!(matches!(err, Error::Load(_)));
    }

    #[test]
    fn hash_is_stable_for_identical_sources() {
        let a = package(&[("cache.go", CACHE_GO)]);
        let b = package(&[("cache.go", CACHE_GO)]);
        assert_eq!(
            a.resolve_interface("Cache").unwrap().source_hash,
            b.resolve_interface("Cache").unwrap().source_hash
        );
    }
}
