//! Schema compilation and document checking on top of `jsonschema`
//!
//! The engine never does I/O: external `$ref`s are fetched up front through
//! the loader registry and served to the compiler from a [`PrefetchedSchemas`]
//! map.

use super::error::{Result, SchemaError};
use jsonschema::error::{TypeKind, ValidationErrorKind};
use jsonschema::{Retrieve, Uri, ValidationError, Validator};
use reqwest::Url;
use serde_json::Value;
use std::collections::HashMap;

/// Documents fetched ahead of compilation, keyed by URI without fragment
#[derive(Debug, Clone, Default)]
pub struct PrefetchedSchemas {
    documents: HashMap<String, Value>,
}

impl PrefetchedSchemas {
    /// Whether `uri` has already been fetched
    #[must_use]
    pub fn contains(&self, uri: &Url) -> bool {
        self.documents.contains_key(&document_key(uri))
    }

    /// Store a fetched document
    pub fn insert(&mut self, uri: &Url, document: Value) {
        self.documents.insert(document_key(uri), document);
    }
}

impl Retrieve for PrefetchedSchemas {
    fn retrieve(
        &self,
        uri: &Uri<String>,
    ) -> std::result::Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let key = uri.as_str().split('#').next().unwrap_or_default();
        self.documents
            .get(key)
            .cloned()
            .ok_or_else(|| format!("referenced schema '{key}' was not fetched").into())
    }
}

fn document_key(uri: &Url) -> String {
    let mut uri = uri.clone();
    uri.set_fragment(None);
    uri.to_string()
}

/// Keywords whose values are instance data, never subschemas
const DATA_KEYWORDS: &[&str] = &["enum", "const", "default", "examples"];

/// Keywords whose values map names to subschemas
const SCHEMA_MAP_KEYWORDS: &[&str] = &[
    "properties",
    "patternProperties",
    "definitions",
    "$defs",
    "dependentSchemas",
];

/// External `$ref` targets of `schema`, resolved against `base`
///
/// A nested `$id` changes the base for everything beneath it. Fragment-only
/// references (`#/definitions/...`) stay inside the document and are
/// skipped, as are values of data keywords such as `enum`. Returned URIs
/// carry no fragment.
#[must_use]
pub fn external_refs(schema: &Value, base: &Url) -> Vec<Url> {
    let mut refs = Vec::new();
    collect_refs(schema, base, &mut refs);
    refs
}

fn collect_refs(schema: &Value, base: &Url, refs: &mut Vec<Url>) {
    match schema {
        Value::Object(map) => {
            let scoped = match map.get("$id") {
                Some(Value::String(id)) => base.join(id).ok(),
                _ => None,
            };
            let base = scoped.as_ref().unwrap_or(base);

            if let Some(Value::String(reference)) = map.get("$ref") {
                if !reference.starts_with('#') {
                    if let Ok(mut target) = base.join(reference) {
                        target.set_fragment(None);
                        if !refs.contains(&target) {
                            refs.push(target);
                        }
                    }
                }
            }

            for (keyword, child) in map {
                if DATA_KEYWORDS.contains(&keyword.as_str()) {
                    continue;
                }
                match child {
                    Value::Object(named) if SCHEMA_MAP_KEYWORDS.contains(&keyword.as_str()) => {
                        for subschema in named.values() {
                            collect_refs(subschema, base, refs);
                        }
                    }
                    _ => collect_refs(child, base, refs),
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_refs(item, base, refs);
            }
        }
        _ => {}
    }
}

/// Compile `schema` fetched from `uri`
///
/// A root schema without `$id` is given `uri` as its identifier so relative
/// references resolve against where it was fetched from.
///
/// # Errors
///
/// Returns `SchemaCompile` if the schema is not a valid JSON schema or a
/// reference cannot be resolved from `prefetched`
pub fn compile(mut schema: Value, uri: &Url, prefetched: PrefetchedSchemas) -> Result<Validator> {
    if let Value::Object(map) = &mut schema {
        map.entry("$id")
            .or_insert_with(|| Value::String(uri.to_string()));
    }

    jsonschema::options()
        .with_retriever(prefetched)
        .build(&schema)
        .map_err(|e| SchemaError::SchemaCompile {
            uri: uri.to_string(),
            reason: e.to_string(),
        })
}

/// Check `document` against a compiled schema
///
/// # Errors
///
/// Returns `Validation` with one diagnostic line per violation
pub fn check(validator: &Validator, document: &Value, uri: &Url) -> Result<()> {
    let lines: Vec<String> = validator.iter_errors(document).map(|e| describe(&e)).collect();
    if lines.is_empty() {
        return Ok(());
    }

    Err(SchemaError::Validation {
        uri: uri.to_string(),
        diagnostic: lines.join("\n"),
    })
}

fn describe(error: &ValidationError<'_>) -> String {
    let detail = match &error.kind {
        ValidationErrorKind::Required { property } => {
            let name = property
                .as_str()
                .map_or_else(|| property.to_string(), str::to_string);
            format!("missing property '{name}'")
        }
        ValidationErrorKind::Type {
            kind: TypeKind::Single(expected),
        } => format!("got {}, want {expected}", json_type(&error.instance)),
        _ => error.to_string(),
    };

    format!("- at '{}': {detail}", error.instance_path)
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
