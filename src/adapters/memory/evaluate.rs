//! In-process evaluation of aggregation stages
//!
//! Follows MongoDB semantics for the stages Medigram uses:
//! - dotted paths traverse arrays, collecting every element's value
//! - a `$lookup` whose local path is missing matches foreign documents whose
//!   key is null or missing
//! - `$unwind` with preservation removes an empty array field and leaves
//!   missing or null fields alone
//! - `$arrayElemAt` on an empty match leaves the embedded field unset

use crate::core::aggregation::{Pipeline, Stage};
use crate::domain::Collection;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Bson, Document};
use std::collections::HashMap;

/// Runs `pipeline` over a snapshot of all collections
pub(crate) fn run(pipeline: &Pipeline, collections: &HashMap<Collection, Vec<Document>>) -> Vec<Document> {
    let mut documents = collections
        .get(&pipeline.root())
        .cloned()
        .unwrap_or_default();

    for stage in pipeline.stages() {
        documents = apply(stage, documents, collections);
    }
    documents
}

fn apply(
    stage: &Stage,
    documents: Vec<Document>,
    collections: &HashMap<Collection, Vec<Document>>,
) -> Vec<Document> {
    match stage {
        Stage::MatchId(id) => match_id(documents, id),
        Stage::Lookup {
            from,
            local_field,
            foreign_field,
            as_field,
        } => {
            let foreign = collections.get(from).map(Vec::as_slice).unwrap_or(&[]);
            documents
                .into_iter()
                .map(|doc| lookup(doc, foreign, local_field, foreign_field, as_field))
                .collect()
        }
        Stage::Unwind {
            field,
            preserve_null_and_empty,
        } => documents
            .into_iter()
            .flat_map(|doc| unwind(doc, field, *preserve_null_and_empty))
            .collect(),
        Stage::EmbedMatching {
            array,
            candidates,
            key,
            as_field,
        } => documents
            .into_iter()
            .map(|doc| embed_matching(doc, array, candidates, key, as_field))
            .collect(),
        Stage::Exclude(fields) => documents
            .into_iter()
            .map(|mut doc| {
                for field in fields {
                    doc.remove(field);
                }
                doc
            })
            .collect(),
    }
}

fn match_id(documents: Vec<Document>, id: &ObjectId) -> Vec<Document> {
    documents
        .into_iter()
        .filter(|doc| matches!(doc.get("_id"), Some(Bson::ObjectId(oid)) if oid == id))
        .collect()
}

/// Collects every value reachable at a dotted `path`
///
/// Arrays met along the way are traversed, and an array at the end of the
/// path contributes its elements.
pub(crate) fn resolve_path(document: &Document, path: &str) -> Vec<Bson> {
    let segments: Vec<&str> = path.split('.').collect();
    let mut out = Vec::new();
    if let Some(first) = document.get(segments[0]) {
        collect(first, &segments[1..], &mut out);
    }
    out
}

fn collect(value: &Bson, rest: &[&str], out: &mut Vec<Bson>) {
    match (value, rest.split_first()) {
        (Bson::Array(items), None) => out.extend(items.iter().cloned()),
        (other, None) => out.push(other.clone()),
        (Bson::Document(doc), Some((segment, tail))) => {
            if let Some(next) = doc.get(*segment) {
                collect(next, tail, out);
            }
        }
        (Bson::Array(items), Some(_)) => {
            for item in items {
                if let Bson::Document(_) = item {
                    collect(item, rest, out);
                }
            }
        }
        _ => {}
    }
}

/// Values used for equality matching; a missing path matches null
fn keys_of(document: &Document, path: &str) -> Vec<Bson> {
    let values = resolve_path(document, path);
    if values.is_empty() {
        vec![Bson::Null]
    } else {
        values
    }
}

fn lookup(
    mut document: Document,
    foreign: &[Document],
    local_field: &str,
    foreign_field: &str,
    as_field: &str,
) -> Document {
    let local_keys = keys_of(&document, local_field);
    let joined: Vec<Bson> = foreign
        .iter()
        .filter(|candidate| {
            keys_of(candidate, foreign_field)
                .iter()
                .any(|key| local_keys.contains(key))
        })
        .cloned()
        .map(Bson::Document)
        .collect();

    document.insert(as_field, Bson::Array(joined));
    document
}

fn unwind(mut document: Document, field: &str, preserve: bool) -> Vec<Document> {
    match document.get(field).cloned() {
        Some(Bson::Array(items)) if items.is_empty() => {
            if preserve {
                document.remove(field);
                vec![document]
            } else {
                Vec::new()
            }
        }
        Some(Bson::Array(items)) => items
            .into_iter()
            .map(|item| {
                let mut copy = document.clone();
                copy.insert(field, item);
                copy
            })
            .collect(),
        None | Some(Bson::Null) => {
            if preserve {
                vec![document]
            } else {
                Vec::new()
            }
        }
        Some(_) => vec![document],
    }
}

fn embed_matching(
    mut document: Document,
    array: &str,
    candidates: &str,
    key: &str,
    as_field: &str,
) -> Document {
    let pool: Vec<Document> = match document.get(candidates) {
        Some(Bson::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_document().cloned())
            .collect(),
        _ => Vec::new(),
    };

    let embedded = match document.get(array) {
        Some(Bson::Array(items)) => Bson::Array(
            items
                .iter()
                .map(|item| match item {
                    Bson::Document(element) => {
                        let mut merged = element.clone();
                        let wanted = element.get(key).cloned().unwrap_or(Bson::Null);
                        if let Some(found) = pool
                            .iter()
                            .find(|candidate| candidate.get("_id").cloned().unwrap_or(Bson::Null) == wanted)
                        {
                            merged.insert(as_field, found.clone());
                        }
                        Bson::Document(merged)
                    }
                    other => other.clone(),
                })
                .collect(),
        ),
        _ => Bson::Null,
    };

    document.insert(array, embedded);
    document
}
