//! Typed aggregation pipelines
//!
//! A [`Pipeline`] is a root collection plus an ordered list of [`Stage`]s.
//! Stages render to the MongoDB aggregation language for the driver, and the
//! in-memory backend evaluates the same values directly.

use crate::domain::Collection;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, Document};

/// One step of a read-view pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    /// Keep only the document whose `_id` equals the given value
    MatchId(ObjectId),

    /// Left-join `from` on `local_field == foreign_field` into array `as_field`
    ///
    /// `local_field` may be a dotted path through an array, in which case
    /// any element value matches.
    Lookup {
        from: Collection,
        local_field: String,
        foreign_field: String,
        as_field: String,
    },

    /// Flatten a single-valued join array into a sub-document
    ///
    /// With `preserve_null_and_empty`, documents whose array is empty or
    /// missing are kept rather than dropped.
    Unwind {
        field: String,
        preserve_null_and_empty: bool,
    },

    /// For each element of `array`, embed the first document of `candidates`
    /// whose `_id` equals the element's `key` field, under `as_field`
    EmbedMatching {
        array: String,
        candidates: String,
        key: String,
        as_field: String,
    },

    /// Remove top-level fields from the output
    Exclude(Vec<String>),
}

impl Stage {
    /// Renders the stage as a MongoDB aggregation stage document
    pub fn to_document(&self) -> Document {
        match self {
            Stage::MatchId(id) => doc! { "$match": { "_id": *id } },
            Stage::Lookup {
                from,
                local_field,
                foreign_field,
                as_field,
            } => doc! {
                "$lookup": {
                    "from": from.name(),
                    "localField": local_field.as_str(),
                    "foreignField": foreign_field.as_str(),
                    "as": as_field.as_str(),
                }
            },
            Stage::Unwind {
                field,
                preserve_null_and_empty,
            } => doc! {
                "$unwind": {
                    "path": format!("${field}"),
                    "preserveNullAndEmptyArrays": *preserve_null_and_empty,
                }
            },
            Stage::EmbedMatching {
                array,
                candidates,
                key,
                as_field,
            } => {
                let first_match = doc! {
                    "$arrayElemAt": [
                        {
                            "$filter": {
                                "input": format!("${candidates}"),
                                "as": "candidate",
                                "cond": {
                                    "$eq": ["$$candidate._id", format!("$$element.{key}")]
                                }
                            }
                        },
                        0
                    ]
                };
                let mut embedded = Document::new();
                embedded.insert(as_field.as_str(), first_match);

                let mut fields = Document::new();
                fields.insert(
                    array.as_str(),
                    doc! {
                        "$map": {
                            "input": format!("${array}"),
                            "as": "element",
                            "in": { "$mergeObjects": ["$$element", embedded] }
                        }
                    },
                );
                doc! { "$addFields": fields }
            }
            Stage::Exclude(fields) => {
                let mut projection = Document::new();
                for field in fields {
                    projection.insert(field.as_str(), 0);
                }
                doc! { "$project": projection }
            }
        }
    }
}

/// An aggregation pipeline rooted at one collection
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    root: Collection,
    stages: Vec<Stage>,
}

impl Pipeline {
    /// Starts an empty pipeline over `root`
    pub fn on(root: Collection) -> Self {
        Self {
            root,
            stages: Vec::new(),
        }
    }

    /// Collection the pipeline runs against
    pub fn root(&self) -> Collection {
        self.root
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn match_id(mut self, id: impl Into<ObjectId>) -> Self {
        self.stages.push(Stage::MatchId(id.into()));
        self
    }

    pub fn lookup(
        mut self,
        from: Collection,
        local_field: &str,
        foreign_field: &str,
        as_field: &str,
    ) -> Self {
        self.stages.push(Stage::Lookup {
            from,
            local_field: local_field.to_string(),
            foreign_field: foreign_field.to_string(),
            as_field: as_field.to_string(),
        });
        self
    }

    /// Unwinds `field`, keeping documents with no match
    pub fn unwind_preserving(mut self, field: &str) -> Self {
        self.stages.push(Stage::Unwind {
            field: field.to_string(),
            preserve_null_and_empty: true,
        });
        self
    }

    pub fn embed_matching(mut self, array: &str, candidates: &str, key: &str, as_field: &str) -> Self {
        self.stages.push(Stage::EmbedMatching {
            array: array.to_string(),
            candidates: candidates.to_string(),
            key: key.to_string(),
            as_field: as_field.to_string(),
        });
        self
    }

    pub fn exclude(mut self, fields: &[&str]) -> Self {
        self.stages
            .push(Stage::Exclude(fields.iter().map(|f| f.to_string()).collect()));
        self
    }

    /// Renders every stage, in order, for the driver
    pub fn to_documents(&self) -> Vec<Document> {
        self.stages.iter().map(Stage::to_document).collect()
    }
}
