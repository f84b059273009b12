//! The `Book` record.

use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::document::Document;

/// A book in the collection.
///
/// Every field other than the identifier is optional and omitted from the
/// stored document when absent. The publication year is stored under
/// `year_published`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(rename = "year_published", default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

impl Book {
    /// Creates an unpersisted book with all fields set.
    pub fn new(title: impl Into<String>, author: impl Into<String>, year: i32) -> Self {
        Self {
            id: None,
            title: Some(title.into()),
            author: Some(author.into()),
            year: Some(year),
        }
    }

    /// Returns this book with the identifier cleared, for comparing contents.
    pub fn without_id(&self) -> Self {
        Self {
            id: None,
            ..self.clone()
        }
    }
}

impl Document for Book {
    const FIELDS: &'static [&'static str] = &["title", "author", "year_published"];

    fn set_id(&mut self, id: ObjectId) {
        self.id = Some(id);
    }
}
