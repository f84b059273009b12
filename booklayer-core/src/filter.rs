//! Typed filters and updates passed to store backends.
//!
//! The repository only ever addresses documents by identifier and only ever
//! replaces their fields wholesale, so these are the only two shapes:
//!
//! - [`IdFilter`] - matches documents whose `_id` equals a given [`ObjectId`]
//! - [`FieldReplacement`] - sets the fields a record carries and removes the
//!   fields it leaves out, never touching `_id`
//!
//! Backends translate them into their native form (for MongoDB, `{"_id": ...}`
//! and `{"$set": ..., "$unset": ...}`) or apply them directly.

use bson::{Bson, Document as BsonDocument, oid::ObjectId};

use crate::document::{Document, ID_FIELD};

/// Matches documents whose identifier equals `id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdFilter {
    id: ObjectId,
}

impl IdFilter {
    pub fn new(id: ObjectId) -> Self {
        Self { id }
    }

    pub fn id(&self) -> &ObjectId {
        &self.id
    }

    /// Returns `true` if the document's `_id` equals this filter's id.
    pub fn matches(&self, document: &BsonDocument) -> bool {
        matches!(document.get(ID_FIELD), Some(Bson::ObjectId(id)) if *id == self.id)
    }
}

impl From<ObjectId> for IdFilter {
    fn from(id: ObjectId) -> Self {
        Self::new(id)
    }
}

/// Replaces every stored field of a document with the fields of a record.
///
/// Fields present on the record are set; fields named by [`Document::FIELDS`]
/// but absent from the record are removed, so the stored document ends up
/// holding exactly what the record holds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldReplacement {
    set: BsonDocument,
    unset: Vec<String>,
}

impl FieldReplacement {
    /// Builds a replacement from a serialized record of type `D`.
    ///
    /// Any `_id` in `fields` is dropped.
    pub fn for_record<D: Document>(mut fields: BsonDocument) -> Self {
        fields.remove(ID_FIELD);

        let unset = D::FIELDS
            .iter()
            .filter(|name| !fields.contains_key(**name))
            .map(|name| name.to_string())
            .collect();

        Self { set: fields, unset }
    }

    /// Fields to set, with their new values.
    pub fn set(&self) -> &BsonDocument {
        &self.set
    }

    /// Fields to remove.
    pub fn unset(&self) -> &[String] {
        &self.unset
    }

    /// Applies this replacement to `target` in place.
    ///
    /// Returns `true` if the document changed.
    pub fn apply(&self, target: &mut BsonDocument) -> bool {
        let mut modified = false;

        for (field, value) in self.set.iter() {
            if target.get(field) != Some(value) {
                target.insert(field.clone(), value.clone());
                modified = true;
            }
        }

        for field in &self.unset {
            if target.remove(field).is_some() {
                modified = true;
            }
        }

        modified
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use bson::doc;

    use crate::{book::Book, document::DocumentExt};

    #[test]
    fn test_id_filter_matches_only_same_id() {
        let id = ObjectId::new();
        let filter = IdFilter::new(id);

        assert!(filter.matches(&doc! { "_id": id, "title": "Invisible Cities" }));
        assert!(!filter.matches(&doc! { "_id": ObjectId::new() }));
        assert!(!filter.matches(&doc! { "title": "Invisible Cities" }));
        assert!(!filter.matches(&doc! { "_id": id.to_hex() }));
    }

    #[test]
    fn test_replacement_unsets_absent_fields() {
        let book = Book {
            id: Some(ObjectId::new()),
            title: Some("Bumi manusia".to_string()),
            ..Book::default()
        };

        let replacement = FieldReplacement::for_record::<Book>(book.to_document().unwrap());

        assert_eq!(replacement.set(), &doc! { "title": "Bumi manusia" });
        assert_eq!(replacement.unset(), &["author".to_string(), "year_published".to_string()]);
    }

    #[test]
    fn test_replacement_apply_overwrites_and_keeps_id() {
        let id = ObjectId::new();
        let mut stored = doc! {
            "_id": id,
            "title": "Invisible Cities",
            "author": "Italo Calvino",
            "year_published": 1974,
        };
        let replacement = FieldReplacement::for_record::<Book>(doc! {
            "_id": ObjectId::new(),
            "title": "Bumi manusia",
            "year_published": 1980,
        });

        assert!(replacement.apply(&mut stored));
        assert_eq!(stored, doc! { "_id": id, "title": "Bumi manusia", "year_published": 1980 });
    }

    #[test]
    fn test_replacement_apply_reports_unchanged() {
        let mut stored = doc! { "_id": ObjectId::new(), "title": "Invisible Cities" };
        let replacement = FieldReplacement::for_record::<Book>(doc! { "title": "Invisible Cities" });

        assert!(!replacement.apply(&mut stored));
    }
}
