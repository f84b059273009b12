//! Translation from booklayer filters and updates to MongoDB syntax.

use bson::{Document, doc};

use booklayer_core::{
    document::ID_FIELD,
    filter::{FieldReplacement, IdFilter},
};

/// Translates typed filters and updates into MongoDB BSON documents.
pub(crate) struct MongoQueryTranslator;

impl MongoQueryTranslator {
    /// `{ "_id": <oid> }`
    pub(crate) fn filter(filter: &IdFilter) -> Document {
        doc! { ID_FIELD: *filter.id() }
    }

    /// `{ "$set": {...}, "$unset": {...} }`, omitting either operator when it
    /// has no fields.
    pub(crate) fn update(update: &FieldReplacement) -> Document {
        let mut translated = Document::new();

        if !update.set().is_empty() {
            translated.insert("$set", update.set().clone());
        }
        if !update.unset().is_empty() {
            translated.insert(
                "$unset",
                update
                    .unset()
                    .iter()
                    .map(|field| (field.clone(), bson::Bson::String(String::new())))
                    .collect::<Document>(),
            );
        }

        translated
    }
}
