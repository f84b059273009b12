//! Core traits for records stored in a collection and their serialization.
//!
//! A record is any serde type that carries an optional store-assigned
//! [`ObjectId`] and knows the names of the fields it persists. Conversions to
//! and from BSON documents (for the store) and JSON (for display) live on
//! [`DocumentExt`].

use bson::{Bson, Document as BsonDocument, de::deserialize_from_bson, oid::ObjectId, ser::serialize_to_bson};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Value, to_value};

use crate::error::{StoreError, StoreResult};

/// Name of the identifier field in every stored document.
pub const ID_FIELD: &str = "_id";

/// Core trait that every record managed by a [`Repository`](crate::repository::Repository)
/// must implement.
///
/// The identifier is assigned by the store on insert, so it is optional on the
/// in-memory value: `None` until the record has been persisted.
///
/// # Example
///
/// ```ignore
/// use booklayer::document::Document;
/// use bson::oid::ObjectId;
/// use serde::{Serialize, Deserialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// pub struct Shelf {
///     #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
///     pub id: Option<ObjectId>,
///     #[serde(skip_serializing_if = "Option::is_none")]
///     pub label: Option<String>,
/// }
///
/// impl Document for Shelf {
///     const FIELDS: &'static [&'static str] = &["label"];
///
///     fn set_id(&mut self, id: ObjectId) { self.id = Some(id) }
/// }
/// ```
pub trait Document: Serialize + DeserializeOwned + Send + Sync + Clone + 'static {
    /// Stored field names, excluding `_id`.
    ///
    /// Updates replace exactly these fields: the ones present on the new record
    /// are set, the rest are removed.
    const FIELDS: &'static [&'static str];

    /// Records the identifier the store assigned to this record.
    fn set_id(&mut self, id: ObjectId);
}

/// Extension trait providing conversions for records.
///
/// Implemented for every [`Document`].
pub trait DocumentExt: Document {
    /// Converts this record to a BSON document. Absent fields are omitted.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or does not produce a document.
    fn to_document(&self) -> StoreResult<BsonDocument>;

    /// Creates a record from a BSON document read from the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the document does not decode into this record type.
    fn from_document(document: BsonDocument) -> StoreResult<Self>;

    /// Converts this record to a JSON value for display.
    ///
    /// The identifier is rendered in extended JSON (`{"$oid": "..."}`).
    fn to_json(&self) -> StoreResult<Value>;
}

impl<D: Document> DocumentExt for D {
    fn to_document(&self) -> StoreResult<BsonDocument> {
        match serialize_to_bson(self)? {
            Bson::Document(document) => Ok(document),
            other => Err(StoreError::InvalidDocument(format!(
                "expected a document, got {:?}",
                other.element_type()
            ))),
        }
    }

    fn from_document(document: BsonDocument) -> StoreResult<Self> {
        Ok(deserialize_from_bson(Bson::Document(document))?)
    }

    fn to_json(&self) -> StoreResult<Value> {
        Ok(to_value(self)?)
    }
}
