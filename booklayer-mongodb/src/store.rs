use std::time::Duration;

use async_trait::async_trait;
use bson::{Document, doc, oid::ObjectId};
use mongodb::{Client, Collection as MongoCollection, options::ClientOptions};

use booklayer_core::{
    backend::{StoreBackend, StoreBackendBuilder, UpdateOutcome},
    error::{ConnectionError, ConnectionResult, StoreError, StoreResult},
    filter::{FieldReplacement, IdFilter},
};

use crate::query::MongoQueryTranslator;

#[derive(Debug)]
pub struct MongoDbStore {
    client: Client,
    database: String,
}

impl MongoDbStore {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    pub fn builder(dsn: &str, database: &str) -> MongoDbStoreBuilder {
        MongoDbStoreBuilder::new(dsn, database)
    }

    fn get_collection(&self, collection_name: &str) -> MongoCollection<Document> {
        self.client
            .database(&self.database)
            .collection(collection_name)
    }

    async fn shutdown(self) -> StoreResult<()> {
        self.client.shutdown().await;

        Ok(())
    }
}

#[async_trait]
impl StoreBackend for MongoDbStore {
    async fn insert_one(&self, collection: &str, document: Document) -> StoreResult<ObjectId> {
        let inserted = self.get_collection(collection)
            .insert_one(document)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .inserted_id;

        inserted
            .as_object_id()
            .ok_or_else(|| StoreError::InvalidDocument(format!("generated id {inserted} is not an ObjectId")))
    }

    async fn find_one(&self, collection: &str, filter: &IdFilter) -> StoreResult<Option<Document>> {
        self.get_collection(collection)
            .find_one(MongoQueryTranslator::filter(filter))
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &IdFilter,
        update: &FieldReplacement,
    ) -> StoreResult<UpdateOutcome> {
        let result = self.get_collection(collection)
            .update_one(
                MongoQueryTranslator::filter(filter),
                MongoQueryTranslator::update(update),
            )
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(UpdateOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn delete_many(&self, collection: &str, filter: &IdFilter) -> StoreResult<u64> {
        Ok(
            self.get_collection(collection)
                .delete_many(MongoQueryTranslator::filter(filter))
                .await
                .map_err(|e| StoreError::Backend(e.to_string()))?
                .deleted_count
        )
    }

    async fn shutdown(self) -> StoreResult<()> {
        self.shutdown().await
    }
}

/// Connects a [`MongoDbStore`].
///
/// Building parses the connection string, creates the client and pings the
/// database, so an unreachable server is reported here rather than on the
/// first repository call. When a connect timeout is set, the driver's
/// connect and server-selection timeouts are both capped at it.
pub struct MongoDbStoreBuilder {
    dsn: String,
    database: String,
    connect_timeout: Option<Duration>,
}

impl MongoDbStoreBuilder {
    pub fn new(dsn: &str, database: &str) -> Self {
        Self {
            dsn: dsn.to_string(),
            database: database.to_string(),
            connect_timeout: None,
        }
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }
}

#[async_trait]
impl StoreBackendBuilder for MongoDbStoreBuilder {
    type Backend = MongoDbStore;

    async fn build(self) -> ConnectionResult<Self::Backend> {
        let mut options = ClientOptions::parse(&self.dsn)
            .await
            .map_err(|e| ConnectionError::InvalidUri(e.to_string()))?;

        if let Some(timeout) = self.connect_timeout {
            options.connect_timeout = Some(timeout);
            options.server_selection_timeout = Some(timeout);
        }

        let client = Client::with_options(options)
            .map_err(|e| ConnectionError::InvalidUri(e.to_string()))?;

        client
            .database(&self.database)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| ConnectionError::Unreachable(e.to_string()))?;

        tracing::debug!(database = %self.database, "mongodb ping succeeded");

        Ok(MongoDbStore::new(client, self.database))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use booklayer_core::{
        book::Book,
        context::CallContext,
        provision::provision,
        repository::BookRepository,
    };

    #[tokio::test]
    async fn test_build_rejects_malformed_uri() {
        let err = MongoDbStore::builder("not-a-mongo-uri", "myDB")
            .build()
            .await
            .unwrap_err();

        assert!(matches!(err, ConnectionError::InvalidUri(_)));
    }

    #[tokio::test]
    async fn test_build_rejects_empty_uri() {
        let err = MongoDbStore::builder("", "myDB")
            .build()
            .await
            .unwrap_err();

        assert!(matches!(err, ConnectionError::InvalidUri(_)));
    }

    #[tokio::test]
    async fn test_provision_unreachable_host_fails() {
        let builder = MongoDbStore::builder("mongodb://127.0.0.1:1/?directConnection=true", "myDB")
            .connect_timeout(Duration::from_millis(200));

        let err = provision(builder, "favorite_books", Duration::from_secs(5))
            .await
            .unwrap_err();

        assert!(matches!(err, ConnectionError::Unreachable(_) | ConnectionError::DeadlineExceeded(_)));
    }

    /// Runs the full create/read/update/delete cycle against a live server.
    ///
    /// Set `BOOKS_MONGODB_URI` and run with `--ignored`.
    #[tokio::test]
    #[ignore = "requires a running MongoDB server"]
    async fn test_live_round_trip() {
        let uri = std::env::var("BOOKS_MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let builder = MongoDbStore::builder(&uri, "booklayer_test").connect_timeout(Duration::from_secs(5));
        let collection = provision(builder, "favorite_books", Duration::from_secs(10)).await.unwrap();
        let books = BookRepository::new(collection, Duration::from_secs(10));
        let ctx = CallContext::background();

        let created = books
            .create(&ctx, Book::new("Invisible Cities", "Italo Calvino", 1974))
            .await
            .unwrap();
        let id = created.id.unwrap();
        assert_eq!(books.read(&ctx, id).await.unwrap(), created);

        let replacement = Book::new("Bumi manusia", "Pramoedya Ananta Toer", 1980);
        books.update(&ctx, id, replacement.clone()).await.unwrap();
        assert_eq!(books.read(&ctx, id).await.unwrap().without_id(), replacement);

        assert_eq!(books.delete(&ctx, id).await.unwrap(), 1);
        assert!(books.read(&ctx, id).await.unwrap_err().is_not_found());
        assert_eq!(books.delete(&ctx, id).await.unwrap(), 0);

        books.shutdown().await.unwrap();
    }
}
