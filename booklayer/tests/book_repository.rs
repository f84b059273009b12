use std::{collections::HashSet, time::Duration};

use booklayer::{memory::InMemoryStore, prelude::*};

async fn open_test() -> (InMemoryStore, BookRepository<InMemoryStore>) {
    let collection = provision(InMemoryStore::builder(), "favorite_books", Duration::from_secs(1))
        .await
        .unwrap();
    let handle = collection.backend().clone();

    (handle, BookRepository::new(collection, Duration::from_secs(1)))
}

fn invisible_cities() -> Book {
    Book::new("Invisible Cities", "Italo Calvino", 1974)
}

fn bumi_manusia() -> Book {
    Book::new("Bumi manusia", "Pramoedya Ananta Toer", 1980)
}

#[tokio::test]
async fn test_create_then_read() {
    let (_handle, books) = open_test().await;
    let ctx = CallContext::background();

    let created = books.create(&ctx, invisible_cities()).await.unwrap();
    let id = created.id.unwrap();
    let fetched = books.read(&ctx, id).await.unwrap();

    assert_eq!(created.without_id(), invisible_cities());
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_create_empty_book() {
    let (handle, books) = open_test().await;
    let ctx = CallContext::background();

    let created = books.create(&ctx, Book::default()).await.unwrap();
    let fetched = books.read(&ctx, created.id).await.unwrap();

    assert!(created.id.is_some());
    assert_eq!(fetched, created);
    assert_eq!(handle.count("favorite_books").await, 1);
}

#[tokio::test]
async fn test_update_overwrites() {
    let (_handle, books) = open_test().await;
    let ctx = CallContext::background();

    let id = books.create(&ctx, invisible_cities()).await.unwrap().id.unwrap();
    let written = books.update(&ctx, id, bumi_manusia()).await.unwrap();
    let fetched = books.read(&ctx, id).await.unwrap();

    assert_eq!(written.id, Some(id));
    assert_eq!(fetched, written);
    assert_eq!(fetched.without_id(), bumi_manusia());
}

#[tokio::test]
async fn test_update_does_not_merge() {
    let (_handle, books) = open_test().await;
    let ctx = CallContext::background();

    let id = books.create(&ctx, invisible_cities()).await.unwrap().id.unwrap();
    let title_only = Book {
        title: Some("Le città invisibili".to_string()),
        ..Book::default()
    };
    books.update(&ctx, id, title_only.clone()).await.unwrap();
    let fetched = books.read(&ctx, id).await.unwrap();

    assert_eq!(fetched.without_id(), title_only);
    assert!(fetched.author.is_none());
    assert!(fetched.year.is_none());
}

#[tokio::test]
async fn test_update_missing_is_not_found() {
    let (_handle, books) = open_test().await;
    let ctx = CallContext::background();

    let err = books.update(&ctx, ObjectId::new(), bumi_manusia()).await.unwrap_err();

    assert!(matches!(err, RepositoryError::NotFound(_, collection) if collection == "favorite_books"));
}

#[tokio::test]
async fn test_delete_then_read_is_not_found() {
    let (handle, books) = open_test().await;
    let ctx = CallContext::background();

    let id = books.create(&ctx, invisible_cities()).await.unwrap().id.unwrap();

    assert_eq!(books.delete(&ctx, id).await.unwrap(), 1);
    assert!(books.read(&ctx, id).await.unwrap_err().is_not_found());
    assert_eq!(handle.count("favorite_books").await, 0);
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let (_handle, books) = open_test().await;
    let ctx = CallContext::background();

    let id = books.create(&ctx, invisible_cities()).await.unwrap().id.unwrap();

    assert_eq!(books.delete(&ctx, id).await.unwrap(), 1);
    assert_eq!(books.delete(&ctx, id).await.unwrap(), 0);
}

#[tokio::test]
async fn test_delete_leaves_other_records() {
    let (handle, books) = open_test().await;
    let ctx = CallContext::background();

    let first = books.create(&ctx, invisible_cities()).await.unwrap();
    let second = books.create(&ctx, bumi_manusia()).await.unwrap();

    assert_eq!(books.delete(&ctx, first.id).await.unwrap(), 1);
    assert_eq!(books.read(&ctx, second.id).await.unwrap(), second);
    assert_eq!(handle.count("favorite_books").await, 1);
}

#[tokio::test]
async fn test_read_absent_id_is_not_found() {
    let (_handle, books) = open_test().await;
    let ctx = CallContext::background();

    let err = books.read(&ctx, None::<ObjectId>).await.unwrap_err();

    assert!(err.is_not_found());
    assert!(!matches!(err, RepositoryError::Store(_)));
}

#[tokio::test]
async fn test_update_absent_id_is_not_found() {
    let (_handle, books) = open_test().await;
    let ctx = CallContext::background();

    let existing = books.create(&ctx, invisible_cities()).await.unwrap();
    let err = books.update(&ctx, None::<ObjectId>, Book::default()).await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(books.read(&ctx, existing.id).await.unwrap(), existing);
}

#[tokio::test]
async fn test_update_with_outcome_counts_changes() {
    let (_handle, books) = open_test().await;
    let ctx = CallContext::background();

    let id = books.create(&ctx, invisible_cities()).await.unwrap().id.unwrap();
    let (_, first) = books.update_with_outcome(&ctx, id, bumi_manusia()).await.unwrap();
    let (_, repeated) = books.update_with_outcome(&ctx, id, bumi_manusia()).await.unwrap();

    assert_eq!(first, UpdateOutcome { matched: 1, modified: 1 });
    assert_eq!(repeated, UpdateOutcome { matched: 1, modified: 0 });
}

#[tokio::test]
async fn test_read_unknown_id_is_not_found() {
    let (_handle, books) = open_test().await;

    let err = books
        .read(&CallContext::background(), ObjectId::new())
        .await
        .unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_slow_store_times_out() {
    let collection = provision(
        InMemoryStore::builder().latency(Duration::from_millis(500)),
        "favorite_books",
        Duration::from_secs(1),
    )
    .await
    .unwrap();
    let handle = collection.backend().clone();
    let books = BookRepository::new(collection, Duration::from_millis(20));
    let ctx = CallContext::background();
    let id = ObjectId::new();

    for err in [
        books.create(&ctx, invisible_cities()).await.unwrap_err(),
        books.read(&ctx, id).await.unwrap_err(),
        books.update(&ctx, id, bumi_manusia()).await.unwrap_err(),
        books.delete(&ctx, id).await.unwrap_err(),
    ] {
        assert!(matches!(err, RepositoryError::Store(StoreError::Timeout(..))), "{err}");
    }

    // the timed-out insert never reached the map
    assert_eq!(handle.count("favorite_books").await, 0);
}

#[tokio::test]
async fn test_caller_deadline_shorter_than_repository_timeout() {
    let collection = provision(
        InMemoryStore::builder().latency(Duration::from_millis(500)),
        "favorite_books",
        Duration::from_secs(1),
    )
    .await
    .unwrap();
    let books = BookRepository::new(collection, Duration::from_secs(30));
    let ctx = CallContext::background().with_timeout(Duration::from_millis(20));

    let err = books.read(&ctx, ObjectId::new()).await.unwrap_err();

    assert!(err.is_timeout());
}

#[tokio::test]
async fn test_cancelled_context_aborts() {
    let (_handle, books) = open_test().await;
    let token = CancellationToken::new();
    let ctx = CallContext::background().with_cancellation(token.clone());
    token.cancel();

    let err = books.create(&ctx, invisible_cities()).await.unwrap_err();

    assert!(matches!(err, RepositoryError::Store(StoreError::Cancelled(op)) if op == "create"));
}

#[tokio::test]
async fn test_concurrent_creates_get_distinct_ids() {
    let (handle, books) = open_test().await;
    let ctx = CallContext::background();

    let created = futures::future::try_join_all(
        (1970..1980).map(|year| books.create(&ctx, Book::new("Invisible Cities", "Italo Calvino", year))),
    )
    .await
    .unwrap();

    let ids = created.iter().filter_map(|book| book.id).collect::<HashSet<_>>();

    assert_eq!(ids.len(), 10);
    assert_eq!(handle.count("favorite_books").await, 10);
}

#[tokio::test]
async fn test_full_scenario() {
    let (_handle, books) = open_test().await;
    let ctx = CallContext::background();

    let created = books.create(&ctx, invisible_cities()).await.unwrap();
    let id = created.id.expect("store assigns an id");
    assert_eq!(created.title.as_deref(), Some("Invisible Cities"));
    assert_eq!(created.author.as_deref(), Some("Italo Calvino"));
    assert_eq!(created.year, Some(1974));

    books.update(&ctx, id, bumi_manusia()).await.unwrap();
    let updated = books.read(&ctx, id).await.unwrap();
    assert_eq!(updated.title.as_deref(), Some("Bumi manusia"));
    assert_eq!(updated.author.as_deref(), Some("Pramoedya Ananta Toer"));
    assert_eq!(updated.year, Some(1980));

    assert_eq!(books.delete(&ctx, id).await.unwrap(), 1);
    assert!(books.read(&ctx, id).await.unwrap_err().is_not_found());

    books.shutdown().await.unwrap();
}
