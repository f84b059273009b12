//! `books` - runs one create/read/update/read/delete cycle against the
//! configured store and prints each step.
//!
//! Usage:
//!   books                                   # MongoDB at the configured URI
//!   books --backend memory                  # no server needed
//!   books --config books.toml --debug       # settings from a file, debug logging
//!   RUST_LOG=booklayer=debug books          # fine-grained log control
//!
//! Environment variables (also read from `.env`):
//!   BOOKS_MONGODB_URI, BOOKS_DATABASE, BOOKS_COLLECTION,
//!   BOOKS_CONNECT_TIMEOUT_MS, BOOKS_OPERATION_TIMEOUT_MS

mod config;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use booklayer::{
    memory::InMemoryStore,
    mongodb::MongoDbStore,
    prelude::*,
};

use crate::config::{Backend, Cli};

fn init_tracing(debug: bool) -> Result<()> {
    let default_level = if debug { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(debug)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}

fn print_json<D: DocumentExt>(record: &D) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&record.to_json()?)?);
    Ok(())
}

async fn run_cycle<B: StoreBackend>(books: BookRepository<B>) -> Result<()> {
    let ctx = CallContext::background();

    let created = books
        .create(&ctx, Book::new("Invisible Cities", "Italo Calvino", 1974))
        .await
        .context("create failed")?;
    let id = created
        .id
        .ok_or_else(|| anyhow!("store did not assign an id"))?;
    println!("Inserted document with _id: {id}");

    print_json(&books.read(&ctx, id).await.context("read failed")?)?;

    let (_, outcome) = books
        .update_with_outcome(&ctx, id, Book::new("Bumi manusia", "Pramoedya Ananta Toer", 1980))
        .await
        .context("update failed")?;
    println!("Documents matched: {}", outcome.matched);
    println!("Documents updated: {}", outcome.modified);

    print_json(&books.read(&ctx, id).await.context("read after update failed")?)?;

    let deleted = books.delete(&ctx, id).await.context("delete failed")?;
    println!("Number of documents deleted: {deleted}");

    books.shutdown().await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.debug)?;

    let config = cli.store_config()?;
    config.validate()?;
    tracing::debug!(?config, backend = ?cli.backend, "loaded configuration");

    match cli.backend {
        Backend::Mongodb => {
            let builder = MongoDbStore::builder(&config.uri, &config.database)
                .connect_timeout(config.connect_timeout());
            let collection = provision(builder, &config.collection, config.connect_timeout()).await?;
            run_cycle(BookRepository::new(collection, config.operation_timeout())).await
        },
        Backend::Memory => {
            let collection = provision(InMemoryStore::builder(), &config.collection, config.connect_timeout()).await?;
            run_cycle(BookRepository::new(collection, config.operation_timeout())).await
        },
    }
}
