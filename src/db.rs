//! # Database access
//!
//! Builds the driver client (pinned to Stable API v1) and wraps it in a
//! [`BenchmarkStore`]. A `show` run goes through [`fetch_scoped`], which
//! releases the client whether the ping or the query failed.

use {
    crate::errors::Result,
    mongodb::{
        Client, Collection,
        bson::{Document, doc},
        options::{ClientOptions, ServerApi, ServerApiVersion},
    },
    rocket::futures::TryStreamExt,
};

pub const APP_NAME: &str = "taipan-viewer";

/// Stable API v1, strict, with deprecation errors.
pub fn server_api() -> ServerApi {
    ServerApi::builder()
        .version(ServerApiVersion::V1)
        .strict(true)
        .deprecation_errors(true)
        .build()
}

pub async fn connect(uri: &str) -> Result<Client> {
    let mut client_options = ClientOptions::parse(uri).await?;
    client_options.app_name = Some(APP_NAME.to_string());
    client_options.server_api = Some(server_api());

    Ok(Client::with_options(client_options)?)
}

/// `{}` or an exact match on `cpu_model`.
pub fn benchmark_filter(cpu_model: Option<&str>) -> Document {
    match cpu_model {
        Some(model) => doc! { "cpu_model": model },
        None => doc! {},
    }
}

/// Newest insert first. The benchmark inserts a fresh document per run, so a
/// model can have several.
pub fn latest_first() -> Document {
    doc! { "_id": -1 }
}

pub async fn collect_all(
    collection: &Collection<Document>,
    filter: Document,
) -> Result<Vec<Document>> {
    let mut cursor = collection.find(filter).await?;

    let mut documents = Vec::new();
    while let Some(document) = cursor.try_next().await? {
        documents.push(document);
    }

    Ok(documents)
}

#[allow(async_fn_in_trait)]
pub trait BenchmarkStore {
    async fn ping(&self) -> Result<()>;
    async fn fetch_all(&self, filter: Document) -> Result<Vec<Document>>;
    async fn close(self);
}

pub struct MongoStore {
    client: Client,
    database: String,
    collection: String,
}

impl MongoStore {
    pub fn new(client: Client, database: &str, collection: &str) -> Self {
        Self {
            client,
            database: database.to_string(),
            collection: collection.to_string(),
        }
    }

    fn collection(&self) -> Collection<Document> {
        self.client
            .database(&self.database)
            .collection(&self.collection)
    }
}

impl BenchmarkStore for MongoStore {
    async fn ping(&self) -> Result<()> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }

    async fn fetch_all(&self, filter: Document) -> Result<Vec<Document>> {
        collect_all(&self.collection(), filter).await
    }

    async fn close(self) {
        self.client.shutdown().await;
    }
}

/// Pings, then loads every document matching `filter`. `on_ping` runs between
/// the two. The store is closed on every path before the result is returned.
pub async fn fetch_scoped<S, F>(store: S, filter: Document, on_ping: F) -> Result<Vec<Document>>
where
    S: BenchmarkStore,
    F: FnOnce(),
{
    let result = ping_and_fetch(&store, filter, on_ping).await;
    store.close().await;
    log::debug!("client closed");
    result
}

async fn ping_and_fetch<S, F>(store: &S, filter: Document, on_ping: F) -> Result<Vec<Document>>
where
    S: BenchmarkStore,
    F: FnOnce(),
{
    store.ping().await?;
    on_ping();
    store.fetch_all(filter).await
}
