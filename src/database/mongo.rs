//! MongoDB connection manager.

use mongodb::bson::doc;
use mongodb::{options::ClientOptions, Client, Collection};
use tracing::info;

use super::StoreError;

/// Process-wide handle to the document store.
///
/// Built once at startup and passed explicitly to whatever needs it.
/// Cloning is cheap: the driver client is reference counted and pools its
/// connections internally, so every clone shares the same connection pool.
#[derive(Debug, Clone)]
pub struct Database {
    client: Client,
}

impl Database {
    /// Connect to MongoDB with the given URI.
    ///
    /// # Errors
    /// Returns error if the URI is malformed or the server does not answer
    /// a `ping`.
    pub async fn connect(uri: &str) -> Result<Self, StoreError> {
        let options = ClientOptions::parse(uri).await?;
        let client = Client::with_options(options)?;

        // Ping the database to verify connection
        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;

        info!("Successfully connected to MongoDB");

        Ok(Self { client })
    }

    /// Wrap an already constructed client without contacting the server.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// Get a reference to the underlying MongoDB client.
    #[allow(dead_code)]
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Resolve `db`/`name` to a collection. Nothing is cached; each call
    /// builds a fresh handle from the shared client.
    pub fn collection<T: Send + Sync>(&self, db: &str, name: &str) -> Collection<T> {
        self.client.database(db).collection(name)
    }
}
