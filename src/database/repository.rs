//! Generic document repository.
//!
//! Exposes insert / upsert / find-one / find-all over any collection of any
//! shape. Documents go in as anything `Serialize` and come out as anything
//! `DeserializeOwned`; filters and updates are passed to the server as-is.

use std::future::Future;

use futures::TryStreamExt;
use mongodb::bson::{self, Document};
use mongodb::options::{UpdateModifications, UpdateOptions};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::{Database, OpContext, StoreError};

/// Document operations every persistence caller depends on.
///
/// Every operation honours `ctx`: an already cancelled or expired context
/// fails with a cancellation error without touching the store.
pub trait DocumentStore: Send + Sync {
    /// Persist one new document into `db.collection`.
    fn insert<T>(
        &self,
        ctx: &OpContext,
        db: &str,
        collection: &str,
        document: &T,
    ) -> impl Future<Output = Result<(), StoreError>> + Send
    where
        T: Serialize + Sync + ?Sized;

    /// Apply `update` to the first document matching `filter`, or insert a
    /// document built from `filter` and `update` when nothing matches.
    fn upsert<U>(
        &self,
        ctx: &OpContext,
        db: &str,
        collection: &str,
        filter: Document,
        update: U,
    ) -> impl Future<Output = Result<(), StoreError>> + Send
    where
        U: Into<UpdateModifications> + Send;

    /// Decode the first document matching `filter`.
    ///
    /// Zero matches is reported as [`StoreError::NotFound`].
    fn find_one<T>(
        &self,
        ctx: &OpContext,
        db: &str,
        collection: &str,
        filter: Document,
    ) -> impl Future<Output = Result<T, StoreError>> + Send
    where
        T: DeserializeOwned + Send;

    /// Decode every document matching `filter`, in cursor order.
    ///
    /// The whole result set is loaded into memory; there is no paging.
    fn find_all<T>(
        &self,
        ctx: &OpContext,
        db: &str,
        collection: &str,
        filter: Document,
    ) -> impl Future<Output = Result<Vec<T>, StoreError>> + Send
    where
        T: DeserializeOwned + Send;
}

/// Decode the first match of a find-one; no match is [`StoreError::NotFound`].
pub fn decode_one<T: DeserializeOwned>(raw: Option<Document>) -> Result<T, StoreError> {
    let raw = raw.ok_or(StoreError::NotFound)?;
    Ok(bson::from_document(raw)?)
}

/// Decode every match of a find-all, keeping order. The first document that
/// does not fit `T` fails the whole call.
pub fn decode_all<T: DeserializeOwned>(raw: Vec<Document>) -> Result<Vec<T>, StoreError> {
    raw.into_iter()
        .map(|doc| bson::from_document(doc).map_err(StoreError::from))
        .collect()
}

/// [`DocumentStore`] backed by a MongoDB connection.
#[derive(Debug, Clone)]
pub struct MongoRepo {
    db: Database,
}

impl MongoRepo {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    #[allow(dead_code)]
    pub fn database(&self) -> &Database {
        &self.db
    }
}

impl DocumentStore for MongoRepo {
    async fn insert<T>(
        &self,
        ctx: &OpContext,
        db: &str,
        collection: &str,
        document: &T,
    ) -> Result<(), StoreError>
    where
        T: Serialize + Sync + ?Sized,
    {
        ctx.check()?;
        let document = bson::to_document(document)?;
        let coll = self.db.collection::<Document>(db, collection);

        ctx.run(async { coll.insert_one(document).await.map_err(StoreError::from) })
            .await?;

        debug!("Inserted document into {}.{}", db, collection);
        Ok(())
    }

    async fn upsert<U>(
        &self,
        ctx: &OpContext,
        db: &str,
        collection: &str,
        filter: Document,
        update: U,
    ) -> Result<(), StoreError>
    where
        U: Into<UpdateModifications> + Send,
    {
        let coll = self.db.collection::<Document>(db, collection);
        let options = UpdateOptions::builder().upsert(true).build();

        let result = ctx
            .run(async {
                coll.update_one(filter, update)
                    .with_options(options)
                    .await
                    .map_err(StoreError::from)
            })
            .await?;

        debug!(
            "Upserted into {}.{} (matched: {}, inserted: {})",
            db,
            collection,
            result.matched_count,
            result.upserted_id.is_some()
        );
        Ok(())
    }

    async fn find_one<T>(
        &self,
        ctx: &OpContext,
        db: &str,
        collection: &str,
        filter: Document,
    ) -> Result<T, StoreError>
    where
        T: DeserializeOwned + Send,
    {
        let coll = self.db.collection::<Document>(db, collection);

        let raw = ctx
            .run(async { coll.find_one(filter).await.map_err(StoreError::from) })
            .await?;

        debug!("Find one in {}.{}: {}", db, collection, raw.is_some());
        decode_one(raw)
    }

    async fn find_all<T>(
        &self,
        ctx: &OpContext,
        db: &str,
        collection: &str,
        filter: Document,
    ) -> Result<Vec<T>, StoreError>
    where
        T: DeserializeOwned + Send,
    {
        let coll = self.db.collection::<Document>(db, collection);

        // Query and drain the cursor under the same context so a
        // cancellation mid-stream drops (and kills) the cursor.
        let raw: Vec<Document> = ctx
            .run(async {
                let cursor = coll.find(filter).await.map_err(StoreError::from)?;
                cursor
                    .try_collect::<Vec<Document>>()
                    .await
                    .map_err(StoreError::from)
            })
            .await?;

        debug!("Find all in {}.{}: {} documents", db, collection, raw.len());

        decode_all(raw)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use mongodb::bson::doc;
    use mongodb::bson::oid::ObjectId;
    use mongodb::options::ClientOptions;
    use mongodb::Client;
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct User {
        id: String,
        name: String,
    }

    /// A repository pointing at a port nobody listens on.
    async fn unreachable_repo() -> MongoRepo {
        let options = ClientOptions::parse("mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=30000")
            .await
            .unwrap();
        MongoRepo::new(Database::from_client(Client::with_options(options).unwrap()))
    }

    /// Live repository plus a scratch database name.
    ///
    /// Run with `cargo test -- --ignored` and a reachable server.
    async fn live_repo() -> (MongoRepo, String) {
        let uri = std::env::var("KOALA_TEST_MONGODB_URI")
            .expect("KOALA_TEST_MONGODB_URI must be set to run live store tests");
        let db = Database::connect(&uri).await.unwrap();
        (MongoRepo::new(db), format!("koala_test_{}", ObjectId::new().to_hex()))
    }

    async fn drop_db(repo: &MongoRepo, name: &str) {
        repo.database().client().database(name).drop().await.unwrap();
    }

    #[tokio::test]
    async fn test_cancelled_context_short_circuits_every_operation() {
        let repo = unreachable_repo().await;
        let ctx = OpContext::background();
        ctx.cancel();

        let user = User { id: "u1".into(), name: "Alice".into() };
        let err = repo.insert(&ctx, "app", "users", &user).await.unwrap_err();
        assert!(matches!(err, StoreError::Cancelled));

        let err = repo
            .upsert(&ctx, "app", "users", doc! { "id": "u1" }, doc! { "$set": { "name": "Bob" } })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Cancelled));

        let err = repo
            .find_one::<User>(&ctx, "app", "users", doc! { "id": "u1" })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Cancelled));

        let err = repo
            .find_all::<User>(&ctx, "app", "users", doc! {})
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Cancelled));
    }

    #[tokio::test]
    async fn test_deadline_beats_unreachable_server() {
        let repo = unreachable_repo().await;
        let ctx = OpContext::with_timeout(Duration::from_millis(100));

        let started = std::time::Instant::now();
        let err = repo
            .find_one::<User>(&ctx, "app", "users", doc! { "id": "u1" })
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::DeadlineExceeded));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_insert_accepts_unsized_documents() {
        let repo = unreachable_repo().await;
        let ctx = OpContext::background();
        ctx.cancel();

        let users: Vec<User> = vec![User { id: "u1".into(), name: "Alice".into() }];
        let err = repo.insert(&ctx, "app", "users", users.as_slice()).await.unwrap_err();
        assert!(matches!(err, StoreError::Cancelled));
    }

    #[test]
    fn test_decode_one_missing_is_not_found() {
        let err = decode_one::<User>(None).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_decode_one_shape_mismatch_is_decode_error() {
        let err = decode_one::<User>(Some(doc! { "id": "u3", "name": 42 })).unwrap_err();
        assert!(matches!(err, StoreError::Decode(_)));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_decode_one_ignores_extra_fields() {
        let raw = doc! { "_id": ObjectId::new(), "id": "u1", "name": "Alice" };
        let user: User = decode_one(Some(raw)).unwrap();
        assert_eq!(user, User { id: "u1".into(), name: "Alice".into() });
    }

    #[test]
    fn test_decode_all_keeps_order() {
        let raw = vec![
            doc! { "id": "b", "name": "Bob" },
            doc! { "id": "a", "name": "Alice" },
        ];
        let users: Vec<User> = decode_all(raw).unwrap();
        let ids: Vec<_> = users.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);

        assert!(decode_all::<User>(vec![]).unwrap().is_empty());
    }

    #[test]
    fn test_decode_all_fails_on_any_bad_document() {
        let raw = vec![doc! { "id": "a", "name": "Alice" }, doc! { "id": "b" }];
        let err = decode_all::<User>(raw).unwrap_err();
        assert!(matches!(err, StoreError::Decode(_)));
    }

    #[tokio::test]
    async fn test_non_document_value_fails_to_encode() {
        let repo = unreachable_repo().await;
        let err = repo
            .insert(&OpContext::background(), "app", "users", "just a string")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Encode(_)));
    }

    #[tokio::test]
    #[ignore = "requires KOALA_TEST_MONGODB_URI"]
    async fn test_insert_then_find_one() {
        let (repo, db) = live_repo().await;
        let ctx = OpContext::with_timeout(Duration::from_secs(10));

        let alice = User { id: "u1".into(), name: "Alice".into() };
        repo.insert(&ctx, &db, "users", &alice).await.unwrap();

        let found: User = repo.find_one(&ctx, &db, "users", doc! { "id": "u1" }).await.unwrap();
        assert_eq!(found, alice);

        drop_db(&repo, &db).await;
    }

    #[tokio::test]
    #[ignore = "requires KOALA_TEST_MONGODB_URI"]
    async fn test_upsert_inserts_on_miss_and_is_stable_on_match() {
        let (repo, db) = live_repo().await;
        let ctx = OpContext::with_timeout(Duration::from_secs(10));
        let filter = doc! { "id": "u2" };
        let update = doc! { "$set": { "name": "Bob" } };

        repo.upsert(&ctx, &db, "users", filter.clone(), update.clone()).await.unwrap();
        repo.upsert(&ctx, &db, "users", filter.clone(), update).await.unwrap();

        let all: Vec<User> = repo.find_all(&ctx, &db, "users", filter).await.unwrap();
        assert_eq!(all, vec![User { id: "u2".into(), name: "Bob".into() }]);

        drop_db(&repo, &db).await;
    }

    #[tokio::test]
    #[ignore = "requires KOALA_TEST_MONGODB_URI"]
    async fn test_find_all_returns_every_match() {
        let (repo, db) = live_repo().await;
        let ctx = OpContext::with_timeout(Duration::from_secs(10));

        for (id, group) in [("a", "g1"), ("b", "g1"), ("c", "g1"), ("d", "g2")] {
            repo.insert(&ctx, &db, "members", &doc! { "id": id, "group": group })
                .await
                .unwrap();
        }

        let mut ids: Vec<String> = repo
            .find_all::<Document>(&ctx, &db, "members", doc! { "group": "g1" })
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.get_str("id").unwrap().to_string())
            .collect();
        ids.sort();

        assert_eq!(ids, vec!["a", "b", "c"]);

        drop_db(&repo, &db).await;
    }

    #[tokio::test]
    #[ignore = "requires KOALA_TEST_MONGODB_URI"]
    async fn test_find_one_missing_is_not_found() {
        let (repo, db) = live_repo().await;
        let ctx = OpContext::with_timeout(Duration::from_secs(10));

        let err = repo
            .find_one::<User>(&ctx, &db, "users", doc! { "id": "missing" })
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        drop_db(&repo, &db).await;
    }

    #[tokio::test]
    #[ignore = "requires KOALA_TEST_MONGODB_URI"]
    async fn test_find_one_shape_mismatch_is_decode_error() {
        let (repo, db) = live_repo().await;
        let ctx = OpContext::with_timeout(Duration::from_secs(10));

        repo.insert(&ctx, &db, "users", &doc! { "id": "u3", "name": 42 })
            .await
            .unwrap();

        let err = repo
            .find_one::<User>(&ctx, &db, "users", doc! { "id": "u3" })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Decode(_)));

        drop_db(&repo, &db).await;
    }
}
