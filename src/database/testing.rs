//! In-memory [`DocumentStore`] double that records calls and replays
//! canned answers. It does not evaluate filters.

use std::collections::VecDeque;
use std::sync::Mutex;

use mongodb::bson::{self, Document};
use mongodb::options::UpdateModifications;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{decode_all, decode_one, DocumentStore, OpContext, StoreError};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Insert { db: String, collection: String, document: Document },
    Upsert { db: String, collection: String, filter: Document, update: Document },
    FindOne { db: String, collection: String, filter: Document },
    FindAll { db: String, collection: String, filter: Document },
}

/// Canned result for the next find call.
pub enum Answer {
    Docs(Vec<Document>),
    Fail(StoreError),
}

#[derive(Default)]
pub struct RecordingStore {
    calls: Mutex<Vec<Call>>,
    answers: Mutex<VecDeque<Answer>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the answer for the next `find_one`/`find_all`.
    pub fn answer(&self, answer: Answer) -> &Self {
        self.answers.lock().unwrap().push_back(answer);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_docs(&self) -> Result<Vec<Document>, StoreError> {
        match self.answers.lock().unwrap().pop_front() {
            Some(Answer::Docs(docs)) => Ok(docs),
            Some(Answer::Fail(err)) => Err(err),
            None => Ok(vec![]),
        }
    }
}

impl DocumentStore for RecordingStore {
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
        self.record(Call::Insert {
            db: db.into(),
            collection: collection.into(),
            document,
        });
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
        ctx.check()?;
        let update = match update.into() {
            UpdateModifications::Document(doc) => doc,
            other => panic!("unexpected update shape: {other:?}"),
        };
        self.record(Call::Upsert {
            db: db.into(),
            collection: collection.into(),
            filter,
            update,
        });
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
        ctx.check()?;
        self.record(Call::FindOne {
            db: db.into(),
            collection: collection.into(),
            filter,
        });
        decode_one(self.next_docs()?.into_iter().next())
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
        ctx.check()?;
        self.record(Call::FindAll {
            db: db.into(),
            collection: collection.into(),
            filter,
        });
        decode_all(self.next_docs()?)
    }
}
