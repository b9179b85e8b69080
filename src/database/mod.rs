//! Database module exports.

mod context;
mod error;
mod models;
mod mongo;
mod repository;

#[cfg(test)]
pub mod testing;

pub use context::OpContext;
pub use error::StoreError;
pub use models::*;
pub use mongo::Database;
pub use repository::{decode_all, decode_one, DocumentStore, MongoRepo};
