//! The store layer: everything the resolvers use to read and write records.
//!
//! The [`Store`] trait is the capability contract a backing store has to
//! satisfy. Two implementations exist: a process-local in-memory store and a
//! MongoDB-backed one. Which one is used is decided once at startup, based on
//! the configuration; the rest of the program only ever sees `dyn Store`.

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::Secret;

use crate::{
    model::{Comment, NewComment, NewPost, Post},
    prelude::*,
};

mod memory;
mod mongo;

pub(crate) use self::memory::MemoryStore;
use self::mongo::MongoStore;


#[derive(Debug, confique::Config)]
pub(crate) struct StoreConfig {
    /// Which backing store to use.
    ///
    /// - "memory": all records live in process memory and are lost when the
    ///   process exits. The store starts out with a small demo dataset.
    /// - "mongodb": records are persisted in a MongoDB database.
    #[config(default = "memory")]
    pub(crate) backend: Backend,

    /// MongoDB connection URI. Only relevant for the "mongodb" backend.
    #[config(default = "mongodb://127.0.0.1:27017")]
    pub(crate) uri: Secret<String>,

    /// The name of the MongoDB database to use. Only relevant for the
    /// "mongodb" backend.
    #[config(default = "blog")]
    pub(crate) database: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum Backend {
    Memory,
    Mongodb,
}


pub(crate) type StoreResult<T> = Result<T, StoreError>;

/// Error type for all fallible store operations.
///
/// The in-memory store never fails; all variants stem from the document
/// store. Resolvers convert this into an API error, so a failing store call
/// results in a field error in the GraphQL response instead of tearing down
/// anything.
#[derive(Debug, thiserror::Error)]
pub(crate) enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
}


/// Capability contract any backing store has to satisfy.
///
/// This is the per-entity rendering of four generic operations: lookup by
/// id, full scan, filtered scan and insert. The only filtered scan the
/// system needs is "comments of one post", so that's the only one the trait
/// has. Lookups with an id that does not refer to any record resolve to
/// `None`, never to an error.
#[async_trait]
pub(crate) trait Store: Send + Sync {
    async fn post_by_id(&self, id: &str) -> StoreResult<Option<Post>>;

    /// All posts, in store-native order.
    async fn all_posts(&self) -> StoreResult<Vec<Post>>;

    /// Appends a new post and returns it with its assigned id.
    async fn insert_post(&self, new: NewPost) -> StoreResult<Post>;

    async fn comment_by_id(&self, id: &str) -> StoreResult<Option<Comment>>;

    /// All comments, in store-native order.
    async fn all_comments(&self) -> StoreResult<Vec<Comment>>;

    /// All comments whose `post_id` equals the given id.
    async fn comments_of_post(&self, post_id: &str) -> StoreResult<Vec<Comment>>;

    /// Appends a new comment and returns it with its assigned id.
    async fn insert_comment(&self, new: NewComment) -> StoreResult<Comment>;
}


/// Sets up the store selected by the configuration. For the document store,
/// this establishes the connection that is used for the whole process
/// lifetime; an unreachable database makes startup fail here.
pub(crate) async fn connect(config: &StoreConfig) -> Result<Arc<dyn Store>> {
    match config.backend {
        Backend::Memory => {
            info!("Using the in-memory store: all data is lost when the process exits");
            Ok(Arc::new(MemoryStore::demo()))
        }
        Backend::Mongodb => {
            let store = MongoStore::connect(config).await
                .context("failed to connect to MongoDB (database not running?)")?;
            Ok(Arc::new(store))
        }
    }
}
