//! The MongoDB-backed store.
//!
//! This is the only place that knows documents are keyed by `ObjectId`. Ids
//! cross the boundary of this module exclusively as hex strings; a string
//! that doesn't parse back into an `ObjectId` simply refers to nothing.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    Client, Collection,
};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::{
    model::{Comment, NewComment, NewPost, Post},
    prelude::*,
};
use super::{Store, StoreConfig, StoreResult};


pub(super) struct MongoStore {
    posts: Collection<PostDoc>,
    comments: Collection<CommentDoc>,
}

impl MongoStore {
    /// Connects to the configured MongoDB instance. The returned store owns
    /// a single client that is shared for the process lifetime; it is never
    /// re-established when the connection is lost later on.
    pub(super) async fn connect(config: &StoreConfig) -> Result<Self> {
        let client = Client::with_uri_str(config.uri.expose_secret()).await
            .context("invalid MongoDB connection URI")?;
        let db = client.database(&config.database);

        // The client connects lazily, so reach out now: an unreachable
        // database should abort startup instead of failing the first query.
        db.run_command(doc! { "ping": 1 }, None).await
            .context("could not reach MongoDB server")?;
        info!("Connected to MongoDB (database '{}')", config.database);

        Ok(Self {
            posts: db.collection("posts"),
            comments: db.collection("comments"),
        })
    }
}

#[async_trait]
impl Store for MongoStore {
    async fn post_by_id(&self, id: &str) -> StoreResult<Option<Post>> {
        let oid = match ObjectId::parse_str(id) {
            Ok(oid) => oid,
            Err(_) => return Ok(None),
        };
        let doc = self.posts.find_one(doc! { "_id": oid }, None).await?;
        Ok(doc.map(PostDoc::into_record))
    }

    async fn all_posts(&self) -> StoreResult<Vec<Post>> {
        let docs: Vec<PostDoc> = self.posts.find(None, None).await?.try_collect().await?;
        Ok(docs.into_iter().map(PostDoc::into_record).collect())
    }

    async fn insert_post(&self, new: NewPost) -> StoreResult<Post> {
        let doc = PostDoc {
            id: None,
            title: new.title,
            content: new.content,
            photo: new.photo,
            description: new.description,
        };
        let result = self.posts.insert_one(&doc, None).await?;
        Ok(Post {
            id: id_to_string(result.inserted_id.as_object_id()),
            title: doc.title,
            content: doc.content,
            photo: doc.photo,
            description: doc.description,
        })
    }

    async fn comment_by_id(&self, id: &str) -> StoreResult<Option<Comment>> {
        let oid = match ObjectId::parse_str(id) {
            Ok(oid) => oid,
            Err(_) => return Ok(None),
        };
        let doc = self.comments.find_one(doc! { "_id": oid }, None).await?;
        Ok(doc.map(CommentDoc::into_record))
    }

    async fn all_comments(&self) -> StoreResult<Vec<Comment>> {
        let docs: Vec<CommentDoc> = self.comments.find(None, None).await?.try_collect().await?;
        Ok(docs.into_iter().map(CommentDoc::into_record).collect())
    }

    async fn comments_of_post(&self, post_id: &str) -> StoreResult<Vec<Comment>> {
        let docs: Vec<CommentDoc> = self.comments
            .find(doc! { "postId": post_id }, None)
            .await?
            .try_collect()
            .await?;
        Ok(docs.into_iter().map(CommentDoc::into_record).collect())
    }

    async fn insert_comment(&self, new: NewComment) -> StoreResult<Comment> {
        let doc = CommentDoc {
            id: None,
            post_id: new.post_id,
            content: new.content,
        };
        let result = self.comments.insert_one(&doc, None).await?;
        Ok(Comment {
            id: id_to_string(result.inserted_id.as_object_id()),
            post_id: doc.post_id,
            content: doc.content,
        })
    }
}


/// A post, shaped like the documents in the `posts` collection.
#[derive(Debug, Serialize, Deserialize)]
struct PostDoc {
    /// `None` only for documents that are about to be inserted; everything
    /// read back from the collection has an id.
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,

    title: String,
    content: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    photo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl PostDoc {
    fn into_record(self) -> Post {
        Post {
            id: id_to_string(self.id),
            title: self.title,
            content: self.content,
            photo: self.photo,
            description: self.description,
        }
    }
}

/// A comment, shaped like the documents in the `comments` collection. The
/// referenced post id is stored as the plain string clients sent, matching
/// what they read back from `Post._id`.
#[derive(Debug, Serialize, Deserialize)]
struct CommentDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,

    #[serde(rename = "postId")]
    post_id: String,
    content: String,
}

impl CommentDoc {
    fn into_record(self) -> Comment {
        Comment {
            id: id_to_string(self.id),
            post_id: self.post_id,
            content: self.content,
        }
    }
}

fn id_to_string(id: Option<ObjectId>) -> String {
    id.map(|id| id.to_hex()).unwrap_or_default()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_ids_round_trip_as_hex() {
        let oid = ObjectId::new();
        let doc = PostDoc {
            id: Some(oid),
            title: "title".into(),
            content: "content".into(),
            photo: None,
            description: None,
        };

        let record = doc.into_record();
        assert_eq!(record.id, oid.to_hex());
        assert_eq!(ObjectId::parse_str(&record.id).unwrap(), oid);
    }

    #[test]
    fn small_numeric_ids_are_not_object_ids() {
        // The in-memory store's ids must parse as "refers to nothing" here.
        assert!(ObjectId::parse_str("1").is_err());
        assert!(ObjectId::parse_str("999").is_err());
        assert!(ObjectId::parse_str("").is_err());
    }
}
