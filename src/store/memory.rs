//! The in-memory store: two vectors behind mutexes.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Mutex,
};

use async_trait::async_trait;

use crate::model::{Comment, NewComment, NewPost, Post};
use super::{Store, StoreResult};


/// Keeps all records in process memory. Lookups are linear scans, which is
/// perfectly fine for the sizes this store is meant for.
///
/// Identifiers are handed out by per-collection atomic counters, so
/// concurrent inserts can never produce duplicate ids.
pub(crate) struct MemoryStore {
    posts: Mutex<Vec<Post>>,
    comments: Mutex<Vec<Comment>>,
    next_post_id: AtomicU64,
    next_comment_id: AtomicU64,
}

impl MemoryStore {
    /// Creates an empty store.
    pub(crate) fn new() -> Self {
        Self {
            posts: Mutex::new(Vec::new()),
            comments: Mutex::new(Vec::new()),
            next_post_id: AtomicU64::new(1),
            next_comment_id: AtomicU64::new(1),
        }
    }

    /// Creates a store holding the demo dataset: two posts with two comments
    /// each. This is what `serve` starts with, so there is something to poke
    /// at in the query console right away.
    pub(crate) fn demo() -> Self {
        let post = |id: &str, title: &str, content: &str| Post {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            photo: None,
            description: None,
        };
        let comment = |id: &str, post_id: &str, content: &str| Comment {
            id: id.into(),
            post_id: post_id.into(),
            content: content.into(),
        };

        let store = Self::new();
        *Self::lock(&store.posts) = vec![
            post("1", "Hello", "World"),
            post("2", "Article", "Some content"),
        ];
        *Self::lock(&store.comments) = vec![
            comment("1", "1", "Very smart comment"),
            comment("2", "1", "This comment is awesome"),
            comment("3", "2", "Good job!!"),
            comment("4", "2", "The most important comment"),
        ];
        store.next_post_id.store(3, Ordering::Relaxed);
        store.next_comment_id.store(5, Ordering::Relaxed);

        store
    }

    /// Returns the guarded collection, ignoring mutex poisoning: the vectors
    /// are only ever pushed to, so a panicking thread cannot leave them in a
    /// state that's broken for others.
    fn lock<T>(collection: &Mutex<Vec<T>>) -> std::sync::MutexGuard<'_, Vec<T>> {
        collection.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn post_by_id(&self, id: &str) -> StoreResult<Option<Post>> {
        Ok(Self::lock(&self.posts).iter().find(|p| p.id == id).cloned())
    }

    async fn all_posts(&self) -> StoreResult<Vec<Post>> {
        Ok(Self::lock(&self.posts).clone())
    }

    async fn insert_post(&self, new: NewPost) -> StoreResult<Post> {
        let post = Post {
            id: self.next_post_id.fetch_add(1, Ordering::Relaxed).to_string(),
            title: new.title,
            content: new.content,
            photo: new.photo,
            description: new.description,
        };
        Self::lock(&self.posts).push(post.clone());
        Ok(post)
    }

    async fn comment_by_id(&self, id: &str) -> StoreResult<Option<Comment>> {
        Ok(Self::lock(&self.comments).iter().find(|c| c.id == id).cloned())
    }

    async fn all_comments(&self) -> StoreResult<Vec<Comment>> {
        Ok(Self::lock(&self.comments).clone())
    }

    async fn comments_of_post(&self, post_id: &str) -> StoreResult<Vec<Comment>> {
        let comments = Self::lock(&self.comments)
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        Ok(comments)
    }

    async fn insert_comment(&self, new: NewComment) -> StoreResult<Comment> {
        let comment = Comment {
            id: self.next_comment_id.fetch_add(1, Ordering::Relaxed).to_string(),
            post_id: new.post_id,
            content: new.content,
        };
        Self::lock(&self.comments).push(comment.clone());
        Ok(comment)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn new_post(title: &str) -> NewPost {
        NewPost {
            title: title.into(),
            content: "content".into(),
            photo: None,
            description: None,
        }
    }

    #[tokio::test]
    async fn insert_assigns_fresh_ids() {
        let store = MemoryStore::new();
        let a = store.insert_post(new_post("a")).await.unwrap();
        let b = store.insert_post(new_post("b")).await.unwrap();
        assert_eq!(a.id, "1");
        assert_eq!(b.id, "2");

        // Comment ids are an independent sequence.
        let c = store.insert_comment(NewComment {
            post_id: a.id.clone(),
            content: "hi".into(),
        }).await.unwrap();
        assert_eq!(c.id, "1");
    }

    #[tokio::test]
    async fn ids_continue_after_demo_data() {
        let store = MemoryStore::demo();
        let post = store.insert_post(new_post("new")).await.unwrap();
        assert_eq!(post.id, "3");
        assert!(store.post_by_id("1").await.unwrap().is_some());
        assert!(store.post_by_id("3").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn lookup_of_unknown_id_is_absent() {
        let store = MemoryStore::demo();
        assert_eq!(store.post_by_id("999").await.unwrap(), None);
        assert_eq!(store.comment_by_id("999").await.unwrap(), None);
    }

    #[tokio::test]
    async fn insertion_order_is_preserved() {
        let store = MemoryStore::new();
        for title in ["a", "b", "c"] {
            store.insert_post(new_post(title)).await.unwrap();
        }
        let titles = store.all_posts().await.unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect::<Vec<_>>();
        assert_eq!(titles, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn comments_of_post_filters_by_post_id() {
        let store = MemoryStore::demo();

        let ids = |comments: Vec<Comment>| {
            comments.into_iter().map(|c| c.id).collect::<Vec<_>>()
        };
        assert_eq!(ids(store.comments_of_post("1").await.unwrap()), ["1", "2"]);
        assert_eq!(ids(store.comments_of_post("2").await.unwrap()), ["3", "4"]);
        assert_eq!(ids(store.comments_of_post("7").await.unwrap()), Vec::<String>::new());

        // Every comment of a post points back at that post.
        for comment in store.comments_of_post("2").await.unwrap() {
            assert_eq!(comment.post_id, "2");
        }
    }
}
