use juniper::graphql_object;

use super::{
    Context,
    err::{ApiResult, not_found},
};
use crate::model::{Comment, Post};


/// The root query object.
pub(crate) struct Query;

#[graphql_object(context = Context)]
impl Query {
    /// Returns the post with the given id. Fails if there is none.
    #[graphql(arguments(id(name = "_id")))]
    async fn post(
        id: Option<String>,
        context: &Context,
    ) -> ApiResult<Post> {
        let id = id.unwrap_or_default();
        Post::load_by_id(&id, context).await?
            .ok_or_else(|| not_found!("no post with id \"{id}\""))
    }

    /// Returns a list of all posts.
    async fn posts(context: &Context) -> ApiResult<Vec<Post>> {
        Post::load_all(context).await
    }

    /// Returns the comment with the given id. Fails if there is none.
    #[graphql(arguments(id(name = "_id")))]
    async fn comment(
        id: Option<String>,
        context: &Context,
    ) -> ApiResult<Comment> {
        let id = id.unwrap_or_default();
        Comment::load_by_id(&id, context).await?
            .ok_or_else(|| not_found!("no comment with id \"{id}\""))
    }

    /// Returns a list of all comments.
    async fn comments(context: &Context) -> ApiResult<Vec<Comment>> {
        Comment::load_all(context).await
    }
}
