use juniper::graphql_object;

use super::{
    Context,
    err::ApiResult,
    model::post::PostInput,
};
use crate::model::{Comment, NewComment, NewPost, Post};


/// The root mutation object.
pub(crate) struct Mutation;

#[graphql_object(context = Context)]
impl Mutation {
    /// Creates a new post from individual fields. Returns the created post,
    /// including its assigned id.
    async fn create_post(title: String, content: String, context: &Context) -> ApiResult<Post> {
        let new = NewPost {
            title,
            content,
            photo: None,
            description: None,
        };
        Post::create(new, context).await
    }

    /// Creates a new post from an input object. Does the same as
    /// `createPost`, just with a different argument style.
    async fn create_post_input(input: PostInput, context: &Context) -> ApiResult<Post> {
        Post::create(input.into(), context).await
    }

    /// Creates a new comment on the given post. Whether a post with that id
    /// actually exists is not checked.
    async fn create_comment(
        post_id: String,
        content: String,
        context: &Context,
    ) -> ApiResult<Comment> {
        Comment::create(NewComment { post_id, content }, context).await
    }
}
