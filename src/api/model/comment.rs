use juniper::graphql_object;

use crate::{
    api::{Context, err::ApiResult},
    model::{Comment, NewComment, Post},
    prelude::*,
};


#[graphql_object(context = Context)]
impl Comment {
    #[graphql(name = "_id")]
    fn id(&self) -> &str {
        &self.id
    }

    fn post_id(&self) -> &str {
        &self.post_id
    }

    fn content(&self) -> &str {
        &self.content
    }

    /// The post this comment was left on, or `null` if the referenced post
    /// does not exist.
    async fn post(&self, context: &Context) -> ApiResult<Option<Post>> {
        Ok(context.store.post_by_id(&self.post_id).await?)
    }
}

impl Comment {
    pub(crate) async fn load_by_id(id: &str, context: &Context) -> ApiResult<Option<Self>> {
        Ok(context.store.comment_by_id(id).await?)
    }

    pub(crate) async fn load_all(context: &Context) -> ApiResult<Vec<Self>> {
        Ok(context.store.all_comments().await?)
    }

    pub(crate) async fn create(new: NewComment, context: &Context) -> ApiResult<Self> {
        let comment = context.store.insert_comment(new).await?;
        debug!("Created comment {} on post {}", comment.id, comment.post_id);
        Ok(comment)
    }
}
