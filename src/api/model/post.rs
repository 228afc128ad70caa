use juniper::{graphql_object, GraphQLInputObject};

use crate::{
    api::{Context, err::ApiResult},
    model::{Comment, NewPost, Post},
    prelude::*,
};


#[graphql_object(context = Context)]
impl Post {
    #[graphql(name = "_id")]
    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn content(&self) -> &str {
        &self.content
    }

    fn photo(&self) -> Option<&str> {
        self.photo.as_deref()
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// All comments left on this post.
    async fn comments(&self, context: &Context) -> ApiResult<Vec<Comment>> {
        Ok(context.store.comments_of_post(&self.id).await?)
    }
}

impl Post {
    pub(crate) async fn load_by_id(id: &str, context: &Context) -> ApiResult<Option<Self>> {
        Ok(context.store.post_by_id(id).await?)
    }

    pub(crate) async fn load_all(context: &Context) -> ApiResult<Vec<Self>> {
        Ok(context.store.all_posts().await?)
    }

    pub(crate) async fn create(new: NewPost, context: &Context) -> ApiResult<Self> {
        let post = context.store.insert_post(new).await?;
        debug!("Created post '{}' ({})", post.title, post.id);
        Ok(post)
    }
}


/// Data for one new post. Alternative to the individual `createPost`
/// arguments.
#[derive(Debug, GraphQLInputObject)]
pub(crate) struct PostInput {
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) photo: Option<String>,
    pub(crate) description: Option<String>,
}

impl From<PostInput> for NewPost {
    fn from(input: PostInput) -> Self {
        Self {
            title: input.title,
            content: input.content,
            photo: input.photo,
            description: input.description,
        }
    }
}
