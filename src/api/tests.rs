//! Tests running GraphQL operations against the full API with an in-memory
//! store, exactly like requests coming over HTTP would, minus the HTTP.

use std::sync::Arc;

use juniper::{graphql_value, DefaultScalarValue, ExecutionError, Value, Variables};

use crate::store::MemoryStore;
use super::{root_node, Context};


fn demo_context() -> Context {
    Context::new(Arc::new(MemoryStore::demo()))
}

async fn run(
    query: &str,
    context: &Context,
) -> (Value, Vec<ExecutionError<DefaultScalarValue>>) {
    juniper::execute(query, None, &root_node(), &Variables::new(), context)
        .await
        .expect("query failed to parse or validate")
}

/// Runs the query and asserts it finished without field errors.
async fn run_ok(query: &str, context: &Context) -> Value {
    let (data, errors) = run(query, context).await;
    assert!(errors.is_empty(), "unexpected field errors: {errors:?}");
    data
}


#[tokio::test]
async fn lookup_of_seeded_post() {
    let data = run_ok(r#"{ post(_id: "1") { title content } }"#, &demo_context()).await;
    assert_eq!(data, graphql_value!({
        "post": { "title": "Hello", "content": "World" },
    }));
}

#[tokio::test]
async fn lookup_of_nonexistent_post_yields_error() {
    let (data, errors) = run(r#"{ post(_id: "999") { title } }"#, &demo_context()).await;

    // The failed non-null field nulls out the whole response, and the
    // failure shows up in the error list.
    assert_eq!(data, graphql_value!(None));
    assert_eq!(errors.len(), 1);
    assert!(format!("{:?}", errors[0]).contains("no post with id"));
}

#[tokio::test]
async fn lookup_without_id_yields_error() {
    // The `_id` argument is nullable, so this query is valid. It just never
    // finds anything.
    let (data, errors) = run("{ post { title } }", &demo_context()).await;
    assert_eq!(data, graphql_value!(None));
    assert_eq!(errors.len(), 1);
}

#[tokio::test]
async fn posts_query_is_idempotent() {
    let context = demo_context();
    let query = "{ posts { _id title } }";
    let first = run_ok(query, &context).await;
    let second = run_ok(query, &context).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn create_post_appends_one_post() {
    let context = demo_context();

    let count = |data: &Value| -> usize {
        data.as_object_value()
            .and_then(|obj| obj.get_field_value("posts"))
            .and_then(|posts| posts.as_list_value())
            .expect("unexpected response shape")
            .len()
    };

    let before = run_ok("{ posts { _id } }", &context).await;

    let created = run_ok(
        r#"mutation { createPost(title: "Fresh", content: "Off the press") { _id title } }"#,
        &context,
    ).await;
    assert_eq!(created, graphql_value!({
        "createPost": { "_id": "3", "title": "Fresh" },
    }));

    let after = run_ok("{ posts { _id } }", &context).await;
    assert_eq!(count(&after), count(&before) + 1);
}

#[tokio::test]
async fn create_post_from_input_object() {
    let context = demo_context();

    let created = run_ok(
        r#"mutation {
            createPostInput(input: { title: "Input", content: "Style", photo: "cat.png" }) {
                _id title content photo description
            }
        }"#,
        &context,
    ).await;

    assert_eq!(created, graphql_value!({
        "createPostInput": {
            "_id": "3",
            "title": "Input",
            "content": "Style",
            "photo": "cat.png",
            "description": None,
        },
    }));

    // The new post is readable under its returned id.
    let read_back = run_ok(r#"{ post(_id: "3") { title } }"#, &context).await;
    assert_eq!(read_back, graphql_value!({ "post": { "title": "Input" } }));
}

#[tokio::test]
async fn post_comments_are_exactly_those_with_matching_post_id() {
    let data = run_ok(
        r#"{ post(_id: "1") { comments { _id postId } } }"#,
        &demo_context(),
    ).await;
    assert_eq!(data, graphql_value!({
        "post": {
            "comments": [
                { "_id": "1", "postId": "1" },
                { "_id": "2", "postId": "1" },
            ],
        },
    }));
}

#[tokio::test]
async fn comment_post_is_inverse_of_post_comments() {
    let data = run_ok(
        r#"{ comment(_id: "3") { post { _id comments { _id } } } }"#,
        &demo_context(),
    ).await;
    assert_eq!(data, graphql_value!({
        "comment": {
            "post": {
                "_id": "2",
                "comments": [{ "_id": "3" }, { "_id": "4" }],
            },
        },
    }));
}

#[tokio::test]
async fn comment_on_missing_post_resolves_to_null() {
    let context = demo_context();

    run_ok(
        r#"mutation { createComment(postId: "12345", content: "into the void") { _id } }"#,
        &context,
    ).await;

    let data = run_ok(r#"{ comment(_id: "5") { content post { _id } } }"#, &context).await;
    assert_eq!(data, graphql_value!({
        "comment": { "content": "into the void", "post": None },
    }));
}

#[tokio::test]
async fn create_comment_shows_up_in_comments() {
    let context = demo_context();

    let created = run_ok(
        r#"mutation { createComment(postId: "2", content: "nice") { _id postId content } }"#,
        &context,
    ).await;
    assert_eq!(created, graphql_value!({
        "createComment": { "_id": "5", "postId": "2", "content": "nice" },
    }));

    let data = run_ok("{ comments { content postId } }", &context).await;
    assert_eq!(data, graphql_value!({
        "comments": [
            { "content": "Very smart comment", "postId": "1" },
            { "content": "This comment is awesome", "postId": "1" },
            { "content": "Good job!!", "postId": "2" },
            { "content": "The most important comment", "postId": "2" },
            { "content": "nice", "postId": "2" },
        ],
    }));
}

#[tokio::test]
async fn exported_schema_contains_the_wire_contract() {
    let schema = root_node().as_schema_language();

    // Spot check the parts clients depend on.
    for needle in [
        "post(_id: String): Post!",
        "posts: [Post!]!",
        "createPost(title: String!, content: String!): Post!",
        "createPostInput(input: PostInput!): Post!",
        "createComment(postId: String!, content: String!): Comment!",
    ] {
        assert!(schema.contains(needle), "schema is missing `{needle}`:\n{schema}");
    }
}
