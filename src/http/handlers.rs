use hyper::{
    header::{self, HeaderValue},
    Body, Method, StatusCode,
};
use std::sync::Arc;

use crate::prelude::*;
use super::{Context, Request, Response};


/// This is the main HTTP entry point, called for each incoming request.
///
/// The API is open to browser applications from anywhere, so every response
/// leaving this function carries a permissive CORS header and preflight
/// requests are answered for all paths.
pub(super) async fn handle(req: Request<Body>, ctx: Arc<Context>) -> Response {
    trace!(
        "Incoming HTTP {:?} request to '{}{}'",
        req.method(),
        req.uri().path(),
        req.uri().query().map(|q| format!("?{q}")).unwrap_or_default(),
    );

    let method = req.method().clone();
    let path = req.uri().path().trim_end_matches('/').to_owned();

    let response = match path.as_str() {
        // CORS preflight, for any path.
        _ if method == Method::OPTIONS => preflight(),

        // The actual GraphQL API. GET is supported for tooling that passes
        // the query via query string.
        "/graphql" if method == Method::GET || method == Method::POST => {
            juniper_hyper::graphql(
                Arc::clone(&ctx.api_root),
                Arc::clone(&ctx.api_context),
                req,
            ).await
        }

        // The interactive GraphQL API explorer/IDE. We keep this in
        // production as it does not expose any information that isn't
        // already exposed by the API itself.
        "/graphiql" if method == Method::GET => juniper_hyper::graphiql("/graphql", None).await,

        // Apart from the above, we only support GET requests.
        _ if method != Method::GET => {
            Response::builder()
                .status(StatusCode::METHOD_NOT_ALLOWED)
                .header("Content-Type", "text/plain; charset=UTF-8")
                .body(Body::from("405 Method not allowed"))
                .expect("bug: invalid response")
        }

        // 404 for everything else.
        path => {
            debug!("Responding with 404 to {method:?} '{path}'");
            Response::builder()
                .status(StatusCode::NOT_FOUND)
                .header("Content-Type", "text/plain; charset=UTF-8")
                .body(Body::from("404 Not found"))
                .expect("bug: invalid response")
        }
    };

    with_cors(response)
}

/// Answers an `OPTIONS` preflight request: all origins may send GET and POST
/// requests with a JSON body.
fn preflight() -> Response {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header(header::ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, OPTIONS")
        .header(header::ACCESS_CONTROL_ALLOW_HEADERS, "content-type")
        .body(Body::empty())
        .expect("bug: invalid response")
}

/// Allows any origin to read the given response.
fn with_cors(mut response: Response) -> Response {
    response.headers_mut().insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    response
}

pub(super) fn internal_server_error() -> Response {
    Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .body("Internal server error".into())
        .expect("bug: invalid response")
}
