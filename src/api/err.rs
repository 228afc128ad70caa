//! API error handling.
//!
//! We define our own error to use for all resolvers. It has a `From` impl to
//! be created from store errors, and this module offers a macro to easily
//! create one by hand. The coarse "error kind" ends up in the GraphQL error
//! extensions so that clients can react to it without parsing messages.

use juniper::{FieldError, IntoFieldError, ScalarValue, graphql_value};

use crate::{prelude::*, store::StoreError};


pub(crate) type ApiResult<T> = Result<T, ApiError>;

pub(crate) struct ApiError {
    pub(crate) msg: String,
    pub(crate) kind: ApiErrorKind,
}

pub(crate) enum ApiErrorKind {
    /// The request referred to a record that does not exist.
    NotFound,

    /// Some server error out of control of the API user.
    InternalServerError,
}

impl ApiErrorKind {
    fn kind_str(&self) -> &str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::InternalServerError => "INTERNAL_SERVER_ERROR",
        }
    }

    fn message_prefix(&self) -> &str {
        match self {
            Self::NotFound => "Not found",
            Self::InternalServerError => "Internal server error",
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(src: StoreError) -> Self {
        // Logging the error here is not ideal but probably totally fine for
        // us. At this point, it's very likely that the error is sent back to
        // the user, and this is the last time we can get detailed
        // information about it.
        error!("Store error during API request: {src}");
        debug!("Detailed error: {src:#?}");

        Self {
            msg: format!("store error: {src}"),
            kind: ApiErrorKind::InternalServerError,
        }
    }
}

impl<S: ScalarValue> IntoFieldError<S> for ApiError {
    fn into_field_error(self) -> FieldError<S> {
        let msg = format!("{}: {}", self.kind.message_prefix(), self.msg);
        let ext = graphql_value!({
            "kind": (self.kind.kind_str()),
        });

        FieldError::new(msg, ext)
    }
}


/// Creates an `ApiError` with a `format!` like syntax.
macro_rules! api_err {
    ($kind:ident, $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::api::err::ApiError {
            msg: format!($fmt $(, $arg)*),
            kind: $crate::api::err::ApiErrorKind::$kind,
        }
    };
}

macro_rules! not_found {
    ($($t:tt)+) => { $crate::api::err::api_err!(NotFound, $($t)*) };
}

pub(crate) use api_err;
pub(crate) use not_found;
