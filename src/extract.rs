//! Request extractors that reject with [Error] so clients always get a JSON error body.

use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts, Path, Request,
        rejection::{JsonRejection, PathRejection},
    },
    http::request::Parts,
};

use crate::Error;

/// Like [axum::Json], but a malformed body is a 400 [Error::InvalidField].
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = Error;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(request, state).await?;

        Ok(Self(value))
    }
}

/// Like [axum::extract::Path], but an unparsable parameter is a 400 [Error::InvalidField].
pub struct PathParam<T>(pub T);

impl<S, T> FromRequestParts<S> for PathParam<T>
where
    S: Send + Sync,
    Path<T>: FromRequestParts<S, Rejection = PathRejection>,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;

        Ok(Self(value))
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected request body: {rejection}");
        Error::InvalidField(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!("Rejected path parameter: {rejection}");
        Error::InvalidField(rejection.body_text())
    }
}
