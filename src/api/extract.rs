//! Extractors whose rejections go through `AppError`

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Path, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Path parameters; a value that does not parse is a 400 error body.
#[derive(FromRequestParts)]
#[from_request(via(Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

/// JSON body that may be left out.
///
/// A request without a JSON content type carries no payload and yields `None`.
/// A body that is sent but cannot be read is rejected with the parse error.
pub struct AppJson<T>(pub Option<T>);

#[async_trait]
impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(AppJson(Some(value))),
            Err(JsonRejection::MissingJsonContentType(_)) => Ok(AppJson(None)),
            Err(rejection) => Err(rejection.into()),
        }
    }
}
