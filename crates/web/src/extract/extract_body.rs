use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::RequestContext;
use crate::bindings::Bindings;
use crate::error::RouteError;
use crate::extract::from_request::FromRequest;
use crate::extract::{Form, Json};
use crate::router::Rejection;

impl FromRequest for Bytes {
    fn from_request(req: &RequestContext, _bindings: &mut Bindings) -> Result<Self, RouteError> {
        Ok(req.body().clone())
    }
}

impl FromRequest for String {
    fn from_request(req: &RequestContext, _bindings: &mut Bindings) -> Result<Self, RouteError> {
        // todo: honor the charset parameter of the content type
        String::from_utf8(req.body().to_vec()).map_err(|e| Rejection::malformed_body(e).into())
    }
}

/// Takes the entity `body_as` bound, or decodes the body as JSON when no entity of this type was bound.
impl<T> FromRequest for Json<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    fn from_request(req: &RequestContext, bindings: &mut Bindings) -> Result<Self, RouteError> {
        if let Some(entity) = bindings.take_entity::<T>() {
            return Ok(Json(entity));
        }

        serde_json::from_slice::<T>(req.body()).map(Json).map_err(|e| Rejection::malformed_body(e).into())
    }
}

impl<T> FromRequest for Form<T>
where
    T: DeserializeOwned,
{
    fn from_request(req: &RequestContext, _bindings: &mut Bindings) -> Result<Self, RouteError> {
        serde_urlencoded::from_bytes::<T>(req.body()).map(Form).map_err(|e| Rejection::malformed_body(e).into())
    }
}
