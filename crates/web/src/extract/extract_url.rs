//! URL query string extraction.
//!
//! [`Query`] deserializes the whole query string into a struct with serde_qs.
//! Single parameters bound by `query_param` and `optional_query_param` are
//! read through [`Bound`](crate::bindings::Bound) instead.

use serde::de::DeserializeOwned;

use crate::RequestContext;
use crate::bindings::Bindings;
use crate::error::RouteError;
use crate::extract::{FromRequest, Query};

impl<T> FromRequest for Query<T>
where
    T: DeserializeOwned,
{
    fn from_request(req: &RequestContext, _bindings: &mut Bindings) -> Result<Self, RouteError> {
        let query = req.uri().query().unwrap_or_default();
        serde_qs::from_str::<T>(query).map(Query).map_err(RouteError::bad_request)
    }
}
